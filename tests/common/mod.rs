#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::Router;
use env_logger::{Builder, Env};
use personality_predictor::{ClassifierError, FeatureRecord, PersonalityModel};

// Initialize test logger
pub fn init() {
    let _ = Builder::from_env(Env::default().default_filter_or("warn"))
        .is_test(true)
        .try_init();
}

/// Path of an ONNX graph under `tests/fixtures/`.
///
/// `personality_logistic.onnx` is a 7→2 logistic model: `float_input [N, 7]`,
/// outputs `probabilities [N, 2]` (Extrovert, Introvert) and `label [N]` (int64).
/// The Introvert logit is `0.4·alone + 1.5·fear - 0.3·events - 0.2·outside
/// + 1.5·drained - 0.1·friends - 0.2·posts`; the Extrovert logit is zero.
pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures").join(name)
}

/// A model that answers with a fixed label and probabilities and records every row it sees.
pub struct MockModel {
    classes: Vec<String>,
    label: String,
    probabilities: Vec<f32>,
    fail: bool,
    calls: AtomicUsize,
    seen: Mutex<Vec<FeatureRecord>>,
}

impl MockModel {
    pub fn new(label: &str, probabilities: [f32; 2]) -> Arc<Self> {
        Arc::new(Self {
            classes: vec!["Extrovert".to_string(), "Introvert".to_string()],
            label: label.to_string(),
            probabilities: probabilities.to_vec(),
            fail: false,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        })
    }

    /// A model whose every call fails, as a broken ONNX graph would.
    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            classes: vec!["Extrovert".to_string(), "Introvert".to_string()],
            label: String::new(),
            probabilities: Vec::new(),
            fail: true,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<FeatureRecord> {
        self.seen.lock().unwrap().clone()
    }

    fn record_call(&self, record: &FeatureRecord) -> Result<(), ClassifierError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(*record);
        if self.fail {
            return Err(ClassifierError::PredictionError("Failed to run model: mock failure".into()));
        }
        Ok(())
    }
}

impl PersonalityModel for MockModel {
    fn classes(&self) -> &[String] {
        &self.classes
    }

    fn predict_proba(&self, record: &FeatureRecord) -> Result<Vec<f32>, ClassifierError> {
        self.record_call(record)?;
        Ok(self.probabilities.clone())
    }

    fn predict(&self, record: &FeatureRecord) -> Result<String, ClassifierError> {
        self.record_call(record)?;
        Ok(self.label.clone())
    }
}

/// Serves `app` on an ephemeral local port.
pub async fn spawn_server(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}
