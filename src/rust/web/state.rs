use std::path::PathBuf;

use serde_json::Value;

use crate::predictor::Predictor;
use crate::report::EvaluationReport;

/// Outcome of loading the model at startup.
#[derive(Debug, Clone)]
pub enum ModelStatus {
    Ready(Predictor),
    /// Loading failed; the message is shown on the form and prediction stays disabled.
    Unavailable(String),
}

impl ModelStatus {
    pub fn predictor(&self) -> Option<&Predictor> {
        match self {
            ModelStatus::Ready(predictor) => Some(predictor),
            ModelStatus::Unavailable(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ModelStatus::Ready(_) => None,
            ModelStatus::Unavailable(message) => Some(message),
        }
    }
}

/// Shared, read-only state of the web app.
#[derive(Debug, Clone)]
pub struct AppState {
    pub model: ModelStatus,
    pub animation: Option<Value>,
    pub dataset_path: PathBuf,
    pub report: EvaluationReport,
}

impl AppState {
    pub fn new(model: ModelStatus, dataset_path: impl Into<PathBuf>) -> Self {
        Self {
            model,
            animation: None,
            dataset_path: dataset_path.into(),
            report: EvaluationReport::published(),
        }
    }

    pub fn with_animation(mut self, animation: Option<Value>) -> Self {
        self.animation = animation;
        self
    }
}
