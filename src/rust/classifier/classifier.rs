use std::collections::HashMap;
use std::sync::Arc;

use ndarray::Array2;
use ort::session::Session;
use ort::value::Tensor;

use super::error::ClassifierError;
use super::model::PersonalityModel;
use super::utils::check_probabilities;
use crate::features::{FeatureRecord, FEATURE_COUNT};

/// A personality classifier backed by an ONNX Runtime session.
///
/// The ONNX graph is a scikit-learn classifier exported with `skl2onnx`
/// (`zipmap` disabled) and is expected to:
/// - Accept one float input of shape `[batch_size, 7]`, columns in
///   [`FEATURE_NAMES`](crate::features::FEATURE_NAMES) order
/// - Produce a float probability output of shape `[batch_size, num_classes]`
///
/// # Thread Safety
///
/// The session and class list are held in `Arc`, so the classifier is
/// `Send + Sync` and can be shared across request handlers.
///
/// ```no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use personality_predictor::{Classifier, PersonalityModel, PredictionForm};
///
/// let classifier = Classifier::builder()
///     .with_model_file("best_personality_model.onnx")?
///     .build()?;
///
/// let record = PredictionForm::default().into_record()?;
/// let label = classifier.predict(&record)?;
/// println!("Predicted class: {}", label);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct OnnxClassifier {
    pub model_path: String,
    pub session: Arc<Session>,
    pub input_name: String,
    pub probability_output: String,
    pub classes: Arc<Vec<String>>,
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn verify_thread_safety() {
        assert_send_sync::<OnnxClassifier>();
    }
};

impl OnnxClassifier {
    /// Creates a new ClassifierBuilder for fluent construction
    pub fn builder() -> super::builder::ClassifierBuilder {
        super::builder::ClassifierBuilder::new()
    }

    /// Returns information about the loaded model
    pub fn info(&self) -> super::ClassifierInfo {
        super::ClassifierInfo {
            model_path: self.model_path.clone(),
            input_name: self.input_name.clone(),
            probability_output: self.probability_output.clone(),
            class_labels: self.classes.as_ref().clone(),
        }
    }

    /// Runs the session on one row and returns the first probability row.
    pub(crate) fn run_session(
        session: &Session,
        input_name: &str,
        probability_output: &str,
        record: &FeatureRecord,
    ) -> Result<Vec<f32>, ClassifierError> {
        let input_array = Array2::from_shape_vec((1, FEATURE_COUNT), record.values().to_vec())
            .map_err(|e| ClassifierError::ModelError(format!("Failed to create input array: {}", e)))?;
        let input_dyn = input_array.into_dyn();
        let input = input_dyn.as_standard_layout();

        let mut input_tensors = HashMap::new();
        input_tensors.insert(input_name, Tensor::from_array(&input)
            .map_err(|e| ClassifierError::ModelError(format!("Failed to create input tensor: {}", e)))?);

        let outputs = session.run(input_tensors)
            .map_err(|e| ClassifierError::PredictionError(format!("Failed to run model: {}", e)))?;
        let probabilities = outputs[probability_output].try_extract_tensor::<f32>()
            .map_err(|e| ClassifierError::PredictionError(format!("Failed to extract probabilities: {}", e)))?;

        if probabilities.ndim() != 2 || probabilities.shape()[0] != 1 {
            return Err(ClassifierError::PredictionError(format!(
                "Expected probabilities of shape [1, num_classes], got {:?}",
                probabilities.shape()
            )));
        }

        Ok(probabilities.iter().copied().collect())
    }
}

impl PersonalityModel for OnnxClassifier {
    fn classes(&self) -> &[String] {
        &self.classes
    }

    fn predict_proba(&self, record: &FeatureRecord) -> Result<Vec<f32>, ClassifierError> {
        let probabilities = Self::run_session(
            &self.session,
            &self.input_name,
            &self.probability_output,
            record,
        )?;
        check_probabilities(&self.classes, &probabilities)?;
        Ok(probabilities)
    }
}
