use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use log::{error, info};
use ort::session::Session;

use super::classifier::OnnxClassifier;
use super::error::ClassifierError;
use super::model::DEFAULT_CLASSES;
use crate::features::FEATURE_COUNT;
use crate::runtime::{create_session_builder, RuntimeConfig};

/// Output names `skl2onnx` gives the probability tensor, in lookup order.
const PROBABILITY_OUTPUTS: [&str; 2] = ["probabilities", "output_probability"];

/// A builder for constructing an [`OnnxClassifier`] with a fluent interface.
#[derive(Default, Debug)]
pub struct ClassifierBuilder {
    model_path: Option<String>,
    session: Option<Session>,
    classes: Option<Vec<String>>,
    probability_output: Option<String>,
    runtime_config: RuntimeConfig,
}

impl ClassifierBuilder {
    /// Creates a new empty ClassifierBuilder instance with default configuration
    pub fn new() -> Self {
        Self {
            model_path: None,
            session: None,
            classes: None,
            probability_output: None,
            runtime_config: RuntimeConfig::default(),
        }
    }

    /// Sets the runtime configuration for ONNX model execution.
    /// Must be called before [`with_model_file`](Self::with_model_file) to take effect.
    pub fn with_runtime_config(mut self, config: RuntimeConfig) -> Self {
        self.runtime_config = config;
        self
    }

    /// Names the output holding class probabilities.
    ///
    /// When unset, the builder looks for `probabilities` and then
    /// `output_probability`, falling back to the last output of the graph.
    pub fn with_probability_output(mut self, name: impl Into<String>) -> Self {
        self.probability_output = Some(name.into());
        self
    }

    /// Loads the ONNX model at `model_path`.
    ///
    /// # Returns
    /// * `Result<Self, ClassifierError>` - The builder instance if successful, or an error if:
    ///   - The path is empty or a model is already set
    ///   - The file doesn't exist
    ///   - ONNX Runtime fails to load it
    ///   - The model does not take exactly one input
    pub fn with_model_file(mut self, model_path: impl AsRef<Path>) -> Result<Self, ClassifierError> {
        let model_path = model_path.as_ref();
        if model_path.as_os_str().is_empty() {
            return Err(ClassifierError::BuildError("Model path cannot be empty".to_string()));
        }
        if self.model_path.is_some() {
            return Err(ClassifierError::BuildError("Model path already set".to_string()));
        }
        if !model_path.exists() {
            return Err(ClassifierError::BuildError(format!("Model file not found: {}", model_path.display())));
        }

        let session = create_session_builder(&self.runtime_config)?
            .commit_from_file(model_path)
            .map_err(|e| {
                error!("Failed to load model {}: {}", model_path.display(), e);
                ClassifierError::BuildError(format!("Failed to load model: {}", e))
            })?;

        if session.inputs.len() != 1 {
            return Err(ClassifierError::ModelError(format!(
                "Model must have exactly 1 input with {} features, found {} inputs",
                FEATURE_COUNT,
                session.inputs.len()
            )));
        }
        info!("Model loaded from {}", model_path.display());

        self.model_path = Some(model_path.to_string_lossy().to_string());
        self.session = Some(session);
        Ok(self)
    }

    /// Sets the class labels in the order of the model's probability columns.
    pub fn with_classes(mut self, classes: Vec<impl Into<String>>) -> Result<Self, ClassifierError> {
        let classes: Vec<String> = classes.into_iter().map(Into::into).collect();
        Self::validate_classes(&classes)?;
        self.classes = Some(classes);
        Ok(self)
    }

    /// Reads class labels from a JSON file holding an array of strings.
    pub fn with_classes_file(self, path: impl AsRef<Path>) -> Result<Self, ClassifierError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ClassifierError::BuildError(format!("Failed to read classes file {}: {}", path.display(), e))
        })?;
        let classes: Vec<String> = serde_json::from_str(&contents).map_err(|e| {
            ClassifierError::BuildError(format!("Invalid classes file {}: {}", path.display(), e))
        })?;
        info!("Loaded {} class labels from {}", classes.len(), path.display());
        self.with_classes(classes)
    }

    /// Validates class labels:
    /// - At least two classes
    /// - No empty label
    /// - No duplicate label
    fn validate_classes(classes: &[String]) -> Result<(), ClassifierError> {
        if classes.len() < 2 {
            return Err(ClassifierError::ValidationError(
                format!("A classifier needs at least 2 classes, got {}", classes.len())
            ));
        }
        if let Some(pos) = classes.iter().position(|c| c.trim().is_empty()) {
            return Err(ClassifierError::ValidationError(
                format!("Class label {} cannot be empty", pos + 1)
            ));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = classes.iter().find(|c| !seen.insert(c.as_str())) {
            return Err(ClassifierError::ValidationError(format!("Duplicate class label '{}'", dup)));
        }
        Ok(())
    }

    /// Picks the probability output by configured name, well-known names, or position.
    fn resolve_probability_output(session: &Session, requested: Option<&str>) -> Result<String, ClassifierError> {
        let names: Vec<&str> = session.outputs.iter().map(|o| o.name.as_str()).collect();
        if let Some(requested) = requested {
            return names.iter()
                .find(|name| **name == requested)
                .map(|name| name.to_string())
                .ok_or_else(|| ClassifierError::ModelError(format!(
                    "Model has no output named '{}' (outputs: {:?})", requested, names
                )));
        }
        PROBABILITY_OUTPUTS.iter()
            .find(|candidate| names.contains(*candidate))
            .or(names.last())
            .map(|name| name.to_string())
            .ok_or_else(|| ClassifierError::ModelError("Model must have at least 1 output for probabilities".to_string()))
    }

    /// Builds and returns the final classifier
    ///
    /// When no classes were set, [`DEFAULT_CLASSES`] is used. The class count is
    /// checked against a trial prediction so a mismatched label file fails here
    /// rather than on the first request.
    pub fn build(mut self) -> Result<OnnxClassifier, ClassifierError> {
        let model_path = self.model_path.take()
            .ok_or_else(|| ClassifierError::BuildError("Model path must be set".to_string()))?;
        let session = self.session.take()
            .ok_or_else(|| ClassifierError::BuildError("No ONNX model loaded".into()))?;

        let classes = match self.classes.take() {
            Some(classes) => classes,
            None => DEFAULT_CLASSES.iter().map(|c| c.to_string()).collect(),
        };

        let input_name = session.inputs[0].name.clone();
        let probability_output = Self::resolve_probability_output(&session, self.probability_output.as_deref())?;

        let trial = crate::features::PredictionForm::default().into_record()?;
        let probabilities = OnnxClassifier::run_session(&session, &input_name, &probability_output, &trial)
            .map_err(|e| ClassifierError::ModelError(format!("Trial prediction failed: {}", e)))?;
        if probabilities.len() != classes.len() {
            return Err(ClassifierError::ModelError(format!(
                "Model produces {} probabilities but {} classes were configured",
                probabilities.len(),
                classes.len()
            )));
        }
        info!("Classifier ready: input '{}', output '{}', classes {:?}", input_name, probability_output, classes);

        Ok(OnnxClassifier {
            model_path,
            session: Arc::new(session),
            input_name,
            probability_output,
            classes: Arc::new(classes),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_class_validation() {
        assert!(ClassifierBuilder::new().with_classes(vec!["Extrovert", "Introvert"]).is_ok());
        assert!(matches!(
            ClassifierBuilder::new().with_classes(vec!["Introvert"]),
            Err(ClassifierError::ValidationError(_))
        ));
        assert!(ClassifierBuilder::new().with_classes(vec!["Extrovert", ""]).is_err());
        assert!(ClassifierBuilder::new().with_classes(vec!["Introvert", "Introvert"]).is_err());
    }

    #[test]
    fn test_classes_file() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = tempfile::NamedTempFile::new()?;
        write!(file, r#"["Extrovert", "Introvert"]"#)?;
        assert!(ClassifierBuilder::new().with_classes_file(file.path()).is_ok());

        let mut bad = tempfile::NamedTempFile::new()?;
        write!(bad, r#"{{"classes": 2}}"#)?;
        assert!(matches!(
            ClassifierBuilder::new().with_classes_file(bad.path()),
            Err(ClassifierError::BuildError(_))
        ));
        Ok(())
    }

    #[test]
    fn test_missing_model_file() {
        let result = ClassifierBuilder::new().with_model_file("/nonexistent/best_personality_model.onnx");
        assert!(matches!(result, Err(ClassifierError::BuildError(_))));
        assert!(ClassifierBuilder::new().with_model_file("").is_err());
    }

    #[test]
    fn test_build_without_model() {
        let result = ClassifierBuilder::new()
            .with_classes(vec!["Extrovert", "Introvert"])
            .and_then(|builder| builder.build());
        assert!(matches!(result, Err(ClassifierError::BuildError(_))));
    }
}
