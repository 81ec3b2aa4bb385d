mod error;
mod model;
#[allow(clippy::module_inception)]
mod classifier;
pub mod builder;
mod utils;

pub use error::ClassifierError;
pub use classifier::OnnxClassifier;
pub use builder::ClassifierBuilder;
pub use model::{PersonalityModel, Personality, PersonalityProfile, Tone, DEFAULT_CLASSES};

/// The ONNX-backed classifier, under the name callers usually reach for.
pub type Classifier = OnnxClassifier;

/// Information about a loaded classifier
#[derive(Debug, Clone)]
pub struct ClassifierInfo {
    /// Path to the ONNX model file
    pub model_path: String,
    /// Name of the feature input tensor
    pub input_name: String,
    /// Name of the probability output tensor
    pub probability_output: String,
    /// Labels of the classes, in probability column order
    pub class_labels: Vec<String>,
}
