//! Predicts whether a person is an introvert or an extrovert from seven
//! self-reported social habits, using a scikit-learn classifier exported to ONNX.
//!
//! The crate serves a small web app: a form page that collects the answers and
//! shows the prediction, and an explanation page with a dataset preview and the
//! model's offline evaluation.
//!
//! # Basic Usage
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use personality_predictor::{Answer, Classifier, PredictionForm, Predictor};
//! use std::sync::Arc;
//!
//! let classifier = Classifier::builder()
//!     .with_model_file("best_personality_model.onnx")?
//!     .with_classes(vec!["Extrovert", "Introvert"])?
//!     .build()?;
//! let predictor = Predictor::new(Arc::new(classifier));
//!
//! let form = PredictionForm {
//!     stage_fear: Answer::Yes,
//!     ..PredictionForm::default()
//! };
//! let prediction = predictor.predict(form.into_record()?)?;
//! println!("Predicted class: {}", prediction.label);
//! # Ok(())
//! # }
//! ```
//!
//! # Thread Safety
//!
//! A loaded classifier is `Send + Sync`; the web app shares one instance across
//! all requests through `Arc`.

pub mod animation;
pub mod classifier;
pub mod dataset;
pub mod features;
pub mod model_manager;
pub mod predictor;
pub mod report;
mod runtime;
pub mod web;

pub use classifier::{Classifier, ClassifierBuilder, ClassifierError, ClassifierInfo, PersonalityModel, Personality};
pub use features::{Answer, FeatureRecord, PredictionForm, FEATURE_NAMES};
pub use model_manager::{ModelStore, ModelError};
pub use predictor::{ClassProbability, Prediction, Predictor};
pub use report::EvaluationReport;
pub use runtime::{RuntimeConfig, create_session_builder};

pub fn init_logger() {
    env_logger::init();
}
