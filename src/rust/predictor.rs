use std::sync::Arc;

use serde::Serialize;

use crate::classifier::{ClassifierError, Personality, PersonalityModel};
use crate::features::FeatureRecord;

/// Probability assigned to one class
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassProbability {
    pub label: String,
    pub probability: f32,
}

/// Everything the result view needs from one submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub label: String,
    #[serde(skip)]
    pub personality: Personality,
    pub probabilities: Vec<ClassProbability>,
    pub record: FeatureRecord,
}

/// Invokes a loaded model for single-row submissions.
#[derive(Clone)]
pub struct Predictor {
    model: Arc<dyn PersonalityModel>,
}

impl Predictor {
    pub fn new(model: Arc<dyn PersonalityModel>) -> Self {
        Self { model }
    }

    pub fn classes(&self) -> &[String] {
        self.model.classes()
    }

    /// Runs `predict` and `predict_proba` once each and pairs the probabilities with `classes`.
    pub fn predict(&self, record: FeatureRecord) -> Result<Prediction, ClassifierError> {
        let label = self.model.predict(&record)?;
        let probabilities = self.model.predict_proba(&record)?;

        let classes = self.model.classes();
        if classes.len() != probabilities.len() {
            return Err(ClassifierError::PredictionError(format!(
                "Model returned {} probabilities for {} classes",
                probabilities.len(),
                classes.len()
            )));
        }

        let probabilities = classes.iter()
            .zip(probabilities)
            .map(|(label, probability)| ClassProbability { label: label.clone(), probability })
            .collect();

        log::info!("Predicted '{}' for {:?}", label, record.values());
        Ok(Prediction {
            personality: Personality::from_label(&label),
            label,
            probabilities,
            record,
        })
    }
}

impl std::fmt::Debug for Predictor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Predictor")
            .field("classes", &self.model.classes())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{Answer, PredictionForm};
    use std::sync::Mutex;

    struct Recording {
        classes: Vec<String>,
        label: String,
        probabilities: Vec<f32>,
        seen: Mutex<Vec<FeatureRecord>>,
    }

    impl PersonalityModel for Recording {
        fn classes(&self) -> &[String] {
            &self.classes
        }

        fn predict_proba(&self, record: &FeatureRecord) -> Result<Vec<f32>, ClassifierError> {
            self.seen.lock().unwrap().push(*record);
            Ok(self.probabilities.clone())
        }

        fn predict(&self, record: &FeatureRecord) -> Result<String, ClassifierError> {
            self.seen.lock().unwrap().push(*record);
            Ok(self.label.clone())
        }
    }

    fn recording(label: &str, probabilities: Vec<f32>) -> Arc<Recording> {
        Arc::new(Recording {
            classes: vec!["Extrovert".into(), "Introvert".into()],
            label: label.into(),
            probabilities,
            seen: Mutex::new(Vec::new()),
        })
    }

    #[test]
    fn test_prediction_pairs_classes_with_probabilities() {
        let model = recording("Introvert", vec![0.2, 0.8]);
        let predictor = Predictor::new(model.clone());
        let record = PredictionForm::default().into_record().unwrap();

        let prediction = predictor.predict(record).unwrap();
        assert_eq!(prediction.label, "Introvert");
        assert_eq!(prediction.personality, Personality::Introvert);
        assert_eq!(prediction.probabilities[0].label, "Extrovert");
        assert_eq!(prediction.probabilities[1].probability, 0.8);
        let total: f32 = prediction.probabilities.iter().map(|p| p.probability).sum();
        assert!((total - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_record_reaches_model_verbatim() {
        let model = recording("Extrovert", vec![0.9, 0.1]);
        let predictor = Predictor::new(model.clone());
        let record = PredictionForm {
            time_spent_alone: 5.0,
            stage_fear: Answer::Yes,
            social_event_attendance: 5.0,
            going_outside: 3.0,
            drained_after_socializing: Answer::Yes,
            friends_circle_size: 7.0,
            post_frequency: 4.0,
        }.into_record().unwrap();

        predictor.predict(record).unwrap();

        let seen = model.seen.lock().unwrap();
        assert_eq!(seen.len(), 2); // predict + predict_proba, once each
        for passed in seen.iter() {
            assert_eq!(passed.values(), [5.0, 1.0, 5.0, 3.0, 1.0, 7.0, 4.0]);
        }
    }

    #[test]
    fn test_misaligned_probabilities() {
        let predictor = Predictor::new(recording("Introvert", vec![1.0]));
        let record = PredictionForm::default().into_record().unwrap();
        assert!(matches!(predictor.predict(record), Err(ClassifierError::PredictionError(_))));
    }
}
