use std::fmt;

use super::error::ClassifierError;
use super::utils::{argmax, check_probabilities};
use crate::features::FeatureRecord;

/// Label set of the personality model, in scikit-learn `classes_` order.
pub const DEFAULT_CLASSES: [&str; 2] = ["Extrovert", "Introvert"];

/// A trained binary classifier over [`FeatureRecord`] rows.
///
/// Implementations must be shareable across request handlers, hence the
/// `Send + Sync` bound. The ONNX-backed implementation is
/// [`OnnxClassifier`](super::OnnxClassifier); tests substitute fixed models.
pub trait PersonalityModel: Send + Sync {
    /// Ordered class labels; `predict_proba` returns one probability per entry.
    fn classes(&self) -> &[String];

    /// Class probabilities for a single row, aligned with [`classes`](Self::classes).
    fn predict_proba(&self, record: &FeatureRecord) -> Result<Vec<f32>, ClassifierError>;

    /// Predicted label for a single row.
    ///
    /// The default takes the class with the highest probability, which is how
    /// scikit-learn forests resolve `predict`.
    fn predict(&self, record: &FeatureRecord) -> Result<String, ClassifierError> {
        let probabilities = self.predict_proba(record)?;
        check_probabilities(self.classes(), &probabilities)?;
        argmax(&probabilities)
            .map(|i| self.classes()[i].clone())
            .ok_or_else(|| ClassifierError::PredictionError("Model has no classes".into()))
    }
}

/// The two personality types the result page knows how to describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Personality {
    Introvert,
    Extrovert,
}

impl Personality {
    /// Maps a model label to a personality. Anything other than `"Introvert"` is shown as extrovert.
    pub fn from_label(label: &str) -> Self {
        if label == "Introvert" {
            Personality::Introvert
        } else {
            Personality::Extrovert
        }
    }

    /// Descriptive block shown for this personality
    pub fn profile(self) -> &'static PersonalityProfile {
        match self {
            Personality::Introvert => &INTROVERT_PROFILE,
            Personality::Extrovert => &EXTROVERT_PROFILE,
        }
    }
}

impl fmt::Display for Personality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Personality::Introvert => f.write_str("Introvert"),
            Personality::Extrovert => f.write_str("Ekstrovert"),
        }
    }
}

/// Visual tone of the headline box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Info,
}

#[derive(Debug, PartialEq, Eq)]
pub struct PersonalityProfile {
    pub headline: &'static str,
    pub image_url: &'static str,
    pub description: &'static str,
    pub tone: Tone,
}

static INTROVERT_PROFILE: PersonalityProfile = PersonalityProfile {
    headline: "Anda cenderung memiliki kepribadian Introvert.",
    image_url: "https://i.imgur.com/8zT1q4k.png",
    description: "Seorang introvert lebih suka menghabiskan waktu sendirian atau dalam kelompok kecil. \
        Mereka mendapatkan energi dari dalam diri dan mungkin merasa lelah setelah interaksi sosial yang intens.",
    tone: Tone::Success,
};

static EXTROVERT_PROFILE: PersonalityProfile = PersonalityProfile {
    headline: "Anda cenderung memiliki kepribadian Ekstrovert.",
    image_url: "https://i.imgur.com/O1F3EJM.png",
    description: "Seorang ekstrovert mendapatkan energi dari interaksi sosial. Mereka suka berada di tengah \
        keramaian, bertemu orang baru, dan seringkali menjadi pusat perhatian.",
    tone: Tone::Info,
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::PredictionForm;

    struct Fixed {
        classes: Vec<String>,
        probabilities: Vec<f32>,
    }

    impl PersonalityModel for Fixed {
        fn classes(&self) -> &[String] {
            &self.classes
        }

        fn predict_proba(&self, _record: &FeatureRecord) -> Result<Vec<f32>, ClassifierError> {
            Ok(self.probabilities.clone())
        }
    }

    fn fixed(probabilities: Vec<f32>) -> Fixed {
        Fixed {
            classes: DEFAULT_CLASSES.iter().map(|c| c.to_string()).collect(),
            probabilities,
        }
    }

    #[test]
    fn test_default_predict_takes_most_probable_class() {
        let record = PredictionForm::default().into_record().unwrap();
        assert_eq!(fixed(vec![0.25, 0.75]).predict(&record).unwrap(), "Introvert");
        assert_eq!(fixed(vec![0.6, 0.4]).predict(&record).unwrap(), "Extrovert");
    }

    #[test]
    fn test_default_predict_rejects_misaligned_output() {
        let record = PredictionForm::default().into_record().unwrap();
        let result = fixed(vec![1.0]).predict(&record);
        assert!(matches!(result, Err(ClassifierError::PredictionError(_))));
    }

    #[test]
    fn test_personality_from_label() {
        assert_eq!(Personality::from_label("Introvert"), Personality::Introvert);
        assert_eq!(Personality::from_label("Extrovert"), Personality::Extrovert);
        assert_eq!(Personality::Introvert.profile().tone, Tone::Success);
        assert_eq!(Personality::Extrovert.profile().tone, Tone::Info);
        assert!(Personality::Extrovert.profile().headline.contains("Ekstrovert"));
    }
}
