//! The seven-feature input row and the form controls that produce it.
//!
//! The classifier was trained on a table whose columns appear in the order of
//! [`FEATURE_NAMES`]. A [`FeatureRecord`] always carries all seven values in
//! that order; the only way to build one from user input is
//! [`PredictionForm::into_record`], which encodes the two yes/no answers and
//! checks every slider value against its declared domain.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::classifier::ClassifierError;

/// Column names in the order the model expects them.
pub const FEATURE_NAMES: [&str; 7] = [
    "Time_spent_Alone",
    "Stage_fear",
    "Social_event_attendance",
    "Going_outside",
    "Drained_after_socializing",
    "Friends_circle_size",
    "Post_frequency",
];

/// Number of features in a record
pub const FEATURE_COUNT: usize = FEATURE_NAMES.len();

/// A continuous input rendered as a range slider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderSpec {
    /// Column name, also used as the HTML form field name
    pub name: &'static str,
    /// Label shown next to the control
    pub label: &'static str,
    pub min: f32,
    pub max: f32,
    pub step: f32,
    pub default: f32,
}

impl SliderSpec {
    /// Checks that `value` lies in `[min, max]` and sits on the step grid.
    ///
    /// Values within float rounding of a grid position are snapped onto it, so the
    /// model only ever sees slider positions.
    pub fn validate(&self, value: f32) -> Result<f32, ClassifierError> {
        if !value.is_finite() {
            return Err(ClassifierError::ValidationError(
                format!("{} must be a finite number", self.name)
            ));
        }
        if value < self.min || value > self.max {
            return Err(ClassifierError::ValidationError(format!(
                "{} must be between {} and {}, got {}",
                self.name, self.min, self.max, value
            )));
        }
        let steps = (value - self.min) / self.step;
        if (steps - steps.round()).abs() > 1e-4 {
            return Err(ClassifierError::ValidationError(format!(
                "{} must be a multiple of {}, got {}",
                self.name, self.step, value
            )));
        }
        Ok(self.min + steps.round() * self.step)
    }
}

/// A yes/no input rendered as a select box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectSpec {
    pub name: &'static str,
    pub label: &'static str,
}

pub const TIME_SPENT_ALONE: SliderSpec = SliderSpec {
    name: "Time_spent_Alone",
    label: "Waktu Sendiri (Jam/hari)",
    min: 0.0,
    max: 12.0,
    step: 0.5,
    default: 5.0,
};

pub const STAGE_FEAR: SelectSpec = SelectSpec {
    name: "Stage_fear",
    label: "Takut Panggung?",
};

pub const SOCIAL_EVENT_ATTENDANCE: SliderSpec = SliderSpec {
    name: "Social_event_attendance",
    label: "Kehadiran Acara Sosial (per bulan)",
    min: 0.0,
    max: 10.0,
    step: 0.5,
    default: 5.0,
};

pub const GOING_OUTSIDE: SliderSpec = SliderSpec {
    name: "Going_outside",
    label: "Frekuensi Keluar Rumah (kali/minggu)",
    min: 0.0,
    max: 7.0,
    step: 0.5,
    default: 3.0,
};

pub const DRAINED_AFTER_SOCIALIZING: SelectSpec = SelectSpec {
    name: "Drained_after_socializing",
    label: "Lelah Setelah Bersosialisasi?",
};

pub const FRIENDS_CIRCLE_SIZE: SliderSpec = SliderSpec {
    name: "Friends_circle_size",
    label: "Ukuran Lingkaran Pertemanan",
    min: 0.0,
    max: 15.0,
    step: 0.5,
    default: 7.0,
};

pub const POST_FREQUENCY: SliderSpec = SliderSpec {
    name: "Post_frequency",
    label: "Frekuensi Posting di Media Sosial (kali/minggu)",
    min: 0.0,
    max: 10.0,
    step: 0.5,
    default: 4.0,
};

/// Answer to a yes/no question, spelled the way the form submits it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Answer {
    #[serde(rename = "Ya")]
    Yes,
    #[serde(rename = "Tidak")]
    #[default]
    No,
}

impl Answer {
    /// Select box options in display order
    pub const OPTIONS: [Answer; 2] = [Answer::No, Answer::Yes];

    /// Binary encoding used by the model: Yes is 1, No is 0.
    pub fn encode(self) -> u8 {
        match self {
            Answer::Yes => 1,
            Answer::No => 0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Answer::Yes => "Ya",
            Answer::No => "Tidak",
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Answer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Ya" => Ok(Answer::Yes),
            "Tidak" => Ok(Answer::No),
            other => Err(format!("expected 'Ya' or 'Tidak', got '{}'", other)),
        }
    }
}

/// Raw values as submitted by the form or the JSON API.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionForm {
    #[serde(rename = "Time_spent_Alone")]
    pub time_spent_alone: f32,
    #[serde(rename = "Stage_fear")]
    pub stage_fear: Answer,
    #[serde(rename = "Social_event_attendance")]
    pub social_event_attendance: f32,
    #[serde(rename = "Going_outside")]
    pub going_outside: f32,
    #[serde(rename = "Drained_after_socializing")]
    pub drained_after_socializing: Answer,
    #[serde(rename = "Friends_circle_size")]
    pub friends_circle_size: f32,
    #[serde(rename = "Post_frequency")]
    pub post_frequency: f32,
}

impl Default for PredictionForm {
    fn default() -> Self {
        Self {
            time_spent_alone: TIME_SPENT_ALONE.default,
            stage_fear: Answer::default(),
            social_event_attendance: SOCIAL_EVENT_ATTENDANCE.default,
            going_outside: GOING_OUTSIDE.default,
            drained_after_socializing: Answer::default(),
            friends_circle_size: FRIENDS_CIRCLE_SIZE.default,
            post_frequency: POST_FREQUENCY.default,
        }
    }
}

impl PredictionForm {
    /// Slider specs paired with the value currently held for each.
    pub fn sliders(&self) -> [(SliderSpec, f32); 5] {
        [
            (TIME_SPENT_ALONE, self.time_spent_alone),
            (SOCIAL_EVENT_ATTENDANCE, self.social_event_attendance),
            (GOING_OUTSIDE, self.going_outside),
            (FRIENDS_CIRCLE_SIZE, self.friends_circle_size),
            (POST_FREQUENCY, self.post_frequency),
        ]
    }

    /// Encodes the answers and validates the sliders, producing the model input row.
    pub fn into_record(self) -> Result<FeatureRecord, ClassifierError> {
        Ok(FeatureRecord {
            time_spent_alone: TIME_SPENT_ALONE.validate(self.time_spent_alone)?,
            stage_fear: self.stage_fear.encode(),
            social_event_attendance: SOCIAL_EVENT_ATTENDANCE.validate(self.social_event_attendance)?,
            going_outside: GOING_OUTSIDE.validate(self.going_outside)?,
            drained_after_socializing: self.drained_after_socializing.encode(),
            friends_circle_size: FRIENDS_CIRCLE_SIZE.validate(self.friends_circle_size)?,
            post_frequency: POST_FREQUENCY.validate(self.post_frequency)?,
        })
    }
}

/// One row of model input. Serializes with the training column names.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureRecord {
    #[serde(rename = "Time_spent_Alone")]
    pub time_spent_alone: f32,
    #[serde(rename = "Stage_fear")]
    pub stage_fear: u8,
    #[serde(rename = "Social_event_attendance")]
    pub social_event_attendance: f32,
    #[serde(rename = "Going_outside")]
    pub going_outside: f32,
    #[serde(rename = "Drained_after_socializing")]
    pub drained_after_socializing: u8,
    #[serde(rename = "Friends_circle_size")]
    pub friends_circle_size: f32,
    #[serde(rename = "Post_frequency")]
    pub post_frequency: f32,
}

impl FeatureRecord {
    /// Values in column order, as fed to the model input tensor.
    pub fn values(&self) -> [f32; FEATURE_COUNT] {
        [
            self.time_spent_alone,
            f32::from(self.stage_fear),
            self.social_event_attendance,
            self.going_outside,
            f32::from(self.drained_after_socializing),
            self.friends_circle_size,
            self.post_frequency,
        ]
    }

    /// Column names zipped with their values.
    pub fn columns(&self) -> impl Iterator<Item = (&'static str, f32)> {
        FEATURE_NAMES.into_iter().zip(self.values())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_form() -> PredictionForm {
        PredictionForm {
            time_spent_alone: 5.0,
            stage_fear: Answer::Yes,
            social_event_attendance: 5.0,
            going_outside: 3.0,
            drained_after_socializing: Answer::Yes,
            friends_circle_size: 7.0,
            post_frequency: 4.0,
        }
    }

    #[test]
    fn test_answer_encoding() {
        assert_eq!("Ya".parse::<Answer>().unwrap().encode(), 1);
        assert_eq!("Tidak".parse::<Answer>().unwrap().encode(), 0);
        assert!("Mungkin".parse::<Answer>().is_err());
        assert!("ya".parse::<Answer>().is_err());
        // Encoding the same answer twice yields the same value
        assert_eq!(Answer::Yes.encode(), Answer::Yes.encode());
    }

    #[test]
    fn test_scenario_record() {
        let record = scenario_form().into_record().unwrap();
        assert_eq!(record.values(), [5.0, 1.0, 5.0, 3.0, 1.0, 7.0, 4.0]);
        assert_eq!(record.stage_fear, 1);
        assert_eq!(record.drained_after_socializing, 1);
    }

    #[test]
    fn test_record_columns_follow_model_order() {
        let record = PredictionForm::default().into_record().unwrap();
        let names: Vec<_> = record.columns().map(|(name, _)| name).collect();
        assert_eq!(names, FEATURE_NAMES);

        let json = serde_json::to_value(record).unwrap();
        let object = json.as_object().unwrap();
        assert_eq!(object.len(), FEATURE_COUNT);
        for name in FEATURE_NAMES {
            assert!(object.contains_key(name), "missing column {}", name);
        }
    }

    #[test]
    fn test_defaults_match_sliders() {
        let record = PredictionForm::default().into_record().unwrap();
        assert_eq!(record.values(), [5.0, 0.0, 5.0, 3.0, 0.0, 7.0, 4.0]);
    }

    #[test]
    fn test_every_slider_position_is_accepted() {
        for (spec, _) in PredictionForm::default().sliders() {
            let positions = ((spec.max - spec.min) / spec.step).round() as usize;
            for i in 0..=positions {
                let value = spec.min + spec.step * i as f32;
                assert_eq!(spec.validate(value).unwrap(), value);
            }
        }
    }

    #[test]
    fn test_near_grid_values_snap() {
        assert_eq!(POST_FREQUENCY.validate(4.00003).unwrap(), 4.0);
        assert_eq!(TIME_SPENT_ALONE.validate(6.49998).unwrap(), 6.5);

        let mut form = scenario_form();
        form.friends_circle_size = 7.00004;
        assert_eq!(form.into_record().unwrap().friends_circle_size, 7.0);
    }

    #[test]
    fn test_out_of_domain_values_rejected() {
        let mut form = scenario_form();
        form.time_spent_alone = 12.5;
        assert!(matches!(form.into_record(), Err(ClassifierError::ValidationError(_))));

        let mut form = scenario_form();
        form.going_outside = -0.5;
        assert!(form.into_record().is_err());

        let mut form = scenario_form();
        form.post_frequency = 4.25;
        assert!(form.into_record().is_err());

        let mut form = scenario_form();
        form.friends_circle_size = f32::NAN;
        assert!(form.into_record().is_err());
    }

    #[test]
    fn test_form_deserializes_from_column_names() {
        let form: PredictionForm = serde_json::from_value(serde_json::json!({
            "Time_spent_Alone": 5.0,
            "Stage_fear": "Ya",
            "Social_event_attendance": 5.0,
            "Going_outside": 3.0,
            "Drained_after_socializing": "Tidak",
            "Friends_circle_size": 7.0,
            "Post_frequency": 4.0
        })).unwrap();
        assert_eq!(form.stage_fear, Answer::Yes);
        assert_eq!(form.drained_after_socializing, Answer::No);

        let third_state = serde_json::from_value::<PredictionForm>(serde_json::json!({
            "Time_spent_Alone": 5.0,
            "Stage_fear": "Maybe",
            "Social_event_attendance": 5.0,
            "Going_outside": 3.0,
            "Drained_after_socializing": "Tidak",
            "Friends_circle_size": 7.0,
            "Post_frequency": 4.0
        }));
        assert!(third_state.is_err());
    }
}
