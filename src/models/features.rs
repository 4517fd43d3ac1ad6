//! # User Feature Schemas
//!
//! The census-income feature record accepted by the prediction endpoint, and
//! the feedback record that pairs a prediction with its true label. Field
//! names and bounds follow the reference dataset; serialization uses its
//! hyphenated column spellings so records round-trip into worker payloads
//! unchanged.

use serde::{Deserialize, Serialize};

use super::ValidationError;

macro_rules! categorical {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $wire)] $variant,)+
        }
    };
}

categorical!(Workclass { Private => "Private", LocalGov => "Local-gov" });
categorical!(Education { HsGrad => "HS-grad", SomeCollege => "Some-college" });
categorical!(MaritalStatus { MarriedCivSpouse => "Married-civ-spouse", Divorced => "Divorced" });
categorical!(Occupation { ExecManagerial => "Exec-managerial", CraftRepair => "Craft-repair" });
categorical!(Relationship { Husband => "Husband", Wife => "Wife" });
categorical!(Race { Black => "Black", White => "White" });
categorical!(Gender { Male => "Male", Female => "Female" });

categorical!(
    /// Income class used as prediction target and feedback label.
    Income { AtMostFiftyK => "<=50K", OverFiftyK => ">50K" }
);

/// One user-feature record for inference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserFeatureRecord {
    pub age: f64,
    pub workclass: Workclass,
    pub fnlwgt: f64,
    pub education: Education,
    #[serde(rename = "educational-num")]
    pub educational_num: f64,
    #[serde(rename = "marital-status")]
    pub marital_status: MaritalStatus,
    pub occupation: Occupation,
    pub relationship: Relationship,
    pub race: Race,
    pub gender: Gender,
    #[serde(rename = "capital-gain")]
    pub capital_gain: f64,
    #[serde(rename = "capital-loss")]
    pub capital_loss: f64,
    #[serde(rename = "hours-per-week")]
    pub hours_per_week: i64,
    #[serde(rename = "native-country")]
    pub native_country: String,
}

impl UserFeatureRecord {
    /// Validate numeric bounds the type system cannot express.
    ///
    /// Categorical fields are already closed enums; only ranges and string
    /// lengths are checked here.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_range("age", self.age, 0.0, 200.0)?;
        check_range("fnlwgt", self.fnlwgt, 1.0, 10_000_000.0)?;
        check_range("educational-num", self.educational_num, 1.0, 16.0)?;
        check_non_negative("capital-gain", self.capital_gain)?;
        check_non_negative("capital-loss", self.capital_loss)?;

        if !(0..=65).contains(&self.hours_per_week) {
            return Err(ValidationError::new(
                "hours-per-week",
                format!("{} is outside [0, 65]", self.hours_per_week),
            ));
        }
        if self.native_country.len() < 2 {
            return Err(ValidationError::new(
                "native-country",
                "must be at least 2 characters",
            ));
        }
        Ok(())
    }
}

/// A prediction's true label reported back by the caller, joined to the
/// original task by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    #[serde(flatten)]
    pub features: UserFeatureRecord,
    pub task_id: String,
    pub income: Income,
}

impl FeedbackRecord {
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.features.validate()?;
        if self.task_id.is_empty() {
            return Err(ValidationError::new("task_id", "must not be empty"));
        }
        if self.task_id.contains('/') || self.task_id.contains("..") {
            return Err(ValidationError::new(
                "task_id",
                "must not contain path separators",
            ));
        }
        Ok(())
    }
}

fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value < min || value > max {
        return Err(ValidationError::new(
            field,
            format!("{value} is outside [{min}, {max}]"),
        ));
    }
    Ok(())
}

fn check_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ValidationError::new(
            field,
            format!("{value} must be non-negative"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    pub(crate) fn sample_record() -> UserFeatureRecord {
        UserFeatureRecord {
            age: 39.0,
            workclass: Workclass::Private,
            fnlwgt: 77_516.0,
            education: Education::HsGrad,
            educational_num: 9.0,
            marital_status: MaritalStatus::MarriedCivSpouse,
            occupation: Occupation::ExecManagerial,
            relationship: Relationship::Husband,
            race: Race::White,
            gender: Gender::Male,
            capital_gain: 2_174.0,
            capital_loss: 0.0,
            hours_per_week: 40,
            native_country: "United-States".to_string(),
        }
    }

    #[test]
    fn test_valid_record_passes() {
        assert!(sample_record().validate().is_ok());
    }

    #[test]
    fn test_age_bounds() {
        let mut record = sample_record();
        record.age = 201.0;
        assert_eq!(record.validate().unwrap_err().field, "age");

        record.age = -1.0;
        assert_eq!(record.validate().unwrap_err().field, "age");
    }

    #[test]
    fn test_hours_per_week_bounds() {
        let mut record = sample_record();
        record.hours_per_week = 66;
        assert_eq!(record.validate().unwrap_err().field, "hours-per-week");
    }

    #[test]
    fn test_nan_is_rejected() {
        let mut record = sample_record();
        record.capital_gain = f64::NAN;
        assert_eq!(record.validate().unwrap_err().field, "capital-gain");
    }

    #[test]
    fn test_native_country_min_length() {
        let mut record = sample_record();
        record.native_country = "U".to_string();
        assert_eq!(record.validate().unwrap_err().field, "native-country");
    }

    #[test]
    fn test_serializes_with_dataset_column_names() {
        let value = serde_json::to_value(sample_record()).unwrap();
        assert_eq!(value["marital-status"], "Married-civ-spouse");
        assert_eq!(value["educational-num"], 9.0);
        assert_eq!(value["workclass"], "Private");
        assert!(value.get("marital_status").is_none());
    }

    #[test]
    fn test_unknown_category_fails_deserialization() {
        let mut value = serde_json::to_value(sample_record()).unwrap();
        value["workclass"] = json!("Self-employed");
        assert!(serde_json::from_value::<UserFeatureRecord>(value).is_err());
    }

    #[test]
    fn test_feedback_record_flattens_features() {
        let feedback = FeedbackRecord {
            features: sample_record(),
            task_id: "abc-123".to_string(),
            income: Income::AtMostFiftyK,
        };
        assert!(feedback.validate().is_ok());

        let value = serde_json::to_value(&feedback).unwrap();
        assert_eq!(value["age"], 39.0);
        assert_eq!(value["task_id"], "abc-123");
        assert_eq!(value["income"], "<=50K");
    }
}
