// Demographic/lifestyle questionnaire and its JSON coercion rules.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::MoodSignalError;

/// Numeric fields in the order the demographic model was trained on.
pub const NUMERIC_FIELDS: [&str; 7] = [
    "age",
    "academic_pressure",
    "work_pressure",
    "study_satisfaction",
    "job_satisfaction",
    "work_study_hours",
    "financial_stress",
];

/// Categorical fields in the order the fitted encoder expects. Reordering
/// breaks the encoder contract.
pub const CATEGORICAL_FIELDS: [&str; 7] = [
    "gender",
    "profession",
    "sleep_duration",
    "dietary_habits",
    "degree",
    "suicidal_thoughts",
    "family_history",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Questionnaire {
    pub age: i64,
    pub gender: String,
    pub profession: String,
    pub academic_pressure: f64,
    pub work_pressure: f64,
    pub study_satisfaction: f64,
    pub job_satisfaction: f64,
    pub sleep_duration: String,
    pub dietary_habits: String,
    pub degree: String,
    pub suicidal_thoughts: String,
    pub work_study_hours: f64,
    pub financial_stress: f64,
    pub family_history: String,
}

impl Questionnaire {
    /// Coerce a submitted JSON object into a typed questionnaire.
    ///
    /// Numeric fields accept numbers or numeric strings; `age` must be an
    /// integer (a fractional JSON number is truncated, a fractional string is
    /// rejected). Categorical fields must be strings. Extra keys are ignored.
    pub fn from_json(value: &Value) -> Result<Self, MoodSignalError> {
        let obj = value
            .as_object()
            .ok_or_else(|| MoodSignalError::Validation("Request body must be a JSON object".into()))?;

        Ok(Self {
            gender: text_field(obj, "gender")?,
            profession: text_field(obj, "profession")?,
            sleep_duration: text_field(obj, "sleep_duration")?,
            dietary_habits: text_field(obj, "dietary_habits")?,
            degree: text_field(obj, "degree")?,
            suicidal_thoughts: text_field(obj, "suicidal_thoughts")?,
            family_history: text_field(obj, "family_history")?,
            age: integer_field(obj, "age")?,
            academic_pressure: float_field(obj, "academic_pressure")?,
            work_pressure: float_field(obj, "work_pressure")?,
            study_satisfaction: float_field(obj, "study_satisfaction")?,
            job_satisfaction: float_field(obj, "job_satisfaction")?,
            work_study_hours: float_field(obj, "work_study_hours")?,
            financial_stress: float_field(obj, "financial_stress")?,
        })
    }

    /// Numeric features in [`NUMERIC_FIELDS`] order.
    pub fn numeric_features(&self) -> [f64; 7] {
        [
            self.age as f64,
            self.academic_pressure,
            self.work_pressure,
            self.study_satisfaction,
            self.job_satisfaction,
            self.work_study_hours,
            self.financial_stress,
        ]
    }

    /// Categorical answers in [`CATEGORICAL_FIELDS`] order.
    pub fn categorical_values(&self) -> [&str; 7] {
        [
            self.gender.as_str(),
            self.profession.as_str(),
            self.sleep_duration.as_str(),
            self.dietary_habits.as_str(),
            self.degree.as_str(),
            self.suicidal_thoughts.as_str(),
            self.family_history.as_str(),
        ]
    }
}

fn required<'a>(obj: &'a Map<String, Value>, name: &str) -> Result<&'a Value, MoodSignalError> {
    match obj.get(name) {
        None | Some(Value::Null) => Err(MoodSignalError::MissingField(name.to_string())),
        Some(v) => Ok(v),
    }
}

fn text_field(obj: &Map<String, Value>, name: &str) -> Result<String, MoodSignalError> {
    match required(obj, name)? {
        Value::String(s) => Ok(s.trim().to_string()),
        other => Err(MoodSignalError::invalid(name, format!("expected a string, got {other}"))),
    }
}

fn float_field(obj: &Map<String, Value>, name: &str) -> Result<f64, MoodSignalError> {
    let parsed = match required(obj, name)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(MoodSignalError::invalid(name, "expected a number")),
    }
}

fn integer_field(obj: &Map<String, Value>, name: &str) -> Result<i64, MoodSignalError> {
    let parsed = match required(obj, name)? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    parsed.ok_or_else(|| MoodSignalError::invalid(name, "expected an integer"))
}
