//! Patient record schema
//!
//! **CRITICAL: This file controls the feature schema**
//!
//! `FEATURE_LAYOUT` is the single source of truth for feature ordering.
//! The scaler artifact serializes the same list and the loader rejects any
//! artifact pair whose order disagrees with this one. Changing the order
//! here without retraining the artifacts silently corrupts predictions.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Feature names in the exact order used at training time
pub const FEATURE_LAYOUT: &[&str] = &[
    "age",      // 0: Age in years
    "sex",      // 1: Sex (1 = male, 0 = female)
    "cp",       // 2: Chest pain type (1-4)
    "trestbps", // 3: Resting blood pressure (mm Hg)
    "chol",     // 4: Serum cholesterol (mg/dl)
    "fbs",      // 5: Fasting blood sugar > 120 mg/dl (1 = true, 0 = false)
    "restecg",  // 6: Resting ECG results (0-2)
    "thalach",  // 7: Maximum heart rate achieved
    "exang",    // 8: Exercise induced angina (1 = yes, 0 = no)
    "oldpeak",  // 9: ST depression induced by exercise
    "slope",    // 10: Slope of peak exercise ST segment (1-3)
    "ca",       // 11: Number of major vessels colored by fluoroscopy (0-3)
    "thal",     // 12: Thalassemia (3 = normal, 6 = fixed, 7 = reversible)
];

/// Total number of features
/// IMPORTANT: Must match FEATURE_LAYOUT.len()!
pub const FEATURE_COUNT: usize = 13;

/// Get feature index by name (O(n) but features are few)
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_LAYOUT.iter().position(|&n| n == name)
}

/// Get feature name by index
pub fn feature_name(index: usize) -> Option<&'static str> {
    FEATURE_LAYOUT.get(index).copied()
}

/// Validation failure for a single inbound record.
///
/// These are client errors: reported immediately, never retried, never
/// silently defaulted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("patient record must be a JSON object, got {got}")]
    NotAnObject { got: &'static str },

    #[error("missing field `{0}`")]
    MissingField(String),

    #[error("field `{field}` has wrong type: expected {expected}, got {got}")]
    WrongType {
        field: String,
        expected: &'static str,
        got: &'static str,
    },
}

/// One inference input: thirteen required numeric fields.
///
/// Values are passed through as given. The serving path enforces presence
/// and numeric type only; the model is the sole arbiter of valid ranges.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatientRecord {
    pub age: f64,
    pub sex: f64,
    pub cp: f64,
    pub trestbps: f64,
    pub chol: f64,
    pub fbs: f64,
    pub restecg: f64,
    pub thalach: f64,
    pub exang: f64,
    pub oldpeak: f64,
    pub slope: f64,
    pub ca: f64,
    pub thal: f64,
}

impl PatientRecord {
    /// Build a record from raw values in FEATURE_LAYOUT order.
    pub fn from_values(v: [f64; FEATURE_COUNT]) -> Self {
        Self {
            age: v[0],
            sex: v[1],
            cp: v[2],
            trestbps: v[3],
            chol: v[4],
            fbs: v[5],
            restecg: v[6],
            thalach: v[7],
            exang: v[8],
            oldpeak: v[9],
            slope: v[10],
            ca: v[11],
            thal: v[12],
        }
    }

    /// Raw values in FEATURE_LAYOUT order.
    pub fn values(&self) -> [f64; FEATURE_COUNT] {
        [
            self.age,
            self.sex,
            self.cp,
            self.trestbps,
            self.chol,
            self.fbs,
            self.restecg,
            self.thalach,
            self.exang,
            self.oldpeak,
            self.slope,
            self.ca,
            self.thal,
        ]
    }

    /// Get a field by feature name.
    pub fn get(&self, name: &str) -> Option<f64> {
        match name {
            "age" => Some(self.age),
            "sex" => Some(self.sex),
            "cp" => Some(self.cp),
            "trestbps" => Some(self.trestbps),
            "chol" => Some(self.chol),
            "fbs" => Some(self.fbs),
            "restecg" => Some(self.restecg),
            "thalach" => Some(self.thalach),
            "exang" => Some(self.exang),
            "oldpeak" => Some(self.oldpeak),
            "slope" => Some(self.slope),
            "ca" => Some(self.ca),
            "thal" => Some(self.thal),
            _ => None,
        }
    }

    /// Validate a raw JSON value into a fully-typed record.
    ///
    /// All thirteen fields must be present and carry JSON numbers. Unknown
    /// extra fields are ignored. No record is partially constructed: the
    /// first offending field aborts validation.
    pub fn validate(raw: &Value) -> Result<Self, ValidationError> {
        let obj = raw.as_object().ok_or(ValidationError::NotAnObject {
            got: json_type_name(raw),
        })?;

        let mut values = [0.0f64; FEATURE_COUNT];
        for (i, name) in FEATURE_LAYOUT.iter().enumerate() {
            let field = obj
                .get(*name)
                .ok_or_else(|| ValidationError::MissingField((*name).to_string()))?;
            values[i] = field.as_f64().ok_or_else(|| ValidationError::WrongType {
                field: (*name).to_string(),
                expected: "number",
                got: json_type_name(field),
            })?;
        }

        Ok(Self::from_values(values))
    }

    /// Validate every element of a batch independently.
    ///
    /// One bad record must not abort validation of its siblings; the result
    /// preserves the positional correspondence with the input.
    pub fn validate_batch(raw: &[Value]) -> Vec<Result<Self, ValidationError>> {
        raw.iter().map(Self::validate).collect()
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
