use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::{Validate, ValidationError};

pub use health_records_data::models::Measurement;

/// Domain entity for a stored health record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthRecord {
    /// Unique identifier, 24 hex characters
    pub id: String,
    pub patient_id: String,
    pub height: Measurement,
    pub weight: Measurement,
    pub heart_rate: Measurement,
    pub blood_pressure: Measurement,
    pub blood_sugar: Measurement,
    pub body_temperature: Measurement,
    pub pulse: Measurement,
    pub oxygen_saturation: Measurement,
    pub additional_notes: String,
    pub medications: Vec<String>,
    /// RFC 3339 creation timestamp
    pub created_at: String,
}

/// Request to create a new health record.
///
/// Fields hold the raw JSON values from the request body. A required field
/// passes validation only when it is present and truthy, so `0`, `""`,
/// `false` and `null` all count as missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateHealthRecordRequest {
    #[validate(required, custom = "validate_truthy")]
    pub patient_id: Option<Value>,

    #[validate(required, custom = "validate_truthy")]
    pub height: Option<Value>,

    #[validate(required, custom = "validate_truthy")]
    pub weight: Option<Value>,

    #[validate(required, custom = "validate_truthy")]
    pub heart_rate: Option<Value>,

    #[validate(required, custom = "validate_truthy")]
    pub blood_pressure: Option<Value>,

    #[validate(required, custom = "validate_truthy")]
    pub blood_sugar: Option<Value>,

    #[validate(required, custom = "validate_truthy")]
    pub body_temperature: Option<Value>,

    #[validate(required, custom = "validate_truthy")]
    pub pulse: Option<Value>,

    #[validate(required, custom = "validate_truthy")]
    pub oxygen_saturation: Option<Value>,

    /// Optional notes; falsy values are stored as an empty string
    pub additional_notes: Option<Value>,

    /// Optional medications; falsy values are stored as an empty list
    pub medications: Option<Value>,
}

/// JSON truthiness: `null`, `false`, zero and the empty string are falsy.
/// Every other value, including empty arrays and objects, is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn validate_truthy(value: &Value) -> Result<(), ValidationError> {
    if is_truthy(value) {
        Ok(())
    } else {
        let mut error = ValidationError::new("truthy");
        error.message = Some(Cow::from("must not be empty, zero or false"));
        Err(error)
    }
}
