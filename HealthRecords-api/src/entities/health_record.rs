use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use health_records_domain::entities::Measurement;

/// Public representation of a stored health record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthRecord {
    /// Unique identifier assigned on insert (24 hex characters)
    #[serde(rename = "_id")]
    #[schema(example = "6650c3a9e4b0a1f2c3d4e5f6")]
    pub id: String,

    /// Patient the record belongs to
    #[schema(example = "p1")]
    pub patient_id: String,

    /// Height reading, number or string
    #[schema(value_type = Object, example = 170)]
    pub height: Measurement,

    /// Weight reading, number or string
    #[schema(value_type = Object, example = 65)]
    pub weight: Measurement,

    /// Heart rate reading, number or string
    #[schema(value_type = Object, example = 70)]
    pub heart_rate: Measurement,

    /// Blood pressure reading, number or string
    #[schema(value_type = Object, example = "120/80")]
    pub blood_pressure: Measurement,

    /// Blood sugar reading, number or string
    #[schema(value_type = Object, example = 90)]
    pub blood_sugar: Measurement,

    /// Body temperature reading, number or string
    #[schema(value_type = Object, example = 36.5)]
    pub body_temperature: Measurement,

    /// Pulse reading, number or string
    #[schema(value_type = Object, example = 70)]
    pub pulse: Measurement,

    /// Oxygen saturation reading, number or string
    #[schema(value_type = Object, example = 98)]
    pub oxygen_saturation: Measurement,

    /// Free-text notes, empty when none were given
    pub additional_notes: String,

    /// Current medications, empty when none were given
    pub medications: Vec<String>,

    /// When the record was created (RFC 3339)
    pub created_at: String,
}

/// Request payload for creating a new health record.
///
/// The nine measurement fields and `patientId` must be present and truthy:
/// `0`, `""`, `false` and `null` are treated as missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateHealthRecordRequest {
    #[schema(value_type = Object, example = "p1")]
    pub patient_id: Option<Value>,

    #[schema(value_type = Object, example = 170)]
    pub height: Option<Value>,

    #[schema(value_type = Object, example = 65)]
    pub weight: Option<Value>,

    #[schema(value_type = Object, example = 70)]
    pub heart_rate: Option<Value>,

    #[schema(value_type = Object, example = "120/80")]
    pub blood_pressure: Option<Value>,

    #[schema(value_type = Object, example = 90)]
    pub blood_sugar: Option<Value>,

    #[schema(value_type = Object, example = 36.5)]
    pub body_temperature: Option<Value>,

    #[schema(value_type = Object, example = 70)]
    pub pulse: Option<Value>,

    #[schema(value_type = Object, example = 98)]
    pub oxygen_saturation: Option<Value>,

    /// Optional notes; defaults to an empty string
    #[schema(value_type = Option<String>)]
    pub additional_notes: Option<Value>,

    /// Optional medications; defaults to an empty list
    #[schema(value_type = Option<Vec<String>>)]
    pub medications: Option<Value>,
}

/// Response body for a single record lookup
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthRecordResponse {
    pub record: HealthRecord,
}

/// Response body for the full collection
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthRecordListResponse {
    pub records: Vec<HealthRecord>,
}

/// Response body after a record is created
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreatedHealthRecordResponse {
    #[schema(example = "Health record created successfully.")]
    pub message: String,
    pub record: HealthRecord,
}
