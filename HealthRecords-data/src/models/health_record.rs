use std::fmt;

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Name of the collection (or table) holding health record documents
pub const HEALTH_RECORDS_COLLECTION: &str = "healthrecords";

/// A single vital-sign reading.
///
/// Readings arrive either as JSON numbers (`70`, `36.5`) or as strings
/// (`"120/80"`) and are stored exactly as received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Measurement {
    /// Numeric reading, integer or floating point
    Number(serde_json::Number),
    /// Free-form reading such as a blood pressure pair
    Text(String),
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Measurement::Number(n) => write!(f, "{}", n),
            Measurement::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Measurement {
    fn from(value: i64) -> Self {
        Measurement::Number(value.into())
    }
}

impl From<&str> for Measurement {
    fn from(value: &str) -> Self {
        Measurement::Text(value.to_string())
    }
}

/// Storage model for a health record document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthRecordDocument {
    /// Document identifier assigned on insert
    #[serde(rename = "_id")]
    pub id: ObjectId,

    /// Patient the record belongs to; several records may share it
    pub patient_id: String,

    pub height: Measurement,
    pub weight: Measurement,
    pub heart_rate: Measurement,
    pub blood_pressure: Measurement,
    pub blood_sugar: Measurement,
    pub body_temperature: Measurement,
    pub pulse: Measurement,
    pub oxygen_saturation: Measurement,

    /// Free-text notes, empty when none were given
    #[serde(default)]
    pub additional_notes: String,

    /// Current medications, empty when none were given
    #[serde(default)]
    pub medications: Vec<String>,

    /// RFC 3339 timestamp of when the document was inserted
    pub created_at: String,
}

/// Input data for inserting a new health record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewHealthRecord {
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
}

impl HealthRecordDocument {
    /// Build a document from insert data, assigning a fresh id and timestamp
    pub fn from_new(record: NewHealthRecord) -> Self {
        Self {
            id: ObjectId::new(),
            patient_id: record.patient_id,
            height: record.height,
            weight: record.weight,
            heart_rate: record.heart_rate,
            blood_pressure: record.blood_pressure,
            blood_sugar: record.blood_sugar,
            body_temperature: record.body_temperature,
            pulse: record.pulse,
            oxygen_saturation: record.oxygen_saturation,
            additional_notes: record.additional_notes,
            medications: record.medications,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    pub(crate) fn sample_new_record(patient_id: &str) -> NewHealthRecord {
        NewHealthRecord {
            patient_id: patient_id.to_string(),
            height: Measurement::from(170_i64),
            weight: Measurement::from(65_i64),
            heart_rate: Measurement::from(70_i64),
            blood_pressure: "120/80".into(),
            blood_sugar: Measurement::from(90_i64),
            body_temperature: Measurement::Number(serde_json::Number::from_f64(36.5).unwrap()),
            pulse: Measurement::from(70_i64),
            oxygen_saturation: Measurement::from(98_i64),
            additional_notes: String::new(),
            medications: Vec::new(),
        }
    }

    #[test]
    fn test_measurement_keeps_json_shape() {
        let number: Measurement = serde_json::from_value(json!(170)).unwrap();
        let float: Measurement = serde_json::from_value(json!(36.5)).unwrap();
        let text: Measurement = serde_json::from_value(json!("120/80")).unwrap();

        assert_eq!(serde_json::to_value(&number).unwrap(), json!(170));
        assert_eq!(serde_json::to_value(&float).unwrap(), json!(36.5));
        assert_eq!(text, Measurement::Text("120/80".to_string()));
        assert_eq!(text.to_string(), "120/80");
    }

    #[test]
    fn test_document_uses_camel_case_field_names() {
        let document = HealthRecordDocument::from_new(sample_new_record("p1"));
        let value = serde_json::to_value(&document).unwrap();

        assert_eq!(value["patientId"], "p1");
        assert_eq!(value["bloodPressure"], "120/80");
        assert_eq!(value["oxygenSaturation"], 98);
        assert_eq!(value["additionalNotes"], "");
        assert_eq!(value["medications"], json!([]));
        assert!(value.get("_id").is_some());
        assert!(value.get("createdAt").is_some());
    }

    #[test]
    fn test_document_round_trips_through_bson() {
        let document = HealthRecordDocument::from_new(sample_new_record("p2"));
        let bson = mongodb::bson::to_document(&document).unwrap();

        assert_eq!(bson.get_str("patientId").unwrap(), "p2");
        assert!(bson.get_object_id("_id").is_ok());

        let decoded: HealthRecordDocument = mongodb::bson::from_document(bson).unwrap();
        assert_eq!(decoded, document);
    }
}
