use serde_json::Value;

use health_records_data::models::{HealthRecordDocument, NewHealthRecord};
use crate::entities::health_record::{is_truthy, CreateHealthRecordRequest, HealthRecord, Measurement};

// Conversion functions between domain entities and data models
// These functions follow the pattern convert_to_[target_layer]_[model_name]

/// Convert from data model to domain entity for a stored health record
pub fn convert_to_domain_record(document: HealthRecordDocument) -> HealthRecord {
    HealthRecord {
        id: document.id.to_hex(),
        patient_id: document.patient_id,
        height: document.height,
        weight: document.weight,
        heart_rate: document.heart_rate,
        blood_pressure: document.blood_pressure,
        blood_sugar: document.blood_sugar,
        body_temperature: document.body_temperature,
        pulse: document.pulse,
        oxygen_saturation: document.oxygen_saturation,
        additional_notes: document.additional_notes,
        medications: document.medications,
        created_at: document.created_at,
    }
}

/// Convert a validated create request into insert data.
///
/// Optional fields default when falsy. Values whose JSON type cannot be held
/// by the record field are rejected with a description of the field.
pub fn convert_to_data_new_record(request: CreateHealthRecordRequest) -> Result<NewHealthRecord, String> {
    Ok(NewHealthRecord {
        patient_id: cast_string("patientId", required("patientId", request.patient_id)?)?,
        height: cast_measurement("height", required("height", request.height)?)?,
        weight: cast_measurement("weight", required("weight", request.weight)?)?,
        heart_rate: cast_measurement("heartRate", required("heartRate", request.heart_rate)?)?,
        blood_pressure: cast_measurement("bloodPressure", required("bloodPressure", request.blood_pressure)?)?,
        blood_sugar: cast_measurement("bloodSugar", required("bloodSugar", request.blood_sugar)?)?,
        body_temperature: cast_measurement("bodyTemperature", required("bodyTemperature", request.body_temperature)?)?,
        pulse: cast_measurement("pulse", required("pulse", request.pulse)?)?,
        oxygen_saturation: cast_measurement(
            "oxygenSaturation",
            required("oxygenSaturation", request.oxygen_saturation)?,
        )?,
        additional_notes: match request.additional_notes {
            Some(value) if is_truthy(&value) => cast_string("additionalNotes", value)?,
            _ => String::new(),
        },
        medications: match request.medications {
            Some(value) if is_truthy(&value) => cast_string_list("medications", value)?,
            _ => Vec::new(),
        },
    })
}

fn required(field: &str, value: Option<Value>) -> Result<Value, String> {
    value.ok_or_else(|| format!("{} is required", field))
}

fn cast_measurement(field: &str, value: Value) -> Result<Measurement, String> {
    match value {
        Value::Number(n) => Ok(Measurement::Number(n)),
        Value::String(s) => Ok(Measurement::Text(s)),
        other => Err(format!("Cast to number or string failed for {}: {}", field, other)),
    }
}

fn cast_string(field: &str, value: Value) -> Result<String, String> {
    match value {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(format!("Cast to string failed for {}: {}", field, other)),
    }
}

fn cast_string_list(field: &str, value: Value) -> Result<Vec<String>, String> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| cast_string(field, item))
            .collect(),
        // A single scalar becomes a one-element list
        scalar => Ok(vec![cast_string(field, scalar)?]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request_from(value: Value) -> CreateHealthRecordRequest {
        serde_json::from_value(value).unwrap()
    }

    fn complete_body() -> Value {
        json!({
            "patientId": "p1",
            "height": 170,
            "weight": 65,
            "heartRate": 70,
            "bloodPressure": "120/80",
            "bloodSugar": 90,
            "bodyTemperature": 36.5,
            "pulse": 70,
            "oxygenSaturation": 98
        })
    }

    #[test]
    fn test_convert_to_data_new_record_defaults_optional_fields() {
        let record = convert_to_data_new_record(request_from(complete_body())).unwrap();

        assert_eq!(record.patient_id, "p1");
        assert_eq!(record.height, Measurement::from(170_i64));
        assert_eq!(record.blood_pressure, Measurement::from("120/80"));
        assert_eq!(serde_json::to_value(&record.body_temperature).unwrap(), json!(36.5));
        assert_eq!(record.additional_notes, "");
        assert!(record.medications.is_empty());
    }

    #[test]
    fn test_optional_fields_are_cast() {
        let mut body = complete_body();
        body["patientId"] = json!(42);
        body["additionalNotes"] = json!(7);
        body["medications"] = json!("aspirin");

        let record = convert_to_data_new_record(request_from(body)).unwrap();
        assert_eq!(record.patient_id, "42");
        assert_eq!(record.additional_notes, "7");
        assert_eq!(record.medications, vec!["aspirin".to_string()]);

        let mut body = complete_body();
        body["medications"] = json!(["aspirin", 5]);
        body["additionalNotes"] = json!(false);

        let record = convert_to_data_new_record(request_from(body)).unwrap();
        assert_eq!(record.medications, vec!["aspirin".to_string(), "5".to_string()]);
        assert_eq!(record.additional_notes, "");
    }

    #[test]
    fn test_uncastable_values_are_rejected() {
        let mut body = complete_body();
        body["height"] = json!({ "cm": 170 });
        let err = convert_to_data_new_record(request_from(body)).unwrap_err();
        assert!(err.contains("height"));

        let mut body = complete_body();
        body["pulse"] = json!(true);
        assert!(convert_to_data_new_record(request_from(body)).is_err());

        let mut body = complete_body();
        body["medications"] = json!([["nested"]]);
        assert!(convert_to_data_new_record(request_from(body)).is_err());
    }

    #[test]
    fn test_convert_to_domain_record() {
        let new_record = convert_to_data_new_record(request_from(complete_body())).unwrap();
        let document = HealthRecordDocument::from_new(new_record);

        let record = convert_to_domain_record(document.clone());

        assert_eq!(record.id, document.id.to_hex());
        assert_eq!(record.id.len(), 24);
        assert_eq!(record.patient_id, document.patient_id);
        assert_eq!(record.oxygen_saturation, document.oxygen_saturation);
        assert_eq!(record.created_at, document.created_at);
    }
}
