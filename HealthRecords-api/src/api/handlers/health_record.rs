use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use tracing::{error, info, instrument, warn};

use health_records_domain::entities::health_record::{
    CreateHealthRecordRequest as DomainCreateRequest, HealthRecord as DomainHealthRecord,
};
use health_records_domain::services::{
    create_default_health_record_service, HealthRecordServiceError, HealthRecordServiceTrait,
};
use health_records_data::database::DatabaseGateway;

use crate::api::error::ApiError;
use crate::entities::common::ErrorResponse;
use crate::entities::health_record::{
    CreateHealthRecordRequest, CreatedHealthRecordResponse, HealthRecord, HealthRecordListResponse,
    HealthRecordResponse,
};

/// Message sent with a newly created record
pub const CREATED_MESSAGE: &str = "Health record created successfully.";

/// Service type for dependency injection
pub type HealthRecordService = Arc<dyn HealthRecordServiceTrait + Send + Sync>;

/// Create the default service for the handlers to use
pub fn create_service(gateway: Arc<DatabaseGateway>) -> HealthRecordService {
    Arc::new(create_default_health_record_service(gateway))
}

/// Get every health record
#[utoipa::path(
    get,
    path = "/healthRecord-mongodb",
    responses(
        (status = 200, description = "All health records", body = HealthRecordListResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    ),
    tag = "health_records"
)]
pub async fn get_health_records(
    State(service): State<HealthRecordService>,
) -> Result<Response, ApiError> {
    fetch_health_records(service, None).await
}

/// Get the first health record stored for a patient
#[utoipa::path(
    get,
    path = "/healthRecord-mongodb/{id}",
    params(
        ("id" = String, Path, description = "Patient identifier")
    ),
    responses(
        (status = 200, description = "Health record found", body = HealthRecordResponse),
        (status = 404, description = "No record for this patient", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    ),
    tag = "health_records"
)]
pub async fn get_health_record(
    State(service): State<HealthRecordService>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    fetch_health_records(service, Some(id)).await
}

/// Fetch one record by patient identifier, or the whole collection when
/// no identifier is given
#[instrument(skip(service))]
pub async fn fetch_health_records(
    service: HealthRecordService,
    patient_id: Option<String>,
) -> Result<Response, ApiError> {
    match patient_id {
        Some(patient_id) => {
            info!("Fetching health record for patient: {}", patient_id);

            match service.get_record_by_patient_id(&patient_id).await {
                Ok(record) => {
                    let response = HealthRecordResponse { record: convert_to_public_record(record) };
                    Ok((StatusCode::OK, Json(response)).into_response())
                }
                Err(HealthRecordServiceError::NotFound(_)) => {
                    info!("Health record not found for patient: {}", patient_id);
                    Err(ApiError::NotFound)
                }
                Err(e) => {
                    error!("Error fetching health records: {}", e);
                    Err(ApiError::FetchFailed)
                }
            }
        }
        None => {
            info!("Fetching all health records");

            match service.get_all_records().await {
                Ok(records) => {
                    let response = HealthRecordListResponse {
                        records: records.into_iter().map(convert_to_public_record).collect(),
                    };
                    Ok((StatusCode::OK, Json(response)).into_response())
                }
                Err(e) => {
                    error!("Error fetching health records: {}", e);
                    Err(ApiError::FetchFailed)
                }
            }
        }
    }
}

/// Create a new health record
#[utoipa::path(
    post,
    path = "/healthRecord-mongodb",
    request_body = CreateHealthRecordRequest,
    responses(
        (status = 201, description = "Health record created", body = CreatedHealthRecordResponse),
        (status = 400, description = "A required field is missing", body = ErrorResponse),
        (status = 500, description = "Malformed body or storage failure", body = ErrorResponse),
    ),
    tag = "health_records"
)]
#[instrument(skip(service, body))]
pub async fn create_health_record(
    State(service): State<HealthRecordService>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    info!("Creating new health record");

    let request = parse_create_request(&body)?;

    match service.create_record(convert_to_domain_request(request)).await {
        Ok(record) => {
            info!("Health record created with ID: {}", record.id);
            let response = CreatedHealthRecordResponse {
                message: CREATED_MESSAGE.to_string(),
                record: convert_to_public_record(record),
            };
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(HealthRecordServiceError::ValidationError(msg)) => {
            warn!("Rejected health record: {}", msg);
            Err(ApiError::MissingFields)
        }
        Err(e) => {
            error!("Error creating health record: {}", e);
            Err(ApiError::CreateFailed)
        }
    }
}

/// Parse a create body.
///
/// Malformed JSON and a literal `null` are operational failures. Any other
/// non-object JSON carries no fields, so it yields an empty request that
/// fails validation.
fn parse_create_request(body: &[u8]) -> Result<CreateHealthRecordRequest, ApiError> {
    let value: Value = serde_json::from_slice(body).map_err(|e| {
        error!("Error creating health record: invalid JSON body: {}", e);
        ApiError::CreateFailed
    })?;

    match value {
        Value::Null => {
            error!("Error creating health record: request body is null");
            Err(ApiError::CreateFailed)
        }
        Value::Object(_) => serde_json::from_value(value).map_err(|e| {
            error!("Error creating health record: {}", e);
            ApiError::CreateFailed
        }),
        _ => Ok(CreateHealthRecordRequest::default()),
    }
}

// Convert public request to domain request
fn convert_to_domain_request(request: CreateHealthRecordRequest) -> DomainCreateRequest {
    DomainCreateRequest {
        patient_id: request.patient_id,
        height: request.height,
        weight: request.weight,
        heart_rate: request.heart_rate,
        blood_pressure: request.blood_pressure,
        blood_sugar: request.blood_sugar,
        body_temperature: request.body_temperature,
        pulse: request.pulse,
        oxygen_saturation: request.oxygen_saturation,
        additional_notes: request.additional_notes,
        medications: request.medications,
    }
}

// Convert domain record to public record
fn convert_to_public_record(record: DomainHealthRecord) -> HealthRecord {
    HealthRecord {
        id: record.id,
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
        created_at: record.created_at,
    }
}
