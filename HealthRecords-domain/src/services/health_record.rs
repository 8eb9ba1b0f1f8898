use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{error, info};
use validator::{Validate, ValidationErrors};

use crate::entities::conversions;
use crate::entities::health_record::{CreateHealthRecordRequest, HealthRecord};
use health_records_data::database::DatabaseGateway;
use health_records_data::repository::{HealthRecordRepository, HealthRecordRepositoryTrait, RepositoryError};

/// Health record service errors
#[derive(Debug, Error)]
pub enum HealthRecordServiceError {
    /// A required field is missing or falsy
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// No record for the requested patient
    #[error("Record not found: {0}")]
    NotFound(String),

    /// A field value cannot be stored in the record
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// Repository error
    #[error("Repository error: {0}")]
    RepositoryError(String),
}

/// Trait for health record service operations
#[async_trait]
pub trait HealthRecordServiceTrait {
    /// Validate a create health record request
    fn validate_create_request(&self, request: &CreateHealthRecordRequest) -> Result<(), HealthRecordServiceError>;

    /// Create a new health record
    async fn create_record(&self, request: CreateHealthRecordRequest) -> Result<HealthRecord, HealthRecordServiceError>;

    /// Get all health records
    async fn get_all_records(&self) -> Result<Vec<HealthRecord>, HealthRecordServiceError>;

    /// Get the first health record stored for a patient
    async fn get_record_by_patient_id(&self, patient_id: &str) -> Result<HealthRecord, HealthRecordServiceError>;
}

/// Validate a create request, flattening field errors into one message
pub fn validate_request(request: &CreateHealthRecordRequest) -> Result<(), HealthRecordServiceError> {
    request
        .validate()
        .map_err(|errors| HealthRecordServiceError::ValidationError(format_validation_errors(&errors)))
}

fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut messages = errors
        .field_errors()
        .iter()
        .map(|(field, errors)| {
            let error_msgs: Vec<String> = errors
                .iter()
                .map(|err| match &err.message {
                    Some(msg) => msg.to_string(),
                    None => "is required".to_string(),
                })
                .collect();
            format!("{}: {}", field, error_msgs.join(", "))
        })
        .collect::<Vec<String>>();

    // Field order from the validator is unspecified
    messages.sort();
    messages.join("; ")
}

/// Health record service for domain logic
pub struct HealthRecordService<R: HealthRecordRepositoryTrait> {
    repository: R,
}

impl<R: HealthRecordRepositoryTrait> HealthRecordService<R> {
    /// Create a new health record service
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Map repository errors to service errors
    fn map_repo_error(&self, err: RepositoryError) -> HealthRecordServiceError {
        error!("Health record repository failure: {}", err);
        HealthRecordServiceError::RepositoryError(err.to_string())
    }
}

#[async_trait]
impl<R: HealthRecordRepositoryTrait + Send + Sync> HealthRecordServiceTrait for HealthRecordService<R> {
    fn validate_create_request(&self, request: &CreateHealthRecordRequest) -> Result<(), HealthRecordServiceError> {
        validate_request(request)
    }

    async fn create_record(&self, request: CreateHealthRecordRequest) -> Result<HealthRecord, HealthRecordServiceError> {
        self.validate_create_request(&request)?;

        let new_record = conversions::convert_to_data_new_record(request)
            .map_err(HealthRecordServiceError::InvalidRecord)?;

        let document = self.repository.insert(new_record)
            .await
            .map_err(|e| self.map_repo_error(e))?;

        info!(id = %document.id, patient_id = %document.patient_id, "Health record created");
        Ok(conversions::convert_to_domain_record(document))
    }

    async fn get_all_records(&self) -> Result<Vec<HealthRecord>, HealthRecordServiceError> {
        let documents = self.repository.find_all()
            .await
            .map_err(|e| self.map_repo_error(e))?;

        Ok(documents.into_iter().map(conversions::convert_to_domain_record).collect())
    }

    async fn get_record_by_patient_id(&self, patient_id: &str) -> Result<HealthRecord, HealthRecordServiceError> {
        let document = self.repository.find_by_patient_id(patient_id)
            .await
            .map_err(|e| self.map_repo_error(e))?
            .ok_or_else(|| HealthRecordServiceError::NotFound(
                format!("No health record for patient {}", patient_id)
            ))?;

        Ok(conversions::convert_to_domain_record(document))
    }
}

/// Create the health record service backed by the shared database gateway
pub fn create_default_health_record_service(
    gateway: Arc<DatabaseGateway>,
) -> impl HealthRecordServiceTrait + Send + Sync {
    HealthRecordService::new(HealthRecordRepository::new(gateway))
}

#[cfg(test)]
mod tests {
    use super::*;
    use health_records_data::database::DatabaseError;
    use health_records_data::models::{HealthRecordDocument, NewHealthRecord};
    use health_records_data::repository::tests::MockHealthRecordRepository;
    use mockall::mock;
    use serde_json::json;

    mock! {
        pub Repo {}

        #[async_trait]
        impl HealthRecordRepositoryTrait for Repo {
            async fn insert(&self, record: NewHealthRecord) -> Result<HealthRecordDocument, RepositoryError>;
            async fn find_by_patient_id(&self, patient_id: &str) -> Result<Option<HealthRecordDocument>, RepositoryError>;
            async fn find_all(&self) -> Result<Vec<HealthRecordDocument>, RepositoryError>;
        }
    }

    fn valid_request(patient_id: &str) -> CreateHealthRecordRequest {
        serde_json::from_value(json!({
            "patientId": patient_id,
            "height": 170,
            "weight": 65,
            "heartRate": 70,
            "bloodPressure": "120/80",
            "bloodSugar": 90,
            "bodyTemperature": 36.5,
            "pulse": 70,
            "oxygenSaturation": 98
        }))
        .unwrap()
    }

    fn stored_document(patient_id: &str) -> HealthRecordDocument {
        let new_record = conversions::convert_to_data_new_record(valid_request(patient_id)).unwrap();
        HealthRecordDocument::from_new(new_record)
    }

    #[test]
    fn test_validate_create_request_valid() {
        let service = HealthRecordService::new(MockHealthRecordRepository::new());
        assert!(service.validate_create_request(&valid_request("p1")).is_ok());
    }

    #[test]
    fn test_validate_create_request_reports_every_missing_field() {
        let service = HealthRecordService::new(MockHealthRecordRepository::new());
        let mut request = valid_request("p1");
        request.pulse = None;
        request.blood_sugar = Some(json!(0));

        let err = service.validate_create_request(&request).unwrap_err();
        match err {
            HealthRecordServiceError::ValidationError(msg) => {
                assert!(msg.contains("pulse"), "unexpected message: {}", msg);
                assert!(msg.contains("blood_sugar"), "unexpected message: {}", msg);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_record_inserts_and_converts() {
        let mut repo = MockRepo::new();
        repo.expect_insert()
            .times(1)
            .returning(|record| Ok(HealthRecordDocument::from_new(record)));

        let service = HealthRecordService::new(repo);
        let record = service.create_record(valid_request("p1")).await.unwrap();

        assert_eq!(record.patient_id, "p1");
        assert_eq!(record.id.len(), 24);
        assert_eq!(record.additional_notes, "");
        assert!(record.medications.is_empty());
    }

    #[tokio::test]
    async fn test_create_record_validation_failure_skips_insert() {
        let mut repo = MockRepo::new();
        repo.expect_insert().never();

        let service = HealthRecordService::new(repo);
        let mut request = valid_request("p1");
        request.pulse = None;

        let result = service.create_record(request).await;
        assert!(matches!(result, Err(HealthRecordServiceError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_create_record_rejects_uncastable_value() {
        let mut repo = MockRepo::new();
        repo.expect_insert().never();

        let service = HealthRecordService::new(repo);
        let mut request = valid_request("p1");
        request.height = Some(json!([170]));

        let result = service.create_record(request).await;
        assert!(matches!(result, Err(HealthRecordServiceError::InvalidRecord(_))));
    }

    #[tokio::test]
    async fn test_create_record_storage_failure() {
        let repo = MockHealthRecordRepository::new().with_storage_failure();
        let service = HealthRecordService::new(repo);

        let result = service.create_record(valid_request("p1")).await;
        assert!(matches!(result, Err(HealthRecordServiceError::RepositoryError(_))));
    }

    #[tokio::test]
    async fn test_get_record_by_patient_id() {
        let document = stored_document("p1");
        let expected_id = document.id.to_hex();

        let mut repo = MockRepo::new();
        repo.expect_find_by_patient_id()
            .withf(|patient_id| patient_id == "p1")
            .times(1)
            .returning(move |_| Ok(Some(document.clone())));
        repo.expect_find_by_patient_id()
            .withf(|patient_id| patient_id == "missing")
            .returning(|_| Ok(None));

        let service = HealthRecordService::new(repo);

        let record = service.get_record_by_patient_id("p1").await.unwrap();
        assert_eq!(record.id, expected_id);

        let result = service.get_record_by_patient_id("missing").await;
        assert!(matches!(result, Err(HealthRecordServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_get_all_records() {
        let repo = MockHealthRecordRepository::with_records(vec![
            stored_document("p1"),
            stored_document("p2"),
        ]);
        let service = HealthRecordService::new(repo);

        let records = service.get_all_records().await.unwrap();
        let patients: Vec<_> = records.iter().map(|r| r.patient_id.as_str()).collect();
        assert_eq!(patients, vec!["p1", "p2"]);
    }

    #[tokio::test]
    async fn test_get_all_records_storage_failure() {
        let mut repo = MockRepo::new();
        repo.expect_find_all()
            .returning(|| Err(DatabaseError::GenericError("connection refused".to_string()).into()));

        let service = HealthRecordService::new(repo);
        let result = service.get_all_records().await;
        assert!(matches!(result, Err(HealthRecordServiceError::RepositoryError(_))));
    }

    #[tokio::test]
    async fn test_default_service_round_trip() {
        use health_records_data::database::DatabaseConfig;

        let gateway = Arc::new(DatabaseGateway::new(DatabaseConfig::in_memory()));
        let service = create_default_health_record_service(gateway);

        assert!(service.get_all_records().await.unwrap().is_empty());

        let created = service.create_record(valid_request("p9")).await.unwrap();
        let found = service.get_record_by_patient_id("p9").await.unwrap();
        assert_eq!(found, created);
    }
}
