// Testing utilities and mock implementations for the domain layer
// This module is only available when the "mock" feature is enabled

// Re-export useful test mocks from the data layer
pub use health_records_data::repository::tests::MockHealthRecordRepository;

use std::sync::RwLock;

use async_trait::async_trait;
use health_records_data::models::HealthRecordDocument;

use crate::entities::conversions;
use crate::entities::health_record::{CreateHealthRecordRequest, HealthRecord};
use crate::health::{ComponentStatus, HealthComponent, HealthServiceTrait, SystemHealth, SystemStatus};
use crate::services::health_record::{validate_request, HealthRecordServiceError, HealthRecordServiceTrait};

/// Mock implementation of the HealthRecordServiceTrait for testing.
///
/// Validation and field casting behave like the real service; only storage
/// is replaced by an in-process list.
#[derive(Default)]
pub struct MockHealthRecordService {
    records: RwLock<Vec<HealthRecord>>,
    should_fail_storage: bool,
}

impl MockHealthRecordService {
    /// Create a new mock health record service
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure every storage operation to fail
    pub fn with_storage_failure(mut self) -> Self {
        self.should_fail_storage = true;
        self
    }

    /// Add a pre-defined record to the mock
    pub fn with_record(self, record: HealthRecord) -> Self {
        if let Ok(mut records) = self.records.write() {
            records.push(record);
        }
        self
    }

    /// Add multiple pre-defined records to the mock
    pub fn with_records(self, records: Vec<HealthRecord>) -> Self {
        if let Ok(mut stored) = self.records.write() {
            stored.extend(records);
        }
        self
    }

    /// Number of records currently held
    pub fn record_count(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    fn check_storage(&self) -> Result<(), HealthRecordServiceError> {
        if self.should_fail_storage {
            Err(HealthRecordServiceError::RepositoryError(
                "Repository error - mock is configured to fail storage".to_string(),
            ))
        } else {
            Ok(())
        }
    }

    fn lock_error<T>(_: T) -> HealthRecordServiceError {
        HealthRecordServiceError::RepositoryError("mock record lock poisoned".to_string())
    }
}

#[async_trait]
impl HealthRecordServiceTrait for MockHealthRecordService {
    fn validate_create_request(&self, request: &CreateHealthRecordRequest) -> Result<(), HealthRecordServiceError> {
        validate_request(request)
    }

    async fn create_record(&self, request: CreateHealthRecordRequest) -> Result<HealthRecord, HealthRecordServiceError> {
        self.validate_create_request(&request)?;

        let new_record = conversions::convert_to_data_new_record(request)
            .map_err(HealthRecordServiceError::InvalidRecord)?;

        self.check_storage()?;

        let record = conversions::convert_to_domain_record(HealthRecordDocument::from_new(new_record));
        self.records.write().map_err(Self::lock_error)?.push(record.clone());

        Ok(record)
    }

    async fn get_all_records(&self) -> Result<Vec<HealthRecord>, HealthRecordServiceError> {
        self.check_storage()?;
        Ok(self.records.read().map_err(Self::lock_error)?.clone())
    }

    async fn get_record_by_patient_id(&self, patient_id: &str) -> Result<HealthRecord, HealthRecordServiceError> {
        self.check_storage()?;

        let records = self.records.read().map_err(Self::lock_error)?;
        records
            .iter()
            .find(|r| r.patient_id == patient_id)
            .cloned()
            .ok_or_else(|| HealthRecordServiceError::NotFound(
                format!("No health record for patient {}", patient_id),
            ))
    }
}

/// Mock implementation of health services for testing system health
#[derive(Debug)]
pub struct MockHealthService {
    database_status: ComponentStatus,
}

impl Default for MockHealthService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockHealthService {
    /// Create a new mock health service with a healthy database
    pub fn new() -> Self {
        Self {
            database_status: ComponentStatus::Healthy,
        }
    }

    /// Configure the mock with an unhealthy database
    pub fn with_unhealthy_database(mut self) -> Self {
        self.database_status = ComponentStatus::Unhealthy;
        self
    }
}

#[async_trait]
impl HealthServiceTrait for MockHealthService {
    async fn get_system_health(&self) -> SystemHealth {
        let (status, details) = match self.database_status {
            ComponentStatus::Healthy => (SystemStatus::Healthy, None),
            ComponentStatus::Unhealthy => (
                SystemStatus::Unhealthy,
                Some("Database connection failed".to_string()),
            ),
        };

        SystemHealth {
            status,
            components: vec![(
                "database".to_string(),
                HealthComponent {
                    status: self.database_status.clone(),
                    details,
                },
            )]
            .into_iter()
            .collect(),
        }
    }

    async fn check_database_status(&self) -> Result<(), String> {
        match self.database_status {
            ComponentStatus::Healthy => Ok(()),
            ComponentStatus::Unhealthy => Err("Database connection failed".to_string()),
        }
    }
}

