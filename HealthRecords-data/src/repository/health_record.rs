use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error};

use crate::database::DatabaseGateway;
use crate::models::{HealthRecordDocument, NewHealthRecord};
use super::errors::RepositoryError;
use super::storage::DatabaseStorage;

/// Repository trait for health records
#[async_trait]
pub trait HealthRecordRepositoryTrait {
    /// Insert a new health record and return the stored document
    async fn insert(&self, record: NewHealthRecord) -> Result<HealthRecordDocument, RepositoryError>;

    /// Get the first health record stored for a patient
    async fn find_by_patient_id(&self, patient_id: &str) -> Result<Option<HealthRecordDocument>, RepositoryError>;

    /// Get all health records
    async fn find_all(&self) -> Result<Vec<HealthRecordDocument>, RepositoryError>;
}

/// Repository for health records.
///
/// Every operation first asks the gateway for a live connection, so the
/// backend is connected on the first request and reused afterwards.
#[derive(Debug, Clone)]
pub struct HealthRecordRepository {
    gateway: Arc<DatabaseGateway>,
}

impl HealthRecordRepository {
    /// Create a new repository on top of a shared gateway
    pub fn new(gateway: Arc<DatabaseGateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl HealthRecordRepositoryTrait for HealthRecordRepository {
    async fn insert(&self, record: NewHealthRecord) -> Result<HealthRecordDocument, RepositoryError> {
        let pool = self.gateway.ensure_connected().await?;
        let document = HealthRecordDocument::from_new(record);

        DatabaseStorage::insert(&pool, &document).await.map_err(|e| {
            error!("Failed to store health record: {}", e);
            e
        })?;

        debug!("Stored health record {}", document.id);
        Ok(document)
    }

    async fn find_by_patient_id(&self, patient_id: &str) -> Result<Option<HealthRecordDocument>, RepositoryError> {
        let pool = self.gateway.ensure_connected().await?;
        DatabaseStorage::find_one_by_patient_id(&pool, patient_id).await
    }

    async fn find_all(&self) -> Result<Vec<HealthRecordDocument>, RepositoryError> {
        let pool = self.gateway.ensure_connected().await?;
        DatabaseStorage::find_all(&pool).await
    }
}

/// Mock health record repository for testing
#[cfg(any(test, feature = "mock"))]
pub mod tests {
    use super::*;
    use std::sync::Mutex;
    use crate::database::DatabaseError;

    /// Mock implementation of HealthRecordRepositoryTrait for testing
    #[derive(Default)]
    pub struct MockHealthRecordRepository {
        records: Mutex<Vec<HealthRecordDocument>>,
        fail_storage: bool,
    }

    impl MockHealthRecordRepository {
        /// Create a new empty mock repository
        pub fn new() -> Self {
            Self::default()
        }

        /// Create a mock repository with predefined records
        pub fn with_records(records: Vec<HealthRecordDocument>) -> Self {
            Self {
                records: Mutex::new(records),
                fail_storage: false,
            }
        }

        /// Configure every operation to fail as if the database were down
        pub fn with_storage_failure(mut self) -> Self {
            self.fail_storage = true;
            self
        }

        /// Number of records inserted or preloaded
        pub fn record_count(&self) -> usize {
            self.records.lock().map(|r| r.len()).unwrap_or(0)
        }

        fn check_storage(&self) -> Result<(), RepositoryError> {
            if self.fail_storage {
                Err(DatabaseError::GenericError("mock storage is unavailable".to_string()).into())
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl HealthRecordRepositoryTrait for MockHealthRecordRepository {
        async fn insert(&self, record: NewHealthRecord) -> Result<HealthRecordDocument, RepositoryError> {
            self.check_storage()?;
            let document = HealthRecordDocument::from_new(record);
            self.records.lock()?.push(document.clone());
            Ok(document)
        }

        async fn find_by_patient_id(&self, patient_id: &str) -> Result<Option<HealthRecordDocument>, RepositoryError> {
            self.check_storage()?;
            let records = self.records.lock()?;
            Ok(records.iter().find(|r| r.patient_id == patient_id).cloned())
        }

        async fn find_all(&self) -> Result<Vec<HealthRecordDocument>, RepositoryError> {
            self.check_storage()?;
            Ok(self.records.lock()?.clone())
        }
    }
}
