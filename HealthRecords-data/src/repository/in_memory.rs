use std::sync::{Arc, Mutex};

use crate::models::HealthRecordDocument;
use super::errors::RepositoryError;

/// In-memory document store for health records.
///
/// Clones share the same underlying store. Documents are kept in insertion
/// order so lookups by patient return the earliest matching record.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStorage {
    records: Arc<Mutex<Vec<HealthRecordDocument>>>,
}

impl InMemoryStorage {
    /// Create a new in-memory storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents
    pub fn len(&self) -> usize {
        self.records.lock().map(|records| records.len()).unwrap_or(0)
    }

    /// Whether the store holds no documents
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `other` is a handle to the same store
    pub fn shares_storage_with(&self, other: &InMemoryStorage) -> bool {
        Arc::ptr_eq(&self.records, &other.records)
    }

    /// Store a document
    pub fn insert(&self, record: &HealthRecordDocument) -> Result<(), RepositoryError> {
        let mut records = self.records.lock()?;
        records.push(record.clone());
        Ok(())
    }

    /// First document stored for the patient
    pub fn find_one_by_patient_id(&self, patient_id: &str) -> Result<Option<HealthRecordDocument>, RepositoryError> {
        let records = self.records.lock()?;
        Ok(records.iter().find(|r| r.patient_id == patient_id).cloned())
    }

    /// Every stored document, in insertion order
    pub fn find_all(&self) -> Result<Vec<HealthRecordDocument>, RepositoryError> {
        let records = self.records.lock()?;
        Ok(records.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::health_record::tests::sample_new_record;

    #[test]
    fn test_first_matching_record_wins() {
        let storage = InMemoryStorage::new();
        let first = HealthRecordDocument::from_new(sample_new_record("p1"));
        let second = HealthRecordDocument::from_new(sample_new_record("p1"));

        storage.insert(&first).unwrap();
        storage.insert(&second).unwrap();

        let found = storage.find_one_by_patient_id("p1").unwrap().unwrap();
        assert_eq!(found.id, first.id);
        assert_eq!(storage.find_all().unwrap().len(), 2);
        assert!(storage.find_one_by_patient_id("p2").unwrap().is_none());
    }

    #[test]
    fn test_clones_share_storage() {
        let storage = InMemoryStorage::new();
        let clone = storage.clone();

        clone.insert(&HealthRecordDocument::from_new(sample_new_record("p1"))).unwrap();

        assert_eq!(storage.len(), 1);
        assert!(storage.shares_storage_with(&clone));
        assert!(!storage.shares_storage_with(&InMemoryStorage::new()));
    }
}
