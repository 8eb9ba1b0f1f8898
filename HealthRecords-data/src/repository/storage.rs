use futures::TryStreamExt;
use mongodb::{bson::doc, Collection, Database};
use tracing::debug;

use crate::database::DatabasePool;
use crate::models::{HealthRecordDocument, HEALTH_RECORDS_COLLECTION};
use super::errors::RepositoryError;

/// Backend dispatch for health record documents
pub struct DatabaseStorage;

impl DatabaseStorage {
    fn collection(db: &Database) -> Collection<HealthRecordDocument> {
        db.collection(HEALTH_RECORDS_COLLECTION)
    }

    /// Insert one document
    pub async fn insert(pool: &DatabasePool, record: &HealthRecordDocument) -> Result<(), RepositoryError> {
        debug!("Storing health record: id={}, patient_id={}", record.id, record.patient_id);

        match pool {
            DatabasePool::MongoDb(db) => {
                Self::collection(db).insert_one(record, None).await?;
                Ok(())
            },

            #[cfg(feature = "sqlite")]
            DatabasePool::SQLite(pool) => {
                let conn = pool.get()?;
                let document = serde_json::to_string(record)?;

                conn.execute(
                    "INSERT INTO health_records (id, patient_id, created_at, document)
                     VALUES (?1, ?2, ?3, ?4)",
                    (
                        record.id.to_hex(),
                        &record.patient_id,
                        &record.created_at,
                        document,
                    ),
                )?;

                Ok(())
            },

            DatabasePool::Memory(storage) => storage.insert(record),
        }
    }

    /// Find the first document stored for a patient
    pub async fn find_one_by_patient_id(
        pool: &DatabasePool,
        patient_id: &str,
    ) -> Result<Option<HealthRecordDocument>, RepositoryError> {
        debug!("Getting health record by patient ID: {}", patient_id);

        match pool {
            DatabasePool::MongoDb(db) => {
                let record = Self::collection(db)
                    .find_one(doc! { "patientId": patient_id }, None)
                    .await?;
                Ok(record)
            },

            #[cfg(feature = "sqlite")]
            DatabasePool::SQLite(pool) => {
                let conn = pool.get()?;

                let mut stmt = conn.prepare(
                    "SELECT document FROM health_records
                     WHERE patient_id = ?1 ORDER BY rowid LIMIT 1"
                )?;

                let document = stmt.query_row([patient_id], |row| row.get::<_, String>(0));

                match document {
                    Ok(document) => Ok(Some(serde_json::from_str(&document)?)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(RepositoryError::Sqlite(e)),
                }
            },

            DatabasePool::Memory(storage) => storage.find_one_by_patient_id(patient_id),
        }
    }

    /// Get every document in the collection
    pub async fn find_all(pool: &DatabasePool) -> Result<Vec<HealthRecordDocument>, RepositoryError> {
        debug!("Getting all health records");

        match pool {
            DatabasePool::MongoDb(db) => {
                let cursor = Self::collection(db).find(None, None).await?;
                let records: Vec<HealthRecordDocument> = cursor.try_collect().await?;
                Ok(records)
            },

            #[cfg(feature = "sqlite")]
            DatabasePool::SQLite(pool) => {
                let conn = pool.get()?;

                let mut stmt = conn.prepare(
                    "SELECT document FROM health_records ORDER BY rowid"
                )?;

                let documents = stmt.query_map([], |row| row.get::<_, String>(0))?;

                let mut result: Vec<HealthRecordDocument> = Vec::new();
                for document in documents {
                    result.push(serde_json::from_str(&document?)?);
                }

                Ok(result)
            },

            DatabasePool::Memory(storage) => storage.find_all(),
        }
    }
}

#[cfg(all(test, feature = "sqlite"))]
mod tests {
    use super::*;
    use crate::database::{DatabaseConfig, DatabaseGateway, DatabaseType};
    use crate::models::health_record::tests::sample_new_record;

    async fn sqlite_pool() -> DatabasePool {
        let config = DatabaseConfig {
            db_type: DatabaseType::Sqlite,
            sqlite_path: ":memory:".to_string(),
            ..DatabaseConfig::default()
        };
        DatabaseGateway::new(config).ensure_connected().await.unwrap()
    }

    #[tokio::test]
    async fn test_sqlite_documents_round_trip() {
        let pool = sqlite_pool().await;
        let mut record = HealthRecordDocument::from_new(sample_new_record("p1"));
        record.medications = vec!["aspirin".to_string()];
        record.additional_notes = "after lunch".to_string();

        DatabaseStorage::insert(&pool, &record).await.unwrap();

        let found = DatabaseStorage::find_one_by_patient_id(&pool, "p1").await.unwrap();
        assert_eq!(found, Some(record.clone()));

        let all = DatabaseStorage::find_all(&pool).await.unwrap();
        assert_eq!(all, vec![record]);
    }

    #[tokio::test]
    async fn test_sqlite_lookup_returns_earliest_record() {
        let pool = sqlite_pool().await;
        let first = HealthRecordDocument::from_new(sample_new_record("p1"));
        let second = HealthRecordDocument::from_new(sample_new_record("p1"));
        let other = HealthRecordDocument::from_new(sample_new_record("p2"));

        for record in [&first, &other, &second] {
            DatabaseStorage::insert(&pool, record).await.unwrap();
        }

        let found = DatabaseStorage::find_one_by_patient_id(&pool, "p1").await.unwrap().unwrap();
        assert_eq!(found.id, first.id);

        let all = DatabaseStorage::find_all(&pool).await.unwrap();
        let ids: Vec<_> = all.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![first.id, other.id, second.id]);

        assert!(DatabaseStorage::find_one_by_patient_id(&pool, "missing").await.unwrap().is_none());
    }
}
