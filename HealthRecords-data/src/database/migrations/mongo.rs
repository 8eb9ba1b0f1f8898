use mongodb::{
    bson::{doc, Document},
    options::IndexOptions,
    Database, IndexModel,
};
use tracing::info;

use crate::models::HEALTH_RECORDS_COLLECTION;

/// Create the indexes the health record queries rely on
pub async fn run_migrations(db: &Database) -> Result<(), String> {
    info!("Running MongoDB migrations");

    create_patient_id_index(db).await?;

    info!("MongoDB migrations completed successfully");
    Ok(())
}

/// Lookups by patient go through `patientId`; several records per patient are allowed
async fn create_patient_id_index(db: &Database) -> Result<(), String> {
    info!("Creating patientId index if not exists");

    let index = IndexModel::builder()
        .keys(doc! { "patientId": 1 })
        .options(
            IndexOptions::builder()
                .name("patient_id_idx".to_string())
                .unique(false)
                .build(),
        )
        .build();

    db.collection::<Document>(HEALTH_RECORDS_COLLECTION)
        .create_index(index, None)
        .await
        .map_err(|e| format!("Failed to create patientId index: {}", e))?;

    Ok(())
}
