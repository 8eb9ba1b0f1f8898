pub mod health_record;

pub use health_record::{HealthRecordDocument, Measurement, NewHealthRecord, HEALTH_RECORDS_COLLECTION};
