pub mod health;
pub mod health_record;

// Re-export handlers for easier imports
pub use health::health_check;
pub use health_record::{create_health_record, fetch_health_records, get_health_record, get_health_records};
