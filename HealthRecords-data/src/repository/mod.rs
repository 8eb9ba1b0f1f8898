// Repository module structure
pub mod errors;
mod health_record;
mod in_memory;
mod storage;

// Re-export commonly used types
pub use errors::RepositoryError;
pub use health_record::{HealthRecordRepository, HealthRecordRepositoryTrait};
pub use in_memory::InMemoryStorage;

// Re-export test modules for both testing and when mock feature is enabled
#[cfg(any(test, feature = "mock"))]
pub use health_record::tests;
