// Schema and index setup, run once when the gateway first connects

mod mongo;
pub use mongo::run_migrations as run_mongodb_migrations;

#[cfg(feature = "sqlite")]
mod sqlite;
#[cfg(feature = "sqlite")]
pub use sqlite::run_migrations as run_sqlite_migrations;
