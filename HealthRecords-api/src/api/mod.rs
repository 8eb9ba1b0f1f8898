pub mod error;
pub mod handlers;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use health_records_data::database::{DatabaseError, DatabaseGateway};

/// Create the application router with the gateway configured from the environment.
/// No database connection is made until the first request needs one.
pub fn create_application() -> Result<Router, DatabaseError> {
    let gateway = Arc::new(DatabaseGateway::from_env()?);
    Ok(routes::create_app(gateway))
}
