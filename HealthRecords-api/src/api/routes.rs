use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, Method},
    routing::get,
    Extension, Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::debug;

use health_records_data::database::DatabaseGateway;
use crate::api::handlers::{health, health_record};
use crate::openapi::configure_swagger_routes;

/// Base path of the health record resource
pub const HEALTH_RECORDS_PATH: &str = "/healthRecord-mongodb";

/// Create the application router backed by the given gateway
pub fn create_app(gateway: Arc<DatabaseGateway>) -> Router {
    debug!("Creating application router");

    let record_service = health_record::create_service(gateway.clone());
    let health_service = health::create_health_service(gateway);

    create_app_with_services(record_service, health_service)
}

/// Create the application router from already constructed services
pub fn create_app_with_services(
    record_service: health_record::HealthRecordService,
    health_service: health::HealthService,
) -> Router {
    // POST is accepted on both paths; the path segment is ignored on create
    let record_routes = Router::new()
        .route(
            HEALTH_RECORDS_PATH,
            get(health_record::get_health_records).post(health_record::create_health_record),
        )
        .route(
            &format!("{}/:id", HEALTH_RECORDS_PATH),
            get(health_record::get_health_record).post(health_record::create_health_record),
        )
        .with_state(record_service);

    debug!("Health record routes configured");

    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .layer(Extension(health_service));

    let app = Router::new()
        .merge(public_routes)
        .merge(record_routes);

    // Configure the Swagger UI using the helper function
    let app = add_swagger_ui(app);

    debug!("Swagger UI merged");

    // Initialize health check service startup time
    health::initialize_server_start_time();

    app.layer(cors_layer()).layer(TraceLayer::new_for_http())
}

/// Add Swagger UI to the router
pub fn add_swagger_ui(app: Router) -> Router {
    app.merge(configure_swagger_routes())
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(3600))
}
