use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Configure Swagger UI endpoints
pub fn configure_swagger_routes() -> SwaggerUi {
    SwaggerUi::new("/api-docs")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
}

// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health endpoints
        crate::api::handlers::health::health_check,

        // Health record endpoints
        crate::api::handlers::health_record::get_health_records,
        crate::api::handlers::health_record::get_health_record,
        crate::api::handlers::health_record::create_health_record
    ),
    components(
        schemas(
            // Entities
            crate::entities::health_record::HealthRecord,
            crate::entities::health_record::CreateHealthRecordRequest,
            crate::entities::health_record::HealthRecordResponse,
            crate::entities::health_record::HealthRecordListResponse,
            crate::entities::health_record::CreatedHealthRecordResponse,
            crate::entities::common::ErrorResponse,

            // Health handlers
            crate::api::handlers::health::HealthResponse,
            crate::api::handlers::health::ComponentStatus,
            crate::api::handlers::health::ComponentHealthStatus
        )
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "health_records", description = "Patient health record endpoints")
    ),
    info(
        title = "Health Records API",
        version = "0.1.0",
        description = "API for storing and retrieving patient vital-sign records",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        ),
    ),
    servers(
        (url = "/", description = "Local development server")
    )
)]
pub struct ApiDoc;
