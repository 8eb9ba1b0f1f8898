use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::entities::common::ErrorResponse;

/// Failures reported to API clients.
///
/// The display text is the exact message sent in the `error` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("Health record not found.")]
    NotFound,

    #[error("All required fields must be provided.")]
    MissingFields,

    #[error("Failed to fetch health records.")]
    FetchFailed,

    #[error("Failed to create health record.")]
    CreateFailed,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MissingFields => StatusCode::BAD_REQUEST,
            ApiError::FetchFailed | ApiError::CreateFailed => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}
