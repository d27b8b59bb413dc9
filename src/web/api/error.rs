use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::catalog::CatalogError;
use crate::orbit::OrbitError;

pub enum ApiError {
    Validation(String),
    UnknownBody(String),
    Orbit(OrbitError),
}

impl From<CatalogError> for ApiError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::UnknownBody(id) => ApiError::UnknownBody(id),
            CatalogError::EmptySelection => ApiError::Validation(e.to_string()),
        }
    }
}

impl From<OrbitError> for ApiError {
    fn from(e: OrbitError) -> Self {
        match e {
            OrbitError::TooFewSegments(_) => ApiError::Validation(e.to_string()),
            _ => ApiError::Orbit(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::with_message("validation_failed", &msg)),
            )
                .into_response(),
            ApiError::UnknownBody(id) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::with_message(
                    "unknown_body",
                    &format!("no body with id '{}'", id),
                )),
            )
                .into_response(),
            ApiError::Orbit(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::with_message("orbit_error", &e.to_string())),
            )
                .into_response(),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorResponse {
    pub fn with_message(error: &str, message: &str) -> Self {
        ErrorResponse {
            error: error.to_string(),
            message: Some(message.to_string()),
        }
    }
}
