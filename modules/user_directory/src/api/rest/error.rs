use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::api::rest::dto::ErrorDto;
use crate::domain::error::DomainError;
use crate::domain::postal::PostalLookupError;

/// Machine-readable error category carried in every error body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Validation,
    NotFound,
    StoreError,
    LookupUnavailable,
}

impl ErrorCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "VALIDATION",
            Self::NotFound => "NOT_FOUND",
            Self::StoreError => "STORE_ERROR",
            Self::LookupUnavailable => "LOOKUP_UNAVAILABLE",
        }
    }
}

/// HTTP error rendered as `{"error": ..., "code": ...}`.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ErrorCode::Validation, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, ErrorCode::NotFound, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorDto {
            error: self.message,
            code: self.code.as_str().to_string(),
        };
        (self.status, Json(body)).into_response()
    }
}

/// Map domain error to the HTTP error body.
pub fn map_domain_error(e: &DomainError) -> ApiError {
    match e {
        DomainError::UserNotFound { .. } => {
            tracing::warn!(error = %e, "User not found");
            ApiError::not_found(e.to_string())
        }
        DomainError::MissingRequiredFields
        | DomainError::Validation { .. }
        | DomainError::InvalidDate { .. } => {
            tracing::warn!(error = %e, "Rejected request");
            ApiError::validation(e.to_string())
        }
        DomainError::Database { message } => {
            tracing::error!(error = %message, "Database error occurred");
            ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::StoreError,
                message.clone(),
            )
        }
    }
}

pub fn map_postal_error(e: &PostalLookupError) -> ApiError {
    match e {
        PostalLookupError::InvalidPostalCode => ApiError::validation(e.to_string()),
        PostalLookupError::NotFound => ApiError::not_found(e.to_string()),
        PostalLookupError::Unavailable(reason) => {
            tracing::warn!(%reason, "Postal service unavailable");
            ApiError::new(StatusCode::BAD_GATEWAY, ErrorCode::LookupUnavailable, e.to_string())
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::warn!(error = %rejection.body_text(), "Malformed JSON body");
        Self::validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        tracing::warn!(error = %rejection.body_text(), "Malformed path parameter");
        Self::validation(rejection.body_text())
    }
}
