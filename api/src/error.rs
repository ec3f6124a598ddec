//! Error to HTTP response mapping

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use event_forms::{ExportError, SchemaError, StoreError};
use thiserror::Error;

use crate::models::ErrorResponse;

/// Request failure, rendered as `{error, fields?}` JSON
#[derive(Debug, Error)]
pub enum ApiError {
    /// Store lookup, schema or submission failure
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Form rejected before reaching the store
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// CSV export failure
    #[error(transparent)]
    Export(#[from] ExportError),

    /// Malformed JSON body
    #[error("Invalid request body: {0}")]
    Body(#[from] JsonRejection),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Store(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Store(StoreError::Invalid(_) | StoreError::Rejected(_)) => StatusCode::BAD_REQUEST,
            Self::Store(StoreError::Storage(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Schema(_) | Self::Body(_) => StatusCode::BAD_REQUEST,
            Self::Export(ExportError::NoResponses) => StatusCode::NOT_FOUND,
            Self::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            Self::Store(StoreError::NotFound(_)) => ErrorResponse {
                error: "Form not found".into(),
                fields: None,
            },
            Self::Store(StoreError::Rejected(fields)) => ErrorResponse {
                error: "Some fields need your attention.".into(),
                fields: Some(fields),
            },
            Self::Body(rejection) => ErrorResponse {
                error: rejection.body_text(),
                fields: None,
            },
            other => ErrorResponse {
                error: other.to_string(),
                fields: None,
            },
        };
        if status.is_server_error() {
            tracing::error!(status = %status, error = %body.error, "request failed");
        } else {
            tracing::debug!(status = %status, error = %body.error, "request rejected");
        }
        (status, Json(body)).into_response()
    }
}

/// Handler result
pub type ApiResult<T> = Result<T, ApiError>;
