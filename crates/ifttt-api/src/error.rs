//! HTTP error taxonomy.
//!
//! 400 and 401 answer IFTTT with a JSON `errors` envelope; 404 and 500 are
//! for humans and render HTML pages.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use ifttt_core::TriggerError;
use serde::Serialize;
use thiserror::Error;

use crate::pages::{HtmlPage, InternalErrorTemplate, NotFoundTemplate};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("missing required trigger field")]
    BadRequest,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("not found")]
    NotFound,

    /// Detail is logged, never shown to the client.
    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
struct ErrorMessage {
    message: String,
}

/// `{"errors": [{"message": ...}]}`
#[derive(Debug, Serialize)]
struct ErrorEnvelope {
    errors: Vec<ErrorMessage>,
}

impl ErrorEnvelope {
    fn single(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            errors: vec![ErrorMessage {
                message: message.into(),
            }],
        })
    }
}

impl From<TriggerError> for ApiError {
    fn from(err: TriggerError) -> Self {
        match err {
            TriggerError::MissingField(_) => ApiError::BadRequest,
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest => {
                (StatusCode::BAD_REQUEST, ErrorEnvelope::single(self.to_string())).into_response()
            }
            ApiError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, ErrorEnvelope::single(self.to_string())).into_response()
            }
            ApiError::NotFound => HtmlPage::new(StatusCode::NOT_FOUND, NotFoundTemplate).into_response(),
            ApiError::Internal(detail) => {
                tracing::error!(%detail, "request failed");
                HtmlPage::new(StatusCode::INTERNAL_SERVER_ERROR, InternalErrorTemplate).into_response()
            }
        }
    }
}
