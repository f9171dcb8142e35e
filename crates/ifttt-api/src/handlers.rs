//! Route handlers.

use std::any::Any;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use ifttt_core::{PollRequest, PollResponse, TriggerError};
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::ChannelState;
use crate::error::ApiError;
use crate::pages::{FeedView, FeedsTemplate, HtmlPage};

/// POST /ifttt/v1/test/setup
///
/// Required by the IFTTT endpoint test suite.
pub async fn test_setup(State(state): State<ChannelState>) -> Json<Value> {
    Json(json!({
        "data": {
            "samples": {
                "triggers": state.registry.samples(),
            }
        }
    }))
}

/// GET /ifttt/v1/rss-feeds
pub async fn rss_feeds(State(state): State<ChannelState>) -> HtmlPage {
    let feeds = state
        .registry
        .feeds()
        .into_iter()
        .map(FeedView::from)
        .collect();

    HtmlPage::new(
        StatusCode::OK,
        FeedsTemplate {
            count: state.registry.len(),
            feeds,
        },
    )
}

/// GET /ifttt/v1/status
pub async fn status() -> StatusCode {
    StatusCode::OK
}

/// POST /ifttt/v1/triggers/{slug}
pub async fn poll_trigger(
    State(state): State<ChannelState>,
    Path(slug): Path<String>,
    body: Bytes,
) -> Result<Json<PollResponse>, ApiError> {
    let trigger = state.registry.get(&slug).ok_or(ApiError::NotFound)?;

    let request = PollRequest::from_slice(&body).map_err(|e| {
        debug!(%slug, error = %e, "malformed poll body");
        ApiError::BadRequest
    })?;

    let items = trigger.poll(&request).await.map_err(|e| {
        if let TriggerError::MissingField(field) = &e {
            warn!(%slug, %field, "poll missing trigger field");
        }
        ApiError::from(e)
    })?;

    Ok(Json(PollResponse::page(items, &request)))
}

/// Router fallback for unknown paths.
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}

/// Turns a handler panic into the 500 page.
pub fn internal_error(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    };
    ApiError::Internal(format!("handler panicked: {detail}")).into_response()
}
