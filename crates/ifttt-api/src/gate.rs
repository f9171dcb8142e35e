//! Request gate: channel-key check ahead of every route.

use axum::extract::{Request, State};
use axum::http::Method;
use axum::middleware::Next;
use axum::response::Response;
use tracing::warn;

use crate::error::ApiError;
use crate::{CHANNEL_KEY_HEADER, ChannelState, STATUS_PATH};

/// Reject requests whose `IFTTT-Channel-Key` does not match the configured key.
///
/// `GET`/`HEAD /ifttt/v1/status` is always let through, as is everything when the
/// channel runs with `DEBUG = true`.
pub async fn validate_channel_key(
    State(state): State<ChannelState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let liveness = matches!(*request.method(), Method::GET | Method::HEAD);
    if liveness && request.uri().path() == STATUS_PATH {
        return Ok(next.run(request).await);
    }
    if state.debug {
        return Ok(next.run(request).await);
    }

    let presented = request
        .headers()
        .get(CHANNEL_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if state.channel_key.is_empty()
        || !constant_time_eq(presented.as_bytes(), state.channel_key.as_bytes())
    {
        warn!(
            method = %request.method(),
            path = request.uri().path(),
            key_present = !presented.is_empty(),
            "rejected request with bad channel key"
        );
        return Err(ApiError::Unauthorized);
    }

    Ok(next.run(request).await)
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
