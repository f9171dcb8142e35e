//! ifttt-api — the channel's HTTP surface.
//!
//! # Routes
//!
//! | Method | Path | Auth | Description |
//! |---|---|---|---|
//! | POST | `/ifttt/v1/test/setup` | key | Sample trigger fields for the IFTTT test suite |
//! | GET | `/ifttt/v1/rss-feeds` | key | HTML listing of available feeds |
//! | GET, HEAD | `/ifttt/v1/status` | none | Liveness probe, empty body |
//! | POST | `/ifttt/v1/triggers/{slug}` | key | Poll one trigger |
//!
//! Every response leaves through [`finish::force_content_type`], which
//! stamps `application/json; charset=utf-8` unless the handler marked the
//! response as HTML.

pub mod error;
pub mod finish;
pub mod gate;
pub mod handlers;
pub mod pages;

use std::sync::Arc;

use axum::Router;
use axum::middleware::{from_fn_with_state, map_response};
use axum::routing::{get, post};
use ifttt_core::{ChannelConfig, TriggerRegistry};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

pub use error::ApiError;
pub use finish::ResponseFormat;

pub const TEST_SETUP_PATH: &str = "/ifttt/v1/test/setup";
pub const RSS_FEEDS_PATH: &str = "/ifttt/v1/rss-feeds";
pub const STATUS_PATH: &str = "/ifttt/v1/status";
pub const TRIGGER_PATH: &str = "/ifttt/v1/triggers/{slug}";

/// Header carrying the shared secret.
pub const CHANNEL_KEY_HEADER: &str = "ifttt-channel-key";

/// Shared, read-only state for every request.
#[derive(Clone)]
pub struct ChannelState {
    pub registry: Arc<TriggerRegistry>,
    pub channel_key: Arc<str>,
    pub debug: bool,
}

impl ChannelState {
    pub fn new(registry: TriggerRegistry, config: &ChannelConfig) -> Self {
        Self {
            registry: Arc::new(registry),
            channel_key: Arc::from(config.channel_key()),
            debug: config.debug,
        }
    }
}

/// Build the complete channel router.
pub fn build_router(state: ChannelState) -> Router {
    Router::new()
        .route(TEST_SETUP_PATH, post(handlers::test_setup))
        .route(RSS_FEEDS_PATH, get(handlers::rss_feeds))
        .route(STATUS_PATH, get(handlers::status))
        .route(TRIGGER_PATH, post(handlers::poll_trigger))
        .route_layer(from_fn_with_state(state.clone(), gate::validate_channel_key))
        .fallback(handlers::not_found)
        .with_state(state)
        .layer(CatchPanicLayer::custom(handlers::internal_error))
        .layer(map_response(finish::force_content_type))
        .layer(TraceLayer::new_for_http())
}
