//! Router-level tests for the channel surface.
//!
//! Drives the full router (gate, handlers, finisher) with `oneshot` and a
//! registry of in-memory triggers.

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Request, Response, StatusCode};
use ifttt_api::{CHANNEL_KEY_HEADER, ChannelState, build_router};
use ifttt_core::{
    ChannelConfig, Fields, ItemMeta, PollRequest, Trigger, TriggerError, TriggerItem,
    TriggerRegistry, TriggerResult,
};
use serde_json::{Value, json};
use tower::ServiceExt;

const KEY: &str = "test-channel-key";
const JSON: &str = "application/json; charset=utf-8";
const HTML: &str = "text/html; charset=utf-8";

enum Behaviour {
    Items(usize),
    RequireLang,
    Fail,
    Panic,
}

struct FakeTrigger {
    name: &'static str,
    fields: Fields,
    behaviour: Behaviour,
}

#[async_trait]
impl Trigger for FakeTrigger {
    fn name(&self) -> &str {
        self.name
    }

    fn default_fields(&self) -> &Fields {
        &self.fields
    }

    async fn poll(&self, request: &PollRequest) -> TriggerResult<Vec<TriggerItem>> {
        match self.behaviour {
            Behaviour::Items(n) => Ok((0..n)
                .map(|i| {
                    let mut ingredients = Fields::new();
                    ingredients.insert("title".into(), json!(format!("item {i}")));
                    TriggerItem {
                        ingredients,
                        meta: ItemMeta { id: format!("id-{i}"), timestamp: i as i64 },
                    }
                })
                .collect()),
            Behaviour::RequireLang => {
                request.require_field("lang")?;
                Ok(Vec::new())
            }
            Behaviour::Fail => Err(TriggerError::Fetch("upstream down".into())),
            Behaviour::Panic => panic!("trigger exploded"),
        }
    }
}

fn fields(value: Value) -> Fields {
    match value {
        Value::Object(map) => map,
        _ => Fields::new(),
    }
}

fn trigger(name: &'static str, f: Value, behaviour: Behaviour) -> Arc<dyn Trigger> {
    Arc::new(FakeTrigger { name, fields: fields(f), behaviour })
}

fn registry() -> TriggerRegistry {
    TriggerRegistry::new(vec![
        trigger("A", json!({"x": 1}), Behaviour::Items(3)),
        trigger("B", json!({}), Behaviour::Items(0)),
        trigger("WordOfTheDay", json!({"lang": "en"}), Behaviour::RequireLang),
        trigger("Broken", json!({}), Behaviour::Fail),
        trigger("Exploding", json!({}), Behaviour::Panic),
    ])
    .unwrap()
}

fn router_with(debug: bool) -> Router {
    let config = if debug {
        ChannelConfig::from_toml_str("DEBUG = true").unwrap()
    } else {
        ChannelConfig::from_toml_str(&format!("CHANNEL_KEY = \"{KEY}\"")).unwrap()
    };
    build_router(ChannelState::new(registry(), &config))
}

fn router() -> Router {
    router_with(false)
}

fn request(method: &str, uri: &str, key: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(key) = key {
        builder = builder.header("IFTTT-Channel-Key", key);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn content_type(resp: &Response<Body>) -> &str {
    resp.headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

async fn body_bytes(resp: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

async fn body_json(resp: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(resp).await).unwrap()
}

// ── Status ─────────────────────────────────────────────────────

#[tokio::test]
async fn status_is_open_without_key() {
    let resp = router().oneshot(request("GET", "/ifttt/v1/status", None, "")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(content_type(&resp), JSON);
    assert!(body_bytes(resp).await.is_empty());
}

#[tokio::test]
async fn status_ignores_wrong_key() {
    let resp = router()
        .oneshot(request("GET", "/ifttt/v1/status", Some("wrong"), ""))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_bytes(resp).await.is_empty());
}

#[tokio::test]
async fn head_status_is_open_without_key() {
    let resp = router().oneshot(request("HEAD", "/ifttt/v1/status", None, "")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(content_type(&resp), JSON);
}

#[tokio::test]
async fn head_on_protected_route_still_needs_key() {
    let resp = router().oneshot(request("HEAD", "/ifttt/v1/rss-feeds", None, "")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// ── Gate ───────────────────────────────────────────────────────

#[tokio::test]
async fn protected_routes_require_key() {
    let cases = [
        ("POST", "/ifttt/v1/test/setup", None),
        ("POST", "/ifttt/v1/test/setup", Some("wrong")),
        ("GET", "/ifttt/v1/rss-feeds", None),
        ("POST", "/ifttt/v1/triggers/a", Some("")),
        ("POST", "/ifttt/v1/triggers/a", Some("test-channel-key-but-longer")),
    ];

    for (method, uri, key) in cases {
        let resp = router().oneshot(request(method, uri, key, "{}")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{method} {uri}");
        assert_eq!(content_type(&resp), JSON);
        assert_eq!(
            body_json(resp).await,
            json!({"errors": [{"message": "Unauthorized"}]})
        );
    }
}

#[tokio::test]
async fn header_name_is_case_insensitive() {
    let req = Request::builder()
        .method("POST")
        .uri("/ifttt/v1/test/setup")
        .header(CHANNEL_KEY_HEADER, KEY)
        .body(Body::empty())
        .unwrap();
    let resp = router().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn debug_mode_bypasses_key() {
    let resp = router_with(true)
        .oneshot(request("POST", "/ifttt/v1/test/setup", None, ""))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

// ── Self-test ──────────────────────────────────────────────────

#[tokio::test]
async fn test_setup_lists_non_empty_samples() {
    let resp = router()
        .oneshot(request("POST", "/ifttt/v1/test/setup", Some(KEY), ""))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(content_type(&resp), JSON);
    assert_eq!(
        body_json(resp).await,
        json!({"data": {"samples": {"triggers": {
            "a": {"x": 1},
            "word_of_the_day": {"lang": "en"},
        }}}})
    );
}

#[tokio::test]
async fn test_setup_matches_minimal_registry() {
    let registry = TriggerRegistry::new(vec![
        trigger("A", json!({"x": 1}), Behaviour::Items(0)),
        trigger("B", json!({}), Behaviour::Items(0)),
    ])
    .unwrap();
    let config = ChannelConfig::from_toml_str(&format!("CHANNEL_KEY = \"{KEY}\"")).unwrap();
    let router = build_router(ChannelState::new(registry, &config));

    let resp = router
        .oneshot(request("POST", "/ifttt/v1/test/setup", Some(KEY), ""))
        .await
        .unwrap();
    assert_eq!(
        String::from_utf8(body_bytes(resp).await).unwrap(),
        r#"{"data":{"samples":{"triggers":{"a":{"x":1}}}}}"#
    );
}

#[tokio::test]
async fn test_setup_rejects_get() {
    let resp = router()
        .oneshot(request("GET", "/ifttt/v1/test/setup", Some(KEY), ""))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}

// ── Feed listing ───────────────────────────────────────────────

#[tokio::test]
async fn rss_feeds_renders_html_listing() {
    let resp = router()
        .oneshot(request("GET", "/ifttt/v1/rss-feeds", Some(KEY), ""))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(content_type(&resp), HTML);

    let html = String::from_utf8(body_bytes(resp).await).unwrap();
    assert!(html.contains("Word of the day"));
    assert!(html.contains("<h2>A</h2>"));
    assert!(!html.contains("<h2>B</h2>"));
    assert!(html.contains("5 triggers"));
}

// ── Trigger polls ──────────────────────────────────────────────

#[tokio::test]
async fn trigger_poll_returns_data_envelope() {
    let resp = router()
        .oneshot(request("POST", "/ifttt/v1/triggers/a", Some(KEY), r#"{"limit": 2}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(content_type(&resp), JSON);

    let body = body_json(resp).await;
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["meta"]["id"], "id-2");
    assert_eq!(data[0]["title"], "item 2");
}

#[tokio::test]
async fn trigger_missing_field_is_bad_request() {
    let resp = router()
        .oneshot(request(
            "POST",
            "/ifttt/v1/triggers/word_of_the_day",
            Some(KEY),
            r#"{"triggerFields": {}}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(content_type(&resp), JSON);
    assert_eq!(
        body_json(resp).await,
        json!({"errors": [{"message": "missing required trigger field"}]})
    );
}

#[tokio::test]
async fn malformed_poll_body_is_bad_request() {
    let resp = router()
        .oneshot(request("POST", "/ifttt/v1/triggers/a", Some(KEY), "{oops"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn upstream_failure_renders_500_page() {
    let resp = router()
        .oneshot(request("POST", "/ifttt/v1/triggers/broken", Some(KEY), "{}"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(content_type(&resp), HTML);
    let html = String::from_utf8(body_bytes(resp).await).unwrap();
    assert!(!html.contains("upstream down"));
}

#[tokio::test]
async fn panicking_trigger_renders_500_page() {
    let resp = router()
        .oneshot(request("POST", "/ifttt/v1/triggers/exploding", Some(KEY), "{}"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(content_type(&resp), HTML);
}

// ── Not found ──────────────────────────────────────────────────

#[tokio::test]
async fn unknown_path_is_html_404() {
    for key in [None, Some(KEY)] {
        let resp = router().oneshot(request("GET", "/nope", key, "")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(content_type(&resp), HTML);
    }
}

#[tokio::test]
async fn unknown_trigger_slug_is_html_404() {
    let resp = router()
        .oneshot(request("POST", "/ifttt/v1/triggers/missing", Some(KEY), "{}"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(content_type(&resp), HTML);
}
