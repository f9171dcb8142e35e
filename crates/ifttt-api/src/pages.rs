//! HTML pages: the feed listing and the 404/500 error pages.
//!
//! Views carry pre-formatted strings so the Askama templates stay simple.

use askama::Template;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use ifttt_core::FeedEntry;
use serde_json::Value;

use crate::finish::ResponseFormat;

fn render<T: Template>(tmpl: &T) -> String {
    tmpl.render()
        .unwrap_or_else(|e| format!("<pre>Template error: {e}</pre>"))
}

/// A rendered page that the finisher must leave as `text/html`.
pub struct HtmlPage {
    status: StatusCode,
    body: String,
}

impl HtmlPage {
    pub fn new<T: Template>(status: StatusCode, tmpl: T) -> Self {
        Self {
            status,
            body: render(&tmpl),
        }
    }
}

impl IntoResponse for HtmlPage {
    fn into_response(self) -> Response {
        let mut resp = (self.status, Html(self.body)).into_response();
        resp.extensions_mut().insert(ResponseFormat::Html);
        resp
    }
}

// ── Feed listing ────────────────────────────────────────────────

pub struct FieldView {
    pub name: String,
    pub value: String,
}

pub struct FeedView {
    pub display_name: String,
    pub endpoint: String,
    pub fields: Vec<FieldView>,
}

impl From<FeedEntry> for FeedView {
    fn from(entry: FeedEntry) -> Self {
        Self {
            display_name: entry.display_name,
            endpoint: format!("/ifttt/v1/triggers/{}", entry.slug),
            fields: entry
                .fields
                .into_iter()
                .map(|(name, value)| FieldView {
                    name,
                    value: match value {
                        Value::String(s) => s,
                        other => other.to_string(),
                    },
                })
                .collect(),
        }
    }
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct FeedsTemplate {
    pub count: usize,
    pub feeds: Vec<FeedView>,
}

// ── Error pages ─────────────────────────────────────────────────

#[derive(Template)]
#[template(path = "error_pages/404.html")]
pub struct NotFoundTemplate;

#[derive(Template)]
#[template(path = "error_pages/500.html")]
pub struct InternalErrorTemplate;
