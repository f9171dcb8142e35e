//! IFTTT poll request and response envelope.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{TriggerError, TriggerResult};
use crate::trigger::Fields;

/// Items returned when IFTTT does not send a `limit`.
pub const DEFAULT_LIMIT: usize = 50;

/// Body IFTTT posts to a trigger endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PollRequest {
    #[serde(rename = "triggerFields", default)]
    pub trigger_fields: Fields,
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub user: Option<Value>,
    #[serde(default)]
    pub ifttt_source: Option<Value>,
}

impl PollRequest {
    /// Parse a raw body; an empty body is an empty request.
    pub fn from_slice(body: &[u8]) -> serde_json::Result<Self> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body)
    }

    pub fn effective_limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_LIMIT)
    }

    /// Fetch a non-empty string trigger field.
    pub fn require_field(&self, name: &str) -> TriggerResult<&str> {
        match self.trigger_fields.get(name) {
            Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.as_str()),
            _ => Err(TriggerError::MissingField(name.to_string())),
        }
    }
}

/// IFTTT-mandated metadata on every trigger item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemMeta {
    /// Stable identifier IFTTT uses for de-duplication.
    pub id: String,
    /// Unix seconds.
    pub timestamp: i64,
}

/// One event: ingredient fields flattened next to `meta`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriggerItem {
    #[serde(flatten)]
    pub ingredients: Fields,
    pub meta: ItemMeta,
}

/// `{"data": [...]}`
#[derive(Debug, Serialize)]
pub struct PollResponse {
    pub data: Vec<TriggerItem>,
}

impl PollResponse {
    /// Newest-first page capped at the request's limit.
    pub fn page(mut items: Vec<TriggerItem>, request: &PollRequest) -> Self {
        items.sort_by(|a, b| b.meta.timestamp.cmp(&a.meta.timestamp));
        items.truncate(request.effective_limit());
        Self { data: items }
    }
}
