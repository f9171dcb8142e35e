//! The trigger capability every pollable feed implements.

use async_trait::async_trait;

use crate::error::TriggerResult;
use crate::naming::snake_case;
use crate::poll::{PollRequest, TriggerItem};

/// Ordered field name → sample value map.
pub type Fields = serde_json::Map<String, serde_json::Value>;

/// A named, pollable condition exposed to IFTTT.
///
/// Implementations are immutable once registered and are shared across
/// concurrent requests, hence `Send + Sync`.
#[async_trait]
pub trait Trigger: Send + Sync {
    /// CamelCase identity, e.g. `ArticleOfTheDay`.
    fn name(&self) -> &str;

    /// Explicit URL segment, overriding the one derived from [`Trigger::name`].
    fn url_pattern(&self) -> Option<&str> {
        None
    }

    /// Sample trigger fields used by the self-test endpoint and feed listing.
    fn default_fields(&self) -> &Fields;

    /// Answer one poll from IFTTT.
    async fn poll(&self, request: &PollRequest) -> TriggerResult<Vec<TriggerItem>>;

    /// Machine-readable name, used as the self-test key.
    fn trigger_name(&self) -> String {
        snake_case(self.name())
    }

    /// URL segment under `/ifttt/v1/triggers/`.
    fn slug(&self) -> String {
        match self.url_pattern() {
            Some(pattern) if !pattern.is_empty() => pattern.to_string(),
            _ => self.trigger_name(),
        }
    }
}
