//! RSS parsing and conversion of feed items into trigger items.

use std::sync::LazyLock;

use chrono::{DateTime, SecondsFormat, Utc};
use ifttt_core::{Fields, ItemMeta, TriggerError, TriggerItem, TriggerResult};
use regex::Regex;
use serde_json::Value;
use sha2::{Digest, Sha256};

static TAGS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("static regex"));
static SPACES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("static regex"));

/// One entry of a MediaWiki RSS feed, with markup already stripped.
#[derive(Debug, Clone)]
pub struct FeedItem {
    pub title: String,
    pub link: String,
    pub summary: String,
    pub author: String,
    pub guid: Option<String>,
    pub published: Option<DateTime<Utc>>,
}

pub fn parse_feed(body: &[u8]) -> TriggerResult<Vec<FeedItem>> {
    let channel = rss::Channel::read_from(body).map_err(|e| TriggerError::Parse(e.to_string()))?;

    Ok(channel
        .items()
        .iter()
        .map(|item| FeedItem {
            title: item.title().unwrap_or_default().trim().to_string(),
            link: item.link().unwrap_or_default().trim().to_string(),
            summary: strip_markup(item.description().unwrap_or_default()),
            author: item
                .author()
                .or_else(|| item.dublin_core_ext().and_then(|dc| dc.creators().first().map(String::as_str)))
                .unwrap_or_default()
                .to_string(),
            guid: item.guid().map(|g| g.value().to_string()),
            published: item
                .pub_date()
                .and_then(|d| DateTime::parse_from_rfc2822(d).ok())
                .map(|d| d.with_timezone(&Utc)),
        })
        .collect())
}

/// Drop HTML tags and collapse whitespace.
pub fn strip_markup(html: &str) -> String {
    let text = TAGS.replace_all(html, " ");
    SPACES.replace_all(text.trim(), " ").into_owned()
}

impl FeedItem {
    /// Stable IFTTT id: SHA-256 of the guid, falling back to link then title.
    pub fn id(&self) -> String {
        let key = self
            .guid
            .as_deref()
            .filter(|g| !g.is_empty())
            .or(Some(self.link.as_str()).filter(|l| !l.is_empty()))
            .unwrap_or(self.title.as_str());
        hex::encode(Sha256::digest(key.as_bytes()))
    }

    /// Undated items are stamped with the Unix epoch so repeated polls
    /// report the same timestamp and they sort below dated items.
    pub fn into_trigger_item(self) -> TriggerItem {
        let published = self.published.unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
        let id = self.id();

        let mut ingredients = Fields::new();
        ingredients.insert("title".into(), Value::String(self.title));
        ingredients.insert("url".into(), Value::String(self.link));
        ingredients.insert("summary".into(), Value::String(self.summary));
        ingredients.insert("author".into(), Value::String(self.author));
        ingredients.insert(
            "date".into(),
            Value::String(published.to_rfc3339_opts(SecondsFormat::Secs, true)),
        );

        TriggerItem {
            ingredients,
            meta: ItemMeta {
                id,
                timestamp: published.timestamp(),
            },
        }
    }
}
