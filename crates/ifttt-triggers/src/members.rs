//! Category membership from the MediaWiki query API (`list=categorymembers`).
//!
//! There is no RSS feed for "pages recently added to a category", so this
//! parses the JSON listing and reuses [`FeedItem`] for the IFTTT item shape.

use chrono::{DateTime, Utc};
use ifttt_core::{TriggerError, TriggerResult};
use reqwest::Url;
use serde::Deserialize;

use crate::feed::FeedItem;

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    query: Option<Query>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Query {
    #[serde(default)]
    categorymembers: Vec<Member>,
}

#[derive(Debug, Deserialize)]
struct Member {
    pageid: u64,
    title: String,
    #[serde(default)]
    timestamp: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    #[serde(default)]
    info: String,
}

/// Parse a `list=categorymembers` response for the wiki in `lang`.
///
/// The API reports bad parameters as a 200 with an `error` object; that is
/// surfaced as a fetch failure.
pub fn parse_category_members(body: &[u8], lang: &str) -> TriggerResult<Vec<FeedItem>> {
    let response: QueryResponse =
        serde_json::from_slice(body).map_err(|e| TriggerError::Parse(e.to_string()))?;

    if let Some(err) = response.error {
        return Err(TriggerError::Fetch(format!("{}: {}", err.code, err.info)));
    }
    let query = response
        .query
        .ok_or_else(|| TriggerError::Parse("response has no query section".to_string()))?;

    query
        .categorymembers
        .into_iter()
        .map(|member| {
            Ok(FeedItem {
                link: article_url(lang, &member.title)?,
                guid: Some(format!("{lang}:{}", member.pageid)),
                published: member
                    .timestamp
                    .as_deref()
                    .and_then(|t| DateTime::parse_from_rfc3339(t).ok())
                    .map(|t| t.with_timezone(&Utc)),
                title: member.title,
                summary: String::new(),
                author: String::new(),
            })
        })
        .collect()
}

fn article_url(lang: &str, title: &str) -> TriggerResult<String> {
    let mut url = Url::parse(&format!("https://{lang}.wikipedia.org/wiki/"))
        .map_err(|e| TriggerError::Parse(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| TriggerError::Parse("article url cannot take a path".to_string()))?
        .pop_if_empty()
        .push(&title.replace(' ', "_"));
    Ok(url.to_string())
}
