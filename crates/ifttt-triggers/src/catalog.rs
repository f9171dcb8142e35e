//! The channel's Wikipedia triggers.
//!
//! Every trigger maps a poll onto one MediaWiki URL: an RSS feed, or the
//! query API's JSON category listing for `NewCategoryMember`. The sample
//! fields double as the list of fields a poll must supply.

use std::sync::Arc;

use async_trait::async_trait;
use ifttt_core::{Fields, PollRequest, Trigger, TriggerError, TriggerItem, TriggerResult};
use regex::Regex;
use reqwest::Url;
use serde_json::Value;

use crate::feed::{FeedItem, parse_feed};
use crate::fetch::FeedFetcher;
use crate::members::parse_category_members;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    FeaturedArticle,
    PictureOfTheDay,
    WordOfTheDay,
    PageHistory,
    UserContributions,
    NewPages,
    Hashtag,
    CategoryMembers,
    CategoryChanges,
    WikidataHistory,
}

pub struct WikiTrigger {
    name: &'static str,
    url_pattern: Option<&'static str>,
    default_fields: Fields,
    source: Source,
    fetcher: Arc<dyn FeedFetcher>,
}

/// All built-in triggers, in listing order.
pub fn catalog(fetcher: Arc<dyn FeedFetcher>) -> Vec<Arc<dyn Trigger>> {
    let lang = [("lang", "en")];
    let entries: [(&'static str, Option<&'static str>, Source, &[(&str, &str)]); 10] = [
        ("ArticleOfTheDay", None, Source::FeaturedArticle, &lang),
        ("PictureOfTheDay", None, Source::PictureOfTheDay, &lang),
        ("WordOfTheDay", None, Source::WordOfTheDay, &lang),
        ("ArticleRevisions", None, Source::PageHistory, &[("lang", "en"), ("title", "Coffee")]),
        ("UserRevisions", None, Source::UserContributions, &[("lang", "en"), ("user", "Jimbo Wales")]),
        ("NewArticle", None, Source::NewPages, &lang),
        ("NewHashtag", None, Source::Hashtag, &[("lang", "en"), ("hashtag", "wikipedia")]),
        ("NewCategoryMember", None, Source::CategoryMembers, &[("lang", "en"), ("category", "Coffee")]),
        ("CategoryMemberRevisions", None, Source::CategoryChanges, &[("lang", "en"), ("category", "Coffee")]),
        ("ItemRevisions", Some("wikidata_item_revisions"), Source::WikidataHistory, &[("item_id", "Q42")]),
    ];

    entries
        .into_iter()
        .map(|(name, url_pattern, source, fields)| {
            Arc::new(WikiTrigger {
                name,
                url_pattern,
                default_fields: fields
                    .iter()
                    .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
                    .collect(),
                source,
                fetcher: Arc::clone(&fetcher),
            }) as Arc<dyn Trigger>
        })
        .collect()
}

/// Language codes end up in a host name, so only letters and `-` pass.
fn language(request: &PollRequest) -> TriggerResult<&str> {
    let lang = request.require_field("lang")?.trim();
    if lang.len() > 16 || !lang.chars().all(|c| c.is_ascii_alphabetic() || c == '-') {
        return Err(TriggerError::MissingField("lang".to_string()));
    }
    Ok(lang)
}

fn wikidata_item(request: &PollRequest) -> TriggerResult<&str> {
    let id = request.require_field("item_id")?.trim();
    let valid = id.len() > 1
        && id.starts_with(['Q', 'P', 'L'])
        && id[1..].chars().all(|c| c.is_ascii_digit());
    if !valid {
        return Err(TriggerError::MissingField("item_id".to_string()));
    }
    Ok(id)
}

fn category(request: &PollRequest) -> TriggerResult<&str> {
    let category = request.require_field("category")?.trim();
    Ok(category.strip_prefix("Category:").unwrap_or(category))
}

/// Case-insensitive `#tag` match that ends at a non-word character or end of
/// text, so tags ending in punctuation (`#c++`) still match.
fn hashtag_matcher(request: &PollRequest) -> TriggerResult<Regex> {
    let tag = request.require_field("hashtag")?.trim().trim_start_matches('#');
    if tag.is_empty() {
        return Err(TriggerError::MissingField("hashtag".to_string()));
    }
    Regex::new(&format!(r"(?i)#{}(?:$|[^\w])", regex::escape(tag)))
        .map_err(|_| TriggerError::MissingField("hashtag".to_string()))
}

impl WikiTrigger {
    fn feed_url(&self, request: &PollRequest) -> TriggerResult<Url> {
        let rss = ("feedformat", "rss".to_string());
        let (base, params): (String, Vec<(&str, String)>) = match self.source {
            Source::FeaturedArticle => (
                format!("https://{}.wikipedia.org/w/api.php", language(request)?),
                vec![("action", "featuredfeed".into()), ("feed", "featured".into()), rss],
            ),
            Source::PictureOfTheDay => (
                "https://commons.wikimedia.org/w/api.php".to_string(),
                vec![
                    ("action", "featuredfeed".into()),
                    ("feed", "potd".into()),
                    rss,
                    ("language", language(request)?.to_string()),
                ],
            ),
            Source::WordOfTheDay => (
                format!("https://{}.wiktionary.org/w/api.php", language(request)?),
                vec![("action", "featuredfeed".into()), ("feed", "wotd".into()), rss],
            ),
            Source::PageHistory => (
                format!("https://{}.wikipedia.org/w/index.php", language(request)?),
                vec![
                    ("title", request.require_field("title")?.to_string()),
                    ("action", "history".into()),
                    ("feed", "rss".into()),
                ],
            ),
            Source::UserContributions => (
                format!("https://{}.wikipedia.org/w/api.php", language(request)?),
                vec![
                    ("action", "feedcontributions".into()),
                    ("user", request.require_field("user")?.to_string()),
                    rss,
                ],
            ),
            Source::NewPages => (
                format!("https://{}.wikipedia.org/w/index.php", language(request)?),
                vec![("title", "Special:NewPages".into()), ("feed", "rss".into())],
            ),
            Source::Hashtag => (
                format!("https://{}.wikipedia.org/w/api.php", language(request)?),
                vec![("action", "feedrecentchanges".into()), ("hidebots", "1".into()), rss],
            ),
            Source::CategoryMembers => (
                format!("https://{}.wikipedia.org/w/api.php", language(request)?),
                vec![
                    ("action", "query".into()),
                    ("list", "categorymembers".into()),
                    ("cmtitle", format!("Category:{}", category(request)?)),
                    ("cmsort", "timestamp".into()),
                    ("cmdir", "desc".into()),
                    ("cmprop", "ids|title|timestamp".into()),
                    ("cmlimit", ifttt_core::poll::DEFAULT_LIMIT.to_string()),
                    ("format", "json".into()),
                ],
            ),
            Source::CategoryChanges => (
                format!("https://{}.wikipedia.org/w/api.php", language(request)?),
                vec![
                    ("action", "feedrecentchanges".into()),
                    ("categories", category(request)?.to_string()),
                    rss,
                ],
            ),
            Source::WikidataHistory => (
                "https://www.wikidata.org/w/index.php".to_string(),
                vec![
                    ("title", wikidata_item(request)?.to_string()),
                    ("action", "history".into()),
                    ("feed", "rss".into()),
                ],
            ),
        };

        Url::parse_with_params(&base, &params).map_err(|e| TriggerError::Fetch(e.to_string()))
    }
}

#[async_trait]
impl Trigger for WikiTrigger {
    fn name(&self) -> &str {
        self.name
    }

    fn url_pattern(&self) -> Option<&str> {
        self.url_pattern
    }

    fn default_fields(&self) -> &Fields {
        &self.default_fields
    }

    async fn poll(&self, request: &PollRequest) -> TriggerResult<Vec<TriggerItem>> {
        let url = self.feed_url(request)?;
        let matcher = match self.source {
            Source::Hashtag => Some(hashtag_matcher(request)?),
            _ => None,
        };

        let body = self
            .fetcher
            .fetch(&url)
            .await
            .map_err(|e| TriggerError::Fetch(e.to_string()))?;
        let mut items = match self.source {
            Source::CategoryMembers => parse_category_members(&body, language(request)?)?,
            _ => parse_feed(&body)?,
        };

        if let Some(matcher) = matcher {
            items.retain(|item| matcher.is_match(&item.summary) || matcher.is_match(&item.title));
        }

        tracing::debug!(trigger = self.name, count = items.len(), "feed polled");
        Ok(items.into_iter().map(FeedItem::into_trigger_item).collect())
    }
}
