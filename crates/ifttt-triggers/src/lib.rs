//! ifttt-triggers — the Wikipedia trigger catalog.
//!
//! Each trigger polls a MediaWiki RSS feed (featured content, page history,
//! contributions, recent changes) or the query API's category listing
//! through a [`FeedFetcher`].

pub mod catalog;
pub mod feed;
pub mod fetch;
pub mod members;

pub use catalog::{WikiTrigger, catalog};
pub use fetch::{FeedFetcher, FetchError, HttpFetcher};
