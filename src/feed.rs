//! Live-feed prompts.
//!
//! A prompt-file entry that looks like an HTTP(S) URL is treated as a
//! syndication feed (RSS or Atom — `feed-rs` handles both). One entry is
//! chosen uniformly at random and its trimmed title becomes the prompt, so a
//! frame pointed at a headlines feed paints the news.
//!
//! Fail-fast by design: a dead feed, an empty feed, or a blank title aborts
//! the run immediately. No retries — generating an image from a garbage
//! prompt wastes minutes of Raspberry Pi CPU, an aborted run wastes nothing.

use rand::Rng;
use rand::seq::SliceRandom;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Feed fetch failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Feed parse failed for {url}: {source}")]
    Parse {
        url: String,
        source: feed_rs::parser::ParseFeedError,
    },
    #[error("No entries found in feed: {0}")]
    NoEntries(String),
    #[error("No valid title found in feed: {0}")]
    EmptyTitle(String),
}

/// Returns true when a prompt-file entry should be treated as a feed URL.
pub fn is_feed_url(candidate: &str) -> bool {
    candidate.starts_with("http://") || candidate.starts_with("https://")
}

/// Fetch `url` and return the trimmed title of one randomly chosen entry.
///
/// This is the only network access in the generation pipeline, and it blocks
/// until the feed responds.
pub fn fetch_random_title(url: &str, rng: &mut impl Rng) -> Result<String, FeedError> {
    let body = reqwest::blocking::get(url)?.error_for_status()?.bytes()?;
    pick_random_title(&body, url, rng)
}

/// Parse feed bytes and pick one entry's trimmed title.
///
/// Split from the fetch so tests can hand in inline XML.
pub fn pick_random_title(body: &[u8], url: &str, rng: &mut impl Rng) -> Result<String, FeedError> {
    let feed = feed_rs::parser::parse(body).map_err(|source| FeedError::Parse {
        url: url.to_string(),
        source,
    })?;
    if feed.entries.is_empty() {
        return Err(FeedError::NoEntries(url.to_string()));
    }
    // Non-empty checked above, choose cannot fail
    let entry = feed.entries.choose(rng).unwrap();
    let title = entry
        .title
        .as_ref()
        .map(|t| t.content.trim().to_string())
        .unwrap_or_default();
    if title.is_empty() {
        return Err(FeedError::EmptyTitle(url.to_string()));
    }
    Ok(title)
}
