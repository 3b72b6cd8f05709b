use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::future;
use futures::StreamExt;
use thiserror::Error;

use super::{parse_entries, Entry};
use crate::sources::{Source, SourceRegistry};

/// Feed responses above this size are abandoned mid-stream.
const MAX_FEED_SIZE: usize = 2 * 1024 * 1024; // 2MB

/// Per-request fetch timeout.
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that can occur while fetching a single source's feed.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Request exceeded the fetch timeout
    #[error("Request timed out")]
    Timeout,
    /// Feed bytes could not be parsed as RSS or Atom
    #[error("Parse error: {0}")]
    Parse(String),
    /// Response body exceeded the size limit
    #[error("Response too large")]
    ResponseTooLarge,
}

/// Fetch one source's feed and return its most recent entries, tagged with
/// the source name.
pub async fn fetch_source(
    client: &reqwest::Client,
    source: &Source,
    limit: usize,
) -> Result<Vec<Entry>, FetchError> {
    let response = tokio::time::timeout(FETCH_TIMEOUT, client.get(&source.url).send())
        .await
        .map_err(|_| FetchError::Timeout)?
        .map_err(FetchError::Network)?;

    if !response.status().is_success() {
        return Err(FetchError::HttpStatus(response.status().as_u16()));
    }

    let bytes = read_limited_bytes(response, MAX_FEED_SIZE).await?;
    parse_entries(&bytes, &source.name, limit).map_err(|e| FetchError::Parse(e.to_string()))
}

/// One aggregation pass over every active source.
///
/// Sources are fetched concurrently but assembled in source-list order, so
/// ties in the recency sort resolve the same way every cycle. A failed
/// source contributes nothing and is logged at warn; it never aborts the
/// pass. The combined list is sorted descending by publish time with
/// `now` substituted for missing timestamps, so undated entries surface
/// first rather than sinking to the bottom.
pub async fn fetch_all(
    client: &reqwest::Client,
    registry: &SourceRegistry,
    limit: usize,
    now: DateTime<Utc>,
) -> Vec<Entry> {
    let active: Vec<&Source> = registry
        .sources()
        .iter()
        .filter(|s| registry.is_active(&s.name))
        .collect();

    let fetches = active
        .iter()
        .map(|source| fetch_source(client, source, limit));
    let results = future::join_all(fetches).await;

    let mut entries = Vec::new();
    for (source, result) in active.iter().zip(results) {
        match result {
            Ok(batch) => {
                tracing::debug!(source = %source.name, count = batch.len(), "Source fetched");
                entries.extend(batch);
            }
            Err(e) => {
                tracing::warn!(source = %source.name, url = %source.url, error = %e, "Source fetch failed");
            }
        }
    }

    sort_by_recency(&mut entries, now);
    entries
}

/// Stable descending sort by publish time; entries without one sort as if
/// published at `now`.
pub fn sort_by_recency(entries: &mut [Entry], now: DateTime<Utc>) {
    entries.sort_by_key(|e| std::cmp::Reverse(e.published.unwrap_or(now)));
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FetchError> {
    // Fast path: reject on Content-Length before streaming
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(FetchError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(FetchError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}
