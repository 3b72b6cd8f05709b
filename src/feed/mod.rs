//! Feed aggregation: fetch, parse, and order entries across sources.

pub mod aggregator;
pub mod parser;

use chrono::{DateTime, Utc};

/// One aggregated feed item.
///
/// `link` is the entry's identity for pin/read tracking; items published
/// without a usable link get a deterministic fallback derived from their
/// other fields. Entries are rebuilt wholesale each aggregation cycle and
/// never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub title: String,
    pub link: String,
    pub published: Option<DateTime<Utc>>,
    pub summary: Option<String>,
    pub source: String,
}

pub use aggregator::{fetch_all, fetch_source, sort_by_recency, FetchError};
pub use parser::parse_entries;
