use anyhow::Result;
use feed_rs::parser;
use sha2::{Digest, Sha256};

use super::Entry;

/// Parse raw feed bytes into at most `limit` entries tagged with
/// `source_name`.
///
/// Field defaults follow the wire reality of syndication feeds:
/// - missing title → "Untitled"
/// - publish time falls back to the updated time, else stays absent
/// - summary falls back to the content body, else stays absent
/// - missing link → deterministic SHA-256 identity over the other fields,
///   so pin/read tracking still has a stable key
pub fn parse_entries(bytes: &[u8], source_name: &str, limit: usize) -> Result<Vec<Entry>> {
    let feed = parser::parse(bytes)?;

    let entries: Vec<Entry> = feed
        .entries
        .into_iter()
        .take(limit)
        .map(|entry| {
            let link = entry.links.first().map(|l| l.href.clone());
            let published = entry.published.or(entry.updated);
            let summary = entry
                .summary
                .map(|s| s.content)
                .or_else(|| entry.content.and_then(|c| c.body));
            let title = entry
                .title
                .map(|t| t.content)
                .unwrap_or_else(|| "Untitled".to_string());

            let existing_id = if entry.id.is_empty() {
                None
            } else {
                Some(entry.id.as_str())
            };
            let link = link.unwrap_or_else(|| {
                fallback_link(existing_id, &title, published.map(|dt| dt.timestamp()))
            });

            Entry {
                title,
                link,
                published,
                summary,
                source: source_name.to_string(),
            }
        })
        .collect();

    Ok(entries)
}

/// Stable identity for entries with no link: the feed's own id when
/// present, else a hash of title and timestamp.
fn fallback_link(existing_id: Option<&str>, title: &str, published: Option<i64>) -> String {
    if let Some(id) = existing_id {
        let trimmed = id.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let input = format!(
        "{}|{}",
        title,
        published.map(|p| p.to_string()).unwrap_or_default()
    );
    let hash = Sha256::digest(input.as_bytes());
    format!("urn:sha256:{:x}", hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RSS: &str = r#"<?xml version="1.0"?>
<rss version="2.0"><channel><title>Wire</title>
  <item>
    <title>Markets rally on rate pause</title>
    <link>https://example.com/rally</link>
    <pubDate>Tue, 04 Aug 2026 09:00:00 GMT</pubDate>
    <description>Stocks &lt;b&gt;jumped&lt;/b&gt; overnight.</description>
  </item>
  <item>
    <title>Undated follow-up</title>
    <link>https://example.com/followup</link>
  </item>
</channel></rss>"#;

    #[test]
    fn parses_and_tags_entries() {
        let entries = parse_entries(RSS.as_bytes(), "Wire", 10).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title, "Markets rally on rate pause");
        assert_eq!(entries[0].link, "https://example.com/rally");
        assert_eq!(entries[0].source, "Wire");
        assert!(entries[0].published.is_some());
        assert!(entries[0].summary.is_some());
    }

    #[test]
    fn missing_publish_time_stays_absent() {
        let entries = parse_entries(RSS.as_bytes(), "Wire", 10).unwrap();
        assert!(entries[1].published.is_none());
    }

    #[test]
    fn limit_caps_entry_count() {
        let entries = parse_entries(RSS.as_bytes(), "Wire", 1).unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn missing_title_defaults_to_untitled() {
        let rss = r#"<?xml version="1.0"?>
<rss version="2.0"><channel>
  <item><link>https://example.com/x</link></item>
</channel></rss>"#;
        let entries = parse_entries(rss.as_bytes(), "Wire", 10).unwrap();
        assert_eq!(entries[0].title, "Untitled");
    }

    #[test]
    fn missing_link_gets_stable_fallback() {
        let rss = r#"<?xml version="1.0"?>
<rss version="2.0"><channel>
  <item><title>Linkless item</title></item>
</channel></rss>"#;
        let a = parse_entries(rss.as_bytes(), "Wire", 10).unwrap();
        let b = parse_entries(rss.as_bytes(), "Wire", 10).unwrap();
        assert!(!a[0].link.is_empty());
        assert_eq!(a[0].link, b[0].link);
    }

    #[test]
    fn garbage_input_is_an_error() {
        assert!(parse_entries(b"<not a feed", "Wire", 10).is_err());
    }
}
