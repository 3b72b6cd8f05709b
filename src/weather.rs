//! Weather badge: a temperature and condition glyph scraped from a
//! weather-query RSS feed.
//!
//! The first entry's title is all we look at: a temperature matched by
//! regex and a coarse condition keyword mapped to a glyph. A failed cycle
//! keeps the previous badge on screen.

use std::sync::OnceLock;

use anyhow::Result;
use feed_rs::parser;
use regex::Regex;

/// Badge shown before the first successful fetch.
pub const INITIAL_BADGE: &str = "☀ --°C";

/// Weather feed client. The URL is injectable (config and tests).
#[derive(Clone)]
pub struct WeatherClient {
    client: reqwest::Client,
    feed_url: String,
}

impl WeatherClient {
    pub fn new(client: reqwest::Client, feed_url: String) -> Self {
        Self { client, feed_url }
    }

    /// Fetch the feed and derive a badge from its first entry.
    ///
    /// `None` on any failure; the caller keeps whatever badge it had.
    pub async fn fetch_badge(&self) -> Option<String> {
        match self.try_fetch_badge().await {
            Ok(badge) => badge,
            Err(e) => {
                tracing::warn!(error = %e, "Weather fetch failed, keeping previous badge");
                None
            }
        }
    }

    async fn try_fetch_badge(&self) -> Result<Option<String>> {
        let response = self.client.get(&self.feed_url).send().await?;
        let bytes = response.bytes().await?;
        let feed = parser::parse(&bytes[..])?;

        let title = feed
            .entries
            .first()
            .and_then(|e| e.title.as_ref())
            .map(|t| t.content.as_str());

        Ok(title.map(badge_from_title))
    }
}

/// Derive `<glyph> <temp>°C` from a headline.
///
/// Temperature is the first `NN°C`/`NN℃` match; absent, it renders as
/// `--`. Condition keywords map to a glyph, defaulting to partly cloudy.
pub fn badge_from_title(title: &str) -> String {
    static TEMP_RE: OnceLock<Regex> = OnceLock::new();
    let re = TEMP_RE.get_or_init(|| {
        Regex::new(r"(\d+)\s*(?:°C|℃)").expect("temperature regex compiles")
    });

    let temp = re
        .captures(title)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .unwrap_or("--");

    let glyph = if title.contains('晴') {
        "☀"
    } else if title.contains('曇') {
        "☁"
    } else if title.contains('雨') {
        "🌧"
    } else {
        "⛅"
    };

    format!("{} {}°C", glyph, temp)
}
