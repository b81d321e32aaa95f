//! News provider client
//!
//! Proxies the Alpha Vantage market news & sentiment endpoint and reshapes
//! its feed into the article format the front end renders. Provider
//! timestamps arrive in a compact `YYYYMMDDTHHMMSS` form and leave as
//! ISO-8601.

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::error;

use crate::config::AppConfig;
use crate::error::NewsError;

/// Source name used when a feed item carries none
const DEFAULT_SOURCE_NAME: &str = "Alpha Vantage";

/// Provider request timeout
const PROVIDER_TIMEOUT_SECS: u64 = 10;

/// Raw provider body. The provider reports errors inside an OK body, so
/// both members are optional.
#[derive(Debug, Deserialize)]
pub struct ProviderBody {
    pub feed: Option<Vec<FeedItem>>,
    #[serde(rename = "Error Message")]
    pub error_message: Option<String>,
}

/// One news entry as the provider sends it
#[derive(Debug, Deserialize)]
pub struct FeedItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub time_published: String,
    #[serde(default)]
    pub summary: String,
}

/// One news entry as the front end expects it
#[derive(Debug, Serialize)]
pub struct Article {
    pub title: String,
    pub url: String,
    pub source: ArticleSource,
    #[serde(rename = "publishedAt")]
    pub published_at: String,
    pub description: String,
    pub content: String,
}

/// Publisher attribution for one article
#[derive(Debug, Serialize)]
pub struct ArticleSource {
    pub name: String,
}

impl From<FeedItem> for Article {
    fn from(item: FeedItem) -> Self {
        let name = if item.source.is_empty() {
            DEFAULT_SOURCE_NAME.to_string()
        } else {
            item.source
        };
        Self {
            title: item.title,
            url: item.url,
            source: ArticleSource { name },
            published_at: compact_to_iso(&item.time_published),
            description: item.summary.clone(),
            content: item.summary,
        }
    }
}

/// Client for the news provider
#[derive(Clone)]
pub struct NewsClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl NewsClient {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(PROVIDER_TIMEOUT_SECS))
            .build()
            .context("Failed to build news HTTP client")?;

        Ok(Self {
            http,
            base_url: config.news_base_url.clone(),
            api_key: config.news_api_key.clone(),
        })
    }

    /// Fetch the market news feed and reshape it. `limit` is passed through
    /// to the provider verbatim.
    pub async fn fetch_articles(&self, limit: &str) -> Result<Vec<Article>, NewsError> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("function", "NEWS_SENTIMENT"),
                ("topics", "financial_markets"),
                ("limit", limit),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|err| {
                error!("Error fetching news: {}", err);
                NewsError::Fetch(err)
            })?;

        // The provider reports errors inside OK bodies; status is not the signal
        let body: ProviderBody = response.json().await.map_err(|err| {
            error!("Error parsing news provider response: {}", err);
            NewsError::BadBody(err)
        })?;

        match body.feed {
            Some(feed) => Ok(reshape_feed(feed)),
            None => {
                let message = body
                    .error_message
                    .unwrap_or_else(|| "Invalid response from Alpha Vantage".to_string());
                error!("News provider error: {}", message);
                Err(NewsError::Provider(message))
            }
        }
    }
}

/// Map provider feed items into front-end articles
pub fn reshape_feed(feed: Vec<FeedItem>) -> Vec<Article> {
    feed.into_iter().map(Article::from).collect()
}

/// Convert the provider's compact `YYYYMMDDTHHMMSS` timestamp to
/// `YYYY-MM-DDTHH:MM:SS`, digits preserved verbatim. Absent or malformed
/// values fall back to the current time in full ISO-8601.
pub fn compact_to_iso(compact: &str) -> String {
    let bytes = compact.as_bytes();
    let well_formed = bytes.len() == 15
        && bytes[8] == b'T'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 8 || b.is_ascii_digit());

    if !well_formed {
        return Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    }

    format!(
        "{}-{}-{}T{}:{}:{}",
        &compact[0..4],
        &compact[4..6],
        &compact[6..8],
        &compact[9..11],
        &compact[11..13],
        &compact[13..15]
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_converts_compact_timestamps_verbatim() {
        assert_eq!(compact_to_iso("20240115T093000"), "2024-01-15T09:30:00");
        assert_eq!(compact_to_iso("19991231T235959"), "1999-12-31T23:59:59");
        assert_eq!(compact_to_iso("20240101T120000"), "2024-01-01T12:00:00");
    }

    #[test]
    fn test_empty_timestamp_falls_back_to_now() {
        let got = compact_to_iso("");
        let parsed = chrono::DateTime::parse_from_rfc3339(&got).unwrap();
        let age = Utc::now().signed_duration_since(parsed.with_timezone(&Utc));
        assert!(age.num_seconds().abs() < 5);
    }

    #[test]
    fn test_malformed_timestamp_falls_back_to_now() {
        for bad in ["2024-01-15", "20240115 093000", "garbage", "20240115T09300"] {
            let got = compact_to_iso(bad);
            assert!(
                chrono::DateTime::parse_from_rfc3339(&got).is_ok(),
                "not ISO-8601 for input {:?}: {}",
                bad,
                got
            );
        }
    }

    #[test]
    fn test_reshapes_feed_items_into_articles() {
        let body: ProviderBody = serde_json::from_value(json!({
            "items": "1",
            "feed": [{
                "title": "T",
                "url": "U",
                "source": "S",
                "time_published": "20240101T120000",
                "summary": "D",
                "overall_sentiment_label": "Neutral"
            }]
        }))
        .unwrap();

        let articles = reshape_feed(body.feed.unwrap());
        assert_eq!(articles.len(), 1);
        let article = &articles[0];
        assert_eq!(article.title, "T");
        assert_eq!(article.url, "U");
        assert_eq!(article.source.name, "S");
        assert_eq!(article.published_at, "2024-01-01T12:00:00");
        assert_eq!(article.description, "D");
        assert_eq!(article.content, "D");
    }

    #[test]
    fn test_missing_source_uses_provider_name() {
        let item = FeedItem {
            title: "T".into(),
            url: "U".into(),
            source: String::new(),
            time_published: "20240101T120000".into(),
            summary: "D".into(),
        };
        let article = Article::from(item);
        assert_eq!(article.source.name, "Alpha Vantage");
    }

    #[test]
    fn test_article_serializes_with_camel_case_published_at() {
        let article = Article::from(FeedItem {
            title: "T".into(),
            url: "U".into(),
            source: "S".into(),
            time_published: "20240101T120000".into(),
            summary: "D".into(),
        });
        let value = serde_json::to_value(&article).unwrap();
        assert_eq!(value["publishedAt"], "2024-01-01T12:00:00");
        assert_eq!(value["source"]["name"], "S");
    }

    #[test]
    fn test_feedless_body_exposes_provider_error_message() {
        let body: ProviderBody =
            serde_json::from_value(json!({ "Error Message": "the apikey is invalid" })).unwrap();
        assert!(body.feed.is_none());
        assert_eq!(body.error_message.as_deref(), Some("the apikey is invalid"));
    }
}
