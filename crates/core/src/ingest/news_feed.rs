use crate::config::Settings;
use crate::time::period::ReportPeriod;
use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.polygon.io";
const NEWS_PATH: &str = "/benzinga/v1/news";
const DEFAULT_LIMIT: u32 = 250;
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_RETRIES: u32 = 3;

#[async_trait::async_trait]
pub trait NewsFeed: Send + Sync {
    fn provider_name(&self) -> &'static str;

    fn default_publisher(&self) -> &'static str;

    async fn fetch(&self, period: &ReportPeriod) -> Result<Vec<Value>>;
}

#[derive(Debug, Clone)]
pub struct PolygonNewsFeed {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    limit: u32,
    retries: u32,
}

enum Failure {
    // Access problems that another attempt will not fix.
    Permanent(anyhow::Error),
    Transient(anyhow::Error),
}

impl PolygonNewsFeed {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let api_key = settings.require_polygon_api_key()?.to_string();
        let base_url = settings
            .news_feed_base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout_secs = std::env::var("NEWS_FEED_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let retries = std::env::var("NEWS_FEED_RETRIES")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(DEFAULT_RETRIES)
            .max(1);

        let limit = std::env::var("NEWS_FEED_LIMIT")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_LIMIT);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build news feed http client")?;

        Ok(Self {
            http,
            base_url,
            api_key,
            limit,
            retries,
        })
    }

    fn url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), NEWS_PATH)
    }

    fn query(&self, period: &ReportPeriod) -> Vec<(&'static str, String)> {
        vec![
            ("apiKey", self.api_key.clone()),
            ("limit", self.limit.to_string()),
            ("sort", "published.desc".to_string()),
            ("published.gte", period.start.format("%Y-%m-%d").to_string()),
            ("published.lte", period.end.format("%Y-%m-%d").to_string()),
        ]
    }

    async fn fetch_once(&self, period: &ReportPeriod) -> Result<Vec<Value>, Failure> {
        let res = self
            .http
            .get(self.url())
            .query(&self.query(period))
            .send()
            .await
            .context("Polygon API connection error")
            .map_err(Failure::Transient)?;

        let status = res.status();
        match status {
            StatusCode::FORBIDDEN => {
                return Err(Failure::Permanent(anyhow::anyhow!(
                    "Polygon API access denied. Check your Benzinga subscription status."
                )))
            }
            StatusCode::NOT_FOUND => {
                return Err(Failure::Permanent(anyhow::anyhow!(
                    "Benzinga endpoint not found. Verify your subscription includes Benzinga news access."
                )))
            }
            s if !s.is_success() => {
                return Err(Failure::Transient(anyhow::anyhow!(
                    "Polygon API HTTP error: {s}"
                )))
            }
            _ => {}
        }

        let text = res
            .text()
            .await
            .context("failed to read Polygon response")
            .map_err(Failure::Transient)?;
        let raw = serde_json::from_str::<Value>(&text)
            .context("failed to parse Polygon API response")
            .map_err(Failure::Permanent)?;
        Ok(extract_items(raw))
    }
}

#[async_trait::async_trait]
impl NewsFeed for PolygonNewsFeed {
    fn provider_name(&self) -> &'static str {
        "benzinga_via_polygon"
    }

    fn default_publisher(&self) -> &'static str {
        "Benzinga"
    }

    async fn fetch(&self, period: &ReportPeriod) -> Result<Vec<Value>> {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match self.fetch_once(period).await {
                Ok(items) => {
                    tracing::debug!(items = items.len(), %period, "fetched news items");
                    return Ok(items);
                }
                Err(Failure::Permanent(err)) => return Err(err),
                Err(Failure::Transient(err)) => {
                    if attempt >= self.retries {
                        return Err(err);
                    }
                    let backoff = Duration::from_secs(1 << (attempt - 1));
                    tracing::warn!(attempt, ?backoff, error = %err, "news feed fetch failed; retrying");
                    tokio::time::sleep(backoff).await;
                }
            }
        }
    }
}

pub fn extract_items(raw: Value) -> Vec<Value> {
    match raw {
        Value::Array(items) => items,
        Value::Object(mut map) => {
            if let Some(results) = map.remove("results") {
                return into_list(results);
            }
            if map.get("status").and_then(Value::as_str) == Some("OK") {
                if let Some(data) = map.remove("data") {
                    return into_list(data);
                }
            }
            if map.is_empty() {
                Vec::new()
            } else {
                vec![Value::Object(map)]
            }
        }
        _ => Vec::new(),
    }
}

fn into_list(v: Value) -> Vec<Value> {
    match v {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        other => vec![other],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn unwraps_results_envelope() {
        let items = extract_items(json!({"results": [{"id": 1}, {"id": 2}], "status": "OK"}));
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn unwraps_status_ok_data_envelope() {
        let items = extract_items(json!({"status": "OK", "data": [{"id": 1}]}));
        assert_eq!(items, vec![json!({"id": 1})]);
    }

    #[test]
    fn bare_list_and_single_object_pass_through() {
        assert_eq!(extract_items(json!([{"id": 1}])).len(), 1);
        assert_eq!(
            extract_items(json!({"id": 7, "title": "x"})),
            vec![json!({"id": 7, "title": "x"})]
        );
        assert!(extract_items(json!({})).is_empty());
        assert!(extract_items(json!("nope")).is_empty());
    }

    #[test]
    fn query_uses_period_bounds() {
        let feed = PolygonNewsFeed {
            http: reqwest::Client::new(),
            base_url: "https://api.polygon.io/".to_string(),
            api_key: "k".to_string(),
            limit: 250,
            retries: 1,
        };
        let period = ReportPeriod::new(
            NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
            NaiveDate::from_ymd_opt(2026, 1, 9).unwrap(),
        )
        .unwrap();
        let q = feed.query(&period);
        assert_eq!(feed.url(), "https://api.polygon.io/benzinga/v1/news");
        assert!(q.contains(&("published.gte", "2026-01-05".to_string())));
        assert!(q.contains(&("published.lte", "2026-01-09".to_string())));
        assert!(q.contains(&("sort", "published.desc".to_string())));
    }
}
