use crate::config::Settings;
use crate::domain::market::PriceBar;
use crate::ingest::types::ChartResponse;
use crate::time::period::ReportPeriod;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use reqwest::{StatusCode, Url};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";
const DEFAULT_TIMEOUT_SECS: u64 = 20;
const USER_AGENT: &str = "Mozilla/5.0 (compatible; marketbrief/0.1)";

#[async_trait::async_trait]
pub trait MarketFeed: Send + Sync {
    fn provider_name(&self) -> &'static str;

    async fn fetch(&self, symbol: &str, period: &ReportPeriod) -> Result<Option<Vec<PriceBar>>>;
}

#[derive(Debug, Clone)]
pub struct YahooChartFeed {
    http: reqwest::Client,
    base_url: String,
}

impl YahooChartFeed {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let base_url = settings
            .market_feed_base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout_secs = std::env::var("MARKET_FEED_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .context("failed to build market feed http client")?;

        Ok(Self { http, base_url })
    }

    fn url(&self, symbol: &str) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .with_context(|| format!("invalid market feed base url: {}", self.base_url))?;
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("market feed base url cannot carry a path"))?
            .pop_if_empty()
            .extend(["v8", "finance", "chart", symbol]);
        Ok(url)
    }
}

fn window(period: &ReportPeriod) -> (i64, i64) {
    let at_midnight = |d: NaiveDate| {
        d.and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc().timestamp())
            .unwrap_or_default()
    };
    (
        at_midnight(period.start),
        at_midnight(period.end.succ_opt().unwrap_or(period.end)),
    )
}

#[async_trait::async_trait]
impl MarketFeed for YahooChartFeed {
    fn provider_name(&self) -> &'static str {
        "yahoo_chart"
    }

    async fn fetch(&self, symbol: &str, period: &ReportPeriod) -> Result<Option<Vec<PriceBar>>> {
        let (period1, period2) = window(period);
        let res = self
            .http
            .get(self.url(symbol)?)
            .query(&[
                ("period1", period1.to_string()),
                ("period2", period2.to_string()),
                ("interval", "1d".to_string()),
            ])
            .send()
            .await
            .with_context(|| format!("market feed request failed for {symbol}"))?;

        let status = res.status();
        if status == StatusCode::NOT_FOUND {
            tracing::debug!(symbol, "market feed has no such symbol");
            return Ok(None);
        }
        let text = res
            .text()
            .await
            .context("failed to read market feed response")?;
        anyhow::ensure!(
            status.is_success(),
            "market feed HTTP {status} for {symbol}: {text}"
        );

        let parsed = serde_json::from_str::<ChartResponse>(&text)
            .with_context(|| format!("failed to parse chart response for {symbol}"))?;
        if let Some(err) = &parsed.chart.error {
            tracing::debug!(symbol, code = %err.code, detail = %err.description, "chart error");
            return Ok(None);
        }

        let bars = parsed
            .chart
            .result
            .as_deref()
            .and_then(|results| results.first())
            .map(|r| r.bars())
            .unwrap_or_default();
        Ok((!bars.is_empty()).then_some(bars))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn feed() -> YahooChartFeed {
        YahooChartFeed {
            http: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    #[test]
    fn builds_chart_url_per_symbol() {
        let url = feed().url("^GSPC").unwrap();
        assert!(url.path().starts_with("/v8/finance/chart/"));
        assert!(url.path().ends_with("GSPC"));
        assert_eq!(url.host_str(), Some("query1.finance.yahoo.com"));
    }

    #[test]
    fn window_includes_end_day() {
        let period = ReportPeriod::new(
            NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
            NaiveDate::from_ymd_opt(2026, 1, 9).unwrap(),
        )
        .unwrap();
        let (p1, p2) = window(&period);
        assert_eq!(p2 - p1, 5 * 86_400);
    }

    #[test]
    fn null_closes_are_dropped() {
        let parsed: ChartResponse = serde_json::from_value(json!({
            "chart": {
                "result": [{
                    "timestamp": [1767596400, 1767682800, 1767769200],
                    "indicators": {"quote": [{
                        "open": [100.0, null, 102.0],
                        "close": [101.0, null, 103.5]
                    }]}
                }],
                "error": null
            }
        }))
        .unwrap();
        let bars = parsed.chart.result.unwrap()[0].bars();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].close, 101.0);
        assert_eq!(bars[1].open, Some(102.0));
    }
}
