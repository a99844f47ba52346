use chrono::{DateTime, Duration, Utc};
use marketbrief_core::ingest::{MarketFeed, NewsFeed};
use marketbrief_core::llm::{CompletionRequest, TextSynthesizer};
use marketbrief_core::time::period::ReportPeriod;
use serde::Serialize;

const MARKET_PROBE_SYMBOL: &str = "AAPL";
const MARKET_PROBE_LOOKBACK_DAYS: i64 = 5;

#[derive(Debug, Clone, Serialize)]
pub struct ProbeStatus {
    pub collaborator: &'static str,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_items: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_symbol: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub checked_at: DateTime<Utc>,
}

impl ProbeStatus {
    fn connected(collaborator: &'static str, provider: String, sample_items: Option<usize>) -> Self {
        Self {
            collaborator,
            status: "connected",
            provider: Some(provider),
            sample_items,
            test_symbol: None,
            test_price: None,
            error: None,
            checked_at: Utc::now(),
        }
    }

    pub fn failed(collaborator: &'static str, err: &anyhow::Error) -> Self {
        Self {
            collaborator,
            status: "error",
            provider: None,
            sample_items: None,
            test_symbol: None,
            test_price: None,
            error: Some(format!("{err:#}")),
            checked_at: Utc::now(),
        }
    }
}

/// Fetches a one-day window.
pub async fn probe_news(feed: &dyn NewsFeed, now: DateTime<Utc>) -> ProbeStatus {
    let today = now.date_naive();
    let period = ReportPeriod { start: today, end: today };
    match feed.fetch(&period).await {
        Ok(items) => ProbeStatus::connected(
            "news_feed",
            feed.provider_name().to_string(),
            Some(items.len()),
        ),
        Err(err) => ProbeStatus::failed("news_feed", &err),
    }
}

// Reaches back a few days so weekends still return bars.
pub async fn probe_market(feed: &dyn MarketFeed, now: DateTime<Utc>) -> ProbeStatus {
    let today = now.date_naive();
    let period = ReportPeriod {
        start: today - Duration::days(MARKET_PROBE_LOOKBACK_DAYS),
        end: today,
    };
    match feed.fetch(MARKET_PROBE_SYMBOL, &period).await {
        Ok(Some(bars)) if !bars.is_empty() => {
            let mut status =
                ProbeStatus::connected("market_feed", feed.provider_name().to_string(), None);
            status.sample_items = Some(bars.len());
            status.test_symbol = Some(MARKET_PROBE_SYMBOL);
            status.test_price = bars.last().map(|b| (b.close * 100.0).round() / 100.0);
            status
        }
        Ok(_) => {
            let mut status =
                ProbeStatus::connected("market_feed", feed.provider_name().to_string(), None);
            status.status = "no_data";
            status.test_symbol = Some(MARKET_PROBE_SYMBOL);
            status.error = Some("Connected but no data received".to_string());
            status
        }
        Err(err) => ProbeStatus::failed("market_feed", &err),
    }
}

pub async fn probe_synthesizer(synthesizer: &dyn TextSynthesizer) -> ProbeStatus {
    let req = CompletionRequest::new("You are a connectivity check.", "Reply with the single word: ok")
        .max_tokens(5)
        .temperature(0.0);
    match synthesizer.complete(req).await {
        Ok(_) => ProbeStatus::connected(
            "text_synthesizer",
            format!("{:?}", synthesizer.provider()),
            None,
        ),
        Err(err) => ProbeStatus::failed("text_synthesizer", &err),
    }
}
