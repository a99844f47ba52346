use crate::domain::assets::{self, AssetClass};
use crate::domain::market::PriceBar;
use crate::ingest::MarketFeed;
use crate::time::period::ReportPeriod;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

const LOOKBACK_DAYS: i64 = 31;
const WEEK_BARS: usize = 7;
const MONTH_BARS: usize = 30;
const QUOTE_BASE_URL: &str = "https://finance.yahoo.com/quote";

#[derive(Debug, Clone, Default)]
pub struct SnapshotRequest {
    pub stocks: Vec<String>,
    pub forex: Vec<String>,
    pub indices: Vec<String>,
}

impl SnapshotRequest {
    pub fn is_empty(&self) -> bool {
        self.stocks.is_empty() && self.forex.is_empty() && self.indices.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetSnapshot {
    pub symbol: String,
    pub name: String,
    pub current_price: f64,
    pub weekly_change: Option<f64>,
    pub monthly_change: Option<f64>,
    pub link: String,
    pub asset_type: AssetClass,
}

impl AssetSnapshot {
    pub fn from_bars(symbol: &str, class: AssetClass, bars: &[PriceBar]) -> Option<Self> {
        let current = bars.last()?.close;
        Some(Self {
            symbol: symbol.to_string(),
            name: assets::lookup(symbol)
                .map(|a| a.name.to_string())
                .unwrap_or_else(|| symbol.to_string()),
            current_price: round_to(current, 4),
            weekly_change: percentage_change(bars, WEEK_BARS),
            monthly_change: percentage_change(bars, MONTH_BARS),
            link: quote_link(symbol, class),
            asset_type: class,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketSnapshot {
    pub stocks: Vec<AssetSnapshot>,
    pub forex: Vec<AssetSnapshot>,
    pub indices: Vec<AssetSnapshot>,
    pub last_updated: DateTime<Utc>,
}

// A series shorter than `bars_back` is measured from its first bar.
pub fn percentage_change(bars: &[PriceBar], bars_back: usize) -> Option<f64> {
    let bars_back = if bars.len() < bars_back {
        bars.len().saturating_sub(1)
    } else {
        bars_back
    };
    if bars_back == 0 {
        return None;
    }

    let current = bars.last()?.close;
    let past = bars.get(bars.len().checked_sub(bars_back + 1)?)?.close;
    if past == 0.0 {
        return None;
    }
    Some(round_to((current - past) / past * 100.0, 2))
}

pub fn quote_link(symbol: &str, class: AssetClass) -> String {
    let quoted = symbol.replace("=X", "").replace('^', "%5E");
    match class {
        AssetClass::Forex => format!("{QUOTE_BASE_URL}/{quoted}=X"),
        _ => format!("{QUOTE_BASE_URL}/{quoted}"),
    }
}

pub async fn collect(
    feed: &dyn MarketFeed,
    req: &SnapshotRequest,
    now: DateTime<Utc>,
) -> MarketSnapshot {
    let today = now.date_naive();
    let period = ReportPeriod {
        start: today - Duration::days(LOOKBACK_DAYS),
        end: today,
    };

    MarketSnapshot {
        stocks: collect_class(feed, &req.stocks, AssetClass::Stock, &period).await,
        forex: collect_class(feed, &req.forex, AssetClass::Forex, &period).await,
        indices: collect_class(feed, &req.indices, AssetClass::Index, &period).await,
        last_updated: now,
    }
}

async fn collect_class(
    feed: &dyn MarketFeed,
    symbols: &[String],
    class: AssetClass,
    period: &ReportPeriod,
) -> Vec<AssetSnapshot> {
    let mut out = Vec::with_capacity(symbols.len());
    for symbol in symbols {
        match feed.fetch(symbol, period).await {
            Ok(Some(bars)) => out.extend(AssetSnapshot::from_bars(symbol, class, &bars)),
            Ok(None) => tracing::debug!(symbol = %symbol, "no snapshot data"),
            Err(err) => {
                tracing::warn!(symbol = %symbol, error = %err, "snapshot fetch failed; skipping")
            }
        }
    }
    out
}

fn round_to(v: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (v * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn bars(closes: &[f64]) -> Vec<PriceBar> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceBar {
                timestamp: Utc.with_ymd_and_hms(2026, 1, 1, 21, 0, 0).unwrap()
                    + Duration::days(i as i64),
                open: None,
                close,
            })
            .collect()
    }

    #[test]
    fn change_reaches_back_the_requested_bars() {
        let series: Vec<f64> = (0..10).map(|i| 100.0 + i as f64).collect();
        // 109 against 102
        assert_eq!(percentage_change(&bars(&series), 7), Some(6.86));
    }

    #[test]
    fn short_series_measures_from_first_bar() {
        let series = bars(&[100.0, 104.0, 110.0]);
        assert_eq!(percentage_change(&series, 30), Some(10.0));
        assert_eq!(percentage_change(&bars(&[100.0]), 30), None);
        assert_eq!(percentage_change(&[], 7), None);
    }

    #[test]
    fn series_exactly_as_long_as_lookback_has_no_change() {
        assert_eq!(percentage_change(&bars(&[1.0; 7]), 7), None);
    }

    #[test]
    fn zero_past_price_has_no_change() {
        assert_eq!(percentage_change(&bars(&[0.0, 5.0, 6.0]), 2), None);
        assert_eq!(percentage_change(&bars(&[0.0, 5.0]), 30), None);
    }

    #[test]
    fn quote_links_follow_asset_class() {
        assert_eq!(
            quote_link("^GSPC", AssetClass::Index),
            "https://finance.yahoo.com/quote/%5EGSPC"
        );
        assert_eq!(
            quote_link("EURUSD=X", AssetClass::Forex),
            "https://finance.yahoo.com/quote/EURUSD=X"
        );
        assert_eq!(
            quote_link("AAPL", AssetClass::Stock),
            "https://finance.yahoo.com/quote/AAPL"
        );
    }

    struct Feed;

    #[async_trait::async_trait]
    impl MarketFeed for Feed {
        fn provider_name(&self) -> &'static str {
            "fake_market"
        }

        async fn fetch(
            &self,
            symbol: &str,
            period: &ReportPeriod,
        ) -> anyhow::Result<Option<Vec<PriceBar>>> {
            assert_eq!(period.trading_days(), LOOKBACK_DAYS + 1);
            match symbol {
                "AAPL" => Ok(Some(bars(&[200.0, 210.123456]))),
                "EURUSD=X" => anyhow::bail!("rate limited"),
                _ => Ok(None),
            }
        }
    }

    #[tokio::test]
    async fn collect_skips_symbols_without_data() {
        let now = Utc.with_ymd_and_hms(2026, 1, 9, 12, 0, 0).unwrap();
        let req = SnapshotRequest {
            stocks: vec!["AAPL".to_string(), "NOPE".to_string()],
            forex: vec!["EURUSD=X".to_string()],
            indices: vec![],
        };
        let snap = collect(&Feed, &req, now).await;

        assert!(snap.forex.is_empty());
        assert!(snap.indices.is_empty());
        assert_eq!(snap.stocks.len(), 1);
        let apple = &snap.stocks[0];
        assert_eq!(apple.name, "Apple Inc.");
        assert_eq!(apple.current_price, 210.1235);
        assert_eq!(apple.weekly_change, Some(5.06));
        assert_eq!(apple.monthly_change, Some(5.06));
        assert_eq!(apple.asset_type, AssetClass::Stock);
        assert_eq!(snap.last_updated, now);
    }
}
