use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub timestamp: DateTime<Utc>,
    pub open: Option<f64>,
    pub close: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketPoint {
    pub symbol: String,
    pub start_price: f64,
    pub end_price: f64,
    pub change_pct: f64,
    pub period_days: usize,
}

impl MarketPoint {
    // The change uses the unrounded closes.
    pub fn from_series(symbol: &str, series: &[PriceBar]) -> Option<Self> {
        if series.len() < 2 {
            return None;
        }
        let start = series.first()?.close;
        let end = series.last()?.close;
        if !start.is_finite() || !end.is_finite() || start <= 0.0 {
            return None;
        }

        let change_pct = (end - start) / start * 100.0;
        Some(Self {
            symbol: symbol.to_string(),
            start_price: round2(start),
            end_price: round2(end),
            change_pct: round2(change_pct),
            period_days: series.len(),
        })
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
