use anyhow::Context;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;

// Lookback used when the caller gives no start date.
const DEFAULT_LOOKBACK_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ReportPeriod {
    pub fn new(start: NaiveDate, end: NaiveDate) -> anyhow::Result<Self> {
        anyhow::ensure!(
            start <= end,
            "report start date {start} is after end date {end}"
        );
        Ok(Self { start, end })
    }

    pub fn resolve(
        start_arg: Option<&str>,
        end_arg: Option<&str>,
        now_utc: DateTime<Utc>,
    ) -> anyhow::Result<Self> {
        let end = match end_arg {
            Some(s) => parse_date(s)?,
            None => now_utc.date_naive(),
        };
        let start = match start_arg {
            Some(s) => parse_date(s)?,
            None => end - Duration::days(DEFAULT_LOOKBACK_DAYS),
        };
        Self::new(start, end)
    }

    pub fn trading_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn label(&self) -> String {
        format!(
            "{} - {}",
            self.start.format("%d"),
            self.end.format("%d %B %Y")
        )
    }

    pub fn short_label(&self) -> String {
        format!(
            "{} - {}",
            self.start.format("%b %d"),
            self.end.format("%b %d, %Y")
        )
    }
}

impl std::fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("invalid date {s:?} (expected YYYY-MM-DD)"))
}
