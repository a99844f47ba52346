use chrono::{DateTime, Utc};
use marketbrief_core::domain::assets;
use marketbrief_core::domain::language::Language;
use marketbrief_core::pipeline::{PipelineOptions, ReportRequest};
use marketbrief_core::snapshot::SnapshotRequest;
use marketbrief_core::time::period::ReportPeriod;

#[derive(Debug, Clone, clap::Args)]
pub struct ReportArgs {
    /// First day covered (YYYY-MM-DD). Defaults to seven days before the end.
    #[arg(long)]
    pub start: Option<String>,

    /// Last day covered (YYYY-MM-DD). Defaults to today (UTC).
    #[arg(long)]
    pub end: Option<String>,

    /// Output language: English, Thai, "Simplified Chinese", "Traditional Chinese", Vietnamese.
    #[arg(long, default_value = "English")]
    pub language: String,

    /// Comma-separated market symbols. Defaults to the leading major indices.
    #[arg(long, value_delimiter = ',')]
    pub symbols: Vec<String>,

    /// Comma-separated tickers; only news mentioning one of them is used.
    #[arg(long, value_delimiter = ',')]
    pub tickers: Vec<String>,

    /// Print the synthesis prompt instead of generating the report.
    #[arg(long)]
    pub print_prompt: bool,

    /// Continue with a "no market data" notice when no symbol returns prices.
    #[arg(long)]
    pub allow_missing_market_data: bool,
}

impl ReportArgs {
    pub fn to_request(&self, now: DateTime<Utc>) -> anyhow::Result<ReportRequest> {
        let period = ReportPeriod::resolve(self.start.as_deref(), self.end.as_deref(), now)?;
        let language = self.language.parse::<Language>()?;

        let mut symbols = clean(&self.symbols);
        if symbols.is_empty() {
            symbols = assets::default_report_symbols();
        }
        for symbol in &symbols {
            if assets::lookup(symbol).is_none() {
                tracing::warn!(symbol, "symbol not in the asset catalog; requesting anyway");
            }
        }

        Ok(ReportRequest {
            period,
            language,
            symbols,
            tickers: clean(&self.tickers),
        })
    }

    pub fn options(&self) -> PipelineOptions {
        let mut options = PipelineOptions::default();
        if self.allow_missing_market_data {
            options.require_market_data = false;
        } else if let Ok(s) = std::env::var("REQUIRE_MARKET_DATA") {
            if let Ok(b) = s.parse::<bool>() {
                options.require_market_data = b;
            }
        }
        options
    }
}

#[derive(Debug, Clone, clap::Args)]
pub struct SnapshotArgs {
    #[arg(long, value_delimiter = ',')]
    pub stocks: Vec<String>,

    #[arg(long, value_delimiter = ',')]
    pub forex: Vec<String>,

    /// With no selection at all, the default report indices are used.
    #[arg(long, value_delimiter = ',')]
    pub indices: Vec<String>,
}

impl SnapshotArgs {
    pub fn to_request(&self) -> SnapshotRequest {
        let mut req = SnapshotRequest {
            stocks: clean(&self.stocks),
            forex: clean(&self.forex),
            indices: clean(&self.indices),
        };
        if req.is_empty() {
            req.indices = assets::default_report_symbols();
        }
        req
    }
}

fn clean(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use clap::Parser;

    #[derive(Debug, Parser)]
    struct Cli {
        #[command(flatten)]
        report: ReportArgs,
    }

    fn parse(args: &[&str]) -> ReportArgs {
        Cli::try_parse_from(std::iter::once("worker").chain(args.iter().copied()))
            .unwrap()
            .report
    }

    #[test]
    fn defaults_cover_trailing_week_and_leading_indices() {
        let now = Utc.with_ymd_and_hms(2026, 1, 9, 15, 0, 0).unwrap();
        let req = parse(&[]).to_request(now).unwrap();
        assert_eq!(req.period.end, NaiveDate::from_ymd_opt(2026, 1, 9).unwrap());
        assert_eq!(req.language, Language::English);
        assert_eq!(req.symbols, assets::default_report_symbols());
        assert!(req.tickers.is_empty());
    }

    #[test]
    fn comma_lists_and_language_are_parsed() {
        let now = Utc.with_ymd_and_hms(2026, 1, 9, 15, 0, 0).unwrap();
        let req = parse(&[
            "--language",
            "zh-hant",
            "--symbols",
            "^HSI, ^N225",
            "--tickers",
            "BABA,,NIO",
        ])
        .to_request(now)
        .unwrap();
        assert_eq!(req.language, Language::TraditionalChinese);
        assert_eq!(req.symbols, vec!["^HSI", "^N225"]);
        assert_eq!(req.tickers, vec!["BABA", "NIO"]);
    }

    #[test]
    fn bad_language_is_rejected() {
        let now = Utc.with_ymd_and_hms(2026, 1, 9, 15, 0, 0).unwrap();
        assert!(parse(&["--language", "Klingon"]).to_request(now).is_err());
    }

    #[test]
    fn snapshot_defaults_to_report_indices() {
        #[derive(Debug, Parser)]
        struct SnapshotCli {
            #[command(flatten)]
            snapshot: SnapshotArgs,
        }

        let args = SnapshotCli::try_parse_from(["worker"]).unwrap().snapshot;
        let req = args.to_request();
        assert!(req.stocks.is_empty());
        assert_eq!(req.indices, assets::default_report_symbols());

        let args = SnapshotCli::try_parse_from(["worker", "--forex", "EURUSD=X, USDJPY=X"])
            .unwrap()
            .snapshot;
        let req = args.to_request();
        assert_eq!(req.forex, vec!["EURUSD=X", "USDJPY=X"]);
        assert!(req.indices.is_empty());
    }

    #[test]
    fn flag_relaxes_market_requirement() {
        assert!(!parse(&["--allow-missing-market-data"]).options().require_market_data);
    }
}
