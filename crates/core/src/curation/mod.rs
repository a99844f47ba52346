pub mod digest;
pub mod importance;
pub mod quality;
pub mod rules;
pub mod theme;

use crate::domain::news::NewsRecord;

pub fn filter_by_tickers(records: Vec<NewsRecord>, tickers: &[String]) -> Vec<NewsRecord> {
    if tickers.is_empty() {
        return records;
    }
    records
        .into_iter()
        .filter(|record| tickers.iter().any(|t| record.has_ticker(t.trim())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(title: &str, tickers: &[&str]) -> NewsRecord {
        NewsRecord {
            title: title.to_string(),
            tickers: tickers.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn keeps_records_mentioning_requested_tickers() {
        let records = vec![rec("a", &["AAPL"]), rec("b", &["MSFT", "NVDA"]), rec("c", &[])];
        let kept = filter_by_tickers(records, &["nvda".to_string(), " aapl ".to_string()]);
        let titles: Vec<&str> = kept.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "b"]);
    }

    #[test]
    fn empty_filter_is_a_no_op() {
        let records = vec![rec("a", &[]), rec("b", &["X"])];
        assert_eq!(filter_by_tickers(records, &[]).len(), 2);
    }
}
