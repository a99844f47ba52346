use crate::curation::rules::RegionRules;
use crate::domain::market::MarketPoint;

pub const NO_MARKET_DATA: &str = "No market data available for this period.";

// Sorted once by change_pct (stable, descending), then partitioned by region.
pub fn format_market_narrative(points: &[MarketPoint], regions: &RegionRules) -> String {
    if points.is_empty() {
        return NO_MARKET_DATA.to_string();
    }

    let mut sorted: Vec<&MarketPoint> = points.iter().collect();
    sorted.sort_by(|a, b| b.change_pct.total_cmp(&a.change_pct));

    let mut buckets: Vec<Vec<String>> = vec![Vec::new(); regions.regions.len()];
    for point in sorted {
        let Some(idx) = regions.region_of(&point.symbol) else {
            continue;
        };
        buckets[idx].push(format!(
            "{}: {:+.2}% (${:.2} to ${:.2})",
            regions.readable_name(&point.symbol),
            point.change_pct,
            point.start_price,
            point.end_price
        ));
    }

    let mut lines = Vec::new();
    for (region, entries) in regions.regions.iter().zip(buckets) {
        if entries.is_empty() {
            continue;
        }
        lines.push(format!("{}:", region.header));
        lines.extend(entries.into_iter().map(|e| format!("  • {e}")));
        lines.push(String::new());
    }

    if lines.is_empty() {
        return NO_MARKET_DATA.to_string();
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(symbol: &str, start: f64, end: f64, change: f64) -> MarketPoint {
        MarketPoint {
            symbol: symbol.to_string(),
            start_price: start,
            end_price: end,
            change_pct: change,
            period_days: 5,
        }
    }

    #[test]
    fn empty_input_yields_sentinel() {
        assert_eq!(format_market_narrative(&[], &RegionRules::default()), NO_MARKET_DATA);
    }

    #[test]
    fn groups_us_and_asia_only() {
        let points = vec![
            point("^GSPC", 5000.0, 5075.0, 1.5),
            point("^HSI", 20000.0, 19840.0, -0.8),
        ];
        let out = format_market_narrative(&points, &RegionRules::default());

        assert!(out.contains("US Markets:\n  • S&P 500: +1.50% ($5000.00 to $5075.00)"));
        assert!(out.contains("Asian Markets:\n  • Hang Seng: -0.80% ($20000.00 to $19840.00)"));
        assert!(!out.contains("European Markets"));
        assert!(!out.contains("Global Markets"));
    }

    #[test]
    fn single_region_input_shows_one_header() {
        let points = vec![point("^FTSE", 8000.0, 8080.0, 1.0)];
        let out = format_market_narrative(&points, &RegionRules::default());
        assert_eq!(out.matches("Markets:").count(), 1);
        assert!(out.starts_with("European Markets:"));
    }

    #[test]
    fn regions_keep_global_descending_order() {
        let points = vec![
            point("^DJI", 1.0, 1.0, -2.0),
            point("^IXIC", 1.0, 1.0, 3.0),
            point("^GSPC", 1.0, 1.0, 0.5),
            point("EURUSD=X", 1.0, 1.0, 0.1),
        ];
        let out = format_market_narrative(&points, &RegionRules::default());
        let nasdaq = out.find("NASDAQ").unwrap();
        let spx = out.find("S&P 500").unwrap();
        let dow = out.find("Dow Jones").unwrap();
        assert!(nasdaq < spx && spx < dow);
        assert!(out.starts_with("Global Markets:\n  • EURUSD=X: +0.10%"));
    }
}
