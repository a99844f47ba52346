use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetClass {
    Index,
    Stock,
    Forex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Asset {
    pub symbol: &'static str,
    pub name: &'static str,
    pub class: AssetClass,
}

const fn index(symbol: &'static str, name: &'static str) -> Asset {
    Asset { symbol, name, class: AssetClass::Index }
}

const fn stock(symbol: &'static str, name: &'static str) -> Asset {
    Asset { symbol, name, class: AssetClass::Stock }
}

const fn forex(symbol: &'static str, name: &'static str) -> Asset {
    Asset { symbol, name, class: AssetClass::Forex }
}

pub const MAJOR_INDICES: &[Asset] = &[
    index("^GSPC", "S&P 500"),
    index("^DJI", "Dow Jones Industrial Average"),
    index("^IXIC", "NASDAQ Composite"),
    index("^HSI", "Hang Seng Index (HK50)"),
    index("000001.SS", "Shanghai Composite"),
    index("399001.SZ", "Shenzhen Component"),
    index("^N225", "Nikkei 225"),
    index("^STI", "Straits Times Index"),
    index("^FTSE", "FTSE 100"),
    index("^GDAXI", "DAX"),
];

pub const MAJOR_STOCKS: &[Asset] = &[
    stock("AAPL", "Apple Inc."),
    stock("MSFT", "Microsoft Corporation"),
    stock("GOOGL", "Alphabet Inc."),
    stock("AMZN", "Amazon.com Inc."),
    stock("TSLA", "Tesla Inc."),
    stock("META", "Meta Platforms Inc."),
    stock("NVDA", "NVIDIA Corporation"),
    stock("JPM", "JPMorgan Chase & Co."),
    stock("JNJ", "Johnson & Johnson"),
    stock("V", "Visa Inc."),
    stock("WMT", "Walmart Inc."),
    stock("UNH", "UnitedHealth Group"),
    stock("HD", "The Home Depot Inc."),
    stock("PG", "Procter & Gamble Co."),
    stock("MA", "Mastercard Inc."),
];

pub const CHINA_A_SHARES: &[Asset] = &[
    stock("600519.SS", "Kweichow Moutai"),
    stock("601318.SS", "Ping An Insurance"),
    stock("000001.SZ", "Ping An Bank"),
    stock("000651.SZ", "Gree Electric"),
    stock("300750.SZ", "CATL"),
];

pub const HONG_KONG_STOCKS: &[Asset] = &[
    stock("0700.HK", "Tencent Holdings"),
    stock("9988.HK", "Alibaba Group"),
    stock("3690.HK", "Meituan"),
    stock("1299.HK", "AIA Group"),
    stock("0005.HK", "HSBC Holdings"),
];

pub const SEA_STOCKS: &[Asset] = &[
    stock("D05.SI", "DBS Group"),
    stock("SE", "Sea Ltd"),
    stock("BBCA.JK", "Bank Central Asia"),
    stock("TLK.N", "Telkom Indonesia"),
    stock("ADVANC.BK", "Advanced Info Service"),
];

pub const MAJOR_FOREX: &[Asset] = &[
    forex("EURUSD=X", "EUR/USD"),
    forex("GBPUSD=X", "GBP/USD"),
    forex("USDJPY=X", "USD/JPY"),
    forex("USDCNY=X", "USD/CNY"),
    forex("USDHKD=X", "USD/HKD"),
    forex("USDSGD=X", "USD/SGD"),
    forex("AUDUSD=X", "AUD/USD"),
    forex("USDCAD=X", "USD/CAD"),
    forex("USDCHF=X", "USD/CHF"),
    forex("NZDUSD=X", "NZD/USD"),
];

pub const DEFAULT_REPORT_INDEX_COUNT: usize = 5;

pub fn default_report_symbols() -> Vec<String> {
    MAJOR_INDICES
        .iter()
        .take(DEFAULT_REPORT_INDEX_COUNT)
        .map(|a| a.symbol.to_string())
        .collect()
}

pub fn catalog() -> Vec<(&'static str, &'static [Asset])> {
    vec![
        ("indices", MAJOR_INDICES),
        ("stocks", MAJOR_STOCKS),
        ("china_a_shares", CHINA_A_SHARES),
        ("hong_kong_stocks", HONG_KONG_STOCKS),
        ("sea_stocks", SEA_STOCKS),
        ("forex", MAJOR_FOREX),
    ]
}

pub fn lookup(symbol: &str) -> Option<&'static Asset> {
    catalog()
        .into_iter()
        .flat_map(|(_, assets)| assets.iter())
        .find(|a| a.symbol.eq_ignore_ascii_case(symbol))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_symbols_are_leading_indices() {
        assert_eq!(
            default_report_symbols(),
            vec!["^GSPC", "^DJI", "^IXIC", "^HSI", "000001.SS"]
        );
    }

    #[test]
    fn lookup_spans_all_groups() {
        assert_eq!(lookup("0700.hk").map(|a| a.name), Some("Tencent Holdings"));
        assert_eq!(lookup("USDJPY=X").map(|a| a.class), Some(AssetClass::Forex));
        assert!(lookup("NOPE").is_none());
    }
}
