pub mod market_feed;
pub mod news_feed;
pub mod types;

pub use market_feed::{MarketFeed, YahooChartFeed};
pub use news_feed::{NewsFeed, PolygonNewsFeed};
