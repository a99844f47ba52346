pub mod curation;
pub mod domain;
pub mod error;
pub mod ingest;
pub mod llm;
pub mod pipeline;
pub mod report;
pub mod snapshot;
pub mod time;

pub mod config {
    use anyhow::Context;

    #[derive(Debug, Clone, Default)]
    pub struct Settings {
        pub polygon_api_key: Option<String>,
        pub news_feed_base_url: Option<String>,
        pub market_feed_base_url: Option<String>,
        pub llm_provider: Option<String>,
        pub openai_api_key: Option<String>,
        pub openai_model: Option<String>,
        pub anthropic_api_key: Option<String>,
        pub anthropic_model: Option<String>,
        pub sentry_dsn: Option<String>,
        pub curation_rules_path: Option<String>,
    }

    // Blank values count as unset.
    fn var(key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|v| !v.trim().is_empty())
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self {
                polygon_api_key: var("POLYGON_API_KEY"),
                news_feed_base_url: var("NEWS_FEED_BASE_URL"),
                market_feed_base_url: var("MARKET_FEED_BASE_URL"),
                llm_provider: var("LLM_PROVIDER"),
                openai_api_key: var("OPENAI_API_KEY"),
                openai_model: var("OPENAI_MODEL"),
                anthropic_api_key: var("ANTHROPIC_API_KEY"),
                anthropic_model: var("ANTHROPIC_MODEL"),
                sentry_dsn: var("SENTRY_DSN"),
                curation_rules_path: var("CURATION_RULES_PATH"),
            })
        }

        pub fn require_polygon_api_key(&self) -> anyhow::Result<&str> {
            self.polygon_api_key
                .as_deref()
                .context("POLYGON_API_KEY is required")
        }

        pub fn require_openai_api_key(&self) -> anyhow::Result<&str> {
            self.openai_api_key
                .as_deref()
                .context("OPENAI_API_KEY is required")
        }

        pub fn require_anthropic_api_key(&self) -> anyhow::Result<&str> {
            self.anthropic_api_key
                .as_deref()
                .context("ANTHROPIC_API_KEY is required")
        }
    }

}
