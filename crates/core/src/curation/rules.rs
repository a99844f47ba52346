use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedPhrases {
    pub weight: i32,
    pub phrases: Vec<String>,
}

impl WeightedPhrases {
    pub fn new(weight: i32, phrases: &[&str]) -> Self {
        Self {
            weight,
            phrases: owned(phrases),
        }
    }

    pub fn hits(&self, text: &str) -> usize {
        self.phrases
            .iter()
            .filter(|p| !p.is_empty() && text.contains(p.as_str()))
            .count()
    }

    pub fn any_in(&self, text: &str) -> bool {
        self.hits(text) > 0
    }

    pub fn total(&self, text: &str) -> i32 {
        self.weight.saturating_mul(self.hits(text) as i32)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurationRules {
    pub quality: QualityRules,
    pub themes: ThemeRules,
    pub importance: ImportanceRules,
    pub regions: RegionRules,
    pub digest: DigestRules,
}

impl CurationRules {
    pub fn from_json_str(s: &str) -> anyhow::Result<Self> {
        let rules: Self = serde_json::from_str(s).context("failed to parse curation rules JSON")?;
        rules.validate()?;
        Ok(rules)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read curation rules {}", path.display()))?;
        Self::from_json_str(&text)
            .with_context(|| format!("invalid curation rules in {}", path.display()))
    }

    pub fn load(path: Option<&str>) -> anyhow::Result<Self> {
        match path {
            Some(p) => Self::from_json_file(p),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.quality.threshold <= 100,
            "quality threshold must be within 0..=100 (got {})",
            self.quality.threshold
        );

        let mut names = BTreeSet::new();
        for theme in &self.themes.themes {
            anyhow::ensure!(!theme.name.trim().is_empty(), "theme names must be non-empty");
            anyhow::ensure!(
                names.insert(theme.name.as_str()),
                "duplicate theme name: {}",
                theme.name
            );
        }
        anyhow::ensure!(
            !names.contains(self.themes.fallback.as_str()),
            "fallback theme {} must not also be a triggered theme",
            self.themes.fallback
        );

        let catch_all = self.regions.regions.iter().filter(|r| r.catch_all).count();
        anyhow::ensure!(
            catch_all == 1,
            "exactly one catch-all market region is required (got {catch_all})"
        );

        anyhow::ensure!(
            self.digest.max_references > 0,
            "max_references must be positive"
        );
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Quality filter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityRules {
    pub base_score: i32,
    /// Records scoring below this are dropped.
    pub threshold: u8,
    pub disqualifiers: Vec<String>,
    pub major_penalties: WeightedPhrases,
    pub medium_penalties: WeightedPhrases,
    pub minor_penalties: WeightedPhrases,
    pub high_value_terms: WeightedPhrases,
    pub medium_value_terms: WeightedPhrases,
    pub ticker_bonus: i32,
    pub major_companies: WeightedPhrases,
    pub long_title_chars: usize,
    pub long_title_bonus: i32,
    pub trusted_publishers: Vec<String>,
    pub trusted_publisher_bonus: i32,
}

impl Default for QualityRules {
    fn default() -> Self {
        Self {
            base_score: 50,
            threshold: 60,
            disqualifiers: owned(&[
                "beef: it's what's for dinner",
                "correction:",
                "ticker is",
                "what's for dinner",
                "if you can afford it",
                "says 'i want to cry'",
                "meme mania",
                "short squeeze frenzy",
                "portnoy says",
                "jim cramer says",
            ]),
            major_penalties: WeightedPhrases::new(
                -30,
                &[
                    "trading halt",
                    "halt news pending",
                    "here's how much $",
                    "if you invested $",
                    "years ago would be worth",
                    "celebrity says",
                    "influencer says",
                    "would have made owning",
                    "invested in this stock",
                    "owning this stock",
                ],
            ),
            medium_penalties: WeightedPhrases::new(
                -15,
                &[
                    "deep dive into",
                    "what happened?",
                    "stock tumbled",
                    "stock spikes",
                    "unveils",
                    "reaffirms commitment",
                    "has received",
                    "follow-on order",
                ],
            ),
            minor_penalties: WeightedPhrases::new(
                -10,
                &[
                    "preview:",
                    "analyst perspectives",
                    "maintains equal-weight",
                    "maintains price target",
                    "maintains neutral",
                ],
            ),
            high_value_terms: WeightedPhrases::new(
                20,
                &[
                    "earnings",
                    "revenue",
                    "profit",
                    "quarterly results",
                    "eps",
                    "beats estimates",
                    "misses estimates",
                    "guidance raised",
                    "guidance lowered",
                    "fed",
                    "federal reserve",
                    "interest rates",
                    "monetary policy",
                    "inflation",
                    "gdp",
                    "economic data",
                ],
            ),
            medium_value_terms: WeightedPhrases::new(
                15,
                &[
                    "merger",
                    "acquisition",
                    "partnership",
                    "joint venture",
                    "ipo",
                    "upgraded",
                    "downgraded",
                    "price target",
                    "analyst",
                    "rating",
                    "policy",
                    "regulation",
                    "china",
                    "trade",
                ],
            ),
            ticker_bonus: 10,
            major_companies: WeightedPhrases::new(
                15,
                &[
                    "apple", "microsoft", "google", "alphabet", "amazon", "tesla", "meta",
                    "nvidia", "jpmorgan", "berkshire", "alibaba", "tencent", "bezos", "spacex",
                ],
            ),
            long_title_chars: 60,
            long_title_bonus: 10,
            trusted_publishers: owned(&["benzinga"]),
            trusted_publisher_bonus: 5,
        }
    }
}

// ---------------------------------------------------------------------------
// Theme classifier
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeRule {
    pub name: String,
    pub label: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub tickers: Vec<String>,
}

impl ThemeRule {
    fn new(name: &str, label: &str, keywords: &[&str], tickers: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            keywords: owned(keywords),
            tickers: owned(tickers),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeRules {
    pub themes: Vec<ThemeRule>,
    pub fallback: String,
    pub fallback_label: String,
}

impl ThemeRules {
    pub fn label_for(&self, name: &str) -> Option<&str> {
        if name == self.fallback {
            return Some(self.fallback_label.as_str());
        }
        self.themes
            .iter()
            .find(|t| t.name == name)
            .map(|t| t.label.as_str())
    }

    pub fn ordered_names(&self) -> Vec<&str> {
        self.themes
            .iter()
            .map(|t| t.name.as_str())
            .chain(std::iter::once(self.fallback.as_str()))
            .collect()
    }
}

impl Default for ThemeRules {
    fn default() -> Self {
        Self {
            themes: vec![
                ThemeRule::new(
                    "earnings",
                    "💼 Corporate Earnings & Developments",
                    &[
                        "earnings", "revenue", "profit", "quarterly", "eps", "q1", "q2", "q3",
                        "q4", "fiscal",
                    ],
                    &[],
                ),
                ThemeRule::new(
                    "fed_policy",
                    "🏛️ Central Bank & Policy Updates",
                    &[
                        "fed",
                        "federal reserve",
                        "interest rates",
                        "powell",
                        "monetary",
                        "inflation",
                        "rate cut",
                        "rate hike",
                        "fomc",
                    ],
                    &[],
                ),
                ThemeRule::new(
                    "china_sea",
                    "🇨🇳 Asia-Pacific Developments",
                    &[
                        "china",
                        "chinese",
                        "beijing",
                        "shanghai",
                        "shenzhen",
                        "hong kong",
                        "taiwan",
                        "singapore",
                        "japan",
                        "korea",
                        "asia",
                        "asian",
                        "alibaba",
                        "tencent",
                        "baidu",
                        "nio",
                        "xpeng",
                        "li auto",
                        "hang seng",
                        "nikkei",
                        "shanghai composite",
                        "pboc",
                        "yuan",
                        "rmb",
                        "trade war",
                        "tariff",
                        "supply chain",
                    ],
                    &["baba", "tcehy", "jd", "bidu", "nio", "xpev", "li"],
                ),
                ThemeRule::new(
                    "tech_developments",
                    "💻 Technology & Innovation",
                    &[
                        "ai",
                        "artificial intelligence",
                        "tech",
                        "semiconductor",
                        "chip",
                        "software",
                        "hardware",
                        "innovation",
                        "cloud",
                        "saas",
                    ],
                    &[],
                ),
                ThemeRule::new(
                    "trade_tensions",
                    "🌍 Trade & Tariffs",
                    &[
                        "tariff",
                        "trade war",
                        "trade deal",
                        "import",
                        "export",
                        "sanctions",
                        "trade deficit",
                        "wto",
                    ],
                    &[],
                ),
                ThemeRule::new(
                    "deals_ma",
                    "🤝 Deals & M&A",
                    &[
                        "merger",
                        "acquisition",
                        "deal",
                        "buyout",
                        "takeover",
                        "m&a",
                        "partnership",
                        "joint venture",
                    ],
                    &[],
                ),
                ThemeRule::new(
                    "geopolitical",
                    "🗳️ Politics & Regulation",
                    &[
                        "trump",
                        "election",
                        "government",
                        "policy",
                        "regulation",
                        "biden",
                        "congress",
                        "senate",
                        "political",
                    ],
                    &[],
                ),
                ThemeRule::new(
                    "market_movements",
                    "📈 Market Movers",
                    &[
                        "surge", "plunge", "rally", "crash", "soar", "tumble", "spike", "drop",
                        "gain", "loss", "bull", "bear",
                    ],
                    &[],
                ),
                ThemeRule::new(
                    "crypto",
                    "🪙 Digital Assets",
                    &[
                        "bitcoin",
                        "crypto",
                        "blockchain",
                        "ethereum",
                        "btc",
                        "eth",
                        "cryptocurrency",
                        "digital currency",
                        "defi",
                    ],
                    &[],
                ),
            ],
            fallback: "other".to_string(),
            fallback_label: "📰 Other Market News".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Importance ranker
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecencyTier {
    pub max_age_hours: i64,
    pub bonus: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LengthTier {
    pub min_chars: usize,
    pub bonus: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportanceRules {
    pub companies: WeightedPhrases,
    pub impact_words: WeightedPhrases,
    pub urgency_words: WeightedPhrases,
    pub premium_source_bonus: u32,
    pub region_keywords: WeightedPhrases,
    pub ticker_weight: u32,
    pub ticker_cap: u32,
    /// Checked in order; the first tier the age falls under wins.
    pub recency: Vec<RecencyTier>,
    /// Every tier the body exceeds adds its bonus.
    pub body_length: Vec<LengthTier>,
}

impl Default for ImportanceRules {
    fn default() -> Self {
        Self {
            companies: WeightedPhrases::new(
                5,
                &[
                    "apple", "microsoft", "google", "amazon", "tesla", "meta", "nvidia",
                    "jpmorgan", "johnson", "walmart", "berkshire", "visa", "mastercard",
                    "alibaba", "tencent", "baidu", "nio", "xpeng", "li auto", "aapl", "msft",
                    "googl", "amzn", "tsla", "nvda", "jpm", "baba", "tcehy",
                ],
            ),
            impact_words: WeightedPhrases::new(
                3,
                &[
                    "billion",
                    "million",
                    "record",
                    "historic",
                    "breakthrough",
                    "crisis",
                    "major",
                    "significant",
                    "beats estimates",
                    "misses estimates",
                ],
            ),
            urgency_words: WeightedPhrases::new(
                4,
                &[
                    "breaking",
                    "just in",
                    "urgent",
                    "alert",
                    "exclusive",
                    "update",
                    "latest",
                    "developing",
                ],
            ),
            premium_source_bonus: 5,
            region_keywords: WeightedPhrases::new(
                4,
                &[
                    "china",
                    "chinese",
                    "hong kong",
                    "taiwan",
                    "singapore",
                    "japan",
                    "korea",
                    "alibaba",
                    "tencent",
                    "trade war",
                    "yuan",
                    "hang seng",
                ],
            ),
            ticker_weight: 3,
            ticker_cap: 9,
            recency: vec![
                RecencyTier { max_age_hours: 24, bonus: 5 },
                RecencyTier { max_age_hours: 48, bonus: 3 },
                RecencyTier { max_age_hours: 72, bonus: 1 },
            ],
            body_length: vec![
                LengthTier { min_chars: 500, bonus: 3 },
                LengthTier { min_chars: 1000, bonus: 3 },
            ],
        }
    }
}

// ---------------------------------------------------------------------------
// Market regions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionRule {
    pub header: String,
    #[serde(default)]
    pub symbols: Vec<String>,
    #[serde(default)]
    pub catch_all: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionRules {
    pub regions: Vec<RegionRule>,
    pub names: BTreeMap<String, String>,
}

impl RegionRules {
    pub fn region_of(&self, symbol: &str) -> Option<usize> {
        self.regions
            .iter()
            .position(|r| r.symbols.iter().any(|s| s == symbol))
            .or_else(|| self.regions.iter().position(|r| r.catch_all))
    }

    pub fn readable_name<'a>(&'a self, symbol: &'a str) -> &'a str {
        self.names.get(symbol).map(String::as_str).unwrap_or(symbol)
    }
}

impl Default for RegionRules {
    fn default() -> Self {
        let region = |header: &str, symbols: &[&str], catch_all: bool| RegionRule {
            header: header.to_string(),
            symbols: owned(symbols),
            catch_all,
        };
        let names = [
            ("^GSPC", "S&P 500"),
            ("^DJI", "Dow Jones"),
            ("^IXIC", "NASDAQ"),
            ("^RUT", "Russell 2000"),
            ("^FTSE", "FTSE 100"),
            ("^GDAXI", "DAX"),
            ("^FCHI", "CAC 40"),
            ("^HSI", "Hang Seng"),
            ("^N225", "Nikkei 225"),
            ("^STOXX50E", "Euro Stoxx 50"),
            ("^STI", "Straits Times Index"),
            ("000001.SS", "Shanghai Composite"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            regions: vec![
                region("Global Markets", &[], true),
                region("US Markets", &["^GSPC", "^DJI", "^IXIC", "^RUT"], false),
                region(
                    "European Markets",
                    &["^FTSE", "^GDAXI", "^FCHI", "^STOXX50E"],
                    false,
                ),
                region("Asian Markets", &["^HSI", "^N225", "^STI", "000001.SS"], false),
            ],
            names,
        }
    }
}

// ---------------------------------------------------------------------------
// Digest sizing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DigestRules {
    pub top_n_per_theme: usize,
    pub max_references: usize,
    /// Entries per theme rendered into the synthesis payload.
    pub max_records_per_theme_in_brief: usize,
}

impl Default for DigestRules {
    fn default() -> Self {
        Self {
            top_n_per_theme: 3,
            max_references: 10,
            max_records_per_theme_in_brief: 4,
        }
    }
}
