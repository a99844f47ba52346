use crate::curation::digest::Curator;
use crate::curation::filter_by_tickers;
use crate::curation::rules::CurationRules;
use crate::domain::brief::Brief;
use crate::domain::language::Language;
use crate::domain::market::MarketPoint;
use crate::domain::news::NewsRecord;
use crate::error::{Collaborator, EmptyInput, PipelineError};
use crate::ingest::{MarketFeed, NewsFeed};
use crate::llm::{CompletionRequest, TextSynthesizer};
use crate::report::assemble::BriefAssembler;
use crate::report::market::format_market_narrative;
use crate::report::translate::{LanguageRenderer, Rendered};
use crate::time::period::ReportPeriod;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

const SYNTHESIS_MAX_TOKENS: u32 = 2800;
const SYNTHESIS_TEMPERATURE: f32 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    pub require_market_data: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            require_market_data: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReportRequest {
    pub period: ReportPeriod,
    pub language: Language,
    pub symbols: Vec<String>,
    pub tickers: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Report {
    pub brief: Brief,
    pub rendered: Rendered,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportOutcome {
    pub success: bool,
    pub run_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub articles_count: usize,
    pub date_range: String,
    pub language: Language,
    pub translation_degraded: bool,
}

pub struct ReportPipeline {
    news: Arc<dyn NewsFeed>,
    market: Arc<dyn MarketFeed>,
    synthesizer: Arc<dyn TextSynthesizer>,
    rules: CurationRules,
    options: PipelineOptions,
}

impl ReportPipeline {
    pub fn new(
        news: Arc<dyn NewsFeed>,
        market: Arc<dyn MarketFeed>,
        synthesizer: Arc<dyn TextSynthesizer>,
        rules: CurationRules,
    ) -> Self {
        Self {
            news,
            market,
            synthesizer,
            rules,
            options: PipelineOptions::default(),
        }
    }

    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn rules(&self) -> &CurationRules {
        &self.rules
    }

    pub async fn run(&self, req: ReportRequest) -> ReportOutcome {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "report",
            %run_id,
            period = %req.period,
            language = %req.language
        );

        match self.generate(&req, Utc::now()).instrument(span).await {
            Ok(report) => {
                let translation_degraded = report.rendered.is_degraded();
                ReportOutcome {
                    success: true,
                    run_id,
                    articles_count: report.brief.theme_digest.survivors().len(),
                    report: Some(report.rendered.into_text()),
                    error: None,
                    date_range: req.period.short_label(),
                    language: req.language,
                    translation_degraded,
                }
            }
            Err(err) => {
                tracing::error!(%run_id, error = %err, "report generation failed");
                ReportOutcome {
                    success: false,
                    run_id,
                    report: None,
                    error: Some(err.to_string()),
                    articles_count: 0,
                    date_range: req.period.short_label(),
                    language: req.language,
                    translation_degraded: false,
                }
            }
        }
    }

    pub async fn generate(
        &self,
        req: &ReportRequest,
        now: DateTime<Utc>,
    ) -> Result<Report, PipelineError> {
        let brief = self.prepare(req, now).await?;

        let synthesized = self
            .synthesizer
            .complete(
                CompletionRequest::new(brief.payload.system.clone(), brief.payload.user.clone())
                    .max_tokens(SYNTHESIS_MAX_TOKENS)
                    .temperature(SYNTHESIS_TEMPERATURE),
            )
            .await
            .map_err(|e| PipelineError::unavailable(Collaborator::TextSynthesizer, e))?;

        let body = brief.attach_references(&synthesized);
        let rendered = LanguageRenderer::new(self.synthesizer.as_ref())
            .render(&body, brief.language)
            .await;
        tracing::info!(
            language = %brief.language,
            degraded = rendered.is_degraded(),
            chars = rendered.text().len(),
            "report rendered"
        );

        Ok(Report { brief, rendered })
    }

    pub async fn prepare(
        &self,
        req: &ReportRequest,
        now: DateTime<Utc>,
    ) -> Result<Brief, PipelineError> {
        let (news, points) = tokio::join!(
            self.fetch_news(&req.period),
            self.fetch_market(&req.symbols, &req.period)
        );
        let records = filter_by_tickers(news?, &req.tickers);
        let points = points?;

        let digest =
            Curator::new(&self.rules, now).curate(records, self.rules.digest.top_n_per_theme);
        if digest.survivors().is_empty() {
            return Err(EmptyInput::NoSurvivingNews.into());
        }
        if points.is_empty() && self.options.require_market_data {
            return Err(EmptyInput::NoMarketData.into());
        }

        let narrative = format_market_narrative(&points, &self.rules.regions);
        Ok(
            BriefAssembler::new(&self.rules.themes, &self.rules.digest).assemble(
                digest,
                narrative,
                req.language,
                req.period,
            ),
        )
    }

    async fn fetch_news(&self, period: &ReportPeriod) -> Result<Vec<NewsRecord>, PipelineError> {
        let raw = self
            .news
            .fetch(period)
            .await
            .map_err(|e| PipelineError::unavailable(Collaborator::NewsFeed, e))?;
        let records = NewsRecord::from_provider_batch(&raw, self.news.default_publisher());
        tracing::info!(
            provider = self.news.provider_name(),
            raw = raw.len(),
            normalized = records.len(),
            "news fetched"
        );
        Ok(records)
    }

    async fn fetch_market(
        &self,
        symbols: &[String],
        period: &ReportPeriod,
    ) -> Result<Vec<MarketPoint>, PipelineError> {
        let mut points = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            let series = self
                .market
                .fetch(symbol, period)
                .await
                .map_err(|e| PipelineError::unavailable(Collaborator::MarketFeed, e))?;
            match series.and_then(|bars| MarketPoint::from_series(symbol, &bars)) {
                Some(point) => points.push(point),
                None => tracing::debug!(symbol, "no usable series; omitted"),
            }
        }
        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::market::PriceBar;
    use crate::llm::Provider;
    use crate::report::market::NO_MARKET_DATA;
    use crate::report::SOURCES_HEADER;
    use chrono::{NaiveDate, TimeZone};
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct FakeNews {
        items: Option<Vec<Value>>,
    }

    #[async_trait::async_trait]
    impl NewsFeed for FakeNews {
        fn provider_name(&self) -> &'static str {
            "fake"
        }

        fn default_publisher(&self) -> &'static str {
            "Benzinga"
        }

        async fn fetch(&self, _period: &ReportPeriod) -> anyhow::Result<Vec<Value>> {
            self.items
                .clone()
                .ok_or_else(|| anyhow::anyhow!("Polygon API access denied"))
        }
    }

    struct FakeMarket {
        closes: HashMap<String, Vec<f64>>,
        fail: bool,
    }

    #[async_trait::async_trait]
    impl MarketFeed for FakeMarket {
        fn provider_name(&self) -> &'static str {
            "fake"
        }

        async fn fetch(
            &self,
            symbol: &str,
            _period: &ReportPeriod,
        ) -> anyhow::Result<Option<Vec<PriceBar>>> {
            anyhow::ensure!(!self.fail, "connection reset");
            Ok(self.closes.get(symbol).map(|closes| {
                closes
                    .iter()
                    .enumerate()
                    .map(|(i, close)| PriceBar {
                        timestamp: Utc.with_ymd_and_hms(2026, 1, 5 + i as u32, 21, 0, 0).unwrap(),
                        open: None,
                        close: *close,
                    })
                    .collect()
            }))
        }
    }

    #[derive(Default)]
    struct FakeSynth {
        fail_synthesis: bool,
        fail_translation: bool,
        seen: Mutex<Vec<CompletionRequest>>,
    }

    #[async_trait::async_trait]
    impl TextSynthesizer for FakeSynth {
        fn provider(&self) -> Provider {
            Provider::OpenAI
        }

        async fn complete(&self, req: CompletionRequest) -> anyhow::Result<String> {
            let translating = req.system.contains("translator");
            let user = req.user.clone();
            self.seen.lock().unwrap().push(req);
            if translating {
                anyhow::ensure!(!self.fail_translation, "translation quota exceeded");
                return Ok(user.to_uppercase());
            }
            anyhow::ensure!(!self.fail_synthesis, "synthesis timed out");
            Ok("# Market Insights\nBody text\n\n## Sources\n1. invented".to_string())
        }
    }

    fn items() -> Vec<Value> {
        vec![
            json!({
                "id": 1,
                "title": "Apple Quarterly Earnings Beat Estimates On iPhone Revenue",
                "teaser": "Revenue rose",
                "url": "https://news.test/1",
                "published": "2026-01-08T10:00:00Z",
                "tickers": ["AAPL"]
            }),
            json!({"id": 2, "title": "Celebrity says stock tumbled", "tickers": ["GME"]}),
            json!("not an object"),
        ]
    }

    fn market() -> FakeMarket {
        FakeMarket {
            closes: HashMap::from([("^GSPC".to_string(), vec![100.0, 101.5])]),
            fail: false,
        }
    }

    fn request(language: Language) -> ReportRequest {
        ReportRequest {
            period: ReportPeriod::new(
                NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
                NaiveDate::from_ymd_opt(2026, 1, 9).unwrap(),
            )
            .unwrap(),
            language,
            symbols: vec!["^GSPC".to_string(), "^DJI".to_string()],
            tickers: Vec::new(),
        }
    }

    fn pipeline(news: FakeNews, market: FakeMarket, synth: Arc<FakeSynth>) -> ReportPipeline {
        ReportPipeline::new(
            Arc::new(news),
            Arc::new(market),
            synth,
            CurationRules::default(),
        )
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 9, 12, 0, 0).unwrap()
    }

    const APPLE_REF: &str = "1. Apple Quarterly Earnings Beat Estimates On iPhone Revenue - [Source](https://news.test/1)";

    #[tokio::test]
    async fn english_report_carries_only_curated_references() {
        let synth = Arc::new(FakeSynth::default());
        let p = pipeline(FakeNews { items: Some(items()) }, market(), synth.clone());

        let report = p.generate(&request(Language::English), now()).await.unwrap();

        assert_eq!(
            report.rendered,
            Rendered::Unchanged(format!(
                "# Market Insights\nBody text\n\n{SOURCES_HEADER}\n{APPLE_REF}"
            ))
        );
        assert_eq!(report.brief.theme_digest.survivors().len(), 1);
        let seen = synth.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].max_tokens, 2800);
        assert!(seen[0].user.contains("S&P 500: +1.50%"));
        assert!(!seen[0].user.contains("Dow Jones"));
    }

    #[tokio::test]
    async fn translated_report_keeps_reference_block_verbatim() {
        let synth = Arc::new(FakeSynth::default());
        let p = pipeline(FakeNews { items: Some(items()) }, market(), synth.clone());

        let outcome = p.run(request(Language::Thai)).await;

        assert!(outcome.success);
        assert_eq!(
            outcome.report.as_deref(),
            Some(format!("# MARKET INSIGHTS\nBODY TEXT\n\n{SOURCES_HEADER}\n{APPLE_REF}").as_str())
        );
        assert_eq!(outcome.articles_count, 1);
        assert_eq!(outcome.date_range, "Jan 05 - Jan 09, 2026");
        assert_eq!(synth.seen.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn translation_failure_still_succeeds() {
        let synth = Arc::new(FakeSynth {
            fail_translation: true,
            ..Default::default()
        });
        let p = pipeline(FakeNews { items: Some(items()) }, market(), synth);

        let outcome = p.run(request(Language::Vietnamese)).await;

        assert!(outcome.success);
        assert!(outcome.translation_degraded);
        let text = outcome.report.unwrap();
        assert!(text.starts_with("Translation error: translation quota exceeded"));
        assert!(text.ends_with(APPLE_REF));
    }

    #[tokio::test]
    async fn collaborator_failures_become_failed_outcomes() {
        let p = pipeline(
            FakeNews { items: None },
            market(),
            Arc::new(FakeSynth::default()),
        );
        let outcome = p.run(request(Language::English)).await;
        assert!(!outcome.success);
        assert!(outcome.report.is_none());
        assert!(outcome.error.unwrap().starts_with("news feed unavailable"));

        let p = pipeline(
            FakeNews { items: Some(items()) },
            FakeMarket {
                fail: true,
                ..market()
            },
            Arc::new(FakeSynth::default()),
        );
        let err = p.generate(&request(Language::English), now()).await.unwrap_err();
        assert!(matches!(
            err,
            PipelineError::CollaboratorUnavailable {
                collaborator: Collaborator::MarketFeed,
                ..
            }
        ));

        let synth = Arc::new(FakeSynth {
            fail_synthesis: true,
            ..Default::default()
        });
        let p = pipeline(FakeNews { items: Some(items()) }, market(), synth);
        let outcome = p.run(request(Language::Thai)).await;
        assert!(!outcome.success);
        assert!(outcome.error.unwrap().contains("synthesis timed out"));
    }

    #[tokio::test]
    async fn empty_inputs_are_reported_distinctly() {
        let p = pipeline(
            FakeNews {
                items: Some(vec![items()[1].clone()]),
            },
            market(),
            Arc::new(FakeSynth::default()),
        );
        let err = p.prepare(&request(Language::English), now()).await.unwrap_err();
        assert!(matches!(
            err,
            PipelineError::EmptyInput(EmptyInput::NoSurvivingNews)
        ));

        let no_market = || FakeMarket {
            closes: HashMap::new(),
            fail: false,
        };
        let p = pipeline(
            FakeNews { items: Some(items()) },
            no_market(),
            Arc::new(FakeSynth::default()),
        );
        let err = p.prepare(&request(Language::English), now()).await.unwrap_err();
        assert!(matches!(err, PipelineError::EmptyInput(EmptyInput::NoMarketData)));

        let p = pipeline(
            FakeNews { items: Some(items()) },
            no_market(),
            Arc::new(FakeSynth::default()),
        )
        .with_options(PipelineOptions {
            require_market_data: false,
        });
        let brief = p.prepare(&request(Language::English), now()).await.unwrap();
        assert_eq!(brief.market_narrative, NO_MARKET_DATA);
    }

    #[tokio::test]
    async fn ticker_filter_narrows_news() {
        let p = pipeline(
            FakeNews { items: Some(items()) },
            market(),
            Arc::new(FakeSynth::default()),
        );
        let mut req = request(Language::English);
        req.tickers = vec!["msft".to_string()];
        let err = p.prepare(&req, now()).await.unwrap_err();
        assert!(matches!(
            err,
            PipelineError::EmptyInput(EmptyInput::NoSurvivingNews)
        ));

        req.tickers = vec!["aapl".to_string()];
        let brief = p.prepare(&req, now()).await.unwrap();
        assert_eq!(brief.reference_block, APPLE_REF);
    }
}
