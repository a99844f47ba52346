use anyhow::Context;
use clap::{Parser, Subcommand};
use marketbrief_core::config::Settings;
use marketbrief_core::curation::rules::CurationRules;
use marketbrief_core::domain::assets;
use marketbrief_core::ingest::{PolygonNewsFeed, YahooChartFeed};
use marketbrief_core::pipeline::ReportPipeline;
use marketbrief_core::snapshot;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod check;
mod request;

#[derive(Debug, Parser)]
#[command(name = "marketbrief_worker")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate one market brief and print the outcome as JSON.
    Report(request::ReportArgs),
    /// Print the asset catalog.
    Assets,
    /// Print latest price and weekly/monthly change for selected assets.
    Market(request::SnapshotArgs),
    /// Probe the news feed and text synthesizer.
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    match args.command {
        Command::Report(report_args) => run_report(&settings, report_args).await,
        Command::Assets => print_json(&assets_json()),
        Command::Market(snapshot_args) => run_market(&settings, snapshot_args).await,
        Command::Check => run_check(&settings).await,
    }
}

async fn run_report(settings: &Settings, args: request::ReportArgs) -> anyhow::Result<()> {
    let rules = CurationRules::load(settings.curation_rules_path.as_deref())?;
    let req = args.to_request(chrono::Utc::now())?;

    let news = Arc::new(PolygonNewsFeed::from_settings(settings)?);
    let market = Arc::new(YahooChartFeed::from_settings(settings)?);
    let synthesizer = marketbrief_core::llm::from_settings(settings)?;
    let pipeline =
        ReportPipeline::new(news, market, synthesizer, rules).with_options(args.options());

    if args.print_prompt {
        let brief = match pipeline.prepare(&req, chrono::Utc::now()).await {
            Ok(brief) => brief,
            Err(err) => {
                let err = anyhow::Error::new(err).context("failed to assemble brief");
                sentry_anyhow::capture_anyhow(&err);
                return Err(err);
            }
        };
        return print_json(&serde_json::json!({
            "date_range": req.period.short_label(),
            "language": req.language,
            "system": brief.payload.system,
            "user": brief.payload.user,
            "references": brief.theme_digest.references(),
        }));
    }

    let outcome = pipeline.run(req).await;
    if let Some(error) = outcome.error.as_deref() {
        sentry_anyhow::capture_anyhow(
            &anyhow::anyhow!("{error}").context(format!("report run {}", outcome.run_id)),
        );
    }
    print_json(&outcome)?;
    anyhow::ensure!(outcome.success, "report run {} failed", outcome.run_id);
    Ok(())
}

async fn run_market(settings: &Settings, args: request::SnapshotArgs) -> anyhow::Result<()> {
    let feed = YahooChartFeed::from_settings(settings)?;
    let snapshot = snapshot::collect(&feed, &args.to_request(), chrono::Utc::now()).await;
    tracing::info!(
        stocks = snapshot.stocks.len(),
        forex = snapshot.forex.len(),
        indices = snapshot.indices.len(),
        "market snapshot collected"
    );
    print_json(&snapshot)
}

async fn run_check(settings: &Settings) -> anyhow::Result<()> {
    let news = match PolygonNewsFeed::from_settings(settings) {
        Ok(feed) => check::probe_news(&feed, chrono::Utc::now()).await,
        Err(err) => check::ProbeStatus::failed("news_feed", &err),
    };
    let market = match YahooChartFeed::from_settings(settings) {
        Ok(feed) => check::probe_market(&feed, chrono::Utc::now()).await,
        Err(err) => check::ProbeStatus::failed("market_feed", &err),
    };
    let synthesizer = match marketbrief_core::llm::from_settings(settings) {
        Ok(client) => check::probe_synthesizer(client.as_ref()).await,
        Err(err) => check::ProbeStatus::failed("text_synthesizer", &err),
    };
    tracing::info!(
        news = news.status,
        market = market.status,
        synthesizer = synthesizer.status,
        "collaborator check finished"
    );
    print_json(&[news, market, synthesizer])
}

fn assets_json() -> serde_json::Value {
    let groups: serde_json::Map<String, serde_json::Value> = assets::catalog()
        .into_iter()
        .map(|(group, list)| (group.to_string(), serde_json::json!(list)))
        .collect();
    serde_json::json!({
        "default_report_symbols": assets::default_report_symbols(),
        "groups": groups,
    })
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{text}");
    Ok(())
}

fn init_sentry(settings: &Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
