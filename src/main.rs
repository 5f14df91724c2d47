//! Trend discoverer CLI entrypoint, per spec §6: parse arguments, build
//! the shared rate limiter and HTTP client, run crawl/NLP/scoring cycles
//! once or on a loop, and exit cleanly on SIGINT.

use std::sync::Arc;

use chrono::Utc;
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use trend_scout::cli::Cli;
use trend_scout::core::config;
use trend_scout::net::{HttpClient, RateLimiter};
use trend_scout::orchestrator::CrawlOrchestrator;
use trend_scout::{news_bridge, TrendEngine};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        error!(error = %e, "unrecoverable startup failure");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = config::load_config();
    let data_dir = config.resolve_data_dir();
    std::fs::create_dir_all(&data_dir)?;

    let platforms = cli.parsed_platforms();
    if platforms.is_empty() {
        anyhow::bail!("no valid platforms in --platforms={}", cli.platforms);
    }

    let limiter = Arc::new(RateLimiter::new(
        config.rate_limiter.resolve_base_interval_ms(),
        config.rate_limiter.resolve_jitter_ms(),
        config.rate_limiter.resolve_max_retries(),
    ));
    let client = HttpClient::new(
        limiter,
        config.rate_limiter.resolve_request_timeout_secs(),
        cli.proxy.as_deref(),
    )?;

    let orchestrator = CrawlOrchestrator::new(platforms);
    let mut engine = TrendEngine::new(config);

    loop {
        if let Err(e) = run_cycle(&orchestrator, &client, &mut engine, &cli, &data_dir).await {
            warn!(error = %e, "cycle failed, continuing to next scheduled run");
        }

        if cli.loop_minutes == 0 {
            break;
        }

        tokio::select! {
            _ = tokio::time::sleep(std::time::Duration::from_secs(cli.loop_minutes * 60)) => {}
            _ = tokio::signal::ctrl_c() => {
                info!("received interrupt, exiting cleanly");
                break;
            }
        }
    }

    Ok(())
}

async fn run_cycle(
    orchestrator: &CrawlOrchestrator,
    client: &HttpClient,
    engine: &mut TrendEngine,
    cli: &Cli,
    data_dir: &std::path::Path,
) -> anyhow::Result<()> {
    let (items, stats) = orchestrator.run_cycle(client, cli.keywords, data_dir).await?;

    info!(
        fetched = stats.items_fetched,
        after_dedup = stats.items_after_dedup,
        "crawl complete"
    );

    if items.is_empty() {
        warn!("zero raw items across all platforms this cycle; seed from news.json or widen --platforms");
        return Ok(());
    }

    let topics = engine.run_cycle(items, cli.keywords, cli.topk).await?;
    info!(topics = topics.len(), "cycle produced ranked trends");

    if cli.with_news {
        let news_path = data_dir.join("news.json");
        news_bridge::publish(&news_path, &topics, Utc::now())?;
        info!(path = %news_path.display(), "published synthetic trend entries to news.json");
    }

    Ok(())
}
