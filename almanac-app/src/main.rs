use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use almanac_calendar::output::write_output;
use almanac_calendar::{AggregateOutput, CalendarScraper, SiteSelectors};
use almanac_common::observability::{LogConfig, init_logging};
use almanac_config::{AlmanacConfig, AlmanacConfigLoader};
use almanac_http::{ClientSettings, HttpClient};
use anyhow::{Context, Result};
use clap::Parser;

/// Scrape the event calendar window by window and save one JSON document.
#[derive(Debug, Parser)]
#[command(name = "almanac", version)]
struct Args {
    /// YAML config file; missing is fine, defaults apply.
    #[arg(long, default_value = "almanac.yaml")]
    config: PathBuf,

    /// Override `output.path`.
    #[arg(long)]
    output: Option<PathBuf>,
}

// detail fetches interleave on one thread, never in parallel
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 1) Load config (env wins)
    let mut cfg: AlmanacConfig = AlmanacConfigLoader::new()
        .with_optional_file(&args.config)
        .load()
        .with_context(|| format!("loading {}", args.config.display()))?;
    if let Some(out) = args.output {
        cfg.output.path = out;
    }

    let log_path = init_logging(LogConfig {
        log_dir: cfg.logging.dir.clone(),
        emit_stderr: cfg.logging.emit_stderr,
        format: cfg.logging.format,
        default_filter: cfg.logging.filter.clone(),
        ..LogConfig::default()
    })?;
    tracing::debug!(log_path = %log_path.display(), "almanac.logging.ready");

    let selectors = SiteSelectors::compile(&cfg.site.selectors)?;
    let client = HttpClient::with_settings(
        &cfg.site.origin,
        ClientSettings {
            timeout: cfg.http.timeout_secs.map(Duration::from_secs),
            connect_timeout: cfg.http.connect_timeout_secs.map(Duration::from_secs),
            user_agent: cfg.http.user_agent.clone(),
        },
    )?;

    let listing_urls = cfg.calendar.listing_urls(&cfg.site);
    tracing::info!(windows = listing_urls.len(), origin = %cfg.site.origin, "almanac.run.start");

    let scraper = CalendarScraper::new(Arc::new(client), selectors, cfg.site.origin.clone());
    let events = scraper.run(&listing_urls).await;

    write_output(&cfg.output.path, &AggregateOutput { events })?;
    Ok(())
}
