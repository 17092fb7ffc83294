//! racing-scraper - affiliate racing data to JSON files
//!
//! Fetches every meeting for the selected countries and categories on one
//! date, pulls race detail (plus supplemental form for incomplete
//! international races), and writes the results under
//! `<output_dir>/<date>/<meeting>/`.

use anyhow::{Context, Result};
use clap::Parser;
use racing_common::config::load_toml_config;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use racing_scraper::selection::{self, Selection, TerminalPrompt};
use racing_scraper::services::RaceStore;
use racing_scraper::{AffiliateClient, Args, RaceWalker, ScraperConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse();

    if args.list_countries {
        selection::print_catalog(&mut std::io::stdout().lock())?;
        return Ok(());
    }

    let toml_config =
        load_toml_config(args.config.as_deref()).context("Failed to load configuration file")?;

    // Initialize tracing
    let level = toml_config.logging.level.clone();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("racing_scraper={level},racing_common={level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let today = chrono::Local::now().date_naive();
    let config = ScraperConfig::resolve(&args, &toml_config, today)
        .context("Invalid configuration")?;

    let selection = if args.interactive {
        selection::print_catalog(&mut std::io::stdout().lock())?;
        let mut prompt = TerminalPrompt::new().context("Failed to open terminal prompt")?;
        selection::prompt_selection(&mut prompt)
    } else {
        Selection::resolve(&config.countries, &config.categories)
    };

    info!("Scraping with configuration:");
    info!("  Date: {}", config.date);
    info!("  Countries: {}", selection.countries.join(","));
    info!("  Categories: {}", selection.categories.join(","));
    info!("  Output: {}", config.base_dir.display());

    let client = AffiliateClient::new(config.client.clone())
        .context("Failed to build HTTP client")?;
    let walker = RaceWalker::new(client, RaceStore::new(&config.base_dir))
        .with_runner_pause(config.runner_delay);

    let report = walker
        .run(&config.date, &selection)
        .await
        .context("Scrape failed")?;

    info!(
        meetings = report.meetings_written,
        saved = report.races_saved,
        failed = report.races_failed,
        skipped = report.races_skipped,
        enhanced = report.enhancements_attempted,
        "Run complete"
    );

    Ok(())
}
