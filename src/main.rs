//! Shelf-Census main entry point
//!
//! Command-line interface for the catalog census crawler.

use anyhow::Context;
use clap::Parser;
use shelf_census::assets::AssetStore;
use shelf_census::catalog::Catalog;
use shelf_census::config::{load_config_with_hash, Config};
use shelf_census::output::{build_report, print_report};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Shelf-Census: a product catalog census crawler
///
/// Walks a shop's section/subsection hierarchy, records up to a quota of
/// distinct products in an append-only catalog, captures product images,
/// and prints composition and image-size statistics.
#[derive(Parser, Debug)]
#[command(name = "shelf-census")]
#[command(version = "1.0.0")]
#[command(about = "A product catalog census crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without crawling
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Print statistics over the existing catalog and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) =
        load_config_with_hash(&cli.config).context("failed to load configuration")?;
    tracing::info!("Configuration loaded (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        handle_crawl(config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("shelf_census=info,warn"),
            1 => EnvFilter::new("shelf_census=debug,info"),
            2 => EnvFilter::new("shelf_census=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles --dry-run: shows the validated configuration and stops.
fn handle_dry_run(config: &Config) {
    println!("=== Shelf-Census Dry Run ===\n");

    println!("Site:");
    println!("  Base URL: {}", config.site.base_url);
    println!("  Catalog page: {}", config.site.catalog_page);

    println!("\nCrawl:");
    println!("  Quota: {} items", config.crawl.quota);

    println!("\nStorage:");
    println!("  Catalog: {}", config.storage.catalog_path);
    println!("  Images: {}", config.storage.image_dir);

    println!("\nSelectors:");
    println!("  Section block: {}", config.selectors.section_block);
    println!("  Section title: {}", config.selectors.section_title);
    println!("  Subsection link: {}", config.selectors.subsection_link);
    println!("  Product card: {}", config.selectors.product_card);
    println!("  Next page: {}", config.selectors.next_page);

    println!("\n✓ Configuration is valid");
}

/// Handles --stats: reports over the persisted catalog without crawling.
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    let catalog = Catalog::open(
        Path::new(&config.storage.catalog_path),
        config.storage.separator_char(),
    )
    .context("failed to load catalog")?;
    let assets = AssetStore::create(Path::new(&config.storage.image_dir))
        .context("failed to open image directory")?;
    assets.verify_against_catalog(catalog.len())?;

    let report = build_report(&catalog, &assets)?;
    print_report(&report);
    Ok(())
}

/// Handles the main crawl operation, then prints the report.
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    tracing::info!(
        "Starting census: quota {}, catalog {}",
        config.crawl.quota,
        config.storage.catalog_path
    );

    let (coordinator, summary) = shelf_census::crawler::crawl(config)
        .await
        .context("census run failed")?;

    tracing::info!(
        "Run finished: {} items accepted over {} pass(es) ({:?})",
        summary.accepted,
        summary.passes,
        summary.end
    );

    let report = build_report(coordinator.catalog(), coordinator.assets())?;
    print_report(&report);
    Ok(())
}
