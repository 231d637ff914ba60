//! Realty-Sweep main entry point
//!
//! This is the command-line interface for the Realty-Sweep listing crawler.

use anyhow::Context;
use clap::Parser;
use realty_sweep::config::{load_config_with_hash, Config, OutputFormat, Overrides, RenderEngine};
use realty_sweep::crawler::run_crawl;
use realty_sweep::site::SiteLayout;
use realty_sweep::Termination;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Realty-Sweep: a throttled real-estate listing crawler
///
/// Realty-Sweep walks the search results for a location page by page,
/// scrolls each page until every listing tile has loaded, and extracts a
/// fixed set of fields from every listing it finds.
#[derive(Parser, Debug)]
#[command(name = "realty-sweep")]
#[command(version = "1.0.0")]
#[command(about = "A throttled real-estate listing crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Maximum number of result pages to visit
    #[arg(long, value_name = "N")]
    max_pages: Option<u32>,

    /// Location to search
    #[arg(long, value_name = "L")]
    location: Option<String>,

    /// Output file
    #[arg(long, value_name = "PATH")]
    output: Option<String>,

    /// Output format
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Rendering engine
    #[arg(long, value_enum)]
    engine: Option<RenderEngine>,

    /// Validate config and show which pages would be visited without crawling
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            max_pages: self.max_pages,
            location: self.location.clone(),
            output_path: self.output.clone(),
            output_format: self.format,
            engine: self.engine,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = resolve_config(&cli)?;

    if cli.dry_run {
        handle_dry_run(&config)
    } else {
        handle_crawl(config).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("realty_sweep=info,warn"),
            1 => EnvFilter::new("realty_sweep=debug,info"),
            2 => EnvFilter::new("realty_sweep=trace,debug"),
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

/// Loads the config file (if any) and applies command-line overrides
fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            Config::default()
        }
    };

    let overrides = cli.overrides();
    if overrides.is_empty() {
        return Ok(config);
    }

    overrides
        .apply(config)
        .context("Command-line overrides produced an invalid configuration")
}

/// Handles the --dry-run mode: shows the resolved config and the pages to visit
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    let layout = SiteLayout::new(&config.site, &config.run.location)
        .context("Failed to resolve site layout")?;
    let rendered = toml::to_string_pretty(config).context("Failed to render configuration")?;

    println!("=== Realty-Sweep Dry Run ===\n");
    println!("{}", rendered.trim_end());

    println!("\nPages (up to {}):", config.run.max_pages);
    for page in 1..=config.run.max_pages {
        println!("  {}. {}", page, layout.page_url(page));
    }

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would write {} records to {}",
        config.output.format, config.output.path
    );

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    tracing::info!(
        "Engine: {}, output: {} ({})",
        config.render.engine,
        config.output.path,
        config.output.format
    );

    let report = run_crawl(config).await.context("Crawl failed")?;

    match &report.termination {
        Termination::Completed => tracing::info!("Crawl completed: {}", report),
        Termination::Aborted { .. } => tracing::warn!("Crawl ended early: {}", report),
    }

    Ok(())
}
