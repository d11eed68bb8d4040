//! Catalog-Snapshot main entry point
//!
//! This is the command-line interface for the Catalog-Snapshot listing crawler.

use catalog_snapshot::catalog::ModelFilter;
use catalog_snapshot::config::{
    compute_config_hash, read_config, validate, Config, RendererEngine,
};
use catalog_snapshot::crawler::crawl;
use catalog_snapshot::output::{
    load_snapshot, print_statistics, save_snapshot, SnapshotStatistics,
};
use catalog_snapshot::CatalogError;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Catalog-Snapshot: a paginated catalog listing crawler
///
/// Catalog-Snapshot walks the numbered pages of a model catalog listing,
/// extracts one record per listing item, and writes the aggregate to a
/// single JSON snapshot.
#[derive(Parser, Debug)]
#[command(name = "catalog-snapshot")]
#[command(version)]
#[command(about = "Snapshot a paginated model catalog listing", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Maximum number of listing pages to visit
    #[arg(long, value_name = "N")]
    max_pages: Option<u32>,

    /// Where to write the JSON snapshot
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Page renderer to use (chromium or http)
    #[arg(long, value_name = "ENGINE")]
    engine: Option<RendererEngine>,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, group = "mode")]
    dry_run: bool,

    /// Show statistics from the existing snapshot and exit
    #[arg(long, group = "mode")]
    stats: bool,

    /// Search the existing snapshot and print matching models as JSON
    #[arg(long, group = "mode")]
    search: bool,

    /// Print the model with this exact name from the existing snapshot
    #[arg(long, value_name = "NAME", group = "mode")]
    find: Option<String>,

    /// List the distinct capabilities in the existing snapshot
    #[arg(long, group = "mode")]
    list_capabilities: bool,

    /// List the distinct sizes in the existing snapshot
    #[arg(long, group = "mode")]
    list_sizes: bool,

    /// Only models whose name contains this text (case-insensitive)
    #[arg(long, value_name = "TEXT", requires = "search")]
    name_contains: Option<String>,

    /// Only models whose description contains this text (case-insensitive)
    #[arg(long, value_name = "TEXT", requires = "search")]
    description_contains: Option<String>,

    /// Only models with this capability (repeat to require several)
    #[arg(long = "capability", value_name = "TAG", requires = "search")]
    capabilities: Vec<String>,

    /// Only models offering this size (repeat to accept any of several)
    #[arg(long = "size", value_name = "TAG", requires = "search")]
    sizes: Vec<String>,

    /// Maximum number of search results
    #[arg(long, value_name = "N", requires = "search")]
    limit: Option<usize>,

    /// Number of search results to skip
    #[arg(long, value_name = "N", default_value_t = 0, requires = "search")]
    offset: usize,
}

impl Cli {
    fn model_filter(&self) -> ModelFilter {
        ModelFilter {
            name_contains: self.name_contains.clone(),
            description_contains: self.description_contains.clone(),
            capabilities: self.capabilities.clone(),
            sizes: self.sizes.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = match load_effective_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e);
        }
    };
    apply_overrides(&mut config, &cli);

    if let Err(e) = validate(&config) {
        tracing::error!("Invalid configuration: {}", e);
        return Err(e.into());
    }

    // Handle different modes
    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else if cli.search || cli.find.is_some() || cli.list_capabilities || cli.list_sizes {
        handle_query(&config, &cli)?;
    } else {
        handle_crawl(&config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("catalog_snapshot=info,warn"),
            1 => EnvFilter::new("catalog_snapshot=debug,info"),
            2 => EnvFilter::new("catalog_snapshot=trace,debug"),
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

/// Reads the configuration file if one was given, otherwise the defaults
fn load_effective_config(path: Option<&Path>) -> Result<Config, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        tracing::info!("No configuration file given, using defaults");
        return Ok(Config::default());
    };

    tracing::info!("Loading configuration from: {}", path.display());
    let config = read_config(path)?;
    let hash = compute_config_hash(path)?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);
    Ok(config)
}

/// Applies command-line overrides on top of the file configuration
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = max_pages;
    }
    if let Some(output) = &cli.output {
        config.output.output_path = output.display().to_string();
    }
    if let Some(engine) = cli.engine {
        config.renderer.engine = engine;
    }
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Catalog-Snapshot Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Max pages: {}", config.crawler.max_pages);
    println!("  Page timeout: {}ms", config.crawler.page_timeout_ms);
    println!(
        "  Inter-page delay: {}s",
        config.crawler.inter_page_delay_seconds
    );

    println!("\nSource:");
    println!("  Listing: {}", config.source.base_url);
    println!("  Origin: {}", config.source.origin);

    println!("\nRenderer:");
    println!("  Engine: {}", config.renderer.engine);
    if let Some(executable) = &config.renderer.chrome_executable {
        println!("  Chrome executable: {}", executable);
    }
    println!("  Block resources: {}", config.renderer.block_resources);
    println!("  User agent: {}", config.renderer.user_agent);

    println!("\nOutput:");
    println!("  Snapshot: {}", config.output.output_path);

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would visit up to {} listing pages",
        config.crawler.max_pages
    );
}

/// Handles the --stats mode: shows statistics from the existing snapshot
fn handle_stats(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let path = Path::new(&config.output.output_path);
    println!("Snapshot: {}\n", path.display());

    let dataset = load_snapshot(path)?;
    let stats = SnapshotStatistics::from_dataset(&dataset);
    print_statistics(&stats);

    Ok(())
}

/// Handles the snapshot query modes: --search, --find, --list-capabilities
/// and --list-sizes
fn handle_query(config: &Config, cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let dataset = load_snapshot(Path::new(&config.output.output_path))?;

    if let Some(name) = &cli.find {
        match dataset.find_by_name(name) {
            Some(model) => println!("{}", serde_json::to_string_pretty(model)?),
            None => {
                tracing::error!("No model named '{}' in snapshot", name);
                return Err(format!("model '{}' not found", name).into());
            }
        }
    } else if cli.list_capabilities {
        for capability in dataset.unique_capabilities() {
            println!("{}", capability);
        }
    } else if cli.list_sizes {
        for size in dataset.unique_sizes() {
            println!("{}", size);
        }
    } else {
        let result = dataset.filter(&cli.model_filter(), cli.limit, cli.offset);
        tracing::info!("{} models match", result.total_models);
        println!("{}", serde_json::to_string_pretty(&result)?);
    }

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Using {} renderer", config.renderer.engine);

    let outcome = match crawl(config).await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    // Saved before a teardown failure is reported
    let path = Path::new(&config.output.output_path);
    if let Err(e) = save_snapshot(&outcome.dataset, path) {
        tracing::error!("Failed to write snapshot: {}", e);
        return Err(e.into());
    }

    tracing::info!(
        "Saved {} models to {} ({} pages visited, stop reason: {})",
        outcome.dataset.total_models,
        path.display(),
        outcome.pages_attempted,
        outcome.stop_reason
    );

    if let Some(e) = outcome.teardown_error {
        tracing::error!("Renderer teardown failed: {}", e);
        return Err(CatalogError::Render(e).into());
    }

    Ok(())
}
