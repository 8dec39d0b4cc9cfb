//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use lexharvest_crawler::{Harvester, HarvestResult, ProgressReporter};
use lexharvest_shared::{CelexId, HarvestConfig, config_file_path, init_config, load_config};
use lexharvest_storage::Store;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// LexHarvest — bulk EU legislation harvester.
#[derive(Parser)]
#[command(
    name = "lexharvest",
    version,
    about = "Harvest EU legal acts from EUR-Lex into a per-language plain-text tree.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Run a full harvest: discover, reconcile, fetch.
    Run {
        /// Storage root (overrides config file).
        #[arg(long)]
        root: Option<PathBuf>,

        /// Comma-separated language codes (e.g. "en,de,fr"). Defaults to all 24.
        #[arg(short, long)]
        languages: Option<String>,

        /// Concurrent work units (defaults to hardware parallelism).
        #[arg(short, long)]
        concurrency: Option<usize>,

        /// Per-request timeout in seconds.
        #[arg(long)]
        timeout_secs: Option<u64>,
    },

    /// Report artifact counts in the storage tree (no network).
    Status {
        /// Storage root (overrides config file).
        #[arg(long)]
        root: Option<PathBuf>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Create a default config file at `~/.lexharvest/lexharvest.toml`.
    Init,
    /// Print the config file path.
    Path,
}

// ---------------------------------------------------------------------------
// Tracing
// ---------------------------------------------------------------------------

pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "lexharvest=info",
        1 => "lexharvest=debug",
        _ => "lexharvest=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------

pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Run {
            root,
            languages,
            concurrency,
            timeout_secs,
        } => cmd_run(root, languages.as_deref(), concurrency, timeout_secs).await,
        Command::Status { root } => cmd_status(root).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Path => cmd_config_path().await,
        },
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_run(
    root: Option<PathBuf>,
    languages: Option<&str>,
    concurrency: Option<usize>,
    timeout_secs: Option<u64>,
) -> Result<()> {
    let config = load_config()?;
    let mut harvest = HarvestConfig::from(&config);

    // CLI flags override config file values
    if let Some(root) = root {
        harvest.root = root;
    }
    if let Some(languages) = languages {
        harvest.languages = languages
            .split(',')
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .collect();
    }
    if let Some(concurrency) = concurrency {
        harvest.concurrency = concurrency.max(1);
    }
    if let Some(timeout_secs) = timeout_secs {
        harvest.timeout_secs = timeout_secs;
    }

    harvest.validate_languages()?;

    info!(
        root = ?harvest.root,
        languages = harvest.languages.len(),
        concurrency = harvest.concurrency,
        "starting harvest"
    );

    let store = Store::new(&harvest.root);
    let harvester = Harvester::new(harvest)?;

    let reporter = CliProgress::new();
    let result = harvester.run(&store, &reporter).await?;

    println!();
    println!("  Harvest finished.");
    println!("  Work units:  {}", result.units);
    println!("  Documents:   {}", result.documents_written);
    println!("  Not found:   {}", result.not_found);
    println!("  Errors:      {}", result.errors);
    println!("  Time:        {:.1}s", result.duration.as_secs_f64());
    println!();

    Ok(())
}

async fn cmd_status(root: Option<PathBuf>) -> Result<()> {
    let config = load_config()?;
    let mut harvest = HarvestConfig::from(&config);
    if let Some(root) = root {
        harvest.root = root;
    }

    let store = Store::new(&harvest.root);
    let stats = store.stats()?;

    println!();
    println!("  Storage root: {}", harvest.root.display());
    println!("  Processed identifiers: {}", stats.processed_ids);
    println!("  Pending retries:       {}", stats.pending_retries);
    println!();
    for (lang, count) in &stats.documents_per_lang {
        println!("  {lang}: {count} documents");
    }
    println!();

    Ok(())
}

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("created {}", path.display());
    Ok(())
}

async fn cmd_config_path() -> Result<()> {
    let path = config_file_path()?;
    println!("{}", path.display());
    if !path.exists() {
        return Err(eyre!(
            "config file does not exist yet — run `lexharvest config init`"
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn unit_done(&self, id: &CelexId, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Fetching [{current}/{total}] {id}"));
    }

    fn done(&self, _result: &HarvestResult) {
        self.spinner.finish_and_clear();
    }
}
