//! postqueue CLI
//!
//! Surfaces one queued post per invocation. Meant to be run by a scheduler;
//! the emitted record is the only thing written to stdout, logs go to stderr.

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use postqueue::{
    error::Result,
    models::Config,
    pipeline,
    services::SearchClient,
    storage::{LocalStorage, QueueStorage},
};

/// postqueue - drip-feed search results one at a time
#[derive(Parser, Debug)]
#[command(name = "postqueue", version, about = "Drip-feed search results one at a time")]
struct Cli {
    /// Directory holding the watermark and backlog files
    #[arg(short, long, default_value = ".")]
    state_dir: PathBuf,

    /// Path to config file (default: {state_dir}/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch, queue, and print the next post (default)
    Next {
        /// Override the configured search term
        #[arg(short, long)]
        query: Option<String>,
    },

    /// Show the watermark and backlog
    Info,

    /// Validate the configuration file
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let (config_path, mut config) = match &cli.config {
        Some(path) => (path.clone(), Config::load_explicit(path)?),
        None => {
            let path = cli.state_dir.join("config.toml");
            let config = Config::load_or_default(&path);
            (path, config)
        }
    };
    let storage = LocalStorage::new(&cli.state_dir, &config.storage);

    match cli.command.unwrap_or(Command::Next { query: None }) {
        Command::Next { query } => {
            if let Some(query) = query {
                config.search.query = query;
            }

            let source = SearchClient::new(&config.search)?;
            let report = pipeline::run_once(&config, &storage, &source).await?;

            if let Some(line) = report.emitted {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(line.as_bytes())?;
                stdout.flush()?;
            }
        }

        Command::Info => {
            let watermark = storage.read_watermark().await?;
            let backlog = storage.read_backlog().await?;

            log::info!("State directory: {}", storage.root_dir().display());
            log::info!("Watermark: {}", watermark);
            log::info!("Backlog: {} records", backlog.len());
            if let Some(head) = backlog.first() {
                log::info!("Next up: {}", head);
            }
        }

        Command::Validate => {
            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK ({})", config_path.display());
        }
    }

    Ok(())
}
