//! pixdesk command line front-end.

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use pixdesk::config::{LogLevel, WorkspaceConfig};

#[derive(Parser)]
#[command(name = "pixdesk", about = "Image analysis workspace client")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Analysis server base URL, overrides the configuration
    #[arg(long, global = true)]
    server: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload images for analysis and print the result
    Analyze(commands::analyze::AnalyzeArgs),
    /// Generate a sample dataset from one image
    Generate(commands::generate::GenerateArgs),
    /// Show or write the effective configuration
    Config(commands::config::ConfigArgs),
}

fn init_logging(verbose: bool, level: LogLevel) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level.to_level_filter());
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.format_timestamp_millis().init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => WorkspaceConfig::load(path)?,
        None => WorkspaceConfig::load_from_default_path().unwrap_or_default(),
    };
    if let Some(server) = &cli.server {
        config.server.base_url = server.clone();
    }

    init_logging(cli.verbose, config.log_level);

    match &cli.command {
        Commands::Analyze(args) => commands::analyze::run(args, config),
        Commands::Generate(args) => commands::generate::run(args, config),
        Commands::Config(args) => commands::config::run(args, &config, cli.config.as_deref()),
    }
}
