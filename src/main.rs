//! CLI entry point for distill.

use anyhow::Result;
use clap::{Parser, Subcommand};
use distill::cmd;
use distill::config::Config;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "distill",
    version,
    about = "Summarize long documents through a local completion server"
)]
struct Cli {
    /// Project directory containing the documents to summarize
    #[arg(long, global = true, default_value = ".")]
    project_dir: PathBuf,

    /// Path to a config file (defaults to <project-dir>/distill.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Completion server base URL (overrides config)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Model name (overrides config)
    #[arg(long, global = true)]
    model: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Summarize every pending document in the project
    Run,
    /// Summarize a single file
    Summarize {
        /// The document to summarize
        file: PathBuf,
        /// Print the summary to stdout instead of the output directory
        #[arg(long)]
        stdout: bool,
    },
    /// Show project configuration and server status
    Status,
    /// List models available on the completion server
    Models,
    /// Sanitize existing summaries in place
    Clean,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the resolved configuration
    Show,
    /// Write a default distill.toml into the project directory
    Init,
    /// Check that the configuration parses and resolves
    Validate,
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "distill=debug" } else { "distill=warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // `config init` must work before a config file exists.
    if let Command::Config {
        action: ConfigAction::Init,
    } = &cli.command
    {
        return cmd::config_init(&cli.project_dir);
    }

    let config = Config::load(
        cli.project_dir,
        cli.config.as_deref(),
        cli.base_url.as_deref(),
        cli.model.as_deref(),
        cli.verbose,
    )?;

    match cli.command {
        Command::Run => cmd::run(&config).await,
        Command::Summarize { file, stdout } => cmd::summarize_one(&config, &file, stdout).await,
        Command::Status => cmd::status(&config).await,
        Command::Models => cmd::models(&config).await,
        Command::Clean => cmd::clean(&config),
        Command::Config { action } => match action {
            ConfigAction::Show => cmd::config_show(&config),
            ConfigAction::Init => unreachable!("handled before config load"),
            ConfigAction::Validate => cmd::config_validate(&config),
        },
    }
}
