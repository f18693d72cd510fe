//! ostinato - a fast, Composer-compatible PHP dependency manager.
//!
//! Reads `composer.json`, resolves dependencies from Packagist, installs
//! packages into `vendor/`, and generates the autoload glue a PHP
//! runtime consumes.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

mod commands;
mod output;
mod workspace;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "ostinato",
    version,
    about = "A fast Composer-compatible PHP dependency manager"
)]
struct Cli {
    /// Working directory containing composer.json.
    #[arg(short = 'd', long = "working-dir", global = true, default_value = ".")]
    working_dir: PathBuf,

    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Create a basic composer.json in the working directory.
    Init(commands::init::InitArgs),
    /// Install dependencies from the lockfile (or resolve when absent).
    Install(commands::install::InstallArgs),
    /// Re-resolve dependencies and update the lockfile.
    Update(commands::update::UpdateArgs),
    /// Add packages to composer.json and install them.
    Require(commands::require::RequireArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("failed to create runtime");

    let result = runtime.block_on(run(&cli));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{} {error:#}", console::style("error:").red().bold());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    let workspace = workspace::Workspace::new(&cli.working_dir);
    match &cli.command {
        Commands::Init(args) => commands::init::run(&workspace, args),
        Commands::Install(args) => commands::install::run(&workspace, args).await,
        Commands::Update(args) => commands::update::run(&workspace, args).await,
        Commands::Require(args) => commands::require::run(&workspace, args).await,
    }
}
