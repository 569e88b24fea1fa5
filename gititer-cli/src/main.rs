use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod display;
mod prompt;

use commands::{cancel, init, iter, status, watch, Workspace};

#[derive(Parser)]
#[command(name = "gititer")]
#[command(version, about = "Grow commit messages as your working tree changes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Repository roots to work on (defaults to current directory)
    #[arg(short, long = "root", global = true)]
    roots: Vec<PathBuf>,

    /// Repository that commands should target when several are open
    #[arg(long, global = true)]
    repo: Option<PathBuf>,

    /// Database path
    #[arg(short, long, global = true)]
    db: Option<PathBuf>,

    /// Log decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Check each repository and seed an initial message if it is dirty
    Init,

    /// Reconcile the message in progress with the whole working tree
    Iter,

    /// Drop the message in progress and everything it covers
    Cancel,

    /// Watch repositories and prompt as files change
    Watch,

    /// Show the message in progress and which changes it covers
    Status,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let workspace = Workspace::open(&cli.roots, cli.db, cli.repo)?;

    match cli.command {
        Commands::Init => init::run(workspace)?,
        Commands::Iter => iter::run(workspace)?,
        Commands::Cancel => cancel::run(workspace)?,
        Commands::Watch => watch::run(workspace).await?,
        Commands::Status => status::run(workspace)?,
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        if let Some(gititer_core::Error::HostUnavailable(reason)) = e.downcast_ref() {
            display::warning(&format!("gititer is inactive: {reason}"));
            return Ok(());
        }
        return Err(e);
    }

    Ok(())
}
