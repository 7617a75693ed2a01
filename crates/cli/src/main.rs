//! rvc CLI - rvc command

use anyhow::Result;
use clap::{Parser, Subcommand};
use rvc_cli::cmd;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// rvc - minimal content-addressed version control
#[derive(Parser)]
#[command(name = "rvc")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an empty repository (default: current directory)
    Init {
        /// Directory to initialize
        path: Option<PathBuf>,
    },
    /// Show the current branch and uncommitted changes
    Status,
    /// Record changes to the given paths
    Commit {
        /// Commit message (at most 80 printable characters)
        #[arg(short, long)]
        message: Option<String>,
        /// Author name (default: configured user, then $USER)
        #[arg(long)]
        author: Option<String>,
        /// Files or directories to commit
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// List branches, or create one at the current head
    Branch {
        /// Branch name to create
        name: Option<String>,
    },
    /// Switch to another branch
    Checkout {
        /// Branch name
        name: String,
    },
    /// Discard all uncommitted changes
    Reset,
    /// Show commit history of the current branch
    Log {
        /// Number of commits to show (default: 20, 0 = all)
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Copy a repository and check out its current branch
    Clone {
        /// Source repository
        src: PathBuf,
        /// Destination directory
        dst: PathBuf,
    },
    /// Print the effective configuration
    Config,
}

fn main() -> Result<()> {
    // Logs go to stderr so command output stays clean
    let filter = EnvFilter::try_from_env("RVC_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { path } => cmd::init::run(path.as_deref()),
        Commands::Status => cmd::status::run(),
        Commands::Commit { message, author, paths } => cmd::commit::run(message, author, &paths),
        Commands::Branch { name } => cmd::branch::run(name.as_deref()),
        Commands::Checkout { name } => cmd::checkout::run(&name),
        Commands::Reset => cmd::reset::run(),
        Commands::Log { limit } => cmd::log::run(limit),
        Commands::Clone { src, dst } => cmd::clone::run(&src, &dst),
        Commands::Config => cmd::config::run(),
    }
}
