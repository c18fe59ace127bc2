//! Portscope CLI - inventory and manage processes on network ports.
//!
//! A command-line tool for scanning local ports, detecting zombie and
//! conflicting processes, killing processes, and pruning build caches.

mod commands;
mod workspace;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "portscope")]
#[command(author, version, about = "Inventory and manage processes on local ports")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List listening ports with conflict detection
    #[command(alias = "ls")]
    List {
        /// Filter by port number
        #[arg(short, long)]
        port: Option<u16>,

        /// Filter by process name
        #[arg(short = 'n', long)]
        name: Option<String>,
    },

    /// Full scan including zombie detection
    Detect,

    /// Kill a process by pid
    Kill {
        /// Process ID to kill
        pid: u32,
    },

    /// Detect and kill all zombie processes
    KillZombies,

    /// Kill every process in the inventory
    StopAll {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Remove known build-cache directories under a workspace root
    ClearCache {
        /// Workspace root (defaults to the current directory)
        path: Option<PathBuf>,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Run the workspace dev script with PORT bound
    Start {
        /// Port to expose via the PORT environment variable
        port: u16,

        /// Workspace root (defaults to the current directory)
        path: Option<PathBuf>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::List { port, name } => commands::list::run(port, name, cli.json).await,
        Commands::Detect => commands::detect::run(cli.json).await,
        Commands::Kill { pid } => commands::kill::run(pid).await,
        Commands::KillZombies => commands::kill::run_zombies().await,
        Commands::StopAll { yes } => commands::kill::run_stop_all(yes).await,
        Commands::ClearCache { path, yes } => commands::cache::run(path, yes).await,
        Commands::Start { port, path } => commands::start::run(port, path).await,
    }
}
