//! Cedar command line.
//!
//! ```text
//! cedar run --config cedar.toml            coordinator: spawns and routes workers
//!     └── cedar worker --config cedar.toml --id N   (one per worker, stdout piped)
//! cedar identity --config cedar.toml       print each group's identity
//! ```
//!
//! Cedar's own diagnostics go to stderr; stdout belongs to console
//! transports (coordinator) or to the coordinator channel (worker).

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use cedar::config::{load_config, CedarConfig};
use cedar::lifecycle::{self, Shutdown};
use cedar::observability::{logging, metrics};
use cedar::{derive_identity, WorkerId};

#[derive(Parser)]
#[command(name = "cedar")]
#[command(about = "Aggregate loggers across worker processes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the coordinator and its workers
    Run {
        #[arg(short, long, default_value = "cedar.toml")]
        config: PathBuf,
    },
    /// Run one worker (spawned by `run`)
    Worker {
        #[arg(short, long, default_value = "cedar.toml")]
        config: PathBuf,

        #[arg(long)]
        id: u32,
    },
    /// Print the identity of every logger group
    Identity {
        #[arg(short, long, default_value = "cedar.toml")]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config: path } => {
            let config = load(&path)?;
            if config.observability.metrics_enabled {
                match config.observability.metrics_address.parse::<SocketAddr>() {
                    Ok(addr) => metrics::init_metrics(addr),
                    Err(_) => tracing::error!(
                        metrics_address = %config.observability.metrics_address,
                        "Failed to parse metrics address"
                    ),
                }
            }

            let shutdown = Shutdown::new();
            lifecycle::spawn_ctrl_c_handler(shutdown.clone());
            lifecycle::run_coordinator(&config, &path, shutdown).await?;
        }
        Commands::Worker { config: path, id } => {
            let config = load(&path)?;
            lifecycle::run_worker(&config, WorkerId::new(id)).await?;
        }
        Commands::Identity { config: path } => {
            let config = load(&path)?;
            for group in &config.loggers {
                println!("{} {}", group.name, derive_identity(&group.transports));
            }
        }
    }

    Ok(())
}

fn load(path: &Path) -> Result<CedarConfig, Box<dyn std::error::Error>> {
    let config = load_config(path)?;
    logging::init_tracing(&config.observability);
    tracing::debug!(path = %path.display(), loggers = config.loggers.len(), "Configuration loaded");
    Ok(config)
}
