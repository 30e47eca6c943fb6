//! Command-line client for ZooKeeper serversets.
//!
//! Four primitives over a serverset path: select a random live member,
//! block until the set changes, mirror the set into an on-disk digest,
//! and publish raw content to a path.

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use zkset_client::{WatchOutcome, await_change, connect, publish, reconcile, select_member};

#[derive(Parser)]
#[command(name = "zkset", about = "interact with zookeeper serversets", version)]
struct Cli {
    /// The zookeeper ensemble to talk to, a comma separated list of
    /// host:port pairs.
    #[arg(
        long,
        global = true,
        env = "ZKSET_ENSEMBLE",
        default_value = "127.0.0.1:2181"
    )]
    ensemble: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Select a random serverset member and print its endpoint.
    Select {
        /// Serverset path.
        path: String,
        /// Logical port name to resolve instead of the service endpoint.
        port_name: Option<String>,
    },
    /// Block until the set has changed.
    Watch {
        /// Serverset path.
        path: String,
    },
    /// Read a set and atomically update an on-disk digest.
    Read {
        /// Serverset path.
        path: String,
        /// Digest file to reconcile against.
        digest_file: PathBuf,
    },
    /// Set the content of a path from stdin.
    Set {
        /// Node path to write.
        path: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let (store, mut session) = connect(&cli.ensemble).await?;

    match cli.command {
        Command::Select { path, port_name } => {
            let mut rng = rand::rng();
            let endpoint = select_member(&store, &mut rng, &path, port_name.as_deref()).await?;
            println!("{endpoint}");
        }
        Command::Watch { path } => match await_change(&store, &mut session, &path).await? {
            WatchOutcome::Changed => println!("Detected membership change."),
            WatchOutcome::AlreadyPresent => {
                info!("set already present, nothing to wait for");
            }
        },
        Command::Read { path, digest_file } => {
            reconcile(&store, &path, &digest_file).await?;
        }
        Command::Set { path } => {
            let mut content = Vec::new();
            std::io::stdin()
                .read_to_end(&mut content)
                .context("failed to read from stdin")?;
            publish(&store, &path, &content).await?;
        }
    }

    Ok(())
}
