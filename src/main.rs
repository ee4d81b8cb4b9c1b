use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use netconfig::{config, ConfigError, ConfigStore};

/// `match` exit code for a network name missing from the config.
/// A chain id mismatch exits with 1.
const EXIT_NOT_CONFIGURED: u8 = 2;

#[derive(Parser)]
#[command(name = "netconfig")]
#[command(about = "Inspect the network endpoints used for contract deployment", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Config file (.json or .toml). Defaults to the built-in configuration
    #[arg(long, global = true, env = "NETCONFIG_FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the default rpc endpoint
    Rpc,

    /// List configured network names
    List,

    /// Show one network profile as JSON
    Show { name: String },

    /// Print the whole configuration as JSON
    Dump,

    /// Check whether a network accepts the given chain id
    Match { name: String, chain_id: u64 },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging();

    let loaded;
    let store: &ConfigStore = match &cli.config {
        Some(path) => {
            loaded = ConfigStore::from_path(path)
                .with_context(|| format!("loading {}", path.display()))?;
            &loaded
        }
        None => {
            debug!("using built-in network config");
            config::get()
        }
    };

    match cli.command {
        Commands::Rpc => {
            let rpc = store.get_rpc_endpoint();
            println!("host: {}", rpc.host);
            println!("port: {}", rpc.port);
            println!("url:  {}", rpc.url());
        }
        Commands::List => {
            for name in store.list_network_names() {
                println!("{}", name);
            }
        }
        Commands::Show { name } => {
            let profile = store.get_network(&name)?;
            let doc = serde_json::json!({ name: profile });
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
        Commands::Dump => println!("{}", store.to_json_pretty()?),
        Commands::Match { name, chain_id } => {
            let profile = match store.get_network(&name) {
                Ok(profile) => profile,
                Err(ConfigError::NotFound { .. }) => {
                    eprintln!("❌ {} is not configured", name);
                    return Ok(ExitCode::from(EXIT_NOT_CONFIGURED));
                }
                Err(e) => return Err(e.into()),
            };
            if !profile.network_id.matches(chain_id) {
                eprintln!(
                    "❌ {} expects network id {}, node reports {}",
                    name, profile.network_id, chain_id
                );
                return Ok(ExitCode::FAILURE);
            }
            println!("✅ {} accepts chain {}", name, chain_id);
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
