use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fairwork_node::{api, config::NodeConfig, logging, node::FairworkNode};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "fairwork")]
#[command(about = "Fairwork - crowdsourced task marketplace node", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the marketplace node
    Start {
        /// Host for the HTTP API
        #[arg(long)]
        api_host: Option<String>,

        /// Port for the HTTP API
        #[arg(long)]
        api_port: Option<u16>,
    },

    /// Write a default configuration file
    Init {
        /// Output path for the configuration
        #[arg(short, long, default_value = "fairwork.toml")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init { output } => {
            let config = NodeConfig::default();
            config
                .save_to_file(&output)
                .with_context(|| format!("failed to write config to {:?}", output))?;
            println!("Wrote default configuration to {:?}", output);
            Ok(())
        }
        Commands::Start { api_host, api_port } => {
            let mut config = match &cli.config {
                Some(path) => NodeConfig::from_file(path)
                    .with_context(|| format!("failed to load config from {:?}", path))?,
                None => NodeConfig::default(),
            };
            config.apply_env_overrides();
            if let Some(host) = api_host {
                config.api.host = host;
            }
            if let Some(port) = api_port {
                config.api.port = port;
            }

            logging::init_logging(&config.logging);

            info!(
                node = %config.node.name,
                network = %config.chain.network,
                "Starting Fairwork node"
            );

            let node = Arc::new(FairworkNode::new(config)?);
            api::serve(node).await
        }
    }
}
