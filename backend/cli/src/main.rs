mod config;
mod status_cmd;

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use simdash_gateway::{start_server, Dashboard, GatewayState};
use simdash_logging::{init_logger, LoggerOptions};

use config::Config;

#[derive(Parser)]
#[command(name = "simdash")]
#[command(about = "Live dashboard for simulator automation tool calls")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the dashboard server
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Show the state of a running dashboard
    Status {
        /// Port of the running dashboard
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port } => {
            let config = Config {
                port: port.unwrap_or(config.port),
                ..config
            };
            init_logger(&LoggerOptions {
                level: config.log_level.clone(),
                log_dir: config.log_dir.clone(),
            });
            run_server(config).await?;
        }
        Commands::Status { port } => {
            status_cmd::run(port.unwrap_or(config.port)).await?;
        }
    }

    Ok(())
}

async fn run_server(config: Config) -> Result<()> {
    info!(
        port = config.port,
        bind = %config.bind_address,
        max_records = config.max_records,
        "Starting dashboard"
    );

    let dashboard = Dashboard::new(config.store_config());
    let state = GatewayState::new(dashboard).with_viewer_buffer(config.viewer_buffer);

    let addr: SocketAddr = format!("{}:{}", config.bind_address, config.port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", config.bind_address, config.port))?;

    start_server(addr, state).await
}
