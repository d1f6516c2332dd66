use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use botwatch_core::MonitorConfig;

mod server;

#[derive(Parser, Debug, Clone)]
#[command(name = "botwatch")]
#[command(author, version, about = "Reports the status of a set of Discord bots on request")]
pub struct Args {
    /// Extra .env file to load before reading the environment
    #[arg(long)]
    env_file: Option<PathBuf>,

    /// Liveness port (overrides PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Command surface: "prefix" or "slash" (overrides COMMAND_MODE)
    #[arg(long)]
    mode: Option<String>,

    /// Text command prefix (overrides COMMAND_PREFIX)
    #[arg(long)]
    prefix: Option<String>,

    /// Skip the liveness HTTP server
    #[arg(long, default_value = "false")]
    no_liveness: bool,
}

fn init_tracing() {
    let filter = EnvFilter::from_default_env()
        .add_directive("botwatch=info".parse().unwrap_or_default());
    let sub = fmt().with_env_filter(filter).finish();
    if let Err(e) = tracing::subscriber::set_global_default(sub) {
        eprintln!("Failed to set global subscriber: {e}");
    }
}

/// Environment first, then CLI flags on top.
fn load_config(args: &Args) -> anyhow::Result<MonitorConfig> {
    if let Some(path) = args.env_file.as_ref() {
        dotenv::from_path(path)
            .with_context(|| format!("could not load env file {}", path.display()))?;
    }

    let mut config = MonitorConfig::from_env()?;
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(mode) = args.mode.as_deref() {
        config.surface = mode.parse()?;
    }
    if let Some(prefix) = args.prefix.as_ref().filter(|p| !p.is_empty()) {
        config.prefix = prefix.clone();
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(c) => c,
        Err(e) => {
            error!("Configuration error: {e:#}");
            return Err(e);
        }
    };
    info!(
        "Botwatch starting. channel={}, monitored={}, surface={:?}, port={}",
        config.channel_id,
        config.monitored.len(),
        config.surface,
        config.port
    );

    server::run_server(config, !args.no_liveness).await?;

    info!("Main finished. Goodbye!");
    Ok(())
}
