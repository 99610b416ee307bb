//! Property data proxy (v1)
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────┐
//!                        │                 HOMES PROXY                   │
//!                        │                                               │
//!     Client Request     │  ┌──────────┐    ┌──────────┐    ┌─────────┐ │
//!     ───────────────────┼─▶│  server  │───▶│ handlers │───▶│upstream │─┼──▶ Upstream
//!                        │  │ + layers │    │ (params) │    │ client  │ │    API
//!                        │  └──────────┘    └──────────┘    └────┬────┘ │
//!                        │                                       │      │
//!     Client Response    │  ┌──────────┐    ┌──────────┐         │      │
//!     ◀──────────────────┼──│  JSON /  │◀───│ Lookup / │◀────────┘      │
//!                        │  │  status  │    │ extract  │                │
//!                        │  └──────────┘    └──────────┘                │
//!                        │                                               │
//!                        │   config · observability · lifecycle          │
//!                        └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use homes_proxy::lifecycle::startup::{self, Overrides};
use homes_proxy::lifecycle::Shutdown;
use homes_proxy::observability::logging;

#[derive(Parser)]
#[command(name = "homes-proxy")]
#[command(about = "JSON proxy for a real-estate data API", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long, env = "HOMES_PROXY_CONFIG")]
    config: Option<PathBuf>,

    /// Listener address, overriding the config file.
    #[arg(short, long, env = "HOMES_PROXY_BIND")]
    bind: Option<String>,

    /// Upstream base URL, overriding the config file.
    #[arg(long, env = "HOMES_PROXY_UPSTREAM_URL")]
    upstream_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = startup::prepare_config(
        args.config.as_deref(),
        Overrides {
            bind_address: args.bind,
            upstream_base_url: args.upstream_url,
        },
    )?;

    logging::init_logging(&config.observability);
    tracing::info!("homes-proxy v{} starting", env!("CARGO_PKG_VERSION"));

    let shutdown = Shutdown::new();
    startup::run(config, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
