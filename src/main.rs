//! Service Host
//!
//! Boots the application: loads configuration, installs logging and metrics,
//! mounts the routers, and runs the startup/shutdown lifecycle around the
//! HTTP server.
//!
//! ```text
//!   config file ─┐
//!   CLI flags ───┴─▶ HostConfig ─▶ Application::builder ─▶ Registry (construct once)
//!                                                              │
//!                     startup notification ◀──────────────────┘
//!                            │
//!                            ▼
//!   Client ◀──────▶ HttpServer (request id, trace, limits) ─▶ mounted routers
//!                            │
//!                  SIGINT/SIGTERM → drain → shutdown notification → exit
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

use service_host::config::{load_config, validate_config, ConfigError, HostConfig};
use service_host::observability::{logging, metrics};
use service_host::{net, routing, Application};

#[derive(Parser)]
#[command(name = "service-host")]
#[command(about = "Runs the service host API", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long, env = "SERVICE_HOST_CONFIG")]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,

    /// Override `app.title`.
    #[arg(short, long)]
    title: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => HostConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }
    if let Some(title) = args.title {
        config.app.title = title;
    }
    validate_config(&config).map_err(ConfigError::Validation)?;

    logging::init_logging(&config.observability)?;

    tracing::info!(
        bind_address = %config.listener.bind_address,
        max_concurrent_requests = config.listener.max_concurrent_requests,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        // Address already checked by validate_config.
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let app = Application::builder(config.app.title.clone())
        .config(config.clone())
        .include_router(routing::echo::router())
        .build()?;

    let listener = net::bind(&config.listener).await?;
    app.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
