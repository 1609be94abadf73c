//! Standalone schema endpoint for the KCP metrics layer
//!
//! Serves the full metric schema, zero-valued, so dashboards and alert rules can
//! be built and checked before an engine is attached. Nothing in this process
//! produces values: a protocol engine embeds the library instead, calls
//! [`kcp_metrics::install`] and hands the returned handle to its sessions.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing::info;

use kcp_metrics::config::{MetricsConfig, apply_env_overrides, load_config};
use kcp_metrics::runtime::{RuntimeConfig, shutdown_signal};
use kcp_metrics::{MetricsRegistry, logging, server};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path (built-in defaults when omitted)
    #[arg(short, long, env = "KCP_METRICS_CONFIG")]
    config: Option<String>,

    /// Host to bind to (overrides config file)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides config file)
    #[arg(short, long)]
    port: Option<u16>,

    /// Metric name prefix (overrides config file)
    #[arg(long)]
    prefix: Option<String>,

    /// Number of worker threads (default: 1, use 0 for CPU cores)
    #[arg(short, long)]
    threads: Option<usize>,

    /// Also write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Args {
    fn resolve_config(&self) -> Result<MetricsConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => {
                let mut config = MetricsConfig::default();
                apply_env_overrides(&mut config);
                config
            }
        };

        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(prefix) = &self.prefix {
            config.name_prefix = prefix.clone();
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = logging::init_logging(args.log_file.as_deref());

    let config = args.resolve_config()?;
    let rt = RuntimeConfig::from_args(args.threads).build_runtime()?;
    rt.block_on(run(config))
}

async fn run(config: MetricsConfig) -> Result<()> {
    let registry = MetricsRegistry::new();
    // No producer runs in this process; the handle only backs the exporter
    let _metrics = kcp_metrics::install(&registry, &config)
        .context("Failed to install KCP metrics exporter")?;
    info!("Serving zero-valued schema; embed the library to attach a KCP engine");

    let listen_addr = config.server.listen_addr();
    let listener = TcpListener::bind(&listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", listen_addr))?;

    server::serve(listener, registry, &config.server.path, shutdown_signal()).await?;

    info!("Metrics endpoint stopped");
    Ok(())
}
