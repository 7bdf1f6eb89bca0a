//! basement demo binary.
//!
//! Opens an upstream TCP connection (retried until the upstream accepts) and
//! then a listener answering `ok`, and tears both down in reverse order on
//! SIGTERM/SIGINT/SIGHUP.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use basement::config::load_settings;
use basement::lifecycle::process;
use basement::net::{ListenerResource, UpstreamResource};
use basement::observability::{init_logging, metrics};
use basement::{
    AutoRecoveringBoundary, Boundaries, Boundary, Orchestrator, RunMode, StagedSequence,
};

const DEFAULT_LISTEN_ADDRESS: &str = "127.0.0.1:7070";
const DEFAULT_UPSTREAM_ADDRESS: &str = "127.0.0.1:5432";

#[derive(Parser)]
#[command(name = "basement")]
#[command(about = "Run boundaries with ordered startup and deadline-bound shutdown", long_about = None)]
struct Cli {
    /// Settings file (TOML).
    #[arg(short, long, default_value = "basement.toml")]
    config: PathBuf,

    /// Return failures instead of exiting; stop on Ctrl+C without signal handlers.
    #[arg(long)]
    diagnostic: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut settings = load_settings(&cli.config)?;
    if cli.diagnostic {
        settings.mode = RunMode::Diagnostic;
    }

    init_logging(&settings.logging)?;
    tracing::info!(
        name = env!("CARGO_PKG_NAME"),
        version = env!("CARGO_PKG_VERSION"),
        config = %cli.config.display(),
        mode = ?settings.mode,
        "basement starting"
    );

    if settings.observability.metrics_enabled {
        match settings.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics exporter");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %settings.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listen_address = settings
        .extra_str("listen_address")
        .unwrap_or(DEFAULT_LISTEN_ADDRESS)
        .to_string();
    let upstream_address = settings
        .extra_str("upstream_address")
        .unwrap_or(DEFAULT_UPSTREAM_ADDRESS)
        .to_string();

    let upstream = AutoRecoveringBoundary::from_settings(
        "upstream",
        UpstreamResource::new(upstream_address, Duration::from_secs(2)),
        settings.boundary("upstream"),
    );
    let listener = Boundary::new("listener", ListenerResource::new(listen_address, 1024));

    let boundaries = Boundaries::new()
        .with("upstream", upstream)
        .with("listener", listener);
    let sequence = StagedSequence::new().then("upstream").then("listener");

    let orchestrator = Orchestrator::new(settings, boundaries, sequence, None)?;
    orchestrator.start().await?;

    if orchestrator.mode().is_diagnostic() {
        tokio::signal::ctrl_c().await?;
        orchestrator.stop().await?;
    } else {
        orchestrator.wait_stopped().await;
    }

    process::terminate(&**orchestrator.logger(), 0)
}
