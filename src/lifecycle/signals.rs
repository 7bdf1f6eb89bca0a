//! OS signal handling.
//!
//! # Responsibilities
//! - Register signal handlers (SIGTERM, SIGINT, SIGHUP, SIGUSR1)
//! - Translate termination signals into `Orchestrator::stop`
//! - Log the debug signal without acting on it
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - Each termination signal spawns a stop; the shutdown guard makes repeats no-ops
//! - The listener exits once shutdown has completed

use std::io;
use tokio::task::JoinHandle;

use crate::lifecycle::orchestrator::Orchestrator;
use crate::lifecycle::sequence::Application;

/// Install signal handlers and spawn the listener task.
///
/// Registration happens before this returns, so signals delivered after the
/// call are never lost.
#[cfg(unix)]
pub fn spawn_signal_listener<A: Application>(
    orchestrator: Orchestrator<A>,
) -> io::Result<JoinHandle<()>> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sighup = signal(SignalKind::hangup())?;
    let mut sigusr1 = signal(SignalKind::user_defined1())?;

    Ok(tokio::spawn(async move {
        loop {
            let name = tokio::select! {
                _ = sigterm.recv() => "SIGTERM",
                _ = sigint.recv() => "SIGINT",
                _ = sighup.recv() => "SIGHUP",
                _ = sigusr1.recv() => {
                    orchestrator.logger().info("Received debug signal SIGUSR1");
                    continue;
                }
                _ = orchestrator.wait_stopped() => break,
            };
            request_stop(&orchestrator, name);
        }
    }))
}

/// Install the Ctrl+C handler and spawn the listener task.
#[cfg(not(unix))]
pub fn spawn_signal_listener<A: Application>(
    orchestrator: Orchestrator<A>,
) -> io::Result<JoinHandle<()>> {
    Ok(tokio::spawn(async move {
        loop {
            tokio::select! {
                result = tokio::signal::ctrl_c() => {
                    if let Err(error) = result {
                        orchestrator.logger().error(&format!("Failed to listen for Ctrl+C: {error}"));
                        break;
                    }
                    request_stop(&orchestrator, "Ctrl+C");
                }
                _ = orchestrator.wait_stopped() => break,
            }
        }
    }))
}

fn request_stop<A: Application>(orchestrator: &Orchestrator<A>, signal: &str) {
    orchestrator
        .logger()
        .info(&format!("Received {signal}, initiating shutdown"));
    let orchestrator = orchestrator.clone();
    tokio::spawn(async move {
        if let Err(error) = orchestrator.stop().await {
            tracing::error!(error = %error, "Signal-triggered shutdown failed");
        }
    });
}
