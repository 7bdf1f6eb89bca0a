//! TCP listener resource with backpressure.
//!
//! # Responsibilities
//! - Bind to the configured address on init
//! - Accept connections and answer each with a status line
//! - Enforce a concurrent connection limit via semaphore
//! - Stop accepting and release the socket on close

use async_trait::async_trait;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinHandle;

use crate::boundary::{BoxError, Resource};

/// Error type for listener operations.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// Failed to bind to address.
    #[error("Failed to bind: {0}")]
    Bind(std::io::Error),
    /// Failed to accept connection.
    #[error("Failed to accept: {0}")]
    Accept(std::io::Error),
    /// Connection limiter was shut down.
    #[error("Listener is shutting down")]
    Closed,
}

/// A bounded TCP listener that limits concurrent connections.
pub struct Listener {
    inner: TcpListener,
    connection_limit: Arc<Semaphore>,
}

impl Listener {
    /// Bind to `address` allowing at most `max_connections` concurrent connections.
    pub async fn bind(address: &str, max_connections: usize) -> Result<Self, ListenerError> {
        let addr: SocketAddr = address.parse().map_err(|e| {
            ListenerError::Bind(std::io::Error::new(std::io::ErrorKind::InvalidInput, e))
        })?;

        let inner = TcpListener::bind(addr).await.map_err(ListenerError::Bind)?;
        let local_addr = inner.local_addr().map_err(ListenerError::Bind)?;

        tracing::info!(
            address = %local_addr,
            max_connections,
            "Listener bound"
        );

        Ok(Self {
            inner,
            connection_limit: Arc::new(Semaphore::new(max_connections)),
        })
    }

    /// Accept a new connection, waiting while the connection limit is reached.
    ///
    /// The returned permit must be held for the connection's lifetime.
    pub async fn accept(&self) -> Result<(TcpStream, SocketAddr, OwnedSemaphorePermit), ListenerError> {
        let permit = self
            .connection_limit
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| ListenerError::Closed)?;

        let (stream, addr) = self.inner.accept().await.map_err(ListenerError::Accept)?;

        tracing::debug!(
            peer_addr = %addr,
            available_permits = self.connection_limit.available_permits(),
            "Connection accepted"
        );

        Ok((stream, addr, permit))
    }

    pub fn local_addr(&self) -> Result<SocketAddr, std::io::Error> {
        self.inner.local_addr()
    }
}

/// Write `response` and close the write half.
async fn respond(stream: &mut TcpStream, response: &str) -> std::io::Result<()> {
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await
}

/// Listener exposed as a boundary resource.
///
/// Every accepted connection receives `response` and is closed.
pub struct ListenerResource {
    address: String,
    max_connections: usize,
    response: &'static str,
    running: Mutex<Option<Running>>,
}

struct Running {
    local_addr: SocketAddr,
    accept_loop: JoinHandle<()>,
}

impl ListenerResource {
    pub fn new(address: impl Into<String>, max_connections: usize) -> Self {
        Self {
            address: address.into(),
            max_connections,
            response: "ok\n",
            running: Mutex::new(None),
        }
    }

    /// Address actually bound, once initialized.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.running
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|running| running.local_addr)
    }

    async fn accept_loop(listener: Listener, response: &'static str) {
        loop {
            match listener.accept().await {
                Ok((mut stream, _, permit)) => {
                    tokio::spawn(async move {
                        let _permit = permit;
                        if let Err(error) = respond(&mut stream, response).await {
                            tracing::debug!(error = %error, "Failed to answer connection");
                        }
                    });
                }
                Err(ListenerError::Accept(error)) => {
                    tracing::warn!(error = %error, "Accept failed");
                }
                Err(error) => {
                    tracing::error!(error = %error, "Accept loop exiting");
                    break;
                }
            }
        }
    }
}

#[async_trait]
impl Resource for ListenerResource {
    async fn init_sequence(&self) -> Result<(), BoxError> {
        let listener = Listener::bind(&self.address, self.max_connections).await?;
        let local_addr = listener.local_addr()?;
        let accept_loop = tokio::spawn(Self::accept_loop(listener, self.response));

        *self.running.lock().unwrap_or_else(PoisonError::into_inner) = Some(Running {
            local_addr,
            accept_loop,
        });
        Ok(())
    }

    async fn close_sequence(&self) -> Result<(), BoxError> {
        let running = self.running.lock().unwrap_or_else(PoisonError::into_inner).take();
        if let Some(running) = running {
            running.accept_loop.abort();
            // Wait for the task to drop the socket before reporting closed.
            let _ = running.accept_loop.await;
            tracing::info!(address = %running.local_addr, "Listener released");
        }
        Ok(())
    }
}
