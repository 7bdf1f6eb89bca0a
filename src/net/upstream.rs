//! TCP upstream resource.

use async_trait::async_trait;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::sync::Mutex;

use crate::boundary::{BoxError, Resource};

/// A TCP connection to a dependency that may not be up yet.
///
/// Init fails while the upstream refuses connections, which makes this a
/// natural fit for an auto-recovering boundary.
pub struct UpstreamResource {
    address: String,
    connect_timeout: Duration,
    stream: Mutex<Option<TcpStream>>,
}

impl UpstreamResource {
    pub fn new(address: impl Into<String>, connect_timeout: Duration) -> Self {
        Self {
            address: address.into(),
            connect_timeout,
            stream: Mutex::new(None),
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub async fn is_connected(&self) -> bool {
        self.stream.lock().await.is_some()
    }
}

#[async_trait]
impl Resource for UpstreamResource {
    async fn init_sequence(&self) -> Result<(), BoxError> {
        let stream = tokio::time::timeout(self.connect_timeout, TcpStream::connect(&self.address))
            .await
            .map_err(|_| format!("connect to {} timed out", self.address))??;
        tracing::info!(address = %self.address, "Upstream connected");
        *self.stream.lock().await = Some(stream);
        Ok(())
    }

    async fn close_sequence(&self) -> Result<(), BoxError> {
        if let Some(mut stream) = self.stream.lock().await.take() {
            stream.shutdown().await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_connects_and_disconnects() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let upstream = UpstreamResource::new(addr.to_string(), Duration::from_secs(1));

        upstream.init_sequence().await.unwrap();
        assert!(upstream.is_connected().await);

        upstream.close_sequence().await.unwrap();
        assert!(!upstream.is_connected().await);
    }

    #[tokio::test]
    async fn test_refused_connection_fails_init() {
        // Bind then drop to get a port nothing listens on.
        let addr = TcpListener::bind("127.0.0.1:0").await.unwrap().local_addr().unwrap();
        let upstream = UpstreamResource::new(addr.to_string(), Duration::from_secs(1));

        assert!(upstream.init_sequence().await.is_err());
        assert!(!upstream.is_connected().await);
    }
}
