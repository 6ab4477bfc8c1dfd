//! One request/response exchange on an accepted connection.

use crate::dispatch::Dispatcher;
use crate::error::ServerError;
use crate::server::ServerStats;
use bluepacket_protocol::{envelope, Decoder, Packet, PacketRegistry, ProtocolError};
use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

/// Reads one request, dispatches it, writes one response, closes.
pub(crate) struct ConnectionHandler {
    registry: Arc<PacketRegistry>,
    dispatcher: Arc<Dispatcher>,
    stats: Arc<ServerStats>,
    read_timeout: Duration,
}

impl ConnectionHandler {
    pub(crate) fn new(
        registry: Arc<PacketRegistry>,
        dispatcher: Arc<Dispatcher>,
        stats: Arc<ServerStats>,
        read_timeout: Duration,
    ) -> Self {
        Self {
            registry,
            dispatcher,
            stats,
            read_timeout,
        }
    }

    /// Serves a connection to completion. Errors never escape: they go
    /// to the error mapper, and the connection is closed regardless.
    pub(crate) async fn handle(&self, mut stream: TcpStream, addr: SocketAddr) {
        tracing::debug!("[{}] Handling connection", addr);

        let response = match self.exchange(&mut stream, addr).await {
            Ok(response) => Some(response),
            Err(e) => {
                self.stats.errors_total.fetch_add(1, Ordering::Relaxed);
                tracing::debug!("[{}] Request failed: {}", addr, e);
                let mapped = self.dispatcher.map_error(&e);
                if mapped.is_none() {
                    tracing::error!("[{}] Unanswered error ({}): {}", addr, e.kind(), e);
                }
                mapped
            }
        };

        if let Some(response) = response {
            tracing::debug!("[{}] Response: {}", addr, response);
            if let Err(e) = Self::respond(&mut stream, response.as_ref()).await {
                tracing::warn!("[{}] Failed to send response: {}", addr, e);
            }
        }

        if let Err(e) = stream.shutdown().await {
            tracing::debug!("[{}] Shutdown error: {}", addr, e);
        }
    }

    async fn exchange(
        &self,
        stream: &mut TcpStream,
        addr: SocketAddr,
    ) -> Result<Box<dyn Packet>, ServerError> {
        let request = tokio::time::timeout(self.read_timeout, self.read_request(stream, addr))
            .await
            .map_err(|_| ServerError::Timeout(self.read_timeout))??;

        self.stats.requests_total.fetch_add(1, Ordering::Relaxed);
        tracing::debug!("[{}] Request: {}", addr, request);

        self.dispatcher.dispatch(request)
    }

    async fn read_request(
        &self,
        stream: &mut TcpStream,
        addr: SocketAddr,
    ) -> Result<Box<dyn Packet>, ServerError> {
        let mut decoder = Decoder::new(self.registry.clone());
        let mut buf = [0u8; 8192];

        loop {
            match decoder.decode() {
                Ok(Some(packet)) => return Ok(packet),
                Ok(None) => {}
                Err(ProtocolError::NullPacket) => return Err(ServerError::NullRequest),
                Err(e) => return Err(e.into()),
            }

            let n = stream.read(&mut buf).await?;
            if n == 0 {
                tracing::debug!(
                    "[{}] Connection closed with {} bytes buffered",
                    addr,
                    decoder.buffered()
                );
                return Err(ServerError::ConnectionClosed);
            }
            tracing::debug!("[{}] Received {} bytes", addr, n);
            decoder.extend(&buf[..n]);
        }
    }

    async fn respond(stream: &mut TcpStream, response: &dyn Packet) -> Result<(), ServerError> {
        let bytes = envelope::serialize(response)?;
        stream.write_all(&bytes).await?;
        stream.flush().await?;
        Ok(())
    }
}
