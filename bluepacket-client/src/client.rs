//! RPC client API.

use crate::connection::{self, ClientConfig};
use crate::error::ClientError;
use bluepacket_protocol::{envelope, Decoder, Packet, PacketRegistry, ProtocolError};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

/// Read buffer size for response chunks.
const READ_BUFFER_SIZE: usize = 8 * 1024;

/// Client for a BluePacket RPC server.
///
/// Holds no connection between calls; the registry decides which
/// response packets can be decoded.
#[derive(Debug, Clone)]
pub struct RpcClient {
    config: ClientConfig,
    registry: Arc<PacketRegistry>,
}

impl RpcClient {
    pub fn new(config: ClientConfig, registry: Arc<PacketRegistry>) -> Self {
        Self { config, registry }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<PacketRegistry> {
        &self.registry
    }

    /// Sends one request and returns the server's response.
    ///
    /// A response whose hash the registry does not know fails with a
    /// protocol error. A peer that does not take the request, or sends no
    /// response, within the read timeout fails with
    /// [`ClientError::Timeout`]; each phase gets its own timeout.
    pub async fn send(&self, request: &dyn Packet) -> Result<Box<dyn Packet>, ClientError> {
        let bytes = envelope::serialize(request)?;
        let mut stream = connection::connect(&self.config).await?;

        let read_timeout = self.config.read_timeout;
        tokio::time::timeout(read_timeout, async {
            stream.write_all(&bytes).await?;
            stream.shutdown().await?;
            Ok::<_, ClientError>(())
        })
        .await
        .map_err(|_| {
            tracing::debug!("Request not accepted within {:?}", read_timeout);
            ClientError::Timeout(read_timeout)
        })??;
        tracing::debug!("Sent {} ({} bytes)", request.packet_name(), bytes.len());

        let response = tokio::time::timeout(read_timeout, self.read_response(&mut stream))
            .await
            .map_err(|_| {
                tracing::debug!("No response within {:?}", read_timeout);
                ClientError::Timeout(read_timeout)
            })??;

        tracing::debug!("Received {}", response.packet_name());
        Ok(response)
    }

    /// Sends a request and downcasts the response to `R`.
    pub async fn call<R: Packet>(&self, request: &dyn Packet) -> Result<R, ClientError> {
        let response = self.send(request).await?;
        let actual = response.packet_name();
        match response.downcast::<R>() {
            Some(response) => Ok(*response),
            None => Err(ClientError::UnexpectedResponse {
                expected: std::any::type_name::<R>()
                    .rsplit("::")
                    .next()
                    .unwrap_or("packet"),
                actual,
            }),
        }
    }

    async fn read_response(&self, stream: &mut TcpStream) -> Result<Box<dyn Packet>, ClientError> {
        let mut decoder = Decoder::new(self.registry.clone());
        let mut buf = vec![0u8; READ_BUFFER_SIZE];

        loop {
            let n = stream.read(&mut buf).await?;
            if n == 0 {
                tracing::debug!("Connection closed with {} bytes buffered", decoder.buffered());
                return Err(ClientError::ConnectionClosed);
            }
            decoder.extend(&buf[..n]);

            match decoder.decode() {
                Ok(Some(packet)) => return Ok(packet),
                Ok(None) => continue,
                Err(ProtocolError::NullPacket) => return Err(ClientError::NullResponse),
                Err(e) => return Err(e.into()),
            }
        }
    }
}
