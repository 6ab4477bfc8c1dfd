//! Connection configuration and socket setup.

use crate::error::ClientError;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::{TcpSocket, TcpStream};

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server host name or address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// Time allowed for the whole response to arrive.
    pub read_timeout: Duration,
    /// Linger on close; `None` leaves the OS default.
    pub linger: Option<Duration>,
    /// Disable Nagle's algorithm.
    pub nodelay: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: bluepacket_protocol::DEFAULT_PORT,
            connect_timeout: Duration::from_secs(5),
            read_timeout: Duration::from_millis(1000),
            linger: Some(Duration::from_millis(500)),
            nodelay: true,
        }
    }
}

impl ClientConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    pub fn with_linger(mut self, linger: Option<Duration>) -> Self {
        self.linger = linger;
        self
    }

    pub fn with_nodelay(mut self, nodelay: bool) -> Self {
        self.nodelay = nodelay;
        self
    }
}

/// Resolves the configured host and connects within the connect timeout.
pub(crate) async fn connect(config: &ClientConfig) -> Result<TcpStream, ClientError> {
    let target = format!("{}:{}", config.host, config.port);

    tokio::time::timeout(config.connect_timeout, async {
        let addr = resolve(config).await?;
        tracing::debug!("Connecting to {} ({})", target, addr);

        let socket = if addr.is_ipv4() {
            TcpSocket::new_v4()?
        } else {
            TcpSocket::new_v6()?
        };
        socket.set_nodelay(config.nodelay)?;
        socket.set_linger(config.linger)?;
        Ok::<_, ClientError>(socket.connect(addr).await?)
    })
    .await
    .map_err(|_| {
        tracing::debug!("Connection to {} timed out", target);
        ClientError::ConnectTimeout(config.connect_timeout)
    })?
}

async fn resolve(config: &ClientConfig) -> Result<SocketAddr, ClientError> {
    tokio::net::lookup_host((config.host.as_str(), config.port))
        .await?
        .next()
        .ok_or_else(|| ClientError::Resolve(config.host.clone()))
}
