//! BluePacket RPC server.
//!
//! Serves one request/response exchange per TCP connection. Accepted
//! connections go onto a bounded job queue drained by a resizable
//! worker pool; each request is dispatched by its concrete packet type
//! and failures are offered to an optional error mapper.

pub mod config;
pub(crate) mod connection;
pub mod dispatch;
pub mod error;
pub(crate) mod pool;
pub mod server;

#[cfg(test)]
mod testing;

pub use config::{Config, ConfigError, NetworkConfig, PoolConfig};
pub use dispatch::Dispatcher;
pub use error::{HandlerError, ServerError};
pub use server::{Server, ServerBuilder, ServerConfig, ServerStats};
