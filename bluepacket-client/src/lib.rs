//! # bluepacket-client
//!
//! Client library for BluePacket RPC.
//!
//! Every call opens a fresh TCP connection, writes one request packet,
//! half-closes, reads one response packet and closes.

pub mod client;
pub mod connection;
pub mod error;

#[cfg(test)]
mod testing;

pub use client::RpcClient;
pub use connection::ClientConfig;
pub use error::ClientError;
