//! # bluepacket-calc
//!
//! Calculator service over BluePacket RPC: the request and response
//! packets, the server-side handlers and error mapper, and a typed
//! client.

pub mod client;
pub mod error;
pub mod packets;
pub mod service;

pub use client::CalcClient;
pub use error::CalcError;
pub use packets::{registry, CalcMean, CalcMeanType, CalcSum, RpcError, RpcResult};
