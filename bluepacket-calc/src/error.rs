//! Calculator client errors.

use bluepacket_client::ClientError;
use bluepacket_protocol::{ErrorKind, ProtocolError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CalcError {
    /// The server answered with an `RpcError`.
    #[error("server error: {0}")]
    Rpc(String),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error("unexpected response packet {0}")]
    UnexpectedResponse(&'static str),
}

impl CalcError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CalcError::Rpc(_) => ErrorKind::HandlerFailure,
            CalcError::Client(e) => e.kind(),
            CalcError::Protocol(e) => e.kind(),
            CalcError::UnexpectedResponse(_) => ErrorKind::DecodeInvalid,
        }
    }
}
