//! Client error types.

use bluepacket_protocol::{ErrorKind, ProtocolError};
use std::time::Duration;
use thiserror::Error;

/// Client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("could not resolve {0}")]
    Resolve(String),

    #[error("connect timed out after {0:?}")]
    ConnectTimeout(Duration),

    #[error("no response within {0:?}")]
    Timeout(Duration),

    #[error("connection closed before a response arrived")]
    ConnectionClosed,

    #[error("server answered with a null packet")]
    NullResponse,

    #[error("unexpected response: expected {expected}, got {actual}")]
    UnexpectedResponse {
        expected: &'static str,
        actual: &'static str,
    },
}

impl ClientError {
    /// Returns the conceptual kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Protocol(e) => e.kind(),
            ClientError::ConnectTimeout(_) | ClientError::Timeout(_) => ErrorKind::Timeout,
            ClientError::NullResponse | ClientError::UnexpectedResponse { .. } => {
                ErrorKind::DecodeInvalid
            }
            ClientError::Io(_) | ClientError::Resolve(_) | ClientError::ConnectionClosed => {
                ErrorKind::Transport
            }
        }
    }

    /// Returns whether this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ClientError::Io(_)
                | ClientError::ConnectTimeout(_)
                | ClientError::Timeout(_)
                | ClientError::ConnectionClosed
        )
    }
}
