//! Server error types.

use crate::config::ConfigError;
use bluepacket_protocol::{ErrorKind, ProtocolError};
use std::time::Duration;
use thiserror::Error;

/// Error returned by request handlers.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Server errors.
///
/// Everything that goes wrong while serving a connection is offered to
/// the error mapper, which may turn it into a response packet.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("request carried no packet")]
    NullRequest,

    #[error("connection closed before a full request arrived")]
    ConnectionClosed,

    #[error("timed out after {0:?} waiting for request")]
    Timeout(Duration),

    #[error("no handler registered for {packet}")]
    HandlerMissing { packet: &'static str },

    #[error("{0}")]
    HandlerFailed(HandlerError),

    #[error("handler panicked: {0}")]
    HandlerPanicked(String),

    #[error("server shutting down")]
    ShuttingDown,
}

impl ServerError {
    /// Returns the conceptual kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServerError::Io(_) | ServerError::ConnectionClosed | ServerError::ShuttingDown => {
                ErrorKind::Transport
            }
            ServerError::Protocol(e) => e.kind(),
            ServerError::Config(_) => ErrorKind::Config,
            ServerError::NullRequest => ErrorKind::DecodeInvalid,
            ServerError::Timeout(_) => ErrorKind::Timeout,
            ServerError::HandlerMissing { .. } => ErrorKind::HandlerMissing,
            ServerError::HandlerFailed(_) | ServerError::HandlerPanicked(_) => {
                ErrorKind::HandlerFailure
            }
        }
    }

    /// Returns true if the request was read and a handler was involved.
    pub fn is_handler_error(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::HandlerMissing | ErrorKind::HandlerFailure
        )
    }
}
