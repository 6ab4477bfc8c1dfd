//! Protocol error types and error kinds.

use crate::packet::PacketHash;
use std::fmt;
use thiserror::Error;

/// Errors raised while encoding, decoding or registering packets.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("unexpected end of input: need {needed} bytes, {remaining} remaining")]
    Short { needed: usize, remaining: usize },

    #[error("unknown packet hash {0}")]
    UnknownHash(PacketHash),

    #[error("invalid ordinal {ordinal} for enum {name} ({members} members)")]
    BadEnum {
        name: &'static str,
        ordinal: u16,
        members: usize,
    },

    #[error("invalid sequence length: {0}")]
    InvalidLength(i32),

    #[error("sequence too long to encode: {0} elements")]
    LengthOverflow(usize),

    #[error("invalid UTF-8 in string field")]
    InvalidUtf8,

    #[error("duplicate packet hash {hash}: {existing} already registered, cannot add {incoming}")]
    DuplicateHash {
        hash: PacketHash,
        existing: &'static str,
        incoming: &'static str,
    },

    #[error("null packet where a packet is required")]
    NullPacket,

    #[error("packet too large: {size} bytes buffered (max {max})")]
    PacketTooLarge { size: usize, max: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProtocolError {
    /// Returns the conceptual kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProtocolError::Short { .. } => ErrorKind::DecodeShort,
            ProtocolError::UnknownHash(_) => ErrorKind::DecodeUnknownHash,
            ProtocolError::BadEnum { .. } => ErrorKind::DecodeBadEnum,
            ProtocolError::InvalidLength(_)
            | ProtocolError::InvalidUtf8
            | ProtocolError::NullPacket
            | ProtocolError::PacketTooLarge { .. } => ErrorKind::DecodeInvalid,
            ProtocolError::LengthOverflow(_) | ProtocolError::Io(_) => ErrorKind::EncodeIo,
            ProtocolError::DuplicateHash { .. } => ErrorKind::DuplicateHash,
        }
    }

    /// Returns true when the input ended early and more bytes may complete it.
    pub fn is_incomplete(&self) -> bool {
        matches!(self, ProtocolError::Short { .. })
    }
}

/// Stable error kinds shared by the codec, client and server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    // Codec
    DecodeShort,
    DecodeUnknownHash,
    DecodeBadEnum,
    DecodeInvalid,
    EncodeIo,
    DuplicateHash,

    // RPC
    HandlerMissing,
    HandlerFailure,
    Timeout,
    Transport,
    Config,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::DecodeShort => write!(f, "DECODE_SHORT"),
            ErrorKind::DecodeUnknownHash => write!(f, "DECODE_UNKNOWN_HASH"),
            ErrorKind::DecodeBadEnum => write!(f, "DECODE_BAD_ENUM"),
            ErrorKind::DecodeInvalid => write!(f, "DECODE_INVALID"),
            ErrorKind::EncodeIo => write!(f, "ENCODE_IO"),
            ErrorKind::DuplicateHash => write!(f, "DUPLICATE_HASH"),
            ErrorKind::HandlerMissing => write!(f, "HANDLER_MISSING"),
            ErrorKind::HandlerFailure => write!(f, "HANDLER_FAILURE"),
            ErrorKind::Timeout => write!(f, "TIMEOUT"),
            ErrorKind::Transport => write!(f, "TRANSPORT"),
            ErrorKind::Config => write!(f, "CONFIG"),
        }
    }
}
