//! # bluepacket-protocol
//!
//! Wire codec for BluePacket, a compact schema-versioned binary format.
//!
//! This crate provides:
//! - Big-endian wire primitives and the two-form length prefix
//! - Field-level codec helpers used by generated packet types
//! - The [`Packet`] contract, schema hashing and the packet registry
//! - The top-level envelope (8-byte hash + body) and a streaming decoder

#[macro_use]
mod macros;

pub mod codec;
pub mod envelope;
pub mod error;
pub mod packet;
pub mod registry;
pub mod render;
pub mod schema;
pub mod wire;

#[cfg(test)]
pub(crate) mod testing;

pub use codec::{WireEnum, WireValue};
pub use envelope::{deserialize, serialize, Decoder};
pub use error::{ErrorKind, ProtocolError};
pub use packet::{Packet, PacketHash, HASH_SIZE};
pub use registry::PacketRegistry;
pub use render::FieldRenderer;
pub use schema::{EnumSchema, FieldType, PacketSchema};
pub use wire::{PacketReader, PacketWriter};

/// Default port for BluePacket RPC servers.
pub const DEFAULT_PORT: u16 = 5900;

/// Largest packet the streaming decoder will buffer (16 MiB).
pub const MAX_PACKET_SIZE: usize = 16 * 1024 * 1024;
