//! The packet contract every generated entity implements.

use crate::error::ProtocolError;
use crate::registry::PacketRegistry;
use crate::render::FieldRenderer;
use crate::wire::{PacketReader, PacketWriter};
use std::any::Any;
use std::fmt;

/// Size of the hash header in bytes.
pub const HASH_SIZE: usize = 8;

/// 64-bit schema hash identifying a packet shape.
///
/// The zero hash is reserved for "no packet".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PacketHash(i64);

impl PacketHash {
    /// The reserved "no packet" hash.
    pub const NULL: PacketHash = PacketHash(0);

    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub const fn value(self) -> i64 {
        self.0
    }

    pub fn is_null(self) -> bool {
        self.0 == 0
    }

    pub fn to_be_bytes(self) -> [u8; HASH_SIZE] {
        self.0.to_be_bytes()
    }

    pub fn from_be_bytes(bytes: [u8; HASH_SIZE]) -> Self {
        Self(i64::from_be_bytes(bytes))
    }

    /// Uppercase, zero-padded hex rendering of the big-endian bytes.
    pub fn to_hex(self) -> String {
        hex::encode_upper(self.to_be_bytes())
    }

    /// Parses the output of [`PacketHash::to_hex`] (either case).
    pub fn from_hex(s: &str) -> Option<Self> {
        let bytes = hex::decode(s).ok()?;
        let bytes: [u8; HASH_SIZE] = bytes.try_into().ok()?;
        Some(Self::from_be_bytes(bytes))
    }
}

impl fmt::Display for PacketHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Capabilities of a serializable packet.
///
/// Implementations write and read their fields in field-name
/// lexicographic order using the helpers in [`crate::codec`]. Field
/// order on the wire is what the hash commits to, so declaration order
/// in the Rust struct does not matter.
pub trait Packet: Any + Send + Sync + fmt::Debug {
    /// Stable packet name from the schema.
    fn packet_name(&self) -> &'static str;

    /// Compile-time schema hash.
    fn packet_hash(&self) -> PacketHash;

    /// Writes the field body (no hash header).
    fn encode_body(&self, writer: &mut PacketWriter) -> Result<(), ProtocolError>;

    /// Reads the field body into `self`, resolving reference fields
    /// through `registry`.
    fn decode_body(
        &mut self,
        registry: &PacketRegistry,
        reader: &mut PacketReader<'_>,
    ) -> Result<(), ProtocolError>;

    /// Appends ` name=value` for every non-empty field.
    fn render_fields(&self, out: &mut FieldRenderer<'_>);

    fn clone_packet(&self) -> Box<dyn Packet>;

    fn as_any(&self) -> &dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    fn hash_hex(&self) -> String {
        self.packet_hash().to_hex()
    }
}

impl dyn Packet {
    /// Returns true if the concrete type is `P`.
    pub fn is<P: Packet>(&self) -> bool {
        self.as_any().is::<P>()
    }

    pub fn downcast_ref<P: Packet>(&self) -> Option<&P> {
        self.as_any().downcast_ref::<P>()
    }

    pub fn downcast<P: Packet>(self: Box<Self>) -> Option<Box<P>> {
        self.into_any().downcast::<P>().ok()
    }

    /// Encodes the field body into a fresh buffer.
    pub fn body_bytes(&self) -> Result<Vec<u8>, ProtocolError> {
        let mut writer = PacketWriter::new();
        self.encode_body(&mut writer)?;
        Ok(writer.into_inner().to_vec())
    }
}

impl PartialEq for dyn Packet {
    /// Packets are equal when they share a hash and encode to the same body.
    fn eq(&self, other: &Self) -> bool {
        if self.packet_hash() != other.packet_hash() {
            return false;
        }
        match (self.body_bytes(), other.body_bytes()) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }
}

impl Clone for Box<dyn Packet> {
    fn clone(&self) -> Self {
        self.clone_packet()
    }
}

impl fmt::Display for dyn Packet {
    /// Renders `{Name HASH field=value ...}`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut fields = String::new();
        self.render_fields(&mut FieldRenderer::new(&mut fields));
        write!(f, "{{{} {}{}}}", self.packet_name(), self.hash_hex(), fields)
    }
}
