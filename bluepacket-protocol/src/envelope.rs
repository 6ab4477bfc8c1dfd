//! Top-level packet envelope and a streaming decoder for it.
//!
//! ```text
//! +--------- 8 bytes ---------+-------- variable -------+
//! | big-endian int64 hash     | field body              |
//! +---------------------------+-------------------------+
//! ```
//!
//! There is no outer length prefix. A packet is self-delimiting once
//! the registry resolves its hash to a shape.

use crate::codec;
use crate::error::ProtocolError;
use crate::packet::{Packet, HASH_SIZE};
use crate::registry::PacketRegistry;
use crate::wire::{PacketReader, PacketWriter};
use crate::MAX_PACKET_SIZE;
use bytes::{Buf, Bytes, BytesMut};
use std::io::{Read, Write};
use std::sync::Arc;

/// Serializes a packet as hash header plus body.
pub fn serialize(packet: &dyn Packet) -> Result<Bytes, ProtocolError> {
    let mut writer = PacketWriter::with_capacity(64);
    write_envelope(&mut writer, packet)?;
    Ok(writer.freeze())
}

pub fn write_envelope(writer: &mut PacketWriter, packet: &dyn Packet) -> Result<(), ProtocolError> {
    codec::encode_reference(writer, Some(packet))
}

/// Deserializes one packet. A zero hash yields `Ok(None)`.
///
/// Bytes after the packet body are ignored.
pub fn deserialize(
    registry: &PacketRegistry,
    data: &[u8],
) -> Result<Option<Box<dyn Packet>>, ProtocolError> {
    read_envelope(registry, &mut PacketReader::new(data))
}

pub fn read_envelope(
    registry: &PacketRegistry,
    reader: &mut PacketReader<'_>,
) -> Result<Option<Box<dyn Packet>>, ProtocolError> {
    codec::decode_reference(registry, reader)
}

/// Writes one packet to a byte sink, e.g. a fixture file.
pub fn write_packet<W: Write>(sink: &mut W, packet: &dyn Packet) -> Result<(), ProtocolError> {
    let bytes = serialize(packet)?;
    sink.write_all(&bytes)?;
    sink.flush()?;
    Ok(())
}

/// Reads a source to its end and decodes the single packet it holds.
pub fn read_packet<R: Read>(
    source: &mut R,
    registry: &PacketRegistry,
) -> Result<Option<Box<dyn Packet>>, ProtocolError> {
    let mut data = Vec::new();
    source.read_to_end(&mut data)?;
    deserialize(registry, &data)
}

/// Incremental decoder for packets arriving in arbitrary chunks.
pub struct Decoder {
    registry: Arc<PacketRegistry>,
    buffer: BytesMut,
    max_packet_size: usize,
}

impl Decoder {
    pub fn new(registry: Arc<PacketRegistry>) -> Self {
        Self {
            registry,
            buffer: BytesMut::with_capacity(8192),
            max_packet_size: MAX_PACKET_SIZE,
        }
    }

    pub fn with_max_packet_size(mut self, max: usize) -> Self {
        self.max_packet_size = max;
        self
    }

    /// Appends data to the internal buffer.
    pub fn extend(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Attempts to decode the next packet from the buffer.
    ///
    /// Returns `Ok(Some(packet))` once a whole packet is buffered,
    /// `Ok(None)` if more data is needed, or `Err` on malformed input.
    /// A zero hash is an error here since a stream carries real packets.
    pub fn decode(&mut self) -> Result<Option<Box<dyn Packet>>, ProtocolError> {
        if self.buffer.len() < HASH_SIZE {
            return Ok(None);
        }

        let mut reader = PacketReader::new(&self.buffer);
        match read_envelope(&self.registry, &mut reader) {
            Ok(Some(packet)) => {
                let consumed = reader.position();
                self.buffer.advance(consumed);
                Ok(Some(packet))
            }
            Ok(None) => {
                self.buffer.advance(HASH_SIZE);
                Err(ProtocolError::NullPacket)
            }
            Err(e) if e.is_incomplete() => {
                if self.buffer.len() > self.max_packet_size {
                    return Err(ProtocolError::PacketTooLarge {
                        size: self.buffer.len(),
                        max: self.max_packet_size,
                    });
                }
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Returns the number of buffered bytes.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Clears the internal buffer.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}
