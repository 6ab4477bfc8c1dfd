//! Field-level encode/decode helpers called by generated packets.
//!
//! Every element kind has a single-field pair and an array pair. Arrays
//! are a length prefix followed by the per-element encodings, except
//! bool arrays which pack eight elements per byte, LSB first.

use crate::error::ProtocolError;
use crate::packet::{Packet, PacketHash};
use crate::registry::PacketRegistry;
use crate::wire::{PacketReader, PacketWriter};

/// Enums with more members than this encode ordinals in two bytes.
pub const SMALL_ENUM_LIMIT: usize = 255;

/// A scalar or string with a fixed wire form.
///
/// `bool` is deliberately absent: single booleans and bool arrays have
/// their own helpers because arrays are bit-packed.
pub trait WireValue: Sized {
    fn write_to(&self, writer: &mut PacketWriter) -> Result<(), ProtocolError>;
    fn read_from(reader: &mut PacketReader<'_>) -> Result<Self, ProtocolError>;
}

macro_rules! wire_scalar {
    ($($ty:ty => $put:ident, $get:ident;)+) => {
        $(
            impl WireValue for $ty {
                fn write_to(&self, writer: &mut PacketWriter) -> Result<(), ProtocolError> {
                    writer.$put(*self);
                    Ok(())
                }

                fn read_from(reader: &mut PacketReader<'_>) -> Result<Self, ProtocolError> {
                    reader.$get()
                }
            }
        )+
    };
}

wire_scalar! {
    i8 => put_i8, get_i8;
    u8 => put_u8, get_u8;
    i16 => put_i16, get_i16;
    u16 => put_u16, get_u16;
    i32 => put_i32, get_i32;
    i64 => put_i64, get_i64;
    f32 => put_f32, get_f32;
    f64 => put_f64, get_f64;
}

impl WireValue for String {
    fn write_to(&self, writer: &mut PacketWriter) -> Result<(), ProtocolError> {
        writer.put_str(self)
    }

    fn read_from(reader: &mut PacketReader<'_>) -> Result<Self, ProtocolError> {
        reader.get_string()
    }
}

/// An enumeration with ordinals `0..MEMBER_COUNT`.
pub trait WireEnum: Sized + Copy {
    const NAME: &'static str;
    const MEMBER_COUNT: usize;

    fn ordinal(self) -> u16;
    fn from_ordinal(ordinal: u16) -> Option<Self>;
}

/// Returns true when `E` needs two-byte ordinals.
pub fn is_large_enum<E: WireEnum>() -> bool {
    E::MEMBER_COUNT > SMALL_ENUM_LIMIT
}

/// Widens a signed byte the way unsigned schema fields present it.
pub fn unsigned_byte(value: i8) -> i32 {
    value as i32 & 0xFF
}

/// Widens a signed short the way unsigned schema fields present it.
pub fn unsigned_short(value: i16) -> i32 {
    value as i32 & 0xFFFF
}

/// Caps a preallocation by what the input could possibly hold.
fn capacity_hint(len: usize, reader: &PacketReader<'_>) -> usize {
    len.min(reader.remaining())
}

// ============================================================================
// Scalars and strings
// ============================================================================

pub fn encode_field<T: WireValue>(writer: &mut PacketWriter, value: &T) -> Result<(), ProtocolError> {
    value.write_to(writer)
}

pub fn decode_field<T: WireValue>(reader: &mut PacketReader<'_>) -> Result<T, ProtocolError> {
    T::read_from(reader)
}

pub fn encode_array<T: WireValue>(
    writer: &mut PacketWriter,
    values: &[T],
) -> Result<(), ProtocolError> {
    writer.put_length(values.len())?;
    for value in values {
        value.write_to(writer)?;
    }
    Ok(())
}

pub fn decode_array<T: WireValue>(reader: &mut PacketReader<'_>) -> Result<Vec<T>, ProtocolError> {
    let len = reader.get_length()?;
    let mut values = Vec::with_capacity(capacity_hint(len, reader));
    for _ in 0..len {
        values.push(T::read_from(reader)?);
    }
    Ok(values)
}

// ============================================================================
// Booleans
// ============================================================================

pub fn encode_bool(writer: &mut PacketWriter, value: bool) {
    writer.put_bool(value);
}

pub fn decode_bool(reader: &mut PacketReader<'_>) -> Result<bool, ProtocolError> {
    reader.get_bool()
}

/// Writes a length prefix and `ceil(len / 8)` packed bytes.
pub fn encode_bool_array(writer: &mut PacketWriter, values: &[bool]) -> Result<(), ProtocolError> {
    writer.put_length(values.len())?;
    for chunk in values.chunks(8) {
        let byte = chunk
            .iter()
            .enumerate()
            .fold(0u8, |acc, (bit, set)| if *set { acc | (1 << bit) } else { acc });
        writer.put_u8(byte);
    }
    Ok(())
}

pub fn decode_bool_array(reader: &mut PacketReader<'_>) -> Result<Vec<bool>, ProtocolError> {
    let len = reader.get_length()?;
    let packed = reader.get_slice((len + 7) / 8)?;
    Ok((0..len)
        .map(|i| packed[i / 8] & (1 << (i % 8)) != 0)
        .collect())
}

// ============================================================================
// Enumerations
// ============================================================================

pub fn encode_enum<E: WireEnum>(writer: &mut PacketWriter, value: E) {
    if is_large_enum::<E>() {
        writer.put_u16(value.ordinal());
    } else {
        writer.put_u8(value.ordinal() as u8);
    }
}

pub fn decode_enum<E: WireEnum>(reader: &mut PacketReader<'_>) -> Result<E, ProtocolError> {
    let ordinal = if is_large_enum::<E>() {
        reader.get_u16()?
    } else {
        reader.get_u8()? as u16
    };
    E::from_ordinal(ordinal).ok_or(ProtocolError::BadEnum {
        name: E::NAME,
        ordinal,
        members: E::MEMBER_COUNT,
    })
}

pub fn encode_enum_array<E: WireEnum>(
    writer: &mut PacketWriter,
    values: &[E],
) -> Result<(), ProtocolError> {
    writer.put_length(values.len())?;
    for value in values {
        encode_enum(writer, *value);
    }
    Ok(())
}

pub fn decode_enum_array<E: WireEnum>(
    reader: &mut PacketReader<'_>,
) -> Result<Vec<E>, ProtocolError> {
    let len = reader.get_length()?;
    let mut values = Vec::with_capacity(capacity_hint(len, reader));
    for _ in 0..len {
        values.push(decode_enum(reader)?);
    }
    Ok(values)
}

// ============================================================================
// Embedded packets (body only, type known from the outer schema)
// ============================================================================

pub fn encode_embedded<P: Packet>(writer: &mut PacketWriter, value: &P) -> Result<(), ProtocolError> {
    value.encode_body(writer)
}

pub fn decode_embedded<P: Packet + Default>(
    registry: &PacketRegistry,
    reader: &mut PacketReader<'_>,
) -> Result<P, ProtocolError> {
    let mut value = P::default();
    value.decode_body(registry, reader)?;
    Ok(value)
}

pub fn encode_embedded_array<P: Packet>(
    writer: &mut PacketWriter,
    values: &[P],
) -> Result<(), ProtocolError> {
    writer.put_length(values.len())?;
    for value in values {
        value.encode_body(writer)?;
    }
    Ok(())
}

pub fn decode_embedded_array<P: Packet + Default>(
    registry: &PacketRegistry,
    reader: &mut PacketReader<'_>,
) -> Result<Vec<P>, ProtocolError> {
    let len = reader.get_length()?;
    let mut values = Vec::with_capacity(capacity_hint(len, reader));
    for _ in 0..len {
        values.push(decode_embedded(registry, reader)?);
    }
    Ok(values)
}

// ============================================================================
// Reference packets (hash header + body, polymorphic)
// ============================================================================

/// Writes the 8-byte hash then the body; `None` is eight zero bytes.
pub fn encode_reference(
    writer: &mut PacketWriter,
    value: Option<&dyn Packet>,
) -> Result<(), ProtocolError> {
    match value {
        Some(packet) => {
            writer.put_i64(packet.packet_hash().value());
            packet.encode_body(writer)
        }
        None => {
            writer.put_i64(PacketHash::NULL.value());
            Ok(())
        }
    }
}

/// Reads a hash header and, unless it is zero, the body of the packet
/// type the registry knows for it.
pub fn decode_reference(
    registry: &PacketRegistry,
    reader: &mut PacketReader<'_>,
) -> Result<Option<Box<dyn Packet>>, ProtocolError> {
    let hash = PacketHash::new(reader.get_i64()?);
    if hash.is_null() {
        return Ok(None);
    }
    let mut packet = registry.new_instance(hash)?;
    packet.decode_body(registry, reader)?;
    Ok(Some(packet))
}

pub fn encode_reference_array(
    writer: &mut PacketWriter,
    values: &[Option<Box<dyn Packet>>],
) -> Result<(), ProtocolError> {
    writer.put_length(values.len())?;
    for value in values {
        encode_reference(writer, value.as_deref())?;
    }
    Ok(())
}

pub fn decode_reference_array(
    registry: &PacketRegistry,
    reader: &mut PacketReader<'_>,
) -> Result<Vec<Option<Box<dyn Packet>>>, ProtocolError> {
    let len = reader.get_length()?;
    let mut values = Vec::with_capacity(capacity_hint(len, reader));
    for _ in 0..len {
        values.push(decode_reference(registry, reader)?);
    }
    Ok(values)
}
