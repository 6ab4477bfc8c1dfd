//! Hash to packet-factory table used during decode.
//!
//! A registry is populated once at startup and then shared read-only,
//! typically behind an `Arc`, by every decode site.

use crate::error::ProtocolError;
use crate::packet::{Packet, PacketHash};
use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;

struct Entry {
    name: &'static str,
    type_id: TypeId,
    factory: fn() -> Box<dyn Packet>,
}

fn make<P: Packet + Default>() -> Box<dyn Packet> {
    Box::new(P::default())
}

/// Maps packet hashes to factories that build empty instances.
#[derive(Default)]
pub struct PacketRegistry {
    entries: HashMap<PacketHash, Entry>,
}

impl PacketRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers packet type `P` under its schema hash.
    ///
    /// Registering the same type twice is a no-op. A different type
    /// with the same hash fails with [`ProtocolError::DuplicateHash`].
    pub fn register<P: Packet + Default>(&mut self) -> Result<&mut Self, ProtocolError> {
        let prototype = P::default();
        let hash = prototype.packet_hash();
        if hash.is_null() {
            return Err(ProtocolError::NullPacket);
        }

        if let Some(existing) = self.entries.get(&hash) {
            if existing.type_id == TypeId::of::<P>() {
                return Ok(self);
            }
            return Err(ProtocolError::DuplicateHash {
                hash,
                existing: existing.name,
                incoming: prototype.packet_name(),
            });
        }

        self.entries.insert(
            hash,
            Entry {
                name: prototype.packet_name(),
                type_id: TypeId::of::<P>(),
                factory: make::<P>,
            },
        );
        Ok(self)
    }

    /// Builds a fresh, empty packet for `hash`.
    pub fn new_instance(&self, hash: PacketHash) -> Result<Box<dyn Packet>, ProtocolError> {
        self.entries
            .get(&hash)
            .map(|entry| (entry.factory)())
            .ok_or(ProtocolError::UnknownHash(hash))
    }

    /// Returns true if this exact packet type is registered.
    pub fn knows(&self, packet: &dyn Packet) -> bool {
        self.entries
            .get(&packet.packet_hash())
            .is_some_and(|entry| entry.type_id == packet.as_any().type_id())
    }

    pub fn contains_hash(&self, hash: PacketHash) -> bool {
        self.entries.contains_key(&hash)
    }

    pub fn name_of(&self, hash: PacketHash) -> Option<&'static str> {
        self.entries.get(&hash).map(|entry| entry.name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for PacketRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<(&PacketHash, &str)> =
            self.entries.iter().map(|(h, e)| (h, e.name)).collect();
        names.sort();
        f.debug_map().entries(names).finish()
    }
}
