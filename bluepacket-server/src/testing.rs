//! Request and response packets for server tests.

use bluepacket_protocol::codec;
use bluepacket_protocol::{
    impl_packet_display, packet_identity, FieldRenderer, Packet, PacketHash, PacketReader,
    PacketRegistry, PacketWriter, ProtocolError,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Echo {
    pub text: String,
}

impl Echo {
    pub const NAME: &'static str = "Echo";
    pub const HASH: PacketHash = PacketHash::new(555092319884163067);

    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl Packet for Echo {
    packet_identity!();

    fn encode_body(&self, w: &mut PacketWriter) -> Result<(), ProtocolError> {
        codec::encode_field(w, &self.text)
    }

    fn decode_body(
        &mut self,
        _registry: &PacketRegistry,
        r: &mut PacketReader<'_>,
    ) -> Result<(), ProtocolError> {
        self.text = codec::decode_field(r)?;
        Ok(())
    }

    fn render_fields(&self, out: &mut FieldRenderer<'_>) {
        out.string("text", &self.text);
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Unhandled {
    pub n: i32,
}

impl Unhandled {
    pub const NAME: &'static str = "Unhandled";
    pub const HASH: PacketHash = PacketHash::new(8421307767394030102);
}

impl Packet for Unhandled {
    packet_identity!();

    fn encode_body(&self, w: &mut PacketWriter) -> Result<(), ProtocolError> {
        codec::encode_field(w, &self.n)
    }

    fn decode_body(
        &mut self,
        _registry: &PacketRegistry,
        r: &mut PacketReader<'_>,
    ) -> Result<(), ProtocolError> {
        self.n = codec::decode_field(r)?;
        Ok(())
    }

    fn render_fields(&self, out: &mut FieldRenderer<'_>) {
        out.number("n", self.n);
    }
}

impl_packet_display!(Echo, Unhandled);

pub fn test_registry() -> PacketRegistry {
    let mut registry = PacketRegistry::new();
    registry
        .register::<Echo>()
        .and_then(|r| r.register::<Unhandled>())
        .unwrap();
    registry
}
