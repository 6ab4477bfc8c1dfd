//! Packets and a scripted peer for client tests.

use bluepacket_protocol::codec;
use bluepacket_protocol::{
    impl_packet_display, packet_identity, FieldRenderer, Packet, PacketHash, PacketReader,
    PacketRegistry, PacketWriter, ProtocolError,
};
use std::future::Future;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

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
pub struct Ping;

impl Ping {
    pub const NAME: &'static str = "Ping";
    pub const HASH: PacketHash = PacketHash::new(-5163352988392356548);
}

impl Packet for Ping {
    packet_identity!();

    fn encode_body(&self, _w: &mut PacketWriter) -> Result<(), ProtocolError> {
        Ok(())
    }

    fn decode_body(
        &mut self,
        _registry: &PacketRegistry,
        _r: &mut PacketReader<'_>,
    ) -> Result<(), ProtocolError> {
        Ok(())
    }

    fn render_fields(&self, _out: &mut FieldRenderer<'_>) {}
}

impl_packet_display!(Echo, Ping);

pub fn test_registry() -> PacketRegistry {
    let mut registry = PacketRegistry::new();
    registry
        .register::<Echo>()
        .and_then(|r| r.register::<Ping>())
        .unwrap();
    registry
}

/// Accepts one connection, reads the request to EOF, and lets `reply`
/// produce the bytes written back before closing. Returns the port.
pub async fn scripted_peer<F, Fut>(reply: F) -> u16
where
    F: FnOnce(Vec<u8>) -> Fut + Send + 'static,
    Fut: Future<Output = Vec<u8>> + Send,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        stream.read_to_end(&mut request).await.unwrap();
        let response = reply(request).await;
        let _ = stream.write_all(&response).await;
        let _ = stream.shutdown().await;
    });
    port
}
