//! Calculator packets.

use bluepacket_protocol::codec::{self, WireEnum};
use bluepacket_protocol::{
    impl_packet_display, packet_identity, EnumSchema, FieldRenderer, FieldType, Packet,
    PacketHash, PacketReader, PacketRegistry, PacketSchema, PacketWriter, ProtocolError,
};

/// Builds a registry holding every calculator packet.
pub fn registry() -> Result<PacketRegistry, ProtocolError> {
    let mut registry = PacketRegistry::new();
    register_packets(&mut registry)?;
    Ok(registry)
}

/// Adds the calculator packets to an existing registry.
pub fn register_packets(registry: &mut PacketRegistry) -> Result<(), ProtocolError> {
    registry
        .register::<CalcSum>()?
        .register::<CalcMean>()?
        .register::<RpcResult>()?
        .register::<RpcError>()?;
    Ok(())
}

// ============================================================================
// CalcSum
// ============================================================================

/// Request: sum of all values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalcSum {
    pub values: Vec<f32>,
}

impl CalcSum {
    pub const NAME: &'static str = "CalcSum";
    pub const HASH: PacketHash = PacketHash::new(909162675578853656);

    pub fn new(values: impl Into<Vec<f32>>) -> Self {
        Self {
            values: values.into(),
        }
    }

    pub fn schema() -> PacketSchema {
        PacketSchema::new(Self::NAME).field("values", FieldType::array(FieldType::Float))
    }
}

impl Packet for CalcSum {
    packet_identity!();

    fn encode_body(&self, w: &mut PacketWriter) -> Result<(), ProtocolError> {
        codec::encode_array(w, &self.values)
    }

    fn decode_body(
        &mut self,
        _registry: &PacketRegistry,
        r: &mut PacketReader<'_>,
    ) -> Result<(), ProtocolError> {
        self.values = codec::decode_array(r)?;
        Ok(())
    }

    fn render_fields(&self, out: &mut FieldRenderer<'_>) {
        out.array("values", "float", &self.values);
    }
}

// ============================================================================
// CalcMean
// ============================================================================

/// Which mean `CalcMean` computes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CalcMeanType {
    #[default]
    Arithmetic,
    Geometric,
    Harmonic,
}

impl CalcMeanType {
    pub const ALL: [CalcMeanType; 3] = [
        CalcMeanType::Arithmetic,
        CalcMeanType::Geometric,
        CalcMeanType::Harmonic,
    ];

    /// Declared inside `CalcMean`, so the schema carries the local name.
    pub fn schema() -> EnumSchema {
        EnumSchema::new("Type", ["Arithmetic", "Geometric", "Harmonic"])
    }
}

impl WireEnum for CalcMeanType {
    const NAME: &'static str = "CalcMeanType";
    const MEMBER_COUNT: usize = 3;

    fn ordinal(self) -> u16 {
        self as u16
    }

    fn from_ordinal(ordinal: u16) -> Option<Self> {
        Self::ALL.get(ordinal as usize).copied()
    }
}

/// Request: mean of all values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalcMean {
    pub r#type: CalcMeanType,
    pub values: Vec<f32>,
}

impl CalcMean {
    pub const NAME: &'static str = "CalcMean";
    pub const HASH: PacketHash = PacketHash::new(320241129451081441);

    pub fn new(kind: CalcMeanType, values: impl Into<Vec<f32>>) -> Self {
        Self {
            r#type: kind,
            values: values.into(),
        }
    }

    pub fn schema() -> PacketSchema {
        PacketSchema::new(Self::NAME)
            .field("type", FieldType::Enum(CalcMeanType::schema()))
            .field("values", FieldType::array(FieldType::Float))
    }
}

impl Packet for CalcMean {
    packet_identity!();

    fn encode_body(&self, w: &mut PacketWriter) -> Result<(), ProtocolError> {
        codec::encode_enum(w, self.r#type);
        codec::encode_array(w, &self.values)
    }

    fn decode_body(
        &mut self,
        _registry: &PacketRegistry,
        r: &mut PacketReader<'_>,
    ) -> Result<(), ProtocolError> {
        self.r#type = codec::decode_enum(r)?;
        self.values = codec::decode_array(r)?;
        Ok(())
    }

    fn render_fields(&self, out: &mut FieldRenderer<'_>) {
        out.enumeration("type", &self.r#type);
        out.array("values", "float", &self.values);
    }
}

// ============================================================================
// RpcResult / RpcError
// ============================================================================

/// Response: a computed value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RpcResult {
    pub value: f32,
}

impl RpcResult {
    pub const NAME: &'static str = "RpcResult";
    pub const HASH: PacketHash = PacketHash::new(-854811139817573361);

    pub fn new(value: f32) -> Self {
        Self { value }
    }

    pub fn schema() -> PacketSchema {
        PacketSchema::new(Self::NAME).field("value", FieldType::Float)
    }
}

impl Packet for RpcResult {
    packet_identity!();

    fn encode_body(&self, w: &mut PacketWriter) -> Result<(), ProtocolError> {
        codec::encode_field(w, &self.value)
    }

    fn decode_body(
        &mut self,
        _registry: &PacketRegistry,
        r: &mut PacketReader<'_>,
    ) -> Result<(), ProtocolError> {
        self.value = codec::decode_field(r)?;
        Ok(())
    }

    fn render_fields(&self, out: &mut FieldRenderer<'_>) {
        out.number("value", self.value);
    }
}

/// Response: the request failed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RpcError {
    pub message: String,
}

impl RpcError {
    pub const NAME: &'static str = "RpcError";
    pub const HASH: PacketHash = PacketHash::new(6726748588392692350);

    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn schema() -> PacketSchema {
        PacketSchema::new(Self::NAME).field("message", FieldType::String)
    }
}

impl Packet for RpcError {
    packet_identity!();

    fn encode_body(&self, w: &mut PacketWriter) -> Result<(), ProtocolError> {
        codec::encode_field(w, &self.message)
    }

    fn decode_body(
        &mut self,
        _registry: &PacketRegistry,
        r: &mut PacketReader<'_>,
    ) -> Result<(), ProtocolError> {
        self.message = codec::decode_field(r)?;
        Ok(())
    }

    fn render_fields(&self, out: &mut FieldRenderer<'_>) {
        out.string("message", &self.message);
    }
}

impl_packet_display!(CalcSum, CalcMean, RpcResult, RpcError);
