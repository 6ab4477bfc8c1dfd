//! Packet types shaped like schema-compiler output, for unit tests.

use crate::codec::{self, WireEnum};
use crate::error::ProtocolError;
use crate::packet::{Packet, PacketHash};
use crate::registry::PacketRegistry;
use crate::render::FieldRenderer;
use crate::schema::{EnumSchema, FieldType, PacketSchema};
use crate::wire::{PacketReader, PacketWriter};

pub fn test_registry() -> PacketRegistry {
    let mut registry = PacketRegistry::new();
    registry
        .register::<Primitives>()
        .and_then(|r| r.register::<DemoInner>())
        .and_then(|r| r.register::<Everything>())
        .unwrap();
    registry
}

// ============================================================================
// Primitives
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Primitives {
    pub b: bool,
    pub i: i32,
    pub l: i64,
    pub s: String,
}

impl Primitives {
    pub const NAME: &'static str = "Primitives";
    pub const HASH: PacketHash = PacketHash::new(2094664245053439627);

    pub fn schema() -> PacketSchema {
        PacketSchema::new(Self::NAME)
            .field("s", FieldType::String)
            .field("l", FieldType::Long)
            .field("i", FieldType::Int)
            .field("b", FieldType::Bool)
    }
}

impl Packet for Primitives {
    packet_identity!();

    fn encode_body(&self, w: &mut PacketWriter) -> Result<(), ProtocolError> {
        codec::encode_bool(w, self.b);
        codec::encode_field(w, &self.i)?;
        codec::encode_field(w, &self.l)?;
        codec::encode_field(w, &self.s)
    }

    fn decode_body(
        &mut self,
        _registry: &PacketRegistry,
        r: &mut PacketReader<'_>,
    ) -> Result<(), ProtocolError> {
        self.b = codec::decode_bool(r)?;
        self.i = codec::decode_field(r)?;
        self.l = codec::decode_field(r)?;
        self.s = codec::decode_field(r)?;
        Ok(())
    }

    fn render_fields(&self, out: &mut FieldRenderer<'_>) {
        out.bool("b", self.b);
        out.number("i", self.i);
        out.number("l", self.l);
        out.string("s", &self.s);
    }
}

// ============================================================================
// DemoInner / Impostor
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DemoInner {
    pub value: i32,
}

impl DemoInner {
    pub const NAME: &'static str = "DemoInner";
    pub const HASH: PacketHash = PacketHash::new(5393010329660641494);

    pub fn schema() -> PacketSchema {
        PacketSchema::new(Self::NAME).field("value", FieldType::Int)
    }
}

impl Packet for DemoInner {
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

/// A different shape claiming `DemoInner`'s hash.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Impostor {
    pub x: i64,
}

impl Impostor {
    pub const NAME: &'static str = "Impostor";
    pub const HASH: PacketHash = DemoInner::HASH;
}

impl Packet for Impostor {
    packet_identity!();

    fn encode_body(&self, w: &mut PacketWriter) -> Result<(), ProtocolError> {
        codec::encode_field(w, &self.x)
    }

    fn decode_body(
        &mut self,
        _registry: &PacketRegistry,
        r: &mut PacketReader<'_>,
    ) -> Result<(), ProtocolError> {
        self.x = codec::decode_field(r)?;
        Ok(())
    }

    fn render_fields(&self, out: &mut FieldRenderer<'_>) {
        out.number("x", self.x);
    }
}

impl_packet_display!(Primitives, DemoInner, Impostor, Everything);

// ============================================================================
// Enumerations
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DemoColor {
    #[default]
    Red,
    Green,
    Blue,
}

impl DemoColor {
    pub fn schema() -> EnumSchema {
        EnumSchema::new("DemoColor", ["Red", "Green", "Blue"])
    }
}

impl WireEnum for DemoColor {
    const NAME: &'static str = "DemoColor";
    const MEMBER_COUNT: usize = 3;

    fn ordinal(self) -> u16 {
        self as u16
    }

    fn from_ordinal(ordinal: u16) -> Option<Self> {
        match ordinal {
            0 => Some(DemoColor::Red),
            1 => Some(DemoColor::Green),
            2 => Some(DemoColor::Blue),
            _ => None,
        }
    }
}

/// A 300-member enum, held as its ordinal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Wide(pub u16);

impl Wide {
    pub fn schema() -> EnumSchema {
        EnumSchema::new("Wide", (0..300).map(|i| format!("w{}", i)))
    }
}

impl WireEnum for Wide {
    const NAME: &'static str = "Wide";
    const MEMBER_COUNT: usize = 300;

    fn ordinal(self) -> u16 {
        self.0
    }

    fn from_ordinal(ordinal: u16) -> Option<Self> {
        ((ordinal as usize) < Self::MEMBER_COUNT).then_some(Wide(ordinal))
    }
}

// ============================================================================
// Everything: one field of every kind, single and array
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Everything {
    pub f_bool: bool,
    pub f_byte: i8,
    pub f_color: DemoColor,
    pub f_double: f64,
    pub f_float: f32,
    pub f_inner: DemoInner,
    pub f_int: i32,
    pub f_long: i64,
    pub f_ref: Option<Box<dyn Packet>>,
    pub f_short: i16,
    pub f_string: String,
    pub f_ubyte: u8,
    pub f_ushort: u16,
    pub f_wide: Wide,
    pub a_bool: Vec<bool>,
    pub a_byte: Vec<i8>,
    pub a_color: Vec<DemoColor>,
    pub a_double: Vec<f64>,
    pub a_float: Vec<f32>,
    pub a_inner: Vec<DemoInner>,
    pub a_int: Vec<i32>,
    pub a_long: Vec<i64>,
    pub a_ref: Vec<Option<Box<dyn Packet>>>,
    pub a_short: Vec<i16>,
    pub a_string: Vec<String>,
    pub a_ubyte: Vec<u8>,
    pub a_ushort: Vec<u16>,
    pub a_wide: Vec<Wide>,
}

impl Everything {
    pub const NAME: &'static str = "Everything";
    pub const HASH: PacketHash = PacketHash::new(-5766039731982384765);

    pub fn schema() -> PacketSchema {
        let color = || FieldType::Enum(DemoColor::schema());
        let wide = || FieldType::Enum(Wide::schema());
        let inner = || FieldType::Embedded(DemoInner::schema());
        PacketSchema::new(Self::NAME)
            .field("f_bool", FieldType::Bool)
            .field("f_byte", FieldType::Byte)
            .field("f_color", color())
            .field("f_double", FieldType::Double)
            .field("f_float", FieldType::Float)
            .field("f_inner", inner())
            .field("f_int", FieldType::Int)
            .field("f_long", FieldType::Long)
            .field("f_ref", FieldType::Packet)
            .field("f_short", FieldType::Short)
            .field("f_string", FieldType::String)
            .field("f_ubyte", FieldType::UByte)
            .field("f_ushort", FieldType::UShort)
            .field("f_wide", wide())
            .field("a_bool", FieldType::array(FieldType::Bool))
            .field("a_byte", FieldType::array(FieldType::Byte))
            .field("a_color", FieldType::array(color()))
            .field("a_double", FieldType::array(FieldType::Double))
            .field("a_float", FieldType::array(FieldType::Float))
            .field("a_inner", FieldType::array(inner()))
            .field("a_int", FieldType::array(FieldType::Int))
            .field("a_long", FieldType::array(FieldType::Long))
            .field("a_ref", FieldType::array(FieldType::Packet))
            .field("a_short", FieldType::array(FieldType::Short))
            .field("a_string", FieldType::array(FieldType::String))
            .field("a_ubyte", FieldType::array(FieldType::UByte))
            .field("a_ushort", FieldType::array(FieldType::UShort))
            .field("a_wide", FieldType::array(wide()))
    }

    pub fn sample() -> Self {
        Self {
            f_bool: true,
            f_byte: -7,
            f_color: DemoColor::Green,
            f_double: -2.5,
            f_float: 0.125,
            f_inner: DemoInner { value: 88 },
            f_int: i32::MIN,
            f_long: i64::MAX,
            f_ref: Some(Box::new(Primitives {
                b: true,
                i: 3,
                l: -4,
                s: "ref".to_string(),
            })),
            f_short: -300,
            f_string: "ünïcødé".to_string(),
            f_ubyte: 200,
            f_ushort: 65_000,
            f_wide: Wide(280),
            a_bool: vec![true, false, true, true, false, false, false, false, true],
            a_byte: vec![-1, 0, 1],
            a_color: vec![DemoColor::Blue, DemoColor::Red],
            a_double: vec![1.5, f64::MIN_POSITIVE],
            a_float: vec![3.25],
            a_inner: vec![DemoInner { value: 1 }, DemoInner { value: 2 }],
            a_int: (0..300).collect(),
            a_long: vec![i64::MIN],
            a_ref: vec![None, Some(Box::new(DemoInner { value: 5 }))],
            a_short: vec![i16::MAX, i16::MIN],
            a_string: vec!["".to_string(), "x".repeat(260)],
            a_ubyte: vec![255, 0],
            a_ushort: vec![1, 65_535],
            a_wide: vec![Wide(0), Wide(299)],
        }
    }
}

impl Packet for Everything {
    packet_identity!();

    fn encode_body(&self, w: &mut PacketWriter) -> Result<(), ProtocolError> {
        codec::encode_bool_array(w, &self.a_bool)?;
        codec::encode_array(w, &self.a_byte)?;
        codec::encode_enum_array(w, &self.a_color)?;
        codec::encode_array(w, &self.a_double)?;
        codec::encode_array(w, &self.a_float)?;
        codec::encode_embedded_array(w, &self.a_inner)?;
        codec::encode_array(w, &self.a_int)?;
        codec::encode_array(w, &self.a_long)?;
        codec::encode_reference_array(w, &self.a_ref)?;
        codec::encode_array(w, &self.a_short)?;
        codec::encode_array(w, &self.a_string)?;
        codec::encode_array(w, &self.a_ubyte)?;
        codec::encode_array(w, &self.a_ushort)?;
        codec::encode_enum_array(w, &self.a_wide)?;
        codec::encode_bool(w, self.f_bool);
        codec::encode_field(w, &self.f_byte)?;
        codec::encode_enum(w, self.f_color);
        codec::encode_field(w, &self.f_double)?;
        codec::encode_field(w, &self.f_float)?;
        codec::encode_embedded(w, &self.f_inner)?;
        codec::encode_field(w, &self.f_int)?;
        codec::encode_field(w, &self.f_long)?;
        codec::encode_reference(w, self.f_ref.as_deref())?;
        codec::encode_field(w, &self.f_short)?;
        codec::encode_field(w, &self.f_string)?;
        codec::encode_field(w, &self.f_ubyte)?;
        codec::encode_field(w, &self.f_ushort)?;
        codec::encode_enum(w, self.f_wide);
        Ok(())
    }

    fn decode_body(
        &mut self,
        registry: &PacketRegistry,
        r: &mut PacketReader<'_>,
    ) -> Result<(), ProtocolError> {
        self.a_bool = codec::decode_bool_array(r)?;
        self.a_byte = codec::decode_array(r)?;
        self.a_color = codec::decode_enum_array(r)?;
        self.a_double = codec::decode_array(r)?;
        self.a_float = codec::decode_array(r)?;
        self.a_inner = codec::decode_embedded_array(registry, r)?;
        self.a_int = codec::decode_array(r)?;
        self.a_long = codec::decode_array(r)?;
        self.a_ref = codec::decode_reference_array(registry, r)?;
        self.a_short = codec::decode_array(r)?;
        self.a_string = codec::decode_array(r)?;
        self.a_ubyte = codec::decode_array(r)?;
        self.a_ushort = codec::decode_array(r)?;
        self.a_wide = codec::decode_enum_array(r)?;
        self.f_bool = codec::decode_bool(r)?;
        self.f_byte = codec::decode_field(r)?;
        self.f_color = codec::decode_enum(r)?;
        self.f_double = codec::decode_field(r)?;
        self.f_float = codec::decode_field(r)?;
        self.f_inner = codec::decode_embedded(registry, r)?;
        self.f_int = codec::decode_field(r)?;
        self.f_long = codec::decode_field(r)?;
        self.f_ref = codec::decode_reference(registry, r)?;
        self.f_short = codec::decode_field(r)?;
        self.f_string = codec::decode_field(r)?;
        self.f_ubyte = codec::decode_field(r)?;
        self.f_ushort = codec::decode_field(r)?;
        self.f_wide = codec::decode_enum(r)?;
        Ok(())
    }

    fn render_fields(&self, out: &mut FieldRenderer<'_>) {
        out.bool_array("a_bool", &self.a_bool);
        out.array("a_byte", "byte", &self.a_byte);
        out.enum_array("a_color", "DemoColor", &self.a_color);
        out.array("a_double", "double", &self.a_double);
        out.array("a_float", "float", &self.a_float);
        out.packet_array("a_inner", "DemoInner", &self.a_inner);
        out.array("a_int", "int", &self.a_int);
        out.array("a_long", "long", &self.a_long);
        out.reference_array("a_ref", &self.a_ref);
        out.array("a_short", "short", &self.a_short);
        out.string_array("a_string", &self.a_string);
        out.array("a_ubyte", "ubyte", &self.a_ubyte);
        out.array("a_ushort", "ushort", &self.a_ushort);
        out.enum_array("a_wide", "Wide", &self.a_wide);
        out.bool("f_bool", self.f_bool);
        out.number("f_byte", self.f_byte);
        out.enumeration("f_color", &self.f_color);
        out.number("f_double", self.f_double);
        out.number("f_float", self.f_float);
        out.packet("f_inner", &self.f_inner);
        out.number("f_int", self.f_int);
        out.number("f_long", self.f_long);
        out.reference("f_ref", self.f_ref.as_deref());
        out.number("f_short", self.f_short);
        out.string("f_string", &self.f_string);
        out.number("f_ubyte", self.f_ubyte);
        out.number("f_ushort", self.f_ushort);
        out.enumeration("f_wide", &self.f_wide);
    }
}

#[test]
fn test_everything_display_shape() {
    let text = Everything {
        a_inner: vec![DemoInner { value: 4 }],
        f_ubyte: 200,
        ..Default::default()
    }
    .to_string();
    assert!(text.starts_with(&format!("{{Everything {}", Everything::HASH)));
    assert!(text.contains(" a_inner={DemoInner *1| value=4}"));
    assert!(text.contains(" f_color=Red"));
    assert!(text.contains(" f_ubyte=200"));
    assert!(text.ends_with(" f_wide=Wide(0)}"));
}
