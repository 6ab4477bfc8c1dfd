//! Schema descriptors and the packet hash derived from them.
//!
//! The version string of a packet is its name followed by `+field:type`
//! for every field in name order. Primitives render by type name and
//! arrays of them as `[]type`. Enumerations render as `{Name+A+B}` in
//! ordinal order (`[]{Name+A+B}` for arrays). Embedded packets render
//! their own version string inside braces, `{[]...}` for arrays. A packet
//! type met again anywhere in the same traversal collapses to
//! `{Name+...}` (or `{[]Name+...}`).
//!
//! The hash is the first eight bytes of the MD5 digest of the version
//! string, read as a big-endian `i64`.

use std::collections::HashSet;

use crate::packet::PacketHash;
use md5::{Digest, Md5};

/// Declared type of a schema field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    Bool,
    Byte,
    UByte,
    Short,
    UShort,
    Int,
    Long,
    Float,
    Double,
    String,
    /// Polymorphic reference, hash-headed on the wire.
    Packet,
    Enum(EnumSchema),
    /// Nested packet written as a bare body.
    Embedded(PacketSchema),
    Array(Box<FieldType>),
}

impl FieldType {
    pub fn array(element: FieldType) -> Self {
        FieldType::Array(Box::new(element))
    }

    /// Unsigned types share the signed wire form and differ only in
    /// presentation.
    pub fn is_unsigned(&self) -> bool {
        matches!(self, FieldType::UByte | FieldType::UShort)
    }

    fn primitive_name(&self) -> Option<&'static str> {
        Some(match self {
            FieldType::Bool => "bool",
            FieldType::Byte => "byte",
            FieldType::UByte => "ubyte",
            FieldType::Short => "short",
            FieldType::UShort => "ushort",
            FieldType::Int => "int",
            FieldType::Long => "long",
            FieldType::Float => "float",
            FieldType::Double => "double",
            FieldType::String => "string",
            FieldType::Packet => "packet",
            _ => return None,
        })
    }

    fn write_version(&self, out: &mut String, seen: &mut HashSet<String>) {
        let (element, list) = match self {
            FieldType::Array(element) => (element.as_ref(), true),
            other => (other, false),
        };
        let ary = if list { "[]" } else { "" };

        if let FieldType::Embedded(schema) = element {
            if seen.contains(&schema.name) {
                out.push('{');
                out.push_str(ary);
                out.push_str(&schema.name);
                out.push_str("+...}");
                return;
            }
        }

        match element {
            FieldType::Enum(schema) => {
                out.push_str(ary);
                schema.write_version(out);
            }
            FieldType::Embedded(schema) => {
                out.push('{');
                out.push_str(ary);
                schema.write_version(out, seen);
                out.push('}');
            }
            // Nested arrays are not declarable; render the element as is.
            FieldType::Array(inner) => {
                out.push_str(ary);
                inner.write_version(out, seen);
            }
            primitive => {
                out.push_str(ary);
                out.push_str(primitive.primitive_name().unwrap_or_default());
            }
        }
    }
}

/// An enumeration: a name and its members in ordinal order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumSchema {
    name: String,
    members: Vec<String>,
}

impl EnumSchema {
    pub fn new<I, S>(name: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            members: members.into_iter().map(Into::into).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn members(&self) -> &[String] {
        &self.members
    }

    /// Large enums encode ordinals in two bytes.
    pub fn is_large(&self) -> bool {
        self.members.len() > crate::codec::SMALL_ENUM_LIMIT
    }

    fn write_version(&self, out: &mut String) {
        out.push('{');
        out.push_str(&self.name);
        for member in &self.members {
            out.push('+');
            out.push_str(member);
        }
        out.push('}');
    }
}

/// A named field of a packet schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSchema {
    pub name: String,
    pub ty: FieldType,
}

/// A packet schema: a name and its fields in any declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacketSchema {
    name: String,
    fields: Vec<FieldSchema>,
}

impl PacketSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Adds a field (builder style).
    pub fn field(mut self, name: impl Into<String>, ty: FieldType) -> Self {
        self.fields.push(FieldSchema {
            name: name.into(),
            ty,
        });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in wire order (lexicographic by name).
    pub fn wire_fields(&self) -> Vec<&FieldSchema> {
        let mut fields: Vec<&FieldSchema> = self.fields.iter().collect();
        fields.sort_by(|a, b| a.name.cmp(&b.name));
        fields
    }

    /// The version string the hash is computed over.
    pub fn canonical(&self) -> String {
        let mut out = String::new();
        self.write_version(&mut out, &mut HashSet::new());
        out
    }

    fn write_version(&self, out: &mut String, seen: &mut HashSet<String>) {
        seen.insert(self.name.clone());
        out.push_str(&self.name);
        for field in self.wire_fields() {
            out.push('+');
            out.push_str(&field.name);
            out.push(':');
            field.ty.write_version(out, seen);
        }
    }

    pub fn hash(&self) -> PacketHash {
        hash_canonical(&self.canonical())
    }
}

/// Hashes a version string.
pub fn hash_canonical(text: &str) -> PacketHash {
    let digest = Md5::digest(text.as_bytes());
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    PacketHash::from_be_bytes(head)
}
