//! Human-readable field rendering used by packet `Display` impls.
//!
//! Empty fields are skipped: `false`, zero numbers, empty strings,
//! empty arrays and null references. Arrays render as
//! `name={type *len|a|b}`.

use crate::packet::Packet;
use std::fmt::{self, Write};

/// Appends ` name=value` pairs to a string buffer.
pub struct FieldRenderer<'a> {
    out: &'a mut String,
}

impl<'a> FieldRenderer<'a> {
    pub fn new(out: &'a mut String) -> Self {
        Self { out }
    }

    fn field(&mut self, name: &str) {
        let _ = write!(self.out, " {}=", name);
    }

    fn array_header(&mut self, name: &str, ty: &str, len: usize) {
        let _ = write!(self.out, " {}={{{} *{}", name, ty, len);
    }

    pub fn bool(&mut self, name: &str, value: bool) {
        if value {
            self.field(name);
            self.out.push('1');
        }
    }

    /// Renders any numeric field, skipping zero.
    pub fn number<T>(&mut self, name: &str, value: T)
    where
        T: fmt::Display + Default + PartialEq,
    {
        if value != T::default() {
            self.field(name);
            let _ = write!(self.out, "{}", value);
        }
    }

    pub fn string(&mut self, name: &str, value: &str) {
        if !value.is_empty() {
            self.field(name);
            let _ = write!(self.out, "\"{}\"", value);
        }
    }

    /// Enum members always render, by member name.
    pub fn enumeration<E: fmt::Debug>(&mut self, name: &str, value: &E) {
        self.field(name);
        let _ = write!(self.out, "{:?}", value);
    }

    /// Renders an embedded packet as `{Name HASH fields}`.
    pub fn packet(&mut self, name: &str, value: &dyn Packet) {
        self.field(name);
        let _ = write!(self.out, "{}", value);
    }

    pub fn reference(&mut self, name: &str, value: Option<&dyn Packet>) {
        if let Some(packet) = value {
            self.packet(name, packet);
        }
    }

    pub fn array<T: fmt::Display>(&mut self, name: &str, ty: &str, values: &[T]) {
        if values.is_empty() {
            return;
        }
        self.array_header(name, ty, values.len());
        for value in values {
            let _ = write!(self.out, "|{}", value);
        }
        self.out.push('}');
    }

    pub fn bool_array(&mut self, name: &str, values: &[bool]) {
        if values.is_empty() {
            return;
        }
        self.array_header(name, "bool", values.len());
        for value in values {
            self.out.push('|');
            self.out.push(if *value { '1' } else { '0' });
        }
        self.out.push('}');
    }

    pub fn string_array(&mut self, name: &str, values: &[String]) {
        if values.is_empty() {
            return;
        }
        self.array_header(name, "string", values.len());
        for value in values {
            let _ = write!(self.out, "|\"{}\"", value);
        }
        self.out.push('}');
    }

    pub fn enum_array<E: fmt::Debug>(&mut self, name: &str, ty: &str, values: &[E]) {
        if values.is_empty() {
            return;
        }
        self.array_header(name, ty, values.len());
        for value in values {
            let _ = write!(self.out, "|{:?}", value);
        }
        self.out.push('}');
    }

    /// Embedded packet arrays render each element's fields only.
    pub fn packet_array<P: Packet>(&mut self, name: &str, ty: &str, values: &[P]) {
        if values.is_empty() {
            return;
        }
        self.array_header(name, ty, values.len());
        for value in values {
            self.out.push('|');
            value.render_fields(&mut FieldRenderer::new(&mut *self.out));
        }
        self.out.push('}');
    }

    pub fn reference_array(&mut self, name: &str, values: &[Option<Box<dyn Packet>>]) {
        if values.is_empty() {
            return;
        }
        self.array_header(name, "packet", values.len());
        for value in values {
            self.out.push('|');
            if let Some(packet) = value {
                let _ = write!(self.out, "{}", packet);
            }
        }
        self.out.push('}');
    }
}
