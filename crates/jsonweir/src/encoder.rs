//! Push-style serialization.
//!
//! An [`Encoder`] writes one value into a [`JsonWriter`], a growable UTF-8
//! buffer. Encoders are total: any value that exists can be written. The
//! `indent` argument is `None` for compact output or the current indentation
//! level for pretty output (two spaces per level).

use alloc::string::String;
use core::fmt::Write as _;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;

/// A growable UTF-8 output buffer with JSON string escaping.
#[derive(Debug, Default)]
pub struct JsonWriter {
    buf: String,
}

impl JsonWriter {
    #[must_use]
    pub fn new() -> Self {
        Self { buf: String::new() }
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: String::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, c: char) {
        self.buf.push(c);
    }

    pub fn push_str(&mut self, s: &str) {
        self.buf.push_str(s);
    }

    /// Appends any `Display` value.
    pub fn push_display(&mut self, value: impl core::fmt::Display) {
        write!(self.buf, "{value}").expect("writing to a String cannot fail");
    }

    /// Appends `s` with JSON string escaping: quotes, backslashes, control
    /// characters, and the Unicode line separators older parsers choke on.
    pub fn push_escaped(&mut self, s: &str) {
        for c in s.chars() {
            match c {
                '"' => self.buf.push_str("\\\""),
                '\\' => self.buf.push_str("\\\\"),
                '\n' => self.buf.push_str("\\n"),
                '\r' => self.buf.push_str("\\r"),
                '\t' => self.buf.push_str("\\t"),
                '\u{2028}' | '\u{2029}' => {
                    write!(self.buf, "\\u{:04X}", c as u32)
                        .expect("writing to a String cannot fail");
                }
                c if c.is_ascii_control() => {
                    write!(self.buf, "\\u{:04X}", c as u32)
                        .expect("writing to a String cannot fail");
                }
                c => self.buf.push(c),
            }
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.buf
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.buf
    }
}

/// Emits the newline-plus-indentation separator in pretty mode; nothing in
/// compact mode.
pub(crate) fn pad(out: &mut JsonWriter, indent: Option<usize>) {
    if let Some(level) = indent {
        out.push('\n');
        for _ in 0..level {
            out.push_str("  ");
        }
    }
}

/// After a key's colon: a space in pretty mode.
pub(crate) fn key_separator(out: &mut JsonWriter, indent: Option<usize>) {
    out.push(':');
    if indent.is_some() {
        out.push(' ');
    }
}

/// The capability to write one value of type [`Encoder::Value`].
pub trait Encoder: Send + Sync {
    type Value;

    fn encode(&self, value: &Self::Value, indent: Option<usize>, out: &mut JsonWriter);
}

/// Encodes a value compactly.
pub fn encode<E: Encoder + ?Sized>(encoder: &E, value: &E::Value) -> String {
    let mut out = JsonWriter::new();
    encoder.encode(value, None, &mut out);
    out.into_string()
}

/// Encodes a value with two-space indentation.
pub fn encode_pretty<E: Encoder + ?Sized>(encoder: &E, value: &E::Value) -> String {
    let mut out = JsonWriter::new();
    encoder.encode(value, Some(0), &mut out);
    out.into_string()
}

macro_rules! display_encoder {
    ($(#[$doc:meta])* $name:ident, $value:ty) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl Encoder for $name {
            type Value = $value;

            fn encode(&self, value: &$value, _indent: Option<usize>, out: &mut JsonWriter) {
                out.push_display(value);
            }
        }
    };
}

display_encoder!(I8Encoder, i8);
display_encoder!(I16Encoder, i16);
display_encoder!(I32Encoder, i32);
display_encoder!(I64Encoder, i64);
display_encoder!(BigIntEncoder, BigInt);
display_encoder!(BigDecimalEncoder, BigDecimal);

#[derive(Debug, Clone, Copy, Default)]
pub struct BoolEncoder;

impl Encoder for BoolEncoder {
    type Value = bool;

    fn encode(&self, value: &bool, _indent: Option<usize>, out: &mut JsonWriter) {
        out.push_str(if *value { "true" } else { "false" });
    }
}

/// Non-finite floats have no JSON representation and are written as `null`.
#[derive(Debug, Clone, Copy, Default)]
pub struct F32Encoder;

impl Encoder for F32Encoder {
    type Value = f32;

    fn encode(&self, value: &f32, _indent: Option<usize>, out: &mut JsonWriter) {
        if value.is_finite() {
            out.push_display(value);
        } else {
            out.push_str("null");
        }
    }
}

/// Non-finite floats have no JSON representation and are written as `null`.
#[derive(Debug, Clone, Copy, Default)]
pub struct F64Encoder;

impl Encoder for F64Encoder {
    type Value = f64;

    fn encode(&self, value: &f64, _indent: Option<usize>, out: &mut JsonWriter) {
        if value.is_finite() {
            out.push_display(value);
        } else {
            out.push_str("null");
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StringEncoder;

impl Encoder for StringEncoder {
    type Value = String;

    fn encode(&self, value: &String, _indent: Option<usize>, out: &mut JsonWriter) {
        out.push('"');
        out.push_escaped(value);
        out.push('"');
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CharEncoder;

impl Encoder for CharEncoder {
    type Value = char;

    fn encode(&self, value: &char, _indent: Option<usize>, out: &mut JsonWriter) {
        let mut tmp = [0u8; 4];
        out.push('"');
        out.push_escaped(value.encode_utf8(&mut tmp));
        out.push('"');
    }
}

/// Unit is written as the empty object.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnitEncoder;

impl Encoder for UnitEncoder {
    type Value = ();

    fn encode(&self, _value: &(), _indent: Option<usize>, out: &mut JsonWriter) {
        out.push_str("{}");
    }
}

/// The capability to render a map key as raw (unescaped) text.
pub trait FieldEncoder: Send + Sync {
    type Value;

    fn encode_field(&self, key: &Self::Value) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StringFieldEncoder;

impl FieldEncoder for StringFieldEncoder {
    type Value = String;

    fn encode_field(&self, key: &String) -> String {
        key.clone()
    }
}

macro_rules! int_field_encoder {
    ($name:ident, $value:ty) => {
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl FieldEncoder for $name {
            type Value = $value;

            fn encode_field(&self, key: &$value) -> String {
                use alloc::string::ToString;
                key.to_string()
            }
        }
    };
}

int_field_encoder!(I8FieldEncoder, i8);
int_field_encoder!(I16FieldEncoder, i16);
int_field_encoder!(I32FieldEncoder, i32);
int_field_encoder!(I64FieldEncoder, i64);
