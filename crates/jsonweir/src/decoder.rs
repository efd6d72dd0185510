//! The decoder protocol and the scalar decoders.
//!
//! A [`Decoder`] is an immutable, shareable description of how to consume one
//! JSON value; decoding is a single recursive-descent pass over a
//! [`RetractReader`]. The [`Decoder::missing`] hook is what a record decoder
//! invokes for absent fields, so `Option` can produce `None` where everything
//! else reports `missing`.

use alloc::borrow::ToOwned;
use alloc::format;
use alloc::string::{String, ToString};

use bigdecimal::BigDecimal;
use num_bigint::BigInt;

use crate::error::DecodeError;
use crate::lexer;
use crate::reader::{ByteReader, RetractReader, StrReader};

/// The capability to consume one JSON value of type [`Decoder::Value`].
pub trait Decoder: Send + Sync {
    type Value;

    /// Consumes one value from the reader, leaving it positioned just past
    /// the value.
    fn decode(&self, reader: &mut dyn RetractReader) -> Result<Self::Value, DecodeError>;

    /// Fallback for an absent record field.
    fn missing(&self) -> Result<Self::Value, DecodeError> {
        Err(DecodeError::message("missing"))
    }
}

/// Decodes a value of type `A` from JSON text.
///
/// The error string is the rendered failure trace, e.g.
/// `.rows[0].elements[0].distance.value(missing)`.
pub fn decode<D: Decoder + ?Sized>(decoder: &D, input: &str) -> Result<D::Value, String> {
    let mut reader = StrReader::new(input);
    decoder.decode(&mut reader).map_err(|e| e.to_string())
}

/// Decodes a value of type `A` from raw JSON bytes.
pub fn decode_bytes<D: Decoder + ?Sized>(decoder: &D, input: &[u8]) -> Result<D::Value, String> {
    let mut reader = ByteReader::new(input);
    decoder.decode(&mut reader).map_err(|e| e.to_string())
}

macro_rules! scalar_decoder {
    ($(#[$doc:meta])* $name:ident, $value:ty, $read:path) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl Decoder for $name {
            type Value = $value;

            fn decode(&self, reader: &mut dyn RetractReader) -> Result<$value, DecodeError> {
                $read(reader)
            }
        }
    };
}

scalar_decoder!(BoolDecoder, bool, lexer::boolean);
scalar_decoder!(StringDecoder, String, lexer::string);
scalar_decoder!(I8Decoder, i8, lexer::byte);
scalar_decoder!(I16Decoder, i16, lexer::short);
scalar_decoder!(I32Decoder, i32, lexer::int);
scalar_decoder!(I64Decoder, i64, lexer::long);
scalar_decoder!(
    /// Arbitrary-precision integer, bounded by the configured bit cap.
    BigIntDecoder,
    BigInt,
    lexer::big_integer
);
scalar_decoder!(F32Decoder, f32, lexer::float);
scalar_decoder!(F64Decoder, f64, lexer::double);
scalar_decoder!(
    /// Arbitrary-precision decimal, bounded by the configured bit cap.
    BigDecimalDecoder,
    BigDecimal,
    lexer::big_decimal
);

/// Decodes a one-character JSON string.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharDecoder;

impl Decoder for CharDecoder {
    type Value = char;

    fn decode(&self, reader: &mut dyn RetractReader) -> Result<char, DecodeError> {
        let s = lexer::string(reader)?;
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(DecodeError::message("expected a single character")),
        }
    }
}

/// Decodes `null` or `{}` as the unit value.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnitDecoder;

impl Decoder for UnitDecoder {
    type Value = ();

    fn decode(&self, reader: &mut dyn RetractReader) -> Result<(), DecodeError> {
        match reader.next_non_whitespace()? {
            'n' => lexer::read_chars(reader, &['u', 'l', 'l'], "null"),
            '{' => lexer::char(reader, '}'),
            c => Err(DecodeError::message(format!("unexpected '{c}'"))),
        }
    }
}

/// The capability to decode a map key from an already-materialized string.
pub trait FieldDecoder: Send + Sync {
    type Value;

    fn decode_field(&self, key: &str) -> Result<Self::Value, DecodeError>;
}

/// Passes map keys through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringFieldDecoder;

impl FieldDecoder for StringFieldDecoder {
    type Value = String;

    fn decode_field(&self, key: &str) -> Result<String, DecodeError> {
        Ok(key.to_owned())
    }
}

macro_rules! int_field_decoder {
    ($name:ident, $value:ty, $expected:literal) => {
        /// Parses map keys as integers.
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl FieldDecoder for $name {
            type Value = $value;

            fn decode_field(&self, key: &str) -> Result<$value, DecodeError> {
                key.parse().map_err(|_| DecodeError::message($expected))
            }
        }
    };
}

int_field_decoder!(I8FieldDecoder, i8, "expected a Byte");
int_field_decoder!(I16FieldDecoder, i16, "expected a Short");
int_field_decoder!(I32FieldDecoder, i32, "expected an Int");
int_field_decoder!(I64FieldDecoder, i64, "expected a Long");
