//! A pull-style streaming JSON decoder, a push-style encoder, and the shape
//! machinery that wires record and sum types to them.
//!
//! The decoder is a single forward pass over a retractable character reader:
//! field names dispatch through a bitset trie ([`StringMatrix`]) without
//! allocation, numbers parse under a configurable precision cap, and every
//! failure carries a jq-style path such as
//! `.rows[0].elements[0].distance.value(missing)`. The [`Chunker`] frames
//! whole top-level documents out of an arbitrarily segmented byte stream.

#![no_std]
extern crate alloc;

#[cfg(any(feature = "std", test))]
extern crate std;

mod chunker;
mod collections;
mod config;
mod decoder;
mod encoder;
mod error;
mod escaped;
pub mod lexer;
mod matrix;
mod numbers;
mod reader;
mod record;
mod sum;
mod trace;

pub use chunker::{ChunkError, Chunker, ChunkerBuilder};
#[cfg(feature = "std")]
pub use chunker::{decode_reader, StreamError};
pub use collections::{
    Either, EitherDecoder, EitherEncoder, MapDecoder, MapEncoder, OptionDecoder, OptionEncoder,
    SetDecoder, SetEncoder, VecDecoder, VecEncoder,
};
pub use config::{number_max_bits, DEFAULT_NUMBER_BITS};
pub use decoder::{
    decode, decode_bytes, BigDecimalDecoder, BigIntDecoder, BoolDecoder, CharDecoder, Decoder,
    F32Decoder, F64Decoder, FieldDecoder, I16Decoder, I16FieldDecoder, I32Decoder,
    I32FieldDecoder, I64Decoder, I64FieldDecoder, I8Decoder, I8FieldDecoder, StringDecoder,
    StringFieldDecoder, UnitDecoder,
};
pub use encoder::{
    encode, encode_pretty, BigDecimalEncoder, BigIntEncoder, BoolEncoder, CharEncoder, Encoder,
    F32Encoder, F64Encoder, FieldEncoder, I16Encoder, I16FieldEncoder, I32Encoder,
    I32FieldEncoder, I64Encoder, I64FieldEncoder, I8Encoder, I8FieldEncoder, JsonWriter,
    StringEncoder, StringFieldEncoder, UnitEncoder,
};
pub use error::DecodeError;
pub use matrix::StringMatrix;
pub use reader::{ByteReader, RetractReader, StrReader};
pub use record::{take, RecordDecoder, RecordDecoderBuilder, RecordEncoder, RecordEncoderBuilder, Slot};
pub use sum::{
    cast, TaggedSumDecoder, TaggedSumDecoderBuilder, TaggedSumEncoder, TaggedSumEncoderBuilder,
    WrapperSumDecoder, WrapperSumDecoderBuilder, WrapperSumEncoder, WrapperSumEncoderBuilder,
};
pub use trace::{Trace, TraceFrame};

#[cfg(test)]
mod tests;
