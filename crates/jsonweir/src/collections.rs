//! Codecs for containers: options, eithers, sequences, maps, and sets.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::decoder::{Decoder, FieldDecoder};
use crate::encoder::{key_separator, pad, Encoder, FieldEncoder, JsonWriter};
use crate::error::DecodeError;
use crate::lexer;
use crate::matrix::StringMatrix;
use crate::reader::RetractReader;
use crate::trace::TraceFrame;

/// A value of one of two types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Either<L, R> {
    Left(L),
    Right(R),
}

/// `null` (or an absent field) is `None`; anything else decodes the inner
/// value.
#[derive(Debug, Clone, Copy, Default)]
pub struct OptionDecoder<D>(pub D);

impl<D: Decoder> Decoder for OptionDecoder<D> {
    type Value = Option<D::Value>;

    fn decode(&self, reader: &mut dyn RetractReader) -> Result<Self::Value, DecodeError> {
        match reader.next_non_whitespace()? {
            'n' => {
                lexer::read_chars(reader, &['u', 'l', 'l'], "null")?;
                Ok(None)
            }
            _ => {
                reader.retract();
                self.0.decode(reader).map(Some)
            }
        }
    }

    fn missing(&self) -> Result<Self::Value, DecodeError> {
        Ok(None)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OptionEncoder<E>(pub E);

impl<E: Encoder> Encoder for OptionEncoder<E> {
    type Value = Option<E::Value>;

    fn encode(&self, value: &Self::Value, indent: Option<usize>, out: &mut JsonWriter) {
        match value {
            Some(v) => self.0.encode(v, indent, out),
            None => out.push_str("null"),
        }
    }
}

/// The candidate keys of the wrapper-object either encoding; the first three
/// select `Left`, the rest `Right`.
const EITHER_KEYS: [&str; 6] = ["a", "Left", "left", "b", "Right", "right"];

/// Wrapper-object decoder for [`Either`], accepting any of the keys `a`,
/// `Left`, `left` for the left side and `b`, `Right`, `right` for the right.
pub struct EitherDecoder<L, R> {
    left: L,
    right: R,
    matrix: StringMatrix,
    spans: [TraceFrame; 6],
}

impl<L, R> EitherDecoder<L, R> {
    #[must_use]
    pub fn new(left: L, right: R) -> Self {
        Self {
            left,
            right,
            matrix: StringMatrix::new(&EITHER_KEYS),
            spans: EITHER_KEYS.map(|k| TraceFrame::Field(Arc::from(k))),
        }
    }
}

impl<L: Decoder, R: Decoder> Decoder for EitherDecoder<L, R> {
    type Value = Either<L::Value, R::Value>;

    fn decode(&self, reader: &mut dyn RetractReader) -> Result<Self::Value, DecodeError> {
        lexer::char(reader, '{')?;
        let mut result: Option<Self::Value> = None;
        if lexer::first_object(reader)? {
            loop {
                let ordinal = lexer::field(reader, &self.matrix)?;
                if ordinal < 0 {
                    return Err(DecodeError::message("invalid disambiguator"));
                }
                let i = ordinal as usize;
                let is_left = i < 3;
                match &result {
                    Some(Either::Left(_)) if is_left => {
                        return Err(DecodeError::message("duplicate"))
                    }
                    Some(Either::Right(_)) if !is_left => {
                        return Err(DecodeError::message("duplicate"))
                    }
                    Some(_) => {
                        return Err(DecodeError::message("ambiguous either, both present"))
                    }
                    None => {}
                }
                let value = if is_left {
                    self.left
                        .decode(reader)
                        .map(Either::Left)
                        .map_err(|e| e.with_frame(self.spans[i].clone()))?
                } else {
                    self.right
                        .decode(reader)
                        .map(Either::Right)
                        .map_err(|e| e.with_frame(self.spans[i].clone()))?
                };
                result = Some(value);
                if !lexer::next_object(reader)? {
                    break;
                }
            }
        }
        result.ok_or_else(|| DecodeError::message("missing fields"))
    }
}

/// Encodes [`Either`] as `{"Left": <l>}` / `{"Right": <r>}`.
pub struct EitherEncoder<L, R> {
    left: L,
    right: R,
}

impl<L, R> EitherEncoder<L, R> {
    #[must_use]
    pub fn new(left: L, right: R) -> Self {
        Self { left, right }
    }
}

impl<L: Encoder, R: Encoder> Encoder for EitherEncoder<L, R> {
    type Value = Either<L::Value, R::Value>;

    fn encode(&self, value: &Self::Value, indent: Option<usize>, out: &mut JsonWriter) {
        let inner = indent.map(|i| i + 1);
        out.push('{');
        pad(out, inner);
        match value {
            Either::Left(l) => {
                out.push_str("\"Left\"");
                key_separator(out, inner);
                self.left.encode(l, inner, out);
            }
            Either::Right(r) => {
                out.push_str("\"Right\"");
                key_separator(out, inner);
                self.right.encode(r, inner, out);
            }
        }
        pad(out, indent);
        out.push('}');
    }
}

/// Decodes a JSON array into a `Vec`, tagging failures with the element
/// index.
#[derive(Debug, Clone, Copy, Default)]
pub struct VecDecoder<D>(pub D);

impl<D: Decoder> Decoder for VecDecoder<D> {
    type Value = Vec<D::Value>;

    fn decode(&self, reader: &mut dyn RetractReader) -> Result<Self::Value, DecodeError> {
        lexer::char(reader, '[')?;
        let mut out = Vec::new();
        if lexer::first_array(reader)? {
            let mut i = 0usize;
            loop {
                let value = self
                    .0
                    .decode(reader)
                    .map_err(|e| e.with_frame(TraceFrame::Index(i)))?;
                out.push(value);
                i += 1;
                if !lexer::next_array(reader)? {
                    break;
                }
            }
        }
        Ok(out)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct VecEncoder<E>(pub E);

impl<E: Encoder> Encoder for VecEncoder<E> {
    type Value = Vec<E::Value>;

    fn encode(&self, value: &Self::Value, indent: Option<usize>, out: &mut JsonWriter) {
        out.push('[');
        if !value.is_empty() {
            let inner = indent.map(|i| i + 1);
            for (i, v) in value.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                pad(out, inner);
                self.0.encode(v, inner, out);
            }
            pad(out, indent);
        }
        out.push(']');
    }
}

/// Decodes a JSON object into a `BTreeMap`. Keys go through a
/// [`FieldDecoder`]; a repeated key keeps the last value.
#[derive(Debug, Clone, Copy, Default)]
pub struct MapDecoder<KD, VD> {
    pub key: KD,
    pub value: VD,
}

impl<KD, VD> MapDecoder<KD, VD> {
    #[must_use]
    pub fn new(key: KD, value: VD) -> Self {
        Self { key, value }
    }
}

impl<KD, VD> Decoder for MapDecoder<KD, VD>
where
    KD: FieldDecoder,
    KD::Value: Ord,
    VD: Decoder,
{
    type Value = BTreeMap<KD::Value, VD::Value>;

    fn decode(&self, reader: &mut dyn RetractReader) -> Result<Self::Value, DecodeError> {
        lexer::char(reader, '{')?;
        let mut out = BTreeMap::new();
        if lexer::first_object(reader)? {
            loop {
                let key_text = lexer::string(reader)?;
                let frame = TraceFrame::Field(Arc::from(key_text.as_str()));
                let key = self
                    .key
                    .decode_field(&key_text)
                    .map_err(|e| e.with_frame(frame.clone()))?;
                lexer::char(reader, ':')?;
                let value = self
                    .value
                    .decode(reader)
                    .map_err(|e| e.with_frame(frame))?;
                out.insert(key, value);
                if !lexer::next_object(reader)? {
                    break;
                }
            }
        }
        Ok(out)
    }
}

pub struct MapEncoder<KE, VE> {
    pub key: KE,
    pub value: VE,
}

impl<KE, VE> MapEncoder<KE, VE> {
    #[must_use]
    pub fn new(key: KE, value: VE) -> Self {
        Self { key, value }
    }
}

impl<KE, VE> Encoder for MapEncoder<KE, VE>
where
    KE: FieldEncoder,
    KE::Value: Ord,
    VE: Encoder,
{
    type Value = BTreeMap<KE::Value, VE::Value>;

    fn encode(&self, value: &Self::Value, indent: Option<usize>, out: &mut JsonWriter) {
        out.push('{');
        if !value.is_empty() {
            let inner = indent.map(|i| i + 1);
            for (i, (k, v)) in value.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                pad(out, inner);
                let key: String = self.key.encode_field(k);
                out.push('"');
                out.push_escaped(&key);
                out.push('"');
                key_separator(out, inner);
                self.value.encode(v, inner, out);
            }
            pad(out, indent);
        }
        out.push('}');
    }
}

/// Decodes a JSON array into a `BTreeSet`, deduplicating by `Ord`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SetDecoder<D>(pub D);

impl<D> Decoder for SetDecoder<D>
where
    D: Decoder,
    D::Value: Ord,
{
    type Value = BTreeSet<D::Value>;

    fn decode(&self, reader: &mut dyn RetractReader) -> Result<Self::Value, DecodeError> {
        lexer::char(reader, '[')?;
        let mut out = BTreeSet::new();
        if lexer::first_array(reader)? {
            let mut i = 0usize;
            loop {
                let value = self
                    .0
                    .decode(reader)
                    .map_err(|e| e.with_frame(TraceFrame::Index(i)))?;
                out.insert(value);
                i += 1;
                if !lexer::next_array(reader)? {
                    break;
                }
            }
        }
        Ok(out)
    }
}

pub struct SetEncoder<E>(pub E);

impl<E> Encoder for SetEncoder<E>
where
    E: Encoder,
    E::Value: Ord,
{
    type Value = BTreeSet<E::Value>;

    fn encode(&self, value: &Self::Value, indent: Option<usize>, out: &mut JsonWriter) {
        out.push('[');
        if !value.is_empty() {
            let inner = indent.map(|i| i + 1);
            for (i, v) in value.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                pad(out, inner);
                self.0.encode(v, inner, out);
            }
            pad(out, indent);
        }
        out.push(']');
    }
}
