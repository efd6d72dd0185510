//! Generic codecs for tagged unions.
//!
//! Two wire encodings are supported. The wrapper-object form is
//! `{"Tag": <value>}` with exactly one key. The discriminator-field form
//! carries a designated key (e.g. `"type"`) whose string value selects the
//! variant; every other field is captured in normalized form and replayed
//! into the chosen variant's decoder once the tag is known, so field order
//! does not matter.

use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::Any;
use core::marker::PhantomData;

use crate::decoder::Decoder;
use crate::encoder::{key_separator, pad, Encoder, JsonWriter};
use crate::error::DecodeError;
use crate::lexer;
use crate::matrix::StringMatrix;
use crate::reader::{RetractReader, StrReader};
use crate::record::{RecordEncoder, Slot, SlotDecoder};
use crate::trace::TraceFrame;

/// Downcasts a variant's decoded slot to its concrete type.
///
/// # Panics
///
/// Panics when the slot holds a different type, which is impossible for
/// slots produced by the matching variant's child decoder.
#[must_use]
pub fn cast<T: Any>(slot: Slot) -> T {
    *slot
        .downcast()
        .expect("variant slot holds the child decoder's type")
}

type Finish<A> = Box<dyn Fn(usize, Slot) -> A + Send + Sync>;

struct Variants<A> {
    matrix: StringMatrix,
    spans: Box<[TraceFrame]>,
    children: Box<[Box<dyn SlotDecoder>]>,
    finish: Finish<A>,
}

struct VariantsBuilder<A> {
    names: Vec<Arc<str>>,
    children: Vec<Box<dyn SlotDecoder>>,
    _marker: PhantomData<fn() -> A>,
}

impl<A> VariantsBuilder<A> {
    fn new() -> Self {
        Self {
            names: Vec::new(),
            children: Vec::new(),
            _marker: PhantomData,
        }
    }

    fn variant<D>(&mut self, tag: &str, child: D)
    where
        D: Decoder + 'static,
        D::Value: Send + 'static,
    {
        self.names.push(Arc::from(tag));
        self.children.push(Box::new(child));
    }

    fn build(self, finish: impl Fn(usize, Slot) -> A + Send + Sync + 'static) -> Variants<A> {
        let names: Vec<&str> = self.names.iter().map(AsRef::as_ref).collect();
        let matrix = StringMatrix::new(&names);
        let spans: Vec<TraceFrame> = self
            .names
            .iter()
            .map(|n| TraceFrame::Variant(n.clone()))
            .collect();
        Variants {
            matrix,
            spans: spans.into_boxed_slice(),
            children: self.children.into_boxed_slice(),
            finish: Box::new(finish),
        }
    }
}

/// Decoder for the wrapper-object encoding `{"Tag": <value>}`.
pub struct WrapperSumDecoder<A> {
    variants: Variants<A>,
}

impl<A> WrapperSumDecoder<A> {
    #[must_use]
    pub fn builder() -> WrapperSumDecoderBuilder<A> {
        WrapperSumDecoderBuilder {
            inner: VariantsBuilder::new(),
        }
    }
}

pub struct WrapperSumDecoderBuilder<A> {
    inner: VariantsBuilder<A>,
}

impl<A> WrapperSumDecoderBuilder<A> {
    /// Adds a variant under its tag (any `hint` annotation already applied).
    #[must_use]
    pub fn variant<D>(mut self, tag: &str, child: D) -> Self
    where
        D: Decoder + 'static,
        D::Value: Send + 'static,
    {
        self.inner.variant(tag, child);
        self
    }

    /// Finishes the shape with a `(ordinal, slot) -> A` constructor; use
    /// [`cast`] on the slot.
    #[must_use]
    pub fn build(
        self,
        finish: impl Fn(usize, Slot) -> A + Send + Sync + 'static,
    ) -> WrapperSumDecoder<A> {
        WrapperSumDecoder {
            variants: self.inner.build(finish),
        }
    }
}

impl<A> Decoder for WrapperSumDecoder<A> {
    type Value = A;

    fn decode(&self, reader: &mut dyn RetractReader) -> Result<A, DecodeError> {
        lexer::char(reader, '{')?;
        if !lexer::first_object(reader)? {
            return Err(DecodeError::message("expected non-empty object"));
        }
        let ordinal = lexer::field(reader, &self.variants.matrix)?;
        if ordinal < 0 {
            return Err(DecodeError::message("invalid disambiguator"));
        }
        let i = ordinal as usize;
        let slot = self.variants.children[i]
            .decode_slot(reader)
            .map_err(|e| e.with_frame(self.variants.spans[i].clone()))?;
        // Exactly one key: a second field trips the brace check.
        lexer::char(reader, '}')?;
        Ok((self.variants.finish)(i, slot))
    }
}

/// Decoder for the discriminator-field encoding
/// `{"type": "Tag", ...variant fields...}`.
pub struct TaggedSumDecoder<A> {
    discriminator: Arc<str>,
    variants: Variants<A>,
}

impl<A> TaggedSumDecoder<A> {
    #[must_use]
    pub fn builder(discriminator: &str) -> TaggedSumDecoderBuilder<A> {
        TaggedSumDecoderBuilder {
            discriminator: Arc::from(discriminator),
            inner: VariantsBuilder::new(),
        }
    }
}

pub struct TaggedSumDecoderBuilder<A> {
    discriminator: Arc<str>,
    inner: VariantsBuilder<A>,
}

impl<A> TaggedSumDecoderBuilder<A> {
    /// Adds a variant under its tag; the child decoder receives the object
    /// with the discriminator removed.
    #[must_use]
    pub fn variant<D>(mut self, tag: &str, child: D) -> Self
    where
        D: Decoder + 'static,
        D::Value: Send + 'static,
    {
        self.inner.variant(tag, child);
        self
    }

    #[must_use]
    pub fn build(
        self,
        finish: impl Fn(usize, Slot) -> A + Send + Sync + 'static,
    ) -> TaggedSumDecoder<A> {
        TaggedSumDecoder {
            discriminator: self.discriminator,
            variants: self.inner.build(finish),
        }
    }
}

impl<A> Decoder for TaggedSumDecoder<A> {
    type Value = A;

    fn decode(&self, reader: &mut dyn RetractReader) -> Result<A, DecodeError> {
        lexer::char(reader, '{')?;
        let mut chosen: Option<usize> = None;
        let mut replay = JsonWriter::new();
        let mut captured = 0usize;

        if lexer::first_object(reader)? {
            loop {
                let key = lexer::string(reader)?;
                lexer::char(reader, ':')?;
                if *key == *self.discriminator {
                    if chosen.is_some() {
                        return Err(DecodeError::message(format!(
                            "duplicate disambiguator '{}'",
                            self.discriminator
                        )));
                    }
                    let ordinal = lexer::ordinal(reader, &self.variants.matrix)?;
                    if ordinal < 0 {
                        return Err(DecodeError::message(format!(
                            "invalid disambiguator in '{}'",
                            self.discriminator
                        )));
                    }
                    chosen = Some(ordinal as usize);
                } else {
                    if captured > 0 {
                        replay.push(',');
                    }
                    replay.push('"');
                    replay.push_escaped(&key);
                    replay.push('"');
                    replay.push(':');
                    lexer::skip_value(reader, Some(&mut replay))?;
                    captured += 1;
                }
                if !lexer::next_object(reader)? {
                    break;
                }
            }
        }

        let Some(i) = chosen else {
            return Err(DecodeError::message(format!(
                "missing disambiguator '{}'",
                self.discriminator
            )));
        };

        // Replay the captured fields as a fresh object for the variant.
        let mut document = String::with_capacity(replay.len() + 2);
        document.push('{');
        document.push_str(replay.as_str());
        document.push('}');
        let mut reader = StrReader::new(&document);
        let slot = self.variants.children[i]
            .decode_slot(&mut reader)
            .map_err(|e| e.with_frame(self.variants.spans[i].clone()))?;
        Ok((self.variants.finish)(i, slot))
    }
}

type WriteVariant<A> = Box<dyn Fn(&A, Option<usize>, &mut JsonWriter) + Send + Sync>;
type Select<A> = Box<dyn Fn(&A) -> usize + Send + Sync>;

/// Encoder for the wrapper-object encoding.
pub struct WrapperSumEncoder<A> {
    variants: Box<[(Arc<str>, WriteVariant<A>)]>,
    select: Select<A>,
}

impl<A> WrapperSumEncoder<A> {
    #[must_use]
    pub fn builder() -> WrapperSumEncoderBuilder<A> {
        WrapperSumEncoderBuilder {
            variants: Vec::new(),
        }
    }
}

pub struct WrapperSumEncoderBuilder<A> {
    variants: Vec<(Arc<str>, WriteVariant<A>)>,
}

impl<A> WrapperSumEncoderBuilder<A> {
    /// Adds a variant: tag, child encoder, and a projection that must only
    /// be called for values of this variant.
    #[must_use]
    pub fn variant<E, F>(mut self, tag: &str, child: E, project: F) -> Self
    where
        E: Encoder + 'static,
        F: for<'a> Fn(&'a A) -> &'a E::Value + Send + Sync + 'static,
    {
        self.variants.push((
            Arc::from(tag),
            Box::new(move |value, indent, out| child.encode(project(value), indent, out)),
        ));
        self
    }

    /// Finishes with the variant selector.
    #[must_use]
    pub fn build(self, select: impl Fn(&A) -> usize + Send + Sync + 'static) -> WrapperSumEncoder<A> {
        WrapperSumEncoder {
            variants: self.variants.into_boxed_slice(),
            select: Box::new(select),
        }
    }
}

impl<A> Encoder for WrapperSumEncoder<A> {
    type Value = A;

    fn encode(&self, value: &A, indent: Option<usize>, out: &mut JsonWriter) {
        let (tag, write) = &self.variants[(self.select)(value)];
        let inner = indent.map(|i| i + 1);
        out.push('{');
        pad(out, inner);
        out.push('"');
        out.push_escaped(tag);
        out.push('"');
        key_separator(out, inner);
        write(value, inner, out);
        pad(out, indent);
        out.push('}');
    }
}

/// Encoder for the discriminator-field encoding: the variant's record fields
/// with the discriminator pair spliced in front.
pub struct TaggedSumEncoder<A> {
    discriminator: Arc<str>,
    variants: Box<[(Arc<str>, RecordEncoder<A>)]>,
    select: Select<A>,
}

impl<A> TaggedSumEncoder<A> {
    #[must_use]
    pub fn builder(discriminator: &str) -> TaggedSumEncoderBuilder<A> {
        TaggedSumEncoderBuilder {
            discriminator: Arc::from(discriminator),
            variants: Vec::new(),
        }
    }
}

pub struct TaggedSumEncoderBuilder<A> {
    discriminator: Arc<str>,
    variants: Vec<(Arc<str>, RecordEncoder<A>)>,
}

impl<A> TaggedSumEncoderBuilder<A> {
    /// Adds a variant: tag and the record encoder for its fields. The
    /// record's projections must only be called for values of this variant.
    #[must_use]
    pub fn variant(mut self, tag: &str, fields: RecordEncoder<A>) -> Self {
        self.variants.push((Arc::from(tag), fields));
        self
    }

    #[must_use]
    pub fn build(self, select: impl Fn(&A) -> usize + Send + Sync + 'static) -> TaggedSumEncoder<A> {
        TaggedSumEncoder {
            discriminator: self.discriminator,
            variants: self.variants.into_boxed_slice(),
            select: Box::new(select),
        }
    }
}

impl<A> Encoder for TaggedSumEncoder<A> {
    type Value = A;

    fn encode(&self, value: &A, indent: Option<usize>, out: &mut JsonWriter) {
        let (tag, fields) = &self.variants[(self.select)(value)];
        let inner = indent.map(|i| i + 1);
        out.push('{');
        pad(out, inner);
        out.push('"');
        out.push_escaped(&self.discriminator);
        out.push('"');
        key_separator(out, inner);
        out.push('"');
        out.push_escaped(tag);
        out.push('"');
        if !fields.is_empty() {
            out.push(',');
            fields.encode_fields(value, inner, out);
        }
        pad(out, indent);
        out.push('}');
    }
}
