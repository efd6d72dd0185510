//! Generic recursive-descent codecs for product types.
//!
//! A [`RecordDecoder`] is built from a shape description: the wire field
//! names (after any renaming), one child decoder per field, the
//! `no_extra_fields` flag, and a constructor over the filled slot array.
//! Decoding allocates exactly one slot array per call; field names are
//! matched through the [`StringMatrix`] without ever materializing them.
//!
//! Slots are type-erased `Box<dyn Any>` values; [`take`] is the downcasting
//! accessor constructors use. A slot is filled with exactly the child
//! decoder's value type, so the downcast is an invariant, not a runtime
//! question.

use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::Any;
use core::marker::PhantomData;

use crate::decoder::Decoder;
use crate::encoder::{key_separator, pad, Encoder, JsonWriter};
use crate::error::DecodeError;
use crate::lexer;
use crate::matrix::StringMatrix;
use crate::reader::RetractReader;
use crate::trace::TraceFrame;

/// A decoded field value awaiting the record constructor.
pub type Slot = Box<dyn Any + Send>;

/// Object-safe view of a [`Decoder`] producing type-erased slots.
pub(crate) trait SlotDecoder: Send + Sync {
    fn decode_slot(&self, reader: &mut dyn RetractReader) -> Result<Slot, DecodeError>;

    fn missing_slot(&self) -> Result<Slot, DecodeError>;
}

impl<D> SlotDecoder for D
where
    D: Decoder,
    D::Value: Send + 'static,
{
    fn decode_slot(&self, reader: &mut dyn RetractReader) -> Result<Slot, DecodeError> {
        self.decode(reader).map(|v| Box::new(v) as Slot)
    }

    fn missing_slot(&self) -> Result<Slot, DecodeError> {
        self.missing().map(|v| Box::new(v) as Slot)
    }
}

/// Moves the value at `index` out of the slot array, downcast to its
/// concrete type.
///
/// # Panics
///
/// Panics when the slot is empty or holds a different type; both are
/// impossible for slots filled by a [`RecordDecoder`] whose constructor
/// names the child decoders' value types.
#[must_use]
pub fn take<T: Any>(slots: &mut [Option<Slot>], index: usize) -> T {
    *slots[index]
        .take()
        .expect("record slot filled before construction")
        .downcast()
        .expect("record slot holds the child decoder's type")
}

type Construct<A> = Box<dyn Fn(&mut [Option<Slot>]) -> A + Send + Sync>;

/// Decoder for a product type.
pub struct RecordDecoder<A> {
    matrix: StringMatrix,
    spans: Box<[TraceFrame]>,
    children: Box<[Box<dyn SlotDecoder>]>,
    no_extra: bool,
    construct: Construct<A>,
}

impl<A> RecordDecoder<A> {
    #[must_use]
    pub fn builder() -> RecordDecoderBuilder<A> {
        RecordDecoderBuilder {
            names: Vec::new(),
            children: Vec::new(),
            no_extra: false,
            _marker: PhantomData,
        }
    }
}

/// Shape description for a [`RecordDecoder`].
pub struct RecordDecoderBuilder<A> {
    names: Vec<Arc<str>>,
    children: Vec<Box<dyn SlotDecoder>>,
    no_extra: bool,
    _marker: PhantomData<fn() -> A>,
}

impl<A> RecordDecoderBuilder<A> {
    /// Adds a field under its wire name (any rename annotation already
    /// applied) with its child decoder. Field names must be pairwise
    /// distinct and fewer than 64.
    #[must_use]
    pub fn field<D>(mut self, name: &str, child: D) -> Self
    where
        D: Decoder + 'static,
        D::Value: Send + 'static,
    {
        self.names.push(Arc::from(name));
        self.children.push(Box::new(child));
        self
    }

    /// Rejects unknown keys instead of skipping them.
    #[must_use]
    pub fn no_extra_fields(mut self) -> Self {
        self.no_extra = true;
        self
    }

    /// Finishes the shape with a constructor over the filled slot array.
    /// Use [`take`] to move each field out by ordinal.
    #[must_use]
    pub fn build(
        self,
        construct: impl Fn(&mut [Option<Slot>]) -> A + Send + Sync + 'static,
    ) -> RecordDecoder<A> {
        let names: Vec<&str> = self.names.iter().map(AsRef::as_ref).collect();
        let matrix = StringMatrix::new(&names);
        let spans: Vec<TraceFrame> = self
            .names
            .iter()
            .map(|n| TraceFrame::Field(n.clone()))
            .collect();
        RecordDecoder {
            matrix,
            spans: spans.into_boxed_slice(),
            children: self.children.into_boxed_slice(),
            no_extra: self.no_extra,
            construct: Box::new(construct),
        }
    }
}

impl<A> Decoder for RecordDecoder<A> {
    type Value = A;

    fn decode(&self, reader: &mut dyn RetractReader) -> Result<A, DecodeError> {
        lexer::char(reader, '{')?;
        let mut slots: Vec<Option<Slot>> = Vec::with_capacity(self.children.len());
        slots.resize_with(self.children.len(), || None);

        if lexer::first_object(reader)? {
            loop {
                let ordinal = lexer::field(reader, &self.matrix)?;
                if ordinal >= 0 {
                    let i = ordinal as usize;
                    if slots[i].is_some() {
                        return Err(
                            DecodeError::message("duplicate").with_frame(self.spans[i].clone())
                        );
                    }
                    let value = self.children[i]
                        .decode_slot(reader)
                        .map_err(|e| e.with_frame(self.spans[i].clone()))?;
                    slots[i] = Some(value);
                } else if self.no_extra {
                    return Err(DecodeError::message("invalid extra field"));
                } else {
                    lexer::skip_value(reader, None)?;
                }
                if !lexer::next_object(reader)? {
                    break;
                }
            }
        }

        for (i, slot) in slots.iter_mut().enumerate() {
            if slot.is_none() {
                let value = self.children[i]
                    .missing_slot()
                    .map_err(|e| e.with_frame(self.spans[i].clone()))?;
                *slot = Some(value);
            }
        }

        Ok((self.construct)(&mut slots))
    }
}

type WriteField<A> = Box<dyn Fn(&A, Option<usize>, &mut JsonWriter) + Send + Sync>;

/// Encoder for a product type, one extraction-plus-encode closure per field.
pub struct RecordEncoder<A> {
    fields: Box<[(Arc<str>, WriteField<A>)]>,
}

impl<A> RecordEncoder<A> {
    #[must_use]
    pub fn builder() -> RecordEncoderBuilder<A> {
        RecordEncoderBuilder { fields: Vec::new() }
    }

    /// Writes the fields without the surrounding braces; shared with the
    /// discriminated-sum encoder which splices a tag in front.
    pub(crate) fn encode_fields(&self, value: &A, indent: Option<usize>, out: &mut JsonWriter) {
        for (i, (name, write)) in self.fields.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            pad(out, indent);
            out.push('"');
            out.push_escaped(name);
            out.push('"');
            key_separator(out, indent);
            write(value, indent, out);
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Shape description for a [`RecordEncoder`].
pub struct RecordEncoderBuilder<A> {
    fields: Vec<(Arc<str>, WriteField<A>)>,
}

impl<A> RecordEncoderBuilder<A> {
    /// Adds a field: wire name, child encoder, and an accessor projecting
    /// the field out of the record.
    #[must_use]
    pub fn field<E, F>(mut self, name: &str, child: E, project: F) -> Self
    where
        E: Encoder + 'static,
        F: for<'a> Fn(&'a A) -> &'a E::Value + Send + Sync + 'static,
    {
        self.fields.push((
            Arc::from(name),
            Box::new(move |value, indent, out| child.encode(project(value), indent, out)),
        ));
        self
    }

    #[must_use]
    pub fn build(self) -> RecordEncoder<A> {
        RecordEncoder {
            fields: self.fields.into_boxed_slice(),
        }
    }
}

impl<A> Encoder for RecordEncoder<A> {
    type Value = A;

    fn encode(&self, value: &A, indent: Option<usize>, out: &mut JsonWriter) {
        out.push('{');
        if !self.is_empty() {
            self.encode_fields(value, indent.map(|i| i + 1), out);
            pad(out, indent);
        }
        out.push('}');
    }
}
