//! Breadcrumb traces describing where in a document a decode failed.
//!
//! A [`Trace`] is built tip-first: the deepest frame (always a
//! [`TraceFrame::Message`]) is pushed first, and each composite decoder pushes
//! its own frame while the error propagates outward. Rendering reverses the
//! stack, producing jq-style paths such as
//! `.rows[0].elements[0].distance.value(missing)`.

use alloc::{string::String, sync::Arc, vec::Vec};
use core::fmt;

/// One breadcrumb on the path to a decode failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceFrame {
    /// An object field, rendered as `.name`.
    Field(Arc<str>),
    /// An array index, rendered as `[i]`.
    Index(usize),
    /// A sum-type variant, rendered as `{tag}`.
    Variant(Arc<str>),
    /// The failure message itself, rendered as `(text)`.
    Message(String),
}

/// A tip-first stack of [`TraceFrame`]s.
///
/// Non-empty exactly when a decode has failed; never mutated after the error
/// reaches the entry point.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Trace(Vec<TraceFrame>);

impl Trace {
    pub(crate) fn of(frame: TraceFrame) -> Self {
        let mut frames = Vec::with_capacity(4);
        frames.push(frame);
        Self(frames)
    }

    pub(crate) fn push(&mut self, frame: TraceFrame) {
        self.0.push(frame);
    }

    /// The frames in tip-first order (most recent first).
    #[must_use]
    pub fn frames(&self) -> &[TraceFrame] {
        &self.0
    }
}

impl fmt::Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for frame in self.0.iter().rev() {
            match frame {
                TraceFrame::Field(name) => write!(f, ".{name}")?,
                TraceFrame::Index(i) => write!(f, "[{i}]")?,
                TraceFrame::Variant(tag) => write!(f, "{{{tag}}}")?,
                TraceFrame::Message(text) => write!(f, "({text})")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::{Trace, TraceFrame};

    #[test]
    fn renders_reversed() {
        let mut trace = Trace::of(TraceFrame::Message("missing".into()));
        trace.push(TraceFrame::Field("value".into()));
        trace.push(TraceFrame::Field("distance".into()));
        trace.push(TraceFrame::Index(0));
        trace.push(TraceFrame::Field("elements".into()));
        trace.push(TraceFrame::Index(0));
        trace.push(TraceFrame::Field("rows".into()));
        assert_eq!(
            trace.to_string(),
            ".rows[0].elements[0].distance.value(missing)"
        );
    }

    #[test]
    fn renders_variant_frames() {
        let mut trace = Trace::of(TraceFrame::Message("expected an Int".into()));
        trace.push(TraceFrame::Variant("Circle".into()));
        assert_eq!(trace.to_string(), "{Circle}(expected an Int)");
    }
}
