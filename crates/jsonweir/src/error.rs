use alloc::string::String;

use thiserror::Error;

use crate::trace::{Trace, TraceFrame};

/// A decode failure.
///
/// `UnexpectedEnd` is the reader's only failure mode and carries no location;
/// every syntactic or semantic mismatch is `Invalid` with a full [`Trace`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("{0}")]
    Invalid(Trace),
}

impl DecodeError {
    pub(crate) fn message(text: impl Into<String>) -> Self {
        Self::Invalid(Trace::of(TraceFrame::Message(text.into())))
    }

    /// Push `frame` onto the trace while unwinding out of a composite
    /// decoder. `UnexpectedEnd` stays bare.
    #[must_use]
    pub(crate) fn with_frame(self, frame: TraceFrame) -> Self {
        match self {
            Self::Invalid(mut trace) => {
                trace.push(frame);
                Self::Invalid(trace)
            }
            Self::UnexpectedEnd => Self::UnexpectedEnd,
        }
    }
}
