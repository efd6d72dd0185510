//! Assembling whole JSON documents out of an arbitrarily segmented byte
//! stream.
//!
//! A [`Chunker`] tracks brace/bracket depth and in-string state across
//! [`Chunker::accept`] calls and invokes its callback with the byte slice of
//! every balanced top-level value, including bare primitives. Whitespace
//! between documents is discarded. The framer never validates grammar beyond
//! what framing needs; a malformed document is handed to the decoder, which
//! owns the diagnostics.

use alloc::vec::Vec;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChunkError {
    #[error("document exceeds {max} bytes")]
    DocumentTooLarge { max: usize },
    #[error("truncated document at end of stream")]
    TruncatedDocument,
}

/// Options for a [`Chunker`].
#[derive(Debug, Clone, Copy)]
pub struct ChunkerBuilder {
    max_doc_bytes: usize,
    strict: bool,
}

impl Default for ChunkerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ChunkerBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_doc_bytes: usize::MAX,
            strict: false,
        }
    }

    /// Upper bound on a single document's size; exceeding it fails the
    /// stream instead of buffering without limit.
    #[must_use]
    pub fn max_doc_bytes(mut self, max: usize) -> Self {
        self.max_doc_bytes = max;
        self
    }

    /// When set, a partial trailing document at end-of-stream is an error;
    /// otherwise it is discarded.
    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn build<F: FnMut(&[u8])>(self, callback: F) -> Chunker<F> {
        Chunker {
            buf: Vec::new(),
            depth: 0,
            in_string: false,
            escape: false,
            in_scalar: false,
            max_doc_bytes: self.max_doc_bytes,
            strict: self.strict,
            callback,
        }
    }
}

/// Stateful boundary detector over a byte stream.
pub struct Chunker<F> {
    buf: Vec<u8>,
    depth: usize,
    in_string: bool,
    escape: bool,
    in_scalar: bool,
    max_doc_bytes: usize,
    strict: bool,
    callback: F,
}

fn is_json_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n')
}

impl<F: FnMut(&[u8])> Chunker<F> {
    /// Feeds more bytes; the callback fires once per completed document.
    pub fn accept(&mut self, bytes: &[u8]) -> Result<(), ChunkError> {
        for &b in bytes {
            self.step(b)?;
        }
        Ok(())
    }

    /// Signals end-of-stream, flushing a trailing bare primitive. An open
    /// document fails in strict mode and is discarded otherwise.
    pub fn finish(&mut self) -> Result<(), ChunkError> {
        if self.in_scalar && !self.in_string && self.depth == 0 {
            self.emit();
            return Ok(());
        }
        if !self.buf.is_empty() || self.in_string || self.depth > 0 {
            if self.strict {
                return Err(ChunkError::TruncatedDocument);
            }
            self.buf.clear();
            self.depth = 0;
            self.in_string = false;
            self.escape = false;
            self.in_scalar = false;
        }
        Ok(())
    }

    fn step(&mut self, b: u8) -> Result<(), ChunkError> {
        if self.in_string {
            self.push(b)?;
            if self.escape {
                self.escape = false;
            } else if b == b'\\' {
                self.escape = true;
            } else if b == b'"' {
                self.in_string = false;
                if self.depth == 0 {
                    self.emit();
                }
            }
            return Ok(());
        }

        if self.in_scalar {
            if is_json_whitespace(b) {
                self.emit();
                return Ok(());
            }
            if !matches!(b, b'{' | b'[' | b'"') {
                return self.push(b);
            }
            // A structural opener ends the primitive and starts the next
            // document.
            self.emit();
        }

        if is_json_whitespace(b) {
            return if self.depth == 0 {
                Ok(())
            } else {
                self.push(b)
            };
        }

        match b {
            b'{' | b'[' => {
                self.depth += 1;
                self.push(b)
            }
            b'}' | b']' => {
                self.push(b)?;
                self.depth = self.depth.saturating_sub(1);
                if self.depth == 0 {
                    self.emit();
                }
                Ok(())
            }
            b'"' => {
                self.in_string = true;
                self.escape = false;
                self.push(b)
            }
            _ => {
                if self.depth == 0 {
                    self.in_scalar = true;
                }
                self.push(b)
            }
        }
    }

    fn push(&mut self, b: u8) -> Result<(), ChunkError> {
        if self.buf.len() >= self.max_doc_bytes {
            return Err(ChunkError::DocumentTooLarge {
                max: self.max_doc_bytes,
            });
        }
        self.buf.push(b);
        Ok(())
    }

    fn emit(&mut self) {
        (self.callback)(&self.buf);
        self.buf.clear();
        self.in_scalar = false;
    }
}

#[cfg(feature = "std")]
pub use io_driver::{decode_reader, StreamError};

#[cfg(feature = "std")]
mod io_driver {
    use alloc::string::String;
    use alloc::vec;

    use thiserror::Error;

    use super::{ChunkError, ChunkerBuilder};
    use crate::decoder::{decode_bytes, Decoder};

    /// 64 KiB, the read granularity for file-sized inputs.
    const READ_BUF_BYTES: usize = 64 * 1024;

    #[derive(Error, Debug)]
    pub enum StreamError {
        #[error(transparent)]
        Io(#[from] std::io::Error),
        #[error(transparent)]
        Chunk(#[from] ChunkError),
    }

    /// Frames and decodes every top-level JSON document in `input`,
    /// delivering each decode result to `sink`. Returns the document count.
    ///
    /// Line-delimited JSON is the expected shape but any whitespace
    /// separation works; framing is independent of read segmentation.
    pub fn decode_reader<D, R, F>(
        decoder: &D,
        mut input: R,
        options: ChunkerBuilder,
        mut sink: F,
    ) -> Result<usize, StreamError>
    where
        D: Decoder,
        R: std::io::Read,
        F: FnMut(Result<D::Value, String>),
    {
        let mut documents = 0usize;
        let mut chunker = options.build(|doc: &[u8]| {
            documents += 1;
            sink(decode_bytes(decoder, doc));
        });
        let mut buf = vec![0u8; READ_BUF_BYTES];
        loop {
            let n = input.read(&mut buf)?;
            if n == 0 {
                break;
            }
            chunker.accept(&buf[..n])?;
        }
        chunker.finish()?;
        drop(chunker);
        Ok(documents)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::{ChunkError, ChunkerBuilder};

    fn frame(input: &[u8], chunk_size: usize) -> Result<Vec<Vec<u8>>, ChunkError> {
        let mut docs = Vec::new();
        let mut chunker = ChunkerBuilder::new().build(|doc: &[u8]| docs.push(doc.to_vec()));
        for chunk in input.chunks(chunk_size.max(1)) {
            chunker.accept(chunk)?;
        }
        chunker.finish()?;
        drop(chunker);
        Ok(docs)
    }

    #[test]
    fn frames_ndjson_in_tiny_segments() {
        let docs = frame(b"{\"a\":1}\n{\"a\":2}\n", 3).unwrap();
        assert_eq!(docs, [b"{\"a\":1}".to_vec(), b"{\"a\":2}".to_vec()]);
    }

    #[test]
    fn braces_inside_strings_do_not_count() {
        let docs = frame(br#"{"a":"}{"}[1,2]"#, 1).unwrap();
        assert_eq!(docs[0], br#"{"a":"}{"}"#.to_vec());
        assert_eq!(docs[1], b"[1,2]".to_vec());
    }

    #[test]
    fn top_level_primitives_are_documents() {
        let docs = frame(b"1 true \"x\" null", 2).unwrap();
        assert_eq!(
            docs,
            [
                b"1".to_vec(),
                b"true".to_vec(),
                b"\"x\"".to_vec(),
                b"null".to_vec()
            ]
        );
    }

    #[test]
    fn strict_rejects_trailing_partial() {
        let mut chunker = ChunkerBuilder::new().strict(true).build(|_| {});
        chunker.accept(b"{\"a\":").unwrap();
        assert_eq!(chunker.finish(), Err(ChunkError::TruncatedDocument));
    }

    #[test]
    fn lenient_discards_trailing_partial() {
        let mut docs = 0usize;
        let mut chunker = ChunkerBuilder::new().build(|_| docs += 1);
        chunker.accept(b"[1] [2").unwrap();
        chunker.finish().unwrap();
        drop(chunker);
        assert_eq!(docs, 1);
    }

    #[test]
    fn oversized_document_fails() {
        let mut chunker = ChunkerBuilder::new().max_doc_bytes(4).build(|_| {});
        assert_eq!(
            chunker.accept(b"[1,2,3]"),
            Err(ChunkError::DocumentTooLarge { max: 4 })
        );
    }
}
