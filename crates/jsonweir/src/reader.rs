//! Retractable character sources.
//!
//! Decoding is a single forward pass with one character of lookahead: after
//! any successful read, exactly one [`RetractReader::retract`] restores the
//! character before the next read. A retract directly after an end-of-input
//! read is a permitted no-op, which lets the number parsers keep their
//! "over-read one, caller retracts" contract at the end of the input.

use crate::error::DecodeError;

/// Sentinel for "no consume to undo".
const NO_RETRACT: usize = usize::MAX;

/// A single-use forward character source with one-character unread.
pub trait RetractReader {
    /// Reads the next character, failing with [`DecodeError::UnexpectedEnd`]
    /// at end of input.
    fn read_char(&mut self) -> Result<char, DecodeError>;

    /// Reads the next raw byte without UTF-8 decoding.
    fn read_raw_byte(&mut self) -> Result<u8, DecodeError>;

    /// Restores the last read character. Retracting twice without an
    /// intervening read is a programmer error.
    fn retract(&mut self);

    /// Reads the next character that is not JSON whitespace (space, tab,
    /// carriage return, line feed).
    fn next_non_whitespace(&mut self) -> Result<char, DecodeError> {
        loop {
            let c = self.read_char()?;
            if !matches!(c, ' ' | '\t' | '\r' | '\n') {
                return Ok(c);
            }
        }
    }
}

/// A [`RetractReader`] over an in-memory string.
#[derive(Debug)]
pub struct StrReader<'a> {
    input: &'a str,
    pos: usize,
    last_width: usize,
}

impl<'a> StrReader<'a> {
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            last_width: NO_RETRACT,
        }
    }
}

impl RetractReader for StrReader<'_> {
    fn read_char(&mut self) -> Result<char, DecodeError> {
        match self.input[self.pos..].chars().next() {
            Some(c) => {
                self.last_width = c.len_utf8();
                self.pos += self.last_width;
                Ok(c)
            }
            None => {
                self.last_width = 0;
                Err(DecodeError::UnexpectedEnd)
            }
        }
    }

    fn read_raw_byte(&mut self) -> Result<u8, DecodeError> {
        match self.input.as_bytes().get(self.pos) {
            Some(&b) => {
                self.last_width = 1;
                self.pos += 1;
                Ok(b)
            }
            None => {
                self.last_width = 0;
                Err(DecodeError::UnexpectedEnd)
            }
        }
    }

    fn retract(&mut self) {
        assert!(self.last_width != NO_RETRACT, "retract without a read");
        self.pos -= self.last_width;
        self.last_width = NO_RETRACT;
    }
}

/// A [`RetractReader`] over raw bytes, UTF-8 decoded on the fly.
///
/// Malformed UTF-8 surfaces as [`DecodeError::UnexpectedEnd`]; the only
/// errors raised at this layer are about running out of usable input, all
/// syntactic diagnostics belong to the lexer.
#[derive(Debug)]
pub struct ByteReader<'a> {
    input: &'a [u8],
    pos: usize,
    last_width: usize,
}

impl<'a> ByteReader<'a> {
    #[must_use]
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            pos: 0,
            last_width: NO_RETRACT,
        }
    }

    fn continuation(&mut self, acc: u32) -> Option<u32> {
        let b = *self.input.get(self.pos)?;
        if b & 0xC0 != 0x80 {
            return None;
        }
        self.pos += 1;
        Some((acc << 6) | u32::from(b & 0x3F))
    }
}

impl RetractReader for ByteReader<'_> {
    fn read_char(&mut self) -> Result<char, DecodeError> {
        let start = self.pos;
        let fail = |r: &mut Self| {
            r.pos = start;
            r.last_width = 0;
            Err(DecodeError::UnexpectedEnd)
        };

        let Some(&b0) = self.input.get(self.pos) else {
            return fail(self);
        };
        self.pos += 1;

        let decoded = if b0 < 0x80 {
            Some(u32::from(b0))
        } else if b0 & 0xE0 == 0xC0 {
            self.continuation(u32::from(b0 & 0x1F))
        } else if b0 & 0xF0 == 0xE0 {
            self.continuation(u32::from(b0 & 0x0F))
                .and_then(|acc| self.continuation(acc))
        } else if b0 & 0xF8 == 0xF0 {
            self.continuation(u32::from(b0 & 0x07))
                .and_then(|acc| self.continuation(acc))
                .and_then(|acc| self.continuation(acc))
        } else {
            None
        };

        match decoded.and_then(char::from_u32) {
            Some(c) => {
                self.last_width = self.pos - start;
                Ok(c)
            }
            None => fail(self),
        }
    }

    fn read_raw_byte(&mut self) -> Result<u8, DecodeError> {
        match self.input.get(self.pos) {
            Some(&b) => {
                self.last_width = 1;
                self.pos += 1;
                Ok(b)
            }
            None => {
                self.last_width = 0;
                Err(DecodeError::UnexpectedEnd)
            }
        }
    }

    fn retract(&mut self) {
        assert!(self.last_width != NO_RETRACT, "retract without a read");
        self.pos -= self.last_width;
        self.last_width = NO_RETRACT;
    }
}
