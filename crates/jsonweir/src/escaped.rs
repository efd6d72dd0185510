//! A sub-reader that presents the logical contents of a JSON string.
//!
//! [`EscapedString`] sits between the lexer and a [`RetractReader`] positioned
//! just past the opening quote. Each [`EscapedString::read`] yields the next
//! materialized codepoint, resolving escape sequences on demand, and `-1` once
//! the closing quote has been consumed. Surrogate pairs in `\uXXXX` escapes
//! are combined into the supplementary codepoint; an unpaired surrogate is an
//! error.

use alloc::format;

use crate::error::DecodeError;
use crate::reader::RetractReader;

pub(crate) struct EscapedString<'a, R: ?Sized> {
    reader: &'a mut R,
}

impl<'a, R: RetractReader + ?Sized> EscapedString<'a, R> {
    pub(crate) fn new(reader: &'a mut R) -> Self {
        Self { reader }
    }

    /// Returns the next codepoint of the string, or `-1` when the closing
    /// quote is consumed.
    pub(crate) fn read(&mut self) -> Result<i32, DecodeError> {
        let c = self.reader.read_char()?;
        match c {
            '"' => Ok(-1),
            '\\' => self.escape(),
            c if (c as u32) < 0x20 => Err(DecodeError::message("invalid control in string")),
            c => Ok(c as i32),
        }
    }

    fn escape(&mut self) -> Result<i32, DecodeError> {
        let c = self.reader.read_char()?;
        match c {
            '"' => Ok('"' as i32),
            '\\' => Ok('\\' as i32),
            '/' => Ok('/' as i32),
            'b' => Ok(0x08),
            'f' => Ok(0x0C),
            'n' => Ok('\n' as i32),
            'r' => Ok('\r' as i32),
            't' => Ok('\t' as i32),
            'u' => self.charcode(),
            c => Err(DecodeError::message(format!("invalid '\\{c}' in string"))),
        }
    }

    fn charcode(&mut self) -> Result<i32, DecodeError> {
        let hi = self.hex4()?;
        if (0xDC00..=0xDFFF).contains(&hi) {
            // A low surrogate with no preceding high half.
            return Err(DecodeError::message("invalid charcode in string"));
        }
        if (0xD800..=0xDBFF).contains(&hi) {
            if self.reader.read_char()? != '\\' || self.reader.read_char()? != 'u' {
                return Err(DecodeError::message("invalid charcode in string"));
            }
            let lo = self.hex4()?;
            if !(0xDC00..=0xDFFF).contains(&lo) {
                return Err(DecodeError::message("invalid charcode in string"));
            }
            let combined = 0x10000 + ((hi - 0xD800) << 10) + (lo - 0xDC00);
            return Ok(combined as i32);
        }
        Ok(hi as i32)
    }

    fn hex4(&mut self) -> Result<u32, DecodeError> {
        let mut value = 0u32;
        for _ in 0..4 {
            let c = self.reader.read_char()?;
            let digit = c
                .to_digit(16)
                .ok_or_else(|| DecodeError::message("invalid charcode in string"))?;
            value = (value << 4) | digit;
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use super::EscapedString;
    use crate::reader::StrReader;

    fn drain(input: &str) -> Result<String, crate::DecodeError> {
        // Inputs start just past the opening quote.
        let mut reader = StrReader::new(input);
        let mut escaped = EscapedString::new(&mut reader);
        let mut out = String::new();
        loop {
            let c = escaped.read()?;
            if c == -1 {
                return Ok(out);
            }
            out.push(char::from_u32(c as u32).unwrap());
        }
    }

    #[test]
    fn plain_and_simple_escapes() {
        assert_eq!(drain(r#"a\n\t\"\\b""#).unwrap(), "a\n\t\"\\b");
        assert_eq!(drain(r#"\/\b\f\r""#).unwrap(), "/\u{8}\u{c}\r");
    }

    #[test]
    fn unicode_escape() {
        assert_eq!(drain("\\u0041\"").unwrap(), "A");
        assert_eq!(drain("\\u00e9\"").unwrap(), "é");
        assert_eq!(drain("\\u00E9\"").unwrap(), "é");
    }

    #[test]
    fn surrogate_pair_combines() {
        assert_eq!(drain("\\uD83D\\uDE00\"").unwrap(), "😀");
    }

    #[test]
    fn unpaired_surrogate_is_rejected() {
        let err = drain(r#"\uD83D x""#).unwrap_err();
        assert_eq!(
            alloc::string::ToString::to_string(&err),
            "(invalid charcode in string)"
        );
    }

    #[test]
    fn bad_escape_letter() {
        let err = drain(r#"\q""#).unwrap_err();
        assert_eq!(
            alloc::string::ToString::to_string(&err),
            r"(invalid '\q' in string)"
        );
    }

    #[test]
    fn raw_control_character() {
        let err = drain("a\u{1}b\"").unwrap_err();
        assert_eq!(
            alloc::string::ToString::to_string(&err),
            "(invalid control in string)"
        );
    }

    #[test]
    fn malformed_hex() {
        let err = drain(r#"\u00zz""#).unwrap_err();
        assert_eq!(
            alloc::string::ToString::to_string(&err),
            "(invalid charcode in string)"
        );
    }
}
