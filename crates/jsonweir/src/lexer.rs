//! Token-level JSON grammar primitives.
//!
//! Everything here operates on a [`RetractReader`] and raises
//! [`DecodeError::Invalid`] with a message frame on mismatch; composite
//! decoders add the positional frames while unwinding. The numeric readers
//! also accept the string-wrapped form (`"42"` parses wherever `42` does).

use alloc::format;
use alloc::string::String;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;

use crate::config;
use crate::encoder::JsonWriter;
use crate::error::DecodeError;
use crate::escaped::EscapedString;
use crate::matrix::StringMatrix;
use crate::numbers::{self, UnsafeNumber};
use crate::reader::RetractReader;

/// Expects `"` (retracting it) or `}` after whitespace; true means the
/// object has at least one field.
pub fn first_object<R: RetractReader + ?Sized>(r: &mut R) -> Result<bool, DecodeError> {
    match r.next_non_whitespace()? {
        '"' => {
            r.retract();
            Ok(true)
        }
        '}' => Ok(false),
        c => Err(DecodeError::message(format!(
            "expected string or '}}' got '{c}'"
        ))),
    }
}

/// True when another field follows, false at the closing brace.
pub fn next_object<R: RetractReader + ?Sized>(r: &mut R) -> Result<bool, DecodeError> {
    match r.next_non_whitespace()? {
        ',' => Ok(true),
        '}' => Ok(false),
        c => Err(DecodeError::message(format!(
            "expected ',' or '}}' got '{c}'"
        ))),
    }
}

/// True when the array has at least one element; the first element's leading
/// character is retracted.
pub fn first_array<R: RetractReader + ?Sized>(r: &mut R) -> Result<bool, DecodeError> {
    match r.next_non_whitespace()? {
        ']' => Ok(false),
        _ => {
            r.retract();
            Ok(true)
        }
    }
}

/// True when another element follows, false at the closing bracket.
pub fn next_array<R: RetractReader + ?Sized>(r: &mut R) -> Result<bool, DecodeError> {
    match r.next_non_whitespace()? {
        ',' => Ok(true),
        ']' => Ok(false),
        c => Err(DecodeError::message(format!(
            "expected ',' or ']' got '{c}'"
        ))),
    }
}

/// Requires `expected` after whitespace.
pub fn char<R: RetractReader + ?Sized>(r: &mut R, expected: char) -> Result<(), DecodeError> {
    let c = r.next_non_whitespace()?;
    if c == expected {
        Ok(())
    } else {
        Err(DecodeError::message(format!(
            "expected '{expected}' got '{c}'"
        )))
    }
}

/// Requires `expected` with no whitespace skipping.
pub fn char_only<R: RetractReader + ?Sized>(r: &mut R, expected: char) -> Result<(), DecodeError> {
    let c = r.read_char()?;
    if c == expected {
        Ok(())
    } else {
        Err(DecodeError::message(format!(
            "expected '{expected}' got '{c}'"
        )))
    }
}

/// Verbatim match of a fixed character sequence, e.g. `ull` after a leading
/// `n`.
pub fn read_chars<R: RetractReader + ?Sized>(
    r: &mut R,
    expected: &[char],
    errmsg: &str,
) -> Result<(), DecodeError> {
    for &e in expected {
        if r.read_char()? != e {
            return Err(DecodeError::message(format!("expected '{errmsg}'")));
        }
    }
    Ok(())
}

/// Matches `true` or `false`.
pub fn boolean<R: RetractReader + ?Sized>(r: &mut R) -> Result<bool, DecodeError> {
    match r.next_non_whitespace()? {
        't' => {
            read_chars(r, &['r', 'u', 'e'], "true")?;
            Ok(true)
        }
        'f' => {
            read_chars(r, &['a', 'l', 's', 'e'], "false")?;
            Ok(false)
        }
        c => Err(DecodeError::message(format!(
            "expected 'true' or 'false' got '{c}'"
        ))),
    }
}

/// Reads a field name through the streaming matcher and consumes the `:`.
/// Returns the matched ordinal or -1.
pub fn field<R: RetractReader + ?Sized>(
    r: &mut R,
    matrix: &StringMatrix,
) -> Result<i32, DecodeError> {
    let ord = ordinal(r, matrix)?;
    char(r, ':')?;
    Ok(ord)
}

/// Reads a string through the streaming matcher without consuming a `:`.
/// Returns the matched ordinal or -1.
pub fn ordinal<R: RetractReader + ?Sized>(
    r: &mut R,
    matrix: &StringMatrix,
) -> Result<i32, DecodeError> {
    char(r, '"')?;
    let mut escaped = EscapedString::new(r);
    let mut mask = matrix.initial();
    let mut i = 0usize;
    loop {
        let c = escaped.read()?;
        if c == -1 {
            break;
        }
        mask = matrix.update(mask, i, c);
        i += 1;
    }
    Ok(matrix.first(matrix.exact(mask, i)))
}

/// Reads a full JSON string into a buffered value.
pub fn string<R: RetractReader + ?Sized>(r: &mut R) -> Result<String, DecodeError> {
    char(r, '"')?;
    let mut escaped = EscapedString::new(r);
    let mut out = String::new();
    loop {
        let c = escaped.read()?;
        if c == -1 {
            return Ok(out);
        }
        let c = char::from_u32(c as u32)
            .ok_or_else(|| DecodeError::message("invalid charcode in string"))?;
        out.push(c);
    }
}

fn number<R: RetractReader + ?Sized, T>(
    r: &mut R,
    parse: impl FnOnce(&mut R) -> Result<T, UnsafeNumber>,
    expected: &'static str,
) -> Result<T, DecodeError> {
    match r.next_non_whitespace()? {
        '"' => {
            // String-wrapped number: the over-read terminator must be the
            // closing quote.
            let value = parse(r).map_err(|_: UnsafeNumber| DecodeError::message(expected))?;
            r.retract();
            char_only(r, '"')?;
            Ok(value)
        }
        '-' | '0'..='9' => {
            r.retract();
            let value = parse(r).map_err(|_: UnsafeNumber| DecodeError::message(expected))?;
            r.retract();
            Ok(value)
        }
        c => Err(DecodeError::message(format!("expected a number, got {c}"))),
    }
}

pub fn byte<R: RetractReader + ?Sized>(r: &mut R) -> Result<i8, DecodeError> {
    number(r, numbers::byte, "expected a Byte")
}

pub fn short<R: RetractReader + ?Sized>(r: &mut R) -> Result<i16, DecodeError> {
    number(r, numbers::short, "expected a Short")
}

pub fn int<R: RetractReader + ?Sized>(r: &mut R) -> Result<i32, DecodeError> {
    number(r, numbers::int, "expected an Int")
}

pub fn long<R: RetractReader + ?Sized>(r: &mut R) -> Result<i64, DecodeError> {
    number(r, numbers::long, "expected a Long")
}

pub fn big_integer<R: RetractReader + ?Sized>(r: &mut R) -> Result<BigInt, DecodeError> {
    number(
        r,
        |r| numbers::big_integer(r, config::number_max_digits()),
        "expected a BigInteger",
    )
}

pub fn float<R: RetractReader + ?Sized>(r: &mut R) -> Result<f32, DecodeError> {
    number(r, numbers::float, "expected a Float")
}

pub fn double<R: RetractReader + ?Sized>(r: &mut R) -> Result<f64, DecodeError> {
    number(r, numbers::double, "expected a Double")
}

pub fn big_decimal<R: RetractReader + ?Sized>(r: &mut R) -> Result<BigDecimal, DecodeError> {
    number(
        r,
        |r| numbers::big_decimal(r, config::number_max_digits()),
        "expected a BigDecimal",
    )
}

fn emit(out: &mut Option<&mut JsonWriter>, c: char) {
    if let Some(w) = out.as_deref_mut() {
        w.push(c);
    }
}

fn emit_str(out: &mut Option<&mut JsonWriter>, s: &str) {
    if let Some(w) = out.as_deref_mut() {
        w.push_str(s);
    }
}

/// Copies string characters verbatim (escapes untouched) up to and including
/// the closing quote. The opening quote has already been consumed and echoed.
fn copy_string<R: RetractReader + ?Sized>(
    r: &mut R,
    out: &mut Option<&mut JsonWriter>,
) -> Result<(), DecodeError> {
    let mut escape = false;
    loop {
        let c = r.read_char()?;
        emit(out, c);
        if escape {
            escape = false;
        } else if c == '\\' {
            escape = true;
        } else if c == '"' {
            return Ok(());
        }
    }
}

/// Recursively consumes one JSON value, optionally echoing its normalized
/// form: whitespace between tokens is dropped, string contents pass through
/// verbatim, commas and colons are reinserted.
pub fn skip_value<R: RetractReader + ?Sized>(
    r: &mut R,
    mut out: Option<&mut JsonWriter>,
) -> Result<(), DecodeError> {
    match r.next_non_whitespace()? {
        '{' => {
            emit(&mut out, '{');
            if first_object(r)? {
                loop {
                    char(r, '"')?;
                    emit(&mut out, '"');
                    copy_string(r, &mut out)?;
                    char(r, ':')?;
                    emit(&mut out, ':');
                    skip_value(r, out.as_deref_mut())?;
                    if !next_object(r)? {
                        break;
                    }
                    emit(&mut out, ',');
                }
            }
            emit(&mut out, '}');
            Ok(())
        }
        '[' => {
            emit(&mut out, '[');
            if first_array(r)? {
                loop {
                    skip_value(r, out.as_deref_mut())?;
                    if !next_array(r)? {
                        break;
                    }
                    emit(&mut out, ',');
                }
            }
            emit(&mut out, ']');
            Ok(())
        }
        '"' => {
            emit(&mut out, '"');
            copy_string(r, &mut out)
        }
        't' => {
            read_chars(r, &['r', 'u', 'e'], "true")?;
            emit_str(&mut out, "true");
            Ok(())
        }
        'f' => {
            read_chars(r, &['a', 'l', 's', 'e'], "false")?;
            emit_str(&mut out, "false");
            Ok(())
        }
        'n' => {
            read_chars(r, &['u', 'l', 'l'], "null")?;
            emit_str(&mut out, "null");
            Ok(())
        }
        c @ ('-' | '0'..='9') => {
            emit(&mut out, c);
            loop {
                match r.read_char() {
                    Err(_) => return Ok(()),
                    Ok(c @ ('0'..='9' | '.' | 'e' | 'E' | '+' | '-')) => emit(&mut out, c),
                    Ok(_) => {
                        r.retract();
                        return Ok(());
                    }
                }
            }
        }
        c => Err(DecodeError::message(format!("unexpected '{c}'"))),
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;
    use crate::encoder::JsonWriter;
    use crate::reader::StrReader;

    #[test]
    fn object_framing() {
        let mut r = StrReader::new("{ }");
        char(&mut r, '{').unwrap();
        assert!(!first_object(&mut r).unwrap());

        let mut r = StrReader::new("{ \"a\" ");
        char(&mut r, '{').unwrap();
        assert!(first_object(&mut r).unwrap());
        assert_eq!(r.read_char().unwrap(), '"');
    }

    #[test]
    fn framing_errors_name_the_offender() {
        let mut r = StrReader::new("{ 1 }");
        char(&mut r, '{').unwrap();
        assert_eq!(
            first_object(&mut r).unwrap_err().to_string(),
            "(expected string or '}' got '1')"
        );

        let mut r = StrReader::new("; ");
        assert_eq!(
            next_array(&mut r).unwrap_err().to_string(),
            "(expected ',' or ']' got ';')"
        );
    }

    #[test]
    fn string_wrapped_numbers() {
        assert_eq!(int(&mut StrReader::new(" \"42\" ")).unwrap(), 42);
        assert_eq!(long(&mut StrReader::new("\"-7\"")).unwrap(), -7);
        assert_eq!(
            int(&mut StrReader::new("\"4x\"")).unwrap_err().to_string(),
            "(expected '\"' got 'x')"
        );
    }

    #[test]
    fn numeric_type_mismatch_messages() {
        assert_eq!(
            int(&mut StrReader::new("4.2")).unwrap_err().to_string(),
            "(expected an Int)"
        );
        assert_eq!(
            byte(&mut StrReader::new("999")).unwrap_err().to_string(),
            "(expected a Byte)"
        );
        assert_eq!(
            double(&mut StrReader::new("x")).unwrap_err().to_string(),
            "(expected a number, got x)"
        );
    }

    #[test]
    fn skip_value_normalizes() {
        let doc = r#" { "a" : [ 1 , true , "x\"y" ] , "b" : { } } "#;
        let mut r = StrReader::new(doc);
        let mut w = JsonWriter::new();
        skip_value(&mut r, Some(&mut w)).unwrap();
        assert_eq!(w.as_str(), r#"{"a":[1,true,"x\"y"],"b":{}}"#);
    }

    #[test]
    fn skip_value_without_echo() {
        let mut r = StrReader::new(r#"[[1,2],{"k":null}] ,"#);
        skip_value(&mut r, None).unwrap();
        assert_eq!(r.next_non_whitespace().unwrap(), ',');
    }
}
