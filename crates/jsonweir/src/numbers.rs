//! Bounded numeric parsing from a [`RetractReader`].
//!
//! Every parser here consumes the JSON number grammar
//! `[-]digit+(.digit+)?([eE][+-]?digit+)?` and over-reads exactly one
//! terminator character; the caller retracts once afterwards. A redundant
//! leading `+` on exponents is accepted for compatibility.
//!
//! Overflow of the target type, a digit count past the configured bit budget
//! for the arbitrary-precision targets, or a shape mismatch (a fraction where
//! an integer is required) all collapse into the [`UnsafeNumber`] sentinel;
//! the lexer above turns it into the `expected a <Type>` diagnostic. Digit
//! counts are checked during the scan, before any big-number allocation.

use alloc::string::String;
use core::str::FromStr;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;

use crate::reader::RetractReader;

/// Sentinel raised for any number the caller's target type cannot hold.
#[derive(Debug)]
pub(crate) struct UnsafeNumber;

type NumResult<T> = Result<T, UnsafeNumber>;

fn next(r: &mut (impl RetractReader + ?Sized)) -> Option<char> {
    r.read_char().ok()
}

/// Parses an `i64`, accumulating in negative space so `i64::MIN` parses
/// without overflow.
pub(crate) fn long<R: RetractReader + ?Sized>(r: &mut R) -> NumResult<i64> {
    let mut c = next(r).ok_or(UnsafeNumber)?;
    let negative = c == '-';
    if negative {
        c = next(r).ok_or(UnsafeNumber)?;
    }
    let mut acc = match c.to_digit(10) {
        Some(d) => -i64::from(d),
        None => return Err(UnsafeNumber),
    };
    loop {
        match next(r) {
            None => break,
            Some(c) => match c.to_digit(10) {
                Some(d) => {
                    acc = acc
                        .checked_mul(10)
                        .and_then(|a| a.checked_sub(i64::from(d)))
                        .ok_or(UnsafeNumber)?;
                }
                None if matches!(c, '.' | 'e' | 'E') => return Err(UnsafeNumber),
                None => break,
            },
        }
    }
    if negative {
        Ok(acc)
    } else {
        acc.checked_neg().ok_or(UnsafeNumber)
    }
}

pub(crate) fn byte<R: RetractReader + ?Sized>(r: &mut R) -> NumResult<i8> {
    i8::try_from(long(r)?).map_err(|_| UnsafeNumber)
}

pub(crate) fn short<R: RetractReader + ?Sized>(r: &mut R) -> NumResult<i16> {
    i16::try_from(long(r)?).map_err(|_| UnsafeNumber)
}

pub(crate) fn int<R: RetractReader + ?Sized>(r: &mut R) -> NumResult<i32> {
    i32::try_from(long(r)?).map_err(|_| UnsafeNumber)
}

/// Parses a `BigInt`, rejecting inputs with more than `max_digits` digits
/// before any big-number work happens.
pub(crate) fn big_integer<R: RetractReader + ?Sized>(
    r: &mut R,
    max_digits: usize,
) -> NumResult<BigInt> {
    let mut text = String::with_capacity(16);
    let mut c = next(r).ok_or(UnsafeNumber)?;
    if c == '-' {
        text.push('-');
        c = next(r).ok_or(UnsafeNumber)?;
    }
    if !c.is_ascii_digit() {
        return Err(UnsafeNumber);
    }
    text.push(c);
    let mut digits = 1usize;
    loop {
        match next(r) {
            None => break,
            Some(c) if c.is_ascii_digit() => {
                digits += 1;
                if digits > max_digits {
                    return Err(UnsafeNumber);
                }
                text.push(c);
            }
            Some('.' | 'e' | 'E') => return Err(UnsafeNumber),
            Some(_) => break,
        }
    }
    BigInt::parse_bytes(text.as_bytes(), 10).ok_or(UnsafeNumber)
}

/// Scans the full decimal grammar into `text`. `max_digits` bounds the
/// mantissa digit count when present; exponent digits are never a precision
/// hazard and stay unbounded.
fn scan_decimal<R: RetractReader + ?Sized>(
    r: &mut R,
    max_digits: Option<usize>,
) -> NumResult<String> {
    let mut text = String::with_capacity(24);
    let mut digits = 0usize;

    let mut push_digit = |text: &mut String, c: char| -> NumResult<()> {
        digits += 1;
        if max_digits.is_some_and(|cap| digits > cap) {
            return Err(UnsafeNumber);
        }
        text.push(c);
        Ok(())
    };

    let mut c = next(r).ok_or(UnsafeNumber)?;
    if c == '-' {
        text.push('-');
        c = next(r).ok_or(UnsafeNumber)?;
    }
    if !c.is_ascii_digit() {
        return Err(UnsafeNumber);
    }
    push_digit(&mut text, c)?;

    // Integer digits, then an optional fraction, then an optional exponent.
    let mut terminator = loop {
        match next(r) {
            None => return Ok(text),
            Some(c) if c.is_ascii_digit() => push_digit(&mut text, c)?,
            Some(c) => break c,
        }
    };

    if terminator == '.' {
        text.push('.');
        let c = next(r).ok_or(UnsafeNumber)?;
        if !c.is_ascii_digit() {
            return Err(UnsafeNumber);
        }
        push_digit(&mut text, c)?;
        terminator = loop {
            match next(r) {
                None => return Ok(text),
                Some(c) if c.is_ascii_digit() => push_digit(&mut text, c)?,
                Some(c) => break c,
            }
        };
    }

    if matches!(terminator, 'e' | 'E') {
        text.push('e');
        let mut c = next(r).ok_or(UnsafeNumber)?;
        if matches!(c, '+' | '-') {
            if c == '-' {
                text.push('-');
            }
            c = next(r).ok_or(UnsafeNumber)?;
        }
        if !c.is_ascii_digit() {
            return Err(UnsafeNumber);
        }
        text.push(c);
        loop {
            match next(r) {
                None => return Ok(text),
                Some(c) if c.is_ascii_digit() => text.push(c),
                Some(_) => return Ok(text),
            }
        }
    }

    Ok(text)
}

pub(crate) fn float<R: RetractReader + ?Sized>(r: &mut R) -> NumResult<f32> {
    scan_decimal(r, None)?.parse().map_err(|_| UnsafeNumber)
}

pub(crate) fn double<R: RetractReader + ?Sized>(r: &mut R) -> NumResult<f64> {
    scan_decimal(r, None)?.parse().map_err(|_| UnsafeNumber)
}

pub(crate) fn big_decimal<R: RetractReader + ?Sized>(
    r: &mut R,
    max_digits: usize,
) -> NumResult<BigDecimal> {
    let text = scan_decimal(r, Some(max_digits))?;
    BigDecimal::from_str(&text).map_err(|_| UnsafeNumber)
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;
    use crate::reader::StrReader;

    fn parse_long(input: &str) -> NumResult<i64> {
        long(&mut StrReader::new(input))
    }

    #[test]
    fn long_bounds() {
        assert_eq!(parse_long("0").unwrap(), 0);
        assert_eq!(parse_long("-42,").unwrap(), -42);
        assert_eq!(parse_long("9223372036854775807").unwrap(), i64::MAX);
        assert_eq!(parse_long("-9223372036854775808").unwrap(), i64::MIN);
        assert!(parse_long("9223372036854775808").is_err());
        assert!(parse_long("-9223372036854775809").is_err());
    }

    #[test]
    fn integers_reject_fractions() {
        assert!(parse_long("4.2").is_err());
        assert!(parse_long("1e3").is_err());
        assert!(int(&mut StrReader::new("4.2")).is_err());
    }

    #[test]
    fn narrow_widths_are_range_checked() {
        assert_eq!(byte(&mut StrReader::new("-128")).unwrap(), i8::MIN);
        assert!(byte(&mut StrReader::new("128")).is_err());
        assert_eq!(short(&mut StrReader::new("32767")).unwrap(), i16::MAX);
        assert!(short(&mut StrReader::new("32768")).is_err());
    }

    #[test]
    fn over_read_is_retractable() {
        let mut r = StrReader::new("42}");
        assert_eq!(long(&mut r).unwrap(), 42);
        r.retract();
        assert_eq!(r.read_char().unwrap(), '}');
    }

    #[test]
    fn doubles_accept_exponent_forms() {
        let mut r = StrReader::new("-1.25e+3 ");
        assert_eq!(double(&mut r).unwrap(), -1250.0);
        assert_eq!(double(&mut StrReader::new("1E-2,")).unwrap(), 0.01);
        assert!(double(&mut StrReader::new("1.")).is_err());
        assert!(double(&mut StrReader::new("1e")).is_err());
    }

    #[test]
    fn big_integer_respects_digit_cap() {
        let fifty_digits = "1".repeat(50);
        assert!(big_integer(&mut StrReader::new(&fifty_digits), 39).is_err());
        let ok = big_integer(&mut StrReader::new("-170141183460469231731687303715884105728"), 39)
            .unwrap();
        assert_eq!(ok.to_string(), "-170141183460469231731687303715884105728");
    }

    #[test]
    fn big_decimal_keeps_scale() {
        let v = big_decimal(&mut StrReader::new("1.50,"), 39).unwrap();
        assert_eq!(v.to_string(), "1.50");
    }
}
