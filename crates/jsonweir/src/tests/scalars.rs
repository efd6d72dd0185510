use alloc::string::{String, ToString};

use crate::{
    decode, decode_bytes, encode, BigDecimalDecoder, BigIntDecoder, BoolDecoder, F64Decoder,
    F64Encoder, I32Decoder, I64Decoder, I8Decoder, OptionDecoder, StringDecoder,
};

#[test]
fn decodes_ints_with_surrounding_whitespace() {
    assert_eq!(decode(&I32Decoder, "  42  "), Ok(42));
    assert_eq!(decode(&I32Decoder, "-7"), Ok(-7));
}

#[test]
fn decodes_stringified_numbers() {
    assert_eq!(decode(&I32Decoder, "\"42\""), Ok(42));
    assert_eq!(decode(&I64Decoder, " \"-9000000000\" "), Ok(-9_000_000_000));
    assert_eq!(decode(&F64Decoder, "\"2.5e2\""), Ok(250.0));
}

#[test]
fn int_rejects_fractions() {
    assert_eq!(decode(&I32Decoder, "4.2"), Err("(expected an Int)".to_string()));
}

#[test]
fn byte_rejects_out_of_range() {
    assert_eq!(decode(&I8Decoder, "200"), Err("(expected a Byte)".to_string()));
}

#[test]
fn booleans() {
    assert_eq!(decode(&BoolDecoder, "true"), Ok(true));
    assert_eq!(decode(&BoolDecoder, " false "), Ok(false));
    assert_eq!(
        decode(&BoolDecoder, "truth"),
        Err("(expected 'true')".to_string())
    );
}

#[test]
fn strings_materialize_escapes() {
    assert_eq!(
        decode(&StringDecoder, "\"a\\nb\\u0041\""),
        Ok(String::from("a\nbA"))
    );
}

#[test]
fn option_scalars() {
    assert_eq!(decode(&OptionDecoder(I32Decoder), "null"), Ok(None));
    assert_eq!(decode(&OptionDecoder(I32Decoder), "7"), Ok(Some(7)));
}

#[test]
fn decode_from_bytes() {
    assert_eq!(decode_bytes(&StringDecoder, "\"héllo\"".as_bytes()), Ok(String::from("héllo")));
}

#[test]
fn empty_input_is_unexpected_end() {
    assert_eq!(
        decode(&I32Decoder, ""),
        Err("unexpected end of input".to_string())
    );
}

#[test]
fn exponents_accept_redundant_plus() {
    assert_eq!(decode(&F64Decoder, "1e+3"), Ok(1000.0));
}

#[test]
fn big_integer_under_the_cap() {
    let v = decode(&BigIntDecoder, "170141183460469231731687303715884105727").unwrap();
    assert_eq!(v.to_string(), "170141183460469231731687303715884105727");
}

#[test]
fn big_integer_over_the_cap_is_rejected() {
    // The default 128-bit cap admits at most ceil(128*log10(2))+1 = 40
    // digits; one more must be rejected.
    assert_eq!(
        decode(&BigIntDecoder, &"9".repeat(40)).map(|v| v.to_string()),
        Ok("9".repeat(40))
    );
    assert_eq!(
        decode(&BigIntDecoder, &"9".repeat(41)),
        Err("(expected a BigInteger)".to_string())
    );
}

#[test]
fn big_decimal_over_the_cap_is_rejected() {
    let mut digits = String::from("0.");
    digits.push_str(&"9".repeat(41));
    assert_eq!(
        decode(&BigDecimalDecoder, &digits),
        Err("(expected a BigDecimal)".to_string())
    );
}

#[test]
fn big_decimal_preserves_scale() {
    let v = decode(&BigDecimalDecoder, "10.250").unwrap();
    assert_eq!(v.to_string(), "10.250");
}

#[test]
fn non_finite_floats_encode_as_null() {
    assert_eq!(encode(&F64Encoder, &f64::NAN), "null");
    assert_eq!(encode(&F64Encoder, &f64::INFINITY), "null");
}
