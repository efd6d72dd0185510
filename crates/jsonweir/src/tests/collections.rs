use alloc::collections::{BTreeMap, BTreeSet};
use alloc::string::{String, ToString};
use alloc::vec;

use crate::{
    decode, encode, encode_pretty, Either, EitherDecoder, EitherEncoder, I32Decoder, I32Encoder,
    I64FieldDecoder, MapDecoder, MapEncoder, SetDecoder, StringDecoder, StringFieldDecoder,
    StringFieldEncoder, VecDecoder, VecEncoder,
};

#[test]
fn either_selects_a_side() {
    let decoder = EitherDecoder::new(I32Decoder, StringDecoder);
    assert_eq!(decode(&decoder, r#"{"left":1}"#), Ok(Either::Left(1)));
    assert_eq!(decode(&decoder, r#"{"Left":1}"#), Ok(Either::Left(1)));
    assert_eq!(decode(&decoder, r#"{"a":1}"#), Ok(Either::Left(1)));
    assert_eq!(
        decode(&decoder, r#"{"right":"x"}"#),
        Ok(Either::Right(String::from("x")))
    );
}

#[test]
fn either_rejects_both_sides_present() {
    let decoder = EitherDecoder::new(I32Decoder, I32Decoder);
    assert_eq!(
        decode(&decoder, r#"{"left":1,"right":2}"#),
        Err("(ambiguous either, both present)".to_string())
    );
}

#[test]
fn either_rejects_neither_side() {
    let decoder = EitherDecoder::new(I32Decoder, I32Decoder);
    assert_eq!(decode(&decoder, "{}"), Err("(missing fields)".to_string()));
}

#[test]
fn either_encoder_round_trips() {
    let encoder = EitherEncoder::new(I32Encoder, crate::StringEncoder);
    let decoder = EitherDecoder::new(I32Decoder, StringDecoder);
    let json = encode(&encoder, &Either::<i32, String>::Left(9));
    assert_eq!(json, r#"{"Left":9}"#);
    assert_eq!(decode(&decoder, &json), Ok(Either::Left(9)));
}

#[test]
fn vec_elements_carry_index_frames() {
    let decoder = VecDecoder(I32Decoder);
    assert_eq!(decode(&decoder, "[1, 2, 3]"), Ok(vec![1, 2, 3]));
    let err = decode(&decoder, r#"[1,"x",3]"#).unwrap_err();
    assert_eq!(err, "[1](expected an Int)");
}

#[test]
fn array_framing_errors() {
    let decoder = VecDecoder(I32Decoder);
    assert_eq!(
        decode(&decoder, "[1;2]"),
        Err("(expected ',' or ']' got ';')".to_string())
    );
}

#[test]
fn maps_decode_keys_through_field_decoders() {
    let decoder = MapDecoder::new(StringFieldDecoder, I32Decoder);
    let mut expected = BTreeMap::new();
    expected.insert(String::from("one"), 1);
    expected.insert(String::from("two"), 2);
    assert_eq!(decode(&decoder, r#"{"one":1,"two":2}"#), Ok(expected));

    let by_id = MapDecoder::new(I64FieldDecoder, StringDecoder);
    let mut expected = BTreeMap::new();
    expected.insert(7i64, String::from("seven"));
    assert_eq!(decode(&by_id, r#"{"7":"seven"}"#), Ok(expected));
}

#[test]
fn map_key_failures_name_the_key() {
    let decoder = MapDecoder::new(I64FieldDecoder, I32Decoder);
    let err = decode(&decoder, r#"{"x":1}"#).unwrap_err();
    assert_eq!(err, ".x(expected a Long)");
}

#[test]
fn map_value_failures_name_the_key() {
    let decoder = MapDecoder::new(StringFieldDecoder, I32Decoder);
    let err = decode(&decoder, r#"{"a":1,"b":"x"}"#).unwrap_err();
    assert_eq!(err, ".b(expected an Int)");
}

#[test]
fn sets_deduplicate() {
    let decoder = SetDecoder(I32Decoder);
    let mut expected = BTreeSet::new();
    expected.extend([1, 2, 3]);
    assert_eq!(decode(&decoder, "[1,2,2,3,1]"), Ok(expected));
}

#[test]
fn pretty_output_indents_by_two() {
    let encoder = VecEncoder(I32Encoder);
    assert_eq!(
        encode_pretty(&encoder, &vec![1, 2]),
        "[\n  1,\n  2\n]"
    );
    assert_eq!(encode_pretty(&encoder, &vec![]), "[]");

    let map_encoder = MapEncoder::new(StringFieldEncoder, VecEncoder(I32Encoder));
    let mut map = BTreeMap::new();
    map.insert(String::from("xs"), vec![1]);
    assert_eq!(
        encode_pretty(&map_encoder, &map),
        "{\n  \"xs\": [\n    1\n  ]\n}"
    );
}
