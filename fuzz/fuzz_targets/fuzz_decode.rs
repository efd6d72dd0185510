#![no_main]
use jsonweir::{
    decode_bytes, take, F64Decoder, I64Decoder, MapDecoder, OptionDecoder, RecordDecoder,
    StringDecoder, StringFieldDecoder, VecDecoder,
};
use libfuzzer_sys::fuzz_target;

fn fuzz_decoder() -> RecordDecoder<(i64, Option<f64>, Vec<String>)> {
    RecordDecoder::builder()
        .field("id", I64Decoder)
        .field("score", OptionDecoder(F64Decoder))
        .field("tags", VecDecoder(StringDecoder))
        .build(|slots| (take(slots, 0), take(slots, 1), take(slots, 2)))
}

fuzz_target!(|data: &[u8]| {
    // Any input must either decode or fail with a rendered trace; panics and
    // runaway allocation are the bugs being hunted.
    let _ = decode_bytes(&fuzz_decoder(), data);
    let _ = decode_bytes(&StringDecoder, data);
    let _ = decode_bytes(&VecDecoder(I64Decoder), data);
    let _ = decode_bytes(&MapDecoder::new(StringFieldDecoder, F64Decoder), data);
});
