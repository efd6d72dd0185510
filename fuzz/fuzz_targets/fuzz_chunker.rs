#![no_main]
use arbitrary::Arbitrary;
use jsonweir::ChunkerBuilder;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input<'a> {
    payload: &'a [u8],
    split_seed: u64,
}

/// Framing must not depend on segmentation: feeding the payload whole and
/// feeding it in seed-derived pieces has to emit identical documents.
fuzz_target!(|input: Input<'_>| {
    let mut whole = Vec::new();
    let mut chunker = ChunkerBuilder::new().build(|doc: &[u8]| whole.push(doc.to_vec()));
    if chunker.accept(input.payload).is_err() {
        return;
    }
    let whole_finish = chunker.finish().is_ok();
    drop(chunker);

    let mut split = Vec::new();
    let mut chunker = ChunkerBuilder::new().build(|doc: &[u8]| split.push(doc.to_vec()));
    let mut rest = input.payload;
    while !rest.is_empty() {
        let take = (input.split_seed as usize % rest.len()) + 1;
        let (head, tail) = rest.split_at(take);
        if chunker.accept(head).is_err() {
            return;
        }
        rest = tail;
    }
    let split_finish = chunker.finish().is_ok();
    drop(chunker);

    assert_eq!(whole, split);
    assert_eq!(whole_finish, split_finish);
});
