use alloc::vec::Vec;

/// Split `payload` into approximately equal-sized chunks.
///
/// # Panics
///
/// Panics if `parts` is zero.
pub fn produce_chunks(payload: &[u8], parts: usize) -> Vec<&[u8]> {
    assert!(parts > 0);
    let len = payload.len();
    let chunk_size = len.div_ceil(parts).max(1);
    payload.chunks(chunk_size).collect()
}

#[test]
fn chunks_cover_payload() {
    let payload = b"abcdefgh";
    for parts in 1..=10 {
        let chunks = produce_chunks(payload, parts);
        let total: Vec<u8> = chunks.concat();
        assert_eq!(total, payload);
    }
}
