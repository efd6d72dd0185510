//! Process-wide configuration.
//!
//! The single knob is the numeric bit cap: the precision a number parser may
//! allocate for one value, guarding against adversarial billion-digit
//! payloads. It is read once from the `JSON_NUMBER_BITS` environment variable
//! and never changes afterwards.

/// Default numeric bit cap.
pub const DEFAULT_NUMBER_BITS: u32 = 128;

/// The configured numeric bit cap.
///
/// Read once from `JSON_NUMBER_BITS` on first use (128 when unset or
/// unparsable). Without `std` the default is compiled in.
#[cfg(feature = "std")]
#[must_use]
pub fn number_max_bits() -> u32 {
    use std::sync::OnceLock;

    static BITS: OnceLock<u32> = OnceLock::new();
    *BITS.get_or_init(|| {
        std::env::var("JSON_NUMBER_BITS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_NUMBER_BITS)
    })
}

#[cfg(not(feature = "std"))]
#[must_use]
pub fn number_max_bits() -> u32 {
    DEFAULT_NUMBER_BITS
}

/// Decimal digit budget implied by the bit cap: `ceil(bits * log10(2)) + 1`
/// in integer arithmetic.
pub(crate) fn number_max_digits() -> usize {
    (number_max_bits() as usize * 30_103).div_ceil(100_000) + 1
}
