//! Constant-time field-name dispatch.
//!
//! A [`StringMatrix`] matches a streamed name against up to 63 candidates
//! without materializing the name. Candidates live in a dense
//! `width * height` codepoint table; the caller threads a 64-bit mask of
//! still-viable candidates through [`StringMatrix::update`] with strictly
//! increasing character indices, narrows by length with
//! [`StringMatrix::exact`], and extracts the winner with
//! [`StringMatrix::first`].

use alloc::vec;
use alloc::vec::Vec;

/// Immutable codepoint table over a fixed candidate set.
#[derive(Debug, Clone)]
pub struct StringMatrix {
    width: usize,
    height: usize,
    lengths: Vec<usize>,
    initial: u64,
    matrix: Vec<i32>,
}

impl StringMatrix {
    /// Builds the table from 1..=63 non-empty candidate names.
    ///
    /// # Panics
    ///
    /// Panics on an empty candidate set, more than 63 candidates, or an
    /// empty candidate, all of which are programmer errors in a codec
    /// definition.
    #[must_use]
    pub fn new(xs: &[&str]) -> Self {
        assert!(
            !xs.is_empty() && xs.len() < 64,
            "field dispatch requires 1..=63 candidates"
        );
        let width = xs.len();
        let lengths: Vec<usize> = xs.iter().map(|x| x.chars().count()).collect();
        assert!(
            lengths.iter().all(|&len| len > 0),
            "candidate names must be non-empty"
        );
        let height = lengths.iter().copied().max().unwrap_or(0);

        let mut matrix = vec![-1i32; width * height];
        for (s, x) in xs.iter().enumerate() {
            for (c, ch) in x.chars().enumerate() {
                matrix[c * width + s] = ch as i32;
            }
        }

        Self {
            width,
            height,
            lengths,
            initial: (1u64 << width) - 1,
            matrix,
        }
    }

    /// The mask with every candidate bit set.
    #[must_use]
    pub fn initial(&self) -> u64 {
        self.initial
    }

    /// Clears the bit of every candidate whose character at `char_index`
    /// differs from `c`. Returns 0 once the mask is empty or the input has
    /// outgrown every candidate.
    #[must_use]
    pub fn update(&self, mask: u64, char_index: usize, c: i32) -> u64 {
        if char_index >= self.height || mask == 0 {
            return 0;
        }
        let row = &self.matrix[char_index * self.width..(char_index + 1) * self.width];
        if mask == self.initial {
            // Dense fast path: at steady state most lookups start here and
            // the loop is branch-predictable.
            let mut out = 0u64;
            for (s, &cell) in row.iter().enumerate() {
                if cell == c {
                    out |= 1 << s;
                }
            }
            out
        } else {
            let mut out = mask;
            let mut bits = mask;
            while bits != 0 {
                let s = bits.trailing_zeros() as usize;
                if row[s] != c {
                    out &= !(1 << s);
                }
                bits &= bits - 1;
            }
            out
        }
    }

    /// Clears candidates whose length differs from `length`, removing
    /// candidates the input is a proper prefix of.
    #[must_use]
    pub fn exact(&self, mask: u64, length: usize) -> u64 {
        let mut out = mask;
        let mut bits = mask;
        while bits != 0 {
            let s = bits.trailing_zeros() as usize;
            if self.lengths[s] != length {
                out &= !(1 << s);
            }
            bits &= bits - 1;
        }
        out
    }

    /// The lowest surviving candidate index, or -1.
    #[must_use]
    pub fn first(&self, mask: u64) -> i32 {
        if mask == 0 {
            -1
        } else {
            mask.trailing_zeros() as i32
        }
    }

    /// Runs the whole match against an already-materialized string.
    #[must_use]
    pub fn lookup(&self, s: &str) -> i32 {
        let mut mask = self.initial;
        let mut i = 0usize;
        for c in s.chars() {
            mask = self.update(mask, i, c as i32);
            i += 1;
        }
        self.first(self.exact(mask, i))
    }
}

#[cfg(test)]
mod tests {
    use super::StringMatrix;

    #[test]
    fn matches_exact_candidates() {
        let m = StringMatrix::new(&["text", "value", "val"]);
        assert_eq!(m.lookup("text"), 0);
        assert_eq!(m.lookup("value"), 1);
        assert_eq!(m.lookup("val"), 2);
        assert_eq!(m.lookup("valu"), -1);
        assert_eq!(m.lookup("values"), -1);
        assert_eq!(m.lookup(""), -1);
    }

    #[test]
    fn update_requires_increasing_indices() {
        let m = StringMatrix::new(&["ab", "ax"]);
        let mask = m.update(m.initial(), 0, 'a' as i32);
        assert_eq!(mask, 0b11);
        let mask = m.update(mask, 1, 'x' as i32);
        assert_eq!(m.first(mask), 1);
        // Past the tallest candidate everything is cleared.
        assert_eq!(m.update(mask, 2, 'y' as i32), 0);
    }

    #[test]
    #[should_panic(expected = "1..=63 candidates")]
    fn rejects_oversized_candidate_sets() {
        let names: alloc::vec::Vec<alloc::string::String> =
            (0..64).map(|i| alloc::format!("f{i}")).collect();
        let refs: alloc::vec::Vec<&str> = names.iter().map(alloc::string::String::as_str).collect();
        let _ = StringMatrix::new(&refs);
    }
}
