#![forbid(unsafe_code)]

//! Deterministic glyph randomness.

use kinetype_text::Alphabet;

const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// Small seedable PRNG (xorshift64*) for glyph substitution.
///
/// Not cryptographic. Same seed, same glyph stream.
#[derive(Debug, Clone)]
pub struct GlyphRng {
    state: u64,
}

impl GlyphRng {
    /// Create a generator from `seed`. Any seed is valid, including zero.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        // Avoid the all-zero state xorshift cannot leave.
        let state = seed.wrapping_add(GOLDEN_GAMMA);
        Self {
            state: if state == 0 { GOLDEN_GAMMA } else { state },
        }
    }

    /// Next raw 64-bit value.
    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state >> 12;
        self.state ^= self.state << 25;
        self.state ^= self.state >> 27;
        self.state.wrapping_mul(0x2545_F491_4F6C_DD1D)
    }

    /// Uniform value in `[0, 1)` with 53 bits of precision.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Uniform index in `0..n`. `n` must be non-zero.
    pub fn below(&mut self, n: usize) -> usize {
        debug_assert!(n > 0, "below(0) has no valid result");
        ((self.next_f64() * n as f64) as usize).min(n.saturating_sub(1))
    }

    /// Uniformly drawn glyph from `alphabet`.
    pub fn pick(&mut self, alphabet: &Alphabet) -> char {
        alphabet.glyph(self.below(alphabet.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = GlyphRng::new(42);
        let mut b = GlyphRng::new(42);
        for _ in 0..32 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn zero_seed_is_not_stuck() {
        let mut rng = GlyphRng::new(0);
        let first = rng.next_u64();
        assert_ne!(first, rng.next_u64());
    }

    #[test]
    fn below_stays_in_range() {
        let mut rng = GlyphRng::new(7);
        for n in 1..50 {
            for _ in 0..20 {
                assert!(rng.below(n) < n);
            }
        }
    }

    #[test]
    fn below_covers_every_index() {
        let mut rng = GlyphRng::new(99);
        let mut seen = [false; 6];
        for _ in 0..600 {
            seen[rng.below(6)] = true;
        }
        assert!(seen.iter().all(|s| *s), "not uniform enough: {seen:?}");
    }

    #[test]
    fn pick_draws_from_alphabet() {
        let alphabet = Alphabet::new("アB").unwrap();
        let mut rng = GlyphRng::new(1);
        for _ in 0..50 {
            assert!(alphabet.contains(rng.pick(&alphabet)));
        }
    }
}
