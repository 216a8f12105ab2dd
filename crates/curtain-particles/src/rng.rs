#![forbid(unsafe_code)]

//! Small deterministic PRNG for particle seeding.
//!
//! xorshift64 is plenty for scattering a few dozen points and keeps seeded
//! runs reproducible across hosts.

/// xorshift64 generator.
#[derive(Debug, Clone)]
pub struct Xorshift64 {
    state: u64,
}

/// Used when a seed would leave the generator stuck at zero.
const FALLBACK_STATE: u64 = 0x9E37_79B9_7F4A_7C15;

impl Xorshift64 {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        let state = seed.wrapping_add(1);
        Self {
            state: if state == 0 { FALLBACK_STATE } else { state },
        }
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Uniform in `[0, 1)`.
    pub fn next_f32(&mut self) -> f32 {
        // Top 24 bits fill an f32 mantissa exactly.
        (self.next_u64() >> 40) as f32 / (1u32 << 24) as f32
    }

    /// Uniform in `[lo, hi)`. Returns `lo` when the range is empty.
    pub fn range(&mut self, lo: f32, hi: f32) -> f32 {
        if hi <= lo {
            return lo;
        }
        let v = lo + self.next_f32() * (hi - lo);
        if v >= hi { lo } else { v }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = Xorshift64::new(7);
        let mut b = Xorshift64::new(7);
        for _ in 0..32 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = Xorshift64::new(1);
        let mut b = Xorshift64::new(2);
        assert_ne!(a.next_u64(), b.next_u64());
    }

    #[test]
    fn max_seed_does_not_stick() {
        let mut r = Xorshift64::new(u64::MAX);
        assert_ne!(r.next_u64(), 0);
    }

    #[test]
    fn unit_floats_stay_in_range() {
        let mut r = Xorshift64::new(42);
        for _ in 0..10_000 {
            let v = r.next_f32();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn empty_range_returns_lo() {
        let mut r = Xorshift64::new(0);
        assert_eq!(r.range(3.0, 3.0), 3.0);
        assert_eq!(r.range(5.0, 1.0), 5.0);
    }
}
