//! String-seeded deterministic pseudo-random generator.
//!
//! # Determinism strategy
//!
//! Every observer must derive the same "random" speed, starting progress,
//! and idle offset for a given agent without coordinating, so the generator
//! is seeded from the agent's string id with a fixed, documented algorithm
//! rather than a language-provided hasher (whose output is free to change
//! between releases and platforms):
//!
//! 1. `hash: i32 = 0`; for every UTF-16 code unit `c` of the seed:
//!    `hash = (hash << 5) - hash + c`, wrapping at 32 bits.
//! 2. `state = |hash|`, widened to 64 bits first so `i32::MIN` maps to 2³¹.
//! 3. Each draw: `state = (state * 9301 + 49297) mod 233280`, and the output
//!    is `state / 233280`, a value in `[0, 1)`.
//!
//! The generator is a plain LCG with a short period.  Its only contract is
//! reproducibility; it must never be used where unpredictability matters.

use rand::RngCore;

const LCG_MUL: u64 = 9_301;
const LCG_INC: u64 = 49_297;
const LCG_MOD: u64 = 233_280;

/// 32-bit string hash used to seed [`SeededRandom`].
pub fn seed_hash(seed: &str) -> i32 {
    seed.encode_utf16().fold(0i32, |hash, unit| {
        hash.wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(i32::from(unit))
    })
}

// ── SeededRandom ──────────────────────────────────────────────────────────────

/// Deterministic generator derived from an arbitrary string.
///
/// Implements [`rand::RngCore`] so `rand`'s `Rng` helpers can run on top of
/// it in tests.  That seam is coarse: the generator has only 233 280 states,
/// so every `next_u32` is one of 233 280 values and its low bits are mostly
/// zero.  Use [`SeededRandom::next_f64`] for anything that matters; it is
/// also the only output guaranteed to agree across implementations.
#[derive(Clone, Debug)]
pub struct SeededRandom {
    state: u64,
}

impl SeededRandom {
    /// Seed from `seed`.  The empty string is a valid seed.
    pub fn new(seed: &str) -> Self {
        let state = i64::from(seed_hash(seed)).unsigned_abs();
        Self { state }
    }

    /// Next value in `[0, 1)`.
    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        self.state = (self.state % LCG_MOD * LCG_MUL + LCG_INC) % LCG_MOD;
        self.state as f64 / LCG_MOD as f64
    }

    /// Next value in `[lo, hi)`.
    #[inline]
    pub fn next_range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + self.next_f64() * (hi - lo)
    }
}

impl RngCore for SeededRandom {
    /// `next_f64` scaled onto `u32`; see the type docs for its resolution.
    fn next_u32(&mut self) -> u32 {
        (self.next_f64() * 4_294_967_296.0) as u32
    }

    fn next_u64(&mut self) -> u64 {
        (u64::from(self.next_u32()) << 32) | u64::from(self.next_u32())
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

/// Closure form: each call yields the next value in `[0, 1)`.
pub fn create_generator(seed: &str) -> impl FnMut() -> f64 + Send + 'static {
    let mut rng = SeededRandom::new(seed);
    move || rng.next_f64()
}
