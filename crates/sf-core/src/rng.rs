//! Seeded random streams.
//!
//! SafeFlow never reads process-global randomness.  Two stream types cover
//! every draw:
//!
//! | Stream      | Owner                                   | Derived from              |
//! |-------------|-----------------------------------------|---------------------------|
//! | [`SimRng`]  | sequential passes (fill, demographics)  | `seed`, then `child(n)`   |
//! | [`TaskRng`] | one unit of batch work (a time window)  | `seed ^ key·MIXING`       |
//!
//! A `TaskRng` depends only on the run seed and its key, so windows can be
//! simulated on any thread, in any order, with identical output.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Odd 64-bit constant (golden-ratio fraction) that spreads adjacent keys
/// across the seed space.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

#[inline]
fn mix(seed: u64, key: u64) -> u64 {
    seed ^ key.wrapping_mul(MIXING_CONSTANT)
}

/// Draw helpers shared by both stream types.
macro_rules! draws {
    () => {
        /// A value from the `Standard` distribution (`f64` in `[0, 1)`).
        #[inline]
        pub fn random<T>(&mut self) -> T
        where
            rand::distributions::Standard: rand::distributions::Distribution<T>,
        {
            self.0.r#gen()
        }

        /// Uniform draw from `range`; inclusive ranges include the end.
        #[inline]
        pub fn gen_range<T, R>(&mut self, range: R) -> T
        where
            T: rand::distributions::uniform::SampleUniform,
            R: rand::distributions::uniform::SampleRange<T>,
        {
            self.0.gen_range(range)
        }

        /// `p` is clamped to `[0, 1]`.
        #[inline]
        pub fn gen_bool(&mut self, p: f64) -> bool {
            self.0.gen_bool(p.clamp(0.0, 1.0))
        }

        /// `None` for an empty slice.
        #[inline]
        pub fn choose<'s, T>(&mut self, items: &'s [T]) -> Option<&'s T> {
            items.choose(&mut self.0)
        }

        #[inline]
        pub fn inner(&mut self) -> &mut SmallRng {
            &mut self.0
        }
    };
}

// ── TaskRng ───────────────────────────────────────────────────────────────────

/// Stream of one batch task.  Each worker owns its own; never shared.
pub struct TaskRng(SmallRng);

impl TaskRng {
    pub fn new(seed: u64, key: u64) -> Self {
        Self(SmallRng::seed_from_u64(mix(seed, key)))
    }

    draws!();
}

// ── SimRng ────────────────────────────────────────────────────────────────────

/// Root stream of a run, for sequential passes only.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        Self(SmallRng::seed_from_u64(seed))
    }

    /// Independent child stream.  Children taken in the same order from
    /// equally seeded parents are identical.
    pub fn child(&mut self, key: u64) -> SimRng {
        let base: u64 = self.0.r#gen();
        Self(SmallRng::seed_from_u64(mix(base, key)))
    }

    draws!();
}
