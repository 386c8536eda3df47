//! Deterministic random number generation.
//!
//! Same seed, same deal: every shuffle, draw and random tile id in a game
//! comes from one [`GameRng`].
//!
//! ```
//! use rust_rummy::core::GameRng;
//!
//! let mut a = GameRng::new(42);
//! let mut b = GameRng::new(42);
//! assert_eq!(a.index(106), b.index(106));
//! ```

use rand::seq::SliceRandom;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Seeded ChaCha8 source for shuffling the pool, drawing and minting ids.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
}

impl GameRng {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Uniform index in `0..len`. Panics if `len` is zero.
    pub fn index(&mut self, len: usize) -> usize {
        self.inner.gen_range(0..len)
    }

    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        slice.shuffle(&mut self.inner);
    }

    /// 128 random bits, high word drawn first.
    pub fn next_u128(&mut self) -> u128 {
        let hi = u128::from(self.inner.next_u64());
        let lo = u128::from(self.inner.next_u64());
        (hi << 64) | lo
    }
}
