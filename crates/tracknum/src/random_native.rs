use ::rand::Rng;

use crate::RandSource;

/// A `RandSource` backed by the thread-local RNG.
///
/// Fast, cryptographically secure (ChaCha-based), and periodically reseeded.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandSource for ThreadRandom {
    fn random_in(&self, floor: u32, ceiling: u32) -> u32 {
        ::rand::rng().random_range(floor..=ceiling)
    }
}
