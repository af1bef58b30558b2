// ABOUTME: Identifier generators for session ids and SMSC-assigned message ids
// ABOUTME: Generators are owned by whoever needs them and can be seeded for reproducible runs

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;
use std::sync::{Mutex, PoisonError};

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Source of unique-enough identifiers.
pub trait IdGenerator: fmt::Debug + Send + Sync {
    fn generate(&self) -> String;
}

/// Random lowercase hex identifiers drawn from a seeded `StdRng`.
///
/// # Example
///
/// ```rust
/// use smpp_session::ids::{IdGenerator, RandomIdGenerator};
///
/// let a = RandomIdGenerator::with_seed(7);
/// let b = RandomIdGenerator::with_seed(7);
/// assert_eq!(a.generate(), b.generate());
/// ```
pub struct RandomIdGenerator {
    rng: Mutex<StdRng>,
    length: usize,
}

impl RandomIdGenerator {
    /// Default identifier length in hex digits
    pub const DEFAULT_LENGTH: usize = 10;

    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    /// Change the number of hex digits per identifier. Message ids must fit
    /// a 65 octet C-string, so the length is capped at 64.
    pub fn with_length(mut self, length: usize) -> Self {
        self.length = length.clamp(1, 64);
        self
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            rng: Mutex::new(rng),
            length: Self::DEFAULT_LENGTH,
        }
    }
}

impl Default for RandomIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RandomIdGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RandomIdGenerator")
            .field("length", &self.length)
            .finish_non_exhaustive()
    }
}

impl IdGenerator for RandomIdGenerator {
    fn generate(&self) -> String {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        (0..self.length)
            .map(|_| HEX_DIGITS[rng.gen_range(0..HEX_DIGITS.len())] as char)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn seeded_generators_repeat() {
        let a = RandomIdGenerator::with_seed(42);
        let b = RandomIdGenerator::with_seed(42);
        let first: Vec<_> = (0..5).map(|_| a.generate()).collect();
        let second: Vec<_> = (0..5).map(|_| b.generate()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn ids_are_hex_of_requested_length() {
        let ids = RandomIdGenerator::with_seed(1).with_length(16);
        let id = ids.generate();
        assert_eq!(id.len(), 16);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn ids_rarely_collide() {
        let ids = RandomIdGenerator::with_seed(3);
        let seen: HashSet<_> = (0..1000).map(|_| ids.generate()).collect();
        assert_eq!(seen.len(), 1000);
    }
}
