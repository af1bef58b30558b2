// ABOUTME: Sequence number generator for outbound requests
// ABOUTME: Numbers run 1..=0x7FFFFFFF and wrap back to 1, never handing out 0

use std::sync::atomic::{AtomicU32, Ordering};

/// Issues sequence numbers for outbound requests.
///
/// Numbers start at 1 and wrap from `MAX` back to 1; 0 is never issued.
#[derive(Debug)]
pub struct SequenceGenerator {
    next: AtomicU32,
}

impl SequenceGenerator {
    /// Largest sequence number allowed on the wire
    pub const MAX: u32 = 0x7FFF_FFFF;

    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(first: u32) -> Self {
        Self {
            next: AtomicU32::new(first.clamp(1, Self::MAX)),
        }
    }

    pub fn next(&self) -> u32 {
        let step = |current: u32| {
            Some(if current >= Self::MAX { 1 } else { current + 1 })
        };
        // The closure never declines, so both arms carry the issued value
        match self.next.fetch_update(Ordering::AcqRel, Ordering::Acquire, step) {
            Ok(issued) | Err(issued) => issued,
        }
    }
}

impl Default for SequenceGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn starts_at_one() {
        let sequence = SequenceGenerator::new();
        assert_eq!(sequence.next(), 1);
        assert_eq!(sequence.next(), 2);
    }

    #[test]
    fn wraps_to_one_never_zero() {
        let sequence = SequenceGenerator::starting_at(SequenceGenerator::MAX - 1);
        assert_eq!(sequence.next(), SequenceGenerator::MAX - 1);
        assert_eq!(sequence.next(), SequenceGenerator::MAX);
        assert_eq!(sequence.next(), 1);

        assert_eq!(SequenceGenerator::starting_at(0).next(), 1);
    }

    #[test]
    fn concurrent_callers_get_distinct_numbers() {
        let sequence = Arc::new(SequenceGenerator::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let sequence = Arc::clone(&sequence);
                std::thread::spawn(move || (0..1000).map(|_| sequence.next()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for number in handle.join().unwrap() {
                assert!(seen.insert(number), "sequence {number} issued twice");
            }
        }
        assert_eq!(seen.len(), 8000);
    }
}
