//! Nullable entropy — predictable seeds.

use assize_entropy::{EntropyError, EntropyOutput, EntropySource};
use assize_types::Seed;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// A deterministic entropy source for testing.
///
/// Returns the configured seeds in order, cycling when exhausted. With no configured
/// seeds it derives a fresh one from a counter, so consecutive calls never repeat.
#[derive(Debug, Default)]
pub struct NullEntropy {
    seeds: Mutex<Vec<Seed>>,
    calls: AtomicU64,
    failing: bool,
}

impl NullEntropy {
    pub fn new(seeds: Vec<[u8; 32]>) -> Self {
        Self {
            seeds: Mutex::new(seeds.into_iter().map(Seed::new).collect()),
            ..Self::default()
        }
    }

    /// Every call returns the same seed.
    pub fn constant(value: [u8; 32]) -> Self {
        Self::new(vec![value])
    }

    /// Seeds `1, 2, 3, …` encoded big-endian in the last eight bytes.
    pub fn sequential() -> Self {
        Self::default()
    }

    /// A source that is never available.
    pub fn unavailable() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }
}

impl EntropySource for NullEntropy {
    fn seed_for(&self, _context: &[u8]) -> Result<EntropyOutput, EntropyError> {
        if self.failing {
            return Err(EntropyError::Unavailable("null entropy disabled".into()));
        }
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let seeds = self.seeds.lock().unwrap_or_else(|e| e.into_inner());
        let seed = if seeds.is_empty() {
            let mut bytes = [0u8; 32];
            bytes[24..].copy_from_slice(&(call + 1).to_be_bytes());
            Seed::new(bytes)
        } else {
            seeds[(call % seeds.len() as u64) as usize]
        };
        Ok(EntropyOutput {
            seed,
            proof: Vec::new(),
            round: call,
        })
    }

    fn verify(&self, _context: &[u8], _output: &EntropyOutput) -> Result<bool, EntropyError> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "null-entropy"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_never_repeats() {
        let entropy = NullEntropy::sequential();
        let a = entropy.seed_for(b"").unwrap().seed;
        let b = entropy.seed_for(b"").unwrap().seed;
        assert_ne!(a, b);
        assert_eq!(entropy.calls(), 2);
    }

    #[test]
    fn configured_seeds_cycle() {
        let entropy = NullEntropy::new(vec![[1u8; 32], [2u8; 32]]);
        let seeds: Vec<Seed> = (0..3).map(|_| entropy.seed_for(b"").unwrap().seed).collect();
        assert_eq!(seeds, vec![Seed::new([1u8; 32]), Seed::new([2u8; 32]), Seed::new([1u8; 32])]);
    }

    #[test]
    fn unavailable_errors() {
        assert!(NullEntropy::unavailable().seed_for(b"").is_err());
    }
}
