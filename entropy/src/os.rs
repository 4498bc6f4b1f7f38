//! Operating-system randomness.
//!
//! Not verifiable: anyone running the node could have picked the seed. Suitable for
//! development networks and simulations only.

use crate::{EntropyError, EntropyOutput, EntropySource};
use assize_types::Seed;

pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn seed_for(&self, _context: &[u8]) -> Result<EntropyOutput, EntropyError> {
        let mut bytes = [0u8; 32];
        getrandom::getrandom(&mut bytes)
            .map_err(|e| EntropyError::Unavailable(e.to_string()))?;
        Ok(EntropyOutput {
            seed: Seed::new(bytes),
            proof: Vec::new(),
            round: 0,
        })
    }

    /// OS randomness carries no proof, so nothing can be verified.
    fn verify(&self, _context: &[u8], _output: &EntropyOutput) -> Result<bool, EntropyError> {
        Ok(false)
    }

    fn name(&self) -> &str {
        "os"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn produces_distinct_seeds() {
        let a = OsEntropy.seed_for(b"x").unwrap();
        let b = OsEntropy.seed_for(b"x").unwrap();
        assert_ne!(a.seed, b.seed);
        assert!(!OsEntropy.verify(b"x", &a).unwrap());
    }
}
