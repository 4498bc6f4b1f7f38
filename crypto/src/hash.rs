//! Blake2b hashing for content and selection seeds.

use assize_types::Seed;
use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};

type Blake2b256 = Blake2b<U32>;

/// Domain tag mixed into every selection seed derivation.
const SEED_DOMAIN: &[u8] = b"assize/jury-seed/v1";

/// Compute a 256-bit Blake2b hash of arbitrary data.
pub fn blake2b_256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// Hash multiple byte slices in sequence (avoids concatenation allocation).
pub fn blake2b_256_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    for part in parts {
        hasher.update(part);
    }
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// Bind an external seed to a specific case so that one seed cannot be replayed
/// across claims, rounds or appeals.
pub fn derive_seed(seed: &Seed, context: &[u8]) -> [u8; 32] {
    blake2b_256_multi(&[SEED_DOMAIN, seed.as_bytes(), context])
}
