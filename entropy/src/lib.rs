//! Entropy for verifiable jury selection.
//!
//! The engine never generates randomness itself. An external collaborator supplies an
//! opaque 32-byte [`Seed`] per selection (a future block hash, a beacon round, a
//! commit-reveal output); this crate turns it into a reproducible draw stream.
//!
//! Providers:
//! - [`CommitRevealEntropy`]: participants commit hashed values, then reveal them
//! - [`OsEntropy`]: operating-system randomness, development networks only

pub mod commit_reveal;
pub mod error;
pub mod os;
pub mod stream;

pub use commit_reveal::{Commitment, CommitRevealEntropy, Reveal};
pub use error::EntropyError;
pub use os::OsEntropy;
pub use stream::DrawStream;

use assize_types::Seed;

/// Trait for providing selection seeds.
pub trait EntropySource: Send + Sync {
    /// Produce a seed for a given context (e.g. a case reference encoding).
    fn seed_for(&self, context: &[u8]) -> Result<EntropyOutput, EntropyError>;

    /// Verify that an output was correctly produced for `context`.
    fn verify(&self, context: &[u8], output: &EntropyOutput) -> Result<bool, EntropyError>;

    /// Human-readable name of this provider.
    fn name(&self) -> &str;
}

/// A seed together with whatever evidence the provider can offer for it.
#[derive(Clone, Debug)]
pub struct EntropyOutput {
    /// The seed handed to jury selection.
    pub seed: Seed,
    /// Provider-specific proof material (empty when the provider has none).
    pub proof: Vec<u8>,
    /// Round or epoch the seed belongs to.
    pub round: u64,
}
