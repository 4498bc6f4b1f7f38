//! Hashing primitives for the Assize adjudication engine.
//!
//! - **Blake2b-256** for content hashes (evidence, rationale, appeal reasons)
//! - Domain-separated seed expansion for jury selection
//! - Digests of reputation snapshots so a draw can be audited later

pub mod hash;

pub use hash::{blake2b_256, blake2b_256_multi, derive_seed};
