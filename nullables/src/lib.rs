//! Nullable collaborators for deterministic testing.
//!
//! The engine consumes time, entropy and reputation from outside. This crate provides
//! stand-ins that:
//! - return deterministic values
//! - can be steered programmatically from a test
//! - never touch the operating system or the network
//!
//! Usage: pass these wherever the engine or daemon expects the real collaborator.

pub mod clock;
pub mod entropy;
pub mod reputation;

pub use clock::NullClock;
pub use entropy::NullEntropy;
pub use reputation::NullReputation;
