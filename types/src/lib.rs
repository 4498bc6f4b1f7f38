//! Fundamental types for the Assize adjudication engine.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! participant and claim identifiers, content hashes, amounts, basis points, timestamps,
//! adjudication parameters, and the claim lifecycle enum.

pub mod amount;
pub mod category;
pub mod error;
pub mod hash;
pub mod id;
pub mod params;
pub mod participant;
pub mod state;
pub mod time;

pub use amount::{Amount, BasisPoints};
pub use category::ClaimCategory;
pub use error::ParamsError;
pub use hash::{ContentHash, Seed};
pub use id::{AppealId, CaseRef, ClaimId, PolicyRef};
pub use params::AdjudicationParams;
pub use participant::ParticipantId;
pub use state::ClaimStatus;
pub use time::Timestamp;
