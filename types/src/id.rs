//! Arena keys for claims and appeals, and the case reference votes are scoped to.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a claim record, assigned by the claim registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimId(u64);

impl ClaimId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }

    pub fn to_be_bytes(&self) -> [u8; 8] {
        self.0.to_be_bytes()
    }
}

impl fmt::Display for ClaimId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "claim-{}", self.0)
    }
}

/// Identifier of an appeal record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppealId(u64);

impl AppealId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for AppealId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "appeal-{}", self.0)
    }
}

/// The case a jury sits on and votes are recorded against.
///
/// A claim may be tried by several juries when earlier rounds end without quorum,
/// so claim cases carry the round number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CaseRef {
    Claim { claim: ClaimId, round: u32 },
    Appeal { claim: ClaimId, appeal: AppealId },
}

impl CaseRef {
    pub fn claim_id(&self) -> ClaimId {
        match self {
            Self::Claim { claim, .. } | Self::Appeal { claim, .. } => *claim,
        }
    }

    pub fn is_appeal(&self) -> bool {
        matches!(self, Self::Appeal { .. })
    }

    /// Stable byte encoding used for seed domain separation.
    pub fn context_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(17);
        match self {
            Self::Claim { claim, round } => {
                out.push(0);
                out.extend_from_slice(&claim.to_be_bytes());
                out.extend_from_slice(&round.to_be_bytes());
            }
            Self::Appeal { claim, appeal } => {
                out.push(1);
                out.extend_from_slice(&claim.to_be_bytes());
                out.extend_from_slice(&appeal.raw().to_be_bytes());
            }
        }
        out
    }
}

impl fmt::Display for CaseRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Claim { claim, round } => write!(f, "{claim}/round-{round}"),
            Self::Appeal { claim, appeal } => write!(f, "{claim}/{appeal}"),
        }
    }
}

/// Reference to the insurance policy a claim is filed against.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PolicyRef(String);

impl PolicyRef {
    pub const MAX_LEN: usize = 128;

    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Non-empty, at most [`Self::MAX_LEN`] bytes, printable ASCII without spaces.
    pub fn is_valid(&self) -> bool {
        !self.0.is_empty()
            && self.0.len() <= Self::MAX_LEN
            && self.0.bytes().all(|b| b.is_ascii_graphic())
    }
}

impl fmt::Display for PolicyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
