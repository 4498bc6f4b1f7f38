//! Jury records produced by the selector.

use assize_types::{BasisPoints, CaseRef, ParticipantId, Seed, Timestamp};
use serde::{Deserialize, Serialize};

/// A seated jury for one case.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Jury {
    /// The claim round or appeal this jury sits on.
    pub case: CaseRef,
    /// Jurors in draw order. No duplicates, never the claimant.
    pub jurors: Vec<ParticipantId>,
    /// External seed the draw was made from.
    pub seed: Seed,
    /// Digest of the weight snapshot the draw was made over.
    pub pool_digest: [u8; 32],
    pub selected_at: Timestamp,
    /// Last instant at which votes are accepted.
    pub deadline: Timestamp,
    /// Votes that trigger resolution before the deadline.
    pub required_votes: u32,
    /// Set exactly once, when the tally resolves the case.
    pub concluded: bool,
    /// Resulting payout fraction; `None` until concluded with a verdict.
    pub payout_bps: Option<BasisPoints>,
}

impl Jury {
    pub fn size(&self) -> usize {
        self.jurors.len()
    }

    pub fn contains(&self, juror: &ParticipantId) -> bool {
        self.jurors.contains(juror)
    }

    /// Whether votes are still accepted at `now`.
    pub fn is_open(&self, now: Timestamp) -> bool {
        !self.concluded && now <= self.deadline
    }

    pub fn deadline_passed(&self, now: Timestamp) -> bool {
        now > self.deadline
    }
}
