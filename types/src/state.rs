//! Claim lifecycle states.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The adjudication status of a claim.
///
/// `Submitted → JurySelected → Voting → {Approved, Rejected, Inconclusive}`.
/// `Inconclusive` loops back to `JurySelected` until the retry cap forces `Rejected`.
/// A `Rejected` claim may be appealed once:
/// `Appealed → AppealJurySelected → AppealVoting → {AppealApproved, AppealRejected}`.
/// An appeal that never seats a jury within the appeal window lapses to `AppealRejected`.
/// Every verdict eventually ends in `Closed`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClaimStatus {
    /// Filed; waiting for entropy to select a jury.
    Submitted,
    /// A jury has been drawn for the claim.
    JurySelected,
    /// Jurors are voting.
    Voting,
    /// Consensus reached in favour of a payout.
    Approved,
    /// Consensus against payout, or forced after repeated no-quorum rounds.
    Rejected,
    /// Deadline passed without quorum; waiting for a fresh jury.
    Inconclusive,
    /// The claimant has appealed a rejection; waiting for an appeal jury.
    Appealed,
    /// An appeal jury has been drawn.
    AppealJurySelected,
    /// Appeal jurors are voting.
    AppealVoting,
    /// The appeal overturned the rejection.
    AppealApproved,
    /// The appeal upheld the rejection.
    AppealRejected,
    /// No further action possible.
    Closed,
}

impl ClaimStatus {
    /// Whether the state machine permits moving from `self` to `next`.
    pub fn can_transition_to(&self, next: ClaimStatus) -> bool {
        use ClaimStatus::*;
        matches!(
            (self, next),
            (Submitted, JurySelected)
                | (JurySelected, Voting)
                | (Voting, Approved)
                | (Voting, Rejected)
                | (Voting, Inconclusive)
                | (Inconclusive, JurySelected)
                | (Inconclusive, Rejected)
                | (Approved, Closed)
                | (Rejected, Appealed)
                | (Rejected, Closed)
                | (Appealed, AppealJurySelected)
                | (Appealed, AppealRejected)
                | (AppealJurySelected, AppealVoting)
                | (AppealVoting, AppealApproved)
                | (AppealVoting, AppealRejected)
                | (AppealApproved, Closed)
                | (AppealRejected, Closed)
        )
    }

    /// Whether jurors may currently submit votes.
    pub fn accepts_votes(&self) -> bool {
        matches!(self, Self::Voting | Self::AppealVoting)
    }

    /// Whether the claim is waiting for a jury to be drawn.
    pub fn awaiting_selection(&self) -> bool {
        matches!(self, Self::Submitted | Self::Inconclusive | Self::Appealed)
    }

    /// A verdict has been reached (the claim may still be appealable or closable).
    pub fn is_resolved(&self) -> bool {
        matches!(
            self,
            Self::Approved | Self::Rejected | Self::AppealApproved | Self::AppealRejected
        )
    }

    pub fn is_appeal_phase(&self) -> bool {
        matches!(
            self,
            Self::Appealed
                | Self::AppealJurySelected
                | Self::AppealVoting
                | Self::AppealApproved
                | Self::AppealRejected
        )
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approved_is_never_appealable() {
        assert!(!ClaimStatus::Approved.can_transition_to(ClaimStatus::Appealed));
        assert!(ClaimStatus::Rejected.can_transition_to(ClaimStatus::Appealed));
    }

    #[test]
    fn no_second_level_appeal() {
        assert!(!ClaimStatus::AppealRejected.can_transition_to(ClaimStatus::Appealed));
    }

    #[test]
    fn closed_is_absorbing() {
        for next in [
            ClaimStatus::Submitted,
            ClaimStatus::Voting,
            ClaimStatus::Rejected,
            ClaimStatus::Appealed,
        ] {
            assert!(!ClaimStatus::Closed.can_transition_to(next));
        }
    }

    #[test]
    fn unseated_appeal_can_lapse() {
        assert!(ClaimStatus::Appealed.can_transition_to(ClaimStatus::AppealRejected));
        assert!(!ClaimStatus::Appealed.can_transition_to(ClaimStatus::AppealApproved));
        assert!(ClaimStatus::Appealed.is_appeal_phase());
    }

    #[test]
    fn inconclusive_loops_back_to_selection() {
        assert!(ClaimStatus::Inconclusive.can_transition_to(ClaimStatus::JurySelected));
        assert!(ClaimStatus::Inconclusive.awaiting_selection());
    }
}
