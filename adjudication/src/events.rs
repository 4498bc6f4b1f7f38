//! Events emitted by the engine for the notification layer and the reputation
//! collaborator. The engine never formats or delivers them.

use crate::outcomes::JurorOutcome;
use crate::tally::Resolution;
use assize_types::{Amount, CaseRef, ClaimId, ClaimStatus, ParticipantId, Timestamp};
use serde::{Deserialize, Serialize};

/// One claim state transition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimEvent {
    pub claim: ClaimId,
    /// Case active when the transition happened, if any.
    pub case: Option<CaseRef>,
    pub from: ClaimStatus,
    pub to: ClaimStatus,
    /// Set on transitions into a verdict state.
    pub payout_amount: Option<Amount>,
    pub timestamp: Timestamp,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EngineEvent {
    /// A claim changed state.
    Transition(ClaimEvent),
    /// A jury was seated.
    JuryDrawn {
        case: CaseRef,
        jurors: Vec<ParticipantId>,
        deadline: Timestamp,
    },
    /// A case was resolved. `outcomes` is empty for no-quorum rounds.
    Resolved {
        case: CaseRef,
        resolution: Resolution,
        outcomes: Vec<JurorOutcome>,
    },
}

impl EngineEvent {
    pub fn claim(&self) -> ClaimId {
        match self {
            Self::Transition(event) => event.claim,
            Self::JuryDrawn { case, .. } | Self::Resolved { case, .. } => case.claim_id(),
        }
    }
}
