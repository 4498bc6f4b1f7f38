//! Nullable reputation — fixed weights and declared conflicts of interest.

use assize_adjudication::ReputationSource;
use assize_types::{ClaimId, ParticipantId};
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

/// An in-memory reputation source.
///
/// Participants without an explicit weight get `default_weight`.
#[derive(Debug)]
pub struct NullReputation {
    weights: RwLock<HashMap<ParticipantId, u64>>,
    conflicts: RwLock<HashSet<(ParticipantId, ClaimId)>>,
    default_weight: u64,
}

impl NullReputation {
    pub fn new(default_weight: u64) -> Self {
        Self {
            weights: RwLock::new(HashMap::new()),
            conflicts: RwLock::new(HashSet::new()),
            default_weight,
        }
    }

    pub fn with_weight(self, participant: impl Into<ParticipantId>, weight: u64) -> Self {
        self.set_weight(participant, weight);
        self
    }

    pub fn set_weight(&self, participant: impl Into<ParticipantId>, weight: u64) {
        self.weights
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(participant.into(), weight);
    }

    /// Mark `participant` as conflicted on `claim`.
    pub fn conflict(&self, participant: impl Into<ParticipantId>, claim: ClaimId) {
        self.conflicts
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert((participant.into(), claim));
    }
}

impl Default for NullReputation {
    fn default() -> Self {
        Self::new(1)
    }
}

impl ReputationSource for NullReputation {
    fn weight_of(&self, participant: &ParticipantId) -> u64 {
        self.weights
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(participant)
            .copied()
            .unwrap_or(self.default_weight)
    }

    fn is_eligible(&self, participant: &ParticipantId, claim: ClaimId) -> bool {
        !self
            .conflicts
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&(participant.clone(), claim))
    }
}
