//! Juror pool — registered participants and their per-round reputation snapshot.
//!
//! Reputation is owned by an external collaborator and may change at any time. Each
//! selection round reads every weight exactly once into a [`PoolSnapshot`], so the
//! draw is reproducible from the snapshot alone.

use assize_crypto::blake2b_256_multi;
use assize_types::{ClaimId, ParticipantId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// External reputation collaborator.
pub trait ReputationSource: Send + Sync {
    /// Current non-negative weight of a participant.
    fn weight_of(&self, participant: &ParticipantId) -> u64;

    /// Whether the participant may sit on a jury for `claim` (no conflict of interest).
    fn is_eligible(&self, participant: &ParticipantId, claim: ClaimId) -> bool;
}

/// A participant and the weight read for one selection round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolEntry {
    pub participant: ParticipantId,
    pub weight: u128,
}

/// Eligible entries for one selection round, in canonical participant order.
///
/// Zero-weight entries are dropped; they could never be drawn.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSnapshot {
    entries: Vec<PoolEntry>,
}

impl PoolSnapshot {
    /// Build a snapshot from arbitrary entries. Ordering is canonicalised, so the
    /// order entries were registered in has no effect on selection.
    pub fn from_entries(entries: impl IntoIterator<Item = PoolEntry>) -> Self {
        let mut entries: Vec<PoolEntry> = entries.into_iter().filter(|e| e.weight > 0).collect();
        entries.sort_by(|a, b| a.participant.cmp(&b.participant));
        entries.dedup_by(|a, b| a.participant == b.participant);
        Self { entries }
    }

    pub fn entries(&self) -> &[PoolEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_weight(&self) -> u128 {
        self.entries
            .iter()
            .fold(0u128, |acc, e| acc.saturating_add(e.weight))
    }

    pub fn weight_of(&self, participant: &ParticipantId) -> Option<u128> {
        self.entries
            .binary_search_by(|e| e.participant.cmp(participant))
            .ok()
            .map(|i| self.entries[i].weight)
    }

    /// Squares every weight, tilting the draw toward higher-standing jurors while
    /// keeping every eligible juror drawable.
    pub fn amplified(&self) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .map(|e| PoolEntry {
                    participant: e.participant.clone(),
                    weight: e.weight.saturating_mul(e.weight),
                })
                .collect(),
        }
    }

    /// Blake2b digest binding every participant and weight, recorded on the jury.
    pub fn digest(&self) -> [u8; 32] {
        let encoded: Vec<Vec<u8>> = self
            .entries
            .iter()
            .map(|e| {
                let id = e.participant.as_str().as_bytes();
                let mut buf = Vec::with_capacity(8 + id.len() + 16);
                buf.extend_from_slice(&(id.len() as u64).to_be_bytes());
                buf.extend_from_slice(id);
                buf.extend_from_slice(&e.weight.to_be_bytes());
                buf
            })
            .collect();
        let parts: Vec<&[u8]> = encoded.iter().map(Vec::as_slice).collect();
        blake2b_256_multi(&parts)
    }
}

/// The set of participants who have opted in to jury service.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct JurorPool {
    members: BTreeSet<ParticipantId>,
}

impl JurorPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if the participant was already registered.
    pub fn register(&mut self, participant: ParticipantId) -> bool {
        self.members.insert(participant)
    }

    /// Returns `false` if the participant was not registered.
    pub fn deregister(&mut self, participant: &ParticipantId) -> bool {
        self.members.remove(participant)
    }

    pub fn contains(&self, participant: &ParticipantId) -> bool {
        self.members.contains(participant)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Read weights for one selection round on `claim`, skipping `excluded` members and
    /// anyone the reputation source marks as conflicted.
    pub fn snapshot(
        &self,
        claim: ClaimId,
        reputation: &dyn ReputationSource,
        excluded: &HashSet<ParticipantId>,
    ) -> PoolSnapshot {
        PoolSnapshot::from_entries(
            self.members
                .iter()
                .filter(|p| !excluded.contains(*p))
                .filter(|p| reputation.is_eligible(p, claim))
                .map(|p| PoolEntry {
                    participant: p.clone(),
                    weight: reputation.weight_of(p) as u128,
                }),
        )
    }

    /// Snapshot for appeal juries: same eligibility, weights amplified toward
    /// higher-standing jurors.
    pub fn reputation_weighted_jurors(
        &self,
        claim: ClaimId,
        reputation: &dyn ReputationSource,
        excluded: &HashSet<ParticipantId>,
    ) -> PoolSnapshot {
        self.snapshot(claim, reputation, excluded).amplified()
    }
}
