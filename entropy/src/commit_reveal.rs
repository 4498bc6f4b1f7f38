//! Commit-reveal entropy among participants.
//!
//! Each participant first commits `Blake2b(value)`, then reveals `value`. Once every
//! commitment has a matching reveal, the values are combined in participant order, so
//! no single participant can steer the seed after seeing the others' values.

use crate::{EntropyError, EntropyOutput, EntropySource};
use assize_crypto::{blake2b_256, blake2b_256_multi};
use assize_types::{ParticipantId, Seed};
use std::collections::BTreeMap;

/// A commitment from a participant.
#[derive(Clone, Debug)]
pub struct Commitment {
    pub participant: ParticipantId,
    /// Hash of the random value.
    pub hash: [u8; 32],
}

/// A reveal from a participant.
#[derive(Clone, Debug)]
pub struct Reveal {
    pub participant: ParticipantId,
    /// The committed random value.
    pub value: [u8; 32],
}

/// Commit-reveal entropy provider.
#[derive(Default)]
pub struct CommitRevealEntropy {
    commitments: BTreeMap<ParticipantId, [u8; 32]>,
    reveals: BTreeMap<ParticipantId, [u8; 32]>,
    round: u64,
}

impl CommitRevealEntropy {
    pub fn new(round: u64) -> Self {
        Self {
            round,
            ..Self::default()
        }
    }

    /// Record a commitment. Commitments close once the first reveal arrives.
    pub fn record_commitment(&mut self, commitment: Commitment) -> Result<(), EntropyError> {
        if !self.reveals.is_empty() {
            return Err(EntropyError::CommitReveal(
                "commit phase closed after first reveal".into(),
            ));
        }
        if self.commitments.contains_key(&commitment.participant) {
            return Err(EntropyError::CommitReveal(format!(
                "{} already committed",
                commitment.participant
            )));
        }
        self.commitments
            .insert(commitment.participant, commitment.hash);
        Ok(())
    }

    /// Record a reveal and check it matches the commitment.
    pub fn record_reveal(&mut self, reveal: Reveal) -> Result<(), EntropyError> {
        let committed = self.commitments.get(&reveal.participant).ok_or_else(|| {
            EntropyError::CommitReveal(format!("{} never committed", reveal.participant))
        })?;
        if self.reveals.contains_key(&reveal.participant) {
            return Err(EntropyError::CommitReveal(format!(
                "{} already revealed",
                reveal.participant
            )));
        }
        if blake2b_256(&reveal.value) != *committed {
            return Err(EntropyError::CommitReveal(format!(
                "reveal from {} does not match commitment",
                reveal.participant
            )));
        }
        self.reveals.insert(reveal.participant, reveal.value);
        Ok(())
    }

    /// Number of commitments still waiting for a reveal.
    pub fn outstanding(&self) -> usize {
        self.commitments.len() - self.reveals.len()
    }

    /// Combine all reveals into a single value, in participant order.
    pub fn combine_reveals(&self) -> Result<[u8; 32], EntropyError> {
        if self.commitments.is_empty() {
            return Err(EntropyError::Unavailable("no commitments recorded".into()));
        }
        if self.outstanding() > 0 {
            return Err(EntropyError::Unavailable(format!(
                "{} of {} reveals outstanding",
                self.outstanding(),
                self.commitments.len()
            )));
        }
        let parts: Vec<&[u8]> = self.reveals.values().map(|v| v.as_slice()).collect();
        Ok(blake2b_256_multi(&parts))
    }
}

impl EntropySource for CommitRevealEntropy {
    fn seed_for(&self, context: &[u8]) -> Result<EntropyOutput, EntropyError> {
        let combined = self.combine_reveals()?;
        Ok(EntropyOutput {
            seed: Seed::new(blake2b_256_multi(&[&combined, context])),
            proof: combined.to_vec(),
            round: self.round,
        })
    }

    fn verify(&self, context: &[u8], output: &EntropyOutput) -> Result<bool, EntropyError> {
        let combined = self.combine_reveals()?;
        let expected = Seed::new(blake2b_256_multi(&[&combined, context]));
        Ok(output.proof == combined && output.seed == expected && output.round == self.round)
    }

    fn name(&self) -> &str {
        "commit-reveal"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(name: &str) -> ParticipantId {
        ParticipantId::new(name)
    }

    fn commit(name: &str, value: [u8; 32]) -> Commitment {
        Commitment {
            participant: p(name),
            hash: blake2b_256(&value),
        }
    }

    fn reveal(name: &str, value: [u8; 32]) -> Reveal {
        Reveal {
            participant: p(name),
            value,
        }
    }

    fn completed() -> CommitRevealEntropy {
        let mut cr = CommitRevealEntropy::new(4);
        cr.record_commitment(commit("alice", [1u8; 32])).unwrap();
        cr.record_commitment(commit("bob", [2u8; 32])).unwrap();
        cr.record_reveal(reveal("bob", [2u8; 32])).unwrap();
        cr.record_reveal(reveal("alice", [1u8; 32])).unwrap();
        cr
    }

    #[test]
    fn seed_available_after_all_reveals() {
        let cr = completed();
        let out = cr.seed_for(b"claim-1").unwrap();
        assert_eq!(out.round, 4);
        assert!(cr.verify(b"claim-1", &out).unwrap());
        assert!(!cr.verify(b"claim-2", &out).unwrap());
    }

    #[test]
    fn reveal_order_does_not_matter() {
        let mut other = CommitRevealEntropy::new(4);
        other.record_commitment(commit("bob", [2u8; 32])).unwrap();
        other.record_commitment(commit("alice", [1u8; 32])).unwrap();
        other.record_reveal(reveal("alice", [1u8; 32])).unwrap();
        other.record_reveal(reveal("bob", [2u8; 32])).unwrap();
        assert_eq!(
            completed().combine_reveals().unwrap(),
            other.combine_reveals().unwrap()
        );
    }

    #[test]
    fn mismatched_reveal_rejected() {
        let mut cr = CommitRevealEntropy::new(0);
        cr.record_commitment(commit("alice", [1u8; 32])).unwrap();
        assert!(cr.record_reveal(reveal("alice", [9u8; 32])).is_err());
    }

    #[test]
    fn outstanding_reveals_block_seed() {
        let mut cr = CommitRevealEntropy::new(0);
        cr.record_commitment(commit("alice", [1u8; 32])).unwrap();
        cr.record_commitment(commit("bob", [2u8; 32])).unwrap();
        cr.record_reveal(reveal("alice", [1u8; 32])).unwrap();
        assert_eq!(cr.outstanding(), 1);
        assert!(matches!(
            cr.seed_for(b"ctx"),
            Err(EntropyError::Unavailable(_))
        ));
    }

    #[test]
    fn late_commitment_rejected() {
        let mut cr = CommitRevealEntropy::new(0);
        cr.record_commitment(commit("alice", [1u8; 32])).unwrap();
        cr.record_reveal(reveal("alice", [1u8; 32])).unwrap();
        assert!(cr.record_commitment(commit("mallory", [5u8; 32])).is_err());
    }

    #[test]
    fn duplicate_commitment_rejected() {
        let mut cr = CommitRevealEntropy::new(0);
        cr.record_commitment(commit("alice", [1u8; 32])).unwrap();
        assert!(cr.record_commitment(commit("alice", [2u8; 32])).is_err());
    }
}
