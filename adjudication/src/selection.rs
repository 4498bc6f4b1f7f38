//! Jury selection — reputation-weighted sampling without replacement.
//!
//! Each seat is drawn with probability proportional to weight among the entries not
//! yet seated. The draw stream is derived from the external seed and the case
//! reference, so any party holding the pool snapshot can replay the selection.

use crate::error::AdjudicationError;
use crate::jury::Jury;
use crate::pool::PoolSnapshot;
use assize_entropy::DrawStream;
use assize_types::{AdjudicationParams, CaseRef, ParticipantId, Seed, Timestamp};

/// Selects juries from pool snapshots.
pub struct JurySelector;

impl JurySelector {
    /// Draw `count` distinct participants from `snapshot`.
    ///
    /// Deterministic given the same snapshot, seed and context. Returns every entry
    /// (in draw order) when `count` exceeds the snapshot size.
    pub fn draw(
        &self,
        snapshot: &PoolSnapshot,
        seed: &Seed,
        context: &[u8],
        count: usize,
    ) -> Vec<ParticipantId> {
        let mut stream = DrawStream::new(seed, context);
        let mut remaining: Vec<(&ParticipantId, u128)> = snapshot
            .entries()
            .iter()
            .map(|e| (&e.participant, e.weight))
            .collect();
        let mut total = snapshot.total_weight();
        let mut drawn = Vec::with_capacity(count.min(remaining.len()));

        while drawn.len() < count && !remaining.is_empty() && total > 0 {
            let mut target = stream.below(total);
            let mut index = remaining.len() - 1;
            for (i, (_, weight)) in remaining.iter().enumerate() {
                if target < *weight {
                    index = i;
                    break;
                }
                target -= weight;
            }
            // `remove` keeps canonical order for the following seats.
            let (participant, weight) = remaining.remove(index);
            total -= weight;
            drawn.push(participant.clone());
        }
        drawn
    }

    /// Seat a jury for `case`.
    ///
    /// `size` is the requested number of seats; fewer are seated when the snapshot is
    /// smaller, but never fewer than `min_seats`.
    #[allow(clippy::too_many_arguments)]
    pub fn select(
        &self,
        case: CaseRef,
        snapshot: &PoolSnapshot,
        seed: Seed,
        size: u32,
        min_seats: u32,
        now: Timestamp,
        params: &AdjudicationParams,
    ) -> Result<Jury, AdjudicationError> {
        if size < params.min_jury_size || size > params.max_jury_size.max(min_seats) {
            return Err(AdjudicationError::InvalidJurySize {
                size,
                min: params.min_jury_size,
                max: params.max_jury_size,
            });
        }
        let required = min_seats.max(params.min_jury_size) as usize;
        if snapshot.len() < required {
            return Err(AdjudicationError::InsufficientPool {
                eligible: snapshot.len(),
                required,
            });
        }

        let jurors = self.draw(snapshot, &seed, &case.context_bytes(), size as usize);
        let seated = jurors.len() as u32;

        Ok(Jury {
            case,
            jurors,
            seed,
            pool_digest: snapshot.digest(),
            selected_at: now,
            deadline: now.plus_secs(params.voting_period_secs),
            required_votes: params.required_votes(seated),
            concluded: false,
            payout_bps: None,
        })
    }

    /// Replay the draw for `jury` over `snapshot` and confirm it matches.
    pub fn verify(&self, jury: &Jury, snapshot: &PoolSnapshot) -> bool {
        if snapshot.digest() != jury.pool_digest {
            return false;
        }
        let replay = self.draw(snapshot, &jury.seed, &jury.case.context_bytes(), jury.size());
        replay == jury.jurors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::PoolEntry;
    use assize_types::ClaimId;
    use std::collections::HashSet;

    fn p(s: &str) -> ParticipantId {
        ParticipantId::new(s)
    }

    fn uniform_pool(n: usize) -> PoolSnapshot {
        PoolSnapshot::from_entries((0..n).map(|i| PoolEntry {
            participant: p(&format!("juror-{i:03}")),
            weight: 10,
        }))
    }

    fn case() -> CaseRef {
        CaseRef::Claim {
            claim: ClaimId::new(1),
            round: 0,
        }
    }

    #[test]
    fn draw_is_deterministic() {
        let snap = uniform_pool(30);
        let seed = Seed::new([42u8; 32]);
        let r1 = JurySelector.draw(&snap, &seed, b"ctx", 5);
        let r2 = JurySelector.draw(&snap, &seed, b"ctx", 5);
        assert_eq!(r1, r2, "same seed + same pool must produce same selection");
    }

    #[test]
    fn draw_has_no_duplicates() {
        let snap = uniform_pool(12);
        let drawn = JurySelector.draw(&snap, &Seed::new([5u8; 32]), b"ctx", 12);
        let unique: HashSet<_> = drawn.iter().collect();
        assert_eq!(unique.len(), 12);
    }

    #[test]
    fn draw_count_larger_than_pool_returns_all() {
        let snap = uniform_pool(3);
        let drawn = JurySelector.draw(&snap, &Seed::new([2u8; 32]), b"ctx", 10);
        assert_eq!(drawn.len(), 3);
    }

    #[test]
    fn empty_pool_draws_nothing() {
        let drawn = JurySelector.draw(&PoolSnapshot::default(), &Seed::new([0u8; 32]), b"ctx", 5);
        assert!(drawn.is_empty());
    }

    #[test]
    fn different_seeds_produce_different_selections() {
        let snap = uniform_pool(50);
        let r1 = JurySelector.draw(&snap, &Seed::new([10u8; 32]), b"ctx", 5);
        let r2 = JurySelector.draw(&snap, &Seed::new([20u8; 32]), b"ctx", 5);
        assert_ne!(r1, r2);
    }

    #[test]
    fn heavy_weight_dominates_single_seat() {
        let snap = PoolSnapshot::from_entries(vec![
            PoolEntry { participant: p("light-a"), weight: 1 },
            PoolEntry { participant: p("light-b"), weight: 1 },
            PoolEntry { participant: p("heavy"), weight: 8 },
        ]);
        let trials = 10_000u32;
        let mut heavy = 0u32;
        for i in 0..trials {
            let mut seed = [0u8; 32];
            seed[..4].copy_from_slice(&i.to_be_bytes());
            let drawn = JurySelector.draw(&snap, &Seed::new(seed), b"weighted", 1);
            if drawn[0] == p("heavy") {
                heavy += 1;
            }
        }
        let share = heavy as f64 / trials as f64;
        assert!((0.75..=0.85).contains(&share), "heavy share {share}");
    }

    #[test]
    fn select_sets_deadline_and_quorum() {
        let params = AdjudicationParams::default();
        let now = Timestamp::new(1_000);
        let jury = JurySelector
            .select(case(), &uniform_pool(10), Seed::new([1u8; 32]), 5, 3, now, &params)
            .unwrap();
        assert_eq!(jury.size(), 5);
        assert_eq!(jury.deadline, now.plus_secs(params.voting_period_secs));
        assert_eq!(jury.required_votes, 4);
        assert!(!jury.concluded);
    }

    #[test]
    fn select_seats_fewer_when_pool_small() {
        let params = AdjudicationParams::default();
        let jury = JurySelector
            .select(case(), &uniform_pool(4), Seed::new([1u8; 32]), 7, 3, Timestamp::new(0), &params)
            .unwrap();
        assert_eq!(jury.size(), 4);
        assert_eq!(jury.required_votes, 3);
    }

    #[test]
    fn select_rejects_undersized_pool() {
        let params = AdjudicationParams::default();
        let err = JurySelector
            .select(case(), &uniform_pool(2), Seed::new([1u8; 32]), 5, 3, Timestamp::new(0), &params)
            .unwrap_err();
        assert_eq!(err, AdjudicationError::InsufficientPool { eligible: 2, required: 3 });
    }

    #[test]
    fn select_rejects_out_of_bounds_size() {
        let params = AdjudicationParams::default();
        let err = JurySelector
            .select(case(), &uniform_pool(40), Seed::new([1u8; 32]), 30, 3, Timestamp::new(0), &params)
            .unwrap_err();
        assert!(matches!(err, AdjudicationError::InvalidJurySize { size: 30, .. }));
    }

    #[test]
    fn verify_replays_selection() {
        let params = AdjudicationParams::default();
        let snap = uniform_pool(20);
        let jury = JurySelector
            .select(case(), &snap, Seed::new([8u8; 32]), 5, 3, Timestamp::new(0), &params)
            .unwrap();
        assert!(JurySelector.verify(&jury, &snap));

        let mut forged = jury.clone();
        forged.jurors.swap(0, 1);
        assert!(!JurySelector.verify(&forged, &snap));
        assert!(!JurySelector.verify(&jury, &uniform_pool(21)));
    }
}
