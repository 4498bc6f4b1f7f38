use proptest::prelude::*;

use assize_adjudication::tally::compute_consensus;
use assize_adjudication::{
    AdjudicationEngine, ClaimSubmission, JurySelector, PoolEntry, PoolSnapshot, Resolution,
    Verdict, Vote,
};
use assize_nullables::NullReputation;
use assize_types::{
    AdjudicationParams, Amount, BasisPoints, CaseRef, ClaimCategory, ClaimId, ContentHash,
    ParticipantId, PolicyRef, Seed, Timestamp,
};
use std::collections::HashSet;

fn vote(i: usize, payout: u16, confidence: u16) -> Vote {
    Vote {
        case: CaseRef::Claim {
            claim: ClaimId::new(1),
            round: 0,
        },
        juror: ParticipantId::new(format!("j{i}")),
        payout: BasisPoints::new(payout).unwrap(),
        confidence: BasisPoints::new(confidence).unwrap(),
        rationale: ContentHash::ZERO,
        cast_at: Timestamp::new(0),
    }
}

proptest! {
    /// The approved amount never exceeds the requested amount.
    #[test]
    fn payout_never_exceeds_request(
        requested in 1u128..1_000_000_000_000,
        ballots in prop::collection::vec((0u16..=10_000, 5_000u16..=10_000), 1..21),
    ) {
        let votes: Vec<Vote> = ballots.iter().enumerate().map(|(i, (p, c))| vote(i, *p, *c)).collect();
        let (_, average, _, _) = compute_consensus(&votes, 60);
        let approved = Amount::new(requested).mul_bps_floor(average);
        prop_assert!(approved.raw() <= requested);
    }

    /// The weighted average stays between the smallest and largest cast payout.
    #[test]
    fn average_within_cast_range(
        ballots in prop::collection::vec((0u16..=10_000, 5_000u16..=10_000), 1..21),
    ) {
        let votes: Vec<Vote> = ballots.iter().enumerate().map(|(i, (p, c))| vote(i, *p, *c)).collect();
        let (_, average, _, _) = compute_consensus(&votes, 60);
        let lo = ballots.iter().map(|(p, _)| *p).min().unwrap();
        let hi = ballots.iter().map(|(p, _)| *p).max().unwrap();
        prop_assert!(average.raw() >= lo && average.raw() <= hi);
    }

    /// Approval requires the favouring share to reach the threshold, and an even
    /// split never approves.
    #[test]
    fn approval_reaches_threshold_and_rejects_even_splits(
        favour in 0u32..10,
        against in 0u32..10,
        threshold in 0u32..=100,
    ) {
        prop_assume!(favour + against > 0);
        let votes: Vec<Vote> = (0..favour).map(|i| vote(i as usize, 5_000, 8_000))
            .chain((0..against).map(|i| vote(100 + i as usize, 0, 8_000)))
            .collect();
        let (verdict, _, cast, in_favour) = compute_consensus(&votes, threshold);
        prop_assert_eq!(cast, favour + against);
        prop_assert_eq!(in_favour, favour);
        let expected = favour > 0
            && favour != against
            && favour * 100 >= threshold * (favour + against);
        prop_assert_eq!(verdict == Verdict::Approved, expected);
    }

    /// Selection is unaffected by the order entries were added in.
    #[test]
    fn selection_ignores_insertion_order(
        weights in prop::collection::vec(1u128..1_000, 3..25),
        seed in prop::array::uniform32(any::<u8>()),
    ) {
        let entries: Vec<PoolEntry> = weights.iter().enumerate().map(|(i, w)| PoolEntry {
            participant: ParticipantId::new(format!("p{i:02}")),
            weight: *w,
        }).collect();
        let forward = PoolSnapshot::from_entries(entries.clone());
        let backward = PoolSnapshot::from_entries(entries.into_iter().rev());
        let seed = Seed::new(seed);
        prop_assert_eq!(
            JurySelector.draw(&forward, &seed, b"ctx", 3),
            JurySelector.draw(&backward, &seed, b"ctx", 3)
        );
    }

    /// Seated juries respect the size bounds, never repeat a juror and never seat the
    /// claimant.
    #[test]
    fn jury_bounds_and_claimant_exclusion(
        pool_size in 3usize..40,
        size in 3u32..=21,
        seed in prop::array::uniform32(any::<u8>()),
    ) {
        let params = AdjudicationParams::default();
        let mut engine = AdjudicationEngine::new(params.clone()).unwrap();
        for i in 0..pool_size {
            engine.register_juror(ParticipantId::new(format!("j{i:02}"))).unwrap();
        }
        let claimant = ParticipantId::new("claimant");
        engine.register_juror(claimant.clone()).unwrap();
        let id = engine.submit_claim(ClaimSubmission {
            claimant: claimant.clone(),
            policy: PolicyRef::new("POL-1"),
            category: ClaimCategory::Travel,
            requested_amount: Amount::new(300),
            description: "Cancelled flight, rebooking fees".into(),
            evidence: Vec::new(),
        }, Timestamp::new(0)).unwrap();

        let reputation = NullReputation::new(7);
        let jury = engine
            .select_jury(id, Seed::new(seed), Some(size), &reputation, Timestamp::new(0))
            .unwrap();
        let n = jury.jurors.len() as u32;
        prop_assert!(n >= params.min_jury_size && n <= params.max_jury_size);
        prop_assert_eq!(n, size.min(pool_size as u32));
        prop_assert!(!jury.contains(&claimant));
        let unique: HashSet<_> = jury.jurors.iter().collect();
        prop_assert_eq!(unique.len(), jury.jurors.len());
    }

    /// Deadline resolution with fewer than the minimum votes is never a verdict.
    #[test]
    fn thin_deadline_is_no_quorum(cast in 0usize..3) {
        let mut engine = AdjudicationEngine::new(AdjudicationParams::default()).unwrap();
        for i in 0..6 {
            engine.register_juror(ParticipantId::new(format!("j{i}"))).unwrap();
        }
        let id = engine.submit_claim(ClaimSubmission {
            claimant: ParticipantId::new("c"),
            policy: PolicyRef::new("P"),
            category: ClaimCategory::Pet,
            requested_amount: Amount::new(100),
            description: "Vaccination and check-up".into(),
            evidence: Vec::new(),
        }, Timestamp::new(0)).unwrap();
        let jury = engine
            .select_jury(id, Seed::new([1u8; 32]), Some(5), &NullReputation::default(), Timestamp::new(0))
            .unwrap();
        for j in jury.jurors.iter().take(cast) {
            engine.submit_vote(id, j, 10_000, 10_000, ContentHash::ZERO, Timestamp::new(1)).unwrap();
        }
        let after = jury.deadline.plus_secs(1);
        let resolution = engine.evaluate(id, after).unwrap();
        prop_assert_eq!(resolution, Some(Resolution::NoQuorum { votes_cast: cast as u32 }));
    }
}
