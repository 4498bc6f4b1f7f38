//! Juror outcomes — how each juror's vote compared with the resolved verdict.
//!
//! The engine does not score reputation. It reports alignment so the external
//! reputation collaborator can adjust weights:
//! - jurors who did not vote are reported with `voted = false`
//! - a voter is aligned when their vote points the same way as the verdict
//!   (payout > 0 for an approval, payout = 0 for a rejection)
//! - deviation is the distance in bps between the vote and the final payout

use crate::jury::Jury;
use crate::tally::{Resolution, Verdict, Vote};
use assize_types::ParticipantId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Outcome for a single juror on a resolved case.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JurorOutcome {
    pub juror: ParticipantId,
    /// Whether the juror cast a vote before resolution.
    pub voted: bool,
    /// Whether the vote agreed with the verdict. Always false for non-voters.
    pub aligned: bool,
    /// `|vote payout − final payout|` in bps; `None` for non-voters.
    pub deviation_bps: Option<u16>,
}

/// Compute per-juror outcomes for a resolved case, in jury draw order.
///
/// A no-quorum resolution has no verdict to align with; every juror is reported
/// unaligned and only the `voted` flag carries information.
pub fn compute_juror_outcomes(
    jury: &Jury,
    votes: &[&Vote],
    resolution: &Resolution,
) -> Vec<JurorOutcome> {
    let by_juror: HashMap<&ParticipantId, &Vote> = votes.iter().map(|v| (&v.juror, *v)).collect();
    let verdict = match resolution {
        Resolution::Consensus {
            verdict, payout_bps, ..
        } => Some((*verdict, payout_bps.raw())),
        Resolution::NoQuorum { .. } => None,
    };

    jury.jurors
        .iter()
        .map(|juror| match (by_juror.get(juror), verdict) {
            (Some(vote), Some((verdict, final_bps))) => {
                let favours = !vote.payout.is_zero();
                JurorOutcome {
                    juror: juror.clone(),
                    voted: true,
                    aligned: favours == (verdict == Verdict::Approved),
                    deviation_bps: Some(vote.payout.raw().abs_diff(final_bps)),
                }
            }
            (Some(_), None) => JurorOutcome {
                juror: juror.clone(),
                voted: true,
                aligned: false,
                deviation_bps: None,
            },
            (None, _) => JurorOutcome {
                juror: juror.clone(),
                voted: false,
                aligned: false,
                deviation_bps: None,
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tally::Trigger;
    use assize_types::{BasisPoints, CaseRef, ClaimId, ContentHash, Seed, Timestamp};

    fn case() -> CaseRef {
        CaseRef::Claim {
            claim: ClaimId::new(1),
            round: 0,
        }
    }

    fn jury() -> Jury {
        Jury {
            case: case(),
            jurors: ["a", "b", "c"].into_iter().map(ParticipantId::new).collect(),
            seed: Seed::new([0u8; 32]),
            pool_digest: [0u8; 32],
            selected_at: Timestamp::new(0),
            deadline: Timestamp::new(10),
            required_votes: 2,
            concluded: true,
            payout_bps: Some(BasisPoints::new(600).unwrap()),
        }
    }

    fn vote(juror: &str, payout: u16) -> Vote {
        Vote {
            case: case(),
            juror: ParticipantId::new(juror),
            payout: BasisPoints::new(payout).unwrap(),
            confidence: BasisPoints::new(8000).unwrap(),
            rationale: ContentHash::ZERO,
            cast_at: Timestamp::new(1),
        }
    }

    #[test]
    fn approval_outcomes() {
        let votes = [vote("a", 800), vote("b", 0)];
        let refs: Vec<&Vote> = votes.iter().collect();
        let resolution = Resolution::Consensus {
            verdict: Verdict::Approved,
            payout_bps: BasisPoints::new(600).unwrap(),
            weighted_average_bps: BasisPoints::new(600).unwrap(),
            votes_cast: 2,
            votes_in_favour: 1,
            trigger: Trigger::QuorumReached,
        };
        let outcomes = compute_juror_outcomes(&jury(), &refs, &resolution);
        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].aligned);
        assert_eq!(outcomes[0].deviation_bps, Some(200));
        assert!(!outcomes[1].aligned);
        assert_eq!(outcomes[1].deviation_bps, Some(600));
        assert!(!outcomes[2].voted);
        assert_eq!(outcomes[2].deviation_bps, None);
    }

    #[test]
    fn no_quorum_reports_participation_only() {
        let votes = [vote("a", 800)];
        let refs: Vec<&Vote> = votes.iter().collect();
        let outcomes = compute_juror_outcomes(&jury(), &refs, &Resolution::NoQuorum { votes_cast: 1 });
        assert!(outcomes[0].voted && !outcomes[0].aligned);
        assert!(!outcomes[1].voted);
    }
}
