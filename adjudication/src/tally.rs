//! Vote tally — jurors cast payout votes, the tally resolves each case exactly once.
//!
//! Resolution fires when the first of these holds:
//! 1. the jury's required-vote count has been reached;
//! 2. the deadline has passed with at least `min_jury_size` votes recorded.
//!
//! A deadline with fewer votes ends the case without quorum.

use crate::error::AdjudicationError;
use crate::jury::Jury;
use assize_types::{AdjudicationParams, BasisPoints, CaseRef, ContentHash, ParticipantId, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Lowest confidence a juror may express (50%).
pub const MIN_CONFIDENCE_BPS: u16 = 5_000;

/// A juror's recorded vote. Immutable once stored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub case: CaseRef,
    pub juror: ParticipantId,
    /// Fraction of the requested amount the juror would pay out.
    pub payout: BasisPoints,
    /// How sure the juror is, within `[5000, 10000]`.
    pub confidence: BasisPoints,
    /// Hash of the rationale text held by the content store.
    pub rationale: ContentHash,
    pub cast_at: Timestamp,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Approved,
    Rejected,
}

/// What caused a case to resolve.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trigger {
    QuorumReached,
    DeadlinePassed,
}

/// The result of resolving a case.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    Consensus {
        verdict: Verdict,
        /// Payout fraction applied to the requested amount; zero when rejected.
        payout_bps: BasisPoints,
        /// Confidence-weighted average of all cast payouts.
        weighted_average_bps: BasisPoints,
        votes_cast: u32,
        votes_in_favour: u32,
        trigger: Trigger,
    },
    NoQuorum {
        votes_cast: u32,
    },
}

/// Consensus arithmetic over a set of votes.
///
/// Approved iff the votes favouring a payout reach `threshold_pct` percent of the
/// votes cast. An even split (as many for as against) always rejects. The weighted
/// average is `Σ(payout·confidence) / Σ(confidence)`, rounded down.
pub fn compute_consensus<'a>(
    votes: impl IntoIterator<Item = &'a Vote>,
    threshold_pct: u32,
) -> (Verdict, BasisPoints, u32, u32) {
    let mut cast = 0u32;
    let mut in_favour = 0u32;
    let mut weighted_sum = 0u128;
    let mut confidence_sum = 0u128;
    for vote in votes {
        cast += 1;
        if !vote.payout.is_zero() {
            in_favour += 1;
        }
        weighted_sum += vote.payout.raw() as u128 * vote.confidence.raw() as u128;
        confidence_sum += vote.confidence.raw() as u128;
    }

    let average = weighted_sum.checked_div(confidence_sum).unwrap_or(0) as u16;
    // The average of values within 0..=10_000 stays within that range.
    let average = BasisPoints::new(average).unwrap_or(BasisPoints::MAX);

    let even_split = in_favour as u64 * 2 == cast as u64;
    let approved = in_favour > 0
        && !even_split
        && in_favour as u64 * 100 >= threshold_pct as u64 * cast as u64;
    let verdict = if approved {
        Verdict::Approved
    } else {
        Verdict::Rejected
    };
    (verdict, average, cast, in_favour)
}

/// Range-check a vote's payout and confidence.
pub fn check_vote_ranges(
    payout_bps: u16,
    confidence_bps: u16,
) -> Result<(BasisPoints, BasisPoints), AdjudicationError> {
    let payout =
        BasisPoints::new(payout_bps).ok_or(AdjudicationError::InvalidPayout(payout_bps))?;
    let confidence = BasisPoints::new(confidence_bps)
        .filter(|c| c.raw() >= MIN_CONFIDENCE_BPS)
        .ok_or(AdjudicationError::InvalidConfidence(confidence_bps))?;
    Ok((payout, confidence))
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Ballot {
    jury: Jury,
    votes: BTreeMap<ParticipantId, Vote>,
}

/// Owns every jury seat and vote, keyed by case.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct VoteTally {
    ballots: HashMap<CaseRef, Ballot>,
}

impl VoteTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a freshly selected jury. A case can only be opened once.
    pub fn open(&mut self, jury: Jury) -> bool {
        if self.ballots.contains_key(&jury.case) {
            return false;
        }
        self.ballots.insert(
            jury.case,
            Ballot {
                jury,
                votes: BTreeMap::new(),
            },
        );
        true
    }

    pub fn jury(&self, case: &CaseRef) -> Option<&Jury> {
        self.ballots.get(case).map(|b| &b.jury)
    }

    /// Votes for a case in juror order.
    pub fn votes(&self, case: &CaseRef) -> Vec<&Vote> {
        self.ballots
            .get(case)
            .map(|b| b.votes.values().collect())
            .unwrap_or_default()
    }

    pub fn vote_count(&self, case: &CaseRef) -> usize {
        self.ballots.get(case).map_or(0, |b| b.votes.len())
    }

    pub fn has_voted(&self, case: &CaseRef, juror: &ParticipantId) -> bool {
        self.ballots
            .get(case)
            .is_some_and(|b| b.votes.contains_key(juror))
    }

    /// Record a vote. Validation happens before any lookup so malformed input never
    /// touches state.
    pub fn submit_vote(
        &mut self,
        case: CaseRef,
        juror: &ParticipantId,
        payout_bps: u16,
        confidence_bps: u16,
        rationale: ContentHash,
        now: Timestamp,
    ) -> Result<(), AdjudicationError> {
        let (payout, confidence) = check_vote_ranges(payout_bps, confidence_bps)?;

        let ballot = self
            .ballots
            .get_mut(&case)
            .ok_or_else(|| AdjudicationError::NotSelected(juror.clone()))?;
        if !ballot.jury.contains(juror) {
            return Err(AdjudicationError::NotSelected(juror.clone()));
        }
        if !ballot.jury.is_open(now) {
            return Err(AdjudicationError::VotingClosed {
                case,
                deadline: ballot.jury.deadline,
            });
        }
        if ballot.votes.contains_key(juror) {
            return Err(AdjudicationError::AlreadyVoted(juror.clone()));
        }

        ballot.votes.insert(
            juror.clone(),
            Vote {
                case,
                juror: juror.clone(),
                payout,
                confidence,
                rationale,
                cast_at: now,
            },
        );
        Ok(())
    }

    /// Resolve `case` if a resolution condition holds at `now`.
    ///
    /// Returns `None` if the case is unknown, already concluded, or still open.
    /// Quorum is checked before the deadline, so when both hold the votes decide.
    pub fn try_resolve(
        &mut self,
        case: &CaseRef,
        now: Timestamp,
        params: &AdjudicationParams,
    ) -> Option<Resolution> {
        let ballot = self.ballots.get_mut(case)?;
        if ballot.jury.concluded {
            return None;
        }

        let cast = ballot.votes.len() as u32;
        let trigger = if cast >= ballot.jury.required_votes {
            Trigger::QuorumReached
        } else if ballot.jury.deadline_passed(now) {
            if cast < params.min_jury_size {
                ballot.jury.concluded = true;
                return Some(Resolution::NoQuorum { votes_cast: cast });
            }
            Trigger::DeadlinePassed
        } else {
            return None;
        };

        let (verdict, average, votes_cast, votes_in_favour) =
            compute_consensus(ballot.votes.values(), params.consensus_threshold_pct);
        let payout_bps = match verdict {
            Verdict::Approved => average,
            Verdict::Rejected => BasisPoints::ZERO,
        };
        ballot.jury.concluded = true;
        ballot.jury.payout_bps = Some(payout_bps);

        Some(Resolution::Consensus {
            verdict,
            payout_bps,
            weighted_average_bps: average,
            votes_cast,
            votes_in_favour,
            trigger,
        })
    }

    /// Every case whose jury has not concluded.
    pub fn open_cases(&self) -> impl Iterator<Item = &CaseRef> {
        self.ballots
            .iter()
            .filter(|(_, b)| !b.jury.concluded)
            .map(|(case, _)| case)
    }
}
