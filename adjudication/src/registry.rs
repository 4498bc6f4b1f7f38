//! Claim registry — owns claim and appeal records and every state transition.
//!
//! Transitions are checked against [`ClaimStatus::can_transition_to`]. Verdict
//! transitions are crate-private: only the tally resolution path in the engine can
//! move a claim out of `Voting`.

use crate::appeal::Appeal;
use crate::assessment::Assessment;
use crate::error::AdjudicationError;
use crate::events::ClaimEvent;
use assize_types::{
    AdjudicationParams, Amount, AppealId, CaseRef, ClaimCategory, ClaimId, ClaimStatus,
    ContentHash, ParticipantId, PolicyRef, Seed, Timestamp,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Input for a new claim.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimSubmission {
    pub claimant: ParticipantId,
    pub policy: PolicyRef,
    pub category: ClaimCategory,
    /// Smallest currency unit.
    pub requested_amount: Amount,
    pub description: String,
    #[serde(default)]
    pub evidence: Vec<ContentHash>,
}

/// A claim record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub id: ClaimId,
    pub claimant: ParticipantId,
    pub policy: PolicyRef,
    pub category: ClaimCategory,
    pub requested_amount: Amount,
    pub description: String,
    pub evidence: BTreeSet<ContentHash>,
    pub status: ClaimStatus,
    pub submitted_at: Timestamp,
    pub resolved_at: Option<Timestamp>,
    /// `None` until resolved; never exceeds `requested_amount`.
    pub approved_amount: Option<Amount>,
    /// The case currently (or most recently) being tried.
    pub current_case: Option<CaseRef>,
    /// Every case opened for this claim, oldest first.
    pub case_history: Vec<CaseRef>,
    /// Rounds that ended without quorum.
    pub inconclusive_rounds: u32,
    /// Seeds already used to draw a jury for this claim.
    pub consumed_seeds: BTreeSet<Seed>,
    /// Size of the jury whose verdict an appeal would contest.
    pub last_jury_size: Option<u32>,
    pub appeal: Option<AppealId>,
    pub assessment: Option<Assessment>,
    /// Rejected because no-quorum rounds exhausted the retry cap.
    pub forced_rejection: bool,
}

impl Claim {
    /// Round number for the next claim (non-appeal) jury.
    pub fn next_round(&self) -> u32 {
        self.case_history.iter().filter(|c| !c.is_appeal()).count() as u32
    }
}

/// Check the shape of a submission.
pub fn validate_submission(
    submission: &ClaimSubmission,
    params: &AdjudicationParams,
) -> Result<(), AdjudicationError> {
    if !submission.claimant.is_valid() {
        return Err(AdjudicationError::InvalidClaim("claimant id is malformed".into()));
    }
    check_entry_conditions(&submission.policy, submission.requested_amount)?;
    let len = submission.description.trim().chars().count();
    if len < params.min_description_len {
        return Err(AdjudicationError::InvalidClaim(format!(
            "description has {len} characters, at least {} required",
            params.min_description_len
        )));
    }
    Ok(())
}

fn check_entry_conditions(policy: &PolicyRef, amount: Amount) -> Result<(), AdjudicationError> {
    if !policy.is_valid() {
        return Err(AdjudicationError::InvalidClaim(format!(
            "policy reference {policy:?} is malformed"
        )));
    }
    if amount.is_zero() {
        return Err(AdjudicationError::InvalidClaim(
            "requested amount must be positive".into(),
        ));
    }
    Ok(())
}

/// Arena of claims and appeals keyed by opaque ids.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ClaimRegistry {
    claims: BTreeMap<ClaimId, Claim>,
    appeals: BTreeMap<AppealId, Appeal>,
    next_claim: u64,
    next_appeal: u64,
}

impl ClaimRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and store a new claim in `Submitted`.
    pub fn submit(
        &mut self,
        submission: ClaimSubmission,
        params: &AdjudicationParams,
        now: Timestamp,
    ) -> Result<ClaimId, AdjudicationError> {
        validate_submission(&submission, params)?;

        self.next_claim += 1;
        let id = ClaimId::new(self.next_claim);
        self.claims.insert(
            id,
            Claim {
                id,
                claimant: submission.claimant,
                policy: submission.policy,
                category: submission.category,
                requested_amount: submission.requested_amount,
                description: submission.description,
                evidence: submission.evidence.into_iter().collect(),
                status: ClaimStatus::Submitted,
                submitted_at: now,
                resolved_at: None,
                approved_amount: None,
                current_case: None,
                case_history: Vec::new(),
                inconclusive_rounds: 0,
                consumed_seeds: BTreeSet::new(),
                last_jury_size: None,
                appeal: None,
                assessment: None,
                forced_rejection: false,
            },
        );
        Ok(id)
    }

    pub fn get(&self, id: ClaimId) -> Option<&Claim> {
        self.claims.get(&id)
    }

    pub fn require(&self, id: ClaimId) -> Result<&Claim, AdjudicationError> {
        self.claims.get(&id).ok_or(AdjudicationError::ClaimNotFound(id))
    }

    pub(crate) fn require_mut(&mut self, id: ClaimId) -> Result<&mut Claim, AdjudicationError> {
        self.claims
            .get_mut(&id)
            .ok_or(AdjudicationError::ClaimNotFound(id))
    }

    pub fn claims(&self) -> impl Iterator<Item = &Claim> {
        self.claims.values()
    }

    pub fn len(&self) -> usize {
        self.claims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    pub fn appeal(&self, id: AppealId) -> Option<&Appeal> {
        self.appeals.get(&id)
    }

    pub fn appeal_for(&self, claim: ClaimId) -> Option<&Appeal> {
        self.claims
            .get(&claim)
            .and_then(|c| c.appeal)
            .and_then(|a| self.appeals.get(&a))
    }

    pub(crate) fn set_assessment(
        &mut self,
        id: ClaimId,
        assessment: Assessment,
    ) -> Result<(), AdjudicationError> {
        self.require_mut(id)?.assessment = Some(assessment);
        Ok(())
    }

    pub fn seed_consumed(&self, id: ClaimId, seed: &Seed) -> bool {
        self.claims
            .get(&id)
            .is_some_and(|c| c.consumed_seeds.contains(seed))
    }

    /// Record a seated jury: burns the seed and makes `case` current.
    pub(crate) fn attach_case(
        &mut self,
        id: ClaimId,
        case: CaseRef,
        seed: Seed,
        jury_size: u32,
    ) -> Result<(), AdjudicationError> {
        let claim = self.require_mut(id)?;
        claim.consumed_seeds.insert(seed);
        claim.current_case = Some(case);
        claim.case_history.push(case);
        if !case.is_appeal() {
            claim.last_jury_size = Some(jury_size);
        }
        Ok(())
    }

    /// Check that `to` is reachable from the claim's current state.
    pub(crate) fn check_transition(
        &self,
        id: ClaimId,
        to: ClaimStatus,
    ) -> Result<(), AdjudicationError> {
        let claim = self.require(id)?;
        let from = claim.status;
        if !from.can_transition_to(to) {
            return Err(AdjudicationError::InvalidTransition { claim: id, from, to });
        }
        if from == ClaimStatus::Submitted {
            check_entry_conditions(&claim.policy, claim.requested_amount)?;
        }
        Ok(())
    }

    /// Move a claim to `to`. Entry conditions for leaving `Submitted` are rechecked.
    pub(crate) fn transition(
        &mut self,
        id: ClaimId,
        to: ClaimStatus,
        now: Timestamp,
    ) -> Result<ClaimEvent, AdjudicationError> {
        self.check_transition(id, to)?;
        let claim = self.require_mut(id)?;
        let from = claim.status;
        claim.status = to;
        tracing::info!(claim = %id, from = ?from, to = ?to, "claim transition");
        Ok(ClaimEvent {
            claim: id,
            case: claim.current_case,
            from,
            to,
            payout_amount: None,
            timestamp: now,
        })
    }

    /// Move a claim into a verdict state and record the approved amount.
    pub(crate) fn resolve(
        &mut self,
        id: ClaimId,
        to: ClaimStatus,
        approved: Amount,
        now: Timestamp,
    ) -> Result<ClaimEvent, AdjudicationError> {
        let mut event = self.transition(id, to, now)?;
        let claim = self.require_mut(id)?;
        let approved = approved.min(claim.requested_amount);
        claim.approved_amount = Some(approved);
        claim.resolved_at = Some(now);
        event.payout_amount = Some(approved);
        Ok(event)
    }

    pub(crate) fn next_appeal_id(&mut self) -> AppealId {
        self.next_appeal += 1;
        AppealId::new(self.next_appeal)
    }

    pub(crate) fn insert_appeal(&mut self, appeal: Appeal) -> Result<(), AdjudicationError> {
        let claim = self.require_mut(appeal.claim)?;
        if claim.appeal.is_some() {
            return Err(AdjudicationError::AlreadyAppealed(appeal.claim));
        }
        claim.appeal = Some(appeal.id);
        self.appeals.insert(appeal.id, appeal);
        Ok(())
    }

    pub(crate) fn mark_appeal_processed(&mut self, id: AppealId) {
        if let Some(appeal) = self.appeals.get_mut(&id) {
            appeal.processed = true;
        }
    }
}
