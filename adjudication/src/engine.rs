//! Adjudication engine — connects pool, selector, registry, tally and appeals into
//! one claim lifecycle.
//!
//! The engine is a plain owned value. Callers serialize access to it (one writer at a
//! time) and pass the current time into every operation; nothing here reads a clock or
//! spawns work. Deadlines are detected by [`AdjudicationEngine::sweep`] or
//! [`AdjudicationEngine::evaluate`], driven by a scheduler.

use crate::appeal::AppealController;
use crate::assessment::{Assessment, ClaimAssessor};
use crate::error::AdjudicationError;
use crate::events::{ClaimEvent, EngineEvent};
use crate::jury::Jury;
use crate::outcomes::compute_juror_outcomes;
use crate::pool::{JurorPool, PoolSnapshot, ReputationSource};
use crate::registry::{Claim, ClaimRegistry, ClaimSubmission};
use crate::selection::JurySelector;
use crate::tally::{check_vote_ranges, Resolution, Verdict, Vote, VoteTally};
use assize_types::{
    AdjudicationParams, Amount, AppealId, CaseRef, ClaimId, ClaimStatus, ContentHash,
    ParticipantId, Seed, Timestamp,
};
use assize_utils::stats::StatsCounter;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

pub const STAT_CLAIMS_SUBMITTED: &str = "claims_submitted";
pub const STAT_JURIES_SELECTED: &str = "juries_selected";
pub const STAT_VOTES_RECORDED: &str = "votes_recorded";
pub const STAT_APPROVED: &str = "resolved_approved";
pub const STAT_REJECTED: &str = "resolved_rejected";
pub const STAT_NO_QUORUM: &str = "resolved_no_quorum";
pub const STAT_FORCED_REJECTIONS: &str = "forced_rejections";
pub const STAT_APPEALS_FILED: &str = "appeals_filed";
pub const STAT_APPEALS_LAPSED: &str = "appeals_lapsed";
pub const STAT_CLAIMS_CLOSED: &str = "claims_closed";

const STAT_NAMES: &[&str] = &[
    STAT_CLAIMS_SUBMITTED,
    STAT_JURIES_SELECTED,
    STAT_VOTES_RECORDED,
    STAT_APPROVED,
    STAT_REJECTED,
    STAT_NO_QUORUM,
    STAT_FORCED_REJECTIONS,
    STAT_APPEALS_FILED,
    STAT_APPEALS_LAPSED,
    STAT_CLAIMS_CLOSED,
];

/// What a sweep did.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepReport {
    /// Cases resolved by deadline during this sweep.
    pub resolved: Vec<(CaseRef, Resolution)>,
    /// Appealed claims whose appeal lapsed without a jury, now `AppealRejected`.
    pub lapsed: Vec<ClaimId>,
    /// Claims moved to `Closed`.
    pub closed: Vec<ClaimId>,
    /// Claims waiting for a jury (after submission, no-quorum or appeal).
    pub awaiting_selection: Vec<ClaimId>,
}

impl SweepReport {
    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty() && self.lapsed.is_empty() && self.closed.is_empty()
    }
}

/// Persistable engine state. Pending events and counters are not included.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub params: AdjudicationParams,
    pub pool: JurorPool,
    pub registry: ClaimRegistry,
    pub tally: VoteTally,
}

pub struct AdjudicationEngine {
    params: AdjudicationParams,
    pool: JurorPool,
    registry: ClaimRegistry,
    tally: VoteTally,
    selector: JurySelector,
    appeals: AppealController,
    /// Pending events for the host to drain.
    pending_events: Vec<EngineEvent>,
    stats: StatsCounter,
}

impl AdjudicationEngine {
    pub fn new(params: AdjudicationParams) -> Result<Self, AdjudicationError> {
        params.validate()?;
        Ok(Self::from_parts(params, JurorPool::new(), ClaimRegistry::new(), VoteTally::new()))
    }

    fn from_parts(
        params: AdjudicationParams,
        pool: JurorPool,
        registry: ClaimRegistry,
        tally: VoteTally,
    ) -> Self {
        Self {
            params,
            pool,
            registry,
            tally,
            selector: JurySelector,
            appeals: AppealController,
            pending_events: Vec::new(),
            stats: StatsCounter::new(STAT_NAMES),
        }
    }

    pub fn params(&self) -> &AdjudicationParams {
        &self.params
    }

    // ── Juror pool ───────────────────────────────────────────────────────

    pub fn register_juror(&mut self, participant: ParticipantId) -> Result<bool, AdjudicationError> {
        if !participant.is_valid() {
            return Err(AdjudicationError::InvalidParticipant(
                participant.as_str().to_string(),
            ));
        }
        Ok(self.pool.register(participant))
    }

    pub fn deregister_juror(&mut self, participant: &ParticipantId) -> bool {
        self.pool.deregister(participant)
    }

    pub fn pool(&self) -> &JurorPool {
        &self.pool
    }

    // ── Claims ───────────────────────────────────────────────────────────

    pub fn submit_claim(
        &mut self,
        submission: ClaimSubmission,
        now: Timestamp,
    ) -> Result<ClaimId, AdjudicationError> {
        let id = self.registry.submit(submission, &self.params, now)?;
        self.stats.increment(STAT_CLAIMS_SUBMITTED);
        tracing::info!(claim = %id, "claim submitted");
        Ok(id)
    }

    /// Run an advisory assessor over a claim and attach the result.
    pub fn assess_claim(
        &mut self,
        id: ClaimId,
        assessor: &dyn ClaimAssessor,
    ) -> Result<Assessment, AdjudicationError> {
        let claim = self.registry.require(id)?;
        let assessment = assessor.assess(claim.category, claim.requested_amount, &claim.description);
        tracing::debug!(
            claim = %id,
            assessor = assessor.name(),
            score = assessment.fraud_score_bps,
            "claim assessed"
        );
        self.registry.set_assessment(id, assessment.clone())?;
        Ok(assessment)
    }

    // ── Jury selection ───────────────────────────────────────────────────

    /// Draw a jury for a claim waiting for one.
    ///
    /// Claims in `Submitted` or `Inconclusive` get a claim jury of `size` seats (the
    /// configured default when `None`). Claims in `Appealed` get an appeal jury drawn
    /// with amplified weights, sized at least the original jury plus the increment.
    /// Appeal juries prefer jurors who never sat on the claim; when too few remain,
    /// earlier jurors who voted become eligible again.
    /// Nothing is recorded unless the whole selection succeeds.
    pub fn select_jury(
        &mut self,
        id: ClaimId,
        seed: Seed,
        size: Option<u32>,
        reputation: &dyn ReputationSource,
        now: Timestamp,
    ) -> Result<Jury, AdjudicationError> {
        let claim = self.registry.require(id)?;
        if !claim.status.awaiting_selection() {
            return Err(AdjudicationError::NotAwaitingSelection {
                claim: id,
                status: claim.status,
            });
        }
        if claim.consumed_seeds.contains(&seed) {
            return Err(AdjudicationError::InvalidSeed(id));
        }

        let excluded = self.exclusions(claim, claim.status.is_appeal_phase());
        let appeal = match (claim.status, claim.appeal) {
            (ClaimStatus::Appealed, Some(appeal)) => Some(appeal),
            _ => None,
        };
        let jury = match appeal {
            Some(appeal) => {
                let min_seats = claim.last_jury_size.unwrap_or(self.params.min_jury_size);
                let mut snapshot = self.pool.reputation_weighted_jurors(id, reputation, &excluded);
                if snapshot.len() < min_seats as usize {
                    tracing::debug!(
                        claim = %id,
                        eligible = snapshot.len(),
                        "too few fresh jurors for appeal, reseating earlier voters"
                    );
                    let required = self.exclusions(claim, false);
                    snapshot = self.pool.reputation_weighted_jurors(id, reputation, &required);
                }
                let seats = self.appeals.jury_size(claim, size, &self.params);
                self.selector.select(
                    CaseRef::Appeal { claim: id, appeal },
                    &snapshot,
                    seed,
                    seats,
                    min_seats,
                    now,
                    &self.params,
                )?
            }
            None => {
                let snapshot = self.pool.snapshot(id, reputation, &excluded);
                let seats = size.unwrap_or(self.params.default_jury_size);
                self.selector.select(
                    CaseRef::Claim {
                        claim: id,
                        round: claim.next_round(),
                    },
                    &snapshot,
                    seed,
                    seats,
                    self.params.min_jury_size,
                    now,
                    &self.params,
                )?
            }
        };

        let (selected, voting) = if appeal.is_some() {
            (ClaimStatus::AppealJurySelected, ClaimStatus::AppealVoting)
        } else {
            (ClaimStatus::JurySelected, ClaimStatus::Voting)
        };
        if self.tally.jury(&jury.case).is_some() {
            return Err(AdjudicationError::CaseAlreadyOpen(jury.case));
        }
        // Entry conditions are rechecked before anything is recorded.
        self.registry.check_transition(id, selected)?;
        self.registry
            .attach_case(id, jury.case, seed, jury.size() as u32)?;
        let first = self.registry.transition(id, selected, now)?;
        let second = self.registry.transition(id, voting, now)?;
        let opened = self.tally.open(jury.clone());
        debug_assert!(opened, "case {} opened twice", jury.case);

        self.stats.increment(STAT_JURIES_SELECTED);
        tracing::info!(
            case = %jury.case,
            jurors = jury.size(),
            required = jury.required_votes,
            deadline = %jury.deadline,
            "jury selected"
        );
        self.pending_events.push(EngineEvent::Transition(first));
        self.pending_events.push(EngineEvent::JuryDrawn {
            case: jury.case,
            jurors: jury.jurors.clone(),
            deadline: jury.deadline,
        });
        self.pending_events.push(EngineEvent::Transition(second));
        Ok(jury)
    }

    /// Participants who may not sit on the next jury for `claim`.
    ///
    /// - the claimant, always
    /// - anyone seated on an open case of the same claim
    /// - earlier jurors who did not vote
    /// - with `fresh_panel`, every juror who sat on an earlier case of the claim
    fn exclusions(&self, claim: &Claim, fresh_panel: bool) -> HashSet<ParticipantId> {
        let mut excluded = HashSet::from([claim.claimant.clone()]);
        for case in &claim.case_history {
            let Some(jury) = self.tally.jury(case) else {
                continue;
            };
            if !jury.concluded || fresh_panel {
                excluded.extend(jury.jurors.iter().cloned());
                continue;
            }
            excluded.extend(
                jury.jurors
                    .iter()
                    .filter(|j| !self.tally.has_voted(case, j))
                    .cloned(),
            );
        }
        excluded
    }

    /// Replay the draw of a seated jury against the snapshot it was drawn from.
    pub fn verify_jury(&self, case: &CaseRef, snapshot: &PoolSnapshot) -> bool {
        self.tally
            .jury(case)
            .is_some_and(|jury| self.selector.verify(jury, snapshot))
    }

    // ── Voting ───────────────────────────────────────────────────────────

    /// Record a vote on the claim's current case and resolve it if quorum is reached.
    ///
    /// Only claims in a voting state accept votes; a seated juror voting after the
    /// case resolved gets `VotingClosed`.
    ///
    /// Returns the resolution when this vote concluded the case.
    pub fn submit_vote(
        &mut self,
        id: ClaimId,
        juror: &ParticipantId,
        payout_bps: u16,
        confidence_bps: u16,
        rationale: ContentHash,
        now: Timestamp,
    ) -> Result<Option<Resolution>, AdjudicationError> {
        check_vote_ranges(payout_bps, confidence_bps)?;
        let claim = self.registry.require(id)?;
        let case = claim
            .current_case
            .ok_or_else(|| AdjudicationError::NotSelected(juror.clone()))?;
        if !claim.status.accepts_votes() {
            return Err(match self.tally.jury(&case) {
                Some(jury) if jury.contains(juror) => AdjudicationError::VotingClosed {
                    case,
                    deadline: jury.deadline,
                },
                _ => AdjudicationError::NotSelected(juror.clone()),
            });
        }

        self.tally
            .submit_vote(case, juror, payout_bps, confidence_bps, rationale, now)?;
        self.stats.increment(STAT_VOTES_RECORDED);
        tracing::debug!(case = %case, juror = %juror, payout_bps, confidence_bps, "vote recorded");

        self.resolve_case(case, now)
    }

    /// Resolve the claim's current case if its deadline has passed.
    pub fn evaluate(
        &mut self,
        id: ClaimId,
        now: Timestamp,
    ) -> Result<Option<Resolution>, AdjudicationError> {
        match self.registry.require(id)?.current_case {
            Some(case) => self.resolve_case(case, now),
            None => Ok(None),
        }
    }

    /// Periodic evaluation: resolve every case whose deadline has passed, reject
    /// appeals that never seated a jury within the appeal window, and close claims
    /// that can no longer change.
    pub fn sweep(&mut self, now: Timestamp) -> Result<SweepReport, AdjudicationError> {
        let mut report = SweepReport::default();

        let mut open: Vec<CaseRef> = self.tally.open_cases().copied().collect();
        open.sort();
        for case in open {
            if let Some(resolution) = self.resolve_case(case, now)? {
                report.resolved.push((case, resolution));
            }
        }

        let lapsed: Vec<(ClaimId, AppealId)> = self
            .registry
            .claims()
            .filter(|c| c.status == ClaimStatus::Appealed)
            .filter_map(|c| self.registry.appeal_for(c.id))
            .filter(|a| self.appeals.appeal_lapsed(a, now, &self.params))
            .map(|a| (a.claim, a.id))
            .collect();
        for (id, appeal) in lapsed {
            let event = self
                .registry
                .resolve(id, ClaimStatus::AppealRejected, Amount::ZERO, now)?;
            self.registry.mark_appeal_processed(appeal);
            self.stats.increment(STAT_APPEALS_LAPSED);
            tracing::warn!(claim = %id, appeal = %appeal, "appeal lapsed without a jury");
            self.pending_events.push(EngineEvent::Transition(event));
            report.lapsed.push(id);
        }

        let closable: Vec<ClaimId> = self
            .registry
            .claims()
            .filter(|c| c.status.is_resolved())
            .filter(|c| {
                c.status != ClaimStatus::Rejected || self.appeals.window_lapsed(c, now, &self.params)
            })
            .map(|c| c.id)
            .collect();
        for id in closable {
            let event = self.registry.transition(id, ClaimStatus::Closed, now)?;
            self.stats.increment(STAT_CLAIMS_CLOSED);
            self.pending_events.push(EngineEvent::Transition(event));
            report.closed.push(id);
        }

        report.awaiting_selection = self.pending_selections();
        if !report.is_empty() {
            tracing::info!(
                resolved = report.resolved.len(),
                lapsed = report.lapsed.len(),
                closed = report.closed.len(),
                awaiting = report.awaiting_selection.len(),
                stats = %self.stats.render(),
                "sweep"
            );
        }
        Ok(report)
    }

    fn resolve_case(
        &mut self,
        case: CaseRef,
        now: Timestamp,
    ) -> Result<Option<Resolution>, AdjudicationError> {
        let Some(resolution) = self.tally.try_resolve(&case, now, &self.params) else {
            return Ok(None);
        };
        let outcomes = match self.tally.jury(&case) {
            Some(jury) => compute_juror_outcomes(jury, &self.tally.votes(&case), &resolution),
            None => Vec::new(),
        };

        let id = case.claim_id();
        let requested = self.registry.require(id)?.requested_amount;
        let mut events = Vec::new();

        match (&resolution, case) {
            (Resolution::Consensus { verdict, payout_bps, .. }, _) => {
                let (to, amount) = match (verdict, case.is_appeal()) {
                    (Verdict::Approved, false) => {
                        (ClaimStatus::Approved, requested.mul_bps_floor(*payout_bps))
                    }
                    (Verdict::Approved, true) => {
                        (ClaimStatus::AppealApproved, requested.mul_bps_floor(*payout_bps))
                    }
                    (Verdict::Rejected, false) => (ClaimStatus::Rejected, Amount::ZERO),
                    (Verdict::Rejected, true) => (ClaimStatus::AppealRejected, Amount::ZERO),
                };
                self.stats.increment(match verdict {
                    Verdict::Approved => STAT_APPROVED,
                    Verdict::Rejected => STAT_REJECTED,
                });
                events.push(self.registry.resolve(id, to, amount, now)?);
            }
            (Resolution::NoQuorum { .. }, CaseRef::Appeal { .. }) => {
                self.stats.increment(STAT_NO_QUORUM);
                events.push(
                    self.registry
                        .resolve(id, ClaimStatus::AppealRejected, Amount::ZERO, now)?,
                );
            }
            (Resolution::NoQuorum { .. }, CaseRef::Claim { .. }) => {
                self.stats.increment(STAT_NO_QUORUM);
                events.push(self.registry.transition(id, ClaimStatus::Inconclusive, now)?);
                let claim = self.registry.require_mut(id)?;
                claim.inconclusive_rounds += 1;
                if claim.inconclusive_rounds > self.params.inconclusive_retry_cap {
                    claim.forced_rejection = true;
                    tracing::warn!(
                        claim = %id,
                        rounds = claim.inconclusive_rounds,
                        "retry cap exhausted, rejecting"
                    );
                    self.stats.increment(STAT_FORCED_REJECTIONS);
                    events.push(
                        self.registry
                            .resolve(id, ClaimStatus::Rejected, Amount::ZERO, now)?,
                    );
                }
            }
        }

        if let CaseRef::Appeal { appeal, .. } = case {
            self.registry.mark_appeal_processed(appeal);
        }

        tracing::info!(case = %case, resolution = ?resolution, "case resolved");
        self.pending_events.push(EngineEvent::Resolved {
            case,
            resolution: resolution.clone(),
            outcomes,
        });
        self.pending_events
            .extend(events.into_iter().map(EngineEvent::Transition));
        Ok(Some(resolution))
    }

    // ── Appeals ──────────────────────────────────────────────────────────

    /// File the single permitted appeal on a rejected claim.
    ///
    /// On success the claim moves to `Appealed` and waits for an appeal jury via
    /// [`Self::select_jury`].
    pub fn file_appeal(
        &mut self,
        id: ClaimId,
        appellant: &ParticipantId,
        reason: ContentHash,
        evidence: ContentHash,
        now: Timestamp,
    ) -> Result<AppealId, AdjudicationError> {
        let claim = self.registry.require(id)?;
        self.appeals
            .check_eligibility(claim, appellant, now, &self.params)?;

        let event: ClaimEvent = self.registry.transition(id, ClaimStatus::Appealed, now)?;
        let appeal_id = self.registry.next_appeal_id();
        let appeal = self
            .appeals
            .file(appeal_id, self.registry.require(id)?, reason, evidence, now);
        self.registry.insert_appeal(appeal)?;

        self.stats.increment(STAT_APPEALS_FILED);
        tracing::info!(claim = %id, appeal = %appeal_id, "appeal filed");
        self.pending_events.push(EngineEvent::Transition(event));
        Ok(appeal_id)
    }

    // ── Queries ──────────────────────────────────────────────────────────

    pub fn claim(&self, id: ClaimId) -> Option<&Claim> {
        self.registry.get(id)
    }

    pub fn registry(&self) -> &ClaimRegistry {
        &self.registry
    }

    pub fn jury(&self, case: &CaseRef) -> Option<&Jury> {
        self.tally.jury(case)
    }

    pub fn current_jury(&self, id: ClaimId) -> Option<&Jury> {
        self.registry
            .get(id)
            .and_then(|c| c.current_case)
            .and_then(|case| self.tally.jury(&case))
    }

    pub fn votes(&self, case: &CaseRef) -> Vec<&Vote> {
        self.tally.votes(case)
    }

    /// Claims waiting for a jury, in id order.
    pub fn pending_selections(&self) -> Vec<ClaimId> {
        self.registry
            .claims()
            .filter(|c| c.status.awaiting_selection())
            .map(|c| c.id)
            .collect()
    }

    /// Take all events emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.pending_events)
    }

    pub fn stats(&self) -> BTreeMap<&'static str, u64> {
        self.stats.snapshot()
    }

    // ── Persistence ──────────────────────────────────────────────────────

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            params: self.params.clone(),
            pool: self.pool.clone(),
            registry: self.registry.clone(),
            tally: self.tally.clone(),
        }
    }

    pub fn restore(snapshot: EngineSnapshot) -> Result<Self, AdjudicationError> {
        snapshot.params.validate()?;
        Ok(Self::from_parts(
            snapshot.params,
            snapshot.pool,
            snapshot.registry,
            snapshot.tally,
        ))
    }

    pub fn encode(&self) -> Result<Vec<u8>, AdjudicationError> {
        bincode::serialize(&self.snapshot()).map_err(|e| AdjudicationError::Snapshot(e.to_string()))
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, AdjudicationError> {
        let snapshot: EngineSnapshot =
            bincode::deserialize(bytes).map_err(|e| AdjudicationError::Snapshot(e.to_string()))?;
        Self::restore(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assize_types::{ClaimCategory, PolicyRef};

    struct Flat;

    impl ReputationSource for Flat {
        fn weight_of(&self, _participant: &ParticipantId) -> u64 {
            10
        }
        fn is_eligible(&self, _participant: &ParticipantId, _claim: ClaimId) -> bool {
            true
        }
    }

    fn engine_with_jurors(n: usize) -> AdjudicationEngine {
        let mut engine = AdjudicationEngine::new(AdjudicationParams::default()).unwrap();
        for i in 0..n {
            engine.register_juror(ParticipantId::new(format!("juror-{i:02}"))).unwrap();
        }
        engine.register_juror(ParticipantId::new("alice")).unwrap();
        engine
    }

    fn submit(engine: &mut AdjudicationEngine) -> ClaimId {
        engine
            .submit_claim(
                ClaimSubmission {
                    claimant: ParticipantId::new("alice"),
                    policy: PolicyRef::new("POL-1"),
                    category: ClaimCategory::Vehicle,
                    requested_amount: Amount::new(1_000),
                    description: "Rear bumper damaged in parking lot".into(),
                    evidence: Vec::new(),
                },
                Timestamp::new(0),
            )
            .unwrap()
    }

    #[test]
    fn selection_moves_claim_to_voting_and_excludes_claimant() {
        let mut engine = engine_with_jurors(6);
        let id = submit(&mut engine);
        let jury = engine
            .select_jury(id, Seed::new([1u8; 32]), Some(5), &Flat, Timestamp::new(10))
            .unwrap();
        assert_eq!(engine.claim(id).unwrap().status, ClaimStatus::Voting);
        assert!(!jury.contains(&ParticipantId::new("alice")));

        let events = engine.drain_events();
        assert_eq!(events.len(), 3);
        assert!(engine.drain_events().is_empty());
    }

    #[test]
    fn failed_selection_leaves_no_trace() {
        let mut engine = engine_with_jurors(2);
        let id = submit(&mut engine);
        let seed = Seed::new([1u8; 32]);
        let err = engine
            .select_jury(id, seed, None, &Flat, Timestamp::new(10))
            .unwrap_err();
        assert!(matches!(err, AdjudicationError::InsufficientPool { .. }));
        let claim = engine.claim(id).unwrap();
        assert_eq!(claim.status, ClaimStatus::Submitted);
        assert!(claim.consumed_seeds.is_empty());
        assert!(engine.drain_events().is_empty());
    }

    #[test]
    fn vote_validation_precedes_lookup() {
        let mut engine = engine_with_jurors(5);
        let err = engine
            .submit_vote(
                ClaimId::new(99),
                &ParticipantId::new("juror-00"),
                20_000,
                9_000,
                ContentHash::ZERO,
                Timestamp::new(0),
            )
            .unwrap_err();
        assert_eq!(err, AdjudicationError::InvalidPayout(20_000));
    }

    #[test]
    fn vote_before_selection_is_not_selected() {
        let mut engine = engine_with_jurors(5);
        let id = submit(&mut engine);
        let err = engine
            .submit_vote(id, &ParticipantId::new("juror-00"), 100, 9_000, ContentHash::ZERO, Timestamp::new(1))
            .unwrap_err();
        assert_eq!(err, AdjudicationError::NotSelected(ParticipantId::new("juror-00")));
    }

    #[test]
    fn reused_case_is_refused_before_anything_is_recorded() {
        let mut stale = engine_with_jurors(6);
        let id = submit(&mut stale);
        stale
            .select_jury(id, Seed::new([4u8; 32]), None, &Flat, Timestamp::new(10))
            .unwrap();

        let mut fresh = engine_with_jurors(6);
        assert_eq!(submit(&mut fresh), id);
        let mut mixed = fresh.snapshot();
        mixed.tally = stale.snapshot().tally;
        let mut engine = AdjudicationEngine::restore(mixed).unwrap();

        let err = engine
            .select_jury(id, Seed::new([5u8; 32]), None, &Flat, Timestamp::new(20))
            .unwrap_err();
        assert_eq!(
            err,
            AdjudicationError::CaseAlreadyOpen(CaseRef::Claim { claim: id, round: 0 })
        );
        let claim = engine.claim(id).unwrap();
        assert_eq!(claim.status, ClaimStatus::Submitted);
        assert!(claim.consumed_seeds.is_empty());
        assert!(claim.case_history.is_empty());
        assert!(engine.drain_events().is_empty());
    }

    #[test]
    fn seated_juror_voting_after_resolution_gets_voting_closed() {
        let mut engine = engine_with_jurors(6);
        let id = submit(&mut engine);
        let jury = engine
            .select_jury(id, Seed::new([6u8; 32]), Some(3), &Flat, Timestamp::new(10))
            .unwrap();
        for juror in &jury.jurors {
            engine
                .submit_vote(id, juror, 0, 9_000, ContentHash::ZERO, Timestamp::new(11))
                .unwrap();
        }
        assert_eq!(engine.claim(id).unwrap().status, ClaimStatus::Rejected);

        let err = engine
            .submit_vote(id, &jury.jurors[0], 5_000, 9_000, ContentHash::ZERO, Timestamp::new(12))
            .unwrap_err();
        assert_eq!(
            err,
            AdjudicationError::VotingClosed {
                case: jury.case,
                deadline: jury.deadline
            }
        );

        let outsider = ParticipantId::new("alice");
        let err = engine
            .submit_vote(id, &outsider, 5_000, 9_000, ContentHash::ZERO, Timestamp::new(12))
            .unwrap_err();
        assert_eq!(err, AdjudicationError::NotSelected(outsider));
    }

    #[test]
    fn encode_decode_preserves_state() {
        let mut engine = engine_with_jurors(6);
        let id = submit(&mut engine);
        engine
            .select_jury(id, Seed::new([3u8; 32]), None, &Flat, Timestamp::new(10))
            .unwrap();

        let bytes = engine.encode().unwrap();
        let restored = AdjudicationEngine::decode(&bytes).unwrap();
        assert_eq!(restored.claim(id), engine.claim(id));
        assert_eq!(restored.current_jury(id), engine.current_jury(id));
        assert_eq!(restored.pool().len(), 7);
    }

    #[test]
    fn stats_track_operations() {
        let mut engine = engine_with_jurors(6);
        submit(&mut engine);
        submit(&mut engine);
        assert_eq!(engine.stats()[STAT_CLAIMS_SUBMITTED], 2);
        assert_eq!(engine.stats()[STAT_VOTES_RECORDED], 0);
    }
}
