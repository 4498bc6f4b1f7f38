//! Appeal controller — eligibility rules and appeal jury sizing.
//!
//! A claim may be appealed once, by its claimant, while it sits in `Rejected` and
//! the appeal window from resolution is still open. There is no second-level appeal.

use crate::error::AdjudicationError;
use crate::registry::Claim;
use assize_types::{
    AdjudicationParams, AppealId, ClaimId, ClaimStatus, ContentHash, ParticipantId, Timestamp,
};
use serde::{Deserialize, Serialize};

/// An appeal record, owned by the claim registry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appeal {
    pub id: AppealId,
    pub claim: ClaimId,
    pub appellant: ParticipantId,
    /// Hash of the reason text held by the content store.
    pub reason: ContentHash,
    /// Hash of the new evidence bundle.
    pub evidence: ContentHash,
    pub filed_at: Timestamp,
    /// Set once the appeal jury has resolved.
    pub processed: bool,
}

pub struct AppealController;

impl AppealController {
    /// Check that `appellant` may appeal `claim` at `now`.
    ///
    /// Checks run in a fixed order so the reported error is stable: authorization,
    /// exclusivity, state, then the window.
    pub fn check_eligibility(
        &self,
        claim: &Claim,
        appellant: &ParticipantId,
        now: Timestamp,
        params: &AdjudicationParams,
    ) -> Result<(), AdjudicationError> {
        if &claim.claimant != appellant {
            return Err(AdjudicationError::NotAppellant(appellant.clone()));
        }
        if claim.appeal.is_some() {
            return Err(AdjudicationError::AlreadyAppealed(claim.id));
        }
        if claim.status != ClaimStatus::Rejected {
            return Err(AdjudicationError::NotAppealable {
                claim: claim.id,
                status: claim.status,
            });
        }
        let resolved_at = claim.resolved_at.unwrap_or(claim.submitted_at);
        if resolved_at.window_passed(params.appeal_window_secs, now) {
            return Err(AdjudicationError::WindowExpired {
                closed_at: resolved_at.plus_secs(params.appeal_window_secs),
            });
        }
        Ok(())
    }

    /// Build the appeal record after eligibility has been checked.
    pub fn file(
        &self,
        id: AppealId,
        claim: &Claim,
        reason: ContentHash,
        evidence: ContentHash,
        now: Timestamp,
    ) -> Appeal {
        Appeal {
            id,
            claim: claim.id,
            appellant: claim.claimant.clone(),
            reason,
            evidence,
            filed_at: now,
            processed: false,
        }
    }

    /// Seats for the appeal jury: at least the original jury plus the configured
    /// increment, never fewer than the original.
    pub fn jury_size(&self, claim: &Claim, requested: Option<u32>, params: &AdjudicationParams) -> u32 {
        let original = claim.last_jury_size.unwrap_or(params.default_jury_size);
        params.appeal_jury_size(original, requested)
    }

    /// Whether an appeal that never seated a jury has outlived the appeal window
    /// measured from filing. Such an appeal is rejected by the next sweep.
    pub fn appeal_lapsed(&self, appeal: &Appeal, now: Timestamp, params: &AdjudicationParams) -> bool {
        !appeal.processed && appeal.filed_at.window_passed(params.appeal_window_secs, now)
    }

    /// Whether a Rejected claim's appeal window has lapsed, so it can be closed.
    pub fn window_lapsed(&self, claim: &Claim, now: Timestamp, params: &AdjudicationParams) -> bool {
        claim
            .resolved_at
            .is_some_and(|at| at.window_passed(params.appeal_window_secs, now))
    }
}
