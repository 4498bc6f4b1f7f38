//! Adjudication parameters — jury sizing, voting windows, consensus rules.
//!
//! Every field can be supplied from configuration; missing fields fall back to the
//! defaults below.

use crate::error::ParamsError;
use serde::{Deserialize, Serialize};

const DAY_SECS: u64 = 24 * 3600;

/// All tunable parameters of the adjudication engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdjudicationParams {
    // ── Jury sizing ──────────────────────────────────────────────────────
    /// Smallest jury that may be seated; also the minimum vote count for a
    /// deadline resolution.
    pub min_jury_size: u32,

    /// Largest jury that may be seated.
    pub max_jury_size: u32,

    /// Jury size used when the caller does not request one.
    pub default_jury_size: u32,

    /// Extra seats an appeal jury gets over the original jury.
    pub appeal_jury_increment: u32,

    // ── Voting ───────────────────────────────────────────────────────────
    /// Seconds from jury selection to the voting deadline.
    pub voting_period_secs: u64,

    /// Percentage (0–100) of cast votes that must favour a payout.
    /// An even split between favour and against is a rejection.
    pub consensus_threshold_pct: u32,

    /// Fraction of the jury (basis points) whose votes trigger early resolution.
    pub consensus_quorum_bps: u32,

    /// Re-selections allowed after a no-quorum round before the claim is
    /// force-rejected.
    pub inconclusive_retry_cap: u32,

    // ── Appeals ──────────────────────────────────────────────────────────
    /// Seconds after resolution during which a rejected claim may be appealed.
    pub appeal_window_secs: u64,

    // ── Claim intake ─────────────────────────────────────────────────────
    /// Minimum description length in characters.
    pub min_description_len: usize,
}

impl AdjudicationParams {
    /// Votes required before a jury of `jury_size` resolves early:
    /// `ceil(jury_size * consensus_quorum_bps / 10_000)`, clamped to `1..=jury_size`.
    pub fn required_votes(&self, jury_size: u32) -> u32 {
        let scaled = jury_size as u64 * self.consensus_quorum_bps as u64;
        let required = scaled.div_ceil(10_000) as u32;
        required.clamp(1, jury_size.max(1))
    }

    /// Size of an appeal jury given the original jury size and the caller's request.
    ///
    /// Never smaller than the original jury; capped at `max_jury_size` unless the
    /// original jury already exceeds it.
    pub fn appeal_jury_size(&self, original: u32, requested: Option<u32>) -> u32 {
        let floor = original.saturating_add(self.appeal_jury_increment);
        let wanted = requested.unwrap_or(floor).max(floor);
        wanted.min(self.max_jury_size).max(original)
    }

    /// Check internal consistency.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.min_jury_size == 0 || self.min_jury_size > self.max_jury_size {
            return Err(ParamsError::InvalidJuryBounds {
                min: self.min_jury_size,
                max: self.max_jury_size,
            });
        }
        if !(self.min_jury_size..=self.max_jury_size).contains(&self.default_jury_size) {
            return Err(ParamsError::DefaultJurySize {
                size: self.default_jury_size,
                min: self.min_jury_size,
                max: self.max_jury_size,
            });
        }
        if self.consensus_threshold_pct > 100 {
            return Err(ParamsError::ThresholdOutOfRange(self.consensus_threshold_pct));
        }
        if self.consensus_quorum_bps == 0 || self.consensus_quorum_bps > 10_000 {
            return Err(ParamsError::QuorumFractionOutOfRange(self.consensus_quorum_bps));
        }
        if self.voting_period_secs == 0 {
            return Err(ParamsError::ZeroVotingPeriod);
        }
        if self.appeal_window_secs == 0 {
            return Err(ParamsError::ZeroAppealWindow);
        }
        Ok(())
    }
}

impl Default for AdjudicationParams {
    fn default() -> Self {
        Self {
            min_jury_size: 3,
            max_jury_size: 21,
            default_jury_size: 5,
            appeal_jury_increment: 2,

            voting_period_secs: 5 * DAY_SECS,
            consensus_threshold_pct: 60,
            consensus_quorum_bps: 7500, // 75%
            inconclusive_retry_cap: 2,

            appeal_window_secs: 14 * DAY_SECS,

            min_description_len: 10,
        }
    }
}
