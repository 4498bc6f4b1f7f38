//! Errors raised when adjudication parameters are inconsistent.

use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ParamsError {
    #[error("jury size bounds invalid: min {min}, max {max}")]
    InvalidJuryBounds { min: u32, max: u32 },

    #[error("default jury size {size} outside [{min}, {max}]")]
    DefaultJurySize { size: u32, min: u32, max: u32 },

    #[error("consensus threshold {0}% exceeds 100%")]
    ThresholdOutOfRange(u32),

    #[error("quorum fraction {0} bps outside 1..=10000")]
    QuorumFractionOutOfRange(u32),

    #[error("voting period must be non-zero")]
    ZeroVotingPeriod,

    #[error("appeal window must be non-zero")]
    ZeroAppealWindow,
}
