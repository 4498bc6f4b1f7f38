use assize_types::{CaseRef, ClaimId, ClaimStatus, ParamsError, ParticipantId, Timestamp};
use thiserror::Error;

/// Broad class of a rejected operation. None of them leave partial state behind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input shape or range.
    Validation,
    /// The caller is not entitled to perform the operation.
    Authorization,
    /// The operation arrived outside its time window.
    Timing,
    /// The referenced record does not exist.
    NotFound,
    /// The claim is not in a state that permits the operation.
    State,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AdjudicationError {
    #[error("seed already consumed for {0}")]
    InvalidSeed(ClaimId),

    #[error("insufficient juror pool: {eligible} eligible, {required} required")]
    InsufficientPool { eligible: usize, required: usize },

    #[error("jury size {size} outside [{min}, {max}]")]
    InvalidJurySize { size: u32, min: u32, max: u32 },

    #[error("confidence {0} bps outside [5000, 10000]")]
    InvalidConfidence(u16),

    #[error("payout {0} bps exceeds 10000")]
    InvalidPayout(u16),

    #[error("invalid claim: {0}")]
    InvalidClaim(String),

    #[error("participant id {0:?} is malformed")]
    InvalidParticipant(String),

    #[error("juror {0} was not selected for this case")]
    NotSelected(ParticipantId),

    #[error("{0} is not the original claimant")]
    NotAppellant(ParticipantId),

    #[error("voting closed for {case} (deadline {deadline})")]
    VotingClosed { case: CaseRef, deadline: Timestamp },

    #[error("appeal window closed at {closed_at}")]
    WindowExpired { closed_at: Timestamp },

    #[error("juror {0} has already voted")]
    AlreadyVoted(ParticipantId),

    #[error("{0} has already been appealed")]
    AlreadyAppealed(ClaimId),

    #[error("{claim} is {status}, not appealable")]
    NotAppealable { claim: ClaimId, status: ClaimStatus },

    #[error("{claim} is {status}, not awaiting jury selection")]
    NotAwaitingSelection { claim: ClaimId, status: ClaimStatus },

    #[error("{claim} cannot move from {from} to {to}")]
    InvalidTransition {
        claim: ClaimId,
        from: ClaimStatus,
        to: ClaimStatus,
    },

    #[error("{0} already has a jury")]
    CaseAlreadyOpen(CaseRef),

    #[error("{0} not found")]
    ClaimNotFound(ClaimId),

    #[error("invalid parameters: {0}")]
    Params(#[from] ParamsError),

    #[error("snapshot encoding: {0}")]
    Snapshot(String),
}

impl AdjudicationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidSeed(_)
            | Self::InsufficientPool { .. }
            | Self::InvalidJurySize { .. }
            | Self::InvalidConfidence(_)
            | Self::InvalidPayout(_)
            | Self::InvalidClaim(_)
            | Self::InvalidParticipant(_)
            | Self::Params(_)
            | Self::Snapshot(_) => ErrorKind::Validation,
            Self::NotSelected(_) | Self::NotAppellant(_) => ErrorKind::Authorization,
            Self::VotingClosed { .. } | Self::WindowExpired { .. } => ErrorKind::Timing,
            Self::ClaimNotFound(_) => ErrorKind::NotFound,
            Self::AlreadyVoted(_)
            | Self::AlreadyAppealed(_)
            | Self::NotAppealable { .. }
            | Self::NotAwaitingSelection { .. }
            | Self::InvalidTransition { .. }
            | Self::CaseAlreadyOpen(_) => ErrorKind::State,
        }
    }
}
