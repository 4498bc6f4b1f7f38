//! Claims adjudication.
//!
//! A claim moves through jury selection, voting and an optional single appeal:
//! 1. **Selection**: a jury is drawn from the juror pool, weighted by reputation,
//!    using an external seed that anyone can replay.
//! 2. **Voting**: jurors submit payout fractions with a confidence; the tally resolves
//!    the case once quorum is reached or the deadline passes.
//! 3. **Appeal**: a rejected claimant may appeal once; a larger jury drawn toward
//!    higher-standing jurors retries the case.
//!
//! Rounds that end without quorum are retried with a fresh jury up to a fixed cap,
//! after which the claim is rejected so every claim terminates.

pub mod appeal;
pub mod assessment;
pub mod engine;
pub mod error;
pub mod events;
pub mod jury;
pub mod outcomes;
pub mod pool;
pub mod registry;
pub mod selection;
pub mod tally;

pub use appeal::{Appeal, AppealController};
pub use assessment::{RuleAssessor, Assessment, ClaimAssessor, Recommendation};
pub use engine::{AdjudicationEngine, EngineSnapshot, SweepReport};
pub use error::{AdjudicationError, ErrorKind};
pub use events::{ClaimEvent, EngineEvent};
pub use jury::Jury;
pub use outcomes::JurorOutcome;
pub use pool::{JurorPool, PoolEntry, PoolSnapshot, ReputationSource};
pub use registry::{Claim, ClaimRegistry, ClaimSubmission};
pub use selection::JurySelector;
pub use tally::{Resolution, Trigger, Verdict, Vote, VoteTally};
