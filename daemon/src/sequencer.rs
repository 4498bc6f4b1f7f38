//! Single-writer sequencer — the only owner of the engine.
//!
//! Every command, sweep tick and jury draw runs here one at a time, so claim-scoped
//! operations are totally ordered. The async shell in `main` feeds it through an mpsc
//! queue and reads the time once per message.

use crate::config::{DaemonConfig, EntropyChoice, ReputationConfig};
use crate::error::DaemonError;
use crate::protocol::{self, Command, Output, Request};
use assize_adjudication::{
    AdjudicationEngine, RuleAssessor, ClaimSubmission, ReputationSource,
};
use assize_entropy::{EntropySource, OsEntropy};
use assize_types::{CaseRef, ClaimId, ParticipantId, Timestamp};
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};

/// Reputation weights held by the daemon, seeded from config.
#[derive(Debug, Default)]
pub struct WeightTable {
    weights: HashMap<ParticipantId, u64>,
    conflicts: HashSet<(ParticipantId, ClaimId)>,
    default_weight: u64,
}

impl WeightTable {
    pub fn from_config(config: &ReputationConfig) -> Self {
        Self {
            weights: config
                .weights
                .iter()
                .map(|(k, v)| (ParticipantId::new(k.as_str()), *v))
                .collect(),
            conflicts: HashSet::new(),
            default_weight: config.default_weight,
        }
    }

    pub fn set(&mut self, participant: ParticipantId, weight: u64) {
        self.weights.insert(participant, weight);
    }

    pub fn conflict(&mut self, participant: ParticipantId, claim: ClaimId) {
        self.conflicts.insert((participant, claim));
    }
}

impl ReputationSource for WeightTable {
    fn weight_of(&self, participant: &ParticipantId) -> u64 {
        self.weights
            .get(participant)
            .copied()
            .unwrap_or(self.default_weight)
    }

    fn is_eligible(&self, participant: &ParticipantId, claim: ClaimId) -> bool {
        !self.conflicts.contains(&(participant.clone(), claim))
    }
}

/// What the shell should do after a message.
#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

pub struct Sequencer {
    engine: AdjudicationEngine,
    reputation: WeightTable,
    entropy: Option<Box<dyn EntropySource>>,
    assessor: RuleAssessor,
}

impl Sequencer {
    pub fn new(engine: AdjudicationEngine, config: &DaemonConfig) -> Self {
        let entropy: Option<Box<dyn EntropySource>> = match config.entropy {
            EntropyChoice::Os => Some(Box::new(OsEntropy)),
            EntropyChoice::External => None,
        };
        Self::with_entropy(engine, WeightTable::from_config(&config.reputation), entropy)
    }

    pub fn with_entropy(
        engine: AdjudicationEngine,
        reputation: WeightTable,
        entropy: Option<Box<dyn EntropySource>>,
    ) -> Self {
        Self {
            engine,
            reputation,
            entropy,
            assessor: RuleAssessor,
        }
    }

    pub fn engine(&self) -> &AdjudicationEngine {
        &self.engine
    }

    /// Handle one request and return the outputs to emit (the reply first, then
    /// any engine events it caused).
    pub fn handle(&mut self, request: Request, now: Timestamp) -> (Vec<Output>, Flow) {
        let id = request.id;
        let mut flow = Flow::Continue;
        let reply = match self.execute(request.command, now) {
            Ok(Some(result)) => Output::ok(id, result),
            Ok(None) => {
                flow = Flow::Stop;
                Output::ok(id, json!({ "stopping": true }))
            }
            Err(CommandError::Engine(e)) => {
                tracing::warn!(error = %e, "command rejected");
                Output::engine_err(id, &e)
            }
            Err(CommandError::Input(message)) => {
                tracing::warn!(%message, "malformed command");
                Output::err(id, "input", message)
            }
        };
        let mut out = vec![reply];
        out.extend(self.drain_events());
        (out, flow)
    }

    /// Periodic work: resolve passed deadlines, close finished claims and, with
    /// automatic entropy, draw juries for claims that are waiting.
    pub fn tick(&mut self, now: Timestamp) -> Vec<Output> {
        match self.engine.sweep(now) {
            Ok(report) => {
                if self.entropy.is_some() {
                    for claim in report.awaiting_selection {
                        self.auto_select(claim, now);
                    }
                }
            }
            Err(e) => tracing::error!(error = %e, "sweep failed"),
        }
        self.drain_events()
    }

    fn auto_select(&mut self, claim: ClaimId, now: Timestamp) {
        let Some(entropy) = self.entropy.as_ref() else {
            return;
        };
        let seed = match entropy.seed_for(&claim.to_be_bytes()) {
            Ok(output) => output.seed,
            Err(e) => {
                tracing::warn!(claim = %claim, error = %e, "entropy unavailable, will retry");
                return;
            }
        };
        if let Err(e) = self
            .engine
            .select_jury(claim, seed, None, &self.reputation, now)
        {
            tracing::debug!(claim = %claim, error = %e, "automatic selection deferred");
        }
    }

    fn drain_events(&mut self) -> Vec<Output> {
        self.engine
            .drain_events()
            .into_iter()
            .map(|event| Output::Event { event })
            .collect()
    }

    /// `Ok(None)` means shut down.
    fn execute(&mut self, command: Command, now: Timestamp) -> Result<Option<Value>, CommandError> {
        let value = match command {
            Command::RegisterJuror {
                participant,
                weight,
            } => {
                if let Some(weight) = weight {
                    self.reputation.set(participant.clone(), weight);
                }
                let added = self.engine.register_juror(participant)?;
                json!({ "added": added })
            }
            Command::DeregisterJuror { participant } => {
                json!({ "removed": self.engine.deregister_juror(&participant) })
            }
            Command::SetWeight {
                participant,
                weight,
            } => {
                self.reputation.set(participant, weight);
                json!({})
            }
            Command::Conflict { participant, claim } => {
                self.reputation.conflict(participant, claim);
                json!({})
            }
            Command::SubmitClaim {
                claimant,
                policy,
                category,
                requested_amount,
                description,
                evidence,
            } => {
                let evidence = evidence
                    .iter()
                    .map(|h| protocol::parse_hash("evidence", h))
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(CommandError::Input)?;
                let id = self.engine.submit_claim(
                    ClaimSubmission {
                        claimant,
                        policy,
                        category,
                        requested_amount,
                        description,
                        evidence,
                    },
                    now,
                )?;
                json!({ "claim": id })
            }
            Command::AssessClaim { claim } => {
                let assessment = self.engine.assess_claim(claim, &self.assessor)?;
                to_value(&assessment)?
            }
            Command::SelectJury { claim, seed, size } => {
                let seed = match (seed, self.entropy.as_ref()) {
                    (Some(seed_hex), _) => protocol::parse_seed(&seed_hex).map_err(CommandError::Input)?,
                    (None, Some(entropy)) => entropy
                        .seed_for(&claim.to_be_bytes())
                        .map_err(|e| CommandError::Input(e.to_string()))?
                        .seed,
                    (None, None) => {
                        return Err(CommandError::Input(
                            "seed required with external entropy".into(),
                        ))
                    }
                };
                let jury = self
                    .engine
                    .select_jury(claim, seed, size, &self.reputation, now)?;
                json!({
                    "case": jury.case.to_string(),
                    "jurors": jury.jurors,
                    "deadline": jury.deadline,
                    "required_votes": jury.required_votes,
                })
            }
            Command::SubmitVote {
                claim,
                juror,
                payout_bps,
                confidence_bps,
                rationale,
            } => {
                let rationale =
                    protocol::parse_hash("rationale", &rationale).map_err(CommandError::Input)?;
                let resolution = self.engine.submit_vote(
                    claim,
                    &juror,
                    payout_bps,
                    confidence_bps,
                    rationale,
                    now,
                )?;
                json!({ "resolved": resolution.is_some() })
            }
            Command::FileAppeal {
                claim,
                appellant,
                reason,
                evidence,
            } => {
                let reason = protocol::parse_hash("reason", &reason).map_err(CommandError::Input)?;
                let evidence =
                    protocol::parse_hash("evidence", &evidence).map_err(CommandError::Input)?;
                let appeal = self
                    .engine
                    .file_appeal(claim, &appellant, reason, evidence, now)?;
                json!({ "appeal": appeal })
            }
            Command::Evaluate { claim } => {
                let resolution = self.engine.evaluate(claim, now)?;
                json!({ "resolved": resolution.is_some() })
            }
            Command::Sweep => {
                let report = self.engine.sweep(now)?;
                json!({
                    "resolved": report.resolved.iter().map(|(c, _)| c.to_string()).collect::<Vec<_>>(),
                    "lapsed": report.lapsed,
                    "closed": report.closed,
                    "awaiting_selection": report.awaiting_selection,
                })
            }
            Command::GetClaim { claim } => {
                let record = self
                    .engine
                    .claim(claim)
                    .ok_or(assize_adjudication::AdjudicationError::ClaimNotFound(claim))?;
                let mut value = to_value(record)?;
                if let Some(jury) = self.engine.current_jury(claim) {
                    let case: CaseRef = jury.case;
                    value["jury"] = json!({
                        "case": case.to_string(),
                        "jurors": jury.jurors,
                        "deadline": jury.deadline,
                        "votes": self.engine.votes(&case).len(),
                        "concluded": jury.concluded,
                    });
                }
                if let Some(appeal) = self.engine.registry().appeal_for(claim) {
                    value["appeal_record"] = to_value(appeal)?;
                }
                value
            }
            Command::Params => protocol::describe_params(self.engine.params()),
            Command::Stats => json!(self.engine.stats()),
            Command::Shutdown => return Ok(None),
        };
        Ok(Some(value))
    }

    /// Serialize the engine for the state file.
    pub fn encode_state(&self) -> Result<Vec<u8>, DaemonError> {
        Ok(self.engine.encode()?)
    }
}

impl Sequencer {
    /// Drive the sequencer until shutdown, the input closes, or a `shutdown`
    /// command arrives. Returns itself so the caller can persist state.
    pub async fn run(
        mut self,
        mut requests: mpsc::Receiver<Request>,
        outputs: mpsc::Sender<Output>,
        sweep_every: Duration,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Self {
        let mut ticker = tokio::time::interval(sweep_every);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            let (batch, flow) = tokio::select! {
                _ = ticker.tick() => (self.tick(Timestamp::now()), Flow::Continue),
                request = requests.recv() => match request {
                    Some(request) => self.handle(request, Timestamp::now()),
                    None => {
                        tracing::info!("input closed");
                        break;
                    }
                },
                _ = shutdown.recv() => break,
            };

            for output in batch {
                if outputs.send(output).await.is_err() {
                    tracing::warn!("output channel closed");
                    return self;
                }
            }
            if flow == Flow::Stop {
                break;
            }
        }
        self
    }
}

enum CommandError {
    Engine(assize_adjudication::AdjudicationError),
    Input(String),
}

impl From<assize_adjudication::AdjudicationError> for CommandError {
    fn from(e: assize_adjudication::AdjudicationError) -> Self {
        Self::Engine(e)
    }
}

fn to_value<T: serde::Serialize>(value: &T) -> Result<Value, CommandError> {
    serde_json::to_value(value).map_err(|e| CommandError::Input(e.to_string()))
}
