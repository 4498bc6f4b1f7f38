//! Line protocol: one JSON command per stdin line, one JSON output per stdout line.
//!
//! Hashes and seeds travel as 64-character hex strings.

use assize_adjudication::{AdjudicationError, EngineEvent};
use assize_types::{
    AdjudicationParams, Amount, ClaimCategory, ClaimId, ContentHash, ParticipantId, PolicyRef,
    Seed,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum Command {
    RegisterJuror {
        participant: ParticipantId,
        #[serde(default)]
        weight: Option<u64>,
    },
    DeregisterJuror {
        participant: ParticipantId,
    },
    SetWeight {
        participant: ParticipantId,
        weight: u64,
    },
    Conflict {
        participant: ParticipantId,
        claim: ClaimId,
    },
    SubmitClaim {
        claimant: ParticipantId,
        policy: PolicyRef,
        category: ClaimCategory,
        requested_amount: Amount,
        description: String,
        #[serde(default)]
        evidence: Vec<String>,
    },
    AssessClaim {
        claim: ClaimId,
    },
    SelectJury {
        claim: ClaimId,
        /// Required when the daemon runs with external entropy.
        #[serde(default)]
        seed: Option<String>,
        #[serde(default)]
        size: Option<u32>,
    },
    SubmitVote {
        claim: ClaimId,
        juror: ParticipantId,
        payout_bps: u16,
        confidence_bps: u16,
        rationale: String,
    },
    FileAppeal {
        claim: ClaimId,
        appellant: ParticipantId,
        reason: String,
        evidence: String,
    },
    Evaluate {
        claim: ClaimId,
    },
    Sweep,
    GetClaim {
        claim: ClaimId,
    },
    Params,
    Stats,
    Shutdown,
}

/// A command with the caller's correlation id, echoed back on the reply.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(flatten)]
    pub command: Command,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Output {
    Reply {
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<Value>,
        ok: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        result: Option<Value>,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<ErrorBody>,
    },
    Event {
        event: EngineEvent,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub kind: String,
    pub message: String,
}

impl Output {
    pub fn ok(id: Option<Value>, result: Value) -> Self {
        Self::Reply {
            id,
            ok: true,
            result: Some(result),
            error: None,
        }
    }

    pub fn err(id: Option<Value>, kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Reply {
            id,
            ok: false,
            result: None,
            error: Some(ErrorBody {
                kind: kind.into(),
                message: message.into(),
            }),
        }
    }

    pub fn engine_err(id: Option<Value>, err: &AdjudicationError) -> Self {
        Self::err(id, format!("{:?}", err.kind()).to_lowercase(), err.to_string())
    }

    /// Encode as a single JSON line (without the trailing newline).
    pub fn to_line(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            format!(r#"{{"type":"reply","ok":false,"error":{{"kind":"encoding","message":"{e}"}}}}"#)
        })
    }
}

/// Parse one input line. Blank lines yield `None`.
pub fn parse_line(line: &str) -> Option<Result<Request, serde_json::Error>> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    Some(serde_json::from_str(line))
}

fn decode32(field: &str, hex_str: &str) -> Result<[u8; 32], String> {
    let bytes = hex::decode(hex_str.trim()).map_err(|e| format!("{field}: {e}"))?;
    bytes
        .try_into()
        .map_err(|b: Vec<u8>| format!("{field}: expected 32 bytes, got {}", b.len()))
}

pub fn parse_hash(field: &str, hex_str: &str) -> Result<ContentHash, String> {
    decode32(field, hex_str).map(ContentHash::new)
}

pub fn parse_seed(hex_str: &str) -> Result<Seed, String> {
    decode32("seed", hex_str).map(Seed::new)
}

/// Parameters reply, with durations rendered for people as well.
pub fn describe_params(params: &AdjudicationParams) -> Value {
    serde_json::json!({
        "params": params,
        "voting_period": assize_utils::format_duration(params.voting_period_secs),
        "appeal_window": assize_utils::format_duration(params.appeal_window_secs),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_vote_command_with_id() {
        let line = r#"{"id": 7, "cmd": "submit_vote", "claim": 3, "juror": "bob",
            "payout_bps": 800, "confidence_bps": 9000,
            "rationale": "0000000000000000000000000000000000000000000000000000000000000000"}"#;
        let request = parse_line(line).unwrap().unwrap();
        assert_eq!(request.id, Some(Value::from(7)));
        assert!(matches!(
            request.command,
            Command::SubmitVote { payout_bps: 800, .. }
        ));
    }

    #[test]
    fn parses_unit_commands_and_skips_blank_lines() {
        assert!(parse_line("   ").is_none());
        let request = parse_line(r#"{"cmd":"sweep"}"#).unwrap().unwrap();
        assert_eq!(request.command, Command::Sweep);
        assert!(parse_line(r#"{"cmd":"explode"}"#).unwrap().is_err());
    }

    #[test]
    fn hash_parsing() {
        assert_eq!(parse_hash("x", &"ab".repeat(32)).unwrap(), ContentHash::new([0xab; 32]));
        assert!(parse_hash("x", "abcd").unwrap_err().contains("expected 32 bytes"));
        assert!(parse_seed("zz").is_err());
    }

    #[test]
    fn error_reply_shape() {
        let err = AdjudicationError::InvalidPayout(20_000);
        let line = Output::engine_err(Some(Value::from("a")), &err).to_line();
        let json: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(json["type"], "reply");
        assert_eq!(json["ok"], false);
        assert_eq!(json["error"]["kind"], "validation");
        assert_eq!(json["id"], "a");
    }
}
