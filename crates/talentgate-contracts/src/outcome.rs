//! The uniform result of any agent task invocation.
//!
//! Every capability provider, no matter what it computes, produces an
//! `AgentOutcome` through its runner. The orchestrator only ever sees this
//! shape, which is what makes stages interchangeable and auditable.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Execution status of an agent task invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    Pending,
    Running,
    Success,
    Failed,
    /// Waiting for human review before the result may be used.
    Blocked,
}

/// Standardized response from any agent invocation.
///
/// Invariants the runner maintains:
/// - `status == Success` implies `payload` is set and `errors` is empty.
/// - `status == Failed` implies `payload` is unset and `errors` is non-empty.
/// - `confidence` is only meaningful for Success/Failed (0.0 on Failed).
/// - `requires_human_review` is true iff confidence fell below the agent's
///   threshold or the invocation failed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentOutcome<O> {
    /// Unique identifier of the runner instance that produced this outcome.
    pub agent_id: String,
    /// Stable name of the capability (e.g. "Matcher").
    pub agent_kind: String,
    pub status: AgentStatus,
    /// Capability-specific output. Present iff `status == Success`.
    pub payload: Option<O>,
    /// Self-reported confidence in [0.0, 1.0].
    pub confidence: f64,
    /// Human-readable explanation of the decision. Non-empty on Success.
    pub explanation: String,
    /// Timestamped reasoning steps, built up during one invocation and
    /// attached as an immutable log.
    pub audit_trail: Vec<String>,
    /// Measured wall-clock duration of the invocation, in milliseconds.
    pub duration_ms: u64,
    /// Error descriptions. Non-empty only on Failed.
    pub errors: Vec<String>,
    /// Non-fatal issues. May be non-empty regardless of status.
    pub warnings: Vec<String>,
    /// Human-in-the-loop flag.
    pub requires_human_review: bool,
}

/// A type-erased outcome as stored in the pipeline's append-only log.
///
/// The payload is serialized to JSON so outcomes from heterogeneous agents
/// can live in one ordered sequence.
pub type OutcomeRecord = AgentOutcome<Value>;

impl<O: Serialize> AgentOutcome<O> {
    /// Erase the payload type for storage in `PipelineState::agent_outcomes`.
    ///
    /// A payload that cannot be serialized is dropped and noted as a warning
    /// rather than failing the conversion — the compliance record must always
    /// be writable.
    pub fn into_record(self) -> OutcomeRecord {
        let mut warnings = self.warnings;
        let payload = match self.payload {
            Some(p) => match serde_json::to_value(&p) {
                Ok(v) => Some(v),
                Err(e) => {
                    warnings.push(format!("payload not serializable: {e}"));
                    None
                }
            },
            None => None,
        };
        AgentOutcome {
            agent_id: self.agent_id,
            agent_kind: self.agent_kind,
            status: self.status,
            payload,
            confidence: self.confidence,
            explanation: self.explanation,
            audit_trail: self.audit_trail,
            duration_ms: self.duration_ms,
            errors: self.errors,
            warnings,
            requires_human_review: self.requires_human_review,
        }
    }
}

impl<O> AgentOutcome<O> {
    pub fn is_success(&self) -> bool {
        self.status == AgentStatus::Success
    }

    pub fn is_failed(&self) -> bool {
        self.status == AgentStatus::Failed
    }
}
