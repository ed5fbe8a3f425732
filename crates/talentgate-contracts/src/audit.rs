//! Audit ledger entry schema and query filters.
//!
//! An `AuditEntry` is one immutable row in the compliance ledger. Entries are
//! write-once: the ledger never mutates or deletes an existing entry. The
//! constructor helpers mirror the event families the pipeline records —
//! decisions, decision gates, review requests, and bias findings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::gate::GateEvaluation;
use crate::governance::{Finding, Severity};

/// Category of an audit event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventType {
    Decision,
    DecisionGate,
    ReviewRequest,
    BiasFinding,
    Generic,
}

/// One immutable row in the audit ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub entry_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub event_type: AuditEventType,
    /// Correlation keys. Each is optional — not every event belongs to a
    /// pipeline, candidate, or agent.
    pub pipeline_id: Option<String>,
    pub job_id: Option<String>,
    pub candidate_id: Option<String>,
    pub agent_kind: Option<String>,
    /// Short label for what happened.
    pub action: String,
    /// Event-specific structured detail.
    pub details: Value,
    /// Result label, e.g. "passed" / "failed" / "pending".
    pub outcome: Option<String>,
    pub confidence: Option<f64>,
    pub requires_review: bool,
}

/// Confidence below this value marks a recorded decision for review.
const DECISION_REVIEW_THRESHOLD: f64 = 0.7;

/// Gate results within this distance of the threshold are review-worthy.
const GATE_REVIEW_MARGIN: f64 = 0.1;

impl AuditEntry {
    fn base(event_type: AuditEventType, action: impl Into<String>, details: Value) -> Self {
        Self {
            entry_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event_type,
            pipeline_id: None,
            job_id: None,
            candidate_id: None,
            agent_kind: None,
            action: action.into(),
            details,
            outcome: None,
            confidence: None,
            requires_review: false,
        }
    }

    /// A free-form event with no dedicated family.
    pub fn generic(action: impl Into<String>, details: Value) -> Self {
        Self::base(AuditEventType::Generic, action, details)
    }

    /// An agent decision with its confidence and explanation.
    pub fn decision(
        agent_kind: impl Into<String>,
        action: impl Into<String>,
        confidence: f64,
        explanation: impl Into<String>,
    ) -> Self {
        let mut entry = Self::base(
            AuditEventType::Decision,
            action,
            json!({ "explanation": explanation.into() }),
        );
        entry.agent_kind = Some(agent_kind.into());
        entry.outcome = Some("recorded".to_string());
        entry.confidence = Some(confidence);
        entry.requires_review = confidence < DECISION_REVIEW_THRESHOLD;
        entry
    }

    /// A decision-gate evaluation. Borderline results are flagged for review.
    pub fn decision_gate(gate: &GateEvaluation) -> Self {
        let mut entry = Self::base(
            AuditEventType::DecisionGate,
            format!("gate_{}", gate.gate_name),
            json!({
                "threshold": gate.threshold,
                "measured": gate.measured,
                "margin": (gate.measured - gate.threshold).abs(),
            }),
        );
        entry.outcome = Some(if gate.passed { "passed" } else { "failed" }.to_string());
        entry.requires_review = (gate.measured - gate.threshold).abs() < GATE_REVIEW_MARGIN;
        entry
    }

    /// A request for human review, always flagged.
    pub fn review_request(reason: impl Into<String>, context: Value) -> Self {
        let mut entry = Self::base(
            AuditEventType::ReviewRequest,
            "human_review_requested",
            json!({ "reason": reason.into(), "context": context }),
        );
        entry.outcome = Some("pending".to_string());
        entry.requires_review = true;
        entry
    }

    /// A governance finding. High severity forces the review flag.
    pub fn bias_finding(finding: &Finding) -> Self {
        let mut entry = Self::base(
            AuditEventType::BiasFinding,
            format!("bias_{}", finding.category),
            json!({
                "severity": finding.severity,
                "description": finding.description,
                "affected": finding.affected,
            }),
        );
        entry.outcome = Some("flagged".to_string());
        entry.requires_review = finding.severity == Severity::High;
        entry
    }

    // ── Correlation-key builders ─────────────────────────────────────────────

    pub fn with_pipeline(mut self, pipeline_id: impl Into<String>) -> Self {
        self.pipeline_id = Some(pipeline_id.into());
        self
    }

    pub fn with_job(mut self, job_id: impl Into<String>) -> Self {
        self.job_id = Some(job_id.into());
        self
    }

    pub fn with_candidate(mut self, candidate_id: impl Into<String>) -> Self {
        self.candidate_id = Some(candidate_id.into());
        self
    }

    pub fn with_agent_kind(mut self, agent_kind: impl Into<String>) -> Self {
        self.agent_kind = Some(agent_kind.into());
        self
    }
}

/// Query filter for ledger reads. Empty filter matches everything;
/// insertion order is always preserved.
#[derive(Debug, Clone, Default)]
pub struct AuditFilter {
    pub pipeline_id: Option<String>,
    pub event_type: Option<AuditEventType>,
    pub requires_review: Option<bool>,
}

impl AuditFilter {
    pub fn for_pipeline(pipeline_id: impl Into<String>) -> Self {
        Self {
            pipeline_id: Some(pipeline_id.into()),
            ..Self::default()
        }
    }

    pub fn matches(&self, entry: &AuditEntry) -> bool {
        if let Some(pid) = &self.pipeline_id {
            if entry.pipeline_id.as_deref() != Some(pid.as_str()) {
                return false;
            }
        }
        if let Some(ty) = self.event_type {
            if entry.event_type != ty {
                return false;
            }
        }
        if let Some(review) = self.requires_review {
            if entry.requires_review != review {
                return false;
            }
        }
        true
    }
}
