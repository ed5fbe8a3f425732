//! Governance audit types.
//!
//! The governance agent reviews the whole pipeline for fairness issues and
//! holds veto power over completion: the pipeline cannot finish unless the
//! audit passes.

use serde::{Deserialize, Serialize};

use crate::evaluation::CandidateRanking;
use crate::gate::GateEvaluation;
use crate::stage::PipelineStage;

/// Severity of a governance finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    /// Penalty each finding subtracts from the fairness score.
    pub fn weight(self) -> f64 {
        match self {
            Severity::High => 0.3,
            Severity::Medium => 0.15,
            Severity::Low => 0.05,
        }
    }
}

/// One issue flagged during the governance audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    /// Stable category label, e.g. "threshold_calibration".
    pub category: String,
    pub severity: Severity,
    pub description: String,
    /// Which candidates are affected ("all", specific ids, …).
    pub affected: Vec<String>,
}

/// Everything the governance agent consumes: a read-only snapshot of the
/// pipeline's compliance-relevant state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GovernanceInput {
    /// Bias flags carried over from JD analysis.
    pub jd_bias_flags: Vec<String>,
    /// Every decision gate the pipeline recorded.
    pub gates: Vec<GateEvaluation>,
    pub rankings: Vec<CandidateRanking>,
    pub candidate_count: usize,
    /// Stage at which the audit ran, noted for compliance.
    pub stage: PipelineStage,
}

/// The governance agent's verdict over the whole pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GovernanceReport {
    /// The veto bit: completion requires this to be true.
    pub audit_passed: bool,
    /// `max(0, 1 - Σ severity weight)`, in [0.0, 1.0].
    pub fairness_score: f64,
    pub findings: Vec<Finding>,
    pub recommendations: Vec<String>,
    pub compliance_notes: Vec<String>,
    /// Forced true whenever the audit fails or any high-severity finding
    /// exists, regardless of the fairness score.
    pub requires_human_review: bool,
}
