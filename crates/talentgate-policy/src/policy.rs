//! Pipeline policy schema and loaders.
//!
//! A `PipelinePolicy` is deserialized from TOML. Every field has a default
//! mirroring the shipped configuration, so an empty document is a valid
//! policy. `validate()` rejects documents whose numbers cannot be applied —
//! weight sets that do not sum to 1.0, thresholds outside [0, 1] — with a
//! `Config` error at load time, before any pipeline runs.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use talentgate_contracts::error::{PipelineError, PipelineResult};
use talentgate_contracts::scoring::{RankingBlend, ScoringWeights};

/// What the orchestrator does when an outcome is flagged for human review.
///
/// Expressed as kebab-case in TOML:
/// ```toml
/// escalation = "pause-on-review"
/// escalation = "continue-and-flag"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EscalationPolicy {
    /// Suspend the pipeline and hand control to a human.
    PauseOnReview,
    /// Keep going; the flag stays on the outcome and in the ledger.
    ContinueAndFlag,
}

impl Default for EscalationPolicy {
    fn default() -> Self {
        EscalationPolicy::ContinueAndFlag
    }
}

/// What the orchestrator does when a decision gate fails outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GateFailureAction {
    /// Proceed with whoever passed (possibly nobody).
    Continue,
    /// Suspend for human review.
    Pause,
    /// Abort the pipeline.
    Abort,
    /// Re-run the stage, up to `max_stage_retries` times.
    Retry,
}

impl Default for GateFailureAction {
    fn default() -> Self {
        GateFailureAction::Continue
    }
}

/// Decision thresholds, all in [0.0, 1.0].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Minimum match score to make the shortlist.
    pub shortlist: f64,
    /// Minimum screening-test score to count as a pass.
    pub test_pass: f64,
    /// Minimum fairness score for the governance audit to pass.
    pub bias_audit: f64,
    /// Confidence floor applied to agents with no override.
    pub confidence_default: f64,
    /// Per-agent-kind confidence floors, keyed by `agent_kind`.
    pub confidence_overrides: BTreeMap<String, f64>,
}

impl Default for Thresholds {
    fn default() -> Self {
        let mut confidence_overrides = BTreeMap::new();
        confidence_overrides.insert("BiasAuditor".to_string(), 0.9);
        confidence_overrides.insert("ResumeParser".to_string(), 0.6);
        Self {
            shortlist: 0.7,
            test_pass: 0.6,
            bias_audit: 0.8,
            confidence_default: 0.7,
            confidence_overrides,
        }
    }
}

/// The complete pipeline policy, loaded from TOML.
///
/// Example:
/// ```toml
/// borderline_margin = 0.1
/// escalation = "pause-on-review"
/// on_gate_failure = "retry"
/// max_stage_retries = 2
///
/// [thresholds]
/// shortlist = 0.75
///
/// [weights]
/// skills = 0.5
/// experience = 0.3
/// education = 0.2
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelinePolicy {
    pub thresholds: Thresholds,
    /// Component weights for the matcher.
    pub weights: ScoringWeights,
    /// Blend of match and test scores in the final composite.
    pub ranking: RankingBlend,
    /// Gate results within this distance of their threshold count as
    /// borderline and are flagged for review.
    pub borderline_margin: f64,
    pub escalation: EscalationPolicy,
    pub on_gate_failure: GateFailureAction,
    /// Retry budget per stage when `on_gate_failure = "retry"` or a stage
    /// asks to be re-run.
    pub max_stage_retries: u32,
    /// Upper bound on resume parsers running concurrently.
    pub max_parallel_parsers: usize,
    /// Per-invocation deadline for agent tasks. `None` disables the check.
    pub agent_timeout_ms: Option<u64>,
    /// Questions per generated screening test.
    pub test_question_count: usize,
    /// How many ranked candidates the final report keeps.
    pub top_k: usize,
}

impl Default for PipelinePolicy {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            weights: ScoringWeights::default(),
            ranking: RankingBlend::default(),
            borderline_margin: 0.1,
            escalation: EscalationPolicy::default(),
            on_gate_failure: GateFailureAction::default(),
            max_stage_retries: 1,
            max_parallel_parsers: 4,
            agent_timeout_ms: None,
            test_question_count: 5,
            top_k: 10,
        }
    }
}

impl PipelinePolicy {
    /// Parse `s` as TOML and validate the result.
    pub fn from_toml_str(s: &str) -> PipelineResult<Self> {
        let policy: PipelinePolicy = toml::from_str(s).map_err(|e| PipelineError::Config {
            reason: format!("failed to parse policy TOML: {e}"),
        })?;
        policy.validate()?;
        Ok(policy)
    }

    /// Read the file at `path` and parse it as a TOML policy.
    pub fn from_file(path: &Path) -> PipelineResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| PipelineError::Config {
            reason: format!("failed to read policy file '{}': {e}", path.display()),
        })?;
        debug!(path = %path.display(), "loading pipeline policy");
        Self::from_toml_str(&contents)
    }

    /// The confidence floor in effect for `agent_kind`.
    pub fn confidence_threshold_for(&self, agent_kind: &str) -> f64 {
        self.thresholds
            .confidence_overrides
            .get(agent_kind)
            .copied()
            .unwrap_or(self.thresholds.confidence_default)
    }

    /// Reject policies whose numbers cannot be applied.
    pub fn validate(&self) -> PipelineResult<()> {
        self.weights.validate()?;
        self.ranking.validate()?;

        let unit_ranges = [
            ("thresholds.shortlist", self.thresholds.shortlist),
            ("thresholds.test_pass", self.thresholds.test_pass),
            ("thresholds.bias_audit", self.thresholds.bias_audit),
            ("thresholds.confidence_default", self.thresholds.confidence_default),
            ("borderline_margin", self.borderline_margin),
        ];
        for (name, value) in unit_ranges {
            if !(0.0..=1.0).contains(&value) {
                return Err(PipelineError::Config {
                    reason: format!("{name} must be in [0.0, 1.0], got {value}"),
                });
            }
        }
        for (kind, value) in &self.thresholds.confidence_overrides {
            if !(0.0..=1.0).contains(value) {
                return Err(PipelineError::Config {
                    reason: format!("confidence override for '{kind}' must be in [0.0, 1.0], got {value}"),
                });
            }
        }

        if self.max_parallel_parsers == 0 {
            return Err(PipelineError::Config {
                reason: "max_parallel_parsers must be at least 1".to_string(),
            });
        }
        if self.test_question_count == 0 {
            return Err(PipelineError::Config {
                reason: "test_question_count must be at least 1".to_string(),
            });
        }
        if self.top_k == 0 {
            return Err(PipelineError::Config {
                reason: "top_k must be at least 1".to_string(),
            });
        }

        Ok(())
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
