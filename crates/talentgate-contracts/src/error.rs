//! Error types for the TALENTGATE pipeline.
//!
//! All fallible operations across the workspace return `PipelineResult<T>`.
//! Variants carry enough context to produce actionable audit entries.

use thiserror::Error;

/// The unified error type for the TALENTGATE runtime.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Bad input to a pipeline or agent call. Reported to the caller; the
    /// pipeline is not created / the stage is not run.
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    /// Domain logic failed inside an agent task.
    ///
    /// Contained by the runner: surfaces as a Failed outcome and never aborts
    /// the whole pipeline by itself.
    #[error("agent '{agent_kind}' execution failed: {reason}")]
    AgentExecution { agent_kind: String, reason: String },

    /// The orchestration logic itself failed. Aborts the pipeline.
    #[error("stage '{stage}' failed: {reason}")]
    StageExecution { stage: String, reason: String },

    /// The governance audit failed or flagged a high-severity finding.
    ///
    /// Distinct from a hard failure: pipeline work is preserved and resumable
    /// after human action, not discarded.
    #[error("governance veto: {reason}")]
    GovernanceVeto { reason: String },

    /// The audit ledger could not persist an entry.
    ///
    /// Treated as fatal for the step that produced it — a decision that
    /// cannot be audited cannot proceed.
    #[error("audit write failed: {reason}")]
    AuditWriteFailed { reason: String },

    /// A required configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    Config { reason: String },
}

/// Convenience alias used throughout the TALENTGATE crates.
pub type PipelineResult<T> = Result<T, PipelineError>;
