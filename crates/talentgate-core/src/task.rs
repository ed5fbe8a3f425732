//! The agent task contract.
//!
//! An `AgentTask` is pure domain logic: given a typed input, it produces a
//! typed output, a self-reported confidence, and an explanation. Everything
//! else — timing, error containment, the review flag, the reasoning trail —
//! is the runner's job. Tasks never construct their own outcome envelope.

use talentgate_contracts::error::PipelineResult;

/// Default confidence threshold applied when neither the task nor the
/// policy configuration overrides it.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.7;

/// A single pipeline capability with typed input and output.
///
/// Implementations are the **untrusted** part of the runtime: they may wrap
/// heuristics today and an LLM call tomorrow. The runner guarantees that a
/// returned `Err` is contained as a Failed outcome and never unwinds the
/// pipeline, and that a confidence below the threshold marks the outcome for
/// human review.
pub trait AgentTask: Send + Sync {
    type Input;
    type Output;

    /// Stable capability name, e.g. "Matcher". Used as `agent_kind` in
    /// outcomes and audit entries.
    fn kind(&self) -> &str;

    /// One-line description for the registry listing.
    fn description(&self) -> &str;

    /// Confidence below this value flags the outcome for human review.
    ///
    /// The comparison is strict: an outcome at exactly the threshold is not
    /// flagged.
    fn confidence_threshold(&self) -> f64 {
        DEFAULT_CONFIDENCE_THRESHOLD
    }

    /// Check the input before any work happens.
    ///
    /// An `Err` here becomes a Failed outcome without `execute` running.
    fn validate(&self, _input: &Self::Input) -> PipelineResult<()> {
        Ok(())
    }

    /// Run the capability.
    ///
    /// Returns `(output, confidence, explanation)`. Confidence is the task's
    /// own estimate in [0.0, 1.0]; the runner clamps out-of-range values.
    /// The explanation must describe the decision in plain language — it is
    /// written verbatim into the compliance record.
    fn execute(&self, input: &Self::Input) -> PipelineResult<(Self::Output, f64, String)>;
}
