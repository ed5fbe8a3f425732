//! The agent runner: the uniform envelope around every task invocation.
//!
//! The runner enforces the execution contract:
//!
//!   validate → execute → gate on confidence → envelope
//!
//! Containment is absolute: a task that returns `Err` produces a Failed
//! outcome with the error recorded; `run()` itself is infallible. The
//! reasoning trail is built up locally during one invocation and attached
//! to the finished outcome as an immutable log — no shared mutable trail
//! exists between invocations.

use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::{debug, warn};
use uuid::Uuid;

use talentgate_contracts::outcome::{AgentOutcome, AgentStatus};

use crate::task::AgentTask;

/// Wraps one `AgentTask` and produces `AgentOutcome`s from its invocations.
///
/// One runner per installed capability; the runner is stateless across
/// invocations apart from its configuration.
pub struct AgentRunner<I, O> {
    task: Box<dyn AgentTask<Input = I, Output = O>>,
    /// Overrides the task's own threshold when set (from policy config).
    threshold_override: Option<f64>,
    /// Invocations that take longer than this are converted to Failed.
    timeout: Option<Duration>,
}

impl<I, O> AgentRunner<I, O> {
    pub fn new(task: Box<dyn AgentTask<Input = I, Output = O>>) -> Self {
        Self {
            task,
            threshold_override: None,
            timeout: None,
        }
    }

    /// Replace the task's confidence threshold with a configured value.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold_override = Some(threshold);
        self
    }

    /// Convert invocations exceeding `timeout` to Failed outcomes.
    ///
    /// The check is cooperative: the task runs to completion and the result
    /// is discarded afterwards if the deadline was missed. Tasks are
    /// in-process computations, so a hard preemption is not available.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn kind(&self) -> &str {
        self.task.kind()
    }

    pub fn description(&self) -> &str {
        self.task.description()
    }

    /// The threshold in effect: the override when set, the task's otherwise.
    pub fn effective_threshold(&self) -> f64 {
        self.threshold_override
            .unwrap_or_else(|| self.task.confidence_threshold())
    }

    /// Run the task once and envelope the result.
    ///
    /// Never returns an error: validation failures, execution failures, and
    /// timeouts all surface as Failed outcomes with `requires_human_review`
    /// set. Success outcomes below the confidence threshold stay Success but
    /// are likewise flagged for review.
    pub fn run(&self, input: &I) -> AgentOutcome<O> {
        let kind = self.task.kind().to_string();
        let agent_id = format!("{}-{}", kind, &Uuid::new_v4().to_string()[..8]);
        let threshold = self.effective_threshold();

        let mut trail = Vec::new();
        trail_step(&mut trail, format!("starting {kind}"));

        let started = Instant::now();

        if let Err(e) = self.task.validate(input) {
            trail_step(&mut trail, format!("input validation failed: {e}"));
            warn!(agent_kind = %kind, error = %e, "input validation failed");
            return self.failed_outcome(agent_id, kind, trail, started, e.to_string());
        }

        debug!(agent_kind = %kind, threshold, "executing agent task");

        match self.task.execute(input) {
            Ok((payload, confidence, explanation)) => {
                let elapsed = started.elapsed();
                if let Some(limit) = self.timeout {
                    if elapsed > limit {
                        trail_step(
                            &mut trail,
                            format!(
                                "deadline exceeded: {}ms > {}ms limit",
                                elapsed.as_millis(),
                                limit.as_millis()
                            ),
                        );
                        warn!(agent_kind = %kind, elapsed_ms = elapsed.as_millis() as u64, "agent task exceeded deadline");
                        return self.failed_outcome(
                            agent_id,
                            kind,
                            trail,
                            started,
                            format!("execution exceeded {}ms deadline", limit.as_millis()),
                        );
                    }
                }

                let confidence = confidence.clamp(0.0, 1.0);
                trail_step(&mut trail, format!("completed with confidence {confidence:.2}"));

                let requires_human_review = confidence < threshold;
                if requires_human_review {
                    trail_step(
                        &mut trail,
                        format!("confidence {confidence:.2} below threshold {threshold:.2}, flagged for review"),
                    );
                    debug!(agent_kind = %kind, confidence, threshold, "outcome flagged for human review");
                }

                AgentOutcome {
                    agent_id,
                    agent_kind: kind,
                    status: AgentStatus::Success,
                    payload: Some(payload),
                    confidence,
                    explanation,
                    audit_trail: trail,
                    duration_ms: elapsed.as_millis() as u64,
                    errors: vec![],
                    warnings: vec![],
                    requires_human_review,
                }
            }
            Err(e) => {
                trail_step(&mut trail, format!("execution failed: {e}"));
                warn!(agent_kind = %kind, error = %e, "agent task failed, containing error");
                self.failed_outcome(agent_id, kind, trail, started, e.to_string())
            }
        }
    }

    fn failed_outcome(
        &self,
        agent_id: String,
        kind: String,
        trail: Vec<String>,
        started: Instant,
        error: String,
    ) -> AgentOutcome<O> {
        AgentOutcome {
            agent_id,
            agent_kind: kind.clone(),
            status: AgentStatus::Failed,
            payload: None,
            confidence: 0.0,
            explanation: format!("{kind} did not produce a usable result"),
            audit_trail: trail,
            duration_ms: started.elapsed().as_millis() as u64,
            errors: vec![error],
            warnings: vec![],
            requires_human_review: true,
        }
    }
}

fn trail_step(trail: &mut Vec<String>, message: String) {
    trail.push(format!("[{}] {}", Utc::now().format("%H:%M:%S%.3f"), message));
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use talentgate_contracts::error::{PipelineError, PipelineResult};
    use talentgate_contracts::outcome::AgentStatus;

    use crate::task::AgentTask;

    use super::AgentRunner;

    /// A task that returns a pre-configured confidence, counting invocations.
    struct FixedConfidenceTask {
        confidence: f64,
        calls: Arc<Mutex<u32>>,
    }

    impl FixedConfidenceTask {
        fn new(confidence: f64) -> Self {
            Self {
                confidence,
                calls: Arc::new(Mutex::new(0)),
            }
        }
    }

    impl AgentTask for FixedConfidenceTask {
        type Input = u32;
        type Output = u32;

        fn kind(&self) -> &str {
            "FixedConfidence"
        }

        fn description(&self) -> &str {
            "returns its input doubled with a fixed confidence"
        }

        fn execute(&self, input: &u32) -> PipelineResult<(u32, f64, String)> {
            *self.calls.lock().unwrap() += 1;
            Ok((input * 2, self.confidence, format!("doubled {input}")))
        }
    }

    /// A task that always fails in execute().
    struct FailingTask;

    impl AgentTask for FailingTask {
        type Input = u32;
        type Output = u32;

        fn kind(&self) -> &str {
            "Failing"
        }

        fn description(&self) -> &str {
            "always fails"
        }

        fn execute(&self, _input: &u32) -> PipelineResult<(u32, f64, String)> {
            Err(PipelineError::AgentExecution {
                agent_kind: "Failing".to_string(),
                reason: "simulated domain failure".to_string(),
            })
        }
    }

    /// A task that rejects its input in validate().
    struct PickyTask;

    impl AgentTask for PickyTask {
        type Input = u32;
        type Output = u32;

        fn kind(&self) -> &str {
            "Picky"
        }

        fn description(&self) -> &str {
            "rejects zero"
        }

        fn validate(&self, input: &u32) -> PipelineResult<()> {
            if *input == 0 {
                return Err(PipelineError::InvalidInput {
                    reason: "input must be non-zero".to_string(),
                });
            }
            Ok(())
        }

        fn execute(&self, input: &u32) -> PipelineResult<(u32, f64, String)> {
            Ok((*input, 0.9, "accepted".to_string()))
        }
    }

    /// A task that sleeps longer than any reasonable test deadline.
    struct SlowTask;

    impl AgentTask for SlowTask {
        type Input = u32;
        type Output = u32;

        fn kind(&self) -> &str {
            "Slow"
        }

        fn description(&self) -> &str {
            "sleeps before answering"
        }

        fn execute(&self, input: &u32) -> PipelineResult<(u32, f64, String)> {
            std::thread::sleep(Duration::from_millis(50));
            Ok((*input, 0.95, "eventually done".to_string()))
        }
    }

    #[test]
    fn successful_run_produces_success_outcome() {
        let runner = AgentRunner::new(Box::new(FixedConfidenceTask::new(0.9)));
        let outcome = runner.run(&21);

        assert_eq!(outcome.status, AgentStatus::Success);
        assert_eq!(outcome.payload, Some(42));
        assert_eq!(outcome.confidence, 0.9);
        assert_eq!(outcome.explanation, "doubled 21");
        assert!(!outcome.requires_human_review);
        assert!(outcome.errors.is_empty());
        assert!(outcome.agent_id.starts_with("FixedConfidence-"));
    }

    #[test]
    fn low_confidence_flags_review_but_stays_success() {
        let runner = AgentRunner::new(Box::new(FixedConfidenceTask::new(0.5)));
        let outcome = runner.run(&1);

        assert_eq!(outcome.status, AgentStatus::Success);
        assert!(outcome.requires_human_review);
        assert!(
            outcome
                .audit_trail
                .iter()
                .any(|s| s.contains("below threshold")),
            "trail should note the shortfall: {:?}",
            outcome.audit_trail
        );
    }

    /// The comparison is strict: exactly at the threshold is not flagged.
    #[test]
    fn confidence_at_threshold_is_not_flagged() {
        let runner = AgentRunner::new(Box::new(FixedConfidenceTask::new(0.7)));
        let outcome = runner.run(&1);

        assert_eq!(outcome.status, AgentStatus::Success);
        assert!(!outcome.requires_human_review);
    }

    #[test]
    fn threshold_override_takes_precedence() {
        let runner = AgentRunner::new(Box::new(FixedConfidenceTask::new(0.75))).with_threshold(0.8);
        assert_eq!(runner.effective_threshold(), 0.8);

        let outcome = runner.run(&1);
        assert!(outcome.requires_human_review);
    }

    /// Core containment test: a task error surfaces as a Failed outcome and
    /// never as a panic or an Err from run().
    #[test]
    fn execution_error_is_contained() {
        let runner = AgentRunner::new(Box::new(FailingTask));
        let outcome = runner.run(&1);

        assert_eq!(outcome.status, AgentStatus::Failed);
        assert!(outcome.payload.is_none());
        assert_eq!(outcome.confidence, 0.0);
        assert!(outcome.requires_human_review);
        assert_eq!(outcome.errors.len(), 1);
        assert!(outcome.errors[0].contains("simulated domain failure"));
    }

    #[test]
    fn validation_failure_skips_execute() {
        let task = FixedConfidenceTask::new(0.9);
        let calls = task.calls.clone();

        // PickyTask demonstrates the rejection; FixedConfidenceTask the
        // call count on the happy path.
        let picky = AgentRunner::new(Box::new(PickyTask));
        let outcome = picky.run(&0);
        assert_eq!(outcome.status, AgentStatus::Failed);
        assert!(outcome.errors[0].contains("non-zero"));

        let runner = AgentRunner::new(Box::new(task));
        runner.run(&1);
        assert_eq!(*calls.lock().unwrap(), 1);
    }

    #[test]
    fn out_of_range_confidence_is_clamped() {
        let runner = AgentRunner::new(Box::new(FixedConfidenceTask::new(1.4)));
        let outcome = runner.run(&1);
        assert_eq!(outcome.confidence, 1.0);

        let runner = AgentRunner::new(Box::new(FixedConfidenceTask::new(-0.2)));
        let outcome = runner.run(&1);
        assert_eq!(outcome.confidence, 0.0);
        assert!(outcome.requires_human_review);
    }

    #[test]
    fn missed_deadline_converts_to_failed() {
        let runner = AgentRunner::new(Box::new(SlowTask)).with_timeout(Duration::from_millis(1));
        let outcome = runner.run(&1);

        assert_eq!(outcome.status, AgentStatus::Failed);
        assert!(outcome.errors[0].contains("deadline"));
        assert!(outcome.requires_human_review);

        let generous = AgentRunner::new(Box::new(SlowTask)).with_timeout(Duration::from_secs(10));
        assert_eq!(generous.run(&1).status, AgentStatus::Success);
    }

    #[test]
    fn trail_is_timestamped_and_ordered() {
        let runner = AgentRunner::new(Box::new(FixedConfidenceTask::new(0.9)));
        let outcome = runner.run(&1);

        assert!(outcome.audit_trail[0].contains("starting FixedConfidence"));
        assert!(outcome.audit_trail[1].contains("completed with confidence"));
        for step in &outcome.audit_trail {
            assert!(step.starts_with('['), "steps carry timestamps: {step}");
        }
    }
}
