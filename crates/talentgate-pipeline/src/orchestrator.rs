//! The pipeline orchestrator.
//!
//! The orchestrator drives one `PipelineState` through the fixed stage
//! sequence. Each stage handler runs the capability its label names,
//! records every outcome in the state and the audit ledger, and returns a
//! `StageDecision` the execution loop applies. Handler errors are
//! contained as aborts — `run_pipeline` always hands back a terminal
//! state once a pipeline exists.
//!
//! The orchestrator coordinates only. Scoring lives in the agent tasks,
//! thresholds in the policy, and the completion veto with the bias
//! auditor: a pipeline whose governance audit fails ends in
//! `AwaitingHumanReview`, never in `Completed`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tracing::{debug, info, warn};
use uuid::Uuid;

use talentgate_contracts::audit::{AuditEntry, AuditFilter};
use talentgate_contracts::candidate::{CandidateProfile, ResumeSource};
use talentgate_contracts::error::{PipelineError, PipelineResult};
use talentgate_contracts::evaluation::{
    MatchInput, MatchReport, RankingInput, ScreeningTest, ShortlistInput, TestAnswer,
    TestGenInput, TestScore, TestSubmission,
};
use talentgate_contracts::governance::GovernanceInput;
use talentgate_contracts::outcome::{AgentOutcome, AgentStatus, OutcomeRecord};
use talentgate_contracts::stage::PipelineStage;
use talentgate_core::registry::{AgentDescriptor, AgentRegistry};
use talentgate_core::runner::AgentRunner;
use talentgate_core::sink::AuditSink;
use talentgate_policy::{EscalationPolicy, GateFailureAction, PipelinePolicy};

use crate::gate::evaluate_gate;
use crate::state::{PipelineState, PipelineSummary};
use crate::suite::{AgentSuite, BoxedTask};

// ── Control types ────────────────────────────────────────────────────────────

/// What a stage handler asks the execution loop to do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageDecision {
    /// Advance to the named stage.
    Continue(PipelineStage),
    /// Suspend for human review.
    Pause(String),
    /// Re-run the current stage, within the retry budget.
    Retry(String),
    /// Stop the pipeline with a recorded reason.
    Abort(String),
    /// The pipeline is done.
    Complete,
}

/// Cooperative cancellation handle.
///
/// Cancelling does not interrupt a stage in flight; the loop checks the
/// token between stages and records an orderly failure.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

// ── Runner set ───────────────────────────────────────────────────────────────

struct Runners {
    jd_analyzer: AgentRunner<talentgate_contracts::job::JobProfile, talentgate_contracts::job::AnalyzedJob>,
    resume_parser: AgentRunner<talentgate_agents::ParseInput, talentgate_contracts::candidate::ParsedResume>,
    matcher: AgentRunner<MatchInput, MatchReport>,
    shortlister: AgentRunner<ShortlistInput, talentgate_contracts::evaluation::Shortlist>,
    test_generator: AgentRunner<TestGenInput, ScreeningTest>,
    test_evaluator: AgentRunner<TestSubmission, TestScore>,
    ranker: AgentRunner<RankingInput, Vec<talentgate_contracts::evaluation::CandidateRanking>>,
    bias_auditor: AgentRunner<GovernanceInput, talentgate_contracts::governance::GovernanceReport>,
}

fn build_runner<I, O>(task: BoxedTask<I, O>, policy: &PipelinePolicy) -> AgentRunner<I, O> {
    let threshold = policy.confidence_threshold_for(task.kind());
    let mut runner = AgentRunner::new(task).with_threshold(threshold);
    if let Some(ms) = policy.agent_timeout_ms {
        runner = runner.with_timeout(Duration::from_millis(ms));
    }
    runner
}

impl Runners {
    fn build(suite: AgentSuite, policy: &PipelinePolicy) -> Self {
        Self {
            jd_analyzer: build_runner(suite.jd_analyzer, policy),
            resume_parser: build_runner(suite.resume_parser, policy),
            matcher: build_runner(suite.matcher, policy),
            shortlister: build_runner(suite.shortlister, policy),
            test_generator: build_runner(suite.test_generator, policy),
            test_evaluator: build_runner(suite.test_evaluator, policy),
            ranker: build_runner(suite.ranker, policy),
            bias_auditor: build_runner(suite.bias_auditor, policy),
        }
    }

    fn descriptors(&self) -> Vec<AgentDescriptor> {
        let describe = |kind: &str, description: &str, threshold: f64| AgentDescriptor {
            kind: kind.to_string(),
            description: description.to_string(),
            confidence_threshold: threshold,
        };
        vec![
            describe(self.jd_analyzer.kind(), self.jd_analyzer.description(), self.jd_analyzer.effective_threshold()),
            describe(self.resume_parser.kind(), self.resume_parser.description(), self.resume_parser.effective_threshold()),
            describe(self.matcher.kind(), self.matcher.description(), self.matcher.effective_threshold()),
            describe(self.shortlister.kind(), self.shortlister.description(), self.shortlister.effective_threshold()),
            describe(self.test_generator.kind(), self.test_generator.description(), self.test_generator.effective_threshold()),
            describe(self.test_evaluator.kind(), self.test_evaluator.description(), self.test_evaluator.effective_threshold()),
            describe(self.ranker.kind(), self.ranker.description(), self.ranker.effective_threshold()),
            describe(self.bias_auditor.kind(), self.bias_auditor.description(), self.bias_auditor.effective_threshold()),
        ]
    }
}

// ── Orchestrator ─────────────────────────────────────────────────────────────

/// Drives one pipeline at a time through the stage sequence.
pub struct Orchestrator {
    policy: PipelinePolicy,
    ledger: Arc<dyn AuditSink>,
    registry: AgentRegistry,
    runners: Runners,
    state: Option<PipelineState>,
    cancel: CancellationToken,
}

impl Orchestrator {
    /// Build an orchestrator over the reference agent suite.
    pub fn new(policy: PipelinePolicy, ledger: Arc<dyn AuditSink>) -> PipelineResult<Self> {
        Self::with_suite(policy, ledger, AgentSuite::reference())
    }

    /// Build an orchestrator over a custom suite (the test seam, and the
    /// seam LLM-backed providers plug into).
    pub fn with_suite(
        policy: PipelinePolicy,
        ledger: Arc<dyn AuditSink>,
        suite: AgentSuite,
    ) -> PipelineResult<Self> {
        policy.validate()?;
        let runners = Runners::build(suite, &policy);
        let mut registry = AgentRegistry::new();
        for descriptor in runners.descriptors() {
            registry.register(descriptor)?;
        }
        Ok(Self {
            policy,
            ledger,
            registry,
            runners,
            state: None,
            cancel: CancellationToken::new(),
        })
    }

    pub fn registry(&self) -> &AgentRegistry {
        &self.registry
    }

    pub fn policy(&self) -> &PipelinePolicy {
        &self.policy
    }

    pub fn state(&self) -> Option<&PipelineState> {
        self.state.as_ref()
    }

    /// Handle for cancelling a run from another thread.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    // ── Control surface ──────────────────────────────────────────────────────

    /// Initialize a new pipeline over a job and its candidates.
    pub fn create_pipeline(
        &mut self,
        job: talentgate_contracts::job::JobProfile,
        candidates: Vec<CandidateProfile>,
    ) -> PipelineResult<&PipelineState> {
        if job.job_id.trim().is_empty() {
            return Err(PipelineError::InvalidInput {
                reason: "job_id must not be blank".to_string(),
            });
        }
        if candidates.is_empty() {
            return Err(PipelineError::InvalidInput {
                reason: "candidates must not be empty".to_string(),
            });
        }
        for (i, candidate) in candidates.iter().enumerate() {
            if candidates[..i]
                .iter()
                .any(|c| c.candidate_id == candidate.candidate_id)
            {
                return Err(PipelineError::InvalidInput {
                    reason: format!("duplicate candidate_id '{}'", candidate.candidate_id),
                });
            }
        }

        let state = PipelineState::new(job, candidates);
        info!(
            pipeline_id = %state.pipeline_id,
            job_id = %state.job_id,
            candidates = state.candidates.len(),
            "pipeline created"
        );
        self.ledger.append(
            AuditEntry::generic(
                "pipeline_created",
                json!({
                    "job_id": state.job_id,
                    "candidate_count": state.candidates.len(),
                }),
            )
            .with_pipeline(state.pipeline_id.clone())
            .with_job(state.job_id.clone()),
        )?;

        Ok(self.state.insert(state))
    }

    /// Execute the pipeline to a terminal state.
    ///
    /// Returns `Err` only when no pipeline was created. Stage failures,
    /// gate failures, governance vetoes, and cancellation all surface as
    /// terminal stages on the returned state, never as errors or panics.
    pub fn run_pipeline(&mut self) -> PipelineResult<PipelineState> {
        let mut state = self.state.take().ok_or_else(|| PipelineError::InvalidInput {
            reason: "no pipeline created; call create_pipeline first".to_string(),
        })?;

        let started_entry =
            AuditEntry::generic("pipeline_started", json!({ "job_id": state.job_id }));
        self.append_best_effort(&mut state, started_entry);

        let mut retries: HashMap<PipelineStage, u32> = HashMap::new();

        while !state.current_stage.is_terminal() {
            if self.cancel.is_cancelled() {
                warn!(pipeline_id = %state.pipeline_id, stage = %state.current_stage, "pipeline cancelled");
                let cancelled_entry = AuditEntry::generic(
                    "pipeline_cancelled",
                    json!({ "stage": state.current_stage.as_str() }),
                );
                self.append_best_effort(&mut state, cancelled_entry);
                state
                    .errors
                    .push("pipeline cancelled by operator".to_string());
                state.current_stage = PipelineStage::Failed;
                break;
            }

            let stage = state.current_stage;
            debug!(pipeline_id = %state.pipeline_id, stage = %stage, "executing stage");

            // A handler error is orchestration failure, contained as an abort.
            let decision = match self.execute_stage(&mut state) {
                Ok(decision) => decision,
                Err(e) => StageDecision::Abort(format!("error in {stage}: {e}")),
            };

            match decision {
                StageDecision::Continue(next) => {
                    state.current_stage = next;
                }
                StageDecision::Pause(reason) => {
                    info!(pipeline_id = %state.pipeline_id, stage = %stage, reason = %reason, "pipeline paused for review");
                    state.current_stage = PipelineStage::AwaitingHumanReview;
                }
                StageDecision::Retry(reason) => {
                    let count = retries.entry(stage).or_insert(0);
                    *count += 1;
                    if *count > self.policy.max_stage_retries {
                        state.errors.push(format!(
                            "stage {stage} exhausted its retry budget: {reason}"
                        ));
                        state.current_stage = PipelineStage::Failed;
                    } else {
                        warn!(pipeline_id = %state.pipeline_id, stage = %stage, attempt = *count, "retrying stage");
                        state.warnings.push(format!("retrying stage {stage}: {reason}"));
                    }
                }
                StageDecision::Abort(reason) => {
                    warn!(pipeline_id = %state.pipeline_id, stage = %stage, reason = %reason, "pipeline aborted");
                    state.errors.push(reason);
                    state.current_stage = PipelineStage::Failed;
                }
                StageDecision::Complete => {
                    state.current_stage = PipelineStage::Completed;
                }
            }
        }

        info!(
            pipeline_id = %state.pipeline_id,
            final_stage = %state.current_stage,
            errors = state.errors.len(),
            "pipeline finished"
        );
        let finished_entry = AuditEntry::generic(
            "pipeline_finished",
            json!({
                "final_stage": state.current_stage.as_str(),
                "error_count": state.errors.len(),
            }),
        );
        self.append_best_effort(&mut state, finished_entry);

        self.state = Some(state.clone());
        Ok(state)
    }

    /// Progress snapshot; side-effect-free and idempotent.
    pub fn get_summary(&self) -> Option<PipelineSummary> {
        self.state.as_ref().map(PipelineState::summary)
    }

    /// All ledger entries for the current pipeline, in insertion order.
    pub fn get_audit_log(&self) -> Vec<AuditEntry> {
        match &self.state {
            Some(state) => self
                .ledger
                .entries(&AuditFilter::for_pipeline(state.pipeline_id.clone())),
            None => Vec::new(),
        }
    }

    // ── Stage dispatch ───────────────────────────────────────────────────────

    fn execute_stage(&self, state: &mut PipelineState) -> PipelineResult<StageDecision> {
        self.ledger.append(
            AuditEntry::generic(
                "stage_started",
                json!({ "stage": state.current_stage.as_str() }),
            )
            .with_pipeline(state.pipeline_id.clone()),
        )?;

        match state.current_stage {
            PipelineStage::Initialized => Ok(StageDecision::Continue(PipelineStage::JdAnalysis)),
            PipelineStage::JdAnalysis => self.run_jd_analysis(state),
            PipelineStage::ResumeParsing => self.run_resume_parsing(state),
            PipelineStage::Matching => self.run_matching(state),
            PipelineStage::Shortlisting => self.run_shortlisting(state),
            PipelineStage::TestGeneration => self.run_test_generation(state),
            PipelineStage::TestEvaluation => self.run_test_evaluation(state),
            PipelineStage::Ranking => self.run_ranking(state),
            PipelineStage::BiasAudit => self.run_bias_audit(state),
            terminal => Err(PipelineError::StageExecution {
                stage: terminal.as_str().to_string(),
                reason: "terminal stage has no handler".to_string(),
            }),
        }
    }

    // ── Stage handlers ───────────────────────────────────────────────────────

    fn run_jd_analysis(&self, state: &mut PipelineState) -> PipelineResult<StageDecision> {
        let outcome = self.runners.jd_analyzer.run(&state.job);

        if outcome.is_failed() {
            let reason = format!(
                "job description analysis failed: {}",
                outcome.errors.join("; ")
            );
            self.record_outcome(state, outcome.into_record())?;
            return Ok(StageDecision::Abort(reason));
        }

        state.analyzed_job = outcome.payload.clone();
        let pause = self.record_outcome(state, outcome.into_record())?;
        if pause {
            return Ok(StageDecision::Pause(
                "job description analysis flagged for review".to_string(),
            ));
        }
        Ok(StageDecision::Continue(PipelineStage::ResumeParsing))
    }

    fn run_resume_parsing(&self, state: &mut PipelineState) -> PipelineResult<StageDecision> {
        let analyzed = state
            .analyzed_job
            .clone()
            .ok_or_else(|| PipelineError::StageExecution {
                stage: "resume_parsing".to_string(),
                reason: "no analyzed job in state".to_string(),
            })?;

        let mut lexicon: Vec<String> = analyzed.skills.iter().map(|s| s.name.clone()).collect();
        for topic in &analyzed.technical_topics {
            if !lexicon.contains(topic) {
                lexicon.push(topic.clone());
            }
        }

        let inputs: Vec<talentgate_agents::ParseInput> = state
            .candidates
            .iter()
            .map(|c| talentgate_agents::ParseInput {
                source: ResumeSource {
                    candidate_id: c.profile.candidate_id.clone(),
                    resume_text: c.profile.resume_text.clone(),
                },
                lexicon: lexicon.clone(),
            })
            .collect();

        // Parse in bounded batches; results stay in candidate order. A
        // panicking provider thread is contained as a Failed outcome for
        // that candidate, like any other provider error.
        let runner = &self.runners.resume_parser;
        let mut outcomes = Vec::with_capacity(inputs.len());
        for chunk in inputs.chunks(self.policy.max_parallel_parsers) {
            let chunk_outcomes: Vec<_> = std::thread::scope(|scope| {
                let handles: Vec<_> = chunk
                    .iter()
                    .map(|input| scope.spawn(move || runner.run(input)))
                    .collect();
                handles
                    .into_iter()
                    .zip(chunk)
                    .map(|(h, input)| {
                        h.join().unwrap_or_else(|_| {
                            warn!(
                                candidate_id = %input.source.candidate_id,
                                "resume parser thread panicked"
                            );
                            panicked_outcome(runner.kind(), &input.source.candidate_id)
                        })
                    })
                    .collect()
            });
            outcomes.extend(chunk_outcomes);
        }

        let mut parsed_count = 0;
        let mut pause = false;
        for (i, outcome) in outcomes.into_iter().enumerate() {
            if outcome.is_success() {
                if let Some(parsed) = outcome.payload.clone() {
                    state.candidates[i].parsed = Some(parsed);
                    parsed_count += 1;
                }
            }
            pause |= self.record_outcome(state, outcome.into_record())?;
        }

        if parsed_count == 0 {
            return Ok(StageDecision::Abort(
                "no resumes could be parsed".to_string(),
            ));
        }
        if pause {
            return Ok(StageDecision::Pause(
                "resume parsing flagged for review".to_string(),
            ));
        }
        Ok(StageDecision::Continue(PipelineStage::Matching))
    }

    fn run_matching(&self, state: &mut PipelineState) -> PipelineResult<StageDecision> {
        let analyzed = state
            .analyzed_job
            .clone()
            .ok_or_else(|| PipelineError::StageExecution {
                stage: "matching".to_string(),
                reason: "no analyzed job in state".to_string(),
            })?;

        let inputs: Vec<MatchInput> = state
            .candidates
            .iter()
            .filter_map(|c| {
                c.parsed.clone().map(|parsed| MatchInput {
                    parsed,
                    job: analyzed.clone(),
                    weights: self.policy.weights,
                })
            })
            .collect();

        let mut matched = 0;
        let mut pause = false;
        for input in &inputs {
            let candidate_id = input.parsed.candidate_id.clone();
            let outcome = self.runners.matcher.run(input);
            if outcome.is_success() {
                if let Some(report) = outcome.payload.clone() {
                    if let Some(candidate) = state.candidate_mut(&candidate_id) {
                        candidate.match_report = Some(report);
                        matched += 1;
                    }
                }
            }
            pause |= self.record_outcome(state, outcome.into_record())?;
        }

        if matched == 0 {
            return Ok(StageDecision::Abort(
                "no candidates could be matched against the job".to_string(),
            ));
        }
        if pause {
            return Ok(StageDecision::Pause("matching flagged for review".to_string()));
        }
        Ok(StageDecision::Continue(PipelineStage::Shortlisting))
    }

    fn run_shortlisting(&self, state: &mut PipelineState) -> PipelineResult<StageDecision> {
        let reports: Vec<MatchReport> = state
            .candidates
            .iter()
            .filter_map(|c| c.match_report.clone())
            .collect();
        if reports.is_empty() {
            return Err(PipelineError::StageExecution {
                stage: "shortlisting".to_string(),
                reason: "no match reports in state".to_string(),
            });
        }

        let threshold = self.policy.thresholds.shortlist;
        let outcome = self.runners.shortlister.run(&ShortlistInput {
            reports: reports.clone(),
            threshold,
        });

        if outcome.is_failed() {
            let reason = format!("shortlisting failed: {}", outcome.errors.join("; "));
            self.record_outcome(state, outcome.into_record())?;
            return Ok(StageDecision::Abort(reason));
        }
        if let Some(shortlist) = outcome.payload.clone() {
            for candidate_id in &shortlist.selected {
                if let Some(candidate) = state.candidate_mut(candidate_id) {
                    candidate.shortlisted = true;
                }
            }
        }
        let pause = self.record_outcome(state, outcome.into_record())?;

        // The gate watches the cohort, not individuals: the mean match
        // score against the shortlist threshold.
        let mean = reports.iter().map(|r| r.overall_score).sum::<f64>() / reports.len() as f64;
        let gate = evaluate_gate("shortlist_gate", mean, threshold, self.policy.borderline_margin);
        self.ledger.append(
            AuditEntry::decision_gate(&gate)
                .with_pipeline(state.pipeline_id.clone())
                .with_job(state.job_id.clone()),
        )?;
        state.decision_gates.push(gate.clone());

        if !gate.passed {
            let reason = format!(
                "gate '{}' failed: mean match score {:.2} below threshold {:.2}",
                gate.gate_name, gate.measured, gate.threshold
            );
            match self.policy.on_gate_failure {
                GateFailureAction::Continue => {
                    state.warnings.push(format!("{reason}; continuing per policy"));
                }
                GateFailureAction::Pause => return Ok(StageDecision::Pause(reason)),
                GateFailureAction::Abort => return Ok(StageDecision::Abort(reason)),
                GateFailureAction::Retry => return Ok(StageDecision::Retry(reason)),
            }
        }

        if pause {
            return Ok(StageDecision::Pause(
                "shortlisting flagged for review".to_string(),
            ));
        }
        if state.shortlisted().count() == 0 {
            return Ok(StageDecision::Abort(
                "no candidates cleared the shortlist threshold".to_string(),
            ));
        }
        Ok(StageDecision::Continue(PipelineStage::TestGeneration))
    }

    fn run_test_generation(&self, state: &mut PipelineState) -> PipelineResult<StageDecision> {
        let analyzed = state
            .analyzed_job
            .clone()
            .ok_or_else(|| PipelineError::StageExecution {
                stage: "test_generation".to_string(),
                reason: "no analyzed job in state".to_string(),
            })?;

        let outcome = self.runners.test_generator.run(&TestGenInput {
            job: analyzed,
            question_count: self.policy.test_question_count,
        });

        if outcome.is_failed() {
            let reason = format!("test generation failed: {}", outcome.errors.join("; "));
            self.record_outcome(state, outcome.into_record())?;
            return Ok(StageDecision::Abort(reason));
        }
        state.test = outcome.payload.clone();
        let pause = self.record_outcome(state, outcome.into_record())?;
        if pause {
            return Ok(StageDecision::Pause(
                "test generation flagged for review".to_string(),
            ));
        }
        Ok(StageDecision::Continue(PipelineStage::TestEvaluation))
    }

    fn run_test_evaluation(&self, state: &mut PipelineState) -> PipelineResult<StageDecision> {
        let test = state.test.clone().ok_or_else(|| PipelineError::StageExecution {
            stage: "test_evaluation".to_string(),
            reason: "no screening test in state".to_string(),
        })?;

        let shortlisted: Vec<(String, Vec<String>)> = state
            .shortlisted()
            .map(|c| {
                let skills = c
                    .parsed
                    .as_ref()
                    .map(|p| p.skill_names().iter().map(|s| s.to_string()).collect())
                    .unwrap_or_default();
                (c.profile.candidate_id.clone(), skills)
            })
            .collect();

        let mut pause = false;
        for (candidate_id, skills) in shortlisted {
            let submission = synthesize_submission(&candidate_id, &test, &skills);
            let outcome = self.runners.test_evaluator.run(&submission);
            if outcome.is_success() {
                if let Some(score) = outcome.payload.clone() {
                    if let Some(candidate) = state.candidate_mut(&candidate_id) {
                        candidate.test_score = Some(score);
                    }
                }
            }
            pause |= self.record_outcome(state, outcome.into_record())?;
        }

        if pause {
            return Ok(StageDecision::Pause(
                "test evaluation flagged for review".to_string(),
            ));
        }
        Ok(StageDecision::Continue(PipelineStage::Ranking))
    }

    fn run_ranking(&self, state: &mut PipelineState) -> PipelineResult<StageDecision> {
        let matches: Vec<MatchReport> = state
            .shortlisted()
            .filter_map(|c| c.match_report.clone())
            .collect();
        let scores: Vec<TestScore> = state
            .shortlisted()
            .filter_map(|c| c.test_score.clone())
            .collect();

        let outcome = self.runners.ranker.run(&RankingInput {
            matches,
            scores,
            blend: self.policy.ranking,
        });

        if outcome.is_failed() {
            let reason = format!("ranking failed: {}", outcome.errors.join("; "));
            self.record_outcome(state, outcome.into_record())?;
            return Ok(StageDecision::Abort(reason));
        }
        if let Some(rankings) = outcome.payload.clone() {
            state.final_rankings = rankings.into_iter().take(self.policy.top_k).collect();
        }
        let pause = self.record_outcome(state, outcome.into_record())?;
        if pause {
            return Ok(StageDecision::Pause("ranking flagged for review".to_string()));
        }
        Ok(StageDecision::Continue(PipelineStage::BiasAudit))
    }

    fn run_bias_audit(&self, state: &mut PipelineState) -> PipelineResult<StageDecision> {
        let jd_bias_flags = state
            .analyzed_job
            .as_ref()
            .map(|j| j.bias_flags.clone())
            .unwrap_or_default();

        let input = GovernanceInput {
            jd_bias_flags,
            gates: state.decision_gates.clone(),
            rankings: state.final_rankings.clone(),
            candidate_count: state.candidates.len(),
            stage: PipelineStage::BiasAudit,
        };

        let outcome = self.runners.bias_auditor.run(&input);

        // The pipeline cannot complete without a finished audit.
        if outcome.is_failed() {
            let reason = format!(
                "governance audit failed to run: {}",
                outcome.errors.join("; ")
            );
            self.record_outcome(state, outcome.into_record())?;
            return Ok(StageDecision::Abort(reason));
        }

        let report = outcome
            .payload
            .clone()
            .ok_or_else(|| PipelineError::StageExecution {
                stage: "bias_audit".to_string(),
                reason: "governance audit produced no report".to_string(),
            })?;

        for finding in &report.findings {
            self.ledger.append(
                AuditEntry::bias_finding(finding)
                    .with_pipeline(state.pipeline_id.clone())
                    .with_job(state.job_id.clone()),
            )?;
        }
        state.governance = Some(report.clone());
        let pause = self.record_outcome(state, outcome.into_record())?;

        // The veto: a failed audit blocks completion under every
        // escalation policy. Work is preserved for human follow-up.
        if !report.audit_passed {
            self.ledger.append(
                AuditEntry::review_request(
                    "governance veto",
                    json!({
                        "fairness_score": report.fairness_score,
                        "findings": report.findings.len(),
                    }),
                )
                .with_pipeline(state.pipeline_id.clone()),
            )?;
            return Ok(StageDecision::Pause(format!(
                "governance veto: fairness score {:.2}, {} findings",
                report.fairness_score,
                report.findings.len()
            )));
        }
        if pause {
            return Ok(StageDecision::Pause(
                "governance audit flagged for review".to_string(),
            ));
        }
        Ok(StageDecision::Complete)
    }

    // ── Bookkeeping ──────────────────────────────────────────────────────────

    /// Record one outcome in the state and the ledger.
    ///
    /// Returns true when the review policy asks the pipeline to pause.
    fn record_outcome(
        &self,
        state: &mut PipelineState,
        outcome: OutcomeRecord,
    ) -> PipelineResult<bool> {
        let kind = outcome.agent_kind.clone();
        state.warnings.extend(outcome.warnings.iter().cloned());

        self.ledger.append(
            AuditEntry::decision(
                kind.clone(),
                "agent_outcome",
                outcome.confidence,
                outcome.explanation.clone(),
            )
            .with_pipeline(state.pipeline_id.clone())
            .with_job(state.job_id.clone()),
        )?;

        let requires_review = outcome.requires_human_review;
        if requires_review {
            self.ledger.append(
                AuditEntry::review_request(
                    format!("{kind} outcome flagged for human review"),
                    json!({
                        "agent_kind": kind,
                        "confidence": outcome.confidence,
                    }),
                )
                .with_pipeline(state.pipeline_id.clone()),
            )?;
        }

        state.agent_outcomes.push(outcome);

        if requires_review {
            match self.policy.escalation {
                EscalationPolicy::PauseOnReview => return Ok(true),
                EscalationPolicy::ContinueAndFlag => {
                    state
                        .warnings
                        .push(format!("{kind} outcome flagged for human review"));
                }
            }
        }
        Ok(false)
    }

    /// Ledger bookkeeping outside the stage handlers must not turn a
    /// terminal transition into an `Err`; failures are recorded on state.
    fn append_best_effort(&self, state: &mut PipelineState, entry: AuditEntry) {
        let entry = entry.with_pipeline(state.pipeline_id.clone());
        if let Err(e) = self.ledger.append(entry) {
            state.errors.push(e.to_string());
        }
    }
}

/// Failed outcome for a provider thread that panicked instead of
/// returning. Shaped exactly like the runner's own Failed envelope so the
/// downstream record handling cannot tell the two apart.
fn panicked_outcome<O>(kind: &str, candidate_id: &str) -> AgentOutcome<O> {
    AgentOutcome {
        agent_id: format!("{}-{}", kind, &Uuid::new_v4().to_string()[..8]),
        agent_kind: kind.to_string(),
        status: AgentStatus::Failed,
        payload: None,
        confidence: 0.0,
        explanation: format!("{kind} did not produce a usable result"),
        audit_trail: vec![],
        duration_ms: 0,
        errors: vec![format!(
            "provider thread panicked while processing candidate {candidate_id}"
        )],
        warnings: vec![],
        requires_human_review: true,
    }
}

/// Stand-in for external test delivery: the reference flow synthesizes a
/// submission from the candidate's parsed skills, answering each question
/// on topic exactly when the skill is on their resume.
fn synthesize_submission(
    candidate_id: &str,
    test: &ScreeningTest,
    skills: &[String],
) -> TestSubmission {
    let answers = test
        .questions
        .iter()
        .map(|q| {
            let knows = skills.iter().any(|s| s.eq_ignore_ascii_case(&q.topic));
            TestAnswer {
                question_id: q.question_id.clone(),
                answer: if knows {
                    format!(
                        "I have production experience with {} and can speak to its tradeoffs.",
                        q.topic
                    )
                } else {
                    "I have not worked with this directly.".to_string()
                },
            }
        })
        .collect();

    TestSubmission {
        candidate_id: candidate_id.to_string(),
        test: test.clone(),
        answers,
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
