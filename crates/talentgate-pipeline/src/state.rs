//! Pipeline state: everything one evaluation run accumulates.
//!
//! `PipelineState` is the single source of truth for a run. Stage handlers
//! append to it; nothing is removed or rewritten. `PipelineSummary` is the
//! side-effect-free projection operators poll.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use talentgate_contracts::candidate::{CandidateProfile, ParsedResume};
use talentgate_contracts::evaluation::{CandidateRanking, MatchReport, ScreeningTest, TestScore};
use talentgate_contracts::gate::GateEvaluation;
use talentgate_contracts::governance::GovernanceReport;
use talentgate_contracts::job::{AnalyzedJob, JobProfile};
use talentgate_contracts::outcome::OutcomeRecord;
use talentgate_contracts::stage::PipelineStage;

/// One candidate's progress through the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub profile: CandidateProfile,
    pub parsed: Option<ParsedResume>,
    pub match_report: Option<MatchReport>,
    pub test_score: Option<TestScore>,
    pub shortlisted: bool,
}

impl CandidateRecord {
    pub fn new(profile: CandidateProfile) -> Self {
        Self {
            profile,
            parsed: None,
            match_report: None,
            test_score: None,
            shortlisted: false,
        }
    }
}

/// The complete state of one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineState {
    pub pipeline_id: String,
    pub job_id: String,
    pub job: JobProfile,
    pub analyzed_job: Option<AnalyzedJob>,
    pub candidates: Vec<CandidateRecord>,
    pub current_stage: PipelineStage,
    /// Every agent outcome, in execution order. Append-only.
    pub agent_outcomes: Vec<OutcomeRecord>,
    /// Every decision gate evaluated, in order. Append-only.
    pub decision_gates: Vec<GateEvaluation>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub test: Option<ScreeningTest>,
    pub final_rankings: Vec<CandidateRanking>,
    pub governance: Option<GovernanceReport>,
    pub created_at: DateTime<Utc>,
}

impl PipelineState {
    pub fn new(job: JobProfile, candidates: Vec<CandidateProfile>) -> Self {
        Self {
            pipeline_id: Uuid::new_v4().to_string(),
            job_id: job.job_id.clone(),
            job,
            analyzed_job: None,
            candidates: candidates.into_iter().map(CandidateRecord::new).collect(),
            current_stage: PipelineStage::Initialized,
            agent_outcomes: Vec::new(),
            decision_gates: Vec::new(),
            errors: Vec::new(),
            warnings: Vec::new(),
            test: None,
            final_rankings: Vec::new(),
            governance: None,
            created_at: Utc::now(),
        }
    }

    pub fn candidate_mut(&mut self, candidate_id: &str) -> Option<&mut CandidateRecord> {
        self.candidates
            .iter_mut()
            .find(|c| c.profile.candidate_id == candidate_id)
    }

    /// Candidates that cleared the shortlist, in stored order.
    pub fn shortlisted(&self) -> impl Iterator<Item = &CandidateRecord> {
        self.candidates.iter().filter(|c| c.shortlisted)
    }

    pub fn summary(&self) -> PipelineSummary {
        PipelineSummary {
            pipeline_id: self.pipeline_id.clone(),
            job_id: self.job_id.clone(),
            current_stage: self.current_stage,
            candidate_count: self.candidates.len(),
            shortlisted_count: self.shortlisted().count(),
            ranked_count: self.final_rankings.len(),
            error_count: self.errors.len(),
            warning_count: self.warnings.len(),
            gates_passed: self.decision_gates.iter().filter(|g| g.passed).count(),
            requires_human_review: self
                .agent_outcomes
                .iter()
                .any(|o| o.requires_human_review),
        }
    }
}

/// Side-effect-free projection of a pipeline's progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineSummary {
    pub pipeline_id: String,
    pub job_id: String,
    pub current_stage: PipelineStage,
    pub candidate_count: usize,
    pub shortlisted_count: usize,
    pub ranked_count: usize,
    pub error_count: usize,
    pub warning_count: usize,
    pub gates_passed: usize,
    pub requires_human_review: bool,
}
