//! Evaluation-stage data: match reports, screening tests, scores, and the
//! final rankings, plus the typed inputs the orchestrator hands to each
//! capability provider.

use serde::{Deserialize, Serialize};

use crate::candidate::ParsedResume;
use crate::job::AnalyzedJob;
use crate::scoring::{RankingBlend, ScoringWeights};

// ── Matching ─────────────────────────────────────────────────────────────────

/// Input to the matcher: one candidate against the analyzed job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchInput {
    pub parsed: ParsedResume,
    pub job: AnalyzedJob,
    pub weights: ScoringWeights,
}

/// Result of matching a candidate against a job, with the component
/// breakdown kept for explainability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchReport {
    pub candidate_id: String,
    pub job_id: String,
    /// Weighted combination of the component scores, in [0.0, 1.0].
    pub overall_score: f64,
    pub skills_score: f64,
    pub experience_score: f64,
    pub education_score: f64,
    pub required_skills_met: usize,
    pub required_skills_total: usize,
    pub meets_experience: bool,
    pub strengths: Vec<String>,
    pub gaps: Vec<String>,
    pub explanation: String,
}

// ── Shortlisting ─────────────────────────────────────────────────────────────

/// Input to the shortlister: every match report plus the cut line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortlistInput {
    pub reports: Vec<MatchReport>,
    pub threshold: f64,
}

/// Candidates selected to continue past the shortlisting gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shortlist {
    pub selected: Vec<String>,
    pub threshold: f64,
}

// ── Screening tests ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestQuestion {
    pub question_id: String,
    pub topic: String,
    pub prompt: String,
    pub expected_answer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningTest {
    pub test_id: String,
    pub job_id: String,
    pub questions: Vec<TestQuestion>,
}

/// Input to the test generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestGenInput {
    pub job: AnalyzedJob,
    pub question_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestAnswer {
    pub question_id: String,
    pub answer: String,
}

/// One candidate's answers to a screening test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestSubmission {
    pub candidate_id: String,
    pub test: ScreeningTest,
    pub answers: Vec<TestAnswer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestScore {
    pub candidate_id: String,
    pub test_id: String,
    /// Fraction of questions answered correctly, in [0.0, 1.0].
    pub total_score: f64,
    pub correct: usize,
    pub attempted: usize,
    pub total: usize,
}

// ── Ranking ──────────────────────────────────────────────────────────────────

/// Input to the ranker: match reports and test scores for every candidate
/// still in contention, plus the composite blend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingInput {
    pub matches: Vec<MatchReport>,
    pub scores: Vec<TestScore>,
    pub blend: RankingBlend,
}

/// Recommendation labels, strongest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    StronglyRecommend,
    Recommend,
    Consider,
    NotRecommended,
}

/// Final ranking for one candidate after all evaluation stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRanking {
    pub candidate_id: String,
    pub job_id: String,
    /// 1-based position, best first.
    pub rank: usize,
    pub match_score: f64,
    pub test_score: f64,
    pub composite_score: f64,
    /// The blend applied, recorded for transparency.
    pub weights_used: RankingBlend,
    pub recommendation: Recommendation,
    pub confidence: f64,
    pub explanation: String,
}
