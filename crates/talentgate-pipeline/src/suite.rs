//! The agent suite: one boxed task per pipeline stage.
//!
//! The orchestrator executes whatever suite it is given, which is the seam
//! tests and LLM-backed deployments replace providers through. The
//! reference suite wires in the deterministic heuristics from
//! `talentgate-agents`.

use talentgate_agents::{
    BiasAuditor, JdAnalyzer, Matcher, ParseInput, Ranker, ResumeParser, Shortlister,
    TestEvaluator, TestGenerator,
};
use talentgate_contracts::candidate::ParsedResume;
use talentgate_contracts::evaluation::{
    CandidateRanking, MatchInput, MatchReport, RankingInput, ScreeningTest, Shortlist,
    ShortlistInput, TestGenInput, TestScore, TestSubmission,
};
use talentgate_contracts::governance::{GovernanceInput, GovernanceReport};
use talentgate_contracts::job::{AnalyzedJob, JobProfile};
use talentgate_core::task::AgentTask;

pub type BoxedTask<I, O> = Box<dyn AgentTask<Input = I, Output = O>>;

/// The full set of capability providers one orchestrator drives.
pub struct AgentSuite {
    pub jd_analyzer: BoxedTask<JobProfile, AnalyzedJob>,
    pub resume_parser: BoxedTask<ParseInput, ParsedResume>,
    pub matcher: BoxedTask<MatchInput, MatchReport>,
    pub shortlister: BoxedTask<ShortlistInput, Shortlist>,
    pub test_generator: BoxedTask<TestGenInput, ScreeningTest>,
    pub test_evaluator: BoxedTask<TestSubmission, TestScore>,
    pub ranker: BoxedTask<RankingInput, Vec<CandidateRanking>>,
    pub bias_auditor: BoxedTask<GovernanceInput, GovernanceReport>,
}

impl AgentSuite {
    /// The deterministic reference providers.
    pub fn reference() -> Self {
        Self {
            jd_analyzer: Box::new(JdAnalyzer),
            resume_parser: Box::new(ResumeParser),
            matcher: Box::new(Matcher),
            shortlister: Box::new(Shortlister),
            test_generator: Box::new(TestGenerator),
            test_evaluator: Box::new(TestEvaluator),
            ranker: Box::new(Ranker),
            bias_auditor: Box::new(BiasAuditor),
        }
    }
}

impl Default for AgentSuite {
    fn default() -> Self {
        Self::reference()
    }
}
