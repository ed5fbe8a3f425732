//! # talentgate-agents
//!
//! The reference capability providers for the TALENTGATE pipeline.
//!
//! Each provider implements `AgentTask` with deterministic heuristics: good
//! enough to exercise the whole pipeline end to end and to be tested
//! exactly, while keeping the door open for LLM-backed replacements behind
//! the same trait.
//!
//! One capability per module, one responsibility per capability. The
//! matcher does not shortlist, the shortlister does not rank, and only the
//! bias auditor may veto.

pub mod bias_auditor;
pub mod jd_analyzer;
pub mod matcher;
pub mod ranker;
pub mod resume_parser;
pub mod shortlister;
pub mod test_evaluator;
pub mod test_generator;

pub use bias_auditor::BiasAuditor;
pub use jd_analyzer::JdAnalyzer;
pub use matcher::Matcher;
pub use ranker::Ranker;
pub use resume_parser::{ParseInput, ResumeParser};
pub use shortlister::Shortlister;
pub use test_evaluator::TestEvaluator;
pub use test_generator::TestGenerator;
