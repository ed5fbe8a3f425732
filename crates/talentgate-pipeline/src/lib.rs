//! # talentgate-pipeline
//!
//! The orchestration layer: pipeline state, decision gates, and the
//! `Orchestrator` that drives candidates through the fixed stage sequence
//! under policy control, recording every decision in the audit ledger.
//!
//! The orchestrator coordinates; it never evaluates. Scoring lives in the
//! agent tasks, vetoes with the bias auditor, and every tunable in the
//! pipeline policy.

pub mod gate;
pub mod orchestrator;
pub mod state;
pub mod suite;

pub use gate::evaluate_gate;
pub use orchestrator::{CancellationToken, Orchestrator, StageDecision};
pub use state::{CandidateRecord, PipelineState, PipelineSummary};
pub use suite::AgentSuite;
