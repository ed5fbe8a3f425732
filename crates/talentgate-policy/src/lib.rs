//! # talentgate-policy
//!
//! TOML-driven configuration for the TALENTGATE pipeline: thresholds,
//! scoring weights, escalation behavior, and execution limits.
//!
//! A `PipelinePolicy` is loaded once and injected into the orchestrator.
//! Every operator-facing tunable lives here; agents and the
//! orchestrator never hard-code a threshold.

pub mod policy;

pub use policy::{EscalationPolicy, GateFailureAction, PipelinePolicy, Thresholds};
