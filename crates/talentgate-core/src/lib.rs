//! # talentgate-core
//!
//! The execution substrate for TALENTGATE agents.
//!
//! This crate provides:
//! - The `AgentTask` trait (domain logic, typed input and output)
//! - The `AgentRunner` that wraps every invocation in the uniform
//!   outcome envelope, with confidence gating and error containment
//! - The `AgentRegistry` of installed capabilities
//! - The `AuditSink` trait the ledger implementations plug into
//!
//! ## Usage
//!
//! ```rust,ignore
//! use talentgate_core::{AgentRunner, AgentTask, AuditSink};
//! ```

pub mod registry;
pub mod runner;
pub mod sink;
pub mod task;

pub use registry::{AgentDescriptor, AgentRegistry};
pub use runner::AgentRunner;
pub use sink::AuditSink;
pub use task::AgentTask;
