//! # talentgate-contracts
//!
//! Shared types, schemas, and contracts for the TALENTGATE pipeline.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate — only data definitions and error types.

pub mod audit;
pub mod candidate;
pub mod error;
pub mod evaluation;
pub mod gate;
pub mod governance;
pub mod job;
pub mod outcome;
pub mod scoring;
pub mod stage;
