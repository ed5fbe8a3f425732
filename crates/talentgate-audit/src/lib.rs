//! # talentgate-audit
//!
//! Append-only audit ledgers for the TALENTGATE runtime.
//!
//! Two `AuditSink` implementations:
//! - `MemoryLedger` — the reference in-memory ledger, used by the
//!   orchestrator and in tests
//! - `JsonlLedger` — one JSON object per line in an append-only file,
//!   with an in-memory mirror for queries and `replay()` for rebuilds
//!
//! Plus `ComplianceExport`, the per-pipeline summary handed to auditors.

pub mod export;
pub mod jsonl;
pub mod memory;

pub use export::ComplianceExport;
pub use jsonl::JsonlLedger;
pub use memory::MemoryLedger;
