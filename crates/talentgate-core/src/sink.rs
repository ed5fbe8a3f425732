//! The audit sink seam.
//!
//! Every component that records compliance events does so through this
//! trait. Implementations live in `talentgate-audit`; the orchestrator and
//! tests inject them as `Box<dyn AuditSink>` or behind an `Arc`.

use talentgate_contracts::audit::{AuditEntry, AuditFilter};
use talentgate_contracts::error::PipelineResult;

/// An append-only ledger of audit entries.
///
/// Implementations must be append-only: entries are never modified or
/// deleted, and `entries()` returns them in insertion order. A failed
/// `append` is fatal for the step that produced the entry — a decision that
/// cannot be audited cannot proceed.
pub trait AuditSink: Send + Sync {
    /// Append one entry to the ledger.
    fn append(&self, entry: AuditEntry) -> PipelineResult<()>;

    /// Read back entries matching `filter`, in insertion order.
    fn entries(&self, filter: &AuditFilter) -> Vec<AuditEntry>;

    /// Entries awaiting human review, in insertion order.
    fn review_queue(&self) -> Vec<AuditEntry> {
        self.entries(&AuditFilter {
            requires_review: Some(true),
            ..AuditFilter::default()
        })
    }
}
