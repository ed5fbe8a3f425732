//! In-memory implementation of `AuditSink`.
//!
//! `MemoryLedger` is the reference ledger: all entries in a `Vec` behind a
//! `Mutex`, safe to share across threads while stages append concurrently.
//! Entries are write-once and the ledger never reorders — `entries()`
//! always returns insertion order.

use std::sync::Mutex;

use tracing::debug;

use talentgate_contracts::audit::{AuditEntry, AuditFilter};
use talentgate_contracts::error::{PipelineError, PipelineResult};
use talentgate_core::sink::AuditSink;

use crate::export::ComplianceExport;

/// An in-memory, append-only audit ledger.
#[derive(Default)]
pub struct MemoryLedger {
    entries: Mutex<Vec<AuditEntry>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Build the compliance summary for one pipeline.
    pub fn compliance_export(&self, pipeline_id: &str) -> ComplianceExport {
        ComplianceExport::from_entries(pipeline_id, &self.entries(&AuditFilter::for_pipeline(pipeline_id)))
    }
}

impl AuditSink for MemoryLedger {
    /// Append one entry.
    ///
    /// Returns `Err(AuditWriteFailed)` only if the internal mutex is
    /// poisoned, which cannot happen under normal operation.
    fn append(&self, entry: AuditEntry) -> PipelineResult<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| PipelineError::AuditWriteFailed {
                reason: format!("ledger lock poisoned: {e}"),
            })?;
        debug!(action = %entry.action, event_type = ?entry.event_type, "audit entry appended");
        entries.push(entry);
        Ok(())
    }

    fn entries(&self, filter: &AuditFilter) -> Vec<AuditEntry> {
        match self.entries.lock() {
            Ok(entries) => entries.iter().filter(|e| filter.matches(e)).cloned().collect(),
            Err(_) => vec![],
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use serde_json::json;

    use talentgate_contracts::audit::{AuditEntry, AuditEventType, AuditFilter};
    use talentgate_core::sink::AuditSink;

    use super::MemoryLedger;

    #[test]
    fn preserves_insertion_order() {
        let ledger = MemoryLedger::new();
        for i in 0..5 {
            ledger
                .append(AuditEntry::generic(format!("step_{i}"), json!({})))
                .unwrap();
        }

        let all = ledger.entries(&AuditFilter::default());
        assert_eq!(all.len(), 5);
        for (i, entry) in all.iter().enumerate() {
            assert_eq!(entry.action, format!("step_{i}"));
        }
    }

    #[test]
    fn filters_by_pipeline_and_type() {
        let ledger = MemoryLedger::new();
        ledger
            .append(AuditEntry::decision("Matcher", "matched", 0.9, "ok").with_pipeline("p1"))
            .unwrap();
        ledger
            .append(AuditEntry::decision("Ranker", "ranked", 0.9, "ok").with_pipeline("p2"))
            .unwrap();
        ledger
            .append(AuditEntry::review_request("low confidence", json!({})).with_pipeline("p1"))
            .unwrap();

        assert_eq!(ledger.entries(&AuditFilter::for_pipeline("p1")).len(), 2);
        assert_eq!(
            ledger
                .entries(&AuditFilter {
                    event_type: Some(AuditEventType::ReviewRequest),
                    ..AuditFilter::default()
                })
                .len(),
            1
        );
    }

    #[test]
    fn review_queue_returns_flagged_entries_only() {
        let ledger = MemoryLedger::new();
        ledger
            .append(AuditEntry::decision("Matcher", "matched", 0.9, "confident"))
            .unwrap();
        ledger
            .append(AuditEntry::decision("Matcher", "matched", 0.4, "uncertain"))
            .unwrap();
        ledger
            .append(AuditEntry::review_request("borderline gate", json!({})))
            .unwrap();

        let queue = ledger.review_queue();
        assert_eq!(queue.len(), 2);
        assert!(queue.iter().all(|e| e.requires_review));
    }
}
