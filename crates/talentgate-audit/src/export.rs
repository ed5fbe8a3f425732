//! Compliance export: the per-pipeline summary handed to auditors.
//!
//! Counts are derived entirely from ledger entries, so the export can be
//! rebuilt at any time from the same rows it summarizes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use talentgate_contracts::audit::{AuditEntry, AuditEventType};

/// Summary of one pipeline's audit record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceExport {
    pub pipeline_id: String,
    pub generated_at: DateTime<Utc>,
    pub total_entries: usize,
    pub decisions: usize,
    pub gates_passed: usize,
    pub gates_failed: usize,
    pub review_requests: usize,
    pub bias_findings: usize,
    /// Entries still carrying the review flag.
    pub pending_review: usize,
}

impl ComplianceExport {
    /// Summarize entries already filtered to one pipeline.
    pub fn from_entries(pipeline_id: &str, entries: &[AuditEntry]) -> Self {
        let mut export = Self {
            pipeline_id: pipeline_id.to_string(),
            generated_at: Utc::now(),
            total_entries: entries.len(),
            decisions: 0,
            gates_passed: 0,
            gates_failed: 0,
            review_requests: 0,
            bias_findings: 0,
            pending_review: 0,
        };

        for entry in entries {
            match entry.event_type {
                AuditEventType::Decision => export.decisions += 1,
                AuditEventType::DecisionGate => match entry.outcome.as_deref() {
                    Some("passed") => export.gates_passed += 1,
                    _ => export.gates_failed += 1,
                },
                AuditEventType::ReviewRequest => export.review_requests += 1,
                AuditEventType::BiasFinding => export.bias_findings += 1,
                AuditEventType::Generic => {}
            }
            if entry.requires_review {
                export.pending_review += 1;
            }
        }

        export
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use serde_json::json;

    use talentgate_contracts::audit::AuditEntry;
    use talentgate_contracts::gate::GateEvaluation;
    use talentgate_contracts::governance::{Finding, Severity};

    use super::ComplianceExport;

    #[test]
    fn counts_every_event_family() {
        let gate_pass = GateEvaluation {
            gate_name: "shortlist".to_string(),
            measured: 0.9,
            threshold: 0.7,
            margin: 0.1,
            passed: true,
            borderline: false,
            explanation: String::new(),
            evaluated_at: Utc::now(),
        };
        let gate_fail = GateEvaluation {
            measured: 0.65,
            passed: false,
            borderline: true,
            ..gate_pass.clone()
        };
        let finding = Finding {
            category: "jd_language".to_string(),
            severity: Severity::Medium,
            description: "gendered term".to_string(),
            affected: vec!["all".to_string()],
        };

        let entries = vec![
            AuditEntry::decision("Matcher", "matched", 0.9, "ok"),
            AuditEntry::decision("Ranker", "ranked", 0.5, "weak"),
            AuditEntry::decision_gate(&gate_pass),
            AuditEntry::decision_gate(&gate_fail),
            AuditEntry::review_request("low confidence", json!({})),
            AuditEntry::bias_finding(&finding),
            AuditEntry::generic("pipeline_created", json!({})),
        ];

        let export = ComplianceExport::from_entries("p1", &entries);
        assert_eq!(export.total_entries, 7);
        assert_eq!(export.decisions, 2);
        assert_eq!(export.gates_passed, 1);
        assert_eq!(export.gates_failed, 1);
        assert_eq!(export.review_requests, 1);
        assert_eq!(export.bias_findings, 1);
        // The 0.5 decision, the failing (borderline) gate, and the review
        // request all carry the flag.
        assert_eq!(export.pending_review, 3);
    }

    #[test]
    fn empty_ledger_exports_zeroes() {
        let export = ComplianceExport::from_entries("p1", &[]);
        assert_eq!(export.total_entries, 0);
        assert_eq!(export.pending_review, 0);
    }
}
