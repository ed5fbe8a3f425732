//! The governance audit.
//!
//! The bias auditor reviews the whole pipeline rather than one candidate:
//! JD language, decision-gate consistency, score distribution, and
//! explanation quality. It is the only capability with veto power — the
//! orchestrator refuses to complete a pipeline whose audit did not pass.
//!
//! Compliance work runs under the strictest confidence threshold in the
//! suite.

use tracing::{debug, warn};

use talentgate_contracts::error::PipelineResult;
use talentgate_contracts::governance::{Finding, GovernanceInput, GovernanceReport, Severity};
use talentgate_core::task::AgentTask;

/// Fairness floor for the audit to pass.
const FAIRNESS_PASS_THRESHOLD: f64 = 0.7;

/// Borderline gates above this share of all gates indicate threshold
/// miscalibration.
const BORDERLINE_RATE_LIMIT: f64 = 0.3;

/// Composite-score ranges below this width over a large field suggest the
/// evaluation failed to differentiate candidates.
const CLUSTERING_RANGE: f64 = 0.1;
const CLUSTERING_MIN_CANDIDATES: usize = 5;

/// Rankings need at least this much written justification.
const MIN_EXPLANATION_CHARS: usize = 20;

/// Audits the pipeline for fairness issues; holds veto power.
#[derive(Debug, Default)]
pub struct BiasAuditor;

impl AgentTask for BiasAuditor {
    type Input = GovernanceInput;
    type Output = GovernanceReport;

    fn kind(&self) -> &str {
        "BiasAuditor"
    }

    fn description(&self) -> &str {
        "Audits pipeline decisions for bias and fairness; can veto completion"
    }

    // Compliance requires high confidence.
    fn confidence_threshold(&self) -> f64 {
        0.9
    }

    fn execute(&self, input: &GovernanceInput) -> PipelineResult<(GovernanceReport, f64, String)> {
        let mut findings = Vec::new();
        let mut recommendations = Vec::new();

        // Check 1: biased language in the job description.
        if !input.jd_bias_flags.is_empty() {
            findings.push(Finding {
                category: "jd_language_bias".to_string(),
                severity: Severity::Medium,
                description: format!(
                    "job description contains potentially biased language: {}",
                    input.jd_bias_flags.join("; ")
                ),
                affected: vec!["all".to_string()],
            });
            recommendations.push("Review and revise job description language".to_string());
        }

        // Check 2: decision-gate consistency.
        let borderline: Vec<&str> = input
            .gates
            .iter()
            .filter(|g| g.borderline)
            .map(|g| g.gate_name.as_str())
            .collect();
        if !input.gates.is_empty()
            && borderline.len() as f64 > input.gates.len() as f64 * BORDERLINE_RATE_LIMIT
        {
            warn!(
                borderline = borderline.len(),
                total = input.gates.len(),
                "high borderline gate rate"
            );
            findings.push(Finding {
                category: "threshold_calibration".to_string(),
                severity: Severity::High,
                description: format!(
                    "{} of {} decision gates were borderline; thresholds may need adjustment",
                    borderline.len(),
                    input.gates.len()
                ),
                affected: borderline.iter().map(|g| g.to_string()).collect(),
            });
            recommendations.push("Review threshold settings and borderline decisions".to_string());
        }

        // Check 3: score distribution anomalies.
        if input.rankings.len() > CLUSTERING_MIN_CANDIDATES {
            let scores: Vec<f64> = input.rankings.iter().map(|r| r.composite_score).collect();
            let max = scores.iter().cloned().fold(f64::MIN, f64::max);
            let min = scores.iter().cloned().fold(f64::MAX, f64::min);
            let range = max - min;
            if range < CLUSTERING_RANGE {
                findings.push(Finding {
                    category: "score_clustering".to_string(),
                    severity: Severity::Low,
                    description: format!(
                        "composite scores clustered in a {range:.2}-wide range; evaluation may not differentiate candidates"
                    ),
                    affected: vec!["all_ranked".to_string()],
                });
            }
        }

        // Check 4: explanation quality.
        let unexplained: Vec<String> = input
            .rankings
            .iter()
            .filter(|r| r.explanation.trim().len() < MIN_EXPLANATION_CHARS)
            .map(|r| r.candidate_id.clone())
            .collect();
        if !unexplained.is_empty() {
            findings.push(Finding {
                category: "explanation_quality".to_string(),
                severity: Severity::Medium,
                description: format!("{} rankings lack adequate explanation", unexplained.len()),
                affected: unexplained,
            });
            recommendations
                .push("Ensure all decisions have clear, documented explanations".to_string());
        }

        let penalty: f64 = findings.iter().map(|f| f.severity.weight()).sum();
        let fairness_score = (1.0 - penalty).max(0.0);

        let has_high = findings.iter().any(|f| f.severity == Severity::High);
        let audit_passed = fairness_score >= FAIRNESS_PASS_THRESHOLD && !has_high;

        let high = findings.iter().filter(|f| f.severity == Severity::High).count();
        let medium = findings.iter().filter(|f| f.severity == Severity::Medium).count();
        let low = findings.iter().filter(|f| f.severity == Severity::Low).count();
        let compliance_notes = vec![
            format!("audit completed at pipeline stage: {}", input.stage),
            format!("total candidates processed: {}", input.candidate_count),
            format!(
                "total findings: {} (high: {high}, medium: {medium}, low: {low})",
                findings.len()
            ),
        ];

        debug!(
            audit_passed,
            fairness_score,
            findings = findings.len(),
            "bias audit finished"
        );

        let report = GovernanceReport {
            audit_passed,
            fairness_score,
            findings,
            recommendations,
            compliance_notes,
            requires_human_review: !audit_passed || has_high,
        };

        let explanation = format!(
            "Bias audit {}. Fairness score {:.0}%. {} findings, {} recommendations.",
            if audit_passed { "passed" } else { "requires review" },
            fairness_score * 100.0,
            report.findings.len(),
            report.recommendations.len()
        );

        Ok((report, 0.9, explanation))
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use talentgate_contracts::evaluation::{CandidateRanking, Recommendation};
    use talentgate_contracts::gate::GateEvaluation;
    use talentgate_contracts::governance::{GovernanceInput, Severity};
    use talentgate_contracts::scoring::RankingBlend;
    use talentgate_contracts::stage::PipelineStage;
    use talentgate_core::task::AgentTask;

    use super::BiasAuditor;

    fn gate(name: &str, borderline: bool) -> GateEvaluation {
        GateEvaluation {
            gate_name: name.to_string(),
            measured: if borderline { 0.72 } else { 0.95 },
            threshold: 0.7,
            margin: 0.1,
            passed: true,
            borderline,
            explanation: "gate over the mean match score".to_string(),
            evaluated_at: Utc::now(),
        }
    }

    fn ranking(candidate_id: &str, composite: f64, explanation: &str) -> CandidateRanking {
        CandidateRanking {
            candidate_id: candidate_id.to_string(),
            job_id: "job-1".to_string(),
            rank: 1,
            match_score: composite,
            test_score: composite,
            composite_score: composite,
            weights_used: RankingBlend::default(),
            recommendation: Recommendation::Recommend,
            confidence: 0.9,
            explanation: explanation.to_string(),
        }
    }

    fn clean_input() -> GovernanceInput {
        GovernanceInput {
            jd_bias_flags: vec![],
            gates: vec![gate("shortlist", false)],
            rankings: vec![
                ranking("c1", 0.9, "Ranked #1 with composite 0.90 (match 0.90, test 0.90)."),
                ranking("c2", 0.6, "Ranked #2 with composite 0.60 (match 0.60, test 0.60)."),
            ],
            candidate_count: 2,
            stage: PipelineStage::BiasAudit,
        }
    }

    #[test]
    fn clean_pipeline_passes_with_full_fairness() {
        let (report, confidence, explanation) = BiasAuditor.execute(&clean_input()).unwrap();

        assert!(report.audit_passed);
        assert_eq!(report.fairness_score, 1.0);
        assert!(report.findings.is_empty());
        assert!(!report.requires_human_review);
        assert_eq!(confidence, 0.9);
        assert!(explanation.contains("passed"));
        assert_eq!(report.compliance_notes.len(), 3);
    }

    #[test]
    fn high_borderline_rate_is_a_high_severity_veto() {
        let mut input = clean_input();
        input.gates = (0..10)
            .map(|i| gate(&format!("gate_{i}"), i < 4))
            .collect();

        let (report, _, _) = BiasAuditor.execute(&input).unwrap();

        let finding = report
            .findings
            .iter()
            .find(|f| f.category == "threshold_calibration")
            .unwrap();
        assert_eq!(finding.severity, Severity::High);
        assert_eq!(finding.affected.len(), 4);
        assert!(!report.audit_passed);
        assert!(report.requires_human_review);
    }

    /// Exactly 30% borderline does not trip the check; the rate must exceed it.
    #[test]
    fn borderline_rate_at_limit_is_tolerated() {
        let mut input = clean_input();
        input.gates = (0..10)
            .map(|i| gate(&format!("gate_{i}"), i < 3))
            .collect();

        let (report, _, _) = BiasAuditor.execute(&input).unwrap();
        assert!(report.audit_passed);
    }

    #[test]
    fn jd_flags_and_short_explanations_accumulate() {
        let mut input = clean_input();
        input.jd_bias_flags = vec!["potentially gendered term: 'ninja'".to_string()];
        input.rankings.push(ranking("c3", 0.5, "ok"));

        let (report, _, _) = BiasAuditor.execute(&input).unwrap();

        // Two medium findings: 1.0 - 0.15 - 0.15 = 0.7, still passing.
        assert_eq!(report.findings.len(), 2);
        assert!((report.fairness_score - 0.7).abs() < 1e-9);
        assert!(report.audit_passed);
        assert_eq!(report.recommendations.len(), 2);

        let quality = report
            .findings
            .iter()
            .find(|f| f.category == "explanation_quality")
            .unwrap();
        assert_eq!(quality.affected, vec!["c3"]);
    }

    #[test]
    fn clustered_scores_over_a_large_field_are_flagged_low() {
        let mut input = clean_input();
        input.rankings = (0..6)
            .map(|i| {
                ranking(
                    &format!("c{i}"),
                    0.80 + 0.01 * i as f64,
                    "Ranked with a composite in the clustered band.",
                )
            })
            .collect();
        input.candidate_count = 6;

        let (report, _, _) = BiasAuditor.execute(&input).unwrap();

        let finding = report
            .findings
            .iter()
            .find(|f| f.category == "score_clustering")
            .unwrap();
        assert_eq!(finding.severity, Severity::Low);
        assert!((report.fairness_score - 0.95).abs() < 1e-9);
        assert!(report.audit_passed);
    }

    #[test]
    fn fairness_floor_fails_audit_without_high_findings() {
        // Three medium findings: 1.0 - 0.45 = 0.55 < 0.7 → fail, no High.
        let mut input = clean_input();
        input.jd_bias_flags = vec!["flag".to_string()];
        input.rankings = vec![
            ranking("c1", 0.9, "ok"),
            ranking("c2", 0.1, "Ranked last with a low composite score overall."),
        ];
        // jd flag (medium) + explanation quality (medium) = 0.70 exactly;
        // push below the floor with a clustered large field.
        input.rankings = (0..6).map(|i| ranking(&format!("c{i}"), 0.5, "no")).collect();

        let (report, _, _) = BiasAuditor.execute(&input).unwrap();

        assert!(report
            .findings
            .iter()
            .all(|f| f.severity != Severity::High));
        assert!(report.fairness_score < 0.7);
        assert!(!report.audit_passed);
        assert!(report.requires_human_review);
    }

    #[test]
    fn threshold_is_the_strictest_in_the_suite() {
        assert_eq!(BiasAuditor.confidence_threshold(), 0.9);
    }
}
