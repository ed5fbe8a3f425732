//! Shortlisting.
//!
//! Single purpose: apply the shortlist threshold to match reports. The cut
//! is mechanical; the decision-gate bookkeeping around it belongs to the
//! orchestrator.

use tracing::debug;

use talentgate_contracts::error::{PipelineError, PipelineResult};
use talentgate_contracts::evaluation::{Shortlist, ShortlistInput};
use talentgate_core::task::AgentTask;

/// Selects candidates at or above the shortlist threshold.
#[derive(Debug, Default)]
pub struct Shortlister;

impl AgentTask for Shortlister {
    type Input = ShortlistInput;
    type Output = Shortlist;

    fn kind(&self) -> &str {
        "Shortlister"
    }

    fn description(&self) -> &str {
        "Selects candidates whose match score clears the shortlist threshold"
    }

    fn validate(&self, input: &ShortlistInput) -> PipelineResult<()> {
        if !(0.0..=1.0).contains(&input.threshold) {
            return Err(PipelineError::InvalidInput {
                reason: format!("shortlist threshold must be in [0.0, 1.0], got {}", input.threshold),
            });
        }
        Ok(())
    }

    fn execute(&self, input: &ShortlistInput) -> PipelineResult<(Shortlist, f64, String)> {
        let mut passing: Vec<_> = input
            .reports
            .iter()
            .filter(|r| r.overall_score >= input.threshold)
            .collect();
        // Best first; candidate id breaks ties so reruns agree.
        passing.sort_by(|a, b| {
            b.overall_score
                .partial_cmp(&a.overall_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.candidate_id.cmp(&b.candidate_id))
        });

        let selected: Vec<String> = passing.iter().map(|r| r.candidate_id.clone()).collect();

        debug!(
            selected = selected.len(),
            total = input.reports.len(),
            threshold = input.threshold,
            "shortlist cut applied"
        );

        let explanation = format!(
            "Shortlisted {} of {} candidates at match-score threshold {:.2}.",
            selected.len(),
            input.reports.len(),
            input.threshold
        );

        let shortlist = Shortlist {
            selected,
            threshold: input.threshold,
        };

        // The cut itself is mechanical; confidence reflects only that the
        // inputs were complete.
        Ok((shortlist, 0.95, explanation))
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use talentgate_contracts::evaluation::{MatchReport, ShortlistInput};
    use talentgate_core::task::AgentTask;

    use super::Shortlister;

    fn report(candidate_id: &str, score: f64) -> MatchReport {
        MatchReport {
            candidate_id: candidate_id.to_string(),
            job_id: "job-1".to_string(),
            overall_score: score,
            skills_score: score,
            experience_score: score,
            education_score: score,
            required_skills_met: 1,
            required_skills_total: 2,
            meets_experience: true,
            strengths: vec![],
            gaps: vec![],
            explanation: "scored against the job requirements".to_string(),
        }
    }

    #[test]
    fn selects_at_or_above_threshold_best_first() {
        let input = ShortlistInput {
            reports: vec![report("c1", 0.65), report("c2", 0.7), report("c3", 0.9)],
            threshold: 0.7,
        };
        let (shortlist, _, explanation) = Shortlister.execute(&input).unwrap();

        // The comparison is inclusive: exactly at the threshold passes.
        assert_eq!(shortlist.selected, vec!["c3", "c2"]);
        assert!(explanation.contains("2 of 3"));
    }

    #[test]
    fn empty_shortlist_is_a_valid_result() {
        let input = ShortlistInput {
            reports: vec![report("c1", 0.2)],
            threshold: 0.7,
        };
        let (shortlist, _, _) = Shortlister.execute(&input).unwrap();
        assert!(shortlist.selected.is_empty());
    }

    #[test]
    fn ties_break_by_candidate_id() {
        let input = ShortlistInput {
            reports: vec![report("cb", 0.8), report("ca", 0.8)],
            threshold: 0.5,
        };
        let (shortlist, _, _) = Shortlister.execute(&input).unwrap();
        assert_eq!(shortlist.selected, vec!["ca", "cb"]);
    }

    #[test]
    fn out_of_range_threshold_is_rejected() {
        let input = ShortlistInput {
            reports: vec![],
            threshold: 1.5,
        };
        assert!(Shortlister.validate(&input).is_err());
    }
}
