//! Final ranking.
//!
//! Single purpose: blend match and test scores into a composite, sort, and
//! attach a recommendation label plus a written explanation per candidate.
//! The blend comes from policy; the weights actually applied are recorded
//! on every ranking for transparency.

use tracing::debug;

use talentgate_contracts::error::{PipelineError, PipelineResult};
use talentgate_contracts::evaluation::{CandidateRanking, RankingInput, Recommendation};
use talentgate_core::task::AgentTask;

/// Produces the final candidate ranking.
#[derive(Debug, Default)]
pub struct Ranker;

fn recommendation_for(composite: f64) -> Recommendation {
    if composite >= 0.85 {
        Recommendation::StronglyRecommend
    } else if composite >= 0.7 {
        Recommendation::Recommend
    } else if composite >= 0.5 {
        Recommendation::Consider
    } else {
        Recommendation::NotRecommended
    }
}

impl AgentTask for Ranker {
    type Input = RankingInput;
    type Output = Vec<CandidateRanking>;

    fn kind(&self) -> &str {
        "Ranker"
    }

    fn description(&self) -> &str {
        "Blends match and test scores into a composite and orders candidates"
    }

    fn validate(&self, input: &RankingInput) -> PipelineResult<()> {
        input.blend.validate()?;
        if input.matches.is_empty() {
            return Err(PipelineError::InvalidInput {
                reason: "no match reports to rank".to_string(),
            });
        }
        Ok(())
    }

    fn execute(&self, input: &RankingInput) -> PipelineResult<(Vec<CandidateRanking>, f64, String)> {
        let mut scored: Vec<(f64, f64, f64, &str, &str, bool)> = Vec::new();
        for report in &input.matches {
            let test = input
                .scores
                .iter()
                .find(|s| s.candidate_id == report.candidate_id);
            let (test_score, has_test) = match test {
                Some(s) => (s.total_score, true),
                None => (0.0, false),
            };
            let composite = report.overall_score * input.blend.match_weight
                + test_score * input.blend.test_weight;
            scored.push((
                composite,
                report.overall_score,
                test_score,
                report.candidate_id.as_str(),
                report.job_id.as_str(),
                has_test,
            ));
        }

        // Best first; candidate id breaks ties so reruns agree.
        scored.sort_by(|a, b| {
            b.0.partial_cmp(&a.0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.3.cmp(b.3))
        });

        let missing_tests = scored.iter().filter(|s| !s.5).count();
        let rankings: Vec<CandidateRanking> = scored
            .iter()
            .enumerate()
            .map(|(i, (composite, match_score, test_score, candidate_id, job_id, has_test))| {
                let rank = i + 1;
                let recommendation = recommendation_for(*composite);
                let mut explanation = format!(
                    "Ranked #{rank} with composite {composite:.2} \
                     (match {match_score:.2}, test {test_score:.2})."
                );
                if !*has_test {
                    explanation.push_str(" No test score was recorded for this candidate.");
                }
                CandidateRanking {
                    candidate_id: candidate_id.to_string(),
                    job_id: job_id.to_string(),
                    rank,
                    match_score: *match_score,
                    test_score: *test_score,
                    composite_score: *composite,
                    weights_used: input.blend,
                    recommendation,
                    confidence: if *has_test { 0.9 } else { 0.7 },
                    explanation,
                }
            })
            .collect();

        debug!(
            ranked = rankings.len(),
            missing_tests,
            "candidates ranked"
        );

        let confidence = if missing_tests == 0 { 0.9 } else { 0.65 };
        let explanation = format!(
            "Ranked {} candidates by composite score ({:.0}% match, {:.0}% test); {} lacked test scores.",
            rankings.len(),
            input.blend.match_weight * 100.0,
            input.blend.test_weight * 100.0,
            missing_tests
        );

        Ok((rankings, confidence, explanation))
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use talentgate_contracts::evaluation::{MatchReport, RankingInput, Recommendation, TestScore};
    use talentgate_contracts::scoring::RankingBlend;
    use talentgate_core::task::AgentTask;

    use super::Ranker;

    fn report(candidate_id: &str, score: f64) -> MatchReport {
        MatchReport {
            candidate_id: candidate_id.to_string(),
            job_id: "job-1".to_string(),
            overall_score: score,
            skills_score: score,
            experience_score: score,
            education_score: score,
            required_skills_met: 1,
            required_skills_total: 1,
            meets_experience: true,
            strengths: vec![],
            gaps: vec![],
            explanation: "scored against the job requirements".to_string(),
        }
    }

    fn test_score(candidate_id: &str, score: f64) -> TestScore {
        TestScore {
            candidate_id: candidate_id.to_string(),
            test_id: "test-job-1".to_string(),
            total_score: score,
            correct: (score * 5.0) as usize,
            attempted: 5,
            total: 5,
        }
    }

    #[test]
    fn composite_orders_candidates() {
        let input = RankingInput {
            matches: vec![report("c1", 0.9), report("c2", 0.6)],
            scores: vec![test_score("c1", 0.8), test_score("c2", 1.0)],
            blend: RankingBlend::default(),
        };
        let (rankings, confidence, _) = Ranker.execute(&input).unwrap();

        // c1: 0.9*0.6 + 0.8*0.4 = 0.86; c2: 0.6*0.6 + 1.0*0.4 = 0.76
        assert_eq!(rankings[0].candidate_id, "c1");
        assert_eq!(rankings[0].rank, 1);
        assert!((rankings[0].composite_score - 0.86).abs() < 1e-9);
        assert_eq!(rankings[0].recommendation, Recommendation::StronglyRecommend);
        assert_eq!(rankings[1].candidate_id, "c2");
        assert_eq!(rankings[1].recommendation, Recommendation::Recommend);
        assert_eq!(confidence, 0.9);
    }

    #[test]
    fn missing_test_score_counts_as_zero_and_lowers_confidence() {
        let input = RankingInput {
            matches: vec![report("c1", 0.9), report("c2", 0.9)],
            scores: vec![test_score("c1", 0.9)],
            blend: RankingBlend::default(),
        };
        let (rankings, confidence, _) = Ranker.execute(&input).unwrap();

        let c2 = rankings.iter().find(|r| r.candidate_id == "c2").unwrap();
        assert_eq!(c2.test_score, 0.0);
        assert_eq!(c2.rank, 2);
        assert_eq!(c2.confidence, 0.7);
        assert!(c2.explanation.contains("No test score"));
        assert_eq!(confidence, 0.65);
    }

    #[test]
    fn explanations_are_substantive() {
        let input = RankingInput {
            matches: vec![report("c1", 0.4)],
            scores: vec![test_score("c1", 0.2)],
            blend: RankingBlend::default(),
        };
        let (rankings, _, _) = Ranker.execute(&input).unwrap();
        assert!(rankings[0].explanation.len() >= 20);
        assert_eq!(rankings[0].recommendation, Recommendation::NotRecommended);
    }

    #[test]
    fn weights_used_are_recorded() {
        let blend = RankingBlend { match_weight: 0.5, test_weight: 0.5 };
        let input = RankingInput {
            matches: vec![report("c1", 0.8)],
            scores: vec![test_score("c1", 0.6)],
            blend,
        };
        let (rankings, _, _) = Ranker.execute(&input).unwrap();
        assert_eq!(rankings[0].weights_used, blend);
        assert!((rankings[0].composite_score - 0.7).abs() < 1e-9);
    }

    #[test]
    fn empty_matches_are_rejected() {
        let input = RankingInput {
            matches: vec![],
            scores: vec![],
            blend: RankingBlend::default(),
        };
        assert!(Ranker.validate(&input).is_err());
    }
}
