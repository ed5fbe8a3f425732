//! Candidate-to-job matching.
//!
//! Single purpose: score one parsed resume against one analyzed job. The
//! component scores (skills, experience, education) are combined with the
//! policy weights and kept in the report for explainability. No
//! shortlisting decision happens here.

use tracing::debug;

use talentgate_contracts::error::PipelineResult;
use talentgate_contracts::evaluation::{MatchInput, MatchReport};
use talentgate_contracts::job::EducationLevel;
use talentgate_core::task::AgentTask;

/// Scores a candidate against a job with weighted components.
#[derive(Debug, Default)]
pub struct Matcher;

impl AgentTask for Matcher {
    type Input = MatchInput;
    type Output = MatchReport;

    fn kind(&self) -> &str {
        "Matcher"
    }

    fn description(&self) -> &str {
        "Scores parsed resumes against analyzed jobs with weighted skill, experience, and education components"
    }

    fn validate(&self, input: &MatchInput) -> PipelineResult<()> {
        input.weights.validate()
    }

    fn execute(&self, input: &MatchInput) -> PipelineResult<(MatchReport, f64, String)> {
        let candidate_skills: Vec<String> = input
            .parsed
            .skill_names()
            .iter()
            .map(|s| s.to_lowercase())
            .collect();

        let required: Vec<&str> = input.job.required_skill_names();
        let met: Vec<&str> = required
            .iter()
            .copied()
            .filter(|r| candidate_skills.iter().any(|c| c == r))
            .collect();
        let missing: Vec<&str> = required
            .iter()
            .copied()
            .filter(|r| !met.contains(r))
            .collect();

        let skills_score = if required.is_empty() {
            1.0
        } else {
            met.len() as f64 / required.len() as f64
        };

        let experience_score = if input.job.min_experience_months == 0 {
            1.0
        } else {
            (input.parsed.experience_months as f64 / input.job.min_experience_months as f64)
                .min(1.0)
        };
        let meets_experience = input.parsed.experience_months >= input.job.min_experience_months;

        let education_score = education_score(input.parsed.education, input.job.min_education);

        let overall_score = skills_score * input.weights.skills
            + experience_score * input.weights.experience
            + education_score * input.weights.education;

        let mut strengths = Vec::new();
        let mut gaps = Vec::new();
        for skill in &met {
            strengths.push(format!("has required skill '{skill}'"));
        }
        for skill in &missing {
            gaps.push(format!("missing required skill '{skill}'"));
        }
        if meets_experience && input.job.min_experience_months > 0 {
            strengths.push(format!(
                "{} months of experience meets the {}-month requirement",
                input.parsed.experience_months, input.job.min_experience_months
            ));
        } else if !meets_experience {
            gaps.push(format!(
                "{} months of experience below the {}-month requirement",
                input.parsed.experience_months, input.job.min_experience_months
            ));
        }
        if input.parsed.education < input.job.min_education {
            gaps.push(format!(
                "education {:?} below required {:?}",
                input.parsed.education, input.job.min_education
            ));
        }

        debug!(
            candidate_id = %input.parsed.candidate_id,
            job_id = %input.job.job_id,
            overall_score,
            "match scored"
        );

        let explanation = format!(
            "Candidate {} scored {:.2} against '{}': {}/{} required skills, \
             experience {:.2}, education {:.2}.",
            input.parsed.candidate_id,
            overall_score,
            input.job.title_normalized,
            met.len(),
            required.len(),
            experience_score,
            education_score
        );

        // Thin resumes make the component scores less trustworthy.
        let confidence = if input.parsed.quality_score < 0.5 { 0.7 } else { 0.85 };

        let report = MatchReport {
            candidate_id: input.parsed.candidate_id.clone(),
            job_id: input.job.job_id.clone(),
            overall_score,
            skills_score,
            experience_score,
            education_score,
            required_skills_met: met.len(),
            required_skills_total: required.len(),
            meets_experience,
            strengths,
            gaps,
            explanation: explanation.clone(),
        };

        Ok((report, confidence, explanation))
    }
}

/// 1.0 when the candidate meets or exceeds the requirement, otherwise the
/// fraction of ordinal levels attained.
fn education_score(candidate: EducationLevel, required: EducationLevel) -> f64 {
    if candidate >= required {
        return 1.0;
    }
    let rank = |level: EducationLevel| level as u8 as f64;
    if rank(required) == 0.0 {
        1.0
    } else {
        rank(candidate) / rank(required)
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use talentgate_contracts::candidate::{ExtractedSkill, ParsedResume};
    use talentgate_contracts::evaluation::MatchInput;
    use talentgate_contracts::job::{AnalyzedJob, EducationLevel, SkillRequirement};
    use talentgate_contracts::scoring::ScoringWeights;
    use talentgate_core::task::AgentTask;

    use super::Matcher;

    fn job() -> AnalyzedJob {
        AnalyzedJob {
            job_id: "job-1".to_string(),
            title_normalized: "backend engineer".to_string(),
            skills: vec![
                SkillRequirement { name: "rust".to_string(), required: true },
                SkillRequirement { name: "postgresql".to_string(), required: true },
                SkillRequirement { name: "kubernetes".to_string(), required: false },
            ],
            min_experience_months: 36,
            min_education: EducationLevel::Bachelors,
            technical_topics: vec!["rust".to_string(), "postgresql".to_string()],
            bias_flags: vec![],
            quality_score: 0.9,
        }
    }

    fn parsed(skills: &[&str], months: u32, education: EducationLevel) -> ParsedResume {
        ParsedResume {
            candidate_id: "c1".to_string(),
            skills: skills
                .iter()
                .map(|s| ExtractedSkill {
                    name: s.to_string(),
                    evidence: format!("worked with {s}"),
                })
                .collect(),
            experience_months: months,
            education,
            summary: "engineer".to_string(),
            quality_score: 0.8,
            warnings: vec![],
        }
    }

    fn input(parsed: ParsedResume) -> MatchInput {
        MatchInput {
            parsed,
            job: job(),
            weights: ScoringWeights::default(),
        }
    }

    #[test]
    fn full_coverage_scores_one() {
        let (report, confidence, _) = Matcher
            .execute(&input(parsed(&["rust", "postgresql"], 48, EducationLevel::Masters)))
            .unwrap();

        assert!((report.overall_score - 1.0).abs() < 1e-9);
        assert_eq!(report.required_skills_met, 2);
        assert!(report.meets_experience);
        assert!(report.gaps.is_empty());
        assert_eq!(confidence, 0.85);
    }

    #[test]
    fn components_are_weighted() {
        // Half the skills, half the experience, education met.
        let (report, _, _) = Matcher
            .execute(&input(parsed(&["rust"], 18, EducationLevel::Bachelors)))
            .unwrap();

        assert_eq!(report.skills_score, 0.5);
        assert_eq!(report.experience_score, 0.5);
        assert_eq!(report.education_score, 1.0);
        let expected = 0.5 * 0.4 + 0.5 * 0.35 + 1.0 * 0.25;
        assert!((report.overall_score - expected).abs() < 1e-9);
    }

    #[test]
    fn gaps_name_missing_requirements() {
        let (report, _, _) = Matcher
            .execute(&input(parsed(&["rust"], 12, EducationLevel::Associate)))
            .unwrap();

        assert!(report.gaps.iter().any(|g| g.contains("postgresql")));
        assert!(report.gaps.iter().any(|g| g.contains("12 months")));
        assert!(report.gaps.iter().any(|g| g.contains("Associate")));
        assert!(!report.meets_experience);
    }

    #[test]
    fn education_below_requirement_scores_fractionally() {
        let (report, _, _) = Matcher
            .execute(&input(parsed(&["rust"], 48, EducationLevel::Associate)))
            .unwrap();
        // Associate is 1 of Bachelors' 2 ordinal levels.
        assert_eq!(report.education_score, 0.5);
    }

    #[test]
    fn thin_resume_lowers_confidence() {
        let mut thin = parsed(&["rust"], 48, EducationLevel::Bachelors);
        thin.quality_score = 0.3;
        let (_, confidence, _) = Matcher.execute(&input(thin)).unwrap();
        assert_eq!(confidence, 0.7);
    }

    #[test]
    fn unbalanced_weights_fail_validation() {
        let mut bad = input(parsed(&["rust"], 48, EducationLevel::Bachelors));
        bad.weights.skills = 0.9;
        assert!(Matcher.validate(&bad).is_err());
    }
}
