//! Job description analysis.
//!
//! Single purpose: turn a raw `JobProfile` into an `AnalyzedJob` — skill
//! requirements, topics for test generation, and bias flags over the
//! description text. This capability does not look at candidates.

use tracing::debug;

use talentgate_contracts::error::{PipelineError, PipelineResult};
use talentgate_contracts::job::{AnalyzedJob, JobProfile, SkillRequirement};
use talentgate_core::task::AgentTask;

/// Phrases treated as gendered language in a job description.
const GENDERED_TERMS: [&str; 5] = ["rockstar", "ninja", "guru", "manpower", "manning"];

/// Phrases treated as age-biased language.
const AGE_TERMS: [&str; 4] = ["young", "energetic", "digital native", "recent graduate only"];

/// Scan description text for biased language.
///
/// A plain substring check over curated term lists. A production
/// deployment would put a real bias model behind the same capability.
pub fn scan_for_bias(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    let mut flags = Vec::new();
    for term in GENDERED_TERMS {
        if lower.contains(term) {
            flags.push(format!("potentially gendered term: '{term}'"));
        }
    }
    for term in AGE_TERMS {
        if lower.contains(term) {
            flags.push(format!("potentially age-biased term: '{term}'"));
        }
    }
    flags
}

/// Analyzes job descriptions into structured requirements.
#[derive(Debug, Default)]
pub struct JdAnalyzer;

impl AgentTask for JdAnalyzer {
    type Input = JobProfile;
    type Output = AnalyzedJob;

    fn kind(&self) -> &str {
        "JdAnalyzer"
    }

    fn description(&self) -> &str {
        "Analyzes job descriptions: extracts skill requirements, topics for assessment, and bias flags"
    }

    fn validate(&self, input: &JobProfile) -> PipelineResult<()> {
        if input.job_id.trim().is_empty() {
            return Err(PipelineError::InvalidInput {
                reason: "job_id must not be blank".to_string(),
            });
        }
        if input.description.trim().is_empty() {
            return Err(PipelineError::InvalidInput {
                reason: "job description must not be empty".to_string(),
            });
        }
        Ok(())
    }

    fn execute(&self, input: &JobProfile) -> PipelineResult<(AnalyzedJob, f64, String)> {
        let bias_flags = scan_for_bias(&input.description);
        if !bias_flags.is_empty() {
            debug!(job_id = %input.job_id, flags = bias_flags.len(), "bias flags in job description");
        }

        let mut skills: Vec<SkillRequirement> = input
            .required_skills
            .iter()
            .map(|name| SkillRequirement {
                name: name.trim().to_lowercase(),
                required: true,
            })
            .collect();
        skills.extend(input.preferred_skills.iter().map(|name| SkillRequirement {
            name: name.trim().to_lowercase(),
            required: false,
        }));

        let technical_topics: Vec<String> = input
            .required_skills
            .iter()
            .map(|s| s.trim().to_lowercase())
            .collect();

        let mut quality_score: f64 = 0.5;
        if input.description.len() >= 100 {
            quality_score += 0.2;
        }
        if !input.required_skills.is_empty() {
            quality_score += 0.15;
        }
        if input.min_experience_months > 0 {
            quality_score += 0.15;
        }
        quality_score -= 0.1 * bias_flags.len() as f64;
        let quality_score = quality_score.clamp(0.0, 1.0);

        let analyzed = AnalyzedJob {
            job_id: input.job_id.clone(),
            title_normalized: input.title.trim().to_lowercase(),
            skills,
            min_experience_months: input.min_experience_months,
            min_education: input.min_education,
            technical_topics,
            bias_flags: bias_flags.clone(),
            quality_score,
        };

        let explanation = format!(
            "Analyzed job description for '{}'. Extracted {} skill requirements \
             ({} required), minimum experience {} months. Identified {} potential bias concerns.",
            input.title,
            analyzed.skills.len(),
            analyzed.required_skill_names().len(),
            input.min_experience_months,
            bias_flags.len()
        );

        Ok((analyzed, 0.9, explanation))
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use talentgate_contracts::job::{EducationLevel, JobProfile};
    use talentgate_core::task::AgentTask;

    use super::{scan_for_bias, JdAnalyzer};

    fn job(description: &str) -> JobProfile {
        JobProfile {
            job_id: "job-1".to_string(),
            title: "Backend Engineer".to_string(),
            description: description.to_string(),
            required_skills: vec!["Rust".to_string(), "PostgreSQL".to_string()],
            preferred_skills: vec!["Kubernetes".to_string()],
            min_experience_months: 36,
            min_education: EducationLevel::Bachelors,
        }
    }

    #[test]
    fn extracts_skills_and_topics() {
        let (analyzed, confidence, explanation) = JdAnalyzer
            .execute(&job("We build storage engines in Rust for large retail customers."))
            .unwrap();

        assert_eq!(analyzed.skills.len(), 3);
        assert_eq!(analyzed.required_skill_names(), vec!["rust", "postgresql"]);
        assert_eq!(analyzed.technical_topics, vec!["rust", "postgresql"]);
        assert_eq!(analyzed.title_normalized, "backend engineer");
        assert_eq!(confidence, 0.9);
        assert!(explanation.contains("Backend Engineer"));
        assert!(analyzed.bias_flags.is_empty());
    }

    #[test]
    fn flags_gendered_and_age_biased_terms() {
        let flags = scan_for_bias("We need a young Rust ninja with guru-level energy");
        assert_eq!(flags.len(), 3);
        assert!(flags.iter().any(|f| f.contains("ninja")));
        assert!(flags.iter().any(|f| f.contains("guru")));
        assert!(flags.iter().any(|f| f.contains("young")));
        assert!(flags.iter().any(|f| f.contains("age-biased")));
    }

    #[test]
    fn bias_flags_lower_quality_and_carry_through() {
        let clean = JdAnalyzer
            .execute(&job("A long, thorough, and neutral description of the role and the team, with plenty of detail about the stack."))
            .unwrap()
            .0;
        let flagged = JdAnalyzer
            .execute(&job("A long description seeking a rockstar ninja to join our energetic and young team, heavy on buzzwords."))
            .unwrap()
            .0;

        assert!(flagged.quality_score < clean.quality_score);
        assert_eq!(flagged.bias_flags.len(), 4);
    }

    #[test]
    fn rejects_blank_inputs() {
        let mut bad = job("fine description");
        bad.job_id = "  ".to_string();
        assert!(JdAnalyzer.validate(&bad).is_err());

        let mut bad = job("fine description");
        bad.description = String::new();
        assert!(JdAnalyzer.validate(&bad).is_err());
    }
}
