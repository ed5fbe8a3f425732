//! Job-side domain types: the raw job profile and its analyzed form.

use serde::{Deserialize, Serialize};

/// Education levels, ordered from least to most advanced.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum EducationLevel {
    #[default]
    None,
    Associate,
    Bachelors,
    Masters,
    Doctorate,
}

/// A job opening as submitted to the pipeline.
///
/// Demographic requirements are deliberately absent — the pipeline evaluates
/// skills, experience, and education only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobProfile {
    pub job_id: String,
    pub title: String,
    /// Free-text description, scanned for biased language during analysis.
    pub description: String,
    pub required_skills: Vec<String>,
    pub preferred_skills: Vec<String>,
    pub min_experience_months: u32,
    pub min_education: EducationLevel,
}

/// A single skill requirement extracted from the job profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillRequirement {
    pub name: String,
    /// Required vs. merely preferred.
    pub required: bool,
}

/// The structured output of JD analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedJob {
    pub job_id: String,
    pub title_normalized: String,
    pub skills: Vec<SkillRequirement>,
    pub min_experience_months: u32,
    pub min_education: EducationLevel,
    /// Topics the test generator draws questions from.
    pub technical_topics: Vec<String>,
    /// Potentially biased phrases found in the description. Carried forward
    /// to the governance audit.
    pub bias_flags: Vec<String>,
    /// How well-formed the job profile is, in [0.0, 1.0].
    pub quality_score: f64,
}

impl AnalyzedJob {
    /// Names of the skills marked required.
    pub fn required_skill_names(&self) -> Vec<&str> {
        self.skills
            .iter()
            .filter(|s| s.required)
            .map(|s| s.name.as_str())
            .collect()
    }
}
