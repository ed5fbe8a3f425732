//! Resume parsing.
//!
//! Single purpose: extract structure from raw resume text — skills against
//! the job lexicon, experience duration, education level. No scoring, no
//! comparison to the job beyond the lexicon lookup.
//!
//! Runs under a lower confidence threshold than the default: parsing
//! tolerates ambiguity that a decision-making capability would not.

use tracing::debug;

use talentgate_contracts::candidate::{ExtractedSkill, ParsedResume, ResumeSource};
use talentgate_contracts::error::{PipelineError, PipelineResult};
use talentgate_contracts::job::EducationLevel;
use talentgate_core::task::AgentTask;

/// Input to the parser: the resume plus the skill lexicon the analyzed job
/// established.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseInput {
    pub source: ResumeSource,
    /// Lowercased skill names to look for.
    pub lexicon: Vec<String>,
}

/// Extracts structured data from candidate resumes.
#[derive(Debug, Default)]
pub struct ResumeParser;

impl AgentTask for ResumeParser {
    type Input = ParseInput;
    type Output = ParsedResume;

    fn kind(&self) -> &str {
        "ResumeParser"
    }

    fn description(&self) -> &str {
        "Parses raw resumes into structured skills, experience, and education"
    }

    // Parsing can absorb more ambiguity than a decision-making capability.
    fn confidence_threshold(&self) -> f64 {
        0.6
    }

    fn validate(&self, input: &ParseInput) -> PipelineResult<()> {
        if input.source.candidate_id.trim().is_empty() {
            return Err(PipelineError::InvalidInput {
                reason: "candidate_id must not be blank".to_string(),
            });
        }
        if input.source.resume_text.trim().is_empty() {
            return Err(PipelineError::InvalidInput {
                reason: "resume text must not be empty".to_string(),
            });
        }
        Ok(())
    }

    fn execute(&self, input: &ParseInput) -> PipelineResult<(ParsedResume, f64, String)> {
        let text = &input.source.resume_text;
        let lower = text.to_lowercase();

        let skills = extract_skills(text, &input.lexicon);
        let experience_months = extract_experience_months(&lower);
        let education = extract_education(&lower);

        debug!(
            candidate_id = %input.source.candidate_id,
            skills = skills.len(),
            experience_months,
            "resume parsed"
        );

        let mut warnings = Vec::new();
        if skills.is_empty() {
            warnings.push("no lexicon skills found in resume".to_string());
        }
        if experience_months == 0 {
            warnings.push("no experience duration found in resume".to_string());
        }

        let mut quality_score: f64 = 0.4;
        if text.len() >= 200 {
            quality_score += 0.2;
        }
        if !skills.is_empty() {
            quality_score += 0.2;
        }
        if experience_months > 0 {
            quality_score += 0.1;
        }
        if education != EducationLevel::None {
            quality_score += 0.1;
        }
        let quality_score = quality_score.clamp(0.0, 1.0);

        let summary = text
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .unwrap_or("")
            .chars()
            .take(120)
            .collect::<String>();

        let confidence = if skills.is_empty() { 0.62 } else { 0.85 };
        let explanation = format!(
            "Parsed resume for candidate {}: {} skills recognized, {} months of experience, education level {:?}.",
            input.source.candidate_id,
            skills.len(),
            experience_months,
            education
        );

        let parsed = ParsedResume {
            candidate_id: input.source.candidate_id.clone(),
            skills,
            experience_months,
            education,
            summary,
            quality_score,
            warnings,
        };

        Ok((parsed, confidence, explanation))
    }
}

/// Case-insensitive lexicon lookup; evidence is the first line mentioning
/// the skill.
fn extract_skills(text: &str, lexicon: &[String]) -> Vec<ExtractedSkill> {
    let mut skills = Vec::new();
    for name in lexicon {
        let needle = name.to_lowercase();
        if needle.is_empty() {
            continue;
        }
        let evidence = text
            .lines()
            .find(|line| line.to_lowercase().contains(&needle));
        if let Some(line) = evidence {
            skills.push(ExtractedSkill {
                name: needle,
                evidence: line.trim().to_string(),
            });
        }
    }
    skills
}

/// Find the largest "<n> years" / "<n> months" mention.
///
/// Resumes state totals and per-role durations; the largest figure is the
/// closest thing to a total without entity resolution.
fn extract_experience_months(lower: &str) -> u32 {
    let mut months: u32 = 0;
    let tokens: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect();
    for pair in tokens.windows(2) {
        if let Ok(n) = pair[0].parse::<u32>() {
            let unit = pair[1];
            if unit == "year" || unit == "years" {
                months = months.max(n.saturating_mul(12));
            } else if unit == "month" || unit == "months" {
                months = months.max(n);
            }
        }
    }
    months
}

/// Highest education level mentioned anywhere in the text.
fn extract_education(lower: &str) -> EducationLevel {
    if lower.contains("phd") || lower.contains("doctorate") {
        EducationLevel::Doctorate
    } else if lower.contains("master") || lower.contains("msc") {
        EducationLevel::Masters
    } else if lower.contains("bachelor") || lower.contains("bsc") {
        EducationLevel::Bachelors
    } else if lower.contains("associate") {
        EducationLevel::Associate
    } else {
        EducationLevel::None
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
