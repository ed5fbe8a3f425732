//! Candidate-side domain types.
//!
//! Candidate records deliberately exclude demographic information. Contact
//! details are hashed at intake so downstream stages work with anonymized
//! identifiers only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::job::EducationLevel;

/// Basic candidate information as submitted to the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub candidate_id: String,
    /// Identifier safe to show in blind review, derived from the email hash.
    pub anonymized_id: String,
    /// SHA-256 of the normalized email address, hex encoded.
    pub email_hash: String,
    /// Raw resume text. Anything structured comes out of the parsing stage.
    pub resume_text: String,
    pub applied_at: DateTime<Utc>,
}

impl CandidateProfile {
    /// Build a profile, hashing the email for anonymized processing.
    pub fn new(
        candidate_id: impl Into<String>,
        email: &str,
        resume_text: impl Into<String>,
    ) -> Self {
        let email_hash = hash_email(email);
        let anonymized_id = format!("cand-{}", &email_hash[..8]);
        Self {
            candidate_id: candidate_id.into(),
            anonymized_id,
            email_hash,
            resume_text: resume_text.into(),
            applied_at: Utc::now(),
        }
    }
}

/// SHA-256 over the trimmed, lowercased email, hex encoded.
pub fn hash_email(email: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(email.trim().to_lowercase().as_bytes());
    hex::encode(hasher.finalize())
}

/// Input to the resume parsing stage, one per candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeSource {
    pub candidate_id: String,
    pub resume_text: String,
}

/// A skill extracted from a resume, with the line that evidences it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedSkill {
    pub name: String,
    pub evidence: String,
}

/// Structured representation of a parsed resume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedResume {
    pub candidate_id: String,
    pub skills: Vec<ExtractedSkill>,
    pub experience_months: u32,
    pub education: EducationLevel,
    pub summary: String,
    /// How well-structured the resume is, in [0.0, 1.0].
    pub quality_score: f64,
    pub warnings: Vec<String>,
}

impl ParsedResume {
    pub fn skill_names(&self) -> Vec<&str> {
        self.skills.iter().map(|s| s.name.as_str()).collect()
    }
}
