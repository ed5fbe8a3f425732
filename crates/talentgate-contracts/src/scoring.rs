//! Scoring weight sets shared between policy configuration and the agents
//! that apply them.

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, PipelineResult};

/// Weight sets must sum to 1.0 within this tolerance.
pub const WEIGHT_SUM_TOLERANCE: f64 = 0.01;

/// Component weights used by the matcher.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub skills: f64,
    pub experience: f64,
    pub education: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            skills: 0.4,
            experience: 0.35,
            education: 0.25,
        }
    }
}

impl ScoringWeights {
    /// Reject weight sets that do not sum to 1.0 ± tolerance.
    pub fn validate(&self) -> PipelineResult<()> {
        let total = self.skills + self.experience + self.education;
        if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(PipelineError::Config {
                reason: format!("scoring weights must sum to 1.0, got {total:.3}"),
            });
        }
        Ok(())
    }
}

/// Blend of resume match score and test score in the final composite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankingBlend {
    pub match_weight: f64,
    pub test_weight: f64,
}

impl Default for RankingBlend {
    fn default() -> Self {
        Self {
            match_weight: 0.6,
            test_weight: 0.4,
        }
    }
}

impl RankingBlend {
    pub fn validate(&self) -> PipelineResult<()> {
        let total = self.match_weight + self.test_weight;
        if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(PipelineError::Config {
                reason: format!("ranking blend weights must sum to 1.0, got {total:.3}"),
            });
        }
        Ok(())
    }
}
