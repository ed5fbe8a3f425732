//! Pipeline stage enumeration and ordering.
//!
//! The working stages form a fixed forward-only sequence. Three terminal
//! states are reachable from any stage: Completed, Failed, and
//! AwaitingHumanReview. The orchestrator never moves a pipeline backwards;
//! the only way to re-execute work is an explicit Retry of the same stage.

use serde::{Deserialize, Serialize};

/// The stages of the candidate evaluation pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Initialized,
    JdAnalysis,
    ResumeParsing,
    Matching,
    Shortlisting,
    TestGeneration,
    TestEvaluation,
    Ranking,
    BiasAudit,
    Completed,
    Failed,
    AwaitingHumanReview,
}

impl PipelineStage {
    /// The fixed forward order of working stages, ending in Completed.
    const ORDER: [PipelineStage; 10] = [
        PipelineStage::Initialized,
        PipelineStage::JdAnalysis,
        PipelineStage::ResumeParsing,
        PipelineStage::Matching,
        PipelineStage::Shortlisting,
        PipelineStage::TestGeneration,
        PipelineStage::TestEvaluation,
        PipelineStage::Ranking,
        PipelineStage::BiasAudit,
        PipelineStage::Completed,
    ];

    /// True for the three states that stop the execution loop.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            PipelineStage::Completed | PipelineStage::Failed | PipelineStage::AwaitingHumanReview
        )
    }

    /// Position within the fixed forward order, or `None` for the side
    /// terminals Failed and AwaitingHumanReview.
    pub fn order_index(self) -> Option<usize> {
        Self::ORDER.iter().position(|s| *s == self)
    }

    /// The stage that follows this one in the fixed order.
    ///
    /// Returns `None` for Completed and for the side terminals.
    pub fn next_working(self) -> Option<PipelineStage> {
        let idx = self.order_index()?;
        Self::ORDER.get(idx + 1).copied()
    }

    /// Stable snake_case label used in logs and audit entries.
    pub fn as_str(self) -> &'static str {
        match self {
            PipelineStage::Initialized => "initialized",
            PipelineStage::JdAnalysis => "jd_analysis",
            PipelineStage::ResumeParsing => "resume_parsing",
            PipelineStage::Matching => "matching",
            PipelineStage::Shortlisting => "shortlisting",
            PipelineStage::TestGeneration => "test_generation",
            PipelineStage::TestEvaluation => "test_evaluation",
            PipelineStage::Ranking => "ranking",
            PipelineStage::BiasAudit => "bias_audit",
            PipelineStage::Completed => "completed",
            PipelineStage::Failed => "failed",
            PipelineStage::AwaitingHumanReview => "awaiting_human_review",
        }
    }
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
