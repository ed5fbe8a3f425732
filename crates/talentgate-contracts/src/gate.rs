//! Decision gate evaluation record.
//!
//! A gate compares a measured value against a threshold. Results within the
//! configured margin of the threshold are flagged borderline; the governance
//! agent watches the borderline rate for miscalibrated thresholds.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The outcome of one decision-gate evaluation, appended to the pipeline's
/// `decision_gates` log. Never rewritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateEvaluation {
    pub gate_name: String,
    pub measured: f64,
    pub threshold: f64,
    pub margin: f64,
    /// `measured >= threshold`.
    pub passed: bool,
    /// `|measured - threshold| < margin`.
    pub borderline: bool,
    pub explanation: String,
    pub evaluated_at: DateTime<Utc>,
}
