//! Decision gate evaluation.
//!
//! A gate is a pure threshold comparison, recorded with enough context to
//! audit later. Borderline results — within the margin of the threshold on
//! either side — are flagged so threshold calibration problems surface in
//! the governance audit.

use chrono::Utc;

use talentgate_contracts::gate::GateEvaluation;

/// Evaluate one decision gate.
///
/// `passed = measured >= threshold`; `borderline = |measured - threshold|
/// < margin`. A gate can pass and still be borderline.
pub fn evaluate_gate(name: &str, measured: f64, threshold: f64, margin: f64) -> GateEvaluation {
    let passed = measured >= threshold;
    let borderline = (measured - threshold).abs() < margin;

    let explanation = format!(
        "gate '{name}': measured {measured:.3} against threshold {threshold:.3} — {}{}",
        if passed { "passed" } else { "failed" },
        if borderline { " (borderline)" } else { "" }
    );

    GateEvaluation {
        gate_name: name.to_string(),
        measured,
        threshold,
        margin,
        passed,
        borderline,
        explanation,
        evaluated_at: Utc::now(),
    }
}
