//! Maps a model score to a label, a confidence percentage and a risk tier.

use crate::error::DecisionError;
use crate::models::{ClassificationResult, Label, RiskTier};

/// Scores strictly above this are labelled pneumonia.
pub const POSITIVE_THRESHOLD: f64 = 0.5;
/// Confidence (percent) strictly above this is a high risk.
pub const HIGH_RISK_ABOVE: f64 = 85.0;
/// Confidence (percent) strictly above this is a medium risk.
pub const MEDIUM_RISK_ABOVE: f64 = 65.0;

/// Classify the single sigmoid output of the local model.
///
/// The probability is clamped to `[0, 1]` before use; the confidence is the
/// raw probability expressed as a percentage, whichever label wins.
pub fn classify_probability(p: f64) -> Result<ClassificationResult, DecisionError> {
    if !p.is_finite() {
        return Err(DecisionError::NotFinite(p));
    }
    let p = p.clamp(0.0, 1.0);
    let label = if p > POSITIVE_THRESHOLD {
        Label::Pneumonia
    } else {
        Label::Normal
    };

    Ok(ClassificationResult {
        label,
        confidence: p * 100.0,
    })
}

/// Interpret a verdict computed upstream by the inference service.
///
/// Any result string starting with "pneumonia" (case-insensitive) is positive.
pub fn from_remote(result: &str, confidence: f64) -> Result<ClassificationResult, DecisionError> {
    if !confidence.is_finite() {
        return Err(DecisionError::NotFinite(confidence));
    }
    let label = if result.to_lowercase().starts_with("pneumonia") {
        Label::Pneumonia
    } else {
        Label::Normal
    };

    Ok(ClassificationResult {
        label,
        confidence: confidence.clamp(0.0, 100.0),
    })
}

pub fn risk_tier(label: Label, confidence: f64) -> RiskTier {
    match label {
        Label::Normal => RiskTier::None,
        Label::Pneumonia if confidence > HIGH_RISK_ABOVE => RiskTier::High,
        Label::Pneumonia if confidence > MEDIUM_RISK_ABOVE => RiskTier::Medium,
        Label::Pneumonia => RiskTier::Low,
    }
}
