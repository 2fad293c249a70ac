use std::fmt;

use serde::{Deserialize, Serialize};

/// Binary outcome of a chest X-ray classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Pneumonia,
    Normal,
}

impl Label {
    /// Short label used in the result card and the downloadable report.
    pub fn display(&self) -> &'static str {
        match self {
            Self::Pneumonia => "Pneumonia Detected",
            Self::Normal => "Normal",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display())
    }
}

/// Coarse risk bucket. Only meaningful for a positive label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskTier {
    None,
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one analysis. Built only through [`crate::decision`], so the
/// label, confidence and risk tier always agree with each other.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassificationResult {
    pub(crate) label: Label,
    pub(crate) confidence: f64,
}

impl ClassificationResult {
    pub fn label(&self) -> Label {
        self.label
    }

    /// Confidence as a percentage in `[0, 100]`.
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn risk(&self) -> RiskTier {
        crate::decision::risk_tier(self.label, self.confidence)
    }

    /// Confidence rounded to two decimals, e.g. `92.00`.
    pub fn confidence_display(&self) -> String {
        format!("{:.2}", self.confidence)
    }
}

/// JSON body returned by the remote inference service on success.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RemotePrediction {
    pub result: String,
    pub confidence: f64,
}
