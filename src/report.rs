//! Plain-text report offered for download after an analysis.

use chrono::NaiveDateTime;
use clap::ValueEnum;

use crate::models::{ClassificationResult, Label};

pub const DISCLAIMER: &str = "Disclaimer: This report is for educational purposes only.";

const PNEUMONIA_SUGGESTIONS: &[&str] = &[
    "Consult a qualified medical professional",
    "Follow prescribed medication",
    "Ensure rest and hydration",
    "Monitor breathing and oxygen levels",
];

const NORMAL_SUGGESTIONS: &[&str] = &[
    "Maintain healthy lifestyle",
    "Regular exercise and diet",
    "Periodic medical checkups",
];

/// Timestamp format and download name. Each deployment variant has its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportStyle {
    /// `18-10-2026 14:05:09`, saved as `pneumonia_analysis_report.txt`.
    DayFirst,
    /// `2026-10-18 14:05:09`, saved as `pneumonia_report.txt`.
    Iso,
}

impl ReportStyle {
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::DayFirst => "pneumonia_analysis_report.txt",
            Self::Iso => "pneumonia_report.txt",
        }
    }

    fn timestamp_format(&self) -> &'static str {
        match self {
            Self::DayFirst => "%d-%m-%Y %H:%M:%S",
            Self::Iso => "%Y-%m-%d %H:%M:%S",
        }
    }
}

pub fn suggestions(label: Label) -> &'static [&'static str] {
    match label {
        Label::Pneumonia => PNEUMONIA_SUGGESTIONS,
        Label::Normal => NORMAL_SUGGESTIONS,
    }
}

/// Render the report. Deterministic for a given result, timestamp and style.
pub fn render(result: &ClassificationResult, at: NaiveDateTime, style: ReportStyle) -> String {
    let mut out = format!(
        "\nPNEUMONIA DETECTION REPORT\n\
         -------------------------\n\
         Date & Time: {}\n\
         \n\
         Analysis Result: {}\n\
         Confidence Score: {}%\n\
         Risk Level: {}\n\
         \n\
         Suggested Guidance:\n\n",
        at.format(style.timestamp_format()),
        result.label(),
        result.confidence_display(),
        result.risk(),
    );

    for line in suggestions(result.label()) {
        out.push_str("- ");
        out.push_str(line);
        out.push('\n');
    }
    out.push('\n');
    out.push_str(DISCLAIMER);
    out
}
