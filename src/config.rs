use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::preprocess::TensorLayout;
use crate::report::ReportStyle;

/// Where classification happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Forward uploads to a separate inference service.
    Remote,
    /// Run the ONNX model inside this process.
    Local,
}

#[derive(Debug, Parser)]
#[command(name = "pneumo-screen")]
#[command(about = "Chest X-ray pneumonia screening demo", version)]
pub struct Config {
    /// Inference backend
    #[arg(long, value_enum, env = "PNEUMO_MODE", default_value = "remote")]
    pub mode: Mode,

    /// Address to serve the page on
    #[arg(long, env = "PNEUMO_BIND", default_value = "127.0.0.1:8501")]
    pub bind: String,

    /// ONNX export of the classifier (local mode)
    #[arg(long, env = "PNEUMO_MODEL", default_value = "pneumonia_model.onnx")]
    pub model: PathBuf,

    /// Input axis order of the model (local mode)
    #[arg(long, value_enum, env = "PNEUMO_LAYOUT", default_value = "nhwc")]
    pub layout: TensorLayout,

    /// Prediction endpoint of the inference service (remote mode)
    #[arg(long, env = "PNEUMO_ENDPOINT", default_value = "http://127.0.0.1:5000/predict")]
    pub endpoint: String,

    /// Give up on the inference service after this many seconds
    #[arg(long, env = "PNEUMO_TIMEOUT_SECS", default_value = "30")]
    pub timeout_secs: u64,

    /// Report timestamp format and file name; defaults per mode
    #[arg(long, value_enum, env = "PNEUMO_REPORT_STYLE")]
    pub report_style: Option<ReportStyle>,
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn report_style(&self) -> ReportStyle {
        self.report_style.unwrap_or(match self.mode {
            Mode::Remote => ReportStyle::DayFirst,
            Mode::Local => ReportStyle::Iso,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_remote_day_first() {
        let cfg = Config::try_parse_from(["pneumo-screen"]).unwrap();
        assert_eq!(cfg.mode, Mode::Remote);
        assert_eq!(cfg.endpoint, "http://127.0.0.1:5000/predict");
        assert_eq!(cfg.report_style(), ReportStyle::DayFirst);
        assert_eq!(cfg.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn local_mode_defaults_to_iso_report() {
        let cfg = Config::try_parse_from(["pneumo-screen", "--mode", "local", "--layout", "nchw"]).unwrap();
        assert_eq!(cfg.mode, Mode::Local);
        assert_eq!(cfg.layout, TensorLayout::Nchw);
        assert_eq!(cfg.model, PathBuf::from("pneumonia_model.onnx"));
        assert_eq!(cfg.report_style(), ReportStyle::Iso);
    }

    #[test]
    fn report_style_override() {
        let cfg = Config::try_parse_from(["pneumo-screen", "--mode", "local", "--report-style", "day-first"])
            .unwrap();
        assert_eq!(cfg.report_style(), ReportStyle::DayFirst);
    }
}
