//! Chest X-ray pneumonia screening demo.
//!
//! An uploaded image is classified either by an in-process ONNX model or by a
//! remote inference service. The result is shown with a confidence score and
//! risk tier, and can be downloaded as a plain-text report.

pub mod classifier;
pub mod config;
pub mod decision;
pub mod error;
pub mod handlers;
pub mod model;
pub mod models;
pub mod page;
pub mod preprocess;
pub mod remote;
pub mod report;
pub mod session;

pub use classifier::{Classifier, LocalClassifier, RemoteClassifier};
pub use config::{Config, Mode};
pub use handlers::{configure, AppState};
pub use models::{ClassificationResult, Label, RiskTier};
