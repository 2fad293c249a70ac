use std::path::PathBuf;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecisionError {
    #[error("model score is not a finite number: {0}")]
    NotFinite(f64),
}

#[derive(Debug, Error)]
pub enum PreprocessError {
    #[error("could not decode uploaded image: {0}")]
    Decode(#[from] image::ImageError),
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model artifact not found: {0}")]
    ArtifactMissing(PathBuf),

    #[error("failed to load model {path}: {reason}")]
    Load { path: PathBuf, reason: String },

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("model produced no output")]
    EmptyOutput,
}

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("inference service request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("inference service returned {status}")]
    Status { status: u16 },
}

/// Why a single analysis produced no result.
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error(transparent)]
    Preprocess(#[from] PreprocessError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error(transparent)]
    Decision(#[from] DecisionError),

    #[error("background task failed: {0}")]
    Blocking(String),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("no image has been uploaded yet")]
    NothingStaged,

    #[error("unsupported file type {0:?}; expected jpg, jpeg or png")]
    UnsupportedUpload(String),

    #[error("upload is missing the `file` field")]
    MissingField,

    #[error("no analysis result to report")]
    NoResult,

    #[error("upload failed: {0}")]
    Multipart(String),
}

impl From<actix_multipart::MultipartError> for AppError {
    fn from(e: actix_multipart::MultipartError) -> Self {
        Self::Multipart(e.to_string())
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NothingStaged | Self::MissingField | Self::Multipart(_) => StatusCode::BAD_REQUEST,
            Self::UnsupportedUpload(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::NoResult => StatusCode::NOT_FOUND,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .content_type("text/plain; charset=utf-8")
            .body(self.to_string())
    }
}
