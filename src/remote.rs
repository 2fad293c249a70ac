//! HTTP client for a separately deployed inference service.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use tracing::{info, warn};

use crate::error::RemoteError;
use crate::models::RemotePrediction;

/// Posts images to `POST <endpoint>` as multipart field `file` and expects
/// `{"result": "...", "confidence": 0-100}` back.
pub struct InferenceClient {
    client: reqwest::Client,
    endpoint: String,
}

impl InferenceClient {
    pub fn new(endpoint: String, timeout: Duration) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn predict(&self, image: Vec<u8>) -> Result<RemotePrediction, RemoteError> {
        let size = image.len();
        let form = Form::new().part("file", Part::bytes(image).file_name("file"));

        info!(endpoint = %self.endpoint, bytes = size, "requesting remote prediction");
        let resp = self.client.post(&self.endpoint).multipart(form).send().await?;
        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            warn!(endpoint = %self.endpoint, status = status.as_u16(), "inference service refused request");
            return Err(RemoteError::Status {
                status: status.as_u16(),
            });
        }

        let prediction: RemotePrediction = resp.json().await?;
        info!(result = %prediction.result, confidence = prediction.confidence, "remote prediction");
        Ok(prediction)
    }
}
