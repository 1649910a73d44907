//! Audio transcription client
//!
//! Calls an OpenAI-compatible `/audio/transcriptions` endpoint with the
//! uploaded audio and returns the transcript text.

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::core::error::{KalenteriError, Result};

/// Transcription endpoint client
#[derive(Clone)]
pub struct TranscriptionClient {
    client: Client,
    base_url: String,
    model: String,
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

impl TranscriptionClient {
    /// Create a client for the given base URL
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        }
    }

    /// Transcribe an uploaded audio file
    pub async fn transcribe(&self, audio: Vec<u8>, filename: &str) -> Result<String> {
        let part = Part::bytes(audio)
            .file_name(filename.to_string())
            .mime_str("application/octet-stream")
            .map_err(|e| KalenteriError::transcription(format!("bad audio part: {}", e)))?;

        let form = Form::new()
            .part("file", part)
            .text("model", self.model.clone());

        let response = self
            .client
            .post(format!("{}/audio/transcriptions", self.base_url))
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    KalenteriError::transcription(format!(
                        "Cannot connect to transcription endpoint at {}",
                        self.base_url
                    ))
                } else {
                    KalenteriError::from(e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(KalenteriError::transcription(format!(
                "Transcription API error ({}): {}",
                status, error_text
            )));
        }

        let transcription: TranscriptionResponse = response.json().await?;
        debug!(chars = transcription.text.len(), "transcription completed");
        Ok(transcription.text)
    }
}
