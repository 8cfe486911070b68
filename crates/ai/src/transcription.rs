use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum TranscriptionError {
    #[error("transcription request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("transcription service returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("transcription service returned an empty transcript")]
    Empty,
    #[error("no audio bytes to transcribe")]
    EmptyAudio,
}

/// Trait for pluggable speech-to-text backends.
///
/// No retry policy lives here: errors surface to the caller, which decides
/// whether to swallow them.
#[async_trait]
pub trait Transcriber: Send + Sync + 'static {
    /// Transcribes a complete recording into plain text.
    async fn transcribe(
        &self,
        audio: &[u8],
        file_name: &str,
    ) -> Result<String, TranscriptionError>;

    /// Human-readable backend name.
    fn name(&self) -> &str;
}

/// Speech-to-text via an OpenAI-compatible `/v1/audio/transcriptions` endpoint.
pub struct WhisperClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Deserialize)]
struct TranscriptionResponse {
    text: String,
}

impl WhisperClient {
    pub fn new(
        base_url: &str,
        api_key: &str,
        model: &str,
        timeout: Duration,
    ) -> Result<Self, TranscriptionError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }
}

#[async_trait]
impl Transcriber for WhisperClient {
    async fn transcribe(
        &self,
        audio: &[u8],
        file_name: &str,
    ) -> Result<String, TranscriptionError> {
        if audio.is_empty() {
            return Err(TranscriptionError::EmptyAudio);
        }

        let file = reqwest::multipart::Part::bytes(audio.to_vec())
            .file_name(file_name.to_string())
            .mime_str("application/octet-stream")?;
        let form = reqwest::multipart::Form::new()
            .part("file", file)
            .text("model", self.model.clone());

        let response = self
            .http
            .post(format!("{}/v1/audio/transcriptions", self.base_url))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranscriptionError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: TranscriptionResponse = response.json().await?;
        let text = parsed.text.trim().to_string();
        if text.is_empty() {
            return Err(TranscriptionError::Empty);
        }

        debug!(chars = text.len(), "transcription complete");
        Ok(text)
    }

    fn name(&self) -> &str {
        "whisper"
    }
}
