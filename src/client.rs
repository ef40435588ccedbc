//! The transcription client: one image in, one block of text out.
//!
//! [`TranscriptionClient::transcribe`] performs exactly one request — no
//! retry, no caching, no batching. The credential is resolved immediately
//! before the call, and its absence fails the request without touching the
//! network, so a misconfigured deployment is caught in microseconds rather
//! than after a timeout.

use crate::config::{TranscriptionConfig, GEMINI_API_KEY_ENV};
use crate::error::TranscribeError;
use crate::model::{GeminiModel, ModelRequest, VisionModel};
use crate::payload::{ImagePayload, OutputFormat};
use crate::prompts;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// A completed transcription with its cost accounting.
#[derive(Debug, Clone)]
pub struct Transcription {
    /// The transcribed text, as returned by the model.
    pub text: String,
    /// Prompt tokens billed, when the API reported them.
    pub input_tokens: u64,
    /// Completion tokens billed, when the API reported them.
    pub output_tokens: u64,
    /// Wall-clock duration of the remote call.
    pub duration_ms: u64,
}

/// Client for the remote vision model.
///
/// Cheap to clone; clones share the underlying backend.
#[derive(Clone)]
pub struct TranscriptionClient {
    config: TranscriptionConfig,
    backend: Arc<dyn VisionModel>,
}

impl TranscriptionClient {
    /// Build a client from a configuration.
    ///
    /// Uses the injected backend when one is configured, otherwise
    /// constructs a [`GeminiModel`] against the real endpoint. A missing
    /// API key is *not* an error here — it is checked per call, matching
    /// the credential's call-time lifecycle.
    pub fn new(config: TranscriptionConfig) -> Result<Self, TranscribeError> {
        let backend: Arc<dyn VisionModel> = match config.backend.clone() {
            Some(backend) => backend,
            None => Arc::new(GeminiModel::new(
                &config.model,
                Duration::from_secs(config.api_timeout_secs),
            )?),
        };
        Ok(Self { config, backend })
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &TranscriptionConfig {
        &self.config
    }

    /// Transcribe one image in the requested output format.
    ///
    /// Single attempt. Fails with:
    /// - [`TranscribeError::MissingApiKey`] before any network call when no
    ///   credential is available;
    /// - [`TranscribeError::EmptyTranscription`] when the model returns no
    ///   text (including whitespace-only replies);
    /// - a transport-class error when the call itself fails, with the
    ///   underlying cause in the message.
    pub async fn transcribe(
        &self,
        payload: &ImagePayload,
        format: OutputFormat,
    ) -> Result<Transcription, TranscribeError> {
        let api_key = self.resolve_api_key()?;

        let instruction = match &self.config.instruction_override {
            Some(custom) => custom.clone(),
            None => prompts::instruction_for(format).to_string(),
        };

        let request = ModelRequest {
            api_key,
            instruction,
            image: payload.clone(),
            max_output_tokens: self.config.max_output_tokens,
            temperature: Some(self.config.temperature),
        };

        info!(
            image = %payload.file_name(),
            format = format.label(),
            backend = self.backend.name(),
            "Requesting transcription"
        );
        let start = Instant::now();

        let reply = match self.backend.generate(&request).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(image = %payload.file_name(), "Transcription failed: {e}");
                return Err(e);
            }
        };
        let duration = start.elapsed();

        if reply.text.trim().is_empty() {
            warn!(image = %payload.file_name(), "Model returned no text");
            return Err(TranscribeError::EmptyTranscription);
        }

        debug!(
            "Transcribed {}: {} chars, {} in / {} out tokens, {:?}",
            payload.file_name(),
            reply.text.len(),
            reply.input_tokens,
            reply.output_tokens,
            duration
        );

        Ok(Transcription {
            text: reply.text,
            input_tokens: reply.input_tokens,
            output_tokens: reply.output_tokens,
            duration_ms: duration.as_millis() as u64,
        })
    }

    /// Resolve the API key: explicit config value first, then the
    /// environment. Read per call so a rotated key takes effect immediately.
    fn resolve_api_key(&self) -> Result<String, TranscribeError> {
        if let Some(key) = &self.config.api_key {
            if key.is_empty() {
                return Err(TranscribeError::MissingApiKey);
            }
            return Ok(key.clone());
        }
        match std::env::var(GEMINI_API_KEY_ENV) {
            Ok(key) if !key.is_empty() => Ok(key),
            _ => Err(TranscribeError::MissingApiKey),
        }
    }
}
