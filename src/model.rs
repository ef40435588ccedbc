//! The remote vision-model seam: request/reply types, the [`VisionModel`]
//! trait, and the production Gemini backend.
//!
//! This module is intentionally thin — the instruction text lives in
//! [`crate::prompts`] and the error taxonomy in [`crate::error`], so the
//! wire format can change without touching either. The trait exists so the
//! session and client can be exercised against a scripted model in tests;
//! [`GeminiModel`] is the only implementation that talks to the network.
//!
//! The credential travels inside each [`ModelRequest`] rather than living in
//! the backend: the key is resolved fresh for every call, so a key rotated
//! in the environment takes effect on the next request without rebuilding
//! the client.

use crate::error::TranscribeError;
use crate::payload::ImagePayload;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};

/// Base URL of the Gemini REST API.
pub const GEMINI_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// How much of an error response body to keep in an error message.
const ERROR_BODY_SNIPPET_LEN: usize = 300;

/// One transcription request, fully assembled by the client.
#[derive(Clone)]
pub struct ModelRequest {
    /// Credential for the remote endpoint, resolved at call time.
    pub api_key: String,
    /// The extraction instruction for the requested output format.
    pub instruction: String,
    /// The encoded image.
    pub image: ImagePayload,
    /// Output-length ceiling; generous so long transcriptions are not cut.
    pub max_output_tokens: u32,
    /// Sampling temperature; low values keep the model faithful to the page.
    pub temperature: Option<f32>,
}

impl fmt::Debug for ModelRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelRequest")
            .field("api_key", &"<redacted>")
            .field("instruction", &self.instruction)
            .field("image", &self.image.file_name())
            .field("max_output_tokens", &self.max_output_tokens)
            .field("temperature", &self.temperature)
            .finish()
    }
}

/// What the model sent back.
#[derive(Debug, Clone, Default)]
pub struct ModelReply {
    /// Concatenated text of the first candidate; may be empty.
    pub text: String,
    /// Prompt tokens billed for the request, when reported.
    pub input_tokens: u64,
    /// Completion tokens billed for the request, when reported.
    pub output_tokens: u64,
}

/// A multimodal model that can turn an image plus an instruction into text.
///
/// Implementations must be `Send + Sync`; the session shares the backing
/// client across cloned handles and resolution futures.
#[async_trait]
pub trait VisionModel: Send + Sync {
    /// Human-readable backend name for logs.
    fn name(&self) -> &str;

    /// Send one request and return the model's reply.
    ///
    /// A reply with empty text is `Ok` here — classifying an empty result
    /// as an error is the caller's business, not the transport's.
    async fn generate(&self, request: &ModelRequest) -> Result<ModelReply, TranscribeError>;
}

// ── Gemini backend ───────────────────────────────────────────────────────

/// Production [`VisionModel`] calling the Gemini `generateContent` endpoint.
pub struct GeminiModel {
    http: reqwest::Client,
    base_url: String,
    model: String,
}

impl GeminiModel {
    /// Build a backend for the given model id with a per-request timeout.
    pub fn new(model: impl Into<String>, timeout: Duration) -> Result<Self, TranscribeError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TranscribeError::RequestFailed {
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            http,
            base_url: GEMINI_API_BASE_URL.to_string(),
            model: model.into(),
        })
    }

    /// Point the backend at a different base URL (proxies, test servers).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[async_trait]
impl VisionModel for GeminiModel {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, request: &ModelRequest) -> Result<ModelReply, TranscribeError> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part {
                        inline_data: Some(InlineData {
                            mime_type: request.image.mime_type().to_string(),
                            data: request.image.data().to_string(),
                        }),
                        text: None,
                    },
                    Part {
                        inline_data: None,
                        text: Some(request.instruction.clone()),
                    },
                ],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: request.max_output_tokens,
                temperature: request.temperature,
            },
        };

        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        debug!(model = %self.model, image = %request.image.file_name(), "Sending transcription request");

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &request.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                let reason = if e.is_timeout() {
                    format!("request timed out: {e}")
                } else {
                    e.to_string()
                };
                TranscribeError::RequestFailed { reason }
            })?;

        let status = response.status();
        let body_text = response
            .text()
            .await
            .map_err(|e| TranscribeError::RequestFailed {
                reason: format!("failed to read response body: {e}"),
            })?;

        if !status.is_success() {
            return Err(TranscribeError::ApiStatus {
                status: status.as_u16(),
                detail: snippet(&body_text),
            });
        }

        let parsed: GenerateContentResponse =
            serde_json::from_str(&body_text).map_err(|e| TranscribeError::MalformedResponse {
                detail: format!("{e} (body: {})", snippet(&body_text)),
            })?;

        Ok(extract_reply(parsed))
    }
}

/// Flatten a parsed response into a [`ModelReply`].
///
/// Takes the first candidate and joins its text parts. A blocked or empty
/// response yields an empty `text`, which the client maps to
/// [`TranscribeError::EmptyTranscription`].
fn extract_reply(response: GenerateContentResponse) -> ModelReply {
    let candidate = response.candidates.into_iter().next();

    if let Some(reason) = candidate
        .as_ref()
        .and_then(|c| c.finish_reason.as_deref())
        .filter(|r| *r == "MAX_TOKENS")
    {
        warn!(
            "Transcription stopped at the output-token ceiling ({reason}); result may be truncated"
        );
    }

    let text = candidate
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .iter()
                .filter_map(|part| part.text.as_deref())
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    let usage = response.usage_metadata.unwrap_or_default();
    let reply = ModelReply {
        text,
        input_tokens: usage.prompt_token_count.unwrap_or(0),
        output_tokens: usage.candidates_token_count.unwrap_or(0),
    };

    debug!(
        "Model replied: {} chars, {} input tokens, {} output tokens",
        reply.text.len(),
        reply.input_tokens,
        reply.output_tokens
    );
    reply
}

/// Truncate an error body for inclusion in an error message.
fn snippet(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.len() <= ERROR_BODY_SNIPPET_LEN {
        trimmed.to_string()
    } else {
        let mut end = ERROR_BODY_SNIPPET_LEN;
        while !trimmed.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}…", &trimmed[..end])
    }
}

// ── Wire types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    prompt_token_count: Option<u64>,
    candidates_token_count: Option<u64>,
}
