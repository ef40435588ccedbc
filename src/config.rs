//! Configuration for transcription requests.
//!
//! All behaviour is controlled through [`TranscriptionConfig`], built via its
//! [`TranscriptionConfigBuilder`]. The builder lets callers set only what
//! they care about and rely on documented defaults for the rest.
//!
//! The API key deliberately lives here as an explicit value rather than as
//! process-wide mutable state: a config owns its credential, and two clients
//! with different keys can coexist in one process. When no explicit key is
//! set, `GEMINI_API_KEY` is consulted at call time (not at build time), so
//! the environment can change between requests.

use crate::error::TranscribeError;
use crate::model::VisionModel;
use std::fmt;
use std::sync::Arc;

/// Default model id — a fast multimodal model suited to OCR-style reads.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Environment variable consulted when no explicit API key is configured.
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Configuration for a [`crate::client::TranscriptionClient`].
///
/// Built via [`TranscriptionConfig::builder()`] or
/// [`TranscriptionConfig::default()`].
///
/// # Example
/// ```rust
/// use img2text::TranscriptionConfig;
///
/// let config = TranscriptionConfig::builder()
///     .model("gemini-2.5-flash")
///     .max_output_tokens(4096)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct TranscriptionConfig {
    /// Model id sent to the endpoint. Default: [`DEFAULT_MODEL`].
    pub model: String,

    /// Explicit API key. When `None`, [`GEMINI_API_KEY_ENV`] is read at call
    /// time. An explicitly empty string is a configuration error — it never
    /// falls through to the environment.
    pub api_key: Option<String>,

    /// Maximum tokens the model may generate. Default: 8192.
    ///
    /// Dense or handwritten pages can run to thousands of output tokens;
    /// a ceiling this generous avoids truncating long transcriptions while
    /// still bounding the cost of a runaway response.
    pub max_output_tokens: u32,

    /// Sampling temperature. Default: 0.1.
    ///
    /// Low temperature keeps the model faithful to what is actually in the
    /// image — exactly what you want for transcription. Higher values
    /// introduce creativity that worsens accuracy.
    pub temperature: f32,

    /// Per-request timeout in seconds. Default: 60.
    pub api_timeout_secs: u64,

    /// Custom extraction instruction. When `None`, the per-format defaults
    /// in [`crate::prompts`] are used.
    pub instruction_override: Option<String>,

    /// Pre-constructed model backend. When `None`, a
    /// [`crate::model::GeminiModel`] is built from the fields above.
    /// Useful in tests or when the caller needs custom middleware.
    pub backend: Option<Arc<dyn VisionModel>>,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            max_output_tokens: 8192,
            temperature: 0.1,
            api_timeout_secs: 60,
            instruction_override: None,
            backend: None,
        }
    }
}

impl fmt::Debug for TranscriptionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranscriptionConfig")
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("max_output_tokens", &self.max_output_tokens)
            .field("temperature", &self.temperature)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("instruction_override", &self.instruction_override)
            .field("backend", &self.backend.as_ref().map(|_| "<dyn VisionModel>"))
            .finish()
    }
}

impl TranscriptionConfig {
    /// Create a new builder.
    pub fn builder() -> TranscriptionConfigBuilder {
        TranscriptionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`TranscriptionConfig`].
#[derive(Debug)]
pub struct TranscriptionConfigBuilder {
    config: TranscriptionConfig,
}

impl TranscriptionConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    pub fn max_output_tokens(mut self, n: u32) -> Self {
        self.config.max_output_tokens = n.max(1);
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs.max(1);
        self
    }

    pub fn instruction_override(mut self, instruction: impl Into<String>) -> Self {
        self.config.instruction_override = Some(instruction.into());
        self
    }

    pub fn backend(mut self, backend: Arc<dyn VisionModel>) -> Self {
        self.config.backend = Some(backend);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<TranscriptionConfig, TranscribeError> {
        let c = &self.config;
        if c.model.trim().is_empty() {
            return Err(TranscribeError::InvalidConfig(
                "model id must not be empty".into(),
            ));
        }
        if c.max_output_tokens == 0 {
            return Err(TranscribeError::InvalidConfig(
                "max_output_tokens must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}
