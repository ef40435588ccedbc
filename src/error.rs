//! Error types for the img2text library.
//!
//! Every failure a transcription can hit is a variant of [`TranscribeError`].
//! The variants fall into four classes that callers may want to treat
//! differently:
//!
//! * **User input** — no image has been selected yet.
//! * **Configuration** — the API credential is missing or the config is
//!   invalid. Surfaced *before* any network call is made.
//! * **Empty result** — the remote call succeeded but produced no text.
//! * **Transport** — the remote call itself failed (network, auth, quota,
//!   malformed request or response); the underlying cause is carried in the
//!   message.
//!
//! The session layer flattens all of these into a single display string, so
//! each variant's `Display` output is written to be shown to an end user
//! as-is.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the img2text library.
#[derive(Debug, Error)]
pub enum TranscribeError {
    // ── User input ────────────────────────────────────────────────────────
    /// A transcription was requested before any image was selected.
    #[error("Please upload an image first.")]
    NoImageSelected,

    /// The selected image file could not be read.
    #[error("Failed to read image file '{path}': {source}")]
    ImageReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Configuration ─────────────────────────────────────────────────────
    /// No API key is available for the vision-model endpoint.
    #[error(
        "GEMINI_API_KEY is not set.\nProvide a key via TranscriptionConfig::builder().api_key(..) or export GEMINI_API_KEY."
    )]
    MissingApiKey,

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Remote call ───────────────────────────────────────────────────────
    /// The remote call succeeded but returned no text.
    #[error("No text was transcribed from the image.")]
    EmptyTranscription,

    /// The request never completed (connection failure, timeout, TLS error).
    #[error("Failed to transcribe image: {reason}")]
    RequestFailed { reason: String },

    /// The API answered with a non-success HTTP status.
    #[error("Model API returned HTTP {status}: {detail}")]
    ApiStatus { status: u16, detail: String },

    /// The API answered 2xx but the body could not be interpreted.
    #[error("Malformed model API response: {detail}")]
    MalformedResponse { detail: String },
}
