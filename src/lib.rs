//! # img2text
//!
//! Transcribe text from images using a multimodal vision model.
//!
//! ## Why this crate?
//!
//! Classical OCR engines stumble on handwriting, mixed layouts, and
//! mathematical notation. A multimodal model reads an image the way a human
//! would, returning the text as plain text or as Markdown with structure
//! and math formatting preserved. This crate is the thin, typed
//! orchestration around that one remote call: encode the image, send a
//! single request, surface the text or a precise failure — plus a small
//! session state machine that keeps a UI honest about which request's
//! result it is showing.
//!
//! ## Data Flow
//!
//! ```text
//! file ──▶ encode ──▶ session ──▶ client ──▶ model ──▶ session ──▶ display
//!         (base64)  (Loading)   (1 request)  (Gemini)  (Success/
//!                                                        Error)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use img2text::{
//!     display, encode_image_file, OutputFormat, TranscriptionClient, TranscriptionConfig,
//!     TranscriptionSession,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // API key auto-detected from GEMINI_API_KEY
//!     let client = TranscriptionClient::new(TranscriptionConfig::default())?;
//!     let session = TranscriptionSession::new(client);
//!
//!     let payload = encode_image_file("notes.png").await?;
//!     let state = session.select_image(payload).await;
//!     println!("{}", display::render_status(&state));
//!
//!     // Re-run the same image as plain text
//!     let state = session.set_format(OutputFormat::PlainText).await;
//!     println!("{}", display::render_status(&state));
//!     Ok(())
//! }
//! ```
//!
//! ## Guarantees
//!
//! * Exactly one request per transcription — no retry, no caching.
//! * A missing credential fails before any network call.
//! * The session never shows a result for a superseded image/format pair:
//!   late responses are discarded by a generation check at resolution time.
//! * Every failure leaves the session in a recoverable `Error` state; a new
//!   image or format selection starts over cleanly.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod client;
pub mod config;
pub mod display;
pub mod encode;
pub mod error;
pub mod model;
pub mod payload;
pub mod prompts;
pub mod session;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use client::{Transcription, TranscriptionClient};
pub use config::{TranscriptionConfig, TranscriptionConfigBuilder, DEFAULT_MODEL, GEMINI_API_KEY_ENV};
pub use encode::{encode_image_bytes, encode_image_file};
pub use error::TranscribeError;
pub use model::{GeminiModel, ModelReply, ModelRequest, VisionModel};
pub use payload::{ImagePayload, OutputFormat};
pub use session::{SessionObserver, SessionState, TranscriptionSession};
