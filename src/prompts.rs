//! Extraction instructions sent alongside the image.
//!
//! Centralising the prompt text here serves two purposes:
//!
//! 1. **Single source of truth** — the two output formats differ by exactly
//!    one clause (the Markdown/math instruction); keeping both strings side
//!    by side makes that difference obvious and editable in one place.
//!
//! 2. **Testability** — unit tests can inspect the instruction chosen for a
//!    format without calling a real model.
//!
//! Callers can override the instruction entirely via
//! [`crate::config::TranscriptionConfig::instruction_override`]; the
//! constants here are used only when no override is provided.

use crate::payload::OutputFormat;

/// Instruction for Markdown output.
///
/// Asks for complete extraction — including handwritten equations — with
/// line breaks preserved and Markdown used for mathematical expressions
/// and document structure.
pub const MARKDOWN_INSTRUCTION: &str = "Extract all text from this image, including handwritten equations and any other visible text. Preserve line breaks and formatting as much as possible, using Markdown for mathematical expressions and structure.";

/// Instruction for plain-text output.
///
/// Identical to [`MARKDOWN_INSTRUCTION`] minus the Markdown/math clause.
pub const PLAIN_TEXT_INSTRUCTION: &str = "Extract all text from this image, including handwritten equations and any other visible text. Preserve line breaks and formatting as much as possible.";

/// Pick the instruction for the requested output format.
pub fn instruction_for(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::Markdown => MARKDOWN_INSTRUCTION,
        OutputFormat::PlainText => PLAIN_TEXT_INSTRUCTION,
    }
}
