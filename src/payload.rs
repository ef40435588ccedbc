//! Value types submitted to the vision model.
//!
//! An [`ImagePayload`] is the encoder's output: the image bytes already
//! base64-encoded, the detected MIME type, and the original file name.
//! It is immutable once created — the session replaces the whole payload
//! when the user picks a new image, it never patches fields in place.

use serde::{Deserialize, Serialize};

/// An encoded image ready for submission to the vision model.
///
/// Created by [`crate::encode::encode_image_file`] or
/// [`crate::encode::encode_image_bytes`]; owned by the session until the
/// user selects a replacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagePayload {
    data: String,
    mime_type: String,
    file_name: String,
}

impl ImagePayload {
    /// Build a payload from already-encoded parts.
    ///
    /// `data` must be standard (non-URL-safe) base64.
    pub fn new(
        data: impl Into<String>,
        mime_type: impl Into<String>,
        file_name: impl Into<String>,
    ) -> Self {
        Self {
            data: data.into(),
            mime_type: mime_type.into(),
            file_name: file_name.into(),
        }
    }

    /// The base64-encoded image bytes.
    pub fn data(&self) -> &str {
        &self.data
    }

    /// The detected MIME type, e.g. `image/png`.
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// The name of the file the image came from.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }
}

/// The requested shape of the transcribed text.
///
/// `Markdown` asks the model to use Markdown for mathematical expressions
/// and document structure; `PlainText` asks for the raw text only. The wire
/// strings (`"plainText"` / `"markdown"`) match what a front-end would send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OutputFormat {
    /// Raw text with line breaks preserved, no markup.
    PlainText,
    /// Markdown structure and math formatting. (default)
    #[default]
    Markdown,
}

impl OutputFormat {
    /// Stable lowercase label, used in logs.
    pub fn label(&self) -> &'static str {
        match self {
            OutputFormat::PlainText => "plainText",
            OutputFormat::Markdown => "markdown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_format_is_markdown() {
        assert_eq!(OutputFormat::default(), OutputFormat::Markdown);
    }

    #[test]
    fn format_serde_uses_camel_case_strings() {
        let json = serde_json::to_string(&OutputFormat::PlainText).expect("serialize");
        assert_eq!(json, "\"plainText\"");
        let back: OutputFormat = serde_json::from_str("\"markdown\"").expect("deserialize");
        assert_eq!(back, OutputFormat::Markdown);
    }

    #[test]
    fn payload_accessors() {
        let p = ImagePayload::new("aGVsbG8=", "image/png", "notes.png");
        assert_eq!(p.data(), "aGVsbG8=");
        assert_eq!(p.mime_type(), "image/png");
        assert_eq!(p.file_name(), "notes.png");
    }
}
