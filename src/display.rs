//! Presentation helpers: pure renderers over session state.
//!
//! Nothing here holds state or triggers work — every function maps a value
//! to a displayable string, which keeps the rendering layer trivially
//! testable and lets any front end (TUI, web handler, notification) consume
//! the same session without adapters.

use crate::payload::ImagePayload;
use crate::session::SessionState;

/// Shown while no image has been selected.
pub const IDLE_PROMPT: &str = "Upload an image to see the transcription here.";

/// Shown while a request is in flight.
pub const LOADING_INDICATOR: &str = "Transcribing image...";

/// Advisory upload guidance for a file picker. Not enforced anywhere.
pub const UPLOAD_GUIDANCE: &str = "Accepted formats: JPG, PNG, GIF. Max file size: 10MB.";

/// Render the one line (or block) a results pane shows for a state.
pub fn render_status(state: &SessionState) -> String {
    match state {
        SessionState::Idle => IDLE_PROMPT.to_string(),
        SessionState::Loading => LOADING_INDICATOR.to_string(),
        SessionState::Success { text } => text.clone(),
        SessionState::Error { message } => format!("Error: {message}"),
    }
}

/// Build a `data:` URI for previewing the selected image inline.
pub fn preview_data_uri(payload: &ImagePayload) -> String {
    format!("data:{};base64,{}", payload.mime_type(), payload.data())
}

/// Caption for the preview pane.
pub fn preview_caption(payload: &ImagePayload) -> String {
    format!("Uploaded Image: {}", payload.file_name())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_renders_the_prompt() {
        assert_eq!(render_status(&SessionState::Idle), IDLE_PROMPT);
    }

    #[test]
    fn loading_renders_the_indicator() {
        assert_eq!(render_status(&SessionState::Loading), LOADING_INDICATOR);
    }

    #[test]
    fn success_renders_the_text_verbatim() {
        let state = SessionState::Success {
            text: "# Notes\n- item".into(),
        };
        assert_eq!(render_status(&state), "# Notes\n- item");
    }

    #[test]
    fn error_renders_with_a_prefix() {
        let state = SessionState::Error {
            message: "No text was transcribed from the image.".into(),
        };
        assert_eq!(
            render_status(&state),
            "Error: No text was transcribed from the image."
        );
    }

    #[test]
    fn data_uri_embeds_mime_and_payload() {
        let payload = ImagePayload::new("aGVsbG8=", "image/png", "notes.png");
        assert_eq!(
            preview_data_uri(&payload),
            "data:image/png;base64,aGVsbG8="
        );
        assert_eq!(preview_caption(&payload), "Uploaded Image: notes.png");
    }
}
