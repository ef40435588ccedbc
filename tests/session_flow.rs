//! Integration tests for the full select → transcribe → display flow,
//! exercised through the public API against a scripted vision model.

use async_trait::async_trait;
use img2text::{
    display, encode_image_bytes, ImagePayload, ModelReply, ModelRequest, OutputFormat,
    SessionState, TranscribeError, TranscriptionClient, TranscriptionConfig, TranscriptionSession,
    VisionModel,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

// ── Test backend ─────────────────────────────────────────────────────────

/// Scripted model: replies per file name, counts calls.
struct ScriptedModel {
    calls: AtomicUsize,
    script: Box<dyn Fn(&ModelRequest) -> Result<ModelReply, TranscribeError> + Send + Sync>,
}

impl ScriptedModel {
    fn with(
        script: impl Fn(&ModelRequest) -> Result<ModelReply, TranscribeError> + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            script: Box::new(script),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VisionModel for ScriptedModel {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, request: &ModelRequest) -> Result<ModelReply, TranscribeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (self.script)(request)
    }
}

fn reply(text: &str) -> Result<ModelReply, TranscribeError> {
    Ok(ModelReply {
        text: text.to_string(),
        input_tokens: 258,
        output_tokens: 9,
    })
}

fn session_with(backend: Arc<ScriptedModel>) -> TranscriptionSession {
    session_with_key(backend, "test-key")
}

fn session_with_key(backend: Arc<ScriptedModel>, api_key: &str) -> TranscriptionSession {
    let config = TranscriptionConfig::builder()
        .api_key(api_key)
        .backend(backend as Arc<dyn VisionModel>)
        .build()
        .expect("valid config");
    TranscriptionSession::new(TranscriptionClient::new(config).expect("client"))
}

fn payload(name: &str) -> ImagePayload {
    ImagePayload::new("aGVsbG8=", "image/png", name)
}

// ── Named scenarios ──────────────────────────────────────────────────────

#[tokio::test]
async fn notes_png_markdown_round_trip() {
    let backend = ScriptedModel::with(|request| {
        assert_eq!(request.image.mime_type(), "image/png");
        assert!(
            request.instruction.contains("Markdown"),
            "Markdown format must send the Markdown instruction"
        );
        reply("# Notes\n- item")
    });
    let session = session_with(Arc::clone(&backend));

    let state = session.select_image(payload("notes.png")).await;
    assert_eq!(state.text(), Some("# Notes\n- item"));
    assert_eq!(display::render_status(&state), "# Notes\n- item");
    assert_eq!(backend.call_count(), 1);
}

#[tokio::test]
async fn blank_jpg_with_empty_reply_reports_no_text_found() {
    let backend = ScriptedModel::with(|_| reply(""));
    let session = session_with(Arc::clone(&backend));

    let state = session.select_image(payload("blank.jpg")).await;
    let message = state.error_message().expect("error state");
    assert!(message.contains("No text"), "got: {message}");
    assert!(state.text().is_none(), "an empty reply must never be Success");
}

#[tokio::test]
async fn no_credential_means_zero_network_calls() {
    let backend = ScriptedModel::with(|_| reply("unreachable"));
    let session = session_with_key(Arc::clone(&backend), "");

    let state = session.select_image(payload("notes.png")).await;
    let message = state.error_message().expect("error state");
    assert!(message.contains("GEMINI_API_KEY"), "got: {message}");
    assert_eq!(backend.call_count(), 0);
}

// ── State-machine properties ─────────────────────────────────────────────

#[tokio::test]
async fn both_formats_succeed_with_non_empty_text() {
    let backend = ScriptedModel::with(|request| {
        if request.instruction.contains("Markdown") {
            reply("**bold**")
        } else {
            reply("bold")
        }
    });
    let session = session_with(Arc::clone(&backend));

    let state = session.select_image(payload("page.png")).await;
    assert_eq!(state.text(), Some("**bold**"));

    let state = session.set_format(OutputFormat::PlainText).await;
    assert_eq!(state.text(), Some("bold"));
    assert_eq!(backend.call_count(), 2);
}

#[tokio::test]
async fn transcription_without_an_image_is_an_immediate_error() {
    let backend = ScriptedModel::with(|_| reply("unreachable"));
    let session = session_with(Arc::clone(&backend));

    let state = session.request_transcription().await;
    let message = state.error_message().expect("error state");
    assert!(message.contains("upload an image"), "got: {message}");
    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
async fn rapid_reselection_shows_only_the_newest_result() {
    let backend = ScriptedModel::with(|request| {
        let name = request.image.file_name().to_string();
        reply(&format!("text of {name}"))
    });
    let session = session_with(Arc::clone(&backend));

    // Dispatch for A, supersede with B before A's future is driven.
    let request_a = session.select_image(payload("a.png"));
    let request_b = session.select_image(payload("b.png"));

    let state_b = request_b.await;
    assert_eq!(state_b.text(), Some("text of b.png"));

    // A resolves late; its result must be discarded.
    let state_after_a = request_a.await;
    assert_eq!(state_after_a.text(), Some("text of b.png"));
    assert_eq!(session.snapshot().text(), Some("text of b.png"));
}

#[tokio::test]
async fn format_switch_clears_success_and_reloads() {
    let backend = ScriptedModel::with(|request| {
        if request.instruction.contains("Markdown") {
            reply("# heading")
        } else {
            reply("heading")
        }
    });
    let session = session_with(Arc::clone(&backend));

    session.select_image(payload("doc.png")).await;
    assert_eq!(session.snapshot().text(), Some("# heading"));

    let request = session.set_format(OutputFormat::PlainText);
    assert!(
        session.snapshot().is_loading(),
        "prior text must be cleared while the new request is in flight"
    );
    let state = request.await;
    assert_eq!(state.text(), Some("heading"));
}

#[tokio::test]
async fn a_failed_request_is_recoverable() {
    let backend = ScriptedModel::with(|request| {
        if request.image.file_name() == "bad.png" {
            Err(TranscribeError::ApiStatus {
                status: 500,
                detail: "internal".into(),
            })
        } else {
            reply("recovered")
        }
    });
    let session = session_with(Arc::clone(&backend));

    let state = session.select_image(payload("bad.png")).await;
    assert!(state.error_message().is_some());

    let state = session.select_image(payload("good.png")).await;
    assert_eq!(state.text(), Some("recovered"));
}

// ── Encoder → session hand-off ───────────────────────────────────────────

#[tokio::test]
async fn encoded_bytes_flow_through_to_the_model() {
    let png = {
        use image::{DynamicImage, Rgba, RgbaImage};
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(2, 2, Rgba([9, 9, 9, 255])));
        let mut buf = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)
            .expect("png encode");
        buf
    };
    let encoded = encode_image_bytes(&png, None, "tiny.png");
    assert_eq!(encoded.mime_type(), "image/png");

    let backend = ScriptedModel::with(move |request| {
        assert_eq!(request.image.mime_type(), "image/png");
        assert!(!request.image.data().is_empty());
        reply("dot")
    });
    let session = session_with(Arc::clone(&backend));

    let state = session.select_image(encoded).await;
    assert_eq!(state.text(), Some("dot"));
}

#[tokio::test]
async fn idle_session_renders_the_upload_prompt() {
    let backend = ScriptedModel::with(|_| reply("unused"));
    let session = session_with(backend);

    let state = session.snapshot();
    assert_eq!(state, SessionState::Idle);
    assert_eq!(display::render_status(&state), display::IDLE_PROMPT);
}
