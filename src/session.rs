//! The orchestrating session: current image, output format, request status.
//!
//! [`TranscriptionSession`] is a cheaply clonable handle over shared state.
//! Every mutation of the image-or-format pair funnels into a single
//! [`TranscriptionSession::request_transcription`] entry point; there is no
//! hidden dependency tracking. Mutators apply their state transition
//! synchronously — the session is already `Loading` when the method
//! returns — and hand back a boxed future that performs the remote call.
//! The caller decides whether to `.await` it inline or `tokio::spawn` it.
//!
//! ## Stale responses
//!
//! At most one request is authoritative at a time. Each dispatch bumps a
//! generation counter stored with the session state; each resolution
//! compares its captured generation before applying the outcome. A response
//! for a superseded image/format pair is discarded — the session never
//! shows a result for anything but the most recent selection. No abort is
//! sent to the remote service; "cancellation" is local disregard of a late
//! reply.
//!
//! State and counter live under one `std::sync::Mutex`: there is a single
//! writer, transitions are atomic relative to each resolution, and the lock
//! is never held across an `await`.

use crate::client::TranscriptionClient;
use crate::error::TranscribeError;
use crate::payload::{ImagePayload, OutputFormat};
use futures::future::BoxFuture;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// The session's externally visible status.
///
/// A closed sum type: the transcribed text exists only in `Success`, the
/// failure message only in `Error`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// No request has been made for the current inputs.
    Idle,
    /// A request is in flight.
    Loading,
    /// The most recent request produced text.
    Success { text: String },
    /// The most recent request failed; `message` is displayable as-is.
    Error { message: String },
}

impl SessionState {
    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Loading)
    }

    /// The transcribed text, if in `Success`.
    pub fn text(&self) -> Option<&str> {
        match self {
            SessionState::Success { text } => Some(text),
            _ => None,
        }
    }

    /// The failure message, if in `Error`.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            SessionState::Error { message } => Some(message),
            _ => None,
        }
    }
}

/// Receives session events.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Implementations must be `Send + Sync`; resolution
/// futures may complete on any runtime thread.
pub trait SessionObserver: Send + Sync {
    /// Called after every applied state transition.
    fn on_state_change(&self, state: &SessionState) {
        let _ = state;
    }

    /// Called when a response arrives for a superseded request and is
    /// discarded without touching the state.
    fn on_stale_response(&self, generation: u64) {
        let _ = generation;
    }
}

/// Orchestrates image selection, format selection, and transcription.
///
/// Clones share one underlying session.
#[derive(Clone)]
pub struct TranscriptionSession {
    shared: Arc<Shared>,
}

struct Shared {
    client: TranscriptionClient,
    observer: Option<Arc<dyn SessionObserver>>,
    state: Mutex<State>,
}

struct State {
    image: Option<ImagePayload>,
    format: OutputFormat,
    view: SessionState,
    generation: u64,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self, state: &SessionState) {
        if let Some(observer) = &self.observer {
            observer.on_state_change(state);
        }
    }
}

impl TranscriptionSession {
    /// Create a session with no image, `Markdown` format, `Idle` status.
    pub fn new(client: TranscriptionClient) -> Self {
        Self::build(client, None)
    }

    /// Create a session that reports events to `observer`.
    pub fn with_observer(client: TranscriptionClient, observer: Arc<dyn SessionObserver>) -> Self {
        Self::build(client, Some(observer))
    }

    fn build(client: TranscriptionClient, observer: Option<Arc<dyn SessionObserver>>) -> Self {
        Self {
            shared: Arc::new(Shared {
                client,
                observer,
                state: Mutex::new(State {
                    image: None,
                    format: OutputFormat::default(),
                    view: SessionState::Idle,
                    generation: 0,
                }),
            }),
        }
    }

    /// A clone of the current status.
    pub fn snapshot(&self) -> SessionState {
        self.shared.lock().view.clone()
    }

    /// The currently requested output format.
    pub fn format(&self) -> OutputFormat {
        self.shared.lock().format
    }

    /// The currently selected image, if any.
    pub fn current_image(&self) -> Option<ImagePayload> {
        self.shared.lock().image.clone()
    }

    /// Select a new image.
    ///
    /// Clears any prior result or error, stores the payload, and
    /// automatically dispatches a transcription: the session is `Loading`
    /// when this returns. Await (or spawn) the returned future to drive the
    /// request to its terminal state.
    pub fn select_image(&self, payload: ImagePayload) -> BoxFuture<'static, SessionState> {
        {
            let mut state = self.shared.lock();
            state.image = Some(payload);
            // Prior result/error is cleared before the automatic request
            // flips the state to Loading; the intermediate Idle is not
            // observable outside the lock.
            state.view = SessionState::Idle;
        }
        self.request_transcription()
    }

    /// Change the output format.
    ///
    /// Setting the same format again is a no-op. A changed format with an
    /// image present re-triggers transcription from scratch; with no image
    /// it is merely stored.
    pub fn set_format(&self, format: OutputFormat) -> BoxFuture<'static, SessionState> {
        {
            let mut state = self.shared.lock();
            if state.format == format {
                return ready(state.view.clone());
            }
            state.format = format;
            if state.image.is_none() {
                return ready(state.view.clone());
            }
        }
        self.request_transcription()
    }

    /// Request transcription of the current image/format pair.
    ///
    /// The single entry point every input mutation funnels into. With no
    /// image selected this resolves immediately to an `Error` asking for an
    /// upload, without invoking the client.
    pub fn request_transcription(&self) -> BoxFuture<'static, SessionState> {
        let dispatched = {
            let mut state = self.shared.lock();
            match state.image.clone() {
                Some(payload) => {
                    state.generation += 1;
                    state.view = SessionState::Loading;
                    Some((state.generation, payload, state.format))
                }
                None => {
                    state.view = SessionState::Error {
                        message: TranscribeError::NoImageSelected.to_string(),
                    };
                    None
                }
            }
        };

        match dispatched {
            Some((generation, payload, format)) => {
                self.shared.notify(&SessionState::Loading);
                self.run_request(generation, payload, format)
            }
            None => {
                let view = self.snapshot();
                self.shared.notify(&view);
                ready(view)
            }
        }
    }

    /// Drive one dispatched request to resolution.
    ///
    /// Applies the outcome only if `generation` is still current at
    /// resolution time; otherwise the outcome is discarded.
    fn run_request(
        &self,
        generation: u64,
        payload: ImagePayload,
        format: OutputFormat,
    ) -> BoxFuture<'static, SessionState> {
        let shared = Arc::clone(&self.shared);
        Box::pin(async move {
            let outcome = shared.client.transcribe(&payload, format).await;
            let resolved = match outcome {
                Ok(transcription) => SessionState::Success {
                    text: transcription.text,
                },
                Err(e) => SessionState::Error {
                    message: e.to_string(),
                },
            };

            let (view, stale) = {
                let mut state = shared.lock();
                if state.generation == generation {
                    state.view = resolved;
                    (state.view.clone(), false)
                } else {
                    (state.view.clone(), true)
                }
            };

            if stale {
                debug!(generation, "Discarding response for a superseded request");
                if let Some(observer) = &shared.observer {
                    observer.on_stale_response(generation);
                }
            } else {
                shared.notify(&view);
            }
            view
        })
    }
}

fn ready(state: SessionState) -> BoxFuture<'static, SessionState> {
    Box::pin(async move { state })
}
