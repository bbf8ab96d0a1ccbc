//! The document-input state machine.
//!
//! A [`DocumentSession`] owns everything one "summarize a document" panel
//! needs: the category, the text/file inputs, and the result of the last
//! submission as a single [`SubmissionState`]. Hosts (the CLI, or any UI)
//! drive it through setters and [`DocumentSession::submit`], and draw
//! whatever [`DocumentSession::state`] says.
//!
//! ```text
//!            submit()                 backend reply / failure
//!   Idle ───────────────▶ Pending ───────────────────────────▶ Success | Error
//!    ▲                                                              │
//!    └──────────────────────── set_category() ◀─────────────────────┘
//! ```
//!
//! Only one submission can be in flight: `submit` takes `&mut self` and
//! refuses to start while the state is `Pending`. There is no retry. Every
//! path ends with `Pending` cleared, including a dropped `submit` future.

use crate::backend::{HttpBackend, SummaryBackend};
use crate::category::Category;
use crate::classify::{
    classify, network_error, DegenerateOutputDetector, PhraseDetector, UNDER_CONSTRUCTION_MESSAGE,
};
use crate::config::ClientConfig;
use crate::error::SummarizeError;
use crate::input::{InputCoordinator, InputPayload, UploadedFile};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Where the last submission stands.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SubmissionState {
    /// Nothing submitted since the session started or the category changed.
    #[default]
    Idle,
    /// A request is in flight.
    Pending,
    /// A summary to show.
    Success {
        summary: String,
        model: Option<String>,
    },
    /// A failure to show, styled as an error.
    Error {
        message: String,
        model: Option<String>,
    },
}

impl SubmissionState {
    pub fn is_pending(&self) -> bool {
        matches!(self, SubmissionState::Pending)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, SubmissionState::Error { .. })
    }

    /// Text to display: the summary or the error message.
    pub fn message(&self) -> Option<&str> {
        match self {
            SubmissionState::Success { summary, .. } => Some(summary),
            SubmissionState::Error { message, .. } => Some(message),
            SubmissionState::Idle | SubmissionState::Pending => None,
        }
    }

    /// Model label, when the result has one.
    pub fn model(&self) -> Option<&str> {
        match self {
            SubmissionState::Success { model, .. } | SubmissionState::Error { model, .. } => {
                model.as_deref()
            }
            SubmissionState::Idle | SubmissionState::Pending => None,
        }
    }
}

/// Notified on every state transition.
///
/// Hosts use it to show a progress indicator while a submission is
/// pending. The default implementation does nothing.
pub trait SessionObserver: Send + Sync {
    fn on_state_change(&self, state: &SubmissionState) {
        let _ = state;
    }
}

/// Observer that ignores every event. Used when none is configured.
pub struct NoopObserver;

impl SessionObserver for NoopObserver {}

/// One document-input panel bound to a category.
pub struct DocumentSession {
    category: Category,
    input: InputCoordinator,
    state: SubmissionState,
    backend: Arc<dyn SummaryBackend>,
    detector: Arc<dyn DegenerateOutputDetector>,
    observer: Arc<dyn SessionObserver>,
    stub_delay: Duration,
}

impl DocumentSession {
    /// Create a session talking HTTP to `config.base_url`.
    pub fn new(category: Category, config: &ClientConfig) -> Result<Self, SummarizeError> {
        let backend = HttpBackend::new(config)?;
        Ok(Self::with_backend(category, Arc::new(backend), config))
    }

    /// Create a session over any backend.
    pub fn with_backend(
        category: Category,
        backend: Arc<dyn SummaryBackend>,
        config: &ClientConfig,
    ) -> Self {
        Self {
            category,
            input: InputCoordinator::new(),
            state: SubmissionState::Idle,
            backend,
            detector: Arc::new(PhraseDetector::new(&config.degenerate_phrases)),
            observer: Arc::new(NoopObserver),
            stub_delay: config.stub_delay(),
        }
    }

    /// Replace the degenerate-output rule.
    pub fn with_detector(mut self, detector: Arc<dyn DegenerateOutputDetector>) -> Self {
        self.detector = detector;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn SessionObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn category(&self) -> &Category {
        &self.category
    }

    pub fn input(&self) -> &InputCoordinator {
        &self.input
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    /// Switch category. Inputs and the previous result are cleared so a
    /// result for one document type is never shown against another.
    ///
    /// Setting the current category again changes nothing.
    pub fn set_category(&mut self, category: Category) {
        if category == self.category {
            return;
        }
        debug!("Category changed: {} -> {}", self.category, category);
        self.category = category;
        self.input.clear();
        self.set_state(SubmissionState::Idle);
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.input.set_text(text);
    }

    pub fn select_file(&mut self, file: UploadedFile) {
        self.input.select_file(file);
    }

    pub fn clear_file(&mut self) {
        self.input.clear_file();
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        self.input.has_input() && !self.state.is_pending()
    }

    /// Submit the current input and wait for the result.
    ///
    /// Every failure after the submission starts ends up in the returned
    /// state; `Err` only means a submission is already pending. If the
    /// returned future is dropped before it completes, the state goes back
    /// to `Idle`.
    pub async fn submit(&mut self) -> Result<&SubmissionState, SummarizeError> {
        if self.state.is_pending() {
            return Err(SummarizeError::SubmitDisabled {
                reason: "a submission is already pending",
            });
        }

        self.set_state(SubmissionState::Pending);
        let submission = Submission {
            category: &self.category,
            payload: self.input.payload(),
            backend: self.backend.as_ref(),
            detector: self.detector.as_ref(),
            stub_delay: self.stub_delay,
        };
        let pending = PendingGuard {
            state: &mut self.state,
            observer: self.observer.as_ref(),
            settled: false,
        };
        let outcome = submission.run().await;
        pending.settle(outcome);
        Ok(&self.state)
    }

    fn set_state(&mut self, state: SubmissionState) {
        self.state = state;
        self.observer.on_state_change(&self.state);
    }
}

/// Everything one submission reads, borrowed from the session.
struct Submission<'a> {
    category: &'a Category,
    payload: Option<InputPayload>,
    backend: &'a dyn SummaryBackend,
    detector: &'a dyn DegenerateOutputDetector,
    stub_delay: Duration,
}

impl Submission<'_> {
    async fn run(self) -> SubmissionState {
        if self.category.is_stub() {
            info!(category = %self.category, "Category is under construction");
            tokio::time::sleep(self.stub_delay).await;
            return SubmissionState::Success {
                summary: UNDER_CONSTRUCTION_MESSAGE.to_string(),
                model: None,
            };
        }

        let Some(payload) = self.payload else {
            warn!("Summarization not attempted: {}", SummarizeError::NoInput);
            return SubmissionState::Error {
                message: SummarizeError::NoInput.to_string(),
                model: None,
            };
        };

        let endpoint = match &payload {
            InputPayload::Text(_) => self.category.text_endpoint().map(|_| ()),
            InputPayload::File(_) => self.category.file_endpoint().map(|_| ()),
        };
        if let Err(e) = endpoint {
            warn!("Summarization not attempted: {}", e);
            return SubmissionState::Error {
                message: e.to_string(),
                model: None,
            };
        }

        match self.backend.summarize(self.category, &payload).await {
            Ok(response) => {
                let state = classify(response, self.detector);
                if state.is_error() {
                    warn!(
                        category = %self.category,
                        model = state.model().unwrap_or_default(),
                        "Backend reply classified as error"
                    );
                }
                state
            }
            Err(e) if e.is_transport() => {
                warn!("Summarization request failed: {}", e);
                network_error()
            }
            Err(e) => {
                warn!("Summarization not attempted: {}", e);
                SubmissionState::Error {
                    message: e.to_string(),
                    model: None,
                }
            }
        }
    }
}

/// Holds the session state while a submission is `Pending`.
///
/// Dropped without [`PendingGuard::settle`] (the submit future was
/// cancelled), it resets the state to `Idle`.
struct PendingGuard<'a> {
    state: &'a mut SubmissionState,
    observer: &'a dyn SessionObserver,
    settled: bool,
}

impl PendingGuard<'_> {
    fn settle(mut self, outcome: SubmissionState) {
        *self.state = outcome;
        self.observer.on_state_change(&*self.state);
        self.settled = true;
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        debug!("Submission dropped while pending");
        *self.state = SubmissionState::Idle;
        self.observer.on_state_change(&*self.state);
    }
}
