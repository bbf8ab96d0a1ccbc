//! State-machine tests for `DocumentSession` against an in-process backend.
//!
//! No network: `ScriptedBackend` returns canned replies and records what it
//! was asked to summarize.

use async_trait::async_trait;
use lexsum::classify::{
    DEGENERATE_OUTPUT_MESSAGE, ERROR_SENTINEL, NETWORK_ERROR_MESSAGE, UNDER_CONSTRUCTION_MESSAGE,
};
use lexsum::{
    Category, ClientConfig, DocumentSession, InputPayload, SessionObserver, SubmissionState,
    SummarizeError, SummaryBackend, SummaryResponse, UploadedFile,
};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

// ── Test helpers ─────────────────────────────────────────────────────────────

enum Script {
    Reply(SummaryResponse),
    Timeout,
    /// First call hangs for a long time, later calls reply.
    StallFirst(SummaryResponse),
}

struct ScriptedBackend {
    script: Script,
    calls: Mutex<Vec<(Category, InputPayload)>>,
}

impl ScriptedBackend {
    fn reply(summary: Option<&str>, model: Option<&str>) -> Arc<Self> {
        Arc::new(Self {
            script: Script::Reply(SummaryResponse {
                summary: summary.map(String::from),
                model_used: model.map(String::from),
            }),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn timeout() -> Arc<Self> {
        Arc::new(Self {
            script: Script::Timeout,
            calls: Mutex::new(Vec::new()),
        })
    }

    fn stall_first(summary: &str) -> Arc<Self> {
        Arc::new(Self {
            script: Script::StallFirst(SummaryResponse {
                summary: Some(summary.into()),
                model_used: Some("led-billsum".into()),
            }),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<(Category, InputPayload)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SummaryBackend for ScriptedBackend {
    async fn summarize(
        &self,
        category: &Category,
        payload: &InputPayload,
    ) -> Result<SummaryResponse, SummarizeError> {
        let first = {
            let mut calls = self.calls.lock().unwrap();
            calls.push((category.clone(), payload.clone()));
            calls.len() == 1
        };
        match &self.script {
            Script::StallFirst(r) => {
                if first {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                }
                Ok(r.clone())
            }
            Script::Reply(r) => Ok(r.clone()),
            Script::Timeout => Err(SummarizeError::Timeout {
                url: "http://localhost:8000/summarize/led_billsum".into(),
                secs: 1,
            }),
        }
    }
}

#[derive(Default)]
struct RecordingObserver {
    states: Mutex<Vec<SubmissionState>>,
}

impl SessionObserver for RecordingObserver {
    fn on_state_change(&self, state: &SubmissionState) {
        self.states.lock().unwrap().push(state.clone());
    }
}

fn config(stub_delay_ms: u64) -> ClientConfig {
    ClientConfig::builder()
        .base_url("http://localhost:8000")
        .stub_delay_ms(stub_delay_ms)
        .build()
        .expect("valid config")
}

fn session(category: Category, backend: Arc<ScriptedBackend>) -> DocumentSession {
    DocumentSession::with_backend(category, backend, &config(1))
}

fn pdf() -> UploadedFile {
    UploadedFile::from_bytes("bill.pdf", b"%PDF-1.7".to_vec()).unwrap()
}

// ── Input coordination ───────────────────────────────────────────────────────

#[test]
fn text_and_file_are_mutually_exclusive() {
    let mut s = session(Category::Bills, ScriptedBackend::reply(None, None));

    s.select_file(pdf());
    s.set_text("Section 1.");
    assert!(s.input().file().is_none());

    s.select_file(pdf());
    assert_eq!(s.input().text(), "");
    assert!(s.input().file().is_some());
}

#[test]
fn submit_enabled_only_with_input() {
    let mut s = session(Category::Bills, ScriptedBackend::reply(None, None));
    assert!(!s.can_submit());

    s.set_text(" \n ");
    assert!(!s.can_submit(), "whitespace-only text must not enable submit");

    s.select_file(pdf());
    assert!(s.can_submit());

    s.clear_file();
    assert!(!s.can_submit());
}

#[tokio::test]
async fn category_change_resets_everything() {
    let backend = ScriptedBackend::reply(Some("A brief summary."), Some("led-billsum"));
    let mut s = session(Category::Bills, backend);
    s.set_text("Section 1. This Act...");
    s.submit().await.unwrap();
    assert!(matches!(s.state(), SubmissionState::Success { .. }));

    s.set_category(Category::Judgements);
    assert_eq!(s.state(), &SubmissionState::Idle);
    assert_eq!(s.input().text(), "");
    assert!(s.input().file().is_none());
    assert_eq!(s.category(), &Category::Judgements);

    s.select_file(pdf());
    s.set_category(Category::Other);
    assert!(s.input().file().is_none());
    assert!(!s.can_submit());
}

// ── Submission ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn bills_success_shows_summary_and_model() {
    let backend = ScriptedBackend::reply(Some("A brief summary."), Some("led-billsum"));
    let mut s = session(Category::Bills, backend.clone());
    s.set_text("Section 1. This Act...");

    let state = s.submit().await.unwrap().clone();
    assert_eq!(
        state,
        SubmissionState::Success {
            summary: "A brief summary.".into(),
            model: Some("led-billsum".into()),
        }
    );

    let calls = backend.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, Category::Bills);
    assert_eq!(
        calls[0].1,
        InputPayload::Text("Section 1. This Act...".into())
    );
}

#[tokio::test]
async fn file_is_sent_when_no_text() {
    let backend = ScriptedBackend::reply(Some("ok"), Some("led-judgment"));
    let mut s = session(Category::Judgements, backend.clone());
    s.select_file(pdf());
    s.submit().await.unwrap();

    assert!(matches!(backend.calls()[0].1, InputPayload::File(_)));
}

#[tokio::test]
async fn other_category_shows_placeholder_after_delay() {
    let backend = ScriptedBackend::reply(Some("unused"), Some("unused"));
    let mut s = DocumentSession::with_backend(Category::Other, backend.clone(), &config(50));
    s.set_text("Anything at all");

    let start = Instant::now();
    let state = s.submit().await.unwrap().clone();
    assert!(start.elapsed() >= Duration::from_millis(50));

    assert_eq!(
        state,
        SubmissionState::Success {
            summary: UNDER_CONSTRUCTION_MESSAGE.into(),
            model: None,
        }
    );
    assert!(!state.is_error());
    assert!(backend.calls().is_empty(), "stub must not reach the backend");
}

#[tokio::test]
async fn error_sentinel_is_flagged_with_backend_text() {
    let backend = ScriptedBackend::reply(Some("Input too long for model"), Some("error"));
    let mut s = session(Category::Judgements, backend);
    s.set_text("The appeal is dismissed.");

    let state = s.submit().await.unwrap();
    assert!(state.is_error());
    assert_eq!(state.message(), Some("Input too long for model"));
    assert_eq!(state.model(), Some(ERROR_SENTINEL));
}

#[tokio::test]
async fn degenerate_summary_is_replaced_but_model_kept() {
    let backend = ScriptedBackend::reply(
        Some("This measure has not been amended since it was introduced."),
        Some("led-billsum"),
    );
    let mut s = session(Category::Bills, backend);
    s.set_text("Section 1. This Act...");

    let state = s.submit().await.unwrap();
    assert!(state.is_error());
    assert_eq!(state.message(), Some(DEGENERATE_OUTPUT_MESSAGE));
    assert_eq!(state.model(), Some("led-billsum"));
}

#[tokio::test]
async fn transport_failure_becomes_network_error() {
    let observer = Arc::new(RecordingObserver::default());
    let mut s = session(Category::Bills, ScriptedBackend::timeout())
        .with_observer(observer.clone());
    s.set_text("Section 1.");

    let state = s.submit().await.unwrap().clone();
    assert_eq!(state.message(), Some(NETWORK_ERROR_MESSAGE));
    assert_eq!(state.model(), Some(ERROR_SENTINEL));
    assert!(!s.state().is_pending());
    assert!(s.can_submit(), "submit is re-enabled after a failure");

    let states = observer.states.lock().unwrap().clone();
    assert_eq!(states.len(), 2);
    assert!(states[0].is_pending());
    assert!(states[1].is_error());
}

#[tokio::test]
async fn unsupported_category_fails_loudly_without_request() {
    let backend = ScriptedBackend::reply(Some("unused"), Some("unused"));
    let mut s = session(Category::custom("contracts").unwrap(), backend.clone());
    s.set_text("This Agreement is made between ...");

    let state = s.submit().await.unwrap();
    assert!(state.is_error());
    let msg = state.message().unwrap();
    assert!(msg.contains("Unsupported category 'contracts'"), "got: {msg}");
    assert_eq!(state.model(), None);
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn custom_category_files_are_uploaded() {
    let backend = ScriptedBackend::reply(Some("ok"), Some("generic"));
    let mut s = session(Category::custom("contracts").unwrap(), backend.clone());
    s.select_file(pdf());

    let state = s.submit().await.unwrap();
    assert!(!state.is_error());
    assert_eq!(backend.calls().len(), 1);
}

#[tokio::test]
async fn new_submission_clears_previous_result_first() {
    let observer = Arc::new(RecordingObserver::default());
    let backend = ScriptedBackend::reply(Some("first"), Some("m"));
    let mut s = session(Category::Bills, backend).with_observer(observer.clone());
    s.set_text("Section 1.");
    s.submit().await.unwrap();
    s.submit().await.unwrap();

    let states = observer.states.lock().unwrap().clone();
    assert_eq!(states.len(), 4);
    assert!(states[2].is_pending(), "second submit starts from Pending");
}

#[tokio::test]
async fn dropped_submit_does_not_leave_session_pending() {
    let observer = Arc::new(RecordingObserver::default());
    let backend = ScriptedBackend::stall_first("A brief summary.");
    let mut s = session(Category::Bills, backend.clone()).with_observer(observer.clone());
    s.set_text("Section 1.");

    let cancelled = tokio::time::timeout(Duration::from_millis(20), s.submit()).await;
    assert!(cancelled.is_err(), "first submit should still be in flight");

    assert_eq!(s.state(), &SubmissionState::Idle);
    assert!(s.can_submit());
    let states = observer.states.lock().unwrap().clone();
    assert_eq!(states, vec![SubmissionState::Pending, SubmissionState::Idle]);

    let state = s.submit().await.unwrap();
    assert_eq!(state.message(), Some("A brief summary."));
    assert_eq!(backend.calls().len(), 2);
}

#[tokio::test]
async fn custom_detector_is_used() {
    let backend = ScriptedBackend::reply(Some("N/A"), Some("led-billsum"));
    let detector = lexsum::PatternDetector::new([r"^N/A$"]).unwrap();
    let mut s = session(Category::Bills, backend).with_detector(Arc::new(detector));
    s.set_text("Section 1.");

    let state = s.submit().await.unwrap();
    assert_eq!(state.message(), Some(DEGENERATE_OUTPUT_MESSAGE));
}
