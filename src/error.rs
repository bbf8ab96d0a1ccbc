//! Error types for the lexsum library.
//!
//! Every failure a submission can hit is a [`SummarizeError`]. Most of them
//! never reach the caller of [`crate::session::DocumentSession::submit`]:
//! the session folds them into a visible [`crate::session::SubmissionState::Error`]
//! so the host always has something to render. Only caller mistakes
//! (submitting while disabled) come back as `Err`.
//!
//! Transport-class errors ([`SummarizeError::is_transport`]) all collapse to
//! the same generic "network error" message. There is no transient vs.
//! permanent distinction and nothing is retried.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the lexsum library.
#[derive(Debug, Error)]
pub enum SummarizeError {
    // ── Category errors ───────────────────────────────────────────────────
    /// The category string is empty or contains characters that cannot be
    /// used in an endpoint path.
    #[error("Invalid category '{input}': use bills, judgements, other, or an identifier of [A-Za-z0-9_-]")]
    InvalidCategory { input: String },

    /// The category has no backend endpoint for this kind of input.
    #[error("Unsupported category '{category}' for {input} input.\nSupported: bills, judgements.")]
    UnsupportedCategory {
        category: String,
        input: &'static str,
    },

    // ── Input errors ──────────────────────────────────────────────────────
    /// Neither text nor a file was provided.
    #[error("No input provided: paste some text or select a file")]
    NoInput,

    /// `submit()` was called while the submit control is disabled
    /// (no input, or a submission is already pending).
    #[error("Submit is disabled: {reason}")]
    SubmitDisabled { reason: &'static str },

    /// The selected file has an extension the backend does not accept.
    #[error("Unsupported file type '{name}'\nAccepted formats: {accepted}")]
    UnsupportedFileType { name: String, accepted: String },

    /// The selected file does not exist.
    #[error("File not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// The selected file exists but could not be read.
    #[error("Failed to read '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// No backend base URL was configured.
    #[error("Backend URL is not configured.\nSet LEXSUM_API_URL or pass --base-url.")]
    MissingBaseUrl,

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Transport errors ──────────────────────────────────────────────────
    /// The request could not be sent or the connection failed.
    #[error("Request to '{url}' failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The request exceeded the configured timeout.
    #[error("Request to '{url}' timed out after {secs}s")]
    Timeout { url: String, secs: u64 },

    /// The response body was not the expected JSON shape.
    #[error("Could not decode response from '{url}': {detail}")]
    Decode { url: String, detail: String },
}

impl SummarizeError {
    /// True for failures of the network round-trip itself: connection,
    /// timeout, or an unreadable response body.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            SummarizeError::Request { .. }
                | SummarizeError::Timeout { .. }
                | SummarizeError::Decode { .. }
        )
    }
}
