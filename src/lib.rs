//! # lexsum
//!
//! Summarize legal documents through a remote summarization backend.
//!
//! A user hands in a document as pasted text or as a file (`.txt`, `.pdf`,
//! `.docx`). The document's **category** picks the backend endpoint; the
//! JSON reply is classified into a summary or an error, and a host renders
//! it.
//!
//! ## Flow
//!
//! ```text
//! text / file
//!  │
//!  ├─ 1. Input     mutually exclusive text or file   (input)
//!  ├─ 2. Category  exhaustive category → endpoint    (category)
//!  ├─ 3. Request   JSON or multipart, cache-busted    (backend)
//!  ├─ 4. Classify  backend error / degenerate / ok    (classify)
//!  └─ 5. Render    titled panel, error or success     (render)
//! ```
//!
//! [`DocumentSession`] ties the steps together as a small state machine.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lexsum::{Category, ClientConfig, DocumentSession, Palette, render_result};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // LEXSUM_API_URL=http://localhost:8000
//!     let config = ClientConfig::from_env()?;
//!     let mut session = DocumentSession::new(Category::Bills, &config)?;
//!     session.set_text("Section 1. This Act may be cited as ...");
//!     let state = session.submit().await?;
//!     if let Some(panel) = render_result(state, Palette::Plain) {
//!         println!("{panel}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `lexsum` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod backend;
pub mod category;
pub mod classify;
pub mod config;
pub mod error;
pub mod input;
pub mod render;
pub mod session;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use backend::{HttpBackend, SummaryBackend};
pub use category::{Category, CategoryId};
pub use classify::{
    classify, DegenerateOutputDetector, PatternDetector, PhraseDetector, SummaryResponse,
};
pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::SummarizeError;
pub use input::{InputCoordinator, InputPayload, UploadedFile};
pub use render::{render_json, render_result, Palette};
pub use session::{DocumentSession, NoopObserver, SessionObserver, SubmissionState};
