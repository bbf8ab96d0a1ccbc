//! Response classification: turn a backend reply into a display state.
//!
//! A `200 OK` does not mean the summary is usable. Each reply lands in
//! exactly one of three buckets, checked in this order:
//!
//! 1. **Backend error**: `model_used` is the reserved [`ERROR_SENTINEL`].
//!    The backend's own summary text is shown as the error message.
//! 2. **Degenerate output**: the summary trips the configured
//!    [`DegenerateOutputDetector`]. The text is replaced with
//!    [`DEGENERATE_OUTPUT_MESSAGE`]; the model label is kept.
//! 3. **Success**: everything else, with fallbacks for absent fields.
//!
//! The degenerate-output rule is a pattern tied to one model's failure mode,
//! so it sits behind a trait and can be swapped without touching
//! [`crate::session`].

use crate::error::SummarizeError;
use crate::session::SubmissionState;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// `model_used` value the backend returns when it failed.
pub const ERROR_SENTINEL: &str = "error";

/// Shown when the reply has no `summary` field.
pub const NO_SUMMARY_FALLBACK: &str = "❌ No summary returned.";

/// Shown when the reply has no `model_used` field.
pub const UNKNOWN_MODEL: &str = "unknown";

/// Replaces a summary flagged as degenerate.
pub const DEGENERATE_OUTPUT_MESSAGE: &str =
    "❌ The model could not generate a valid summary for this document. Please try a different document.";

/// Shown for any connection, timeout, or decode failure.
pub const NETWORK_ERROR_MESSAGE: &str = "❌ Something went wrong. Please try again.";

/// Result for categories whose backend does not exist yet.
pub const UNDER_CONSTRUCTION_MESSAGE: &str = "🚧 This feature is currently under construction.";

/// Boilerplate the bill model emits when it has nothing to say.
pub const KNOWN_DEGENERATE_PHRASE: &str = "This measure has not been amended";

/// JSON body returned by every summarize endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryResponse {
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub model_used: Option<String>,
}

/// Decides whether a summary is a non-answer.
pub trait DegenerateOutputDetector: Send + Sync {
    fn is_degenerate(&self, summary: &str) -> bool;
}

static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Flags summaries containing any of a list of phrases.
///
/// Runs of whitespace are collapsed on both sides before matching, so a
/// phrase broken across lines still matches.
#[derive(Debug, Clone)]
pub struct PhraseDetector {
    phrases: Vec<String>,
}

impl PhraseDetector {
    pub fn new<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            phrases: phrases
                .into_iter()
                .map(|p| collapse_whitespace(p.as_ref()))
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }
}

impl Default for PhraseDetector {
    fn default() -> Self {
        Self::new([KNOWN_DEGENERATE_PHRASE])
    }
}

impl DegenerateOutputDetector for PhraseDetector {
    fn is_degenerate(&self, summary: &str) -> bool {
        let haystack = collapse_whitespace(summary);
        self.phrases.iter().any(|p| haystack.contains(p.as_str()))
    }
}

fn collapse_whitespace(s: &str) -> String {
    RE_WHITESPACE.replace_all(s.trim(), " ").into_owned()
}

/// Flags summaries matching any of a list of regular expressions.
#[derive(Debug, Clone)]
pub struct PatternDetector {
    patterns: Vec<Regex>,
}

impl PatternDetector {
    pub fn new<I, S>(patterns: I) -> Result<Self, SummarizeError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| {
                Regex::new(p.as_ref()).map_err(|e| {
                    SummarizeError::InvalidConfig(format!(
                        "bad degenerate-output pattern '{}': {}",
                        p.as_ref(),
                        e
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }
}

impl DegenerateOutputDetector for PatternDetector {
    fn is_degenerate(&self, summary: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(summary))
    }
}

/// Classify a decoded backend reply.
pub fn classify(
    response: SummaryResponse,
    detector: &dyn DegenerateOutputDetector,
) -> SubmissionState {
    let SummaryResponse {
        summary,
        model_used,
    } = response;

    if model_used.as_deref() == Some(ERROR_SENTINEL) {
        return SubmissionState::Error {
            message: non_empty(summary).unwrap_or_else(|| NO_SUMMARY_FALLBACK.to_string()),
            model: Some(ERROR_SENTINEL.to_string()),
        };
    }

    let model = non_empty(model_used).unwrap_or_else(|| UNKNOWN_MODEL.to_string());

    match non_empty(summary) {
        Some(text) if detector.is_degenerate(&text) => SubmissionState::Error {
            message: DEGENERATE_OUTPUT_MESSAGE.to_string(),
            model: Some(model),
        },
        Some(text) => SubmissionState::Success {
            summary: text,
            model: Some(model),
        },
        None => SubmissionState::Success {
            summary: NO_SUMMARY_FALLBACK.to_string(),
            model: Some(model),
        },
    }
}

/// State shown after a connection, timeout, or decode failure.
pub fn network_error() -> SubmissionState {
    SubmissionState::Error {
        message: NETWORK_ERROR_MESSAGE.to_string(),
        model: Some(ERROR_SENTINEL.to_string()),
    }
}

// Empty strings count as absent, as they did for the web client.
fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.is_empty())
}
