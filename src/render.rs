//! Result display: a pure function of [`SubmissionState`].
//!
//! Nothing is drawn while idle or pending. Otherwise the panel is:
//!
//! ```text
//! Model Used: led-billsum      (only when the result names a model)
//! Summary                      (or "Error")
//! <text, verbatim>
//! ```

use crate::session::SubmissionState;

/// Shown by hosts on the submit control while a request is in flight.
pub const PENDING_MESSAGE: &str = "Summarizing… Please wait";

/// Shown by hosts next to the progress indicator.
pub const PENDING_DETAIL: &str = "Your document is being analyzed and summarized…";

/// Colour scheme for the result panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Palette {
    /// No escape codes.
    #[default]
    Plain,
    /// ANSI colours: green for success, red for errors.
    Ansi,
}

impl Palette {
    fn paint(self, code: &str, s: &str) -> String {
        match self {
            Palette::Plain => s.to_string(),
            Palette::Ansi => format!("\x1b[{code}m{s}\x1b[0m"),
        }
    }

    fn title(self, s: &str, is_error: bool) -> String {
        self.paint(if is_error { "1;31" } else { "1;32" }, s)
    }

    fn label(self, s: &str, is_error: bool) -> String {
        self.paint(if is_error { "31" } else { "32" }, s)
    }
}

/// Render the result panel, or `None` when there is nothing to show.
///
/// The summary text is emitted exactly as received.
pub fn render_result(state: &SubmissionState, palette: Palette) -> Option<String> {
    let text = state.message()?;
    let is_error = state.is_error();

    let mut out = String::new();
    if let Some(model) = state.model() {
        out.push_str(&palette.label(&format!("Model Used: {model}"), is_error));
        out.push('\n');
    }
    out.push_str(&palette.title(if is_error { "Error" } else { "Summary" }, is_error));
    out.push('\n');
    out.push_str(text);
    Some(out)
}

/// Machine-readable form of the state.
pub fn render_json(state: &SubmissionState) -> serde_json::Result<String> {
    serde_json::to_string_pretty(state)
}
