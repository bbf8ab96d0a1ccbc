//! CLI binary for lexsum.
//!
//! A thin host over the library's `DocumentSession`: maps flags to the
//! session inputs, shows a spinner while the submission is pending and
//! prints the result panel.

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use lexsum::config::{DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_STUB_DELAY_MS};
use lexsum::render::{PENDING_DETAIL, PENDING_MESSAGE};
use lexsum::{
    render_json, render_result, Category, ClientConfig, DocumentSession, Palette, PatternDetector,
    SessionObserver, SubmissionState, UploadedFile,
};
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tracing_subscriber::EnvFilter;

// ── Spinner observer using indicatif ─────────────────────────────────────────

/// Spins while the session is pending and clears itself once a result
/// arrives.
struct SpinnerObserver {
    bar: ProgressBar,
}

impl SpinnerObserver {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        Arc::new(Self { bar })
    }
}

impl SessionObserver for SpinnerObserver {
    fn on_state_change(&self, state: &SubmissionState) {
        if state.is_pending() {
            self.bar.set_prefix(PENDING_MESSAGE);
            self.bar.set_message(PENDING_DETAIL);
            self.bar.enable_steady_tick(Duration::from_millis(80));
        } else {
            self.bar.finish_and_clear();
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Summarize a bill pasted on the command line
  lexsum bills --text "Section 1. This Act may be cited as ..."

  # Summarize a judgement read from stdin
  cat judgement.txt | lexsum judgements --text -

  # Upload a file instead of text
  lexsum judgements --file ruling.pdf

  # JSON output for scripting
  lexsum bills --file bill.docx --json

CATEGORIES:
  bills        POST {base}/summarize/led_billsum    (text)
  judgements   POST {base}/summarize/led_judgment   (text)
  other        under construction, no backend call
  <name>       POST {base}/summarize/file/<name>    (file uploads only)

  Files go to POST {base}/summarize/file/<category> for every category
  except `other`. Accepted formats: .txt, .pdf, .docx

ENVIRONMENT VARIABLES:
  LEXSUM_API_URL          Backend base URL (required)
  LEXSUM_TIMEOUT_SECS     Request timeout in seconds
  LEXSUM_STUB_DELAY_MS    Delay before the `other` placeholder appears
  RUST_LOG                Override log filtering

EXIT STATUS:
  0  a summary was produced
  1  the result is an error (backend error, unusable summary, network failure)
"#;

/// Summarize legal documents through a remote summarization backend.
#[derive(Parser, Debug)]
#[command(
    name = "lexsum",
    version,
    about = "Summarize legal documents (bills, judgements) through a summarization backend",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP,
    group(ArgGroup::new("source").required(true).args(["text", "file"]))
)]
struct Cli {
    /// Document category: bills, judgements, other, or a custom identifier.
    category: String,

    /// Document text to summarize. Use `-` to read from stdin.
    #[arg(long)]
    text: Option<String>,

    /// Document file to upload (.txt, .pdf, .docx).
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Backend base URL, e.g. http://localhost:8000.
    #[arg(long, env = "LEXSUM_API_URL")]
    base_url: String,

    /// Request timeout in seconds (0 = none).
    #[arg(long, env = "LEXSUM_TIMEOUT_SECS", default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    timeout: u64,

    /// Delay before the under-construction placeholder, in milliseconds.
    #[arg(long, env = "LEXSUM_STUB_DELAY_MS", default_value_t = DEFAULT_STUB_DELAY_MS)]
    stub_delay_ms: u64,

    /// Phrase marking a summary as unusable. Repeatable; replaces the default.
    #[arg(long = "degenerate-phrase")]
    degenerate_phrases: Vec<String>,

    /// Regex marking a summary as unusable. Repeatable; overrides phrases.
    #[arg(long = "degenerate-pattern")]
    degenerate_patterns: Vec<String>,

    /// Output the result state as JSON.
    #[arg(long, env = "LEXSUM_JSON")]
    json: bool,

    /// Disable the spinner.
    #[arg(long, env = "LEXSUM_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "LEXSUM_VERBOSE")]
    verbose: bool,

    /// Suppress all output except the result and errors.
    #[arg(short, long, env = "LEXSUM_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner covers progress feedback, so library INFO logs are
    // hidden while it is active.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && io::stderr().is_terminal();
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config and session ─────────────────────────────────────────
    let config = build_config(&cli)?;
    let category: Category = cli.category.parse().context("Invalid category")?;

    let mut session =
        DocumentSession::new(category, &config).context("Failed to create session")?;

    if !cli.degenerate_patterns.is_empty() {
        let detector =
            PatternDetector::new(&cli.degenerate_patterns).context("Invalid --degenerate-pattern")?;
        session = session.with_detector(Arc::new(detector));
    }
    if show_progress {
        session = session.with_observer(SpinnerObserver::new());
    }

    // ── Inputs ───────────────────────────────────────────────────────────
    if let Some(ref text) = cli.text {
        session.set_text(read_text(text).await?);
    } else if let Some(ref path) = cli.file {
        let file = UploadedFile::from_path(path)
            .await
            .with_context(|| format!("Failed to load {}", path.display()))?;
        session.select_file(file);
    }

    // ── Submit ───────────────────────────────────────────────────────────
    let state = session.submit().await.context("Submission did not start")?;

    if cli.json {
        println!("{}", render_json(state).context("Failed to serialise result")?);
    } else {
        let palette = if io::stdout().is_terminal() {
            Palette::Ansi
        } else {
            Palette::Plain
        };
        if let Some(panel) = render_result(state, palette) {
            println!("{panel}");
        }
    }

    Ok(if state.is_error() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// Map CLI args to `ClientConfig`.
fn build_config(cli: &Cli) -> Result<ClientConfig> {
    let mut builder = ClientConfig::builder()
        .base_url(&cli.base_url)
        .request_timeout_secs(cli.timeout)
        .stub_delay_ms(cli.stub_delay_ms);

    if !cli.degenerate_phrases.is_empty() {
        builder = builder.degenerate_phrases(cli.degenerate_phrases.clone());
    }

    builder.build().context("Invalid configuration")
}

/// Resolve `--text`, reading stdin for `-`.
async fn read_text(arg: &str) -> Result<String> {
    if arg != "-" {
        return Ok(arg.to_string());
    }
    let mut text = String::new();
    tokio::io::stdin()
        .read_to_string(&mut text)
        .await
        .context("Failed to read text from stdin")?;
    Ok(text)
}
