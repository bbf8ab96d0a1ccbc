//! Client configuration.
//!
//! Everything a [`crate::session::DocumentSession`] needs from the outside
//! world lives in [`ClientConfig`]: the backend base URL, transport
//! timeout, and the knobs of the under-construction stub and the
//! degenerate-output detector. It is resolved once at startup, either via
//! [`ClientConfig::builder()`] or [`ClientConfig::from_env()`], and passed
//! into the session explicitly.

use crate::classify::KNOWN_DEGENERATE_PHRASE;
use crate::error::SummarizeError;
use std::env;
use std::time::Duration;

/// Environment variable holding the backend base URL.
pub const ENV_API_URL: &str = "LEXSUM_API_URL";
/// Environment variable overriding the request timeout (seconds).
pub const ENV_TIMEOUT_SECS: &str = "LEXSUM_TIMEOUT_SECS";
/// Environment variable overriding the stub delay (milliseconds).
pub const ENV_STUB_DELAY_MS: &str = "LEXSUM_STUB_DELAY_MS";

/// Request timeout used unless configured otherwise.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Delay before the under-construction placeholder is shown.
pub const DEFAULT_STUB_DELAY_MS: u64 = 800;

/// Configuration for talking to the summarization backend.
///
/// # Example
/// ```rust
/// use lexsum::ClientConfig;
///
/// let config = ClientConfig::builder()
///     .base_url("http://localhost:8000/")
///     .request_timeout_secs(60)
///     .build()
///     .unwrap();
/// assert_eq!(config.base_url, "http://localhost:8000");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Backend base URL without a trailing slash, e.g. `http://localhost:8000`.
    pub base_url: String,

    /// Whole-request timeout in seconds. `0` leaves the transport default
    /// (no timeout). Default: 120.
    ///
    /// Summarizing a long judgement on a CPU-bound backend can take well
    /// over a minute.
    pub request_timeout_secs: u64,

    /// How long the under-construction category pretends to work before
    /// showing its placeholder, in milliseconds. Default: 800.
    pub stub_delay_ms: u64,

    /// `User-Agent` header for every request.
    pub user_agent: String,

    /// Phrases that mark a summary as a non-answer.
    /// Default: the bill model's "not been amended" boilerplate.
    pub degenerate_phrases: Vec<String>,
}

impl ClientConfig {
    /// Create a new builder for `ClientConfig`.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder {
            base_url: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            stub_delay_ms: DEFAULT_STUB_DELAY_MS,
            user_agent: concat!("lexsum/", env!("CARGO_PKG_VERSION")).to_string(),
            degenerate_phrases: vec![KNOWN_DEGENERATE_PHRASE.to_string()],
        }
    }

    /// Load configuration from `LEXSUM_*` environment variables.
    ///
    /// `LEXSUM_API_URL` is required.
    pub fn from_env() -> Result<Self, SummarizeError> {
        let mut builder = Self::builder();
        if let Ok(url) = env::var(ENV_API_URL) {
            builder = builder.base_url(url);
        }
        if let Some(secs) = parse_env(ENV_TIMEOUT_SECS)? {
            builder = builder.request_timeout_secs(secs);
        }
        if let Some(ms) = parse_env(ENV_STUB_DELAY_MS)? {
            builder = builder.stub_delay_ms(ms);
        }
        builder.build()
    }

    /// `None` when no timeout is configured.
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }

    pub fn stub_delay(&self) -> Duration {
        Duration::from_millis(self.stub_delay_ms)
    }
}

fn parse_env(key: &str) -> Result<Option<u64>, SummarizeError> {
    match env::var(key) {
        Ok(v) => v
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| {
                SummarizeError::InvalidConfig(format!("{key} must be an integer, got '{v}'"))
            }),
        Err(_) => Ok(None),
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug)]
pub struct ClientConfigBuilder {
    base_url: Option<String>,
    request_timeout_secs: u64,
    stub_delay_ms: u64,
    user_agent: String,
    degenerate_phrases: Vec<String>,
}

impl ClientConfigBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    pub fn stub_delay_ms(mut self, ms: u64) -> Self {
        self.stub_delay_ms = ms;
        self
    }

    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = ua.into();
        self
    }

    /// Replace the degenerate-output phrase list.
    pub fn degenerate_phrases<I, S>(mut self, phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.degenerate_phrases = phrases.into_iter().map(Into::into).collect();
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ClientConfig, SummarizeError> {
        let base_url = self
            .base_url
            .map(|u| u.trim().trim_end_matches('/').to_string())
            .filter(|u| !u.is_empty())
            .ok_or(SummarizeError::MissingBaseUrl)?;

        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(SummarizeError::InvalidConfig(format!(
                "base URL must start with http:// or https://, got '{base_url}'"
            )));
        }
        if reqwest::Url::parse(&base_url).is_err() {
            return Err(SummarizeError::InvalidConfig(format!(
                "base URL is not a valid URL: '{base_url}'"
            )));
        }
        if self.user_agent.trim().is_empty() {
            return Err(SummarizeError::InvalidConfig("user agent must not be empty".into()));
        }

        Ok(ClientConfig {
            base_url,
            request_timeout_secs: self.request_timeout_secs,
            stub_delay_ms: self.stub_delay_ms,
            user_agent: self.user_agent,
            degenerate_phrases: self.degenerate_phrases,
        })
    }
}
