//! Transport to the summarization backend.
//!
//! [`SummaryBackend`] is the seam between the session state machine and the
//! network. [`HttpBackend`] is the real implementation; tests and embedders
//! can supply their own.
//!
//! ## Cache defeating
//!
//! Submitting the same document twice must reach the backend twice. Every
//! request carries `no-cache`/`no-store` headers and a unique `_ts` query
//! parameter, so neither the HTTP client nor an intermediate proxy can
//! answer from a stale entry.

use crate::category::Category;
use crate::classify::SummaryResponse;
use crate::config::ClientConfig;
use crate::error::SummarizeError;
use crate::input::InputPayload;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CACHE_CONTROL, EXPIRES, PRAGMA};
use reqwest::multipart::{Form, Part};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};

/// Query parameter name used for cache busting.
pub const CACHE_BUSTER_PARAM: &str = "_ts";

/// Sends a document to be summarized.
#[async_trait]
pub trait SummaryBackend: Send + Sync {
    /// Summarize `payload` as a document of `category`.
    ///
    /// Endpoint resolution failures are returned before any I/O.
    async fn summarize(
        &self,
        category: &Category,
        payload: &InputPayload,
    ) -> Result<SummaryResponse, SummarizeError>;
}

static CACHE_BUSTER_SEQ: AtomicU64 = AtomicU64::new(0);

/// Unique value for the cache-busting query parameter.
///
/// Wall-clock milliseconds plus a process-wide sequence number, so two
/// requests in the same millisecond still differ.
pub fn cache_buster() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let seq = CACHE_BUSTER_SEQ.fetch_add(1, Ordering::Relaxed);
    format!("{millis}-{seq}")
}

fn no_cache_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        CACHE_CONTROL,
        HeaderValue::from_static("no-cache, no-store, must-revalidate"),
    );
    headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(EXPIRES, HeaderValue::from_static("0"));
    headers
}

#[derive(Serialize)]
struct TextRequest<'a> {
    text: &'a str,
}

/// HTTP implementation of [`SummaryBackend`] built on `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
    timeout_secs: u64,
}

impl HttpBackend {
    pub fn new(config: &ClientConfig) -> Result<Self, SummarizeError> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| SummarizeError::InvalidConfig(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            timeout_secs: config.request_timeout_secs,
        })
    }

    /// Build (but do not send) the request for a submission.
    pub fn build_request(
        &self,
        category: &Category,
        payload: &InputPayload,
    ) -> Result<reqwest::RequestBuilder, SummarizeError> {
        let request = match payload {
            InputPayload::Text(text) => {
                let url = format!("{}{}", self.base_url, category.text_endpoint()?);
                self.client.post(url).json(&TextRequest { text })
            }
            InputPayload::File(file) => {
                let url = format!("{}{}", self.base_url, category.file_endpoint()?);
                let part = Part::bytes(file.bytes.clone())
                    .file_name(file.name.clone())
                    .mime_str(file.mime)
                    .map_err(|e| SummarizeError::Request {
                        url: url.clone(),
                        source: e,
                    })?;
                self.client.post(url).multipart(Form::new().part("file", part))
            }
        };

        Ok(request
            .headers(no_cache_headers())
            .query(&[(CACHE_BUSTER_PARAM, cache_buster())]))
    }

    fn transport_error(&self, url: &str, e: reqwest::Error) -> SummarizeError {
        if e.is_timeout() {
            SummarizeError::Timeout {
                url: url.to_string(),
                secs: self.timeout_secs,
            }
        } else {
            SummarizeError::Request {
                url: url.to_string(),
                source: e,
            }
        }
    }
}

#[async_trait]
impl SummaryBackend for HttpBackend {
    async fn summarize(
        &self,
        category: &Category,
        payload: &InputPayload,
    ) -> Result<SummaryResponse, SummarizeError> {
        let request = self
            .build_request(category, payload)?
            .build()
            .map_err(|e| SummarizeError::Request {
                url: self.base_url.clone(),
                source: e,
            })?;
        let url = request.url().to_string();

        info!(
            category = %category,
            input = payload.kind(),
            "Submitting document for summarization"
        );
        debug!("POST {}", url);

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| self.transport_error(&url, e))?;

        // The backend reports failures in the body (model_used = "error"),
        // often with a 5xx status, so the body is parsed either way.
        let status = response.status();
        if !status.is_success() {
            warn!("Backend returned HTTP {} for {}", status, url);
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(&url, e))?;

        serde_json::from_str(&body).map_err(|e| SummarizeError::Decode {
            url,
            detail: e.to_string(),
        })
    }
}
