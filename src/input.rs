//! Input coordination: pasted text or an uploaded file, never both.
//!
//! The two sources are mutually exclusive. Typing non-blank text drops the
//! selected file; selecting a file drops the text. [`InputCoordinator::payload`]
//! turns whichever source is active into the [`InputPayload`] sent to the
//! backend.

use crate::error::SummarizeError;
use std::path::Path;
use tracing::debug;

/// File extensions the backend knows how to read.
pub const ACCEPTED_FORMATS: &[&str] = &[".txt", ".pdf", ".docx"];

/// A document selected for upload, held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// File name sent in the multipart part (no directory components).
    pub name: String,
    pub bytes: Vec<u8>,
    pub mime: &'static str,
}

impl UploadedFile {
    /// Read a file from disk, rejecting unsupported extensions before any I/O.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, SummarizeError> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mime = mime_for(&name)?;

        let bytes = tokio::fs::read(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SummarizeError::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                SummarizeError::FileRead {
                    path: path.to_path_buf(),
                    source: e,
                }
            }
        })?;

        debug!("Loaded upload '{}' ({} bytes, {})", name, bytes.len(), mime);
        Ok(Self { name, bytes, mime })
    }

    /// Build an upload from bytes already in memory.
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, SummarizeError> {
        let name = name.into();
        let mime = mime_for(&name)?;
        Ok(Self { name, bytes, mime })
    }
}

fn mime_for(name: &str) -> Result<&'static str, SummarizeError> {
    let lower = name.to_lowercase();
    let mime = if lower.ends_with(".txt") {
        "text/plain"
    } else if lower.ends_with(".pdf") {
        "application/pdf"
    } else if lower.ends_with(".docx") {
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
    } else {
        return Err(SummarizeError::UnsupportedFileType {
            name: name.to_string(),
            accepted: ACCEPTED_FORMATS.join(", "),
        });
    };
    Ok(mime)
}

/// What gets sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputPayload {
    Text(String),
    File(UploadedFile),
}

impl InputPayload {
    /// Short label for logs and error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            InputPayload::Text(_) => "text",
            InputPayload::File(_) => "file",
        }
    }
}

/// Holds the text box contents and the selected file.
#[derive(Debug, Clone, Default)]
pub struct InputCoordinator {
    text: String,
    file: Option<UploadedFile>,
}

impl InputCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the text. Non-blank text clears the selected file.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        if !self.text.trim().is_empty() {
            self.file = None;
        }
    }

    /// Select a file. Always clears the text.
    pub fn select_file(&mut self, file: UploadedFile) {
        self.text.clear();
        self.file = Some(file);
    }

    pub fn clear_file(&mut self) {
        self.file = None;
    }

    /// Reset both sources.
    pub fn clear(&mut self) {
        self.text.clear();
        self.file = None;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn file(&self) -> Option<&UploadedFile> {
        self.file.as_ref()
    }

    /// True when there is something worth submitting.
    pub fn has_input(&self) -> bool {
        !self.text.trim().is_empty() || self.file.is_some()
    }

    /// The active source, text first.
    ///
    /// The text is sent as typed; trimming only decides whether it counts.
    pub fn payload(&self) -> Option<InputPayload> {
        if !self.text.trim().is_empty() {
            Some(InputPayload::Text(self.text.clone()))
        } else {
            self.file.clone().map(InputPayload::File)
        }
    }
}
