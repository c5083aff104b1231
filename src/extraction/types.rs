use std::fmt;
use std::ops::Deref;
use std::path::Path;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ExtractionError, UnreadableReason};
use crate::config::MAX_DOCUMENT_BYTES;

/// Raw content of one prescription as handed over by the caller.
///
/// Consumed by value during extraction; the bytes are dropped as soon as
/// text has been produced.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: Uuid,
    pub label: Option<String>,
    bytes: Vec<u8>,
}

impl Document {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            id: Uuid::new_v4(),
            label: None,
            bytes: bytes.into(),
        }
    }

    /// Read a document from disk. The file name becomes the label.
    pub fn from_path(path: &Path) -> Result<Self, ExtractionError> {
        Self::from_path_with_limit(path, MAX_DOCUMENT_BYTES)
    }

    /// Like [`Document::from_path`], refusing files over `max_bytes`
    /// before any content is read.
    pub fn from_path_with_limit(path: &Path, max_bytes: u64) -> Result<Self, ExtractionError> {
        let file_size = std::fs::metadata(path)?.len();
        if file_size > max_bytes {
            return Err(UnreadableReason::TooLarge(file_size).into());
        }

        let bytes = std::fs::read(path)?;
        let label = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string);
        Ok(Self {
            id: Uuid::new_v4(),
            label,
            bytes,
        })
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Plain text produced from a [`Document`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtractedText(String);

impl ExtractedText {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Deref for ExtractedText {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ExtractedText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for ExtractedText {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl From<&str> for ExtractedText {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}

impl fmt::Display for ExtractedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Text of a single PDF page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageExtraction {
    pub page_number: usize,
    pub text: String,
}

impl PageExtraction {
    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }
}

/// PDF text extraction abstraction
pub trait PdfExtractor {
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<PageExtraction>, ExtractionError>;
}

/// Document-to-text abstraction (allows mocking for tests)
pub trait TextExtractor {
    fn extract(&self, document: Document) -> Result<ExtractedText, ExtractionError>;
}
