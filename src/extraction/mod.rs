pub mod types;
pub mod format;
pub mod pdf;
pub mod orchestrator;

pub use types::*;
pub use format::*;
pub use pdf::*;
pub use orchestrator::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The content itself cannot be turned into text. Retrying on the same
    /// bytes cannot succeed; the caller should ask for another document.
    #[error("Document unreadable: {0}")]
    DocumentUnreadable(UnreadableReason),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExtractionError {
    pub fn is_document_unreadable(&self) -> bool {
        matches!(self, Self::DocumentUnreadable(_))
    }
}

impl From<UnreadableReason> for ExtractionError {
    fn from(reason: UnreadableReason) -> Self {
        Self::DocumentUnreadable(reason)
    }
}

/// Why a document could not be converted to text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnreadableReason {
    #[error("document is empty")]
    Empty,

    #[error("document is too large ({0} bytes)")]
    TooLarge(u64),

    #[error("PDF parsing failed: {0}")]
    PdfParsing(String),

    #[error("PDF has no extractable text layer")]
    NoTextLayer,

    #[error("Text encoding error: {0}")]
    Encoding(String),

    #[error("Unsupported format for extraction ({0})")]
    UnsupportedFormat(String),
}
