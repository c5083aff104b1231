use serde::{Deserialize, Serialize};

/// Broad document categories we recognize
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FileCategory {
    Pdf,
    PlainText,
    Image,
    Unsupported,
}

impl FileCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::PlainText => "plain_text",
            Self::Image => "image",
            Self::Unsupported => "unsupported",
        }
    }

    /// Only PDFs with a text layer and plain text can be read without OCR.
    pub fn is_extractable(&self) -> bool {
        matches!(self, Self::Pdf | Self::PlainText)
    }
}

/// Result of format detection
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FormatDetection {
    pub mime_type: &'static str,
    pub category: FileCategory,
}

/// Bytes inspected when deciding whether content is text.
const TEXT_SNIFF_BYTES: usize = 4096;

/// Detect document format from magic bytes (NOT file names).
pub fn detect_format(bytes: &[u8]) -> FormatDetection {
    let (mime_type, category) = match bytes {
        // PDF: starts with %PDF
        [0x25, 0x50, 0x44, 0x46, ..] => ("application/pdf", FileCategory::Pdf),
        // JPEG: starts with FF D8 FF
        [0xFF, 0xD8, 0xFF, ..] => ("image/jpeg", FileCategory::Image),
        // PNG: starts with 89 50 4E 47
        [0x89, 0x50, 0x4E, 0x47, ..] => ("image/png", FileCategory::Image),
        // TIFF: little-endian (49 49 2A 00) or big-endian (4D 4D 00 2A)
        [0x49, 0x49, 0x2A, 0x00, ..] | [0x4D, 0x4D, 0x00, 0x2A, ..] => {
            ("image/tiff", FileCategory::Image)
        }
        _ if is_likely_text(bytes) => ("text/plain", FileCategory::PlainText),
        _ => ("application/octet-stream", FileCategory::Unsupported),
    };

    FormatDetection {
        mime_type,
        category,
    }
}

/// Valid UTF-8 and at least 80% printable characters (or whitespace).
fn is_likely_text(bytes: &[u8]) -> bool {
    if bytes.is_empty() {
        return false;
    }

    let head = &bytes[..bytes.len().min(TEXT_SNIFF_BYTES)];
    let text = match std::str::from_utf8(head) {
        Ok(t) => t,
        // A multi-byte sequence may be cut at the sniff boundary.
        Err(e) if e.error_len().is_none() && e.valid_up_to() > 0 => {
            match std::str::from_utf8(&head[..e.valid_up_to()]) {
                Ok(t) => t,
                Err(_) => return false,
            }
        }
        Err(_) => return false,
    };

    let total = text.chars().count();
    let printable = text
        .chars()
        .filter(|c| !c.is_control() || c.is_whitespace())
        .count();
    printable as f64 / total.max(1) as f64 > 0.80
}
