use super::format::{detect_format, FileCategory};
use super::pdf::PdfTextExtractor;
use super::types::{Document, ExtractedText, PdfExtractor, TextExtractor};
use super::{ExtractionError, UnreadableReason};
use crate::config::MAX_DOCUMENT_BYTES;

/// Concrete implementation of the text extractor.
/// Holds the PDF backend as a trait object, enabling dependency injection.
pub struct DocumentExtractor {
    pdf_extractor: Box<dyn PdfExtractor + Send + Sync>,
    max_document_bytes: u64,
}

impl DocumentExtractor {
    pub fn new(pdf_extractor: Box<dyn PdfExtractor + Send + Sync>) -> Self {
        Self {
            pdf_extractor,
            max_document_bytes: MAX_DOCUMENT_BYTES,
        }
    }

    pub fn with_max_document_bytes(mut self, limit: u64) -> Self {
        self.max_document_bytes = limit;
        self
    }
}

impl Default for DocumentExtractor {
    fn default() -> Self {
        Self::new(Box::new(PdfTextExtractor))
    }
}

impl TextExtractor for DocumentExtractor {
    fn extract(&self, document: Document) -> Result<ExtractedText, ExtractionError> {
        let document_id = document.id;
        let size = document.len() as u64;

        if document.is_empty() {
            return Err(UnreadableReason::Empty.into());
        }
        if size > self.max_document_bytes {
            return Err(UnreadableReason::TooLarge(size).into());
        }

        let format = detect_format(document.bytes());
        tracing::info!(
            document_id = %document_id,
            label = document.label.as_deref().unwrap_or("-"),
            category = format.category.as_str(),
            size,
            "Starting text extraction"
        );

        let text = match format.category {
            FileCategory::Pdf => {
                let pages = self.pdf_extractor.extract_pages(document.bytes())?;
                if !pages.iter().any(|p| p.has_text()) {
                    tracing::warn!(
                        document_id = %document_id,
                        page_count = pages.len(),
                        "PDF has no text layer"
                    );
                    return Err(UnreadableReason::NoTextLayer.into());
                }
                pages
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("\n")
            }
            FileCategory::PlainText => String::from_utf8(document.into_bytes())
                .map_err(|e| UnreadableReason::Encoding(e.to_string()))?,
            FileCategory::Image | FileCategory::Unsupported => {
                return Err(UnreadableReason::UnsupportedFormat(format.mime_type.into()).into());
            }
        };

        tracing::info!(
            document_id = %document_id,
            chars = text.chars().count(),
            "Text extraction complete"
        );

        Ok(ExtractedText::from(text))
    }
}

/// Extract text from a document with the default PDF backend.
pub fn extract_text(document: Document) -> Result<ExtractedText, ExtractionError> {
    DocumentExtractor::default().extract(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::pdf::tests::make_test_pdf;
    use crate::extraction::PageExtraction;

    /// Mock PDF extractor for testing
    struct MockPdfExtractor {
        pages: Vec<PageExtraction>,
    }

    impl MockPdfExtractor {
        fn with_pages(texts: &[&str]) -> Self {
            Self {
                pages: texts
                    .iter()
                    .enumerate()
                    .map(|(i, t)| PageExtraction {
                        page_number: i + 1,
                        text: t.to_string(),
                    })
                    .collect(),
            }
        }
    }

    impl PdfExtractor for MockPdfExtractor {
        fn extract_pages(&self, _pdf_bytes: &[u8]) -> Result<Vec<PageExtraction>, ExtractionError> {
            Ok(self.pages.clone())
        }
    }

    fn mock_extractor(texts: &[&str]) -> DocumentExtractor {
        DocumentExtractor::new(Box::new(MockPdfExtractor::with_pages(texts)))
    }

    fn unreadable_reason(err: ExtractionError) -> UnreadableReason {
        match err {
            ExtractionError::DocumentUnreadable(reason) => reason,
            other => panic!("expected DocumentUnreadable, got {other:?}"),
        }
    }

    #[test]
    fn pdf_pages_are_joined_with_newlines() {
        let extractor = mock_extractor(&["Rx: aspirin", "Rx: aleve"]);
        let text = extractor
            .extract(Document::from_bytes(b"%PDF-1.7 fake".to_vec()))
            .unwrap();
        assert_eq!(text.as_str(), "Rx: aspirin\nRx: aleve");
    }

    #[test]
    fn pdf_without_text_layer_is_unreadable() {
        let extractor = mock_extractor(&["", "   \n"]);
        let err = extractor
            .extract(Document::from_bytes(b"%PDF-1.7 scanned".to_vec()))
            .unwrap_err();
        assert_eq!(unreadable_reason(err), UnreadableReason::NoTextLayer);
    }

    #[test]
    fn pdf_with_zero_pages_is_unreadable() {
        let extractor = mock_extractor(&[]);
        let err = extractor
            .extract(Document::from_bytes(b"%PDF-1.7".to_vec()))
            .unwrap_err();
        assert_eq!(unreadable_reason(err), UnreadableReason::NoTextLayer);
    }

    #[test]
    fn plain_text_is_returned_verbatim() {
        let extractor = mock_extractor(&[]);
        let raw = "Take aspirin\n\n  and ibuprofen daily\n";
        let text = extractor.extract(Document::from_bytes(raw)).unwrap();
        assert_eq!(text.as_str(), raw);
    }

    #[test]
    fn empty_document_is_unreadable() {
        let err = extract_text(Document::from_bytes(Vec::new())).unwrap_err();
        assert_eq!(unreadable_reason(err), UnreadableReason::Empty);
    }

    #[test]
    fn oversized_document_is_unreadable() {
        let extractor = mock_extractor(&["aspirin"]).with_max_document_bytes(8);
        let err = extractor
            .extract(Document::from_bytes(b"%PDF-1.7 more than eight".to_vec()))
            .unwrap_err();
        assert_eq!(unreadable_reason(err), UnreadableReason::TooLarge(24));
    }

    #[test]
    fn image_is_unsupported() {
        let err = extract_text(Document::from_bytes(vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00]))
            .unwrap_err();
        assert_eq!(
            unreadable_reason(err),
            UnreadableReason::UnsupportedFormat("image/jpeg".into())
        );
    }

    #[test]
    fn corrupted_bytes_are_unreadable_not_empty_text() {
        let err = extract_text(Document::from_bytes(vec![0x00, 0x9F, 0x92, 0x96, 0xFF, 0x00]))
            .unwrap_err();
        assert!(err.is_document_unreadable());
    }

    #[test]
    fn corrupted_pdf_is_unreadable() {
        let err = extract_text(Document::from_bytes(b"%PDF-1.4\nthis is not a real pdf".to_vec()))
            .unwrap_err();
        assert!(matches!(
            unreadable_reason(err),
            UnreadableReason::PdfParsing(_)
        ));
    }

    #[test]
    fn real_pdf_round_trip() {
        let bytes = make_test_pdf(&["Take aspirin and aleve daily"]);
        let text = extract_text(Document::from_bytes(bytes).with_label("latest.pdf")).unwrap();
        assert!(text.contains("aspirin"), "got: {text}");
        assert!(text.contains("aleve"), "got: {text}");
    }
}
