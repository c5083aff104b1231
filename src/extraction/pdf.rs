use std::panic::{self, AssertUnwindSafe};

use super::types::{PageExtraction, PdfExtractor};
use super::{ExtractionError, UnreadableReason};

/// PDF text extractor using the pdf-extract crate.
/// Handles digital PDFs with embedded text layers; scanned pages come back empty.
pub struct PdfTextExtractor;

impl PdfExtractor for PdfTextExtractor {
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<PageExtraction>, ExtractionError> {
        // pdf-extract can panic on malformed fonts or content streams.
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem_by_pages(pdf_bytes)
        }));

        let page_texts = match outcome {
            Ok(Ok(pages)) => pages,
            Ok(Err(e)) => return Err(UnreadableReason::PdfParsing(e.to_string()).into()),
            Err(_) => {
                tracing::warn!(size = pdf_bytes.len(), "PDF parser panicked");
                return Err(
                    UnreadableReason::PdfParsing("parser aborted on malformed content".into())
                        .into(),
                )
            }
        };

        let pages = page_texts
            .into_iter()
            .enumerate()
            .map(|(i, text)| PageExtraction {
                page_number: i + 1,
                text,
            })
            .collect();

        Ok(pages)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Build a PDF with one page per entry in `lines` using lopdf
    /// (the library pdf-extract uses internally).
    pub(crate) fn make_test_pdf(lines: &[&str]) -> Vec<u8> {
        use lopdf::dictionary;
        use lopdf::{Document, Object, Stream};

        let mut doc = Document::with_version("1.4");

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });

        let pages_id = doc.new_object_id();
        let mut kids: Vec<Object> = Vec::new();

        for text in lines {
            let content = format!("BT /F1 12 Tf 100 700 Td ({text}) Tj ET");
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));

            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
                "Contents" => content_id,
                "Resources" => dictionary! {
                    "Font" => dictionary! {
                        "F1" => font_id,
                    },
                },
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    #[test]
    fn extract_text_from_digital_pdf() {
        let pdf_bytes = make_test_pdf(&["Take aspirin and ibuprofen daily"]);
        let pages = PdfTextExtractor.extract_pages(&pdf_bytes).unwrap();

        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].page_number, 1);
        assert!(
            pages[0].text.contains("aspirin"),
            "Expected text to contain 'aspirin', got: {}",
            pages[0].text
        );
    }

    #[test]
    fn one_extraction_per_page() {
        let pdf_bytes = make_test_pdf(&["Page one aleve", "Page two advil"]);
        let pages = PdfTextExtractor.extract_pages(&pdf_bytes).unwrap();

        assert_eq!(pages.len(), 2);
        assert!(pages[0].text.contains("aleve"));
        assert!(pages[1].text.contains("advil"));
        assert_eq!(pages[1].page_number, 2);
    }

    #[test]
    fn invalid_pdf_is_unreadable() {
        let err = PdfTextExtractor
            .extract_pages(b"%PDF-1.4 truncated garbage")
            .unwrap_err();
        assert!(matches!(
            err,
            ExtractionError::DocumentUnreadable(UnreadableReason::PdfParsing(_))
        ));
    }

    #[test]
    fn non_pdf_bytes_are_unreadable() {
        let err = PdfTextExtractor.extract_pages(b"not a pdf").unwrap_err();
        assert!(err.is_document_unreadable());
    }
}
