pub mod cli;
pub mod config;
pub mod extraction; // Document → plain text
pub mod reconcile; // Plain text → continued / new / discontinued

pub use extraction::{extract_text, Document, ExtractedText, ExtractionError, UnreadableReason};
pub use reconcile::{
    extract_medications, reconcile, MedicationSet, MedicationVocabulary, ReconciliationResult,
};

use tracing_subscriber::EnvFilter;

/// Install the fmt subscriber on stderr, honoring `RUST_LOG`.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();
}
