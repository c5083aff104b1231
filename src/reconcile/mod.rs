//! Medication extraction and prescription comparison.
//!
//! Pure functions over text: no I/O, no shared mutable state. The default
//! vocabulary is a process-wide immutable static, so reconciliations can run
//! concurrently without coordination.

pub mod diff;
pub mod vocabulary;

pub use diff::*;
pub use vocabulary::*;

/// Recognized medications in `text`, using the built-in vocabulary.
pub fn extract_medications(text: &str) -> MedicationSet {
    MedicationVocabulary::builtin().extract(text)
}

/// Compare two prescription texts using the built-in vocabulary.
pub fn reconcile(previous: &str, latest: &str) -> ReconciliationResult {
    MedicationVocabulary::builtin().reconcile(previous, latest)
}
