//! Closed vocabulary of recognized medication names.
//!
//! A vocabulary is a table of entries, each pairing one canonical name with
//! the surface forms that should be reported under it. The whole table is
//! compiled into a single case-insensitive pattern with one capture group per
//! surface form, so a match maps straight back to its canonical name.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::diff::{MedicationSet, ReconciliationResult};

#[derive(Error, Debug)]
pub enum VocabularyError {
    #[error("Failed to read vocabulary file {0}: {1}")]
    Load(String, String),

    #[error("Failed to parse vocabulary file {0}: {1}")]
    Parse(String, String),

    #[error("Vocabulary has no entries")]
    Empty,

    #[error("Vocabulary entry {0} has a blank name")]
    BlankName(usize),

    #[error("Canonical name '{0}' appears more than once")]
    DuplicateCanonical(String),

    #[error("Surface form '{form}' is claimed by both '{first}' and '{second}'")]
    ConflictingSurfaceForm {
        form: String,
        first: String,
        second: String,
    },

    #[error("Failed to compile vocabulary pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// One medication: its canonical name plus accepted alternative spellings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyEntry {
    pub canonical: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl VocabularyEntry {
    pub fn new(canonical: &str) -> Self {
        Self {
            canonical: canonical.into(),
            aliases: vec![],
        }
    }

    pub fn with_aliases(canonical: &str, aliases: &[&str]) -> Self {
        Self {
            canonical: canonical.into(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
        }
    }
}

/// Names recognized out of the box. Each name is reported as itself.
pub const DEFAULT_MEDICATIONS: &[&str] = &[
    "aspirin",
    "ibuprofen",
    "paracetamol",
    "acetaminophen",
    "tylenol",
    "advil",
    "aleve",
];

static DEFAULT_VOCABULARY: LazyLock<MedicationVocabulary> = LazyLock::new(|| {
    MedicationVocabulary::from_entries(
        DEFAULT_MEDICATIONS
            .iter()
            .map(|name| VocabularyEntry::new(name))
            .collect(),
    )
    .unwrap_or_else(|e| unreachable!("built-in vocabulary is valid: {e}"))
});

/// Compiled, immutable medication vocabulary.
#[derive(Debug, Clone)]
pub struct MedicationVocabulary {
    entries: Vec<VocabularyEntry>,
    matcher: Regex,
    /// Entry index for each capture group of `matcher`, in group order.
    group_owner: Vec<usize>,
}

impl MedicationVocabulary {
    /// The built-in literal vocabulary: brand and generic names are distinct.
    pub fn builtin() -> &'static MedicationVocabulary {
        &DEFAULT_VOCABULARY
    }

    /// Built-in names with brand names folded into their generic substance,
    /// so switching between brand and generic is not reported as a change.
    pub fn builtin_grouped() -> MedicationVocabulary {
        let entries = vec![
            VocabularyEntry::with_aliases("acetaminophen", &["paracetamol", "tylenol"]),
            VocabularyEntry::new("aspirin"),
            VocabularyEntry::with_aliases("ibuprofen", &["advil"]),
            VocabularyEntry::with_aliases("naproxen", &["aleve"]),
        ];
        Self::from_entries(entries)
            .unwrap_or_else(|e| unreachable!("built-in grouped vocabulary is valid: {e}"))
    }

    /// Validate and compile a vocabulary table.
    ///
    /// Names are trimmed and lowercased. The canonical name is always one of
    /// its own surface forms.
    pub fn from_entries(raw: Vec<VocabularyEntry>) -> Result<Self, VocabularyError> {
        if raw.is_empty() {
            return Err(VocabularyError::Empty);
        }

        let mut entries = Vec::with_capacity(raw.len());
        let mut owner_of: HashMap<String, String> = HashMap::new();
        let mut canonicals: HashSet<String> = HashSet::new();

        for (index, entry) in raw.into_iter().enumerate() {
            let canonical = normalize_name(&entry.canonical);
            if canonical.is_empty() {
                return Err(VocabularyError::BlankName(index));
            }
            if !canonicals.insert(canonical.clone()) {
                return Err(VocabularyError::DuplicateCanonical(canonical));
            }

            let mut aliases = Vec::new();
            for alias in &entry.aliases {
                let alias = normalize_name(alias);
                if alias.is_empty() {
                    return Err(VocabularyError::BlankName(index));
                }
                if alias != canonical && !aliases.contains(&alias) {
                    aliases.push(alias);
                }
            }

            for form in std::iter::once(&canonical).chain(aliases.iter()) {
                if let Some(first) = owner_of.insert(form.clone(), canonical.clone()) {
                    return Err(VocabularyError::ConflictingSurfaceForm {
                        form: form.clone(),
                        first,
                        second: canonical.clone(),
                    });
                }
            }

            entries.push(VocabularyEntry { canonical, aliases });
        }

        let (matcher, group_owner) = compile_matcher(&entries)?;
        tracing::debug!(
            entries = entries.len(),
            surface_forms = group_owner.len(),
            "Compiled medication vocabulary"
        );

        Ok(Self {
            entries,
            matcher,
            group_owner,
        })
    }

    /// Load a vocabulary table from a JSON file
    /// (`[{"canonical": "...", "aliases": ["..."]}, ...]`).
    pub fn load(path: &Path) -> Result<Self, VocabularyError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| VocabularyError::Load(path.display().to_string(), e.to_string()))?;
        let entries: Vec<VocabularyEntry> = serde_json::from_str(&json)
            .map_err(|e| VocabularyError::Parse(path.display().to_string(), e.to_string()))?;

        let vocabulary = Self::from_entries(entries)?;
        tracing::info!(
            path = %path.display(),
            entries = vocabulary.len(),
            "Loaded medication vocabulary"
        );
        Ok(vocabulary)
    }

    pub fn entries(&self) -> &[VocabularyEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Canonical name for a surface form, if recognized.
    pub fn canonical_for(&self, name: &str) -> Option<&str> {
        let name = normalize_name(name);
        self.entries
            .iter()
            .find(|e| e.canonical == name || e.aliases.contains(&name))
            .map(|e| e.canonical.as_str())
    }

    /// All recognized medications mentioned in `text`, by canonical name.
    ///
    /// Matching is case-insensitive and never starts or ends inside a word;
    /// repeated mentions collapse into one entry.
    pub fn extract(&self, text: &str) -> MedicationSet {
        let mut found = MedicationSet::new();
        for caps in self.matcher.captures_iter(text) {
            // Exactly one form group participates in each match.
            let owner = (1..caps.len())
                .find(|&i| caps.get(i).is_some())
                .and_then(|group| self.group_owner.get(group - 1));
            if let Some(&index) = owner {
                found.insert(&self.entries[index].canonical);
            }
        }
        found
    }

    /// Compare the medications of two prescriptions.
    pub fn reconcile(&self, previous: &str, latest: &str) -> ReconciliationResult {
        let previous = self.extract(previous);
        let latest = self.extract(latest);
        let result = ReconciliationResult::between(&previous, &latest);

        tracing::debug!(
            previous = previous.len(),
            latest = latest.len(),
            continued = result.continued.len(),
            new = result.new.len(),
            discontinued = result.discontinued.len(),
            "Reconciled prescriptions"
        );

        result
    }
}

impl Default for MedicationVocabulary {
    fn default() -> Self {
        Self::builtin().clone()
    }
}

fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// `(?i)(?:\b(form)\b|\B(form)\b|...)` over every surface form of every entry.
///
/// Forms are ordered longest first across the whole table so "advil pm"
/// wins over "advil" even when they belong to different entries. Spaces
/// inside a form match any run of whitespace.
///
/// A form edge that is a word character gets `\b`; a punctuation edge such
/// as the ")" of "insulin (nph)" gets `\B`, so it still cannot sit inside a
/// word but no longer needs a word character next to it.
fn compile_matcher(entries: &[VocabularyEntry]) -> Result<(Regex, Vec<usize>), regex::Error> {
    let mut forms: Vec<(&str, usize)> = entries
        .iter()
        .enumerate()
        .flat_map(|(index, entry)| {
            std::iter::once(entry.canonical.as_str())
                .chain(entry.aliases.iter().map(String::as_str))
                .map(move |form| (form, index))
        })
        .collect();
    forms.sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

    let groups: Vec<String> = forms
        .iter()
        .map(|(form, _)| {
            let words: Vec<String> = form.split(' ').map(regex::escape).collect();
            let lead = edge_assertion(form.chars().next());
            let trail = edge_assertion(form.chars().next_back());
            format!("{lead}({}){trail}", words.join(r"\s+"))
        })
        .collect();

    let pattern = format!("(?:{})", groups.join("|"));
    let matcher = RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .size_limit(16 * (1 << 20))
        .build()?;
    let owners = forms.into_iter().map(|(_, index)| index).collect();

    Ok((matcher, owners))
}

fn edge_assertion(edge: Option<char>) -> &'static str {
    match edge {
        Some(c) if c.is_alphanumeric() || c == '_' => r"\b",
        _ => r"\B",
    }
}
