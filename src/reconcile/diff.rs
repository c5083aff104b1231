use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Deduplicated set of canonical medication names.
///
/// Backed by a sorted set so display order is stable; membership never
/// depends on the order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MedicationSet(BTreeSet<String>);

impl MedicationSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str) -> bool {
        self.0.insert(name.to_lowercase())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(&name.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn intersection(&self, other: &MedicationSet) -> MedicationSet {
        Self(self.0.intersection(&other.0).cloned().collect())
    }

    /// Names in `self` that are not in `other`.
    pub fn difference(&self, other: &MedicationSet) -> MedicationSet {
        Self(self.0.difference(&other.0).cloned().collect())
    }

    pub fn union(&self, other: &MedicationSet) -> MedicationSet {
        Self(self.0.union(&other.0).cloned().collect())
    }

    pub fn is_disjoint(&self, other: &MedicationSet) -> bool {
        self.0.is_disjoint(&other.0)
    }
}

impl<'a> FromIterator<&'a str> for MedicationSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self(iter.into_iter().map(str::to_lowercase).collect())
    }
}

impl fmt::Display for MedicationSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("none");
        }
        let names: Vec<&str> = self.iter().collect();
        f.write_str(&names.join(", "))
    }
}

/// How the medication regimen changed between two prescriptions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationResult {
    /// In both prescriptions.
    pub continued: MedicationSet,
    /// Only in the latest prescription.
    pub new: MedicationSet,
    /// Only in the previous prescription.
    pub discontinued: MedicationSet,
}

impl ReconciliationResult {
    pub fn between(previous: &MedicationSet, latest: &MedicationSet) -> Self {
        Self {
            continued: previous.intersection(latest),
            new: latest.difference(previous),
            discontinued: previous.difference(latest),
        }
    }

    /// True when nothing was started or stopped.
    pub fn is_unchanged(&self) -> bool {
        self.new.is_empty() && self.discontinued.is_empty()
    }

    /// The previous prescription's medications (`continued ∪ discontinued`).
    pub fn previous(&self) -> MedicationSet {
        self.continued.union(&self.discontinued)
    }

    /// The latest prescription's medications (`continued ∪ new`).
    pub fn latest(&self) -> MedicationSet {
        self.continued.union(&self.new)
    }
}

impl fmt::Display for ReconciliationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Continued: {}", self.continued)?;
        writeln!(f, "New: {}", self.new)?;
        write!(f, "Discontinued: {}", self.discontinued)
    }
}
