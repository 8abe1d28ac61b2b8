//! Insertion-ordered label counter.

use indexmap::IndexMap;

/// Counts occurrences of labels, remembering the order labels first appeared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelCounter {
    counts: IndexMap<String, u64>,
}

impl LabelCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one occurrence and returns the label's new count.
    pub fn increment(&mut self, label: impl Into<String>) -> u64 {
        let count = self.counts.entry(label.into()).or_insert(0);
        *count += 1;
        *count
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Labels in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(label, count)| (label.as_str(), *count))
    }

    /// Labels by count descending; equal counts keep first-seen order.
    pub fn ranked(&self) -> Vec<(&str, u64)> {
        let mut ranked: Vec<_> = self.iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }
}
