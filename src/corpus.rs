//! Deduplicated passage corpus shared by every downstream stage.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Ordered, de-duplicated passages.
///
/// Built once from ingestion output; first occurrence wins, so the order is a
/// pure function of the ingestion order. Every feature matrix and label vector
/// downstream is row-aligned with this order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corpus {
    passages: Vec<String>,
}

impl Corpus {
    /// Deduplicate by exact raw-text equality.
    pub fn from_contexts<I>(contexts: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut seen = HashSet::new();
        let passages = contexts
            .into_iter()
            .filter(|c| seen.insert(c.clone()))
            .collect();
        Self { passages }
    }

    /// Number of unique passages.
    pub fn len(&self) -> usize {
        self.passages.len()
    }

    /// True if there are no passages.
    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }

    /// Passages in corpus order.
    pub fn passages(&self) -> &[String] {
        &self.passages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_first_occurrence_order() {
        let corpus = Corpus::from_contexts(
            ["b", "a", "b", "c", "a"].iter().map(|s| s.to_string()),
        );
        assert_eq!(corpus.passages(), &["b", "a", "c"]);
        assert_eq!(corpus.len(), 3);
    }

    #[test]
    fn near_duplicates_stay_distinct() {
        let corpus = Corpus::from_contexts(
            ["The cat sat.", "The cat sat", "the cat sat."]
                .iter()
                .map(|s| s.to_string()),
        );
        assert_eq!(corpus.len(), 3);
    }
}
