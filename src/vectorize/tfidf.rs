//! TF-IDF vectorizer with document-frequency pruning and a vocabulary cap.
//!
//! # Weighting
//!
//! ```text
//! tf(t, d)  = count(t, d)              (or 1 + ln count(t, d) when sublinear)
//! idf(t)    = ln((1 + n) / (1 + df(t))) + 1
//! w(t, d)   = tf(t, d) * idf(t), each row scaled to unit L2 norm
//! ```
//!
//! # Pruning
//!
//! Applied in order: drop terms with `df > max_df * n`, drop terms with
//! `df < min_df * n`, then keep the `max_features` terms with the highest
//! corpus frequency (ties broken by term order). Surviving terms are indexed in
//! lexicographic order, so fitting the same corpus twice yields the same model.

use super::sparse::CsrMatrix;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Vectorizer options. Every field changes the fitted vocabulary and so
/// belongs in the checkpoint key.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TfidfConfig {
    /// Keep only the top-N terms by corpus frequency.
    pub max_features: Option<usize>,
    /// Minimum document frequency, as a fraction of documents.
    pub min_df: f64,
    /// Maximum document frequency, as a fraction of documents.
    pub max_df: f64,
    /// Use `1 + ln(tf)` instead of raw counts.
    pub sublinear_tf: bool,
}

impl Default for TfidfConfig {
    fn default() -> Self {
        Self {
            max_features: None,
            min_df: 0.0,
            max_df: 1.0,
            sublinear_tf: false,
        }
    }
}

impl TfidfConfig {
    /// Set the vocabulary cap.
    pub fn with_max_features(mut self, max_features: usize) -> Self {
        self.max_features = Some(max_features);
        self
    }

    /// Set the document-frequency bounds.
    pub fn with_df_bounds(mut self, min_df: f64, max_df: f64) -> Self {
        self.min_df = min_df;
        self.max_df = max_df;
        self
    }

    /// Toggle sublinear term frequency.
    pub fn with_sublinear_tf(mut self, sublinear: bool) -> Self {
        self.sublinear_tf = sublinear;
        self
    }

    /// Check bounds without touching any data.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.min_df) {
            return Err(Error::invalid("min_df", format!("{} not in [0, 1]", self.min_df)));
        }
        if !(0.0..=1.0).contains(&self.max_df) {
            return Err(Error::invalid("max_df", format!("{} not in [0, 1]", self.max_df)));
        }
        if self.min_df > self.max_df {
            return Err(Error::invalid(
                "min_df",
                format!("min_df {} exceeds max_df {}", self.min_df, self.max_df),
            ));
        }
        if self.max_features == Some(0) {
            return Err(Error::invalid("max_features", "must be at least 1"));
        }
        Ok(())
    }

    /// Learn vocabulary and IDF weights from a normalized corpus.
    pub fn fit(&self, corpus: &[String]) -> Result<VectorizerModel> {
        self.validate()?;
        if corpus.is_empty() {
            return Err(Error::EmptyInput);
        }
        let n = corpus.len();

        // term -> (document frequency, corpus frequency)
        let mut stats: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
        for doc in corpus {
            let mut seen: BTreeSet<&str> = BTreeSet::new();
            for token in doc.split_whitespace() {
                let entry = stats.entry(token).or_insert((0, 0));
                entry.1 += 1;
                if seen.insert(token) {
                    entry.0 += 1;
                }
            }
        }
        let observed = stats.len();

        let max_doc = self.max_df * n as f64;
        let min_doc = self.min_df * n as f64;
        let mut kept: Vec<(&str, usize, usize)> = stats
            .into_iter()
            .filter(|&(_, (df, _))| df as f64 <= max_doc && df as f64 >= min_doc)
            .map(|(t, (df, tf))| (t, df, tf))
            .collect();

        if let Some(cap) = self.max_features {
            if kept.len() > cap {
                kept.sort_by(|a, b| b.2.cmp(&a.2).then_with(|| a.0.cmp(b.0)));
                kept.truncate(cap);
                kept.sort_by(|a, b| a.0.cmp(b.0));
            }
        }

        if kept.is_empty() {
            return Err(Error::invalid(
                "vocabulary",
                format!("no terms left after pruning {observed} observed terms"),
            ));
        }

        let mut vocabulary = BTreeMap::new();
        let mut idf = Vec::with_capacity(kept.len());
        for (col, (term, df, _)) in kept.into_iter().enumerate() {
            vocabulary.insert(term.to_string(), col);
            idf.push(((1.0 + n as f64) / (1.0 + df as f64)).ln() + 1.0);
        }

        tracing::info!(
            documents = n,
            observed_terms = observed,
            vocabulary = vocabulary.len(),
            "fitted tfidf vocabulary"
        );

        Ok(VectorizerModel {
            vocabulary,
            idf,
            sublinear_tf: self.sublinear_tf,
        })
    }
}

/// Fitted vocabulary and IDF weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorizerModel {
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
    sublinear_tf: bool,
}

impl VectorizerModel {
    /// Number of terms (columns).
    pub fn n_terms(&self) -> usize {
        self.idf.len()
    }

    /// Column of `term`, if it survived pruning.
    pub fn column(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    /// IDF weight of column `col`.
    pub fn idf(&self, col: usize) -> f64 {
        self.idf[col]
    }

    /// Terms in column order.
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.vocabulary.keys().map(String::as_str)
    }

    /// Project normalized documents onto the vocabulary. Unknown terms are
    /// ignored; a document with no known terms becomes an all-zero row.
    pub fn transform(&self, corpus: &[String]) -> CsrMatrix {
        let rows = corpus.iter().map(|doc| self.row(doc)).collect();
        CsrMatrix::from_rows(self.n_terms(), rows)
    }

    fn row(&self, doc: &str) -> Vec<(usize, f64)> {
        let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
        for token in doc.split_whitespace() {
            if let Some(col) = self.column(token) {
                *counts.entry(col).or_insert(0) += 1;
            }
        }

        let mut row: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(col, count)| {
                let tf = if self.sublinear_tf {
                    1.0 + (count as f64).ln()
                } else {
                    count as f64
                };
                (col, tf * self.idf[col])
            })
            .collect();

        let norm = row.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, w) in &mut row {
                *w /= norm;
            }
        }
        row
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn corpus() -> Vec<String> {
        ["cat sat", "cat sat mat", "dog bark loudly", "cat cat dog"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn vocabulary_is_sorted_and_complete() {
        let model = TfidfConfig::default().fit(&corpus()).unwrap();
        let terms: Vec<&str> = model.terms().collect();
        assert_eq!(terms, vec!["bark", "cat", "dog", "loudly", "mat", "sat"]);
        assert_eq!(model.column("cat"), Some(1));
        assert_eq!(model.column("unicorn"), None);
    }

    #[test]
    fn rare_terms_get_higher_idf() {
        let model = TfidfConfig::default().fit(&corpus()).unwrap();
        let cat = model.idf(model.column("cat").unwrap());
        let mat = model.idf(model.column("mat").unwrap());
        assert!(mat > cat);
        // df(cat) = 3 of 4: ln(5 / 4) + 1
        assert!((cat - ((5.0f64 / 4.0).ln() + 1.0)).abs() < 1e-12);
    }

    #[test]
    fn max_df_drops_near_universal_terms() {
        let model = TfidfConfig::default()
            .with_df_bounds(0.0, 0.5)
            .fit(&corpus())
            .unwrap();
        assert_eq!(model.column("cat"), None);
        assert!(model.column("dog").is_some());
    }

    #[test]
    fn min_df_drops_rare_terms() {
        let model = TfidfConfig::default()
            .with_df_bounds(0.5, 1.0)
            .fit(&corpus())
            .unwrap();
        let terms: Vec<&str> = model.terms().collect();
        assert_eq!(terms, vec!["cat", "dog", "sat"]);
    }

    #[test]
    fn max_features_keeps_most_frequent() {
        let model = TfidfConfig::default()
            .with_max_features(2)
            .fit(&corpus())
            .unwrap();
        // cat: 4, then dog and sat tie at 2; "dog" wins on term order.
        let terms: Vec<&str> = model.terms().collect();
        assert_eq!(terms, vec!["cat", "dog"]);
    }

    #[test]
    fn rows_are_unit_norm_and_aligned() {
        let docs = corpus();
        let model = TfidfConfig::default().fit(&docs).unwrap();
        let m = model.transform(&docs);
        assert_eq!(m.nrows(), docs.len());
        assert_eq!(m.ncols(), model.n_terms());
        for i in 0..m.nrows() {
            let norm: f64 = m.row(i).map(|(_, v)| v * v).sum();
            assert!((norm - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn empty_and_unknown_documents_are_zero_rows() {
        let model = TfidfConfig::default().fit(&corpus()).unwrap();
        let m = model.transform(&["".to_string(), "unicorn".to_string()]);
        assert_eq!(m.nrows(), 2);
        assert_eq!(m.nnz(), 0);
    }

    #[test]
    fn sublinear_tf_dampens_repeats() {
        let docs = corpus();
        let raw = TfidfConfig::default().fit(&docs).unwrap().transform(&docs);
        let sub = TfidfConfig::default()
            .with_sublinear_tf(true)
            .fit(&docs)
            .unwrap()
            .transform(&docs);
        // Row 3 is "cat cat dog": the cat/dog weight ratio shrinks.
        let ratio = |m: &CsrMatrix| {
            let row: Vec<(usize, f64)> = m.row(3).collect();
            row[0].1 / row[1].1
        };
        assert!(ratio(&sub) < ratio(&raw));
    }

    #[test]
    fn fitting_is_deterministic() {
        let a = TfidfConfig::default().fit(&corpus()).unwrap();
        let b = TfidfConfig::default().fit(&corpus()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn invalid_bounds_are_rejected() {
        assert!(TfidfConfig::default().with_df_bounds(0.8, 0.2).validate().is_err());
        assert!(TfidfConfig::default().with_df_bounds(0.0, 1.5).validate().is_err());
        assert!(TfidfConfig::default().with_max_features(0).validate().is_err());
        assert!(matches!(
            TfidfConfig::default().fit(&[]),
            Err(Error::EmptyInput)
        ));
    }

    #[test]
    fn all_empty_corpus_has_no_vocabulary() {
        let err = TfidfConfig::default()
            .fit(&["".to_string(), "".to_string()])
            .unwrap_err();
        assert!(err.to_string().contains("vocabulary"));
    }
}
