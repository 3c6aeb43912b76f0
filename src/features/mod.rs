//! Custom scalar features computed on raw passage text.
//!
//! Extractors are collected in a [`FeatureRegistry`] at startup. The custom
//! feature matrix has one column per registered extractor, in registration
//! order, and one row per passage.
//!
//! ```rust
//! use topicmap::features::{AverageSentenceLength, FeatureRegistry, TagRatio};
//!
//! let registry = FeatureRegistry::new()
//!     .with(AverageSentenceLength)
//!     .with(TagRatio::prepositions());
//! let m = registry.extract(&["The cat sat on the mat.".to_string()]);
//! assert_eq!(m.dim(), (1, 2));
//! ```

mod pos;
mod sentence;
mod traits;

pub use pos::{
    LexiconTagger, SuffixTagger, TagRatio, NOUN_TAGS, TAG_CC, TAG_CD, TAG_DT, TAG_IN, TAG_JJ,
    TAG_MD, TAG_NN, TAG_NNP, TAG_NNPS, TAG_NNS, TAG_PRP, TAG_RB, TAG_UNKNOWN, TAG_VB, TAG_VBD,
    TAG_VBG,
};
pub use sentence::AverageSentenceLength;
pub use traits::{FeatureExtractor, PosTagger};

use ndarray::Array2;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Ordered set of feature extractors.
#[derive(Default)]
pub struct FeatureRegistry {
    extractors: Vec<Box<dyn FeatureExtractor>>,
}

impl std::fmt::Debug for FeatureRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

impl FeatureRegistry {
    /// Empty registry (no custom columns).
    pub fn new() -> Self {
        Self::default()
    }

    /// The stock registry: average sentence length only.
    pub fn standard() -> Self {
        Self::new().with(AverageSentenceLength)
    }

    /// Append an extractor; its column follows the ones already registered.
    pub fn with(mut self, extractor: impl FeatureExtractor + 'static) -> Self {
        self.extractors.push(Box::new(extractor));
        self
    }

    /// Number of registered extractors (custom column count).
    pub fn len(&self) -> usize {
        self.extractors.len()
    }

    /// True when no extractor is registered.
    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }

    /// Extractor names in column order.
    pub fn names(&self) -> Vec<&'static str> {
        self.extractors.iter().map(|e| e.name()).collect()
    }

    /// Evaluate every extractor on every passage.
    ///
    /// Non-finite values are replaced by `0.0` so they never reach fusion.
    pub fn extract(&self, passages: &[String]) -> Array2<f64> {
        let n = passages.len();
        let d = self.extractors.len();

        #[cfg(feature = "parallel")]
        let rows: Vec<Vec<f64>> = passages.par_iter().map(|p| self.row(p)).collect();

        #[cfg(not(feature = "parallel"))]
        let rows: Vec<Vec<f64>> = passages.iter().map(|p| self.row(p)).collect();

        let mut out = Array2::zeros((n, d));
        for (i, row) in rows.into_iter().enumerate() {
            for (j, v) in row.into_iter().enumerate() {
                out[[i, j]] = v;
            }
        }
        out
    }

    fn row(&self, passage: &str) -> Vec<f64> {
        self.extractors
            .iter()
            .map(|e| {
                let v = e.evaluate(passage);
                if v.is_finite() {
                    v
                } else {
                    tracing::warn!(extractor = e.name(), value = v, "non-finite feature replaced by 0");
                    0.0
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Broken;

    impl FeatureExtractor for Broken {
        fn name(&self) -> &'static str {
            "broken"
        }

        fn evaluate(&self, context: &str) -> f64 {
            1.0 / context.len() as f64 - f64::INFINITY
        }
    }

    #[test]
    fn columns_follow_registration_order() {
        let registry = FeatureRegistry::standard().with(TagRatio::prepositions());
        assert_eq!(registry.names(), vec!["avg_sentence_len", "preposition_ratio"]);

        let passages = vec!["The cat sat.".to_string(), "Dogs bark in parks.".to_string()];
        let m = registry.extract(&passages);
        assert_eq!(m.dim(), (2, 2));
        assert_eq!(m[[0, 0]], 3.0);
        assert_eq!(m[[1, 0]], 4.0);
        assert_eq!(m[[0, 1]], 0.0);
        assert!((m[[1, 1]] - 0.25).abs() < 1e-12);
    }

    #[test]
    fn non_finite_values_are_zeroed() {
        let registry = FeatureRegistry::new().with(Broken);
        let m = registry.extract(&["".to_string(), "abc".to_string()]);
        assert!(m.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn empty_registry_gives_zero_columns() {
        let m = FeatureRegistry::new().extract(&["x".to_string()]);
        assert_eq!(m.dim(), (1, 0));
        assert!(FeatureRegistry::new().is_empty());
    }
}
