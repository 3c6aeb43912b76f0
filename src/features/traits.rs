//! Feature extractor traits.

/// A scalar feature computed from raw passage text.
///
/// Implementations must be pure: the same input always yields the same value.
/// For non-empty input the value must be finite.
pub trait FeatureExtractor: Send + Sync {
    /// Short stable name, used in logs.
    fn name(&self) -> &'static str;

    /// Evaluate the feature on a raw (not normalized) passage.
    fn evaluate(&self, context: &str) -> f64;
}

/// Assigns part-of-speech tags to the whitespace tokens of a passage.
pub trait PosTagger: Send + Sync {
    /// One Penn Treebank tag per whitespace token, in order.
    fn tag(&self, text: &str) -> Vec<&'static str>;
}
