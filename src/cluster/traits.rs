//! Clustering traits.

use crate::error::Result;
use ndarray::ArrayView2;

/// Trait for hard clustering algorithms over row-major feature matrices.
pub trait Clustering {
    /// Fit the model to data and return cluster assignments.
    ///
    /// Returns a vector of cluster labels in `[0, n_clusters)`, one per row.
    fn fit_predict(&self, data: ArrayView2<'_, f64>) -> Result<Vec<usize>>;

    /// Get the number of clusters.
    fn n_clusters(&self) -> usize;
}
