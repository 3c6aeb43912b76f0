//! Partitional clustering of passage feature vectors.
//!
//! ## K-means
//!
//! The classic algorithm: assign each point to the nearest centroid, then
//! update centroids to the mean of their points. Repeat.
//!
//! **Objective**: Minimize within-cluster sum of squares:
//!
//! ```text
//! J = Σ_k Σ_{x ∈ C_k} ||x - μ_k||²
//! ```
//!
//! **Assumptions**:
//! - Clusters are roughly spherical
//! - Clusters have similar sizes
//! - You know k in advance
//!
//! High-dimensional sparse text features break the second assumption easily:
//! one cluster can absorb nearly every passage. Check the
//! [`ClusterHistogram`] after every fit.
//!
//! ## Choosing k
//!
//! [`inertia_sweep`] fits one model per candidate k and returns the inertia
//! curve; the "elbow" where it stops dropping steeply is the usual pick.
//! Label identity is arbitrary and not comparable across runs or k values.
//!
//! ## Usage
//!
//! ```rust
//! use ndarray::array;
//! use topicmap::cluster::{Clustering, ClusterHistogram, Kmeans};
//!
//! let data = array![[0.0, 0.0], [0.1, 0.1], [10.0, 10.0], [10.1, 10.1]];
//! let labels = Kmeans::new(2).with_seed(7).fit_predict(data.view()).unwrap();
//! assert_eq!(labels[0], labels[1]);
//! assert_ne!(labels[0], labels[2]);
//! assert_eq!(ClusterHistogram::new(&labels, 2).counts(), &[2, 2]);
//! ```

mod histogram;
mod kmeans;
mod traits;

pub use histogram::ClusterHistogram;
pub use kmeans::{distinct_rows, Kmeans, KmeansFit};
pub use traits::Clustering;

use crate::error::Result;
use ndarray::ArrayView2;

/// Inertia for each candidate cluster count.
///
/// Candidates above the number of distinct rows are skipped rather than
/// failing the whole sweep.
pub fn inertia_sweep(
    data: ArrayView2<'_, f64>,
    ks: impl IntoIterator<Item = usize>,
    seed: Option<u64>,
) -> Result<Vec<(usize, f64)>> {
    let distinct = distinct_rows(data);
    let mut curve = Vec::new();
    for k in ks {
        if k == 0 || k > distinct {
            tracing::debug!(k, distinct, "skipping sweep candidate");
            continue;
        }
        let mut km = Kmeans::new(k);
        if let Some(s) = seed {
            km = km.with_seed(s);
        }
        let fit = km.fit(data)?;
        tracing::info!(k, inertia = fit.inertia, "sweep");
        curve.push((k, fit.inertia));
    }
    Ok(curve)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use ndarray::Array2;

    #[test]
    fn sweep_inertia_is_non_increasing_on_separated_blobs() {
        let data = Array2::from_shape_fn((12, 2), |(i, j)| {
            let blob = (i / 4) as f64 * 20.0;
            blob + (i % 4) as f64 * 0.1 + j as f64 * 0.05
        });
        let curve = inertia_sweep(data.view(), 1..=3, Some(11)).unwrap();
        assert_eq!(curve.iter().map(|(k, _)| *k).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(curve[1].1 < curve[0].1);
        assert!(curve[2].1 < curve[1].1);
    }

    #[test]
    fn sweep_skips_impossible_k() {
        let data = Array2::from_shape_fn((3, 1), |(i, _)| i as f64);
        let curve = inertia_sweep(data.view(), [0, 2, 5], Some(1)).unwrap();
        assert_eq!(curve.len(), 1);
        assert_eq!(curve[0].0, 2);
    }
}
