//! K-means clustering.
//!
//! Partitions data into k clusters by minimizing **within-cluster sum of squares**
//! (WCSS), also called inertia:
//!
//! ```text
//! WCSS = Σₖ Σᵢ∈Cₖ ||xᵢ - μₖ||²
//! ```
//!
//! # Lloyd's Algorithm
//!
//! 1. Initialize k centroids via k-means++
//! 2. **Assign**: each point → nearest centroid
//! 3. **Update**: each centroid → mean of assigned points
//! 4. Repeat until assignments stop changing, the centroid shift drops below
//!    `tol`, or `max_iter` is reached
//!
//! Lloyd finds a local minimum only, so the whole procedure is restarted
//! `n_init` times and the lowest-inertia run wins.
//!
//! # Empty Clusters
//!
//! A centroid that attracts no points is moved onto the point currently
//! farthest from its own centroid. Each empty cluster takes a different point.
//!
//! # Degenerate Input
//!
//! `k` must not exceed the number of *distinct* rows. With text features many
//! passages can collapse onto the same vector (e.g. all-stopword passages),
//! and asking for more clusters than distinct points can only produce
//! duplicate centroids.

use super::traits::Clustering;
use crate::error::{Error, Result};
use ndarray::{Array2, ArrayView1, ArrayView2};
use rand::prelude::*;
use std::collections::HashSet;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// K-means clustering algorithm.
#[derive(Debug, Clone)]
pub struct Kmeans {
    /// Number of clusters.
    k: usize,
    /// Maximum iterations per restart.
    max_iter: usize,
    /// Convergence tolerance on the squared centroid shift.
    tol: f64,
    /// Number of restarts.
    n_init: usize,
    /// Random seed.
    seed: Option<u64>,
}

/// Result of a k-means fit.
#[derive(Debug, Clone)]
pub struct KmeansFit {
    /// Cluster label per row.
    pub labels: Vec<usize>,
    /// Final centroids (k × d).
    pub centroids: Array2<f64>,
    /// Sum of squared distances from each row to its centroid.
    pub inertia: f64,
    /// Lloyd iterations used by the winning restart.
    pub n_iter: usize,
}

impl Kmeans {
    /// Create a new K-means clusterer.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            max_iter: 300,
            tol: 1e-4,
            n_init: 10,
            seed: None,
        }
    }

    /// Set maximum iterations.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set convergence tolerance.
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Set number of restarts.
    pub fn with_n_init(mut self, n_init: usize) -> Self {
        self.n_init = n_init;
        self
    }

    /// Set random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Fit and return labels, centroids and inertia of the best restart.
    pub fn fit(&self, data: ArrayView2<'_, f64>) -> Result<KmeansFit> {
        let n = data.nrows();
        if n == 0 {
            return Err(Error::EmptyInput);
        }
        if self.n_init == 0 {
            return Err(Error::invalid("n_init", "must be at least 1"));
        }
        if data.iter().any(|v| !v.is_finite()) {
            return Err(Error::invalid("data", "feature matrix contains non-finite values"));
        }

        let distinct = distinct_rows(data);
        if self.k == 0 || self.k > distinct {
            return Err(Error::InvalidClusterCount {
                requested: self.k,
                n_items: distinct,
            });
        }

        let mut best: Option<KmeansFit> = None;
        for restart in 0..self.n_init {
            let mut rng: Box<dyn RngCore> = match self.seed {
                Some(s) => Box::new(StdRng::seed_from_u64(s.wrapping_add(restart as u64))),
                None => Box::new(rand::rng()),
            };
            let fit = self.lloyd(data, &mut rng);
            tracing::debug!(restart, inertia = fit.inertia, n_iter = fit.n_iter, "k-means restart");
            if best.as_ref().map_or(true, |b| fit.inertia < b.inertia) {
                best = Some(fit);
            }
        }

        best.ok_or(Error::EmptyInput)
    }

    fn lloyd(&self, data: ArrayView2<'_, f64>, rng: &mut impl Rng) -> KmeansFit {
        let centroids = self.init_centroids(data, rng);
        self.refine(data, centroids)
    }

    /// Lloyd iterations from the given `k × d` starting centroids.
    pub(crate) fn refine(&self, data: ArrayView2<'_, f64>, mut centroids: Array2<f64>) -> KmeansFit {
        let n = data.nrows();
        let d = data.ncols();

        let mut labels = vec![usize::MAX; n];
        let mut n_iter = 0;

        for iter in 0..self.max_iter {
            n_iter = iter + 1;
            let assigned = assign(data, &centroids);
            let changed = assigned
                .iter()
                .zip(labels.iter())
                .any(|((label, _), old)| label != old);
            for (slot, (label, _)) in labels.iter_mut().zip(assigned.iter()) {
                *slot = *label;
            }

            // Update step
            let mut new_centroids = Array2::zeros((self.k, d));
            let mut counts = vec![0usize; self.k];
            for (i, &k) in labels.iter().enumerate() {
                let mut row = new_centroids.row_mut(k);
                row += &data.row(i);
                counts[k] += 1;
            }

            // Farthest points first for re-seeding empty clusters.
            let mut donors: Vec<usize> = Vec::new();
            if counts.iter().any(|&c| c == 0) {
                donors = (0..n).collect();
                donors.sort_by(|&a, &b| {
                    assigned[b]
                        .1
                        .total_cmp(&assigned[a].1)
                        .then_with(|| a.cmp(&b))
                });
            }
            let mut donors = donors.into_iter();

            for k in 0..self.k {
                if counts[k] > 0 {
                    new_centroids
                        .row_mut(k)
                        .mapv_inplace(|v| v / counts[k] as f64);
                } else if let Some(idx) = donors.next() {
                    tracing::debug!(cluster = k, point = idx, "re-seeding empty cluster");
                    new_centroids.row_mut(k).assign(&data.row(idx));
                }
            }

            // Check convergence
            let shift: f64 = centroids
                .iter()
                .zip(new_centroids.iter())
                .map(|(a, b)| (a - b).powi(2))
                .sum();

            centroids = new_centroids;

            if !changed || shift < self.tol {
                break;
            }
        }

        let assigned = assign(data, &centroids);
        let inertia = assigned.iter().map(|(_, dist)| dist).sum();
        let labels = assigned.into_iter().map(|(label, _)| label).collect();

        KmeansFit {
            labels,
            centroids,
            inertia,
            n_iter,
        }
    }

    /// Initialize centroids using k-means++ algorithm.
    fn init_centroids(&self, data: ArrayView2<'_, f64>, rng: &mut impl Rng) -> Array2<f64> {
        let n = data.nrows();
        let d = data.ncols();
        let mut centroids = Array2::zeros((self.k, d));

        // First centroid: random point
        let first = rng.random_range(0..n);
        centroids.row_mut(0).assign(&data.row(first));

        // Remaining centroids: sample proportional to squared distance
        let mut distances: Vec<f64> = (0..n)
            .map(|j| squared_distance(&data.row(j), &centroids.row(0)))
            .collect();

        for i in 1..self.k {
            let total: f64 = distances.iter().sum();
            let selected = if total == 0.0 {
                rng.random_range(0..n)
            } else {
                let threshold = rng.random::<f64>() * total;
                let mut cumsum = 0.0;
                let mut selected = None;
                for (j, &dist) in distances.iter().enumerate() {
                    cumsum += dist;
                    if cumsum >= threshold && dist > 0.0 {
                        selected = Some(j);
                        break;
                    }
                }
                // Rounding can leave the threshold unreached.
                selected.unwrap_or_else(|| farthest(&distances))
            };

            centroids.row_mut(i).assign(&data.row(selected));
            for (j, dist) in distances.iter_mut().enumerate() {
                let to_new = squared_distance(&data.row(j), &centroids.row(i));
                if to_new < *dist {
                    *dist = to_new;
                }
            }
        }

        centroids
    }
}

impl Clustering for Kmeans {
    fn fit_predict(&self, data: ArrayView2<'_, f64>) -> Result<Vec<usize>> {
        self.fit(data).map(|fit| fit.labels)
    }

    fn n_clusters(&self) -> usize {
        self.k
    }
}

fn farthest(distances: &[f64]) -> usize {
    distances
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1).then_with(|| b.0.cmp(&a.0)))
        .map(|(j, _)| j)
        .unwrap_or(0)
}

/// Compute squared Euclidean distance.
fn squared_distance(a: &ArrayView1<'_, f64>, b: &ArrayView1<'_, f64>) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum()
}

/// Nearest centroid and squared distance for every row.
fn assign(data: ArrayView2<'_, f64>, centroids: &Array2<f64>) -> Vec<(usize, f64)> {
    let nearest = |i: usize| {
        let point = data.row(i);
        let mut best_cluster = 0;
        let mut best_dist = f64::MAX;
        for (k, centroid) in centroids.outer_iter().enumerate() {
            let dist = squared_distance(&point, &centroid);
            if dist < best_dist {
                best_dist = dist;
                best_cluster = k;
            }
        }
        (best_cluster, best_dist)
    };

    #[cfg(feature = "parallel")]
    {
        (0..data.nrows()).into_par_iter().map(nearest).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        (0..data.nrows()).map(nearest).collect()
    }
}

/// Number of distinct rows (bitwise, with `-0.0 == 0.0`).
pub fn distinct_rows(data: ArrayView2<'_, f64>) -> usize {
    data.outer_iter()
        .map(|row| {
            row.iter()
                .map(|v| if *v == 0.0 { 0u64 } else { v.to_bits() })
                .collect::<Vec<u64>>()
        })
        .collect::<HashSet<_>>()
        .len()
}
