//! Optional rank reduction of the lexical matrix.
//!
//! Randomized subspace iteration (Halko, Martinsson & Tropp 2011):
//!
//! ```text
//! Q₀ ~ U(-1, 1)^{d×r}
//! Qᵢ₊₁ = qr(Aᵀ A Qᵢ).Q
//! T    = A Q
//! ```
//!
//! `Q` converges to an orthonormal basis of the dominant right-singular
//! subspace of `A`, so `T` preserves the Euclidean geometry k-means sees
//! inside that subspace. Components are a basis of the subspace, not
//! individual singular vectors ordered by singular value.

use crate::error::{Error, Result};
use faer::Mat;
use ndarray::Array2;
use rand::prelude::*;

/// Truncated-SVD style projection to `n_components` columns.
#[derive(Debug, Clone)]
pub struct TruncatedSvd {
    n_components: usize,
    n_iter: usize,
    seed: Option<u64>,
}

impl TruncatedSvd {
    /// Project onto `n_components` dimensions.
    pub fn new(n_components: usize) -> Self {
        Self {
            n_components,
            n_iter: 5,
            seed: None,
        }
    }

    /// Power iterations.
    pub fn with_n_iter(mut self, n_iter: usize) -> Self {
        self.n_iter = n_iter;
        self
    }

    /// Seed the random starting basis.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Reduce `data` (n × d) to n × `n_components`.
    pub fn fit_transform(&self, data: &Array2<f64>) -> Result<Array2<f64>> {
        let (n, d) = data.dim();
        if n == 0 || d == 0 {
            return Err(Error::EmptyInput);
        }
        let r = self.n_components;
        if r == 0 || r > d.min(n) {
            return Err(Error::invalid(
                "svd_components",
                format!("{r} components requested from a {n}x{d} matrix"),
            ));
        }

        let mut rng: Box<dyn RngCore> = match self.seed {
            Some(s) => Box::new(StdRng::seed_from_u64(s)),
            None => Box::new(rand::rng()),
        };

        let mut a = Mat::<f64>::zeros(n, d);
        for ((i, j), v) in data.indexed_iter() {
            a[(i, j)] = *v;
        }
        let at = a.transpose();

        let mut q = Mat::<f64>::zeros(d, r);
        for i in 0..d {
            for j in 0..r {
                q[(i, j)] = rng.random_range(-1.0..1.0);
            }
        }
        q = q.qr().compute_thin_q();

        for _ in 0..self.n_iter {
            let y = &a * &q;
            q = (&at * &y).qr().compute_thin_q();
        }

        let t = &a * &q;
        Ok(Array2::from_shape_fn((n, r), |(i, j)| t[(i, j)]))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use ndarray::array;

    fn sq_dist(m: &Array2<f64>, a: usize, b: usize) -> f64 {
        m.row(a)
            .iter()
            .zip(m.row(b).iter())
            .map(|(x, y)| (x - y).powi(2))
            .sum()
    }

    #[test]
    fn output_shape() {
        let data = Array2::from_shape_fn((6, 4), |(i, j)| (i * 4 + j) as f64);
        let t = TruncatedSvd::new(2).with_seed(7).fit_transform(&data).unwrap();
        assert_eq!(t.dim(), (6, 2));
    }

    #[test]
    fn full_rank_projection_preserves_distances() {
        let data = array![[1.0, 0.0, 2.0], [0.0, 3.0, 1.0], [4.0, 1.0, 0.0], [2.0, 2.0, 2.0]];
        let t = TruncatedSvd::new(3).with_seed(1).fit_transform(&data).unwrap();
        for (a, b) in [(0, 1), (1, 2), (0, 3)] {
            assert!((sq_dist(&data, a, b) - sq_dist(&t, a, b)).abs() < 1e-8);
        }
    }

    #[test]
    fn rank_one_data_keeps_its_direction() {
        // Every row is a multiple of (1, 2, 2); one component captures it all.
        let data = array![[1.0, 2.0, 2.0], [2.0, 4.0, 4.0], [-1.0, -2.0, -2.0]];
        let t = TruncatedSvd::new(1).with_seed(3).fit_transform(&data).unwrap();
        assert!((t[[0, 0]].abs() - 3.0).abs() < 1e-8);
        assert!((t[[1, 0]].abs() - 6.0).abs() < 1e-8);
    }

    #[test]
    fn seeded_runs_match() {
        let data = Array2::from_shape_fn((8, 5), |(i, j)| ((i + 1) * (j + 2) % 7) as f64);
        let a = TruncatedSvd::new(2).with_seed(9).fit_transform(&data).unwrap();
        let b = TruncatedSvd::new(2).with_seed(9).fit_transform(&data).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rank_deficient_input_stays_finite() {
        // Rank one, two components: the second basis column has nothing to span.
        let data = array![[1.0, 2.0, 2.0], [2.0, 4.0, 4.0], [3.0, 6.0, 6.0], [0.0, 0.0, 0.0]];
        let t = TruncatedSvd::new(2).with_seed(4).fit_transform(&data).unwrap();
        assert!(t.iter().all(|v| v.is_finite()));
        for (a, b) in [(0, 1), (1, 2), (0, 3)] {
            assert!((sq_dist(&data, a, b) - sq_dist(&t, a, b)).abs() < 1e-8);
        }
    }

    #[test]
    fn too_many_components_is_an_error() {
        let data = Array2::<f64>::ones((3, 2));
        assert!(TruncatedSvd::new(3).fit_transform(&data).is_err());
        assert!(TruncatedSvd::new(0).fit_transform(&data).is_err());
    }
}
