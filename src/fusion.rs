//! Feature fusion and per-column standardization.
//!
//! Fusion concatenates lexical and custom columns for the same rows.
//! Standardization rescales every column to zero mean and unit (population)
//! variance. A column whose variance is effectively zero cannot be scaled;
//! it is replaced by an all-zero column and reported, so no non-finite value
//! ever reaches the distance computations.

use crate::error::{Error, Result};
use ndarray::{concatenate, Array2, Axis};

/// Variance at or below this is treated as zero.
pub const MIN_VARIANCE: f64 = 1e-12;

/// Concatenate `lexical` and `custom` column-wise. Row counts must match.
pub fn fuse(lexical: &Array2<f64>, custom: &Array2<f64>) -> Result<Array2<f64>> {
    if lexical.nrows() != custom.nrows() {
        return Err(Error::DimensionMismatch {
            expected: lexical.nrows(),
            found: custom.nrows(),
        });
    }
    concatenate(Axis(1), &[lexical.view(), custom.view()])
        .map_err(|e| Error::invalid("features", e.to_string()))
}

/// Standardized matrix plus the columns the zero-variance guard touched.
#[derive(Debug, Clone)]
pub struct Standardized {
    /// Column-standardized features.
    pub matrix: Array2<f64>,
    /// Columns that had zero variance and were zeroed.
    pub zeroed: Vec<usize>,
}

/// Standardize each column in place and hand the matrix back.
pub fn standardize(mut matrix: Array2<f64>) -> Result<Standardized> {
    let n = matrix.nrows();
    if n == 0 {
        return Err(Error::EmptyInput);
    }

    let mut zeroed = Vec::new();
    for (j, mut col) in matrix.axis_iter_mut(Axis(1)).enumerate() {
        let mean = col.sum() / n as f64;
        let var = col.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64;

        if !var.is_finite() || var <= MIN_VARIANCE {
            col.fill(0.0);
            zeroed.push(j);
            continue;
        }

        let std = var.sqrt();
        col.mapv_inplace(|x| (x - mean) / std);
    }

    if !zeroed.is_empty() {
        tracing::warn!(
            columns = zeroed.len(),
            first = zeroed[0],
            "zero-variance feature columns replaced by zeros"
        );
    }

    Ok(Standardized { matrix, zeroed })
}
