//! Kernel principal component analysis.

use std::time::Instant;

use faer::{Mat, Side};
use log::{debug, warn};

use crate::error::{Error, Result};
use crate::utils::Matrix;

/// Double-center a square kernel matrix in feature space.
///
/// `k'_ij = k_ij - mean_row_i - mean_col_j + mean_all`
pub fn center_kernel(kernel: &Matrix) -> Result<Matrix> {
    let n = kernel.square_dim()?;
    let inv_n = (n as f64).recip();
    let row_means = (0..n)
        .map(|i| kernel.row(i).iter().sum::<f64>() * inv_n)
        .collect::<Vec<_>>();
    let col_means = (0..n)
        .map(|j| (0..n).map(|i| kernel.get(i, j)).sum::<f64>() * inv_n)
        .collect::<Vec<_>>();
    let total_mean = row_means.iter().sum::<f64>() * inv_n;
    Ok(Matrix::from_fn(n, n, |i, j| {
        kernel.get(i, j) - row_means[i] - col_means[j] + total_mean
    }))
}

/// Kernel PCA projection.
#[derive(Debug, Clone, Copy)]
pub struct KernelPca {
    n_components: usize,
}

impl Default for KernelPca {
    fn default() -> Self {
        Self { n_components: 10 }
    }
}

impl KernelPca {
    /// Create a new KernelPca instance keeping `n_components` principal axes.
    pub fn new(n_components: usize) -> Self {
        Self { n_components }
    }

    /// Project the samples of a kernel matrix onto the leading principal axes.
    ///
    /// Returns an `n x d` matrix where column `c` is the `c`-th eigenvector of
    /// the centered kernel scaled by the square root of its eigenvalue.
    /// Negative eigenvalues are treated as zero.
    pub fn fit_transform(&self, kernel: &Matrix) -> Result<Matrix> {
        if self.n_components == 0 {
            return Err(Error::invalid("n_components", "must be at least 1"));
        }
        let n = kernel.square_dim()?;
        if n == 0 {
            return Err(Error::EmptyInput);
        }
        let d = if self.n_components > n {
            warn!(
                "requested {} components for {} samples, keep {}",
                self.n_components, n, n
            );
            n
        } else {
            self.n_components
        };

        let start = Instant::now();
        let centered = center_kernel(kernel)?;
        // symmetrize to absorb round-off in the input
        let mat = Mat::<f64>::from_fn(n, n, |i, j| {
            0.5 * (centered.get(i, j) + centered.get(j, i))
        });
        let eigen = mat
            .self_adjoint_eigen(Side::Lower)
            .map_err(|e| Error::Decomposition(format!("{e:?}")))?;
        let vectors = eigen.U();
        let values = eigen.S().column_vector();
        debug!("kPCA: eigendecomposition takes {} s", start.elapsed().as_secs_f32());

        // eigenvalues come in nondecreasing order
        let mut projection = Matrix::zeros(n, d);
        for c in 0..d {
            let src = n - 1 - c;
            let scale = values[src].max(0.0).sqrt();
            for i in 0..n {
                projection.set(i, c, vectors[(i, src)] * scale);
            }
        }
        Ok(projection)
    }
}

#[cfg(test)]
mod test {
    use rand::Rng;

    use super::{KernelPca, center_kernel};
    use crate::distance::squared_euclidean;
    use crate::error::Error;
    use crate::utils::Matrix;

    fn linear_kernel(points: &[Vec<f64>]) -> Matrix {
        let n = points.len();
        Matrix::from_fn(n, n, |i, j| {
            points[i]
                .iter()
                .zip(points[j].iter())
                .map(|(a, b)| a * b)
                .sum()
        })
    }

    #[test]
    fn test_center_kernel() {
        let kernel = Matrix::from_fn(4, 4, |i, j| (i + 2 * j) as f64);
        let centered = center_kernel(&kernel).unwrap();
        for i in 0..4 {
            let row_sum: f64 = centered.row(i).iter().sum();
            let col_sum: f64 = centered.column(i).iter().sum();
            assert!(row_sum.abs() < 1e-12);
            assert!(col_sum.abs() < 1e-12);
        }
    }

    #[test]
    fn test_projection_preserves_distances() {
        // full-rank projection of a linear kernel keeps pairwise distances
        let mut rng = rand::rng();
        let points = (0..30)
            .map(|_| (0..3).map(|_| rng.random::<f64>()).collect::<Vec<_>>())
            .collect::<Vec<_>>();
        let proj = KernelPca::new(3).fit_transform(&linear_kernel(&points)).unwrap();
        assert_eq!((proj.nrows(), proj.ncols()), (30, 3));
        for i in 0..30 {
            for j in 0..30 {
                let expect = squared_euclidean(&points[i], &points[j]);
                let found = squared_euclidean(proj.row(i), proj.row(j));
                assert!((expect - found).abs() < 1e-8, "{expect} vs {found}");
            }
        }
    }

    #[test]
    fn test_components_ordered_by_variance() {
        // spread along x is much larger than along y
        let points = (0..20)
            .map(|i| vec![i as f64, if i % 2 == 0 { 0.1 } else { -0.1 }])
            .collect::<Vec<_>>();
        let proj = KernelPca::new(2).fit_transform(&linear_kernel(&points)).unwrap();
        let var = |c: usize| proj.column(c).iter().map(|v| v * v).sum::<f64>();
        assert!(var(0) > var(1));
        let spread = points.iter().map(|p| (p[0] - 9.5).powi(2)).sum::<f64>();
        assert!((var(0) - spread).abs() < 1e-2);
    }

    #[test]
    fn test_components_clamped() {
        let kernel = Matrix::from_fn(3, 3, |i, j| if i == j { 1.0 } else { 0.0 });
        let proj = KernelPca::new(10).fit_transform(&kernel).unwrap();
        assert_eq!(proj.ncols(), 3);
        for v in proj.as_slice() {
            assert!(v.is_finite());
        }
    }

    #[test]
    fn test_invalid() {
        let kernel = Matrix::zeros(3, 3);
        assert!(matches!(
            KernelPca::new(0).fit_transform(&kernel),
            Err(Error::InvalidParameter { .. })
        ));
        assert!(matches!(
            KernelPca::new(2).fit_transform(&Matrix::zeros(2, 3)),
            Err(Error::NotSquare { .. })
        ));
    }
}
