//! Convert kernels to distances and compute simple statistics.

use num_traits::Float;
#[cfg(not(feature = "perf"))]
use rayon::prelude::*;

use crate::error::Result;
use crate::utils::Matrix;

/// Squared Euclidean distance between two points.
pub fn squared_euclidean<T: Float>(lhs: &[T], rhs: &[T]) -> T {
    lhs.iter()
        .zip(rhs.iter())
        .fold(T::zero(), |acc, (&l, &r)| acc + (l - r) * (l - r))
}

/// Index of the smallest value, ignoring NaN.
pub fn argmin<T: Float>(values: &[T]) -> usize {
    let mut index = 0;
    let mut minimum = T::infinity();
    for (i, &v) in values.iter().enumerate() {
        if v < minimum {
            minimum = v;
            index = i;
        }
    }
    index
}

/// Arithmetic mean, zero for empty input.
pub fn mean<T: Float>(values: &[T]) -> T {
    if values.is_empty() {
        return T::zero();
    }
    let sum = values.iter().fold(T::zero(), |acc, &v| acc + v);
    sum / T::from(values.len()).unwrap_or_else(T::one)
}

/// Population standard deviation, zero for empty input.
pub fn std_dev<T: Float>(values: &[T]) -> T {
    if values.is_empty() {
        return T::zero();
    }
    let mu = mean(values);
    let var = values
        .iter()
        .fold(T::zero(), |acc, &v| acc + (v - mu) * (v - mu))
        / T::from(values.len()).unwrap_or_else(T::one);
    var.sqrt()
}

/// Distance row `i`: `sqrt(k_ii + k_jj - 2 k_ij)` for `j < i`, clamped at zero.
fn distance_row(kernel: &Matrix, i: usize) -> Vec<f64> {
    let k_ii = kernel.get(i, i);
    (0..i)
        .map(|j| (k_ii + kernel.get(j, j) - 2.0 * kernel.get(i, j)).max(0.0).sqrt())
        .collect()
}

/// Convert a square kernel matrix into a distance matrix.
///
/// Only the lower triangle of the kernel is read; the result is mirrored so
/// that it is exactly symmetric with a zero diagonal.
pub fn kernel_to_distance(kernel: &Matrix) -> Result<Matrix> {
    let n = kernel.square_dim()?;

    #[cfg(feature = "perf")]
    let lower = (0..n)
        .map(|i| distance_row(kernel, i))
        .collect::<Vec<_>>();
    #[cfg(not(feature = "perf"))]
    let lower = (0..n)
        .into_par_iter()
        .map(|i| distance_row(kernel, i))
        .collect::<Vec<_>>();

    let mut dist = Matrix::zeros(n, n);
    for (i, row) in lower.iter().enumerate() {
        for (j, &d) in row.iter().enumerate() {
            dist.set(i, j, d);
            dist.set(j, i, d);
        }
    }
    Ok(dist)
}

#[cfg(test)]
mod test {
    use rand::Rng;

    use super::{argmin, kernel_to_distance, mean, squared_euclidean, std_dev};
    use crate::error::Error;
    use crate::utils::Matrix;

    fn random_kernel(n: usize, dim: usize) -> Matrix {
        let mut rng = rand::rng();
        let points = (0..n)
            .map(|_| (0..dim).map(|_| rng.random::<f64>()).collect::<Vec<_>>())
            .collect::<Vec<_>>();
        Matrix::from_fn(n, n, |i, j| {
            points[i]
                .iter()
                .zip(points[j].iter())
                .map(|(a, b)| a * b)
                .sum()
        })
    }

    #[test]
    fn test_kernel_to_distance_shape() {
        let kernel = random_kernel(50, 8);
        let dist = kernel_to_distance(&kernel).unwrap();
        assert_eq!((dist.nrows(), dist.ncols()), (50, 50));
        for i in 0..50 {
            assert_eq!(dist.get(i, i), 0.0);
            for j in 0..50 {
                assert_eq!(dist.get(i, j), dist.get(j, i));
                assert!(dist.get(i, j).is_finite());
                assert!(dist.get(i, j) >= 0.0);
            }
        }
    }

    #[test]
    fn test_linear_kernel_gives_euclidean() {
        let points = [[0.0, 0.0], [3.0, 4.0], [1.0, 1.0]];
        let kernel = Matrix::from_fn(3, 3, |i, j| {
            points[i][0] * points[j][0] + points[i][1] * points[j][1]
        });
        let dist = kernel_to_distance(&kernel).unwrap();
        for i in 0..3 {
            for j in 0..3 {
                let expect = squared_euclidean(&points[i][..], &points[j][..]).sqrt();
                assert!((dist.get(i, j) - expect).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_negative_argument_clamped() {
        // k_01 too large for a valid kernel
        let kernel = Matrix::new(vec![1.0, 2.0, 2.0, 1.0], 2, 2).unwrap();
        let dist = kernel_to_distance(&kernel).unwrap();
        assert_eq!(dist.get(0, 1), 0.0);
    }

    #[test]
    fn test_not_square() {
        let kernel = Matrix::zeros(2, 3);
        assert!(matches!(
            kernel_to_distance(&kernel),
            Err(Error::NotSquare { .. })
        ));
    }

    #[test]
    fn test_statistics() {
        let values = [2.0f64, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(mean(&values), 5.0);
        assert_eq!(std_dev(&values), 2.0);
        assert_eq!(std_dev::<f32>(&[]), 0.0);
        assert_eq!(argmin(&[3.0, 1.0, f64::NAN, 2.0]), 1);
    }
}
