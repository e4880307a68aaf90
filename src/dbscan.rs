//! DBSCAN on a precomputed distance matrix.
//!
//! A point is a core point if at least `min_samples` points (itself included)
//! lie within `epsilon` of it. Clusters grow from core points in index order;
//! a border point joins the first cluster that reaches it, and points reached
//! by no core point are labeled [`NOISE`].

use std::time::Instant;

use log::debug;
#[cfg(not(feature = "perf"))]
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::utils::Matrix;

/// Label assigned to outliers.
pub const NOISE: i32 = -1;

/// Density-based clustering on precomputed distances.
#[derive(Debug, Clone, Copy)]
pub struct Dbscan {
    epsilon: f64,
    min_samples: usize,
}

impl Default for Dbscan {
    fn default() -> Self {
        Self {
            epsilon: 0.5,
            min_samples: 5,
        }
    }
}

impl Dbscan {
    /// Create a new Dbscan instance.
    ///
    /// # Arguments
    ///
    /// * `epsilon` - max distance between two points to be neighbors
    /// * `min_samples` - min number of neighbors (the point included) of a core point
    pub fn new(epsilon: f64, min_samples: usize) -> Self {
        Self {
            epsilon,
            min_samples,
        }
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_min_samples(mut self, min_samples: usize) -> Self {
        self.min_samples = min_samples;
        self
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn min_samples(&self) -> usize {
        self.min_samples
    }

    fn region_query(&self, dist: &Matrix, i: usize) -> Vec<usize> {
        dist.row(i)
            .iter()
            .enumerate()
            .filter(|(_, d)| **d <= self.epsilon)
            .map(|(j, _)| j)
            .collect()
    }

    /// Cluster the samples of a square distance matrix.
    ///
    /// Returns one label per sample: cluster ids `0..k` in order of discovery
    /// and [`NOISE`] for outliers.
    pub fn fit(&self, dist: &Matrix) -> Result<Vec<i32>> {
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return Err(Error::invalid(
                "epsilon",
                format!("must be positive and finite, got {}", self.epsilon),
            ));
        }
        if self.min_samples == 0 {
            return Err(Error::invalid("min_samples", "must be at least 1"));
        }
        let n = dist.square_dim()?;
        if n == 0 {
            return Err(Error::EmptyInput);
        }

        let start = Instant::now();
        #[cfg(feature = "perf")]
        let neighborhoods = (0..n)
            .map(|i| self.region_query(dist, i))
            .collect::<Vec<_>>();
        #[cfg(not(feature = "perf"))]
        let neighborhoods = (0..n)
            .into_par_iter()
            .map(|i| self.region_query(dist, i))
            .collect::<Vec<_>>();
        let is_core = neighborhoods
            .iter()
            .map(|nb| nb.len() >= self.min_samples)
            .collect::<Vec<_>>();
        debug!(
            "DBSCAN: {} core points out of {}, query takes {} s",
            is_core.iter().filter(|&&c| c).count(),
            n,
            start.elapsed().as_secs_f32()
        );

        let mut labels = vec![NOISE; n];
        let mut cluster = 0;
        let mut stack = Vec::new();
        for i in 0..n {
            if labels[i] != NOISE || !is_core[i] {
                continue;
            }
            labels[i] = cluster;
            stack.push(i);
            while let Some(p) = stack.pop() {
                if !is_core[p] {
                    continue;
                }
                for &q in &neighborhoods[p] {
                    if labels[q] == NOISE {
                        labels[q] = cluster;
                        stack.push(q);
                    }
                }
            }
            cluster += 1;
        }
        debug!("DBSCAN: found {} clusters", cluster);
        Ok(labels)
    }
}
