//! Per-cluster statistics of a label assignment.

use std::collections::BTreeMap;

use crate::dbscan::NOISE;
use crate::error::{Error, Result};

/// Number of clusters, not counting noise.
pub fn n_clusters(labels: &[i32]) -> usize {
    let mut unique = labels.iter().filter(|&&l| l != NOISE).collect::<Vec<_>>();
    unique.sort_unstable();
    unique.dedup();
    unique.len()
}

/// Sorted unique labels with their population.
pub fn cluster_sizes(labels: &[i32]) -> Vec<(i32, usize)> {
    let mut sizes = BTreeMap::new();
    for &label in labels {
        *sizes.entry(label).or_insert(0) += 1;
    }
    sizes.into_iter().collect()
}

/// Sorted unique labels with the mean of `values` over their members.
pub fn cluster_means(labels: &[i32], values: &[f64]) -> Result<Vec<(i32, f64)>> {
    if labels.len() != values.len() {
        return Err(Error::LengthMismatch {
            expected: labels.len(),
            found: values.len(),
        });
    }
    let mut sums = BTreeMap::new();
    for (&label, &v) in labels.iter().zip(values.iter()) {
        let entry = sums.entry(label).or_insert((0.0, 0usize));
        entry.0 += v;
        entry.1 += 1;
    }
    Ok(sums
        .into_iter()
        .map(|(label, (sum, count))| (label, sum / count as f64))
        .collect())
}

/// Size and 2D center of one cluster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterStat {
    pub label: i32,
    pub size: usize,
    pub center: (f64, f64),
}

/// Size and center of every label in a 2D projection.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterSummary {
    stats: Vec<ClusterStat>,
}

impl ClusterSummary {
    pub fn new(labels: &[i32], xs: &[f64], ys: &[f64]) -> Result<Self> {
        let mx = cluster_means(labels, xs)?;
        let my = cluster_means(labels, ys)?;
        let stats = cluster_sizes(labels)
            .into_iter()
            .zip(mx.into_iter().zip(my))
            .map(|((label, size), ((_, x), (_, y)))| ClusterStat {
                label,
                size,
                center: (x, y),
            })
            .collect();
        Ok(Self { stats })
    }

    /// All labels, noise included, sorted by label.
    pub fn stats(&self) -> &[ClusterStat] {
        &self.stats
    }

    /// Labels other than noise.
    pub fn clusters(&self) -> impl Iterator<Item = &ClusterStat> {
        self.stats.iter().filter(|s| s.label >= 0)
    }

    pub fn get(&self, label: i32) -> Option<&ClusterStat> {
        self.stats.iter().find(|s| s.label == label)
    }
}

#[cfg(test)]
mod test {
    use super::{ClusterSummary, cluster_means, cluster_sizes, n_clusters};

    #[test]
    fn test_sizes() {
        let labels = [1, 0, -1, 1, 1, 2, -1];
        assert_eq!(n_clusters(&labels), 3);
        assert_eq!(n_clusters(&[-1, -1]), 0);
        assert_eq!(
            cluster_sizes(&labels),
            vec![(-1, 2), (0, 1), (1, 3), (2, 1)]
        );
    }

    #[test]
    fn test_means() {
        let labels = [0, 1, 0, 1];
        let values = [1.0, 10.0, 3.0, 20.0];
        assert_eq!(
            cluster_means(&labels, &values).unwrap(),
            vec![(0, 2.0), (1, 15.0)]
        );
        assert!(cluster_means(&labels, &values[..3]).is_err());
    }

    #[test]
    fn test_summary() {
        let labels = [0, -1, 0, 1];
        let xs = [0.0, 5.0, 2.0, -1.0];
        let ys = [1.0, 5.0, 3.0, -2.0];
        let summary = ClusterSummary::new(&labels, &xs, &ys).unwrap();
        assert_eq!(summary.stats().len(), 3);
        assert_eq!(summary.clusters().count(), 2);
        let first = summary.get(0).unwrap();
        assert_eq!(first.size, 2);
        assert_eq!(first.center, (1.0, 2.0));
        assert_eq!(summary.get(-1).unwrap().center, (5.0, 5.0));
        assert!(summary.get(7).is_none());
    }
}
