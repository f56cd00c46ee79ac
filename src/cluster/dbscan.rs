//! DBSCAN: Density-Based Spatial Clustering of Applications with Noise.
//!
//! # The Algorithm (Ester et al., 1996)
//!
//! DBSCAN groups points based on neighborhood density. Unlike k-means, it:
//!
//! - Discovers clusters of arbitrary shape
//! - Automatically determines the number of clusters
//! - Identifies noise points (outliers)
//!
//! ## Core Concepts
//!
//! - **Epsilon (ε)**: Maximum distance between two points to be neighbors.
//! - **MinPts**: Minimum size of the ε-neighborhood (the point itself included)
//!   for a point to be "core".
//! - **Core point**: Has at least MinPts points within ε.
//! - **Border point**: Within ε of a core point but not core itself.
//! - **Noise point**: Neither core nor border.
//!
//! ## Algorithm Steps
//!
//! 1. For each unvisited point P:
//!    - Find neighbors within ε
//!    - If the neighborhood is smaller than MinPts, mark P as noise (may change later)
//!    - Else P is core: open a new cluster and expand breadth-first
//!
//! 2. Expansion: each dequeued point joins the cluster if it is unclassified
//!    or noise; only core points enqueue their own neighbors.
//!
//! ## Complexity
//!
//! - **Time**: O(n²), every region query is a linear scan.
//! - **Space**: O(n) for labels.
//!
//! ## References
//!
//! Ester et al. (1996). "A Density-Based Algorithm for Discovering Clusters
//! in Large Spatial Databases with Noise." KDD-96.

use std::collections::VecDeque;

use super::traits::Clustering;
use crate::error::{Error, Result};
use crate::metric::euclidean;
use crate::point::{coords_of, PointWithContext};
use tracing::debug;

/// DBSCAN clustering algorithm.
#[derive(Debug, Clone)]
pub struct Dbscan {
    /// Epsilon: maximum distance for neighborhood.
    epsilon: f64,
    /// Minimum neighborhood size (self included) for a core point.
    min_pts: usize,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Label {
    Unclassified,
    /// Visited but not density-reachable yet; may be promoted to border.
    Noise,
    Cluster(usize),
}

impl Dbscan {
    /// Create a new DBSCAN clusterer.
    ///
    /// # Arguments
    ///
    /// * `epsilon` - Maximum distance between two points to be neighbors.
    /// * `min_pts` - Minimum number of points (including the point itself) to form a dense region.
    pub fn new(epsilon: f64, min_pts: usize) -> Self {
        Self { epsilon, min_pts }
    }

    /// Set epsilon (neighborhood radius).
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Set minimum points for core classification.
    pub fn with_min_pts(mut self, min_pts: usize) -> Self {
        self.min_pts = min_pts;
        self
    }

    /// Check the configuration before any work starts.
    pub fn validate(&self) -> Result<()> {
        if !self.epsilon.is_finite() || self.epsilon < 0.0 {
            return Err(Error::InvalidConfiguration {
                name: "epsilon",
                message: "must be finite and non-negative",
            });
        }
        if self.min_pts == 0 {
            return Err(Error::InvalidConfiguration {
                name: "min_pts",
                message: "must be at least 1",
            });
        }
        Ok(())
    }

    /// Find all other points within epsilon.
    fn region_query(&self, coords: &[[f64; 2]], point_idx: usize) -> Vec<usize> {
        let point = coords[point_idx];
        coords
            .iter()
            .enumerate()
            .filter(|&(idx, &other)| idx != point_idx && euclidean(point, other) <= self.epsilon)
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Expand cluster from a core point.
    fn expand_cluster(
        &self,
        coords: &[[f64; 2]],
        neighbors: Vec<usize>,
        labels: &mut [Label],
        cluster_id: usize,
        visited: &mut [bool],
    ) {
        let mut queue: VecDeque<usize> = neighbors.into();

        while let Some(idx) = queue.pop_front() {
            // A point previously labeled noise becomes a border point here, so
            // the label is assigned before the `visited` check.
            if matches!(labels[idx], Label::Unclassified | Label::Noise) {
                labels[idx] = Label::Cluster(cluster_id);
            }

            if visited[idx] {
                continue;
            }
            visited[idx] = true;

            let next = self.region_query(coords, idx);
            if next.len() + 1 >= self.min_pts {
                queue.extend(next.into_iter().filter(|&nn| !visited[nn]));
            }
        }
    }
}

impl Default for Dbscan {
    fn default() -> Self {
        Self::new(0.5, 5)
    }
}

impl Clustering for Dbscan {
    fn fit_predict<T>(&self, points: &[PointWithContext<T>]) -> Result<Vec<Option<usize>>> {
        self.validate()?;

        let n = points.len();
        let coords = coords_of(points);
        let mut labels = vec![Label::Unclassified; n];
        let mut visited = vec![false; n];
        let mut cluster_id = 0usize;

        for point_idx in 0..n {
            if visited[point_idx] {
                continue;
            }
            visited[point_idx] = true;

            let neighbors = self.region_query(&coords, point_idx);
            if neighbors.len() + 1 < self.min_pts {
                labels[point_idx] = Label::Noise;
                continue;
            }

            labels[point_idx] = Label::Cluster(cluster_id);
            self.expand_cluster(&coords, neighbors, &mut labels, cluster_id, &mut visited);
            cluster_id += 1;
        }

        let out: Vec<Option<usize>> = labels
            .into_iter()
            .map(|l| match l {
                Label::Cluster(c) => Some(c),
                _ => None,
            })
            .collect();

        debug!(
            n,
            epsilon = self.epsilon,
            min_pts = self.min_pts,
            clusters = cluster_id,
            noise = out.iter().filter(|l| l.is_none()).count(),
            "dbscan finished"
        );
        Ok(out)
    }

    /// DBSCAN discovers clusters dynamically, so this returns 0.
    fn n_clusters(&self) -> usize {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(coords: &[(f64, f64)]) -> Vec<PointWithContext<usize>> {
        coords
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| PointWithContext::new(x, y, i))
            .collect()
    }

    #[test]
    fn test_dbscan_two_clusters() {
        let data = pts(&[
            (0.0, 0.0),
            (0.1, 0.0),
            (0.0, 0.1),
            (0.1, 0.1),
            (0.05, 0.05),
            (5.0, 5.0),
            (5.1, 5.0),
            (5.0, 5.1),
            (5.1, 5.1),
            (5.05, 5.05),
        ]);

        let labels = Dbscan::new(0.3, 3).fit_predict(&data).unwrap();

        assert!(labels[..5].iter().all(|&l| l == Some(0)));
        assert!(labels[5..].iter().all(|&l| l == Some(1)));
    }

    #[test]
    fn test_dbscan_with_noise() {
        let data = pts(&[
            (0.0, 0.0),
            (0.1, 0.0),
            (0.0, 0.1),
            (0.1, 0.1),
            (100.0, 100.0),
            (5.0, 5.0),
            (5.1, 5.0),
            (5.0, 5.1),
            (5.1, 5.1),
        ]);

        let clusters = Dbscan::new(0.3, 3).cluster(&data).unwrap();
        assert_eq!(clusters.len(), 2);
        assert!(clusters.iter().flatten().all(|p| p.context != 4));
    }

    #[test]
    fn test_dbscan_border_point_absorbed_from_noise() {
        // Point 0 is visited first and has too few neighbors, but it lies
        // within epsilon of the core point 1.
        let data = pts(&[(-0.9, 0.0), (0.0, 0.0), (0.5, 0.0), (0.0, 0.5), (0.5, 0.5)]);
        let labels = Dbscan::new(1.0, 4).fit_predict(&data).unwrap();
        assert!(labels.iter().all(|&l| l == Some(0)), "labels: {labels:?}");
    }

    #[test]
    fn test_dbscan_border_does_not_expand() {
        // 0..=3 is a dense blob; 4 is a border point of the blob; 5 is only
        // near 4 and must stay noise because 4 is not core.
        let data = pts(&[(0.0, 0.0), (0.2, 0.0), (0.0, 0.2), (0.2, 0.2), (1.1, 0.1), (2.0, 0.1)]);
        let labels = Dbscan::new(1.0, 5).fit_predict(&data).unwrap();
        assert_eq!(labels[4], Some(0));
        assert_eq!(labels[5], None);
    }

    #[test]
    fn test_dbscan_all_noise() {
        let data = pts(&[(0.0, 0.0), (10.0, 0.0), (0.0, 10.0), (10.0, 10.0)]);
        let labels = Dbscan::new(0.5, 3).fit_predict(&data).unwrap();
        assert!(labels.iter().all(Option::is_none));
        assert!(Dbscan::new(0.5, 3).cluster(&data).unwrap().is_empty());
    }

    #[test]
    fn test_dbscan_chain() {
        let data: Vec<_> = (0..10).map(|i| PointWithContext::new(i as f64 * 0.3, 0.0, i)).collect();
        let clusters = Dbscan::new(0.5, 2).cluster(&data).unwrap();
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].len(), 10);
    }

    #[test]
    fn test_dbscan_empty_is_ok() {
        let data: Vec<PointWithContext<()>> = vec![];
        assert!(Dbscan::new(0.5, 3).cluster(&data).unwrap().is_empty());
    }

    #[test]
    fn test_dbscan_min_pts_one_keeps_isolated_points() {
        let data = pts(&[(0.0, 0.0), (50.0, 0.0)]);
        let clusters = Dbscan::new(1.0, 1).cluster(&data).unwrap();
        assert_eq!(clusters.len(), 2);
    }

    #[test]
    fn test_dbscan_invalid_params() {
        let data = pts(&[(0.0, 0.0)]);
        assert!(Dbscan::new(-1.0, 3).fit_predict(&data).is_err());
        assert!(Dbscan::new(f64::NAN, 3).fit_predict(&data).is_err());
        assert!(Dbscan::new(0.5, 0).fit_predict(&data).is_err());
    }
}
