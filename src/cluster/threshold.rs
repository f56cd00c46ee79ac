//! Threshold-bounded agglomerative grouping (flood fill).
//!
//! Clusters grow from a seed in generations. The seed is the first
//! generation; each pass scans every unassigned point (in input order) and
//! admits, all at once, the points that lie within `distance_threshold` of
//! every member of the latest generation. The admitted points form the next
//! generation, and growth stops when a pass admits nothing. Then the next
//! unassigned point in input order seeds the next cluster.
//!
//! Admission is never re-checked later: on the line `(0,0) (1,0) (2,0)` with
//! threshold 1.5, `(1,0)` joins through the seed and `(2,0)` joins through
//! `(1,0)`, even though `(0,0)` and `(2,0)` are 2 apart. A candidate must be
//! close to the whole latest generation rather than to any single member,
//! which makes this stricter than single linkage. It is not textbook complete
//! linkage, which compares whole clusters.
//!
//! Every point ends up in exactly one grown cluster. Clusters smaller than
//! `min_cluster_size` (default 1, which keeps everything) are then dropped
//! and their points labeled `None`; surviving clusters are renumbered in
//! emission order. Cluster contents and emission order depend only on the
//! input order.

use super::traits::Clustering;
use crate::error::{Error, Result};
use crate::metric::euclidean;
use crate::point::{coords_of, PointWithContext};
use tracing::{debug, trace};

/// Flood-fill clusterer bounded by a distance threshold.
#[derive(Debug, Clone)]
pub struct ThresholdAgglomerative {
    distance_threshold: f64,
    min_cluster_size: usize,
}

impl ThresholdAgglomerative {
    /// Create a clusterer with the given admission distance.
    pub fn new(distance_threshold: f64) -> Self {
        Self {
            distance_threshold,
            min_cluster_size: 1,
        }
    }

    /// Set the admission distance.
    pub fn with_distance_threshold(mut self, distance_threshold: f64) -> Self {
        self.distance_threshold = distance_threshold;
        self
    }

    /// Drop clusters with fewer than `min_cluster_size` points.
    pub fn with_min_cluster_size(mut self, min_cluster_size: usize) -> Self {
        self.min_cluster_size = min_cluster_size;
        self
    }

    /// Check the configuration before any work starts.
    pub fn validate(&self) -> Result<()> {
        if !self.distance_threshold.is_finite() || self.distance_threshold < 0.0 {
            return Err(Error::InvalidConfiguration {
                name: "distance_threshold",
                message: "must be finite and non-negative",
            });
        }
        if self.min_cluster_size == 0 {
            return Err(Error::InvalidConfiguration {
                name: "min_cluster_size",
                message: "must be at least 1",
            });
        }
        Ok(())
    }

    /// Grow one cluster from `seed`, labeling admitted points with `label`.
    fn grow(
        &self,
        coords: &[[f64; 2]],
        seed: usize,
        label: usize,
        labels: &mut [Option<usize>],
    ) -> usize {
        labels[seed] = Some(label);
        let mut frontier = vec![seed];
        let mut size = 1;

        while !frontier.is_empty() {
            let admitted: Vec<usize> = (0..coords.len())
                .filter(|&i| labels[i].is_none())
                .filter(|&i| {
                    frontier
                        .iter()
                        .all(|&m| euclidean(coords[i], coords[m]) <= self.distance_threshold)
                })
                .collect();

            for &i in &admitted {
                labels[i] = Some(label);
            }
            size += admitted.len();
            trace!(label, admitted = admitted.len(), "flood-fill pass");
            frontier = admitted;
        }
        size
    }
}

impl Clustering for ThresholdAgglomerative {
    fn fit_predict<T>(&self, points: &[PointWithContext<T>]) -> Result<Vec<Option<usize>>> {
        self.validate()?;

        let coords = coords_of(points);
        let mut labels: Vec<Option<usize>> = vec![None; coords.len()];
        let mut sizes = Vec::new();

        for seed in 0..coords.len() {
            if labels[seed].is_some() {
                continue;
            }
            let label = sizes.len();
            let size = self.grow(&coords, seed, label, &mut labels);
            trace!(label, seed, size, "cluster emitted");
            sizes.push(size);
        }

        // Renumber surviving clusters; undersized ones become `None`.
        let mut next = 0usize;
        let remap: Vec<Option<usize>> = sizes
            .iter()
            .map(|&size| {
                (size >= self.min_cluster_size).then(|| {
                    next += 1;
                    next - 1
                })
            })
            .collect();
        for label in labels.iter_mut() {
            *label = label.and_then(|l| remap[l]);
        }

        debug!(
            n = coords.len(),
            distance_threshold = self.distance_threshold,
            min_cluster_size = self.min_cluster_size,
            grown = sizes.len(),
            clusters = next,
            "threshold agglomeration finished"
        );
        Ok(labels)
    }

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

    fn contexts(clusters: &[Vec<PointWithContext<usize>>]) -> Vec<Vec<usize>> {
        clusters
            .iter()
            .map(|c| c.iter().map(|p| p.context).collect())
            .collect()
    }

    #[test]
    fn chain_joins_through_latest_generation() {
        let data = pts(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (100.0, 100.0)]);
        let clusters = ThresholdAgglomerative::new(1.5).cluster(&data).unwrap();
        assert_eq!(contexts(&clusters), vec![vec![0, 1, 2], vec![3]]);
    }

    #[test]
    fn generation_must_be_fully_within_threshold() {
        // Seed 0 admits 1 and 2 together. Point 3 is within 1.5 of point 2
        // but about 3 from point 1, so it cannot join the generation {1, 2}.
        let data = pts(&[(0.0, 0.0), (-1.0, 0.0), (1.0, 0.0), (2.0, 0.5)]);
        let clusters = ThresholdAgglomerative::new(1.5).cluster(&data).unwrap();
        assert_eq!(contexts(&clusters), vec![vec![0, 1, 2], vec![3]]);
    }

    #[test]
    fn emission_follows_input_order() {
        let data = pts(&[(50.0, 0.0), (0.0, 0.0), (50.5, 0.0), (0.5, 0.0)]);
        let clusters = ThresholdAgglomerative::new(1.0).cluster(&data).unwrap();
        assert_eq!(contexts(&clusters), vec![vec![0, 2], vec![1, 3]]);
    }

    #[test]
    fn zero_threshold_groups_duplicates_only() {
        let data = pts(&[(1.0, 1.0), (2.0, 2.0), (1.0, 1.0)]);
        let clusters = ThresholdAgglomerative::new(0.0).cluster(&data).unwrap();
        assert_eq!(contexts(&clusters), vec![vec![0, 2], vec![1]]);
    }

    #[test]
    fn degenerate_inputs() {
        let empty: Vec<PointWithContext<usize>> = vec![];
        assert!(ThresholdAgglomerative::new(1.0).cluster(&empty).unwrap().is_empty());

        let one = pts(&[(3.0, 3.0)]);
        let clusters = ThresholdAgglomerative::new(1.0).cluster(&one).unwrap();
        assert_eq!(contexts(&clusters), vec![vec![0]]);
    }

    #[test]
    fn undersized_clusters_are_omitted() {
        let data = pts(&[(0.0, 0.0), (50.0, 50.0), (1.0, 0.0), (0.5, 0.5)]);
        let model = ThresholdAgglomerative::new(1.5).with_min_cluster_size(2);

        let labels = model.fit_predict(&data).unwrap();
        assert_eq!(labels, vec![Some(0), None, Some(0), Some(0)]);
        assert_eq!(contexts(&model.cluster(&data).unwrap()), vec![vec![0, 2, 3]]);

        // The lone point is still its own cluster at the default size.
        let clusters = ThresholdAgglomerative::new(1.5).cluster(&data).unwrap();
        assert_eq!(contexts(&clusters), vec![vec![0, 2, 3], vec![1]]);
    }

    #[test]
    fn surviving_clusters_are_renumbered() {
        let data = pts(&[(9.0, 9.0), (0.0, 0.0), (0.2, 0.0), (30.0, 0.0), (30.2, 0.0)]);
        let labels = ThresholdAgglomerative::new(1.0)
            .with_min_cluster_size(2)
            .fit_predict(&data)
            .unwrap();
        assert_eq!(labels, vec![None, Some(0), Some(0), Some(1), Some(1)]);
    }

    #[test]
    fn invalid_threshold() {
        let data = pts(&[(0.0, 0.0)]);
        assert!(ThresholdAgglomerative::new(-0.1).cluster(&data).is_err());
        assert!(ThresholdAgglomerative::new(f64::INFINITY).cluster(&data).is_err());
        let err = ThresholdAgglomerative::new(1.0)
            .with_min_cluster_size(0)
            .cluster(&data)
            .unwrap_err();
        assert!(err.is_invalid_configuration());
    }
}
