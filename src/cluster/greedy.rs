//! Agglomerative clustering down to a target cluster count.
//!
//! Starts from one singleton cluster per point and repeatedly merges the two
//! clusters with the smallest single-linkage distance (closest pair of
//! points across the two clusters) until `n_clusters` remain.
//!
//! The inter-cluster distances live in a dense matrix updated with the
//! single-linkage rule `d(a ∪ b, c) = min(d(a, c), d(b, c))`, so each merge
//! step costs O(n²). Intended for inputs in the low thousands of points.
//!
//! Ties go to the first pair `(i, j)`, `i < j`, in cluster order. The merged
//! cluster keeps the position of `i`; points keep input order inside it.

use super::traits::Clustering;
use crate::error::{Error, Result};
use crate::metric::pairwise_distances;
use crate::point::{coords_of, PointWithContext};
use tracing::{debug, trace};

/// Greedy nearest-cluster merging.
#[derive(Debug, Clone)]
pub struct GreedyMerge {
    n_clusters: usize,
}

impl GreedyMerge {
    /// Create a clusterer producing exactly `n_clusters` clusters.
    pub fn new(n_clusters: usize) -> Self {
        Self { n_clusters }
    }

    /// Check the configuration against a point count before any work starts.
    pub fn validate(&self, n: usize) -> Result<()> {
        if self.n_clusters == 0 {
            return Err(Error::InvalidConfiguration {
                name: "n_clusters",
                message: "must be at least 1",
            });
        }
        if self.n_clusters > n {
            return Err(Error::InvalidClusterCount {
                requested: self.n_clusters,
                n_items: n,
            });
        }
        Ok(())
    }

    /// Merge until `n_clusters` remain; returns member indices per cluster.
    fn merge(&self, coords: &[[f64; 2]]) -> Vec<Vec<usize>> {
        let n = coords.len();
        let mut dist = pairwise_distances(coords);
        let mut members: Vec<Vec<usize>> = (0..n).map(|i| vec![i]).collect();
        // Slots of live clusters, always ascending.
        let mut active: Vec<usize> = (0..n).collect();

        while active.len() > self.n_clusters {
            let mut best = (0, 1);
            let mut best_dist = f64::INFINITY;
            for (a, &i) in active.iter().enumerate() {
                for (b, &j) in active.iter().enumerate().skip(a + 1) {
                    let d = dist[i * n + j];
                    if d < best_dist {
                        best_dist = d;
                        best = (a, b);
                    }
                }
            }

            let (a, b) = best;
            let (i, j) = (active[a], active[b]);
            trace!(into = i, from = j, distance = best_dist, "merge");

            for &k in &active {
                let d = dist[i * n + k].min(dist[j * n + k]);
                dist[i * n + k] = d;
                dist[k * n + i] = d;
            }
            let moved = std::mem::take(&mut members[j]);
            members[i].extend(moved);
            active.remove(b);
        }

        active
            .into_iter()
            .map(|slot| {
                let mut m = std::mem::take(&mut members[slot]);
                m.sort_unstable();
                m
            })
            .collect()
    }
}

impl Clustering for GreedyMerge {
    fn fit_predict<T>(&self, points: &[PointWithContext<T>]) -> Result<Vec<Option<usize>>> {
        let n = points.len();
        self.validate(n)?;

        let groups = self.merge(&coords_of(points));
        let mut labels = vec![None; n];
        for (label, group) in groups.iter().enumerate() {
            for &i in group {
                labels[i] = Some(label);
            }
        }

        debug!(n, n_clusters = self.n_clusters, "greedy merge finished");
        Ok(labels)
    }

    fn n_clusters(&self) -> usize {
        self.n_clusters
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn pts(coords: &[(f64, f64)]) -> Vec<PointWithContext<usize>> {
        coords
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| PointWithContext::new(x, y, i))
            .collect()
    }

    fn context_sets(clusters: &[Vec<PointWithContext<usize>>]) -> BTreeSet<BTreeSet<usize>> {
        clusters
            .iter()
            .map(|c| c.iter().map(|p| p.context).collect())
            .collect()
    }

    #[test]
    fn recovers_two_triples() {
        let data = pts(&[
            (0.0, 0.0),
            (50.0, 50.0),
            (1.0, 0.0),
            (51.0, 50.0),
            (0.0, 1.0),
            (50.0, 51.0),
        ]);
        let clusters = GreedyMerge::new(2).cluster(&data).unwrap();
        let expected: BTreeSet<BTreeSet<usize>> = [[0, 2, 4], [1, 3, 5]]
            .into_iter()
            .map(|c| c.into_iter().collect())
            .collect();
        assert_eq!(context_sets(&clusters), expected);
    }

    #[test]
    fn single_linkage_chains() {
        // Chain 0-1-2 with gaps 1, then far point 3. Single linkage must keep the chain.
        let data = pts(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (10.0, 0.0)]);
        let labels = GreedyMerge::new(2).fit_predict(&data).unwrap();
        assert_eq!(labels, vec![Some(0), Some(0), Some(0), Some(1)]);
    }

    #[test]
    fn tie_break_takes_first_pair() {
        // Equidistant points: the first pair (0, 1) merges, then (0, 2) since
        // its distance to the merged cluster ties with (2, 3) and comes first.
        let data = pts(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)]);
        let labels = GreedyMerge::new(2).fit_predict(&data).unwrap();
        assert_eq!(labels, vec![Some(0), Some(0), Some(0), Some(1)]);
    }

    #[test]
    fn count_equal_to_n_is_identity() {
        let data = pts(&[(0.0, 0.0), (0.0, 0.0), (5.0, 5.0)]);
        let clusters = GreedyMerge::new(3).cluster(&data).unwrap();
        assert_eq!(clusters.len(), 3);
        assert!(clusters.iter().all(|c| c.len() == 1));
    }

    #[test]
    fn single_point_and_single_cluster() {
        let one = pts(&[(1.0, 2.0)]);
        assert_eq!(GreedyMerge::new(1).cluster(&one).unwrap().len(), 1);

        let data = pts(&[(0.0, 0.0), (9.0, 9.0), (3.0, 1.0)]);
        let clusters = GreedyMerge::new(1).cluster(&data).unwrap();
        assert_eq!(clusters[0].iter().map(|p| p.context).collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn invalid_cluster_count() {
        let data = pts(&[(0.0, 0.0), (1.0, 0.0)]);
        assert!(GreedyMerge::new(0).cluster(&data).unwrap_err().is_invalid_configuration());
        assert!(GreedyMerge::new(3).cluster(&data).is_err());

        let empty: Vec<PointWithContext<usize>> = vec![];
        assert!(GreedyMerge::new(1).cluster(&empty).is_err());
    }
}
