//! HDBSCAN with a single global cut.
//!
//! HDBSCAN (Campello, Moulavi, Sander 2013) replaces DBSCAN's global epsilon
//! with a hierarchy of density-based clusters. This module keeps the density
//! estimate and the spanning-tree skeleton of HDBSCAN but extracts a flat
//! partition with one threshold instead of stability scoring, which makes the
//! output deterministic and easy to reason about.
//!
//! # Algorithm Outline
//!
//! 1. **Core distance**: for each point, the distance to its
//!    `(min_cluster_size - 1)`-th nearest neighbor (0 when that is 0).
//!
//! 2. **Mutual reachability distance**:
//!    `mrd(i, j) = max(core[i], core[j], dist(i, j))`.
//!
//! 3. **MST on the mutual reachability graph**: dense Prim, O(n²), grown from
//!    point 0 with the lowest index winning ties.
//!
//! 4. **Cut**: the threshold is the `cut_percentile` (default 75th) of the
//!    MST edge weights; every edge strictly above it is removed.
//!
//! 5. **Components**: union-find over the surviving edges. Components with
//!    fewer than `min_cluster_size` points are dropped; their points belong
//!    to no cluster.
//!
//! Clusters are labeled in order of their lowest point index.
//!
//! # References
//!
//! Campello, R. J. G. B., Moulavi, D., Sander, J. (2013). "Density-Based Clustering
//! Based on Hierarchical Density Estimates." PAKDD 2013.

use super::traits::Clustering;
use super::util::{self, UnionFind};
use crate::error::{Error, Result};
use crate::metric::pairwise_distances;
use crate::point::{coords_of, PointWithContext};
use tracing::debug;

/// Default percentile of MST edge weights used as the cut threshold.
pub const DEFAULT_CUT_PERCENTILE: f64 = 75.0;

/// Simplified single-cut HDBSCAN.
#[derive(Debug, Clone)]
pub struct Hdbscan {
    min_cluster_size: usize,
    cut_percentile: f64,
}

/// Intermediate products and labels of an HDBSCAN run.
#[derive(Debug, Clone, PartialEq)]
pub struct HdbscanFit {
    /// Core distance per point.
    pub core_distances: Vec<f64>,
    /// MST edges `(u, v, mutual_reachability)` in the order Prim added them.
    pub mst: Vec<(usize, usize, f64)>,
    /// Cut threshold; `None` when the tree has no edges.
    pub threshold: Option<f64>,
    /// Cluster per point, `None` for points in undersized components.
    pub labels: Vec<Option<usize>>,
}

impl Hdbscan {
    /// Create a clusterer with the given minimum cluster size.
    pub fn new(min_cluster_size: usize) -> Self {
        Self {
            min_cluster_size,
            cut_percentile: DEFAULT_CUT_PERCENTILE,
        }
    }

    /// Set `min_cluster_size` (also drives the core distance neighbor rank).
    pub fn with_min_cluster_size(mut self, min_cluster_size: usize) -> Self {
        self.min_cluster_size = min_cluster_size;
        self
    }

    /// Set the MST weight percentile, in `[0, 100]`, used as the cut threshold.
    pub fn with_cut_percentile(mut self, cut_percentile: f64) -> Self {
        self.cut_percentile = cut_percentile;
        self
    }

    /// Check the configuration against a point count before any work starts.
    ///
    /// An empty point set is accepted for any `min_cluster_size >= 1` and
    /// clusters to nothing.
    pub fn validate(&self, n: usize) -> Result<()> {
        if self.min_cluster_size == 0 {
            return Err(Error::InvalidConfiguration {
                name: "min_cluster_size",
                message: "must be at least 1",
            });
        }
        if !(0.0..=100.0).contains(&self.cut_percentile) {
            return Err(Error::InvalidConfiguration {
                name: "cut_percentile",
                message: "must lie in [0, 100]",
            });
        }
        if n > 0 && self.min_cluster_size > n {
            return Err(Error::InvalidClusterCount {
                requested: self.min_cluster_size,
                n_items: n,
            });
        }
        Ok(())
    }

    /// Run the full pipeline and return every intermediate product.
    pub fn fit<T>(&self, points: &[PointWithContext<T>]) -> Result<HdbscanFit> {
        let n = points.len();
        self.validate(n)?;

        let coords = coords_of(points);
        let dists = pairwise_distances(&coords);
        let core = core_distances(&dists, n, self.min_cluster_size - 1);

        let mst = util::prim_mst(n, |i, j| {
            mutual_reachability(dists[i * n + j], core[i], core[j])
        });

        let threshold = cut_threshold(&mst, self.cut_percentile);
        let labels = extract_clusters(&mst, n, threshold, self.min_cluster_size);

        debug!(
            n,
            min_cluster_size = self.min_cluster_size,
            mst_edges = mst.len(),
            threshold = ?threshold,
            clusters = labels.iter().flatten().max().map_or(0, |&l| l + 1),
            "hdbscan finished"
        );

        Ok(HdbscanFit {
            core_distances: core,
            mst,
            threshold,
            labels,
        })
    }
}

impl Default for Hdbscan {
    fn default() -> Self {
        Self::new(5)
    }
}

impl Clustering for Hdbscan {
    fn fit_predict<T>(&self, points: &[PointWithContext<T>]) -> Result<Vec<Option<usize>>> {
        Ok(self.fit(points)?.labels)
    }

    fn n_clusters(&self) -> usize {
        0
    }
}

/// Distance from each point to its `k`-th nearest other point.
fn core_distances(dists: &[f64], n: usize, k: usize) -> Vec<f64> {
    if k == 0 {
        return vec![0.0; n];
    }
    let mut core = Vec::with_capacity(n);
    let mut row: Vec<f64> = Vec::with_capacity(n.saturating_sub(1));
    for i in 0..n {
        row.clear();
        row.extend((0..n).filter(|&j| j != i).map(|j| dists[i * n + j]));
        row.sort_by(f64::total_cmp);
        core.push(row[k.min(row.len()) - 1]);
    }
    core
}

#[inline]
fn mutual_reachability(dist: f64, core_i: f64, core_j: f64) -> f64 {
    dist.max(core_i).max(core_j)
}

/// Weight at index `floor(m * percentile / 100)` of the ascending edge weights.
fn cut_threshold(mst: &[(usize, usize, f64)], percentile: f64) -> Option<f64> {
    if mst.is_empty() {
        return None;
    }
    let mut weights: Vec<f64> = mst.iter().map(|e| e.2).collect();
    weights.sort_by(f64::total_cmp);
    let m = weights.len();
    let idx = ((m as f64) * percentile / 100.0) as usize;
    Some(weights[idx.min(m - 1)])
}

fn extract_clusters(
    mst: &[(usize, usize, f64)],
    n: usize,
    threshold: Option<f64>,
    min_cluster_size: usize,
) -> Vec<Option<usize>> {
    let mut uf = UnionFind::new(n);
    if let Some(t) = threshold {
        for &(u, v, w) in mst {
            if w <= t {
                uf.union(u, v);
            }
        }
    }

    let roots: Vec<usize> = (0..n).map(|i| uf.find(i)).collect();
    let mut sizes = vec![0usize; n];
    for &r in &roots {
        sizes[r] += 1;
    }

    // Labels follow the first appearance of each surviving root.
    let mut root_label: Vec<Option<usize>> = vec![None; n];
    let mut next_label = 0usize;
    let mut labels = vec![None; n];
    for (i, &r) in roots.iter().enumerate() {
        if sizes[r] < min_cluster_size {
            continue;
        }
        let label = *root_label[r].get_or_insert_with(|| {
            let l = next_label;
            next_label += 1;
            l
        });
        labels[i] = Some(label);
    }
    labels
}
