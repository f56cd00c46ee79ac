//! Plain parameter records for every clustering strategy.
//!
//! Each record can be validated against a point count without running
//! anything, and [`AlgorithmConfig`] dispatches to the matching clusterer.
//! With the `serde` feature these records (de)serialize, e.g. from a JSON
//! or TOML settings file owned by the caller.

use crate::cluster::{
    Clustering, Dbscan, GreedyMerge, Hdbscan, Kmeans, MiniBatch, Seeding, ThresholdAgglomerative,
    DEFAULT_CUT_PERCENTILE,
};
use crate::error::Result;
use crate::point::{Cluster, PointWithContext};

/// K-means parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct KmeansParams {
    /// Number of clusters.
    pub k: usize,
    /// Iteration cap.
    pub max_iter: usize,
    /// Initial centroid selection.
    pub seeding: Seeding,
    /// Use mini-batch fitting with this batch size instead of Lloyd.
    pub batch_size: Option<usize>,
    /// Seed for the mini-batch sampler.
    pub seed: Option<u64>,
}

impl KmeansParams {
    /// Lloyd-based clusterer for these parameters.
    pub fn build(&self) -> Kmeans {
        Kmeans::new(self.k).with_max_iter(self.max_iter).with_seeding(self.seeding)
    }

    /// Mini-batch clusterer; a missing `batch_size` falls back to `k`.
    pub fn build_minibatch(&self) -> Kmeans<MiniBatch> {
        let fitter = MiniBatch {
            batch_size: self.batch_size.unwrap_or(self.k),
            seed: self.seed,
        };
        self.build().with_fitter(fitter)
    }

    /// Check these parameters against a point count.
    pub fn validate(&self, n_points: usize) -> Result<()> {
        match self.batch_size {
            Some(_) => self.build_minibatch().validate(n_points),
            None => self.build().validate(n_points),
        }
    }
}

impl Default for KmeansParams {
    fn default() -> Self {
        Self {
            k: 8,
            max_iter: 100,
            seeding: Seeding::default(),
            batch_size: None,
            seed: None,
        }
    }
}

/// DBSCAN parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DbscanParams {
    /// Neighborhood radius.
    pub epsilon: f64,
    /// Minimum neighborhood size, the point itself included.
    pub min_points: usize,
}

impl DbscanParams {
    /// Clusterer for these parameters.
    pub fn build(&self) -> Dbscan {
        Dbscan::new(self.epsilon, self.min_points)
    }

    /// Check these parameters; DBSCAN accepts any point count.
    pub fn validate(&self, _n_points: usize) -> Result<()> {
        self.build().validate()
    }
}

impl Default for DbscanParams {
    fn default() -> Self {
        Self {
            epsilon: 0.5,
            min_points: 5,
        }
    }
}

/// HDBSCAN parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HdbscanParams {
    /// Minimum component size; also sets the core distance neighbor rank.
    pub min_cluster_size: usize,
    /// Percentile of MST weights used as the cut threshold.
    pub cut_percentile: f64,
}

impl HdbscanParams {
    /// Clusterer for these parameters.
    pub fn build(&self) -> Hdbscan {
        Hdbscan::new(self.min_cluster_size).with_cut_percentile(self.cut_percentile)
    }

    /// Check these parameters against a point count.
    pub fn validate(&self, n_points: usize) -> Result<()> {
        self.build().validate(n_points)
    }
}

impl Default for HdbscanParams {
    fn default() -> Self {
        Self {
            min_cluster_size: 5,
            cut_percentile: DEFAULT_CUT_PERCENTILE,
        }
    }
}

/// Threshold-agglomerative parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ThresholdParams {
    /// Admission distance.
    pub distance_threshold: f64,
    /// Clusters with fewer points are dropped.
    pub min_cluster_size: usize,
}

impl ThresholdParams {
    /// Clusterer for these parameters.
    pub fn build(&self) -> ThresholdAgglomerative {
        ThresholdAgglomerative::new(self.distance_threshold)
            .with_min_cluster_size(self.min_cluster_size)
    }

    /// Check these parameters; the flood fill accepts any point count.
    pub fn validate(&self, _n_points: usize) -> Result<()> {
        self.build().validate()
    }
}

impl Default for ThresholdParams {
    fn default() -> Self {
        Self {
            distance_threshold: 1.0,
            min_cluster_size: 1,
        }
    }
}

/// Greedy-merge parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GreedyMergeParams {
    /// Number of clusters to keep.
    pub cluster_count: usize,
}

impl GreedyMergeParams {
    /// Clusterer for these parameters.
    pub fn build(&self) -> GreedyMerge {
        GreedyMerge::new(self.cluster_count)
    }

    /// Check these parameters against a point count.
    pub fn validate(&self, n_points: usize) -> Result<()> {
        self.build().validate(n_points)
    }
}

impl Default for GreedyMergeParams {
    fn default() -> Self {
        Self { cluster_count: 2 }
    }
}

/// One clustering strategy with its parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "algorithm", rename_all = "snake_case"))]
pub enum AlgorithmConfig {
    /// Partitional k-means.
    Kmeans(KmeansParams),
    /// Density clustering.
    Dbscan(DbscanParams),
    /// Single-cut hierarchical density clustering.
    Hdbscan(HdbscanParams),
    /// Threshold-bounded flood fill.
    Threshold(ThresholdParams),
    /// Greedy merge to a target count.
    GreedyMerge(GreedyMergeParams),
}

impl AlgorithmConfig {
    /// Check the parameters against a point count without clustering.
    pub fn validate(&self, n_points: usize) -> Result<()> {
        match self {
            AlgorithmConfig::Kmeans(p) => p.validate(n_points),
            AlgorithmConfig::Dbscan(p) => p.validate(n_points),
            AlgorithmConfig::Hdbscan(p) => p.validate(n_points),
            AlgorithmConfig::Threshold(p) => p.validate(n_points),
            AlgorithmConfig::GreedyMerge(p) => p.validate(n_points),
        }
    }

    /// Cluster `points` with the configured strategy.
    pub fn run<T: Clone>(&self, points: &[PointWithContext<T>]) -> Result<Vec<Cluster<T>>> {
        match self {
            AlgorithmConfig::Kmeans(p) => match p.batch_size {
                Some(_) => p.build_minibatch().cluster(points),
                None => p.build().cluster(points),
            },
            AlgorithmConfig::Dbscan(p) => p.build().cluster(points),
            AlgorithmConfig::Hdbscan(p) => p.build().cluster(points),
            AlgorithmConfig::Threshold(p) => p.build().cluster(points),
            AlgorithmConfig::GreedyMerge(p) => p.build().cluster(points),
        }
    }
}
