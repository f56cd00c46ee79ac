//! Clustering for 2-D points that carry caller context.
//!
//! `spatial-clump` groups [`PointWithContext`] values, whose context is an
//! arbitrary caller value carried through untouched, with one of five
//! strategies under [`cluster`]:
//! - k-means (deterministic seeding, Lloyd or mini-batch fitting)
//! - DBSCAN (density clustering, noise left out)
//! - HDBSCAN with a single percentile cut of the mutual-reachability MST
//! - threshold-bounded agglomerative flood fill
//! - greedy single-linkage merging to a target count
//!
//! [`hull`] turns clusters into buffered convex boundaries, [`config`] holds
//! plain parameter records, and [`Clusterer`] keeps points and the last result
//! together.
//!
//! Everything is synchronous and in-memory, with O(n²) work for most
//! strategies; the intended scale is a few thousand points.

#![forbid(unsafe_code)]

pub mod cluster;
pub mod config;
pub mod error;
pub mod hull;
pub mod metric;
pub mod point;
pub mod session;

pub use cluster::{
    CentroidFitter, Clustering, Dbscan, GreedyMerge, Hdbscan, HdbscanFit, Kmeans, KmeansFit, Lloyd,
    MiniBatch, Seeding, ThresholdAgglomerative,
};
pub use config::AlgorithmConfig;
pub use error::{Error, Result};
pub use hull::{BufferedConvexHull, HullBuilder};
pub use point::{Cluster, PointWithContext};
pub use session::Clusterer;
