//! Clustering strategies for 2-D points with caller context.
//!
//! Every strategy implements [`Clustering`]: `fit_predict` yields one
//! optional label per point, `cluster` groups the points themselves
//! (contexts included).
//!
//! ## Algorithms
//!
//! ### K-means
//!
//! Assign each point to the nearest centroid, then move centroids to the
//! mean of their points. Repeat. Deterministic seeding; the refinement loop
//! is pluggable through [`CentroidFitter`] ([`Lloyd`], [`MiniBatch`]).
//! Every point lands in exactly one cluster.
//!
//! ### DBSCAN
//!
//! Density-based clustering that discovers non-convex clusters and leaves
//! outliers (noise) out of every cluster.
//!
//! ### HDBSCAN (single cut)
//!
//! Core distances, mutual reachability, a minimum spanning tree, and one
//! percentile cut. Components below the minimum size are left out.
//!
//! ### Threshold agglomerative
//!
//! Flood fill from a seed, admitting points that are close to the whole
//! latest generation of members. Every point lands in exactly one cluster.
//!
//! ### Greedy merge
//!
//! Single-linkage agglomeration down to a fixed number of clusters.
//!
//! ## Usage
//!
//! ```rust
//! use spatial_clump::cluster::{Clustering, Dbscan, GreedyMerge, Kmeans};
//! use spatial_clump::PointWithContext;
//!
//! let points = vec![
//!     PointWithContext::new(0.0, 0.0, "a"),
//!     PointWithContext::new(0.1, 0.1, "b"),
//!     PointWithContext::new(10.0, 10.0, "c"),
//!     PointWithContext::new(10.1, 10.1, "d"),
//! ];
//!
//! let clusters = Kmeans::new(2).cluster(&points).unwrap();
//! assert_eq!(clusters.len(), 2);
//!
//! let labels = Dbscan::new(0.5, 2).fit_predict(&points).unwrap();
//! assert_eq!(labels[0], labels[1]);
//! assert_ne!(labels[0], labels[2]);
//!
//! let clusters = GreedyMerge::new(2).cluster(&points).unwrap();
//! assert_eq!(clusters[0][1].context, "b");
//! ```

mod dbscan;
mod greedy;
mod hdbscan;
mod kmeans;
mod threshold;
mod traits;
mod util;

pub use dbscan::Dbscan;
pub use greedy::GreedyMerge;
pub use hdbscan::{Hdbscan, HdbscanFit, DEFAULT_CUT_PERCENTILE};
pub use kmeans::{CentroidFitter, Kmeans, KmeansFit, Lloyd, MiniBatch, Seeding};
pub use threshold::ThresholdAgglomerative;
pub use traits::Clustering;
