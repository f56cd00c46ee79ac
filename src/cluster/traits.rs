use super::util;
use crate::error::Result;
use crate::point::{Cluster, PointWithContext};

/// Common interface for the clustering strategies.
pub trait Clustering {
    /// Return one label per input point; `None` marks a point that belongs to
    /// no cluster (DBSCAN noise, HDBSCAN components below the minimum size,
    /// ...).
    fn fit_predict<T>(&self, points: &[PointWithContext<T>]) -> Result<Vec<Option<usize>>>;

    /// Group the input points into clusters.
    ///
    /// Clusters come out in label order, and points keep their input order
    /// inside each cluster. Contexts are cloned.
    fn cluster<T: Clone>(&self, points: &[PointWithContext<T>]) -> Result<Vec<Cluster<T>>> {
        let labels = self.fit_predict(points)?;
        Ok(util::group_by_label(points, &labels))
    }

    /// The configured number of clusters, or 0 for algorithms that discover it.
    fn n_clusters(&self) -> usize;
}
