//! A clusterer instance that owns its points and its last result.

use tracing::debug;

use crate::cluster::Clustering;
use crate::error::Result;
use crate::point::{Cluster, PointWithContext};

/// Owns a point collection, an algorithm and the clusters of the last run.
///
/// [`Clusterer::execute`] is synchronous and replaces the previous result.
/// A failed run leaves the previous result in place.
#[derive(Debug, Clone)]
pub struct Clusterer<T, A> {
    points: Vec<PointWithContext<T>>,
    algorithm: A,
    clusters: Vec<Cluster<T>>,
}

impl<T: Clone, A: Clustering> Clusterer<T, A> {
    /// Create an instance with no points.
    pub fn new(algorithm: A) -> Self {
        Self::with_points(algorithm, Vec::new())
    }

    /// Create an instance over `points`.
    pub fn with_points(algorithm: A, points: Vec<PointWithContext<T>>) -> Self {
        Self {
            points,
            algorithm,
            clusters: Vec::new(),
        }
    }

    /// Append a point.
    pub fn push(&mut self, point: PointWithContext<T>) {
        self.points.push(point);
    }

    /// Replace all points.
    pub fn set_points(&mut self, points: Vec<PointWithContext<T>>) {
        self.points = points;
    }

    /// Current points, in input order.
    pub fn points(&self) -> &[PointWithContext<T>] {
        &self.points
    }

    /// Mutable access to the points; takes effect on the next `execute`.
    pub fn points_mut(&mut self) -> &mut Vec<PointWithContext<T>> {
        &mut self.points
    }

    /// The configured algorithm.
    pub fn algorithm(&self) -> &A {
        &self.algorithm
    }

    /// Mutable access to the algorithm configuration.
    pub fn algorithm_mut(&mut self) -> &mut A {
        &mut self.algorithm
    }

    /// Run the algorithm over the current points.
    pub fn execute(&mut self) -> Result<&[Cluster<T>]> {
        let clusters = self.algorithm.cluster(&self.points)?;
        debug!(points = self.points.len(), clusters = clusters.len(), "clusterer executed");
        self.clusters = clusters;
        Ok(&self.clusters)
    }

    /// Clusters from the last successful `execute`.
    pub fn clusters(&self) -> &[Cluster<T>] {
        &self.clusters
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::{Dbscan, GreedyMerge};

    #[test]
    fn execute_overwrites_previous_result() {
        let mut clusterer = Clusterer::new(GreedyMerge::new(1));
        clusterer.push(PointWithContext::new(0.0, 0.0, 'a'));
        clusterer.push(PointWithContext::new(1.0, 0.0, 'b'));
        assert_eq!(clusterer.execute().unwrap().len(), 1);

        *clusterer.algorithm_mut() = GreedyMerge::new(2);
        clusterer.execute().unwrap();
        assert_eq!(clusterer.clusters().len(), 2);
    }

    #[test]
    fn failed_execute_keeps_last_result() {
        let points = vec![PointWithContext::new(0.0, 0.0, 1), PointWithContext::new(0.1, 0.0, 2)];
        let mut clusterer = Clusterer::with_points(Dbscan::new(0.5, 2), points);
        clusterer.execute().unwrap();
        assert_eq!(clusterer.clusters().len(), 1);

        *clusterer.algorithm_mut() = Dbscan::new(-1.0, 2);
        assert!(clusterer.execute().is_err());
        assert_eq!(clusterer.clusters().len(), 1);
    }

    #[test]
    fn execute_is_idempotent() {
        let points: Vec<_> = (0..12)
            .map(|i| PointWithContext::new((i % 4) as f64 * 10.0, (i / 4) as f64, i))
            .collect();
        let mut clusterer = Clusterer::with_points(GreedyMerge::new(4), points);
        let first = clusterer.execute().unwrap().to_vec();
        let second = clusterer.execute().unwrap().to_vec();
        let contexts = |c: &[Cluster<i32>]| -> Vec<Vec<i32>> {
            c.iter().map(|g| g.iter().map(|p| p.context).collect()).collect()
        };
        assert_eq!(contexts(&first[..]), contexts(&second[..]));
    }
}
