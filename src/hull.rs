//! Boundary polygons around clusters.
//!
//! A [`HullBuilder`] turns one cluster's points into a polygon that encloses
//! all of them, grown outward by a buffer distance. An empty cluster has no
//! boundary, which is not an error.
//!
//! [`BufferedConvexHull`] uses `geo` for the convex hull. The buffer of a
//! convex polygon is its Minkowski sum with a disk, which is again convex, so
//! the buffered boundary is the hull of every hull vertex offset by a
//! polygonal disk. The disk polygon circumscribes the true circle, so the
//! result contains the exact buffer.
//!
//! The result is always a simple polygon with positive area. When the plain
//! hull of a single point or of collinear points has no area, a zero buffer
//! is raised to a radius of `√ε` times the coordinate magnitude, just large
//! enough to survive rounding.

use std::f64::consts::PI;

use geo::{Area, ConvexHull, MultiPoint, Point, Polygon};
use tracing::trace;

use crate::error::{Error, Result};
use crate::point::{Cluster, PointWithContext};

/// Computes an expanded boundary polygon for a point group.
pub trait HullBuilder {
    /// Boundary of `points` grown by `buffer`; `None` for an empty slice.
    fn hull<T>(&self, points: &[PointWithContext<T>], buffer: f64) -> Result<Option<Polygon<f64>>>;

    /// Boundary of every cluster, in cluster order.
    fn hulls<T>(&self, clusters: &[Cluster<T>], buffer: f64) -> Result<Vec<Option<Polygon<f64>>>> {
        clusters.iter().map(|c| self.hull(c, buffer)).collect()
    }
}

/// Convex hull expanded by a polygonal approximation of a disk.
#[derive(Debug, Clone, Copy)]
pub struct BufferedConvexHull {
    segments: usize,
}

impl BufferedConvexHull {
    /// Builder with 32 disk segments.
    pub fn new() -> Self {
        Self { segments: 32 }
    }

    /// Number of segments of the polygonal disk (at least 3).
    pub fn with_segments(mut self, segments: usize) -> Self {
        self.segments = segments;
        self
    }
}

impl Default for BufferedConvexHull {
    fn default() -> Self {
        Self::new()
    }
}

impl HullBuilder for BufferedConvexHull {
    fn hull<T>(&self, points: &[PointWithContext<T>], buffer: f64) -> Result<Option<Polygon<f64>>> {
        if !buffer.is_finite() || buffer < 0.0 {
            return Err(Error::InvalidConfiguration {
                name: "buffer",
                message: "must be finite and non-negative",
            });
        }
        if self.segments < 3 {
            return Err(Error::InvalidConfiguration {
                name: "segments",
                message: "must be at least 3",
            });
        }
        if points.is_empty() {
            return Ok(None);
        }

        let cloud: MultiPoint<f64> = points.iter().map(|p| Point::new(p.x, p.y)).collect();
        let hull = cloud.convex_hull();
        let buffer = if buffer > 0.0 {
            buffer
        } else if hull.unsigned_area() > 0.0 {
            return Ok(Some(hull));
        } else {
            degenerate_radius(points)
        };

        // Circumscribed polygon: its edges sit at distance `buffer` from the vertex.
        let step = 2.0 * PI / self.segments as f64;
        let radius = buffer / (step / 2.0).cos();
        let offsets: Vec<(f64, f64)> = (0..self.segments)
            .map(|s| {
                let angle = step * s as f64;
                (radius * angle.cos(), radius * angle.sin())
            })
            .collect();

        let expanded: MultiPoint<f64> = hull
            .exterior()
            .coords()
            .flat_map(|c| offsets.iter().map(move |&(dx, dy)| Point::new(c.x + dx, c.y + dy)))
            .collect();

        trace!(points = points.len(), buffer, "buffered hull");
        Ok(Some(expanded.convex_hull()))
    }
}

/// Smallest buffer that gives a zero-area hull a visible interior.
fn degenerate_radius<T>(points: &[PointWithContext<T>]) -> f64 {
    let scale = points
        .iter()
        .map(|p| p.x.abs().max(p.y.abs()))
        .fold(1.0, f64::max);
    f64::EPSILON.sqrt() * scale
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Contains;

    fn square() -> Vec<PointWithContext<()>> {
        vec![
            PointWithContext::bare(0.0, 0.0),
            PointWithContext::bare(1.0, 0.0),
            PointWithContext::bare(1.0, 1.0),
            PointWithContext::bare(0.0, 1.0),
            PointWithContext::bare(0.5, 0.5),
        ]
    }

    fn max_x(poly: &Polygon<f64>) -> f64 {
        poly.exterior().coords().map(|c| c.x).fold(f64::NEG_INFINITY, f64::max)
    }

    #[test]
    fn empty_input_has_no_polygon() {
        let empty: Vec<PointWithContext<()>> = vec![];
        assert!(BufferedConvexHull::new().hull(&empty, 1.0).unwrap().is_none());
    }

    #[test]
    fn unbuffered_hull_drops_interior_points() {
        let hull = BufferedConvexHull::new().hull(&square(), 0.0).unwrap().unwrap();
        // Four corners plus the closing coordinate.
        assert_eq!(hull.exterior().coords().count(), 5);
        assert_eq!(max_x(&hull), 1.0);
    }

    #[test]
    fn buffered_hull_encloses_points_with_margin() {
        let buffer = 0.5;
        let hull = BufferedConvexHull::new().hull(&square(), buffer).unwrap().unwrap();
        for p in square() {
            assert!(hull.contains(&Point::new(p.x, p.y)));
        }
        assert!(hull.contains(&Point::new(1.45, 0.5)));
        let reach = max_x(&hull) - 1.0;
        assert!(reach >= buffer && reach < buffer * 1.01, "reach {reach}");
    }

    #[test]
    fn single_point_becomes_disk() {
        let one = vec![PointWithContext::new(3.0, -2.0, "only")];
        let hull = BufferedConvexHull::new().with_segments(8).hull(&one, 1.0).unwrap().unwrap();
        assert!(hull.contains(&Point::new(3.0, -2.0)));
        assert!(hull.contains(&Point::new(3.9, -2.0)));
        assert!(!hull.contains(&Point::new(4.5, -2.0)));
    }

    #[test]
    fn zero_buffer_single_point_is_a_real_polygon() {
        let one = vec![PointWithContext::bare(1.0, 1.0)];
        let hull = BufferedConvexHull::new().hull(&one, 0.0).unwrap().unwrap();
        assert!(hull.exterior().coords().count() >= 4);
        assert!(hull.unsigned_area() > 0.0);
        assert!(hull.contains(&Point::new(1.0, 1.0)));
        assert!(!hull.contains(&Point::new(1.001, 1.0)));
    }

    #[test]
    fn zero_buffer_collinear_points_are_enclosed() {
        let line = vec![
            PointWithContext::bare(0.0, 0.0),
            PointWithContext::bare(1.0, 0.0),
            PointWithContext::bare(2.0, 0.0),
        ];
        let hull = BufferedConvexHull::new().hull(&line, 0.0).unwrap().unwrap();
        assert!(hull.unsigned_area() > 0.0);
        for p in &line {
            assert!(hull.contains(&Point::new(p.x, p.y)));
        }
        assert!(!hull.contains(&Point::new(1.0, 0.001)));
    }

    #[test]
    fn hulls_follow_cluster_order() {
        let clusters = vec![square(), vec![]];
        let hulls = BufferedConvexHull::new().hulls(&clusters, 0.1).unwrap();
        assert!(hulls[0].is_some());
        assert!(hulls[1].is_none());
    }

    #[test]
    fn invalid_buffer_or_segments() {
        assert!(BufferedConvexHull::new().hull(&square(), -1.0).is_err());
        assert!(BufferedConvexHull::new().with_segments(2).hull(&square(), 1.0).is_err());
    }
}
