//! Points carrying an opaque caller value.
//!
//! Identity is coordinate-only: two points at the same `(x, y)` compare equal
//! and hash identically regardless of their context. Putting points with
//! different contexts but equal coordinates into a `HashSet` keeps only one
//! of them. Coordinates compare by bit pattern with -0.0 folded into 0.0,
//! so a NaN coordinate still equals itself.

use std::hash::{Hash, Hasher};

use crate::metric;

/// A 2-D point with an associated caller-owned value.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointWithContext<T> {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
    /// Opaque value attached by the caller. Not part of the point identity.
    pub context: T,
}

/// An ordered group of points produced by one clustering run.
pub type Cluster<T> = Vec<PointWithContext<T>>;

impl<T> PointWithContext<T> {
    /// Create a point.
    pub fn new(x: f64, y: f64, context: T) -> Self {
        Self { x, y, context }
    }

    /// Coordinates as an array.
    #[inline]
    pub fn coords(&self) -> [f64; 2] {
        [self.x, self.y]
    }

    /// Euclidean distance to another point, ignoring both contexts.
    #[inline]
    pub fn distance<U>(&self, other: &PointWithContext<U>) -> f64 {
        metric::euclidean(self.coords(), other.coords())
    }

    /// Replace the context, keeping the coordinates.
    pub fn map_context<U>(self, f: impl FnOnce(T) -> U) -> PointWithContext<U> {
        PointWithContext {
            x: self.x,
            y: self.y,
            context: f(self.context),
        }
    }
}

impl PointWithContext<()> {
    /// A point with no context.
    pub fn bare(x: f64, y: f64) -> Self {
        Self::new(x, y, ())
    }
}

impl<T> From<(f64, f64, T)> for PointWithContext<T> {
    fn from((x, y, context): (f64, f64, T)) -> Self {
        Self::new(x, y, context)
    }
}

impl<T> PointWithContext<T> {
    /// Coordinate bits with -0.0 folded into 0.0; the identity used by `Eq` and `Hash`.
    fn identity_bits(&self) -> (u64, u64) {
        ((self.x + 0.0).to_bits(), (self.y + 0.0).to_bits())
    }
}

impl<T> PartialEq for PointWithContext<T> {
    fn eq(&self, other: &Self) -> bool {
        self.identity_bits() == other.identity_bits()
    }
}

impl<T> Eq for PointWithContext<T> {}

impl<T> Hash for PointWithContext<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity_bits().hash(state);
    }
}

/// Extract the coordinates of a point slice.
pub(crate) fn coords_of<T>(points: &[PointWithContext<T>]) -> Vec<[f64; 2]> {
    points.iter().map(PointWithContext::coords).collect()
}
