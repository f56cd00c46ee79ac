//! Euclidean distance on 2-D coordinates.

/// Squared Euclidean distance.
#[inline]
pub fn squared_euclidean(a: [f64; 2], b: [f64; 2]) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    dx * dx + dy * dy
}

/// Euclidean distance.
#[inline]
pub fn euclidean(a: [f64; 2], b: [f64; 2]) -> f64 {
    squared_euclidean(a, b).sqrt()
}

/// Dense symmetric pairwise distance matrix, row-major `n x n`.
pub(crate) fn pairwise_distances(coords: &[[f64; 2]]) -> Vec<f64> {
    let n = coords.len();
    let mut dists = vec![0.0f64; n * n];
    for i in 0..n {
        for j in (i + 1)..n {
            let d = euclidean(coords[i], coords[j]);
            dists[i * n + j] = d;
            dists[j * n + i] = d;
        }
    }
    dists
}
