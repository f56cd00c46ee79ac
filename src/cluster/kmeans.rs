//! K-means clustering.
//!
//! Partitions the points into k clusters by approximately minimizing the
//! within-cluster sum of squares:
//!
//! ```text
//! WCSS = Σₖ Σᵢ∈Cₖ ||xᵢ - μₖ||²
//! ```
//!
//! # Lloyd's Algorithm
//!
//! 1. Seed k centroids deterministically (farthest-point or first-distinct)
//! 2. **Assign**: each point → nearest centroid, ties to the lowest index
//! 3. **Update**: each centroid → mean of its assigned points
//! 4. Stop when no assignment changes or `max_iter` is reached
//!
//! # Centroid fitting backends
//!
//! The refinement loop sits behind [`CentroidFitter`] so the reference
//! [`Lloyd`] implementation and other backends (e.g. [`MiniBatch`], or an
//! accelerated fitter supplied by the caller) are interchangeable. Whatever
//! the fitter does, the final labels are always computed against the fitted
//! centroids over the full point set.

use super::traits::Clustering;
use crate::error::{Error, Result};
use crate::metric::squared_euclidean;
use crate::point::{coords_of, PointWithContext};
use rand::prelude::*;
use rand::seq::index;
use tracing::{debug, trace};

/// How the initial centroids are chosen. Both strategies are deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Seeding {
    /// Start from the first point, then repeatedly take the point farthest from
    /// every chosen centroid (lowest index on ties).
    #[default]
    FarthestPoint,
    /// Take the first k points with distinct coordinates, in input order.
    FirstDistinct,
}

/// Refines initial centroids into final centroids.
pub trait CentroidFitter {
    /// Fit centroids to `points`, starting from `initial`.
    ///
    /// Returns the fitted centroids (same length as `initial`) and the number
    /// of iterations performed.
    fn fit(
        &self,
        points: &[[f64; 2]],
        initial: Vec<[f64; 2]>,
        max_iter: usize,
    ) -> Result<(Vec<[f64; 2]>, usize)>;

    /// Check the fitter's own parameters. Called before seeding.
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// Classic batch Lloyd iterations.
#[derive(Debug, Clone, Copy, Default)]
pub struct Lloyd;

impl CentroidFitter for Lloyd {
    fn fit(
        &self,
        points: &[[f64; 2]],
        initial: Vec<[f64; 2]>,
        max_iter: usize,
    ) -> Result<(Vec<[f64; 2]>, usize)> {
        let k = initial.len();
        let mut centroids = initial;
        let mut labels = vec![usize::MAX; points.len()];
        let mut iterations = 0;

        for iter in 0..max_iter {
            iterations = iter + 1;

            let mut changed = 0usize;
            for (label, &p) in labels.iter_mut().zip(points) {
                let best = nearest_centroid(p, &centroids);
                if *label != best {
                    *label = best;
                    changed += 1;
                }
            }
            trace!(iteration = iterations, changed, "lloyd assignment");
            if changed == 0 {
                break;
            }

            // Update step. An empty cluster keeps its previous centroid.
            let mut sums = vec![[0.0f64; 2]; k];
            let mut counts = vec![0usize; k];
            for (&label, p) in labels.iter().zip(points) {
                sums[label][0] += p[0];
                sums[label][1] += p[1];
                counts[label] += 1;
            }
            for ((centroid, sum), &count) in centroids.iter_mut().zip(&sums).zip(&counts) {
                if count > 0 {
                    *centroid = [sum[0] / count as f64, sum[1] / count as f64];
                }
            }
        }

        Ok((centroids, iterations))
    }
}

/// Mini-batch k-means.
///
/// Each iteration samples `batch_size` points without replacement, assigns
/// them to the current centroids and moves every centroid towards its
/// samples with a per-centroid learning rate of `1 / count`, so each
/// centroid is the running mean of every sample it has absorbed.
///
/// Sampling is only reproducible when a seed is supplied, or when the caller
/// drives it with its own seeded generator through [`MiniBatch::fit_with_rng`]
/// or [`Kmeans::fit_with_rng`].
#[derive(Debug, Clone, Copy)]
pub struct MiniBatch {
    /// Points sampled per iteration (clamped to the point count).
    pub batch_size: usize,
    /// Random seed for the sampler.
    pub seed: Option<u64>,
}

impl MiniBatch {
    /// Create a mini-batch fitter with an unseeded sampler.
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size,
            seed: None,
        }
    }

    /// Set random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl CentroidFitter for MiniBatch {
    fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(Error::InvalidConfiguration {
                name: "batch_size",
                message: "must be at least 1",
            });
        }
        Ok(())
    }

    fn fit(
        &self,
        points: &[[f64; 2]],
        initial: Vec<[f64; 2]>,
        max_iter: usize,
    ) -> Result<(Vec<[f64; 2]>, usize)> {
        let mut rng: Box<dyn RngCore> = match self.seed {
            Some(s) => Box::new(StdRng::seed_from_u64(s)),
            None => Box::new(rand::rng()),
        };
        self.fit_with_rng(points, initial, max_iter, &mut rng)
    }
}

impl MiniBatch {
    /// Fit with a caller-owned random source; `self.seed` is ignored.
    pub fn fit_with_rng<R: Rng + ?Sized>(
        &self,
        points: &[[f64; 2]],
        initial: Vec<[f64; 2]>,
        max_iter: usize,
        rng: &mut R,
    ) -> Result<(Vec<[f64; 2]>, usize)> {
        self.validate()?;

        let n = points.len();
        let batch = self.batch_size.min(n);
        let mut centroids = initial;
        let mut counts = vec![0usize; centroids.len()];

        for _ in 0..max_iter {
            let sample = index::sample(rng, n, batch);
            for i in sample.iter() {
                let p = points[i];
                let c = nearest_centroid(p, &centroids);
                counts[c] += 1;
                let eta = 1.0 / counts[c] as f64;
                centroids[c][0] += eta * (p[0] - centroids[c][0]);
                centroids[c][1] += eta * (p[1] - centroids[c][1]);
            }
        }

        Ok((centroids, max_iter))
    }
}

/// K-means clustering algorithm.
#[derive(Debug, Clone)]
pub struct Kmeans<F = Lloyd> {
    /// Number of clusters.
    k: usize,
    /// Maximum iterations.
    max_iter: usize,
    /// Initial centroid selection.
    seeding: Seeding,
    /// Refinement backend.
    fitter: F,
}

/// Result of a k-means fit.
#[derive(Debug, Clone)]
pub struct KmeansFit {
    /// Final centroids, one per cluster.
    pub centroids: Vec<[f64; 2]>,
    /// Cluster index per input point.
    pub labels: Vec<usize>,
    /// Iterations the fitter performed.
    pub iterations: usize,
}

impl Kmeans<Lloyd> {
    /// Create a new K-means clusterer using Lloyd iterations.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            max_iter: 100,
            seeding: Seeding::default(),
            fitter: Lloyd,
        }
    }
}

impl<F: CentroidFitter> Kmeans<F> {
    /// Set maximum iterations.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set the seeding strategy.
    pub fn with_seeding(mut self, seeding: Seeding) -> Self {
        self.seeding = seeding;
        self
    }

    /// Swap the centroid fitting backend.
    pub fn with_fitter<G: CentroidFitter>(self, fitter: G) -> Kmeans<G> {
        Kmeans {
            k: self.k,
            max_iter: self.max_iter,
            seeding: self.seeding,
            fitter,
        }
    }

    /// Check the configuration against a point count before any work starts.
    pub fn validate(&self, n: usize) -> Result<()> {
        if self.k == 0 {
            return Err(Error::InvalidConfiguration {
                name: "k",
                message: "must be at least 1",
            });
        }
        if self.k > n {
            return Err(Error::InvalidClusterCount {
                requested: self.k,
                n_items: n,
            });
        }
        self.fitter.validate()
    }

    /// Fit centroids and assign every point to its nearest centroid.
    pub fn fit<T>(&self, points: &[PointWithContext<T>]) -> Result<KmeansFit> {
        self.validate(points.len())?;
        let (coords, initial) = self.seed_centroids(points);
        let (centroids, iterations) = self.fitter.fit(&coords, initial, self.max_iter)?;
        Ok(self.assign(&coords, centroids, iterations))
    }

    fn seed_centroids<T>(&self, points: &[PointWithContext<T>]) -> (Vec<[f64; 2]>, Vec<[f64; 2]>) {
        let coords = coords_of(points);
        let initial = match self.seeding {
            Seeding::FarthestPoint => farthest_point_seeds(&coords, self.k),
            Seeding::FirstDistinct => first_distinct_seeds(&coords, self.k),
        };
        (coords, initial)
    }

    fn assign(
        &self,
        coords: &[[f64; 2]],
        centroids: Vec<[f64; 2]>,
        iterations: usize,
    ) -> KmeansFit {
        let labels: Vec<usize> = coords.iter().map(|&p| nearest_centroid(p, &centroids)).collect();
        debug!(n = coords.len(), k = self.k, iterations, "k-means fitted");
        KmeansFit {
            centroids,
            labels,
            iterations,
        }
    }
}

impl Kmeans<MiniBatch> {
    /// Mini-batch fit drawing samples from a caller-owned random source.
    pub fn fit_with_rng<T, R: Rng + ?Sized>(
        &self,
        points: &[PointWithContext<T>],
        rng: &mut R,
    ) -> Result<KmeansFit> {
        self.validate(points.len())?;
        let (coords, initial) = self.seed_centroids(points);
        let (centroids, iterations) =
            self.fitter.fit_with_rng(&coords, initial, self.max_iter, rng)?;
        Ok(self.assign(&coords, centroids, iterations))
    }
}

impl<F: CentroidFitter> Clustering for Kmeans<F> {
    fn fit_predict<T>(&self, points: &[PointWithContext<T>]) -> Result<Vec<Option<usize>>> {
        Ok(self.fit(points)?.labels.into_iter().map(Some).collect())
    }

    fn n_clusters(&self) -> usize {
        self.k
    }
}

/// Index of the nearest centroid; ties go to the lowest index.
fn nearest_centroid(p: [f64; 2], centroids: &[[f64; 2]]) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (c, &centroid) in centroids.iter().enumerate() {
        let d = squared_euclidean(p, centroid);
        if d < best_dist {
            best_dist = d;
            best = c;
        }
    }
    best
}

fn farthest_point_seeds(coords: &[[f64; 2]], k: usize) -> Vec<[f64; 2]> {
    let mut seeds = Vec::with_capacity(k);
    seeds.push(coords[0]);
    let mut min_dist: Vec<f64> = coords.iter().map(|&p| squared_euclidean(p, coords[0])).collect();

    while seeds.len() < k {
        let mut pick = 0;
        let mut pick_dist = f64::NEG_INFINITY;
        for (i, &d) in min_dist.iter().enumerate() {
            if d > pick_dist {
                pick_dist = d;
                pick = i;
            }
        }
        let seed = coords[pick];
        seeds.push(seed);
        for (d, &p) in min_dist.iter_mut().zip(coords) {
            *d = d.min(squared_euclidean(p, seed));
        }
    }
    seeds
}

fn first_distinct_seeds(coords: &[[f64; 2]], k: usize) -> Vec<[f64; 2]> {
    let mut seeds: Vec<[f64; 2]> = Vec::with_capacity(k);
    for &p in coords {
        if seeds.len() == k {
            break;
        }
        if !seeds.contains(&p) {
            seeds.push(p);
        }
    }
    // Fewer distinct coordinates than k: pad with repeats in input order.
    let mut i = 0;
    while seeds.len() < k {
        seeds.push(coords[i % coords.len()]);
        i += 1;
    }
    seeds
}
