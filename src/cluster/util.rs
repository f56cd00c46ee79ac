use crate::point::{Cluster, PointWithContext};

/// Disjoint-set forest with path compression and union by size.
#[derive(Clone, Debug)]
pub(crate) struct UnionFind {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl UnionFind {
    pub(crate) fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            size: vec![1; n],
        }
    }

    pub(crate) fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        // Second pass compresses the path without recursion.
        let mut cur = x;
        while self.parent[cur] != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }
        root
    }

    pub(crate) fn union(&mut self, a: usize, b: usize) -> usize {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return ra;
        }

        // Union by size.
        let (mut big, mut small) = (ra, rb);
        if self.size[big] < self.size[small] {
            std::mem::swap(&mut big, &mut small);
        }

        self.parent[small] = big;
        self.size[big] += self.size[small];
        big
    }
}

/// Compute an MST for a dense complete graph using Prim's algorithm.
///
/// `dist_fn(i, j)` returns the edge weight between points `i` and `j`.
/// Returns edges `(u, v, dist)` in the order their endpoint `v` joined the tree.
///
/// The tree grows from point 0. When several unvisited points share the
/// minimum key the one with the lowest index is taken, and a key is only
/// replaced by a strictly smaller distance, so the result is deterministic.
pub(crate) fn prim_mst(
    n: usize,
    dist_fn: impl Fn(usize, usize) -> f64,
) -> Vec<(usize, usize, f64)> {
    if n <= 1 {
        return Vec::new();
    }

    let mut in_tree = vec![false; n];
    let mut best = vec![f64::INFINITY; n];
    let mut parent = vec![usize::MAX; n];
    let mut edges: Vec<(usize, usize, f64)> = Vec::with_capacity(n - 1);

    best[0] = 0.0;

    for _ in 0..n {
        let mut u = usize::MAX;
        let mut best_val = f64::INFINITY;
        for i in 0..n {
            if !in_tree[i] && (u == usize::MAX || best[i] < best_val) {
                best_val = best[i];
                u = i;
            }
        }

        if u == usize::MAX {
            break;
        }
        in_tree[u] = true;
        if parent[u] != usize::MAX {
            edges.push((parent[u], u, best[u]));
        }

        for v in 0..n {
            if in_tree[v] {
                continue;
            }
            let d = dist_fn(u, v);
            if d < best[v] {
                best[v] = d;
                parent[v] = u;
            }
        }
    }

    edges
}

/// Group points by label. Clusters are emitted in ascending label order,
/// empty labels are skipped, and points keep their input order.
pub(crate) fn group_by_label<T: Clone>(
    points: &[PointWithContext<T>],
    labels: &[Option<usize>],
) -> Vec<Cluster<T>> {
    debug_assert_eq!(points.len(), labels.len());
    let n_labels = labels.iter().flatten().map(|&l| l + 1).max().unwrap_or(0);
    let mut clusters: Vec<Cluster<T>> = vec![Vec::new(); n_labels];
    for (point, label) in points.iter().zip(labels) {
        if let Some(l) = label {
            clusters[*l].push(point.clone());
        }
    }
    clusters.retain(|c| !c.is_empty());
    clusters
}
