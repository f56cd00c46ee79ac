//! Every strategy on a small labelled 2D dataset, plus hulls.
//!
//! Debug-level run summaries are printed through `tracing-subscriber`.

use spatial_clump::{
    BufferedConvexHull, Cluster, Clustering, Dbscan, GreedyMerge, Hdbscan, HullBuilder, Kmeans,
    PointWithContext, ThresholdAgglomerative,
};

fn print_clusters(title: &str, clusters: &[Cluster<&str>]) {
    println!("=== {title} ===");
    for (i, cluster) in clusters.iter().enumerate() {
        let names: Vec<&str> = cluster.iter().map(|p| p.context).collect();
        println!("  cluster {i}: {}", names.join(", "));
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    // Three well-separated groups plus one stray point.
    let points = vec![
        // Group A (near origin)
        PointWithContext::new(0.0, 0.0, "a0"),
        PointWithContext::new(0.1, 0.2, "a1"),
        PointWithContext::new(0.2, 0.1, "a2"),
        PointWithContext::new(-0.1, 0.1, "a3"),
        // Group B (near (5, 5))
        PointWithContext::new(5.0, 5.0, "b0"),
        PointWithContext::new(5.1, 4.9, "b1"),
        PointWithContext::new(4.9, 5.1, "b2"),
        PointWithContext::new(5.2, 5.2, "b3"),
        // Group C (near (10, 0))
        PointWithContext::new(10.0, 0.0, "c0"),
        PointWithContext::new(10.1, 0.1, "c1"),
        PointWithContext::new(9.9, -0.1, "c2"),
        PointWithContext::new(10.2, 0.2, "c3"),
        // Stray
        PointWithContext::new(20.0, 20.0, "stray"),
    ];

    let kmeans = Kmeans::new(4).cluster(&points).unwrap();
    print_clusters("K-means (k=4)", &kmeans);

    let dbscan = Dbscan::new(1.0, 2).cluster(&points).unwrap();
    print_clusters("DBSCAN (eps=1.0, min_pts=2)", &dbscan);

    let hdbscan = Hdbscan::new(3).with_cut_percentile(80.0).cluster(&points).unwrap();
    print_clusters("HDBSCAN (min_cluster_size=3, cut at 80th percentile)", &hdbscan);

    let threshold = ThresholdAgglomerative::new(0.5).cluster(&points).unwrap();
    print_clusters("Threshold agglomerative (0.5)", &threshold);

    let greedy = GreedyMerge::new(4).cluster(&points).unwrap();
    print_clusters("Greedy merge (4 clusters)", &greedy);

    println!("\n=== Buffered hulls of the DBSCAN clusters ===");
    let hulls = BufferedConvexHull::new().hulls(&dbscan, 0.25).unwrap();
    for (i, hull) in hulls.iter().enumerate() {
        match hull {
            Some(polygon) => println!("  cluster {i}: {} vertices", polygon.exterior().0.len()),
            None => println!("  cluster {i}: empty"),
        }
    }
}
