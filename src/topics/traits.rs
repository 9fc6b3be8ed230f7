// Clusterer trait: swap-ready abstraction.
//
// The topic pipeline only needs "feature vectors in, assignment and centers
// out". KMeans is the implementation used today; anything honoring the same
// contract (every vector gets exactly one id in 0..k, centers index-aligned
// with the vocabulary) can replace it.

use super::kmeans::Clustering;
use crate::error::Result;

/// Trait for partitioning feature vectors into a fixed number of groups.
pub trait Clusterer {
    /// Number of groups this clusterer produces.
    fn cluster_count(&self) -> usize;

    /// Partition `features` (one row per document, all the same width).
    fn cluster(&self, features: &[Vec<f64>]) -> Result<Clustering>;
}
