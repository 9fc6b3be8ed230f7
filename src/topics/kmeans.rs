// Seeded k-means over TF-IDF rows.
//
// 1. k-means++ initialisation from a StdRng seeded with `seed`
// 2. assign each row to its nearest center (squared Euclidean, lowest
//    center index wins ties)
// 3. re-seed any empty cluster with the row farthest from its own center
// 4. recompute centers as member means
// 5. stop when assignments no longer change, total squared center shift is
//    within `tolerance`, or after `max_iterations`
//
// Fails fast when there are fewer distinct rows than clusters.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use super::traits::Clusterer;
use super::ClusterId;
use crate::error::{AnalysisError, Result};

/// Default number of topics.
pub const DEFAULT_CLUSTERS: usize = 5;

#[derive(Debug, Clone)]
pub struct KMeans {
    pub k: usize,
    pub max_iterations: usize,
    pub tolerance: f64,
    pub seed: u64,
}

impl Default for KMeans {
    fn default() -> Self {
        Self {
            k: DEFAULT_CLUSTERS,
            max_iterations: 300,
            tolerance: 1e-4,
            seed: 0,
        }
    }
}

impl KMeans {
    pub fn new(k: usize, seed: u64) -> Self {
        Self {
            k,
            seed,
            ..Self::default()
        }
    }
}

/// Result of one clustering run.
#[derive(Debug, Clone, PartialEq)]
pub struct Clustering {
    /// Cluster id per input row, index-aligned with the rows.
    pub assignments: Vec<ClusterId>,
    /// One center per cluster id; `centers[i]` belongs to `ClusterId(i)`.
    pub centers: Vec<Vec<f64>>,
    pub iterations: usize,
    pub converged: bool,
    /// Sum of squared distances from each row to its assigned center.
    pub inertia: f64,
}

impl Clustering {
    /// Number of rows assigned to each cluster id, indexed by id.
    pub fn sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.centers.len()];
        for id in &self.assignments {
            sizes[id.0] += 1;
        }
        sizes
    }
}

impl Clusterer for KMeans {
    fn cluster_count(&self) -> usize {
        self.k
    }

    fn cluster(&self, features: &[Vec<f64>]) -> Result<Clustering> {
        if self.k == 0 {
            return Err(AnalysisError::InvalidConfig {
                message: "cluster count must be at least 1".to_string(),
            });
        }
        if self.max_iterations == 0 {
            return Err(AnalysisError::InvalidConfig {
                message: "max_iterations must be at least 1".to_string(),
            });
        }

        let distinct = count_distinct(features);
        if distinct < self.k {
            return Err(AnalysisError::insufficient(format!(
                "{} documents ({} distinct) cannot form {} clusters",
                features.len(),
                distinct,
                self.k
            )));
        }

        let dim = features[0].len();
        if let Some(bad) = features.iter().position(|row| row.len() != dim) {
            return Err(AnalysisError::InvalidConfig {
                message: format!(
                    "feature row {bad} has width {} but row 0 has width {dim}",
                    features[bad].len()
                ),
            });
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut centers = kmeans_plus_plus(features, self.k, &mut rng);
        debug!(k = self.k, rows = features.len(), dim, "Initialised k-means++ centers");

        let mut assignments: Vec<usize> = Vec::new();
        let mut iterations = 0;
        let mut converged = false;

        for iter in 0..self.max_iterations {
            iterations = iter + 1;

            let mut next = assign(features, &centers);
            fill_empty_clusters(features, &centers, &mut next, self.k);
            let new_centers = compute_centers(features, &next, self.k, dim);

            let shift: f64 = centers
                .iter()
                .zip(&new_centers)
                .map(|(old, new)| squared_distance(old, new))
                .sum();
            let unchanged = next == assignments;

            assignments = next;
            centers = new_centers;

            if unchanged || shift <= self.tolerance {
                converged = true;
                break;
            }
        }

        let inertia = assignments
            .iter()
            .zip(features)
            .map(|(&c, row)| squared_distance(row, &centers[c]))
            .sum();

        info!(
            k = self.k,
            iterations,
            converged,
            inertia,
            "k-means finished"
        );

        Ok(Clustering {
            assignments: assignments.into_iter().map(ClusterId).collect(),
            centers,
            iterations,
            converged,
            inertia,
        })
    }
}

/// Number of distinct rows, compared bit-for-bit.
pub fn count_distinct(features: &[Vec<f64>]) -> usize {
    features
        .iter()
        .map(|row| row.iter().map(|v| v.to_bits()).collect::<Vec<u64>>())
        .collect::<HashSet<_>>()
        .len()
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// Pick k initial centers: the first uniformly, each next one with
/// probability proportional to its squared distance from the nearest
/// center chosen so far.
fn kmeans_plus_plus(features: &[Vec<f64>], k: usize, rng: &mut StdRng) -> Vec<Vec<f64>> {
    let n = features.len();
    let first = rng.random_range(0..n);
    let mut centers = vec![features[first].clone()];
    let mut nearest: Vec<f64> = features
        .iter()
        .map(|row| squared_distance(row, &centers[0]))
        .collect();

    while centers.len() < k {
        let total: f64 = nearest.iter().sum();
        let target = rng.random::<f64>() * total;

        // Walk the cumulative distribution. Rows already at a center have
        // zero weight and can never be picked; fall back to the last
        // positive-weight row if rounding runs us off the end.
        let mut cumulative = 0.0;
        let mut chosen = None;
        for (i, &d) in nearest.iter().enumerate() {
            if d <= 0.0 {
                continue;
            }
            cumulative += d;
            chosen = Some(i);
            if cumulative > target {
                break;
            }
        }
        // At least k distinct rows exist, so some row still has weight.
        let Some(idx) = chosen else { break };

        let center = features[idx].clone();
        for (d, row) in nearest.iter_mut().zip(features) {
            *d = d.min(squared_distance(row, &center));
        }
        centers.push(center);
    }

    centers
}

fn assign(features: &[Vec<f64>], centers: &[Vec<f64>]) -> Vec<usize> {
    features
        .iter()
        .map(|row| {
            let mut best = 0;
            let mut best_dist = f64::INFINITY;
            for (c, center) in centers.iter().enumerate() {
                let dist = squared_distance(row, center);
                if dist < best_dist {
                    best_dist = dist;
                    best = c;
                }
            }
            best
        })
        .collect()
}

/// Give every empty cluster the row farthest from its current center,
/// taken only from clusters that would not be emptied by the move.
fn fill_empty_clusters(
    features: &[Vec<f64>],
    centers: &[Vec<f64>],
    assignments: &mut [usize],
    k: usize,
) {
    let mut sizes = vec![0usize; k];
    for &c in assignments.iter() {
        sizes[c] += 1;
    }

    for empty in 0..k {
        if sizes[empty] > 0 {
            continue;
        }
        let donor = assignments
            .iter()
            .enumerate()
            .filter(|&(_, &c)| sizes[c] > 1)
            .map(|(i, &c)| (i, squared_distance(&features[i], &centers[c])))
            .fold(None, |best: Option<(usize, f64)>, (i, d)| match best {
                Some((_, best_d)) if best_d >= d => best,
                _ => Some((i, d)),
            });

        if let Some((row, _)) = donor {
            debug!(cluster = empty, row, "Re-seeding empty cluster");
            sizes[assignments[row]] -= 1;
            assignments[row] = empty;
            sizes[empty] += 1;
        }
    }
}

fn compute_centers(features: &[Vec<f64>], assignments: &[usize], k: usize, dim: usize) -> Vec<Vec<f64>> {
    let mut sums = vec![vec![0.0; dim]; k];
    let mut counts = vec![0usize; k];

    for (row, &c) in features.iter().zip(assignments) {
        counts[c] += 1;
        for (sum, value) in sums[c].iter_mut().zip(row) {
            *sum += value;
        }
    }

    for (sum, &count) in sums.iter_mut().zip(&counts) {
        if count > 0 {
            for value in sum.iter_mut() {
                *value /= count as f64;
            }
        }
    }
    sums
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blobs() -> Vec<Vec<f64>> {
        vec![
            vec![0.0, 0.0],
            vec![0.1, 0.0],
            vec![0.0, 0.1],
            vec![10.0, 10.0],
            vec![10.1, 10.0],
            vec![10.0, 10.1],
        ]
    }

    #[test]
    fn separates_two_obvious_groups() {
        let result = KMeans::new(2, 0).cluster(&blobs()).unwrap();
        let a = result.assignments[0];
        let b = result.assignments[3];
        assert_ne!(a, b);
        assert!(result.assignments[..3].iter().all(|&c| c == a));
        assert!(result.assignments[3..].iter().all(|&c| c == b));
        assert!(result.converged);
    }

    #[test]
    fn same_seed_same_result() {
        let features = blobs();
        let first = KMeans::new(3, 42).cluster(&features).unwrap();
        let second = KMeans::new(3, 42).cluster(&features).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn no_cluster_left_empty() {
        let result = KMeans::new(4, 7).cluster(&blobs()).unwrap();
        assert!(result.sizes().iter().all(|&s| s > 0), "sizes {:?}", result.sizes());
    }

    #[test]
    fn fewer_distinct_rows_than_k_fails() {
        let features = vec![vec![1.0, 0.0], vec![1.0, 0.0], vec![0.0, 1.0]];
        let err = KMeans::new(3, 0).cluster(&features).unwrap_err();
        assert!(matches!(err, AnalysisError::InsufficientData { .. }));
    }

    #[test]
    fn zero_clusters_is_a_config_error() {
        let err = KMeans::new(0, 0).cluster(&blobs()).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidConfig { .. }));
    }

    #[test]
    fn empty_input_is_insufficient() {
        let err = KMeans::default().cluster(&[]).unwrap_err();
        assert!(matches!(err, AnalysisError::InsufficientData { .. }));
    }

    #[test]
    fn centers_are_member_means() {
        let features = blobs();
        let result = KMeans::new(2, 1).cluster(&features).unwrap();
        for (c, center) in result.centers.iter().enumerate() {
            let members: Vec<&Vec<f64>> = features
                .iter()
                .zip(&result.assignments)
                .filter(|(_, id)| id.0 == c)
                .map(|(row, _)| row)
                .collect();
            let mean_x = members.iter().map(|r| r[0]).sum::<f64>() / members.len() as f64;
            assert!((center[0] - mean_x).abs() < 1e-12);
        }
    }
}
