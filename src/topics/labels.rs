// Topic labels: a short name per cluster from its heaviest center terms.

use serde::Serialize;

use super::ClusterId;

/// How many top terms make up a label.
pub const LABEL_TERM_COUNT: usize = 2;

/// A vocabulary term and its weight in one cluster center.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TermWeight {
    pub term: String,
    /// Position of `term` in the vectorizer vocabulary.
    pub index: usize,
    pub weight: f64,
}

/// A labelled cluster.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Topic {
    pub id: ClusterId,
    /// Top terms joined by a space, heaviest first.
    pub label: String,
    /// The terms the label was built from, in label order.
    pub terms: Vec<TermWeight>,
}

/// The `n` heaviest terms of a center vector, weight descending, ties
/// broken by vocabulary order.
///
/// `center` and `vocabulary` must be index-aligned; only positions present
/// in both are considered.
pub fn top_terms(center: &[f64], vocabulary: &[String], n: usize) -> Vec<TermWeight> {
    let mut indices: Vec<usize> = (0..center.len().min(vocabulary.len())).collect();
    indices.sort_by(|&a, &b| center[b].total_cmp(&center[a]).then(a.cmp(&b)));
    indices
        .into_iter()
        .take(n)
        .map(|index| TermWeight {
            term: vocabulary[index].clone(),
            index,
            weight: center[index],
        })
        .collect()
}

/// Label every center. `centers[i]` becomes the topic with `ClusterId(i)`.
pub fn label_topics(centers: &[Vec<f64>], vocabulary: &[String]) -> Vec<Topic> {
    centers
        .iter()
        .enumerate()
        .map(|(i, center)| {
            let terms = top_terms(center, vocabulary, LABEL_TERM_COUNT);
            let label = terms
                .iter()
                .map(|t| t.term.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            Topic {
                id: ClusterId(i),
                label,
                terms,
            }
        })
        .collect()
}
