// Topic classification: TF-IDF vectors, k-means clusters, labelled topics.

pub mod kmeans;
pub mod labels;
pub mod stopwords;
pub mod tfidf;
pub mod traits;

use std::fmt;

use serde::Serialize;
use tracing::info;

use crate::error::{AnalysisError, Result};
use crate::posts::Post;
use labels::{label_topics, Topic};
use tfidf::TfIdfVectorizer;
use traits::Clusterer;

/// Identifier of one cluster, in `0..k`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ClusterId(pub usize);

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Output of the topic pipeline for one corpus.
#[derive(Debug, Clone, Serialize)]
pub struct TopicModel {
    /// Cluster per post, index-aligned with the corpus.
    pub assignments: Vec<ClusterId>,
    /// One topic per cluster id; `topics[i].id == ClusterId(i)`.
    pub topics: Vec<Topic>,
    /// The vectorizer's learned terms.
    pub vocabulary: Vec<String>,
    pub iterations: usize,
    pub inertia: f64,
}

impl TopicModel {
    pub fn topic(&self, id: ClusterId) -> Option<&Topic> {
        self.topics.get(id.0).filter(|t| t.id == id)
    }

    pub fn label(&self, id: ClusterId) -> Option<&str> {
        self.topic(id).map(|t| t.label.as_str())
    }

    /// Posts per topic, indexed by cluster id.
    pub fn counts(&self) -> Vec<(ClusterId, usize)> {
        let mut counts: Vec<(ClusterId, usize)> =
            self.topics.iter().map(|t| (t.id, 0)).collect();
        for id in &self.assignments {
            if let Some(slot) = counts.get_mut(id.0) {
                slot.1 += 1;
            }
        }
        counts
    }
}

/// Vectorize post content, cluster it, and label each cluster.
pub fn classify_topics<C: Clusterer>(posts: &[Post], clusterer: &C) -> Result<TopicModel> {
    let k = clusterer.cluster_count();
    if posts.len() < k {
        return Err(AnalysisError::insufficient(format!(
            "{} posts cannot form {} topics",
            posts.len(),
            k
        )));
    }

    let docs: Vec<&str> = posts.iter().map(|p| p.content.as_str()).collect();
    let (vectorizer, features) = TfIdfVectorizer::fit_transform(&docs)?;
    let clustering = clusterer.cluster(&features)?;

    let vocabulary = vectorizer.vocabulary().to_vec();
    let topics = label_topics(&clustering.centers, &vocabulary);

    info!(
        posts = posts.len(),
        topics = topics.len(),
        vocabulary = vocabulary.len(),
        "Classified topics"
    );

    Ok(TopicModel {
        assignments: clustering.assignments,
        topics,
        vocabulary,
        iterations: clustering.iterations,
        inertia: clustering.inertia,
    })
}
