// Batch classification: predict labels for every post and write the
// augmented records back out as JSON.

use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::info;

use crate::classify::traits::{EventType, Label, Target, TextClassifier};
use crate::error::{AnalysisError, Result};
use crate::posts::Post;

/// A post's original fields plus its three predicted labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedPost {
    pub content: String,
    pub target: Target,
    pub event_type: EventType,
    pub label: Label,
    pub date: Option<String>,
    pub like_count: Option<u64>,
    pub retweet_count: Option<u64>,
    pub hashtags: Option<Vec<Option<String>>>,
    pub media_url: Option<String>,
}

/// Classify every post, in corpus order.
pub fn classify_posts(classifier: &dyn TextClassifier, posts: &[Post]) -> Result<Vec<ClassifiedPost>> {
    let pb = ProgressBar::new(posts.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  Classifying [{bar:30}] {pos}/{len} ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let mut results = Vec::with_capacity(posts.len());
    for post in posts {
        let prediction = classifier.classify(&post.content)?;
        results.push(ClassifiedPost {
            content: post.content.clone(),
            target: prediction.target,
            event_type: prediction.event_type,
            label: prediction.label,
            date: post.date.clone(),
            like_count: post.like_count,
            retweet_count: post.retweet_count,
            hashtags: post.hashtags.clone(),
            media_url: post.media_url.clone(),
        });
        pb.inc(1);
    }
    pb.finish_and_clear();

    info!(posts = results.len(), "Classified posts");
    Ok(results)
}

/// Write results as a JSON array indented with four spaces.
pub fn write_classified(path: &Path, results: &[ClassifiedPost]) -> Result<()> {
    let write_err = |source: std::io::Error| AnalysisError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    results
        .serialize(&mut ser)
        .map_err(|e| write_err(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;

    std::fs::write(path, buf).map_err(write_err)?;
    info!(path = %path.display(), records = results.len(), "Wrote classified posts");
    Ok(())
}
