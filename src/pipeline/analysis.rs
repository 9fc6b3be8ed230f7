// Topic analysis pipeline: load posts, classify topics, render and write
// the four charts.
//
// Runs once, top to bottom. Every chart is rendered before the plots
// directory is touched, so a failure anywhere before the write step
// leaves no files behind.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::charts::{self, ChartArtifact};
use crate::error::Result;
use crate::posts::loader::load_posts;
use crate::posts::Post;
use crate::topics::traits::Clusterer;
use crate::topics::{classify_topics, TopicModel};

/// What one analysis run produced.
#[derive(Debug)]
pub struct AnalysisReport {
    pub post_count: usize,
    pub model: TopicModel,
    /// Written chart files, in chart order.
    pub written: Vec<PathBuf>,
}

/// Topic model plus rendered (not yet written) charts for `posts`.
pub fn analyze<C: Clusterer>(
    posts: &[Post],
    clusterer: &C,
) -> Result<(TopicModel, Vec<ChartArtifact>)> {
    let model = classify_topics(posts, clusterer)?;
    let artifacts = charts::render_all(posts, &model)?;
    Ok((model, artifacts))
}

/// Run the whole pipeline on the posts in `input`, writing charts into
/// `plots_dir`.
pub fn run<C: Clusterer>(input: &Path, plots_dir: &Path, clusterer: &C) -> Result<AnalysisReport> {
    let posts = load_posts(input)?;
    run_on_posts(&posts, plots_dir, clusterer)
}

/// Same as `run` for an already-loaded corpus.
pub fn run_on_posts<C: Clusterer>(
    posts: &[Post],
    plots_dir: &Path,
    clusterer: &C,
) -> Result<AnalysisReport> {
    let (model, artifacts) = analyze(posts, clusterer)?;
    let written = charts::write_all(&artifacts, plots_dir)?;

    info!(
        posts = posts.len(),
        charts = written.len(),
        plots_dir = %plots_dir.display(),
        "Analysis complete"
    );

    Ok(AnalysisReport {
        post_count: posts.len(),
        model,
        written,
    })
}
