// Chart rendering: four interactive Plotly pages per run.
//
// All four figures are built in memory first; the output directory is only
// created, and files only written, once every chart rendered. A failure
// while building therefore leaves nothing on disk.

pub mod engagement;
pub mod figure;
pub mod hashtags;
pub mod topics;

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{AnalysisError, Result};
use crate::posts::Post;
use crate::topics::TopicModel;
use figure::Figure;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Engagement,
    TimeSeries,
    TopicDistribution,
    Hashtags,
}

impl ChartKind {
    pub const ALL: [ChartKind; 4] = [
        ChartKind::Engagement,
        ChartKind::TimeSeries,
        ChartKind::TopicDistribution,
        ChartKind::Hashtags,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            ChartKind::Engagement => "engagement_metrics.html",
            ChartKind::TimeSeries => "time_series_analysis.html",
            ChartKind::TopicDistribution => "topic_classification.html",
            ChartKind::Hashtags => "hashtag_analysis.html",
        }
    }
}

/// One rendered chart, ready to be written.
#[derive(Debug, Clone)]
pub struct ChartArtifact {
    pub kind: ChartKind,
    pub figure: Figure,
}

/// Build all four charts for a corpus and its topic model.
pub fn render_all(posts: &[Post], model: &TopicModel) -> Result<Vec<ChartArtifact>> {
    let points = engagement::timeline(posts)?;
    Ok(vec![
        ChartArtifact {
            kind: ChartKind::Engagement,
            figure: engagement::engagement_chart(&points),
        },
        ChartArtifact {
            kind: ChartKind::TimeSeries,
            figure: engagement::time_series_chart(&points),
        },
        ChartArtifact {
            kind: ChartKind::TopicDistribution,
            figure: topics::topic_chart(model),
        },
        ChartArtifact {
            kind: ChartKind::Hashtags,
            figure: hashtags::hashtag_chart(posts),
        },
    ])
}

/// Write each artifact as `<dir>/<file name>`, creating `dir` first.
/// Returns the written paths in artifact order.
pub fn write_all(artifacts: &[ChartArtifact], dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir).map_err(|e| AnalysisError::Write {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut written = Vec::with_capacity(artifacts.len());
    for artifact in artifacts {
        let path = dir.join(artifact.kind.file_name());
        let html = artifact.figure.to_html().map_err(|e| AnalysisError::Write {
            path: path.clone(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
        })?;
        std::fs::write(&path, html).map_err(|e| AnalysisError::Write {
            path: path.clone(),
            source: e,
        })?;
        info!(chart = ?artifact.kind, path = %path.display(), "Wrote chart");
        written.push(path);
    }
    Ok(written)
}
