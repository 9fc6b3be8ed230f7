use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::classify::bundle::model_files_present;
use crate::error::{AnalysisError, Result};
use crate::topics::kmeans::DEFAULT_CLUSTERS;

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. CLI flags
/// override whatever is set here. Paths only; nothing here can fail to
/// parse, so every subcommand can load it.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// JSON array of posts to analyze or classify
    pub input_path: PathBuf,
    /// Where the four chart pages are written
    pub plots_dir: PathBuf,
    /// Directory holding the vectorizer and classifier artifacts
    pub model_dir: PathBuf,
    /// Where `classify` writes its results
    pub classified_output: PathBuf,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup. Every key is optional.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            input_path: lookup("DISASTER_LENS_INPUT")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("posts.json")),
            plots_dir: lookup("DISASTER_LENS_PLOTS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(default_plots_dir),
            model_dir: lookup("DISASTER_LENS_MODEL_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(default_model_dir),
            classified_output: lookup("DISASTER_LENS_CLASSIFIED_OUTPUT")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("classified_posts.json")),
        }
    }

    /// Check that all model artifacts exist before loading them.
    pub fn require_models(&self) -> Result<()> {
        if !model_files_present(&self.model_dir) {
            return Err(AnalysisError::model(
                &self.model_dir,
                "model artifacts not found (expected vectorizer.json, model_target.json, \
                 model_event_type.json, model_label.json).\n\
                 Set DISASTER_LENS_MODEL_DIR or pass --model-dir.",
            ));
        }
        Ok(())
    }
}

/// k-means settings, only read by `analyze`.
///
/// A flag wins over its environment variable; the variable is not parsed
/// at all when the flag is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClusterSettings {
    /// Number of topics for k-means
    pub clusters: usize,
    /// Seed for k-means++ initialisation
    pub seed: u64,
}

impl ClusterSettings {
    pub fn load(clusters: Option<usize>, seed: Option<u64>) -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok(), clusters, seed)
    }

    pub fn from_lookup<F>(lookup: F, clusters: Option<usize>, seed: Option<u64>) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let clusters = match clusters {
            Some(k) => k,
            None => parse_var(&lookup, "DISASTER_LENS_CLUSTERS")?.unwrap_or(DEFAULT_CLUSTERS),
        };
        let seed = match seed {
            Some(seed) => seed,
            None => parse_var(&lookup, "DISASTER_LENS_SEED")?.unwrap_or(0),
        };
        if clusters == 0 {
            return Err(AnalysisError::InvalidConfig {
                message: "DISASTER_LENS_CLUSTERS / --clusters must be at least 1".to_string(),
            });
        }
        Ok(Self { clusters, seed })
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| AnalysisError::InvalidConfig {
                message: format!("{key}={raw:?} is not valid: {e}"),
            }),
    }
}

/// `plots/` next to the running executable, or under the working
/// directory if the executable path is unknown.
pub fn default_plots_dir() -> PathBuf {
    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("plots")
}

/// Returns the default directory for model artifacts.
/// Uses the platform data directory: ~/.local/share/disaster-lens/models/ on Linux.
pub fn default_model_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("disaster-lens")
        .join("models")
}
