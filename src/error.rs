// Error taxonomy for a disaster-lens run.
//
// Every variant is fatal for the run. Library code returns these typed
// errors; main.rs wraps them in anyhow context and picks the exit code by
// downcasting back to AnalysisError.

use std::path::PathBuf;

use thiserror::Error;

/// Why an input file could not be decoded into a corpus.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("input file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not valid UTF-8 (first bad byte at offset {offset})", path.display())]
    InvalidUtf8 { path: PathBuf, offset: usize },

    #[error("{} is not valid JSON: {source}", path.display())]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{} must hold a JSON array of post objects", path.display())]
    NotAnArray { path: PathBuf },

    #[error("record {index} is malformed: {reason}")]
    InvalidRecord { index: usize, reason: String },

    #[error("record {index} has an unparsable date {value:?}: {reason}")]
    InvalidDate {
        index: usize,
        value: String,
        reason: String,
    },
}

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("missing field: record {index} has no `{field}`")]
    MissingField { index: usize, field: &'static str },

    #[error("insufficient data: {reason}")]
    InsufficientData { reason: String },

    #[error("write error: could not write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("model error: {}: {reason}", path.display())]
    Model { path: PathBuf, reason: String },

    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl AnalysisError {
    pub fn insufficient(reason: impl Into<String>) -> Self {
        Self::InsufficientData {
            reason: reason.into(),
        }
    }

    pub fn model(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Model {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Process exit code for this failure. 1 is left for errors that never
    /// made it into this taxonomy.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Decode(_) => 2,
            Self::MissingField { .. } => 3,
            Self::InsufficientData { .. } => 4,
            Self::Write { .. } => 5,
            Self::Model { .. } => 6,
            Self::InvalidConfig { .. } => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct_per_kind() {
        let errors = [
            AnalysisError::Decode(DecodeError::NotFound {
                path: PathBuf::from("posts.json"),
            }),
            AnalysisError::MissingField {
                index: 0,
                field: "content",
            },
            AnalysisError::insufficient("0 documents"),
            AnalysisError::Write {
                path: PathBuf::from("plots/x.html"),
                source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            },
            AnalysisError::model("vectorizer.json", "missing"),
        ];
        let mut codes: Vec<u8> = errors.iter().map(|e| e.exit_code()).collect();
        assert!(codes.iter().all(|&c| c != 0));
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn missing_field_message_names_the_field() {
        let err = AnalysisError::MissingField {
            index: 3,
            field: "content",
        };
        let msg = err.to_string();
        assert!(msg.contains("missing field"));
        assert!(msg.contains("`content`"));
        assert!(msg.contains('3'));
    }
}
