// Corpus loading: reads the input JSON array into posts.
//
// Decoding is staged so each failure has its own diagnostic: read bytes,
// check UTF-8, parse JSON, check the top-level shape, then check every
// record for `content` before deserializing it.

use std::io::ErrorKind;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, info};

use super::{Corpus, Post};
use crate::error::{AnalysisError, DecodeError, Result};

/// The field every record must carry.
pub const REQUIRED_FIELD: &str = "content";

/// Load a corpus from a JSON file.
pub fn load_posts(path: &Path) -> Result<Corpus> {
    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => DecodeError::NotFound {
            path: path.to_path_buf(),
        },
        _ => DecodeError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    let text = String::from_utf8(bytes).map_err(|e| DecodeError::InvalidUtf8 {
        path: path.to_path_buf(),
        offset: e.utf8_error().valid_up_to(),
    })?;

    let value: Value = serde_json::from_str(&text).map_err(|e| DecodeError::InvalidJson {
        path: path.to_path_buf(),
        source: e,
    })?;

    let Value::Array(records) = value else {
        return Err(DecodeError::NotAnArray {
            path: path.to_path_buf(),
        }
        .into());
    };

    let posts = parse_records(records)?;
    info!(path = %path.display(), posts = posts.len(), "Loaded corpus");
    Ok(posts)
}

/// Turn already-parsed JSON records into posts.
///
/// Split out from `load_posts` so callers holding JSON in memory get the
/// same validation.
pub fn parse_records(records: Vec<Value>) -> Result<Corpus> {
    let mut posts = Vec::with_capacity(records.len());

    for (index, record) in records.into_iter().enumerate() {
        let Some(object) = record.as_object() else {
            return Err(DecodeError::InvalidRecord {
                index,
                reason: format!("expected an object, found {}", kind_of(&record)),
            }
            .into());
        };

        match object.get(REQUIRED_FIELD) {
            None | Some(Value::Null) => {
                return Err(AnalysisError::MissingField {
                    index,
                    field: REQUIRED_FIELD,
                });
            }
            Some(_) => {}
        }

        let post: Post = serde_json::from_value(record).map_err(|e| DecodeError::InvalidRecord {
            index,
            reason: e.to_string(),
        })?;
        posts.push(post);
    }

    debug!(count = posts.len(), "Validated post records");
    Ok(posts)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
