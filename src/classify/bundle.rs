// Loaded classification context: one fitted vectorizer and three
// classifiers, read from a model directory once at startup and passed to
// whatever needs predictions.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::model::{LinearClassifier, ARTIFACT_FORMAT_VERSION};
use super::preprocess::preprocess;
use super::traits::{EventType, Label, Prediction, Target, TextClassifier};
use crate::error::{AnalysisError, Result};
use crate::topics::tfidf::TfIdfVectorizer;

pub const VECTORIZER_FILE: &str = "vectorizer.json";
pub const TARGET_MODEL_FILE: &str = "model_target.json";
pub const EVENT_TYPE_MODEL_FILE: &str = "model_event_type.json";
pub const LABEL_MODEL_FILE: &str = "model_label.json";

/// Check whether every artifact file is present in `dir`.
pub fn model_files_present(dir: &Path) -> bool {
    [
        VECTORIZER_FILE,
        TARGET_MODEL_FILE,
        EVENT_TYPE_MODEL_FILE,
        LABEL_MODEL_FILE,
    ]
    .iter()
    .all(|f| dir.join(f).exists())
}

/// On-disk form of the vectorizer: the vectorizer plus a format version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorizerArtifact {
    #[serde(default)]
    pub format_version: u32,
    #[serde(flatten)]
    pub vectorizer: TfIdfVectorizer,
}

pub struct ModelBundle {
    vectorizer: TfIdfVectorizer,
    target: LinearClassifier,
    event_type: LinearClassifier,
    label: LinearClassifier,
}

impl ModelBundle {
    /// Load and validate all four artifacts from `dir`.
    pub fn load(dir: &Path) -> Result<Self> {
        let vectorizer_path = dir.join(VECTORIZER_FILE);
        let artifact: VectorizerArtifact = read_artifact(&vectorizer_path)?;
        note_version(&vectorizer_path, artifact.format_version);
        artifact
            .vectorizer
            .validate()
            .map_err(|reason| AnalysisError::model(&vectorizer_path, reason))?;
        let vectorizer = artifact.vectorizer;

        let load_model = |file: &str| -> Result<LinearClassifier> {
            let path = dir.join(file);
            let model: LinearClassifier = read_artifact(&path)?;
            note_version(&path, model.format_version);
            model
                .validate(vectorizer.len())
                .map_err(|reason| AnalysisError::model(&path, reason))?;
            Ok(model)
        };

        let target = load_model(TARGET_MODEL_FILE)?;
        let event_type = load_model(EVENT_TYPE_MODEL_FILE)?;
        let label = load_model(LABEL_MODEL_FILE)?;

        info!(
            dir = %dir.display(),
            terms = vectorizer.len(),
            target_classes = target.classes.len(),
            event_type_classes = event_type.classes.len(),
            label_classes = label.classes.len(),
            "Loaded classification models"
        );

        Ok(Self {
            vectorizer,
            target,
            event_type,
            label,
        })
    }

    /// Assemble a bundle from in-memory parts, with the same validation
    /// `load` applies.
    pub fn from_parts(
        vectorizer: TfIdfVectorizer,
        target: LinearClassifier,
        event_type: LinearClassifier,
        label: LinearClassifier,
    ) -> Result<Self> {
        let width = vectorizer.len();
        for (name, model) in [
            ("target", &target),
            ("event_type", &event_type),
            ("label", &label),
        ] {
            model
                .validate(width)
                .map_err(|reason| AnalysisError::model(name, reason))?;
        }
        Ok(Self {
            vectorizer,
            target,
            event_type,
            label,
        })
    }

    pub fn vectorizer(&self) -> &TfIdfVectorizer {
        &self.vectorizer
    }
}

impl TextClassifier for ModelBundle {
    fn classify(&self, text: &str) -> Result<Prediction> {
        let cleaned = preprocess(text);
        let features = self.vectorizer.transform_one(&cleaned);

        let prediction = Prediction {
            target: Target::new(self.target.predict(&features)),
            event_type: EventType::new(self.event_type.predict(&features)),
            label: Label::new(self.label.predict(&features)),
        };
        debug!(
            target = %prediction.target,
            event_type = %prediction.event_type,
            label = %prediction.label,
            text_preview = %crate::output::truncate_chars(text, 50),
            "Classified text"
        );
        Ok(prediction)
    }
}

fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        let reason = if e.kind() == std::io::ErrorKind::NotFound {
            "artifact not found".to_string()
        } else {
            format!("could not read artifact: {e}")
        };
        AnalysisError::model(path, reason)
    })?;
    serde_json::from_str(&text)
        .map_err(|e| AnalysisError::model(path, format!("malformed artifact: {e}")))
}

/// Artifacts written by a different format version still load. The
/// mismatch is benign and only visible at debug level.
fn note_version(path: &Path, found: u32) {
    if found != ARTIFACT_FORMAT_VERSION {
        debug!(
            path = %path.display(),
            found,
            expected = ARTIFACT_FORMAT_VERSION,
            "Artifact format version differs; loading anyway"
        );
    }
}
