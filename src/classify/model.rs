// Linear classifier artifact: classes, one coefficient row per class (or a
// single row for a binary model) and intercepts.

use serde::{Deserialize, Serialize};

/// Artifact format this build writes and expects. Other versions still
/// load; the difference is only logged.
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearClassifier {
    #[serde(default)]
    pub format_version: u32,
    /// Class labels, in the order the model's rows refer to them.
    pub classes: Vec<String>,
    pub coef: Vec<Vec<f64>>,
    pub intercept: Vec<f64>,
}

impl LinearClassifier {
    /// Check the shapes against the vectorizer width. Returns a
    /// description of the first problem found.
    pub fn validate(&self, width: usize) -> Result<(), String> {
        if self.coef.is_empty() {
            return Err("model has no coefficient rows".to_string());
        }
        if self.intercept.len() != self.coef.len() {
            return Err(format!(
                "{} coefficient rows but {} intercepts",
                self.coef.len(),
                self.intercept.len()
            ));
        }
        let expected_classes = if self.coef.len() == 1 { 2 } else { self.coef.len() };
        if self.classes.len() != expected_classes {
            return Err(format!(
                "{} coefficient rows need {} classes, found {}",
                self.coef.len(),
                expected_classes,
                self.classes.len()
            ));
        }
        if let Some(row) = self.coef.iter().position(|r| r.len() != width) {
            return Err(format!(
                "coefficient row {row} has width {} but the vectorizer has {width} terms",
                self.coef[row].len()
            ));
        }
        Ok(())
    }

    /// Decision score per coefficient row.
    pub fn decision(&self, features: &[f64]) -> Vec<f64> {
        self.coef
            .iter()
            .zip(&self.intercept)
            .map(|(row, b)| row.iter().zip(features).map(|(w, x)| w * x).sum::<f64>() + b)
            .collect()
    }

    /// Predicted class. Binary models pick `classes[1]` on a positive score;
    /// multi-class models pick the highest score, first row on ties.
    pub fn predict(&self, features: &[f64]) -> &str {
        let scores = self.decision(features);
        let idx = if scores.len() == 1 {
            usize::from(scores[0] > 0.0)
        } else {
            scores
                .iter()
                .enumerate()
                .fold((0, f64::NEG_INFINITY), |(bi, bs), (i, &s)| {
                    if s > bs {
                        (i, s)
                    } else {
                        (bi, bs)
                    }
                })
                .0
        };
        &self.classes[idx]
    }
}
