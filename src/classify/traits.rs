// Text classifier trait and the typed prediction it returns.
//
// The label vocabularies are whatever the loaded models were trained on,
// so each dimension is a newtype over the class string. A value can only
// come from the closed class list of the model that produced it.

use std::fmt;

use serde::Serialize;

use crate::error::Result;

macro_rules! label_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub(crate) fn new(class: &str) -> Self {
                Self(class.to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

label_newtype!(
    /// Whether the post is about a real disaster.
    Target
);
label_newtype!(
    /// Kind of disaster event.
    EventType
);
label_newtype!(
    /// Fine-grained post label.
    Label
);

/// The three predictions for one text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prediction {
    pub target: Target,
    pub event_type: EventType,
    pub label: Label,
}

/// Trait for multi-output text classification.
pub trait TextClassifier {
    /// Classify a single raw (unpreprocessed) text.
    fn classify(&self, text: &str) -> Result<Prediction>;

    /// Classify several texts, returning results in the same order.
    fn classify_batch(&self, texts: &[&str]) -> Result<Vec<Prediction>> {
        texts.iter().map(|t| self.classify(t)).collect()
    }
}
