// TF-IDF vectorization of post text.
//
// Each post is a separate document for IDF computation: words that appear
// in every post get downweighted, words distinctive to a few posts get
// boosted. The vocabulary comes from the corpus being analyzed only and is
// kept in lexicographic order, so a term's index is stable for a given
// corpus and label tie-breaks follow that order.
//
// Weighting: raw term count x smoothed IDF, ln((1 + n) / (1 + df)) + 1,
// then each document row is L2-normalised.

use std::collections::{BTreeMap, HashSet};
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::stopwords::english_stop_words;
use crate::error::{AnalysisError, Result};

fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // Runs of two or more Unicode word characters.
    PATTERN.get_or_init(|| Regex::new(r"\b\w\w+\b").expect("token pattern is a valid regex"))
}

/// Lowercase `text` and split it into tokens, optionally dropping stop words.
pub fn tokenize(text: &str, drop_stop_words: bool) -> Vec<String> {
    let lower = text.to_lowercase();
    let stop_words = english_stop_words();
    token_pattern()
        .find_iter(&lower)
        .map(|m| m.as_str())
        .filter(|token| !drop_stop_words || !stop_words.contains(*token))
        .map(str::to_string)
        .collect()
}

/// A fitted TF-IDF vectorizer: vocabulary plus per-term IDF.
///
/// Serializes to JSON so a vectorizer fitted elsewhere can be loaded for
/// classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfIdfVectorizer {
    /// Terms in lexicographic order; position is the feature index.
    vocabulary: Vec<String>,
    /// IDF weight per vocabulary term.
    idf: Vec<f64>,
    /// Whether tokenization drops English stop words.
    #[serde(default)]
    strip_stop_words: bool,
}

impl TfIdfVectorizer {
    /// Learn vocabulary and IDF from `docs`, with stop words removed.
    ///
    /// Fails with `InsufficientData` if nothing is left to build a
    /// vocabulary from (no documents, or only stop words).
    pub fn fit<S: AsRef<str>>(docs: &[S]) -> Result<Self> {
        let tokenized: Vec<Vec<String>> =
            docs.iter().map(|d| tokenize(d.as_ref(), true)).collect();

        // Document frequency per term; BTreeMap keeps the vocabulary sorted.
        let mut doc_freq: BTreeMap<&str, usize> = BTreeMap::new();
        for tokens in &tokenized {
            let unique: HashSet<&str> = tokens.iter().map(String::as_str).collect();
            for term in unique {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        if doc_freq.is_empty() {
            return Err(AnalysisError::insufficient(format!(
                "empty vocabulary: {} documents contain no terms after stop-word removal",
                docs.len()
            )));
        }

        let n = docs.len() as f64;
        let (vocabulary, idf): (Vec<String>, Vec<f64>) = doc_freq
            .into_iter()
            .map(|(term, df)| (term.to_string(), ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0))
            .unzip();

        info!(
            documents = docs.len(),
            vocabulary = vocabulary.len(),
            "Fitted TF-IDF vectorizer"
        );

        Ok(Self {
            vocabulary,
            idf,
            strip_stop_words: true,
        })
    }

    /// Fit on `docs` and return the vectorizer with one feature vector per doc.
    pub fn fit_transform<S: AsRef<str>>(docs: &[S]) -> Result<(Self, Vec<Vec<f64>>)> {
        let vectorizer = Self::fit(docs)?;
        let features = vectorizer.transform(docs);
        Ok((vectorizer, features))
    }

    /// Build a vectorizer from an already-known vocabulary and IDF vector.
    ///
    /// The vocabulary must be strictly sorted (no duplicates) and the two
    /// vectors must have the same length.
    pub fn from_parts(vocabulary: Vec<String>, idf: Vec<f64>, strip_stop_words: bool) -> Result<Self> {
        let vectorizer = Self {
            vocabulary,
            idf,
            strip_stop_words,
        };
        vectorizer.validate().map_err(AnalysisError::insufficient)?;
        Ok(vectorizer)
    }

    /// Check the internal invariants. Returns a description of the first
    /// violation found.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.vocabulary.len() != self.idf.len() {
            return Err(format!(
                "vocabulary has {} terms but idf has {} weights",
                self.vocabulary.len(),
                self.idf.len()
            ));
        }
        if let Some(pos) = self.vocabulary.windows(2).position(|w| w[0] >= w[1]) {
            return Err(format!(
                "vocabulary is not strictly sorted at {:?} / {:?}",
                self.vocabulary[pos],
                self.vocabulary[pos + 1]
            ));
        }
        Ok(())
    }

    /// Vectorize documents against the fitted vocabulary. Unknown terms are
    /// ignored; a document with no known terms yields an all-zero vector.
    pub fn transform<S: AsRef<str>>(&self, docs: &[S]) -> Vec<Vec<f64>> {
        docs.iter().map(|d| self.transform_one(d.as_ref())).collect()
    }

    pub fn transform_one(&self, doc: &str) -> Vec<f64> {
        let mut row = vec![0.0; self.vocabulary.len()];
        for token in tokenize(doc, self.strip_stop_words) {
            if let Some(idx) = self.term_index(&token) {
                row[idx] += 1.0;
            }
        }
        for (value, idf) in row.iter_mut().zip(&self.idf) {
            *value *= idf;
        }
        let norm = row.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for value in &mut row {
                *value /= norm;
            }
        }
        row
    }

    /// The learned terms, index-aligned with every feature vector.
    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    pub fn idf(&self) -> &[f64] {
        &self.idf
    }

    pub fn term_index(&self, term: &str) -> Option<usize> {
        self.vocabulary
            .binary_search_by(|probe| probe.as_str().cmp(term))
            .ok()
    }

    pub fn len(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vocabulary.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_lowercases_and_drops_short_tokens() {
        let tokens = tokenize("Flood in Chennai, a BIG one!", false);
        assert_eq!(tokens, vec!["flood", "in", "chennai", "big", "one"]);
    }

    #[test]
    fn tokenize_keeps_accented_and_devanagari_words() {
        let tokens = tokenize("Café Résumé बाढ़ राहत", false);
        assert_eq!(tokens, vec!["café", "résumé", "बाढ़", "राहत"]);
    }

    #[test]
    fn non_latin_corpus_has_a_vocabulary() {
        let v = TfIdfVectorizer::fit(&["बाढ़ राहत", "भूकंप"]).unwrap();
        assert_eq!(v.len(), 3);
        assert!(v.term_index("बाढ़").is_some());
        assert!(v.term_index("भूकंप").is_some());
    }

    #[test]
    fn tokenize_keeps_need_help_home() {
        let tokens = tokenize("we need help at home", true);
        assert_eq!(tokens, vec!["need", "help", "home"]);
    }

    #[test]
    fn tokenize_drops_stop_words() {
        let tokens = tokenize("they are stuck in the tsunami", true);
        assert_eq!(tokens, vec!["stuck", "tsunami"]);
    }

    #[test]
    fn vocabulary_is_sorted_and_excludes_stop_words() {
        let docs = ["the flood is here", "earthquake and flood"];
        let vectorizer = TfIdfVectorizer::fit(&docs).unwrap();
        assert_eq!(vectorizer.vocabulary(), &["earthquake", "flood"]);
        assert!(vectorizer.validate().is_ok());
    }

    #[test]
    fn rows_are_unit_length() {
        let docs = ["flood help now", "earthquake rescue team", "flood rescue"];
        let (_, features) = TfIdfVectorizer::fit_transform(&docs).unwrap();
        for row in &features {
            let norm: f64 = row.iter().map(|v| v * v).sum::<f64>().sqrt();
            assert!((norm - 1.0).abs() < 1e-9, "row norm {norm}");
        }
    }

    #[test]
    fn rarer_terms_weigh_more() {
        // "flood" is in both docs, "rescue" only in the second.
        let docs = ["flood warning", "flood rescue"];
        let (v, features) = TfIdfVectorizer::fit_transform(&docs).unwrap();
        let flood = v.term_index("flood").unwrap();
        let rescue = v.term_index("rescue").unwrap();
        assert!(features[1][rescue] > features[1][flood]);
    }

    #[test]
    fn smoothed_idf_matches_formula() {
        let docs = ["flood", "flood smoke", "smoke"];
        let v = TfIdfVectorizer::fit(&docs).unwrap();
        let expected = ((1.0f64 + 3.0) / (1.0 + 2.0)).ln() + 1.0;
        for idf in v.idf() {
            assert!((idf - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn only_stop_words_is_insufficient() {
        let err = TfIdfVectorizer::fit(&["the and of", "is it"]).unwrap_err();
        assert!(matches!(err, AnalysisError::InsufficientData { .. }));
    }

    #[test]
    fn unknown_terms_give_zero_vector() {
        let v = TfIdfVectorizer::fit(&["flood rescue"]).unwrap();
        let row = v.transform_one("volcano");
        assert!(row.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn from_parts_rejects_unsorted_vocabulary() {
        let result = TfIdfVectorizer::from_parts(
            vec!["zebra".to_string(), "apple".to_string()],
            vec![1.0, 1.0],
            false,
        );
        assert!(result.is_err());
    }
}
