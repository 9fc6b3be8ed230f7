// Text cleanup applied before vectorizing text for the classifiers.
//
// This must stay identical to the cleanup the models were trained with:
// lowercase, every non-word character becomes a space, whitespace split,
// English stop words dropped, single-space join. Word characters are
// Unicode-aware, so accented and non-Latin words survive intact.

use std::sync::OnceLock;

use regex::Regex;

use crate::topics::stopwords::english_stop_words;

fn non_word() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\W").expect("non-word pattern is a valid regex"))
}

pub fn preprocess(text: &str) -> String {
    let lower = text.to_lowercase();
    let spaced = non_word().replace_all(&lower, " ");
    let stop_words = english_stop_words();
    spaced
        .split_whitespace()
        .filter(|word| !stop_words.contains(*word))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_case_punctuation_and_stop_words() {
        assert_eq!(preprocess("They are stuck in TSUNAMI!"), "stuck tsunami");
    }

    #[test]
    fn keeps_content_words_of_a_stranded_tweet() {
        assert_eq!(
            preprocess("they are stuck in tsunami can you help them i am giving this image of them"),
            "stuck tsunami help giving image"
        );
        assert_eq!(preprocess("we need help at home"), "need help home");
    }

    #[test]
    fn unicode_letters_are_word_characters() {
        assert_eq!(preprocess("Café Résumé बाढ़ राहत"), "café résumé बाढ़ राहत");
        assert_eq!(preprocess("Évacuation à Montréal!"), "évacuation à montréal");
    }

    #[test]
    fn punctuation_splits_words() {
        assert_eq!(preprocess("flood-relief@chennai"), "flood relief chennai");
    }

    #[test]
    fn underscores_and_digits_are_word_characters() {
        assert_eq!(preprocess("#cyclone_2024"), "cyclone_2024");
    }

    #[test]
    fn empty_and_stop_word_only_text_gives_empty_string() {
        assert_eq!(preprocess(""), "");
        assert_eq!(preprocess("the and of"), "");
    }
}
