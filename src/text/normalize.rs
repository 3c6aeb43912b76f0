//! Passage normalization for lexical features.

use super::lemma::Lemmatizer;
use std::collections::HashSet;
use std::sync::{Arc, OnceLock};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Read-only language resources shared by every normalizer in the process.
#[derive(Debug, Clone)]
pub struct LanguageResources {
    stopwords: HashSet<String>,
    lemmatizer: Lemmatizer,
}

impl LanguageResources {
    /// Build a bundle from an explicit stopword list.
    ///
    /// Entries are folded the same way passage tokens are (lower-cased,
    /// non-letters removed) so `"don't"` also suppresses `"dont"`.
    pub fn new<I, S>(stopwords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let stopwords = stopwords
            .into_iter()
            .map(|w| fold_token(w.as_ref()))
            .filter(|w| !w.is_empty())
            .collect();
        Self {
            stopwords,
            lemmatizer: Lemmatizer::new(),
        }
    }

    /// English stopwords and lemmatizer, loaded once per process.
    pub fn english() -> Arc<Self> {
        static ENGLISH: OnceLock<Arc<LanguageResources>> = OnceLock::new();
        ENGLISH
            .get_or_init(|| {
                let words: Vec<String> = stop_words::get(stop_words::LANGUAGE::English);
                tracing::debug!(stopwords = words.len(), "loaded english language resources");
                Arc::new(Self::new(words))
            })
            .clone()
    }

    /// True if `token` (already folded) is a stopword.
    pub fn is_stopword(&self, token: &str) -> bool {
        self.stopwords.contains(token)
    }

    /// Number of distinct stopwords.
    pub fn stopword_count(&self) -> usize {
        self.stopwords.len()
    }

    /// The lemmatizer in this bundle.
    pub fn lemmatizer(&self) -> &Lemmatizer {
        &self.lemmatizer
    }
}

fn fold_token(word: &str) -> String {
    // Lower-case first: some mappings expand into combining marks.
    word.chars()
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_alphabetic())
        .collect()
}

/// Turns raw passage text into the whitespace-joined lemma string the
/// vectorizer consumes.
///
/// Steps: strip punctuation, symbols and digits; lower-case; split on
/// whitespace; drop stopwords; lemmatize; drop lemmas that are stopwords;
/// join with single spaces. The result may be empty.
#[derive(Debug, Clone)]
pub struct Normalizer {
    resources: Arc<LanguageResources>,
}

impl Normalizer {
    /// Create a normalizer over the given resources.
    pub fn new(resources: Arc<LanguageResources>) -> Self {
        Self { resources }
    }

    /// Normalizer over the shared English resources.
    pub fn english() -> Self {
        Self::new(LanguageResources::english())
    }

    /// Normalized tokens of `text`.
    pub fn tokens(&self, text: &str) -> Vec<String> {
        let cleaned: String = text
            .chars()
            .flat_map(char::to_lowercase)
            .filter(|c| c.is_alphabetic() || c.is_whitespace())
            .collect();

        cleaned
            .split_whitespace()
            .filter(|w| !self.resources.is_stopword(w))
            .map(|w| self.resources.lemmatizer().lemmatize(w))
            .filter(|lemma| !self.resources.is_stopword(lemma))
            .collect()
    }

    /// Normalized string of `text`.
    pub fn normalize(&self, text: &str) -> String {
        self.tokens(text).join(" ")
    }

    /// Normalize a whole corpus, preserving order.
    pub fn normalize_all(&self, passages: &[String]) -> Vec<String> {
        #[cfg(feature = "parallel")]
        {
            passages.par_iter().map(|p| self.normalize(p)).collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            passages.iter().map(|p| self.normalize(p)).collect()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn small() -> Normalizer {
        Normalizer::new(Arc::new(LanguageResources::new([
            "the", "a", "on", "is", "of", "and", "don't", "our",
        ])))
    }

    #[test]
    fn strips_punctuation_digits_and_stopwords() {
        let n = small();
        assert_eq!(n.normalize("The cat sat."), "cat sat");
        assert_eq!(n.normalize("A cat sat on a mat!"), "cat sat mat");
        assert_eq!(n.normalize("In 1999, 3 dogs barked."), "in dog barked");
    }

    #[test]
    fn lemmatizes_after_lowercasing() {
        let n = small();
        assert_eq!(n.normalize("Cities and BOXES"), "city box");
    }

    #[test]
    fn stopwords_with_apostrophes_are_folded() {
        let n = small();
        assert_eq!(n.normalize("Don't panic"), "panic");
    }

    #[test]
    fn lemma_that_is_a_stopword_is_dropped() {
        // "ours" is not in the list but lemmatizes to "our", which is.
        let n = small();
        assert_eq!(n.normalize("ours cats"), "cat");
    }

    #[test]
    fn empty_and_all_noise_passages_normalize_to_empty() {
        let n = small();
        assert_eq!(n.normalize(""), "");
        assert_eq!(n.normalize("12, 34... !!"), "");
        assert_eq!(n.normalize("the of a"), "");
    }

    #[test]
    fn expanding_lowercase_leaves_only_letters() {
        // 'İ' lower-cases to "i" plus a combining dot above.
        let n = small();
        let once = n.normalize("İstanbul bridges");
        assert_eq!(once, "istanbul bridge");
        assert_eq!(n.normalize(&once), once);
    }

    #[test]
    fn english_stopwords_keep_content_words() {
        let n = Normalizer::english();
        assert_eq!(
            n.normalize("The state research group studied world information systems."),
            "state research group studied world information system"
        );
        assert_eq!(n.normalize("Men and women of the world"), "man woman world");
    }

    #[test]
    fn english_resources_load_once() {
        let a = LanguageResources::english();
        let b = LanguageResources::english();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(a.is_stopword("the"));
        assert!(a.stopword_count() > 100);
    }

    #[test]
    fn normalize_all_keeps_order_and_length() {
        let n = small();
        let corpus = vec!["Dogs bark.".to_string(), String::new(), "Cats".to_string()];
        assert_eq!(n.normalize_all(&corpus), vec!["dog bark", "", "cat"]);
    }

    proptest! {
        #[test]
        fn normalization_is_idempotent(text in "\\PC{0,120}") {
            let n = Normalizer::english();
            let once = n.normalize(&text);
            prop_assert_eq!(n.normalize(&once), once.clone());
            prop_assert!(once.chars().all(|c| c.is_alphabetic() || c == ' '));
        }
    }
}
