//! Part-of-speech ratio features.
//!
//! A [`TagRatio`] counts the tokens a [`PosTagger`] assigns to a set of Penn
//! tags and divides by the whitespace token count. [`LexiconTagger`] covers
//! closed word classes (prepositions, determiners, pronouns, coordinating
//! conjunctions, modals and auxiliaries) from fixed word lists; everything
//! else is tagged `"X"`. [`SuffixTagger`] adds open classes on top of the
//! lexicon: proper nouns from mid-sentence capitals, then adverbs, verb forms,
//! adjectives and common nouns from word endings.

use super::traits::{FeatureExtractor, PosTagger};
use std::collections::HashMap;

const PREPOSITIONS: &[&str] = &[
    "about", "above", "across", "after", "against", "along", "among", "around", "at",
    "because", "before", "behind", "below", "beneath", "beside", "between", "beyond", "by",
    "despite", "during", "except", "for", "from", "if", "in", "inside", "into", "like", "near",
    "of", "off", "on", "onto", "out", "outside", "over", "since", "than", "that", "though",
    "through", "throughout", "till", "toward", "towards", "under", "underneath", "unless",
    "until", "upon", "whether", "while", "with", "within", "without",
];

const DETERMINERS: &[&str] = &[
    "a", "an", "the", "this", "these", "those", "each", "every", "either", "neither", "some",
    "any", "no", "all", "both", "another",
];

const PRONOUNS: &[&str] = &[
    "i", "you", "he", "she", "it", "we", "they", "me", "him", "her", "us", "them", "myself",
    "yourself", "himself", "herself", "itself", "ourselves", "themselves",
];

const CONJUNCTIONS: &[&str] = &["and", "but", "or", "nor", "yet", "plus"];

const MODALS: &[&str] = &[
    "can", "could", "may", "might", "must", "shall", "should", "will", "would",
];

const AUXILIARIES: &[&str] = &[
    "am", "are", "be", "been", "being", "did", "do", "does", "had", "has", "have", "is", "was",
    "were",
];

const ADJECTIVE_ENDINGS: &[&str] = &["ous", "ful", "ive", "able", "ible", "less", "ish"];

/// Preposition / subordinating conjunction.
pub const TAG_IN: &str = "IN";
/// Determiner.
pub const TAG_DT: &str = "DT";
/// Personal pronoun.
pub const TAG_PRP: &str = "PRP";
/// Coordinating conjunction.
pub const TAG_CC: &str = "CC";
/// Modal verb.
pub const TAG_MD: &str = "MD";
/// Verb, base form.
pub const TAG_VB: &str = "VB";
/// Verb, past tense.
pub const TAG_VBD: &str = "VBD";
/// Verb, gerund or present participle.
pub const TAG_VBG: &str = "VBG";
/// Adverb.
pub const TAG_RB: &str = "RB";
/// Adjective.
pub const TAG_JJ: &str = "JJ";
/// Cardinal number.
pub const TAG_CD: &str = "CD";
/// Noun, singular.
pub const TAG_NN: &str = "NN";
/// Noun, plural.
pub const TAG_NNS: &str = "NNS";
/// Proper noun, singular.
pub const TAG_NNP: &str = "NNP";
/// Proper noun, plural.
pub const TAG_NNPS: &str = "NNPS";
/// Every noun tag.
pub const NOUN_TAGS: &[&str] = &[TAG_NN, TAG_NNS, TAG_NNP, TAG_NNPS];
/// Untagged (open-class or unknown) token.
pub const TAG_UNKNOWN: &str = "X";

/// Closed-class lexicon tagger.
#[derive(Debug, Clone)]
pub struct LexiconTagger {
    lexicon: HashMap<&'static str, &'static str>,
}

impl Default for LexiconTagger {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconTagger {
    /// English closed-class lexicon.
    pub fn new() -> Self {
        let mut lexicon = HashMap::new();
        // Later lists win on overlap, so the more specific classes go last.
        for (words, tag) in [
            (PREPOSITIONS, TAG_IN),
            (MODALS, TAG_MD),
            (AUXILIARIES, TAG_VB),
            (CONJUNCTIONS, TAG_CC),
            (PRONOUNS, TAG_PRP),
            (DETERMINERS, TAG_DT),
        ] {
            for &w in words {
                lexicon.insert(w, tag);
            }
        }
        Self { lexicon }
    }

    /// Closed-class tag of a lower-case word.
    pub fn lookup(&self, word: &str) -> Option<&'static str> {
        self.lexicon.get(word).copied()
    }
}

impl PosTagger for LexiconTagger {
    fn tag(&self, text: &str) -> Vec<&'static str> {
        text.split_whitespace()
            .map(|token| {
                let word = trim_token(token).to_lowercase();
                self.lookup(&word).unwrap_or(TAG_UNKNOWN)
            })
            .collect()
    }
}

fn trim_token(token: &str) -> &str {
    token.trim_matches(|c: char| !c.is_alphanumeric())
}

fn is_plural(word: &str) -> bool {
    word.chars().count() > 3
        && word.ends_with('s')
        && !["ss", "us", "is", "ous"].iter().any(|e| word.ends_with(e))
}

/// Lexicon tagger extended with open-class heuristics.
///
/// A capitalized word that does not start a sentence is a proper noun.
/// Otherwise the ending decides: `-ly` adverb, `-ing` gerund, `-ed` past
/// tense, a few adjective endings, then plural or singular common noun.
#[derive(Debug, Clone, Default)]
pub struct SuffixTagger {
    lexicon: LexiconTagger,
}

impl SuffixTagger {
    /// English lexicon plus suffix rules.
    pub fn new() -> Self {
        Self::default()
    }

    fn tag_word(&self, word: &str, sentence_start: bool) -> &'static str {
        if word.is_empty() {
            return TAG_UNKNOWN;
        }
        if word.chars().all(|c| c.is_numeric()) {
            return TAG_CD;
        }
        let lower = word.to_lowercase();
        if let Some(tag) = self.lexicon.lookup(&lower) {
            return tag;
        }
        let plural = is_plural(&lower);
        let capitalized = word.chars().next().is_some_and(char::is_uppercase);
        if capitalized && !sentence_start {
            return if plural { TAG_NNPS } else { TAG_NNP };
        }
        if lower.ends_with("ly") {
            TAG_RB
        } else if lower.ends_with("ing") {
            TAG_VBG
        } else if lower.ends_with("ed") {
            TAG_VBD
        } else if ADJECTIVE_ENDINGS.iter().any(|e| lower.ends_with(e)) {
            TAG_JJ
        } else if plural {
            TAG_NNS
        } else {
            TAG_NN
        }
    }
}

impl PosTagger for SuffixTagger {
    fn tag(&self, text: &str) -> Vec<&'static str> {
        let mut sentence_start = true;
        text.split_whitespace()
            .map(|token| {
                let tag = self.tag_word(trim_token(token), sentence_start);
                sentence_start = token.ends_with(['.', '!', '?']);
                tag
            })
            .collect()
    }
}

/// Fraction of whitespace tokens tagged with one of `tags`.
pub struct TagRatio<T: PosTagger> {
    name: &'static str,
    tags: &'static [&'static str],
    tagger: T,
}

impl<T: PosTagger> TagRatio<T> {
    /// Ratio of tokens whose tag is in `tags`.
    pub fn new(name: &'static str, tags: &'static [&'static str], tagger: T) -> Self {
        Self { name, tags, tagger }
    }
}

impl TagRatio<LexiconTagger> {
    /// Preposition share of the passage.
    pub fn prepositions() -> Self {
        Self::new("preposition_ratio", &[TAG_IN], LexiconTagger::new())
    }
}

impl TagRatio<SuffixTagger> {
    /// Noun share of the passage (common and proper, singular and plural).
    pub fn nouns() -> Self {
        Self::new("noun_ratio", NOUN_TAGS, SuffixTagger::new())
    }
}

impl<T: PosTagger> FeatureExtractor for TagRatio<T> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn evaluate(&self, context: &str) -> f64 {
        let tags = self.tagger.tag(context);
        if tags.is_empty() {
            return 0.0;
        }
        let hits = tags.iter().filter(|t| self.tags.contains(t)).count();
        hits as f64 / tags.len() as f64
    }
}
