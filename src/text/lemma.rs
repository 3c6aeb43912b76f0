//! Noun lemmatization by exception lookup and suffix detachment.
//!
//! Irregular plurals are resolved through a fixed exception table, and nouns
//! that end in `s` but are already a dictionary lemma ("lens", "politics")
//! are listed as invariant so no suffix is detached from them. Regular
//! plurals go through detachment rules, tried longest suffix first:
//!
//! ```text
//! -sses -> -ss     (classes  -> class)
//! -ies  -> -y      (cities   -> city)
//! -xes  -> -x      (boxes    -> box)
//! -ches -> -ch     (churches -> church)
//! -shes -> -sh     (wishes   -> wish)
//! -zzes -> -zz     (buzzes   -> buzz)
//! -s    -> ""      (cats     -> cat)
//! ```
//!
//! Every output is a fixed point: lemmatizing a lemma returns it unchanged.

use std::collections::HashMap;

/// Irregular forms and their lemmas. Every lemma also maps to itself.
const EXCEPTIONS: &[(&str, &str)] = &[
    ("children", "child"),
    ("men", "man"),
    ("women", "woman"),
    ("people", "people"),
    ("mice", "mouse"),
    ("geese", "goose"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("oxen", "ox"),
    ("wolves", "wolf"),
    ("leaves", "leaf"),
    ("knives", "knife"),
    ("lives", "life"),
    ("wives", "wife"),
    ("halves", "half"),
    ("shelves", "shelf"),
    ("thieves", "thief"),
    ("loaves", "loaf"),
    ("data", "datum"),
    ("criteria", "criterion"),
    ("phenomena", "phenomenon"),
    ("analyses", "analysis"),
    ("theses", "thesis"),
    ("crises", "crisis"),
    ("series", "series"),
    ("species", "species"),
    ("news", "news"),
    ("lenses", "lens"),
    ("biases", "bias"),
    ("aliases", "alias"),
    ("atlases", "atlas"),
    ("canvases", "canvas"),
];

/// Dictionary lemmas ending in a detachable suffix.
const INVARIANT: &[&str] = &[
    "aerobics", "alias", "atlas", "athletics", "bias", "billiards", "canvas", "chaos",
    "cosmos", "diabetes", "economics", "electronics", "ethos", "gallows", "genetics",
    "gymnastics", "headquarters", "herpes", "kudos", "lens", "linguistics", "mathematics",
    "measles", "mumps", "pathos", "physics", "politics", "rabies", "scissors", "whereabouts",
];

/// Endings that look plural but are not.
const PROTECTED_ENDINGS: &[&str] = &["ss", "us", "is", "ous"];

const MIN_STEM: usize = 3;

/// Lookup-based noun lemmatizer.
#[derive(Debug, Clone)]
pub struct Lemmatizer {
    exceptions: HashMap<&'static str, &'static str>,
}

impl Default for Lemmatizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Lemmatizer {
    /// Build the lemmatizer with the English exception table.
    pub fn new() -> Self {
        let mut exceptions: HashMap<&'static str, &'static str> =
            EXCEPTIONS.iter().copied().collect();
        // Lemmas map to themselves so they never hit the suffix rules.
        for &(_, lemma) in EXCEPTIONS {
            exceptions.entry(lemma).or_insert(lemma);
        }
        for &word in INVARIANT {
            exceptions.insert(word, word);
        }
        Self { exceptions }
    }

    /// Reduce a lower-case word to its base form.
    pub fn lemmatize(&self, word: &str) -> String {
        if let Some(lemma) = self.exceptions.get(word) {
            return (*lemma).to_string();
        }
        let detached = detach_suffix(word);
        // Detachment can land on an irregular form ("mens" -> "men").
        match self.exceptions.get(detached.as_str()) {
            Some(lemma) => (*lemma).to_string(),
            None => detached,
        }
    }
}

fn detach_suffix(word: &str) -> String {
    if word.chars().count() <= MIN_STEM || PROTECTED_ENDINGS.iter().any(|e| word.ends_with(e)) {
        return word.to_string();
    }
    if let Some(stem) = word.strip_suffix("sses") {
        return format!("{stem}ss");
    }
    if let Some(stem) = word.strip_suffix("ies") {
        if stem.chars().count() >= 2 {
            return format!("{stem}y");
        }
    }
    for (suffix, keep) in [("xes", "x"), ("ches", "ch"), ("shes", "sh"), ("zzes", "zz")] {
        if let Some(stem) = word.strip_suffix(suffix) {
            return format!("{stem}{keep}");
        }
    }
    match word.strip_suffix('s') {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => word.to_string(),
    }
}
