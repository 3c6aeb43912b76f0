//! Text normalization: punctuation/digit stripping, stopword removal and
//! lemmatization.
//!
//! Normalized passages are the input of the lexical vectorizer. Custom scalar
//! features never see normalized text; they run on the raw passage.

mod lemma;
mod normalize;

pub use lemma::Lemmatizer;
pub use normalize::{LanguageResources, Normalizer};
