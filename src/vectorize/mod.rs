//! Lexical features: TF-IDF over normalized passages, stored sparse.
//!
//! ```rust
//! use topicmap::vectorize::TfidfConfig;
//!
//! let corpus = vec!["cat sat".to_string(), "dog bark".to_string()];
//! let model = TfidfConfig::default().fit(&corpus).unwrap();
//! let x = model.transform(&corpus);
//! assert_eq!((x.nrows(), x.ncols()), (2, 4));
//! ```

mod sparse;
mod tfidf;

pub use sparse::CsrMatrix;
pub use tfidf::{TfidfConfig, VectorizerModel};
