//! # topicmap
//!
//! Unsupervised topic labels for question-answering training passages.
//!
//! Passages from SQuAD-format datasets are deduplicated, normalized and turned
//! into TF-IDF vectors, fused with a few handcrafted scalar features,
//! standardized and partitioned with k-means. The result is a JSON map from a
//! stable SHA-256 passage id to its cluster label. Every expensive stage is
//! checkpointed under the save directory so reruns with the same parameters
//! skip straight to clustering.
//!
//! ```no_run
//! use topicmap::config::RunConfig;
//! use topicmap::ingest::SquadFiles;
//! use topicmap::Pipeline;
//!
//! let config = RunConfig::default();
//! let source = SquadFiles::new(config.datasets.clone());
//! let report = Pipeline::new(config, source).run()?;
//! println!("{}", report.histogram);
//! # Ok::<(), topicmap::Error>(())
//! ```

pub mod cache;
pub mod cluster;
pub mod config;
pub mod corpus;
/// Error types used across `topicmap`.
pub mod error;
pub mod features;
pub mod fusion;
pub mod ingest;
pub mod output;
pub mod pipeline;
pub mod reduce;
pub mod text;
pub mod vectorize;

pub use cache::{CacheKey, Checkpoints, Stage};
pub use cluster::{inertia_sweep, ClusterHistogram, Clustering, Kmeans, KmeansFit};
pub use config::{Cli, RunConfig};
pub use corpus::Corpus;
pub use error::{Error, Result};
pub use features::{
    AverageSentenceLength, FeatureExtractor, FeatureRegistry, LexiconTagger, SuffixTagger, TagRatio,
};
pub use ingest::{read_squad, merge, CorpusSource, FieldMap, SquadFiles};
pub use output::{passage_id, TopicMap};
pub use pipeline::{Pipeline, RunReport};
pub use text::{LanguageResources, Normalizer};
pub use vectorize::{CsrMatrix, TfidfConfig, VectorizerModel};
