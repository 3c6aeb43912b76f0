//! End-to-end run: ingest, featurize, cluster, write the topic map.
//!
//! Stage order:
//!
//! ```text
//! source ──► raw corpus ──► normalized ──► vectorizer ──► TF-IDF matrix
//!               │                                              │
//!               └──► custom features ──────► fuse ◄── [SVD] ◄──┘
//!                                              │
//!                               standardize ──► k-means ──► topic map
//! ```
//!
//! The raw corpus and TF-IDF matrix are checkpointed; normalization and the
//! vectorizer are only visited when the matrix checkpoint misses. A failed run
//! never writes the topic map.

use crate::cache::{Checkpoints, Stage};
use crate::cluster::{inertia_sweep, ClusterHistogram, Kmeans};
use crate::config::RunConfig;
use crate::corpus::Corpus;
use crate::error::{Error, Result};
use crate::features::{FeatureRegistry, TagRatio};
use crate::fusion::{fuse, standardize};
use crate::ingest::CorpusSource;
use crate::output::TopicMap;
use crate::reduce::TruncatedSvd;
use crate::text::Normalizer;
use crate::vectorize::{CsrMatrix, VectorizerModel};
use std::path::PathBuf;

/// Largest-cluster share above which the partition is reported as degenerate.
const DOMINANT_SHARE: f64 = 0.5;

/// What a successful run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Unique passages clustered.
    pub corpus_size: usize,
    /// Columns fed to k-means (lexical plus custom).
    pub n_features: usize,
    /// Label per passage, in corpus order.
    pub labels: Vec<usize>,
    /// Within-cluster sum of squares of the kept restart.
    pub inertia: f64,
    /// Cluster sizes.
    pub histogram: ClusterHistogram,
    /// Columns zeroed by standardization (zero variance).
    pub zeroed_columns: Vec<usize>,
    /// Stages computed rather than loaded from checkpoints.
    pub computed: Vec<Stage>,
    /// `(k, inertia)` pairs when a sweep was requested.
    pub sweep: Vec<(usize, f64)>,
    /// Where the topic map was written.
    pub topic_map_path: PathBuf,
}

/// One configured run over a corpus source.
#[derive(Debug)]
pub struct Pipeline<S> {
    config: RunConfig,
    source: S,
    normalizer: Normalizer,
    registry: FeatureRegistry,
}

impl<S: CorpusSource> Pipeline<S> {
    /// English normalizer, and the stock extractors plus the preposition
    /// ratio (`config.pos_features`) and noun ratio (`config.noun_features`)
    /// when enabled.
    pub fn new(config: RunConfig, source: S) -> Self {
        let mut registry = FeatureRegistry::standard();
        if config.pos_features {
            registry = registry.with(TagRatio::prepositions());
        }
        if config.noun_features {
            registry = registry.with(TagRatio::nouns());
        }
        Self {
            config,
            source,
            normalizer: Normalizer::english(),
            registry,
        }
    }

    /// Replace the text normalizer.
    pub fn with_normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Replace the custom feature registry.
    pub fn with_registry(mut self, registry: FeatureRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Run configuration.
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Execute every stage and write the topic map.
    pub fn run(&self) -> Result<RunReport> {
        let config = &self.config;
        config.validate()?;

        let ckpt = Checkpoints::new(&config.save_dir)?;
        let key = config.cache_key();
        tracing::info!(label = %key.label(), save_dir = %ckpt.dir().display(), "starting run");

        let corpus: Corpus = ckpt.get_or_compute(Stage::RawCorpus, &key, || {
            let contexts = self.source.contexts()?;
            let n_contexts = contexts.len();
            let corpus = Corpus::from_contexts(contexts);
            if corpus.is_empty() {
                return Err(Error::EmptyInput);
            }
            tracing::info!(contexts = n_contexts, unique = corpus.len(), "built corpus");
            Ok(corpus)
        })?;

        if config.n_clusters > corpus.len() {
            return Err(Error::InvalidClusterCount {
                requested: config.n_clusters,
                n_items: corpus.len(),
            });
        }

        let matrix: CsrMatrix = ckpt.get_or_compute(Stage::Matrix, &key, || {
            let normalized: Vec<String> =
                ckpt.get_or_compute(Stage::NormalizedCorpus, &key, || {
                    tracing::info!(passages = corpus.len(), "normalizing");
                    Ok(self.normalizer.normalize_all(corpus.passages()))
                })?;
            let model: VectorizerModel = ckpt.get_or_compute(Stage::Vectorizer, &key, || {
                config.tfidf.fit(&normalized)
            })?;
            Ok(model.transform(&normalized))
        })?;

        if matrix.nrows() != corpus.len() {
            return Err(Error::DimensionMismatch {
                expected: corpus.len(),
                found: matrix.nrows(),
            });
        }
        tracing::info!(rows = matrix.nrows(), cols = matrix.ncols(), nnz = matrix.nnz(), "tfidf matrix");

        let mut lexical = matrix.to_dense();
        if let Some(r) = config.svd_components {
            lexical = TruncatedSvd::new(r)
                .with_seed(config.seed)
                .fit_transform(&lexical)?;
            tracing::info!(components = r, "reduced lexical features");
        }

        let custom = self.registry.extract(corpus.passages());
        let fused = fuse(&lexical, &custom)?;
        let standardized = standardize(fused)?;
        let features = standardized.matrix;
        let n_features = features.ncols();

        let fit = Kmeans::new(config.n_clusters)
            .with_n_init(config.n_init)
            .with_max_iter(config.max_iter)
            .with_seed(config.seed)
            .fit(features.view())?;
        tracing::info!(k = config.n_clusters, inertia = fit.inertia, n_iter = fit.n_iter, "clustered");

        let histogram = ClusterHistogram::new(&fit.labels, config.n_clusters);
        if histogram.largest_share() > DOMINANT_SHARE {
            tracing::warn!(
                share = histogram.largest_share(),
                "one cluster holds most passages; consider different features or k"
            );
        }

        let sweep = match config.sweep_max_k {
            Some(max_k) => inertia_sweep(features.view(), 2..=max_k, Some(config.seed))?,
            None => Vec::new(),
        };

        let topic_map_path = ckpt.topic_map_path(&key);
        TopicMap::from_labels(corpus.passages(), &fit.labels)?.write(&topic_map_path)?;

        Ok(RunReport {
            corpus_size: corpus.len(),
            n_features,
            labels: fit.labels,
            inertia: fit.inertia,
            histogram,
            zeroed_columns: standardized.zeroed,
            computed: ckpt.take_computed(),
            sweep,
            topic_map_path,
        })
    }
}
