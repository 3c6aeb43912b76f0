//! Run configuration and the command-line surface that builds it.

use crate::cache::CacheKey;
use crate::error::{Error, Result};
use crate::vectorize::TfidfConfig;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Training sets read when no `--dataset` is given.
pub const DEFAULT_DATASETS: [&str; 6] = [
    "datasets/indomain_train/squad",
    "datasets/indomain_train/nat_questions",
    "datasets/indomain_train/newsqa",
    "datasets/oodomain_train/duorc",
    "datasets/oodomain_train/race",
    "datasets/oodomain_train/relation_extraction",
];

/// Everything one pipeline run depends on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// SQuAD-format files, read in order.
    pub datasets: Vec<PathBuf>,
    /// Checkpoint and output directory.
    pub save_dir: PathBuf,
    /// Base seed for initialization and restarts.
    pub seed: u64,
    /// Number of topics K.
    pub n_clusters: usize,
    /// Vectorizer options.
    pub tfidf: TfidfConfig,
    /// Reduce lexical columns to this rank before fusion.
    pub svd_components: Option<usize>,
    /// k-means restarts.
    pub n_init: usize,
    /// Lloyd iteration cap per restart.
    pub max_iter: usize,
    /// Add the preposition-ratio extractor.
    pub pos_features: bool,
    /// Add the noun-ratio extractor.
    pub noun_features: bool,
    /// Log an inertia sweep over `2..=sweep_max_k` after the main fit.
    pub sweep_max_k: Option<usize>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            datasets: DEFAULT_DATASETS.iter().map(PathBuf::from).collect(),
            save_dir: PathBuf::from("save"),
            seed: 42,
            n_clusters: 20,
            tfidf: TfidfConfig::default().with_max_features(5000),
            svd_components: None,
            n_init: 10,
            max_iter: 300,
            pos_features: false,
            noun_features: false,
            sweep_max_k: None,
        }
    }
}

impl RunConfig {
    /// Checks that do not need the data. The K-versus-corpus-size check
    /// happens once the corpus is known.
    pub fn validate(&self) -> Result<()> {
        if self.n_clusters == 0 {
            return Err(Error::InvalidClusterCount {
                requested: 0,
                n_items: 0,
            });
        }
        if self.n_init == 0 {
            return Err(Error::invalid("n_init", "need at least one restart"));
        }
        if self.max_iter == 0 {
            return Err(Error::invalid("max_iter", "need at least one iteration"));
        }
        if self.svd_components == Some(0) {
            return Err(Error::invalid("svd_components", "rank must be positive"));
        }
        self.tfidf.validate()
    }

    /// Key under which this run's artifacts are stored.
    pub fn cache_key(&self) -> CacheKey {
        CacheKey {
            n_clusters: self.n_clusters,
            tfidf: self.tfidf,
            svd_components: self.svd_components,
        }
    }
}

/// Command-line interface for the `topicmap` binary.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "topicmap",
    about = "Assign unsupervised topic labels to QA training passages"
)]
pub struct Cli {
    /// SQuAD-format dataset files, comma separated
    #[arg(
        long = "dataset",
        env = "TOPICMAP_DATASETS",
        value_delimiter = ',',
        default_values = DEFAULT_DATASETS
    )]
    pub datasets: Vec<PathBuf>,

    /// Directory for checkpoints and the topic map
    #[arg(long, env = "TOPICMAP_SAVE_DIR", default_value = "save")]
    pub save_dir: PathBuf,

    /// Random seed
    #[arg(long, env = "TOPICMAP_SEED", default_value_t = 42)]
    pub seed: u64,

    /// Number of topics
    #[arg(short = 'k', long, env = "TOPICMAP_CLUSTERS", default_value_t = 20)]
    pub n_clusters: usize,

    /// Vocabulary cap by corpus frequency (0 = no cap)
    #[arg(long, env = "TOPICMAP_MAX_FEATURES", default_value_t = 5000)]
    pub max_features: usize,

    /// Minimum document frequency, as a fraction of passages
    #[arg(long, env = "TOPICMAP_MIN_DF", default_value_t = 0.0)]
    pub min_df: f64,

    /// Maximum document frequency, as a fraction of passages
    #[arg(long, env = "TOPICMAP_MAX_DF", default_value_t = 1.0)]
    pub max_df: f64,

    /// Use 1 + ln(tf) term weighting
    #[arg(long, env = "TOPICMAP_SUBLINEAR_TF", default_value_t = false)]
    pub sublinear_tf: bool,

    /// Reduce lexical features to this many SVD components before fusion
    #[arg(long, env = "TOPICMAP_SVD_COMPONENTS")]
    pub svd_components: Option<usize>,

    /// k-means restarts
    #[arg(long, env = "TOPICMAP_N_INIT", default_value_t = 10)]
    pub n_init: usize,

    /// Lloyd iteration cap per restart
    #[arg(long, env = "TOPICMAP_MAX_ITER", default_value_t = 300)]
    pub max_iter: usize,

    /// Add the preposition-ratio feature
    #[arg(long, env = "TOPICMAP_POS_FEATURES", default_value_t = false)]
    pub pos_features: bool,

    /// Add the noun-ratio feature
    #[arg(long, env = "TOPICMAP_NOUN_FEATURES", default_value_t = false)]
    pub noun_features: bool,

    /// Log k-means inertia for k = 2..=N after the main fit
    #[arg(long, env = "TOPICMAP_SWEEP_MAX_K")]
    pub sweep_max_k: Option<usize>,
}

impl Cli {
    /// Converts the parsed CLI into a validated `RunConfig`.
    pub fn build_config(&self) -> Result<RunConfig> {
        let mut tfidf = TfidfConfig::default()
            .with_df_bounds(self.min_df, self.max_df)
            .with_sublinear_tf(self.sublinear_tf);
        if self.max_features > 0 {
            tfidf = tfidf.with_max_features(self.max_features);
        }
        let config = RunConfig {
            datasets: self.datasets.clone(),
            save_dir: self.save_dir.clone(),
            seed: self.seed,
            n_clusters: self.n_clusters,
            tfidf,
            svd_components: self.svd_components,
            n_init: self.n_init,
            max_iter: self.max_iter,
            pos_features: self.pos_features,
            noun_features: self.noun_features,
            sweep_max_k: self.sweep_max_k,
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_run_config_default() {
        let cli = Cli::parse_from(["topicmap"]);
        assert_eq!(cli.build_config().unwrap(), RunConfig::default());
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::parse_from([
            "topicmap",
            "-k",
            "5",
            "--dataset",
            "a.json,b.json",
            "--max-features",
            "0",
            "--svd-components",
            "16",
            "--sublinear-tf",
            "--noun-features",
        ]);
        let config = cli.build_config().unwrap();
        assert_eq!(config.n_clusters, 5);
        assert_eq!(config.datasets, vec![PathBuf::from("a.json"), PathBuf::from("b.json")]);
        assert_eq!(config.tfidf.max_features, None);
        assert!(config.tfidf.sublinear_tf);
        assert!(config.noun_features);
        assert!(!config.pos_features);
        assert_eq!(config.svd_components, Some(16));
        assert_eq!(config.cache_key().label(), "k5_vocaball_mindf0_maxdf1_sublinear_svd16");
    }

    #[test]
    fn invalid_settings_are_config_errors() {
        for args in [
            vec!["topicmap", "-k", "0"],
            vec!["topicmap", "--min-df", "0.9", "--max-df", "0.1"],
            vec!["topicmap", "--n-init", "0"],
            vec!["topicmap", "--svd-components", "0"],
        ] {
            let err = Cli::parse_from(args.clone()).build_config().unwrap_err();
            assert!(err.is_config_error(), "{args:?}: {err}");
        }
    }
}
