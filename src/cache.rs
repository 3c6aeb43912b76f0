//! Staged checkpoints.
//!
//! Each expensive stage boundary (raw corpus, normalized corpus, fitted
//! vectorizer, transformed matrix) is persisted under the save directory as
//! `<stage>_<label>.bin`. On a hit the stored artifact is returned and the
//! compute closure is never called, so nesting `get_or_compute` calls lets a
//! warm downstream stage skip every stage above it.
//!
//! Staleness: the label only encodes run parameters, not the dataset bytes.
//! Changing the input files without changing parameters reuses old artifacts;
//! clear the save directory when inputs change.

use crate::error::Result;
use crate::output::temp_path;
use crate::vectorize::TfidfConfig;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Every parameter that changes a cached artifact.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CacheKey {
    /// Cluster count.
    pub n_clusters: usize,
    /// Vectorizer options.
    pub tfidf: TfidfConfig,
    /// Lexical SVD rank, if reduction is enabled.
    pub svd_components: Option<usize>,
}

impl CacheKey {
    /// The one encoding of a key into a file-name fragment.
    ///
    /// ```rust
    /// use topicmap::cache::CacheKey;
    /// use topicmap::vectorize::TfidfConfig;
    ///
    /// let key = CacheKey {
    ///     n_clusters: 20,
    ///     tfidf: TfidfConfig::default().with_max_features(5000),
    ///     svd_components: None,
    /// };
    /// assert_eq!(key.label(), "k20_vocab5000_mindf0_maxdf1");
    /// ```
    pub fn label(&self) -> String {
        let vocab = self
            .tfidf
            .max_features
            .map_or_else(|| "all".to_string(), |n| n.to_string());
        let mut label = format!(
            "k{}_vocab{}_mindf{}_maxdf{}",
            self.n_clusters, vocab, self.tfidf.min_df, self.tfidf.max_df
        );
        if self.tfidf.sublinear_tf {
            label.push_str("_sublinear");
        }
        if let Some(r) = self.svd_components {
            label.push_str(&format!("_svd{r}"));
        }
        label
    }
}

/// Checkpointed pipeline stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Deduplicated raw passages.
    RawCorpus,
    /// Normalized passages.
    NormalizedCorpus,
    /// Fitted vocabulary and IDF.
    Vectorizer,
    /// Transformed TF-IDF matrix.
    Matrix,
}

impl Stage {
    /// File-name prefix.
    pub fn prefix(self) -> &'static str {
        match self {
            Stage::RawCorpus => "raw_corpus",
            Stage::NormalizedCorpus => "normalized_corpus",
            Stage::Vectorizer => "vectorizer",
            Stage::Matrix => "matrix",
        }
    }
}

/// Load-or-compute store rooted at one save directory.
///
/// Records which stages were actually computed (cache misses) during its
/// lifetime; see [`Checkpoints::take_computed`].
#[derive(Debug)]
pub struct Checkpoints {
    dir: PathBuf,
    computed: RefCell<Vec<Stage>>,
}

impl Checkpoints {
    /// Open (creating if needed) a save directory.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            computed: RefCell::new(Vec::new()),
        })
    }

    /// Save directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Artifact path for `stage` under `key`.
    pub fn path(&self, stage: Stage, key: &CacheKey) -> PathBuf {
        self.dir
            .join(format!("{}_{}.bin", stage.prefix(), key.label()))
    }

    /// Final topic map path for `key`.
    pub fn topic_map_path(&self, key: &CacheKey) -> PathBuf {
        self.dir.join(format!("topic_id_pair_{}", key.label()))
    }

    /// Return the stored artifact, or run `compute`, store its output and
    /// return it.
    ///
    /// A file that exists but fails to decode is treated as a miss and
    /// overwritten. Errors from `compute` propagate and nothing is stored.
    pub fn get_or_compute<T, F>(&self, stage: Stage, key: &CacheKey, compute: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Result<T>,
    {
        let path = self.path(stage, key);
        if path.exists() {
            match load(&path) {
                Ok(value) => {
                    tracing::info!(stage = stage.prefix(), path = %path.display(), "checkpoint hit");
                    return Ok(value);
                }
                Err(err) => {
                    tracing::warn!(
                        stage = stage.prefix(),
                        path = %path.display(),
                        error = %err,
                        "unreadable checkpoint, recomputing"
                    );
                }
            }
        } else {
            tracing::info!(stage = stage.prefix(), "checkpoint miss");
        }

        let value = compute()?;
        store(&path, &value)?;
        self.computed.borrow_mut().push(stage);
        Ok(value)
    }

    /// Stages computed since the last call, in completion order.
    pub fn take_computed(&self) -> Vec<Stage> {
        std::mem::take(&mut *self.computed.borrow_mut())
    }
}

fn load<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let reader = BufReader::new(File::open(path)?);
    Ok(bincode::deserialize_from(reader)?)
}

fn store<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let tmp = temp_path(path);
    {
        let mut writer = BufWriter::new(File::create(&tmp)?);
        bincode::serialize_into(&mut writer, value)?;
        writer.flush()?;
    }
    fs::rename(&tmp, path)?;
    tracing::debug!(path = %path.display(), "stored checkpoint");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::cell::Cell;

    fn key() -> CacheKey {
        CacheKey {
            n_clusters: 3,
            tfidf: TfidfConfig::default(),
            svd_components: None,
        }
    }

    #[test]
    fn label_encodes_every_field() {
        let base = key();
        let mut labels = vec![base.label()];

        let mut k = base;
        k.n_clusters = 4;
        labels.push(k.label());

        let mut k = base;
        k.tfidf = k.tfidf.with_max_features(10);
        labels.push(k.label());

        let mut k = base;
        k.tfidf = k.tfidf.with_df_bounds(0.1, 1.0);
        labels.push(k.label());

        let mut k = base;
        k.tfidf = k.tfidf.with_df_bounds(0.0, 0.9);
        labels.push(k.label());

        let mut k = base;
        k.tfidf = k.tfidf.with_sublinear_tf(true);
        labels.push(k.label());

        let mut k = base;
        k.svd_components = Some(8);
        labels.push(k.label());

        let unique: std::collections::HashSet<_> = labels.iter().collect();
        assert_eq!(unique.len(), labels.len(), "{labels:?}");
        assert_eq!(labels[0], "k3_vocaball_mindf0_maxdf1");
    }

    #[test]
    fn second_lookup_skips_compute() {
        let dir = tempfile::tempdir().unwrap();
        let ckpt = Checkpoints::new(dir.path()).unwrap();
        let calls = Cell::new(0);
        let compute = || {
            calls.set(calls.get() + 1);
            Ok(vec![1.0f64, 2.0])
        };

        let first: Vec<f64> = ckpt.get_or_compute(Stage::Matrix, &key(), compute).unwrap();
        let second: Vec<f64> = ckpt.get_or_compute(Stage::Matrix, &key(), compute).unwrap();
        assert_eq!(first, second);
        assert_eq!(calls.get(), 1);
        assert_eq!(ckpt.take_computed(), vec![Stage::Matrix]);
        assert!(ckpt.take_computed().is_empty());
        assert!(ckpt.path(Stage::Matrix, &key()).exists());
    }

    #[test]
    fn nested_hit_skips_upstream() {
        let dir = tempfile::tempdir().unwrap();
        let ckpt = Checkpoints::new(dir.path()).unwrap();
        let upstream_calls = Cell::new(0);
        let run = || -> Result<String> {
            ckpt.get_or_compute(Stage::Matrix, &key(), || {
                let raw: String = ckpt.get_or_compute(Stage::RawCorpus, &key(), || {
                    upstream_calls.set(upstream_calls.get() + 1);
                    Ok("raw".to_string())
                })?;
                Ok(raw.to_uppercase())
            })
        };

        assert_eq!(run().unwrap(), "RAW");
        assert_eq!(ckpt.take_computed(), vec![Stage::RawCorpus, Stage::Matrix]);

        fs::remove_file(ckpt.path(Stage::RawCorpus, &key())).unwrap();
        assert_eq!(run().unwrap(), "RAW");
        assert_eq!(upstream_calls.get(), 1);
        assert!(ckpt.take_computed().is_empty());
    }

    #[test]
    fn failed_compute_stores_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let ckpt = Checkpoints::new(dir.path()).unwrap();
        let out: Result<Vec<u8>> =
            ckpt.get_or_compute(Stage::Vectorizer, &key(), || Err(Error::EmptyInput));
        assert!(out.is_err());
        assert!(!ckpt.path(Stage::Vectorizer, &key()).exists());
        assert!(ckpt.take_computed().is_empty());
    }

    #[test]
    fn corrupt_artifact_is_recomputed() {
        let dir = tempfile::tempdir().unwrap();
        let ckpt = Checkpoints::new(dir.path()).unwrap();
        fs::write(ckpt.path(Stage::NormalizedCorpus, &key()), [0xff]).unwrap();
        let out: Vec<String> = ckpt
            .get_or_compute(Stage::NormalizedCorpus, &key(), || Ok(vec!["a".to_string()]))
            .unwrap();
        assert_eq!(out, vec!["a"]);
        assert_eq!(ckpt.take_computed(), vec![Stage::NormalizedCorpus]);
    }
}
