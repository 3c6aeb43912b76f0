//! Topic map: stable passage id -> cluster label, persisted as JSON.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Stable identifier of a passage: lowercase hex SHA-256 of its UTF-8 bytes
/// (always 64 characters).
pub fn passage_id(text: &str) -> String {
    format!("{:x}", Sha256::digest(text.as_bytes()))
}

/// Sibling path used while writing `path`: the full file name plus `.tmp`.
pub(crate) fn temp_path(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}

/// Passage id -> cluster label.
///
/// Keys are kept sorted so the same map always serializes to the same bytes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopicMap {
    labels: BTreeMap<String, usize>,
}

impl TopicMap {
    /// Pair each passage with its label. Lengths must match.
    pub fn from_labels(passages: &[String], labels: &[usize]) -> Result<Self> {
        if passages.len() != labels.len() {
            return Err(Error::DimensionMismatch {
                expected: passages.len(),
                found: labels.len(),
            });
        }
        let labels = passages
            .iter()
            .zip(labels)
            .map(|(p, &l)| (passage_id(p), l))
            .collect();
        Ok(Self { labels })
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// True if empty.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Label of the passage with id `id`.
    pub fn get(&self, id: &str) -> Option<usize> {
        self.labels.get(id).copied()
    }

    /// Label of a raw passage.
    pub fn label_of(&self, passage: &str) -> Option<usize> {
        self.get(&passage_id(passage))
    }

    /// Write as one JSON object, replacing any existing file.
    pub fn write(&self, path: &Path) -> Result<()> {
        let tmp = temp_path(path);
        {
            let mut writer = BufWriter::new(File::create(&tmp)?);
            serde_json::to_writer(&mut writer, self)?;
            writer.flush()?;
        }
        fs::rename(&tmp, path)?;
        tracing::info!(path = %path.display(), entries = self.len(), "wrote topic map");
        Ok(())
    }

    /// Read a previously written map.
    pub fn read(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}
