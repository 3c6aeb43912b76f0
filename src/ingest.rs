//! Dataset ingestion: SQuAD-format readers folded into one field map.
//!
//! Every reading-comprehension set the pipeline consumes is stored in the
//! SQuAD v1 layout:
//!
//! ```text
//! { "data": [ { "title": ..., "paragraphs": [
//!     { "context": "...", "qas": [ { "id": ..., "question": ..., "answers": [ { "text": ..., "answer_start": ... } ] } ] }
//! ] } ] }
//! ```
//!
//! [`read_squad`] flattens one file into parallel columns, one row per
//! question (the context repeats for each of its questions). [`merge`] folds
//! several such maps together. Only the `context` column feeds clustering.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Field name -> values, one value per question row.
pub type FieldMap = BTreeMap<String, Vec<String>>;

/// Passage column.
pub const CONTEXT: &str = "context";
/// Question column.
pub const QUESTION: &str = "question";
/// Question id column.
pub const ID: &str = "id";
/// First gold answer column (empty string when a question has none).
pub const ANSWER: &str = "answer";

#[derive(Debug, Deserialize)]
struct SquadFile {
    data: Vec<Article>,
}

#[derive(Debug, Deserialize)]
struct Article {
    paragraphs: Vec<Paragraph>,
}

#[derive(Debug, Deserialize)]
struct Paragraph {
    context: String,
    #[serde(default)]
    qas: Vec<Qa>,
}

#[derive(Debug, Deserialize)]
struct Qa {
    id: String,
    question: String,
    #[serde(default)]
    answers: Vec<Answer>,
}

#[derive(Debug, Deserialize)]
struct Answer {
    text: String,
}

/// Read one SQuAD-format JSON file.
pub fn read_squad(path: &Path) -> Result<FieldMap> {
    let file = File::open(path).map_err(|e| Error::Ingestion {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let parsed: SquadFile =
        serde_json::from_reader(BufReader::new(file)).map_err(|e| Error::Ingestion {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let mut fields = FieldMap::new();
    for key in [CONTEXT, QUESTION, ID, ANSWER] {
        fields.insert(key.to_string(), Vec::new());
    }
    for paragraph in parsed.data.into_iter().flat_map(|a| a.paragraphs) {
        for qa in paragraph.qas {
            let answer = qa.answers.into_iter().next().map(|a| a.text).unwrap_or_default();
            push(&mut fields, CONTEXT, paragraph.context.clone());
            push(&mut fields, QUESTION, qa.question);
            push(&mut fields, ID, qa.id);
            push(&mut fields, ANSWER, answer);
        }
    }

    tracing::info!(
        path = %path.display(),
        rows = fields[CONTEXT].len(),
        "read squad file"
    );
    Ok(fields)
}

fn push(fields: &mut FieldMap, key: &str, value: String) {
    fields.entry(key.to_string()).or_default().push(value);
}

/// Append every column of `new` onto `acc`.
pub fn merge(new: FieldMap, mut acc: FieldMap) -> FieldMap {
    for (key, values) in new {
        acc.entry(key).or_default().extend(values);
    }
    acc
}

/// Anything that can produce the merged field map.
pub trait CorpusSource {
    /// Load and merge all fields.
    fn load(&self) -> Result<FieldMap>;

    /// Passages (`context` column) in ingestion order, duplicates included.
    fn contexts(&self) -> Result<Vec<String>> {
        let mut fields = self.load()?;
        fields.remove(CONTEXT).ok_or_else(|| Error::Ingestion {
            path: PathBuf::from("<merged>"),
            message: format!("no `{CONTEXT}` field in ingested data"),
        })
    }
}

impl CorpusSource for FieldMap {
    fn load(&self) -> Result<FieldMap> {
        Ok(self.clone())
    }
}

/// A list of SQuAD-format files read in order.
#[derive(Debug, Clone)]
pub struct SquadFiles {
    paths: Vec<PathBuf>,
}

impl SquadFiles {
    /// Read `paths` in order.
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }

    /// Files in read order.
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}

impl CorpusSource for SquadFiles {
    fn load(&self) -> Result<FieldMap> {
        if self.paths.is_empty() {
            return Err(Error::EmptyInput);
        }
        self.paths
            .iter()
            .try_fold(FieldMap::new(), |acc, path| Ok(merge(read_squad(path)?, acc)))
    }
}
