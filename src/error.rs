use core::fmt;
use std::path::PathBuf;

/// Result alias for `topicmap`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the feature and clustering pipeline.
#[derive(Debug)]
pub enum Error {
    /// Input was empty.
    EmptyInput,

    /// Matrix dimension mismatch.
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Found dimension.
        found: usize,
    },

    /// Invalid number of clusters requested.
    InvalidClusterCount {
        /// Requested count.
        requested: usize,
        /// Number of distinct items available.
        n_items: usize,
    },

    /// Invalid parameter value.
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Error message.
        message: String,
    },

    /// A dataset file was missing or malformed.
    Ingestion {
        /// Offending file.
        path: PathBuf,
        /// What went wrong.
        message: String,
    },

    /// Filesystem failure.
    Io(std::io::Error),

    /// Checkpoint (de)serialization failure.
    Checkpoint(bincode::Error),

    /// JSON (de)serialization failure.
    Json(serde_json::Error),
}

impl Error {
    pub(crate) fn invalid(name: &'static str, message: impl Into<String>) -> Self {
        Error::InvalidParameter {
            name,
            message: message.into(),
        }
    }

    /// True for errors caused by the run configuration rather than data or I/O.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidClusterCount { .. } | Error::InvalidParameter { .. }
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::EmptyInput => write!(f, "empty input provided"),
            Error::DimensionMismatch { expected, found } => {
                write!(f, "dimension mismatch: expected {expected}, found {found}")
            }
            Error::InvalidClusterCount { requested, n_items } => {
                write!(
                    f,
                    "cannot create {requested} clusters from {n_items} distinct items"
                )
            }
            Error::InvalidParameter { name, message } => {
                write!(f, "invalid parameter '{name}': {message}")
            }
            Error::Ingestion { path, message } => {
                write!(f, "failed to ingest {}: {message}", path.display())
            }
            Error::Io(err) => write!(f, "i/o error: {err}"),
            Error::Checkpoint(err) => write!(f, "checkpoint error: {err}"),
            Error::Json(err) => write!(f, "json error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Checkpoint(err) => Some(err),
            Error::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<bincode::Error> for Error {
    fn from(err: bincode::Error) -> Self {
        Error::Checkpoint(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cluster_count_message_names_both_sides() {
        let err = Error::InvalidClusterCount {
            requested: 50,
            n_items: 10,
        };
        let msg = err.to_string();
        assert!(msg.contains("50"));
        assert!(msg.contains("10"));
        assert!(err.is_config_error());
    }

    #[test]
    fn io_errors_are_not_config_errors() {
        let err = Error::from(std::io::Error::other("disk full"));
        assert!(!err.is_config_error());
        assert!(std::error::Error::source(&err).is_some());
    }
}
