//! Error types for importing, merging and scoring tables.

use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T, E = ScoreError> = std::result::Result<T, E>;

/// Everything that can abort an import, merge, predict or export call.
///
/// Nothing is retried: each variant propagates straight to the caller.
#[derive(Debug, Error)]
pub enum ScoreError {
    /// The file could not be opened, read or written.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV was malformed (ragged rows, bad quoting, invalid UTF-8).
    #[error("malformed CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// An expected column is absent.
    #[error("column '{column}' not found in {source_name}")]
    MissingColumn { column: String, source_name: String },

    /// A cell in a numeric column could not be read as a number.
    #[error("column '{column}' for ID '{id}' is not numeric: '{value}'")]
    NotNumeric {
        column: String,
        id: String,
        value: String,
    },

    /// The identifier rule could not derive an ID from a path value.
    #[error("cannot extract an ID from '{0}'")]
    IdNotExtractable(String),

    /// Two rows of one table share an ID.
    #[error("duplicate ID '{0}'")]
    DuplicateId(String),

    /// A derived ratio had a zero denominator.
    #[error("{column} for ID '{id}' divides by a zero word_count")]
    DivisionByZero { column: String, id: String },

    /// The mode selector string is not one of the known modes.
    #[error("unknown prediction mode '{0}'")]
    UnknownMode(String),

    /// A model artifact is missing or unreadable.
    #[error("failed to load model '{model}': {reason}")]
    ModelLoad { model: String, reason: String },

    /// The table lacks feature columns a model needs.
    #[error("model '{model}' requires columns missing from the input: {missing:?}")]
    SchemaMismatch { model: String, missing: Vec<String> },

    /// A model was asked to score a row with a missing required feature.
    #[error("model '{model}' got a missing value for '{feature}' (ID '{id}')")]
    MissingFeatureValue {
        model: String,
        feature: String,
        id: String,
    },

    /// A registry target lists no models to average.
    #[error("target '{0}' has no models configured")]
    EmptyEnsemble(String),

    /// The configuration file is unreadable or invalid.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ScoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ScoreError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        ScoreError::Csv {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` for errors caused by the shape of the input data
    /// rather than by the file system or the model artifacts.
    pub fn is_schema_error(&self) -> bool {
        matches!(
            self,
            ScoreError::MissingColumn { .. }
                | ScoreError::NotNumeric { .. }
                | ScoreError::IdNotExtractable(_)
                | ScoreError::DuplicateId(_)
                | ScoreError::DivisionByZero { .. }
                | ScoreError::SchemaMismatch { .. }
        )
    }
}
