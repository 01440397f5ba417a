use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors surfaced while building a corpus or a classifier.
///
/// Per-record problems in the training stream are not errors; they are logged
/// and the record is dropped (see `vectorizer::record`).
#[derive(Error, Debug)]
pub enum ClassifierError {
    /// I/O errors (missing files, broken streams, ...)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The archive itself could not be read
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// A required member is missing from the archive
    #[error("{} not found file {path}", archive.display())]
    ResourceNotFound { archive: PathBuf, path: String },

    /// The same class or feature name was given twice
    #[error("duplicate {kind} name `{name}` at position {position}")]
    DuplicateName {
        kind: &'static str,
        name: String,
        position: usize,
    },

    /// A class or feature name is empty
    #[error("empty {kind} name at position {position}")]
    EmptyName { kind: &'static str, position: usize },

    /// The vocabulary matcher could not be built
    #[error("Tokenizer error: {0}")]
    Tokenizer(String),

    /// The predictor model could not be loaded
    #[error("Model error: {0}")]
    Model(String),

    /// A snapshot is internally inconsistent
    #[error("Invalid corpus: {0}")]
    InvalidCorpus(String),

    /// CBOR snapshot encoding/decoding failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_cbor::Error),
}

impl ClassifierError {
    pub fn model<E: std::fmt::Display>(err: E) -> Self {
        ClassifierError::Model(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ClassifierError>;
