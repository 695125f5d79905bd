use std::{io, sync::Arc};

use thiserror::Error;
use validator::ValidationErrors;

use super::types::{DocId, Weight};

pub use super::file_operations::FileOperationError;

/// Failure reported by a postlist while advancing.
///
/// Exhaustion is not an error, a postlist simply reports `at_end()`.
/// Combinators never retry: a failure in either child fails the whole
/// subtree and is handed to the driver unchanged.
#[derive(Debug, Clone, Error)]
pub enum PostListError {
    /// A leaf could not read its postings.
    #[error("Failed to read postings of '{term}': {message}")]
    StorageError { term: String, message: String },

    /// IO Error.
    #[error("An IO error occurred while advancing a postlist: '{0}'")]
    IoError(Arc<io::Error>),
}

impl From<io::Error> for PostListError {
    fn from(io_err: io::Error) -> PostListError {
        PostListError::IoError(Arc::new(io_err))
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PostingListError {
    #[error("Docid {0} is reserved as the end-of-list sentinel")]
    ReservedDocId(DocId),

    #[error("Duplicated docid {0}, or posting is not sorted by docid correctly")]
    DuplicatedDocId(DocId),

    #[error("Weight {weight} of docid {docid} is invalid, weights must be finite and non-negative")]
    InvalidWeight { docid: DocId, weight: Weight },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("'{0:?}'")]
    FileOperationError(#[from] FileOperationError),

    #[error("Invalid match config: {0}")]
    ValidationError(#[from] ValidationErrors),
}

/// The library's error enum
#[derive(Debug, Error)]
pub enum MatchError {
    #[error(transparent)]
    PostListError(#[from] PostListError),

    #[error(transparent)]
    PostingListError(#[from] PostingListError),

    #[error(transparent)]
    ConfigError(#[from] ConfigError),

    /// Failed to build or install the log4rs configuration.
    #[error("Logger setup failed: '{0}'")]
    LoggerError(String),
}

impl From<ValidationErrors> for MatchError {
    fn from(errors: ValidationErrors) -> MatchError {
        MatchError::ConfigError(ConfigError::ValidationError(errors))
    }
}
