//! Error types for thread records.

use thiserror::Error;

/// Result type alias for record operations.
pub type Result<T> = std::result::Result<T, RecordError>;

/// Errors that can occur while decoding, mutating, or persisting a record.
#[derive(Error, Debug)]
pub enum RecordError {
    /// The document does not begin with a `---` front matter delimiter.
    #[error("missing front matter delimiter")]
    MissingFrontMatter,

    /// The opening front matter delimiter is never closed.
    #[error("unclosed front matter")]
    UnclosedFrontMatter,

    /// The front matter is not a well-formed metadata mapping.
    #[error("invalid front matter: {0}")]
    FrontMatter(#[from] serde_yaml::Error),

    /// The record has no backing file path.
    #[error("record has no file location")]
    MissingLocation,

    /// No note or todo entry matches the given hash prefix.
    #[error("no item with hash '{0}' found")]
    ItemNotFound(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
