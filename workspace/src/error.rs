//! Error types for scope resolution, search, and reference resolution.

use std::path::PathBuf;

use thiserror::Error;
use threads_record::RecordError;

use crate::resolve::Candidate;

/// Result type alias for workspace operations.
pub type Result<T> = std::result::Result<T, WorkspaceError>;

/// Errors that can occur while resolving scopes and references.
#[derive(Error, Debug)]
pub enum WorkspaceError {
    /// Not inside a git repository; every scope-dependent operation needs one.
    #[error("not in a git repository; threads require a git repo to define scope")]
    NoRepository,

    /// The scope target does not exist as a directory.
    #[error("path not found: {}", .0.display())]
    ScopeNotFound(PathBuf),

    /// The scope target lies outside the repository root.
    #[error("path must be within the git repository: {}", .0.display())]
    OutsideRepository(PathBuf),

    /// The scope target sits inside a nested git repository.
    #[error("path is inside a nested git repository at {}", .0.display())]
    NestedRepository(PathBuf),

    /// A reference matched no thread.
    #[error("thread not found: {0}")]
    NotFound(String),

    /// An id matched more than one thread file.
    #[error("ambiguous id '{id}' matches {} files: {}", .paths.len(), fmt_paths(.paths))]
    AmbiguousId { id: String, paths: Vec<PathBuf> },

    /// A reference matched more than one thread. Carries every candidate so
    /// the caller can prompt for disambiguation.
    #[error(
        "ambiguous reference '{reference}' matches {} threads: {}",
        .candidates.len(),
        fmt_candidates(.candidates)
    )]
    Ambiguous {
        reference: String,
        candidates: Vec<Candidate>,
    },

    /// Identifier generation ran out of attempts.
    #[error("could not generate a unique id after {0} attempts")]
    IdExhausted(usize),

    /// A record file could not be decoded or written.
    #[error(transparent)]
    Record(#[from] RecordError),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

fn fmt_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn fmt_candidates(candidates: &[Candidate]) -> String {
    candidates
        .iter()
        .map(|c| format!("{} ({})", c.id, c.name))
        .collect::<Vec<_>>()
        .join(", ")
}
