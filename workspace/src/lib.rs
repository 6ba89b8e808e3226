//! # Thread Workspace
//!
//! This crate implements the query side of the thread store. The directory
//! tree under a git root is the database: any directory may hold records in
//! a reserved `.threads` subdirectory, and structure is recovered on every
//! access from directory and file naming conventions alone.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                     Thread Workspace                       │
//! ├────────────────────────────────────────────────────────────┤
//! │  git::find_root ──► scope::infer_scope ──► Scope           │
//! │       │                                                    │
//! │       ▼                                                    │
//! │  search::find_threads_with_options ◄── FindOptions         │
//! │       │                                                    │
//! │       ▼                                                    │
//! │  resolve::find_by_ref ──► unique path | Ambiguous          │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything is synchronous and stateless between calls; the only caching
//! is the opt-in [`StatusCache`] for git file-status queries, which callers
//! must invalidate after mutations.

pub mod error;
pub mod git;
pub mod resolve;
pub mod scope;
pub mod search;

pub use error::{Result, WorkspaceError};
pub use git::{StatusCache, find_root, is_git_root, is_modified, is_tracked};
pub use resolve::{Candidate, find_by_ref, generate_id};
pub use scope::{Scope, infer_scope, scope_of_thread};
pub use search::{
    ARCHIVE_DIR, FindOptions, THREADS_DIR, find_all_threads, find_threads_with_options,
};
