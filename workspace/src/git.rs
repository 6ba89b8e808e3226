//! Git integration: root discovery, repository boundaries, and file status.
//!
//! The directory tree is the database; git supplies its outer boundary. The
//! root is discovered by asking the external `git` executable rather than by
//! walking for `.git` ourselves, so worktrees and `GIT_DIR` setups resolve
//! the same way they do for the user's own git commands.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::error::{Result, WorkspaceError};

/// Discover the repository root for the current working directory.
pub fn find_root() -> Result<PathBuf> {
    let output = Command::new("git")
        .args(["rev-parse", "--show-toplevel"])
        .output()?;

    if !output.status.success() {
        return Err(WorkspaceError::NoRepository);
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    Ok(PathBuf::from(stdout.trim()))
}

/// Check whether a directory is itself a repository root (contains `.git`).
///
/// This defines the nested-repository boundary for scope resolution and
/// search: `.git` may be a directory or, in a worktree, a file.
pub fn is_git_root(path: &Path) -> bool {
    path.join(".git").exists()
}

fn run_git(root: &Path, args: &[&str]) -> std::io::Result<bool> {
    let output = Command::new("git").arg("-C").arg(root).args(args).output()?;
    Ok(output.status.success())
}

fn rel_to_root<'a>(file: &'a Path, root: &Path) -> &'a Path {
    file.strip_prefix(root).unwrap_or(file)
}

/// Check whether a file is tracked by git.
pub fn is_tracked(file: &Path, root: &Path) -> Result<bool> {
    let rel = rel_to_root(file, root);
    let rel = rel.to_string_lossy();
    Ok(run_git(root, &["ls-files", "--error-unmatch", &rel])?)
}

/// Check whether a file has uncommitted changes: staged, unstaged, or
/// untracked.
pub fn is_modified(file: &Path, root: &Path) -> Result<bool> {
    let rel = rel_to_root(file, root);
    let rel = rel.to_string_lossy();

    // Staged changes
    if !run_git(root, &["diff", "--cached", "--quiet", "--", &rel])? {
        return Ok(true);
    }

    // Unstaged changes
    if !run_git(root, &["diff", "--quiet", "--", &rel])? {
        return Ok(true);
    }

    // Untracked counts as modified
    Ok(!is_tracked(file, root)?)
}

/// Process-lifetime memo of per-file modification status.
///
/// Entries are keyed by the resolved repository root so two workspaces never
/// share state. The cache must be invalidated after any operation that
/// changes tracking state (save, commit, move); it is never persisted.
#[derive(Debug, Default)]
pub struct StatusCache {
    modified: HashMap<(PathBuf, PathBuf), bool>,
}

impl StatusCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached variant of [`is_modified`].
    pub fn is_modified(&mut self, file: &Path, root: &Path) -> Result<bool> {
        let key = (canonical(root), canonical(file));
        if let Some(&hit) = self.modified.get(&key) {
            return Ok(hit);
        }

        let value = is_modified(file, root)?;
        self.modified.insert(key, value);
        Ok(value)
    }

    /// Drop every entry for the given workspace root.
    pub fn invalidate(&mut self, root: &Path) {
        let root = canonical(root);
        let before = self.modified.len();
        self.modified.retain(|(r, _), _| *r != root);
        debug!(
            "invalidated {} cached status entries for {}",
            before - self.modified.len(),
            root.display()
        );
    }
}

pub(crate) fn canonical(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
