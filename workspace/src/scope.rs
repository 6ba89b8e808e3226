//! Scope resolution: mapping a path expression to a record placement.

use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Result, WorkspaceError};
use crate::git::{canonical, is_git_root};
use crate::search::THREADS_DIR;

/// A resolved placement for thread operations.
///
/// Scopes are derived from the directory tree on every call, never
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    /// Absolute path to the `.threads` directory at this scope.
    pub threads_dir: PathBuf,

    /// Canonical path relative to the repository root (`.` for the root).
    pub path: String,

    /// Human-readable description, e.g. `repo root` or the relative path.
    pub level_desc: String,
}

/// Resolve a path expression to a [`Scope`].
///
/// Resolution rules, in priority order:
/// - `None` or empty: the current working directory
/// - `.`: the current working directory, explicitly
/// - `./X/Y`: relative to the current working directory
/// - `/X/Y`: absolute
/// - `X/Y`: relative to the repository root
///
/// The target must exist as a directory, lie within the repository root's
/// subtree, and not sit inside a nested repository.
pub fn infer_scope(root: &Path, path_arg: Option<&str>) -> Result<Scope> {
    let target = match path_arg {
        None | Some("") | Some(".") => env::current_dir()?,
        Some(p) => {
            if let Some(rel) = p.strip_prefix("./") {
                env::current_dir()?.join(rel)
            } else if p.starts_with('/') {
                PathBuf::from(p)
            } else {
                root.join(p)
            }
        }
    };

    let target_canonical = canonical(&target);
    let root_canonical = canonical(root);

    if !target_canonical.is_dir() {
        return Err(WorkspaceError::ScopeNotFound(target));
    }

    if !target_canonical.starts_with(&root_canonical) {
        return Err(WorkspaceError::OutsideRepository(target));
    }

    // Walk from the target up to the root looking for an intervening
    // repository boundary; the root itself does not count.
    if target_canonical != root_canonical {
        let mut check = target_canonical.as_path();
        while check != root_canonical {
            if is_git_root(check) {
                return Err(WorkspaceError::NestedRepository(check.to_path_buf()));
            }
            match check.parent() {
                Some(parent) => check = parent,
                None => break,
            }
        }
    }

    let rel_path = target_canonical
        .strip_prefix(&root_canonical)
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_default();
    let rel_path = if rel_path.is_empty() {
        ".".to_string()
    } else {
        rel_path
    };

    let level_desc = if rel_path == "." {
        "repo root".to_string()
    } else {
        rel_path.clone()
    };

    Ok(Scope {
        threads_dir: target_canonical.join(THREADS_DIR),
        path: rel_path,
        level_desc,
    })
}

/// The repository-relative path of the directory owning a record file,
/// i.e. the directory whose `.threads` contains it (`.` at the root).
pub fn scope_of_thread(root: &Path, thread_path: &Path) -> String {
    let root_canonical = canonical(root);
    let path_canonical = canonical(thread_path);

    let Ok(rel) = path_canonical.strip_prefix(&root_canonical) else {
        return ".".to_string();
    };

    // Pattern: <scope>/.threads/<file>.md
    let mut parts: Vec<String> = Vec::new();
    for component in rel.components() {
        let name = component.as_os_str().to_string_lossy();
        if name == THREADS_DIR {
            return if parts.is_empty() {
                ".".to_string()
            } else {
                parts.join("/")
            };
        }
        parts.push(name.into_owned());
    }

    ".".to_string()
}
