//! Resolution of short references to record files, and identifier minting.
//!
//! A reference is either a full 6-hex id or a fragment of a thread's name.
//! Resolution either returns exactly one path or fails informatively: an
//! ambiguous reference always carries the full candidate list so a caller
//! can prompt, and never silently picks one.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use rand::Rng;
use tracing::warn;

use threads_record::{extract_id_from_path, extract_slug_from_path, is_id, storage};

use crate::error::{Result, WorkspaceError};
use crate::search::find_all_threads;

/// Attempts made before giving up on minting an unused identifier.
const ID_ATTEMPTS: usize = 10;

/// One thread that matched an ambiguous reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub id: String,
    pub name: String,
    pub path: PathBuf,
}

/// Resolve a reference (6-hex id, exact name or slug, or name fragment) to
/// a unique record file.
pub fn find_by_ref(root: &Path, reference: &str) -> Result<PathBuf> {
    let threads = find_all_threads(root);

    // Fast path: a well-formed id resolves by filename prefix alone. Zero
    // matches falls through to name matching — the reference may just be a
    // six-character name.
    if is_id(reference) {
        let prefix = format!("{reference}-");
        let matches: Vec<PathBuf> = threads
            .iter()
            .filter(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with(&prefix))
            })
            .cloned()
            .collect();

        match matches.as_slice() {
            [] => {}
            [single] => return Ok(single.clone()),
            _ => {
                return Err(WorkspaceError::AmbiguousId {
                    id: reference.to_string(),
                    paths: matches,
                });
            }
        }
    }

    // Slow path: an exact name or slug match wins immediately, even when a
    // later record would also match as a substring. Substring candidates
    // only matter when no exact match exists anywhere.
    let needle = reference.to_lowercase();
    let mut candidates: Vec<Candidate> = Vec::new();

    for path in &threads {
        let record = match storage::load(path) {
            Ok(record) => record,
            Err(err) => {
                warn!("skipping unreadable thread {}: {err}", path.display());
                continue;
            }
        };
        let slug = extract_slug_from_path(path);

        if record.name == reference || slug == reference {
            return Ok(path.clone());
        }

        if record.name.to_lowercase().contains(&needle) || slug.to_lowercase().contains(&needle) {
            candidates.push(Candidate {
                id: record.id,
                name: record.name,
                path: path.clone(),
            });
        }
    }

    match candidates.len() {
        0 => Err(WorkspaceError::NotFound(reference.to_string())),
        1 => Ok(candidates.swap_remove(0).path),
        _ => Err(WorkspaceError::Ambiguous {
            reference: reference.to_string(),
            candidates,
        }),
    }
}

/// Mint a 6-hex identifier unused by any record in the workspace.
pub fn generate_id(root: &Path) -> Result<String> {
    let existing: HashSet<String> = find_all_threads(root)
        .iter()
        .filter_map(|p| extract_id_from_path(p))
        .collect();

    let mut rng = rand::rng();
    for _ in 0..ID_ATTEMPTS {
        let bytes: [u8; 3] = rng.random();
        let id = format!("{:02x}{:02x}{:02x}", bytes[0], bytes[1], bytes[2]);
        if !existing.contains(&id) {
            return Ok(id);
        }
    }

    Err(WorkspaceError::IdExhausted(ID_ATTEMPTS))
}
