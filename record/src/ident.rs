//! Filename and identifier helpers.
//!
//! Record files are named `<id>-<slug>.md`, where the id is six lowercase hex
//! digits and the slug is a kebab-case rendering of the title at creation
//! time. The slug is never rewritten when the title changes, so both halves
//! of the filename are recoverable independently of the file's content.

use std::path::Path;
use std::sync::LazyLock;
use std::time::{SystemTime, UNIX_EPOCH};

use regex_lite::Regex;
use sha2::{Digest, Sha256};

#[allow(clippy::unwrap_used)]
static ID_ONLY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9a-f]{6}$").unwrap());

#[allow(clippy::unwrap_used)]
static ID_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^([0-9a-f]{6})-").unwrap());

#[allow(clippy::unwrap_used)]
static NON_ALNUM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// Check whether a string is a well-formed record identifier.
pub fn is_id(s: &str) -> bool {
    ID_ONLY_RE.is_match(s)
}

/// Extract the 6-hex id prefix from a record filename, if present.
pub fn extract_id_from_path(path: &Path) -> Option<String> {
    let file_name = path.file_name()?.to_string_lossy();
    let file_name = file_name.trim_end_matches(".md");
    ID_PREFIX_RE
        .captures(file_name)
        .map(|caps| caps[1].to_string())
}

/// Extract the slug from a record filename (the part after the id prefix).
///
/// Filenames without an id prefix yield the whole stem, so threads created
/// by hand still resolve by name.
pub fn extract_slug_from_path(path: &Path) -> String {
    let file_name = path
        .file_name()
        .map(|f| f.to_string_lossy().to_string())
        .unwrap_or_default();
    let file_name = file_name.trim_end_matches(".md");

    if ID_PREFIX_RE.is_match(file_name) && file_name.len() > 7 {
        file_name[7..].to_string()
    } else {
        file_name.to_string()
    }
}

/// Convert a title to its kebab-case slug.
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    let dashed = NON_ALNUM_RE.replace_all(&lowered, "-");
    dashed.trim_matches('-').to_string()
}

/// Build the on-disk filename for a record.
pub fn file_name_for(id: &str, name: &str) -> String {
    format!("{id}-{}.md", slugify(name))
}

/// Generate a 4-hex short hash for a note or todo entry.
///
/// The hash is salted with the current time so repeated additions of the
/// same text get distinct tags. It is a local identifier, not a fingerprint:
/// collisions are possible and resolved by first-match semantics.
pub fn short_hash(text: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();

    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hasher.update(nanos.to_string().as_bytes());
    let digest = hasher.finalize();
    format!("{:02x}{:02x}", digest[0], digest[1])
}
