//! Loading and atomic persistence of thread records.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::codec;
use crate::error::{RecordError, Result};
use crate::ident;
use crate::record::Record;

/// Load a record from its markdown file.
///
/// Assigns the record's `location` and, when the front matter carries no id,
/// falls back to the id encoded in the filename.
pub fn load(path: &Path) -> Result<Record> {
    let content = fs::read_to_string(path)?;
    let mut record = codec::decode(&content)?;
    record.location = Some(path.to_path_buf());

    if record.id.is_empty()
        && let Some(id) = ident::extract_id_from_path(path)
    {
        record.id = id;
    }

    Ok(record)
}

/// Save a record to its backing file.
///
/// The encoded document is written to a temporary file in the same directory
/// and renamed over the target, so a concurrent reader never observes a
/// partially written record.
pub fn save(record: &Record) -> Result<()> {
    let path = record.location.as_ref().ok_or(RecordError::MissingLocation)?;
    let content = codec::encode(record)?;

    let tmp = path.with_extension("md.tmp");
    fs::write(&tmp, &content)?;
    fs::rename(&tmp, path)?;

    debug!("saved thread record: {}", path.display());
    Ok(())
}
