//! # Thread Records
//!
//! This crate implements the document codec for thread records. A thread is a
//! single human-editable markdown file with YAML front matter and a small set
//! of named sections:
//!
//! - **Body**: free-form text
//! - **Notes**: bullet entries tagged with a 4-hex short hash
//! - **Todo**: checklist entries tagged the same way
//! - **Log**: dated groups of timestamped entries, newest first
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                      Thread Records                        │
//! ├────────────────────────────────────────────────────────────┤
//! │  bytes ──► codec::decode ──► Record ──► codec::encode      │
//! │                                │                           │
//! │                                ▼                           │
//! │             storage::load / storage::save (atomic)         │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! Decoding is best-effort: malformed lines inside a recognized section and
//! whole unrecognized sections are dropped, and decoding fails only when the
//! front matter itself cannot be parsed. Encoding always emits sections in a
//! fixed order, so `decode(encode(r)) == r` holds for any valid record even
//! though the original byte layout is not preserved.

pub mod codec;
pub mod error;
pub mod ident;
pub mod record;
pub mod storage;

pub use codec::{decode, encode};
pub use error::{RecordError, Result};
pub use ident::{
    extract_id_from_path, extract_slug_from_path, file_name_for, is_id, short_hash, slugify,
};
pub use record::{
    ACTIVE_STATUSES, DEFAULT_STATUS, LogEntry, Note, Record, TERMINAL_STATUSES, Todo, base_status,
    is_terminal, is_valid_status,
};
