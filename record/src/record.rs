//! Core thread record types and mutation operations.
//!
//! A [`Record`] is the in-memory form of one thread document. Mutations
//! operate on the parsed structure; callers re-serialize with
//! [`crate::storage::save`] when done. Note and todo entries are addressed
//! by hash prefix, and the first matching entry always wins.

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::Local;

use crate::error::{RecordError, Result};
use crate::ident::short_hash;

/// Statuses for threads that still need attention.
pub const ACTIVE_STATUSES: &[&str] = &["idea", "planning", "active", "blocked", "paused"];

/// Statuses for threads that are closed.
pub const TERMINAL_STATUSES: &[&str] = &["resolved", "superseded", "deferred", "rejected"];

/// Default status assigned to new threads and to documents without one.
pub const DEFAULT_STATUS: &str = "idea";

/// Strip the parenthetical reason suffix from a status,
/// e.g. `"blocked (waiting on review)"` -> `"blocked"`.
pub fn base_status(status: &str) -> &str {
    match status.find(" (") {
        Some(idx) => &status[..idx],
        None => status,
    }
}

/// Check whether a status (with or without reason suffix) is terminal.
pub fn is_terminal(status: &str) -> bool {
    TERMINAL_STATUSES.contains(&base_status(status))
}

/// Check whether a status belongs to the known vocabulary.
pub fn is_valid_status(status: &str) -> bool {
    let base = base_status(status);
    ACTIVE_STATUSES.contains(&base) || TERMINAL_STATUSES.contains(&base)
}

/// A note entry with its short hash identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub text: String,
    pub hash: String,
}

/// A todo item with its short hash identifier and checked state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Todo {
    pub text: String,
    pub hash: String,
    pub checked: bool,
}

/// A timestamped entry within a dated log group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// `HH:MM` local time.
    pub time: String,
    pub text: String,
}

/// A parsed thread document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    /// 6-hex identifier, immutable after creation.
    pub id: String,

    /// Human-readable title.
    pub name: String,

    /// Optional one-line summary.
    pub desc: String,

    /// Status token, possibly carrying a parenthetical reason suffix.
    pub status: String,

    /// Free-form body text.
    pub body: String,

    /// Notes, newest first.
    pub notes: Vec<Note>,

    /// Checklist items, newest first.
    pub todos: Vec<Todo>,

    /// Log entries grouped by `YYYY-MM-DD` date. Within a date, entries are
    /// newest first; serialization orders the dates descending.
    pub log: BTreeMap<String, Vec<LogEntry>>,

    /// Backing file path. Assigned on load, required before save; never part
    /// of the serialized content.
    pub location: Option<PathBuf>,
}

impl Record {
    /// Create a new record with the default status.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status: DEFAULT_STATUS.to_string(),
            ..Self::default()
        }
    }

    /// The status with any reason suffix stripped.
    pub fn base_status(&self) -> &str {
        base_status(&self.status)
    }

    /// Whether this thread is closed.
    pub fn is_terminal(&self) -> bool {
        is_terminal(&self.status)
    }

    /// Add a note at the front of the list. Returns the new entry's hash.
    pub fn add_note(&mut self, text: impl Into<String>) -> String {
        let text = text.into();
        let hash = short_hash(&text);
        self.notes.insert(
            0,
            Note {
                text,
                hash: hash.clone(),
            },
        );
        hash
    }

    /// Replace the text of the first note matching a hash prefix.
    pub fn edit_note(&mut self, hash_prefix: &str, new_text: impl Into<String>) -> Result<()> {
        match self.notes.iter_mut().find(|n| n.hash.starts_with(hash_prefix)) {
            Some(note) => {
                note.text = new_text.into();
                Ok(())
            }
            None => Err(RecordError::ItemNotFound(hash_prefix.to_string())),
        }
    }

    /// Remove the first note matching a hash prefix.
    pub fn remove_note(&mut self, hash_prefix: &str) -> Result<()> {
        match self.notes.iter().position(|n| n.hash.starts_with(hash_prefix)) {
            Some(idx) => {
                self.notes.remove(idx);
                Ok(())
            }
            None => Err(RecordError::ItemNotFound(hash_prefix.to_string())),
        }
    }

    /// Add an unchecked todo at the front of the list. Returns its hash.
    pub fn add_todo(&mut self, text: impl Into<String>) -> String {
        let text = text.into();
        let hash = short_hash(&text);
        self.todos.insert(
            0,
            Todo {
                text,
                hash: hash.clone(),
                checked: false,
            },
        );
        hash
    }

    /// Replace the text of the first todo matching a hash prefix.
    pub fn edit_todo(&mut self, hash_prefix: &str, new_text: impl Into<String>) -> Result<()> {
        match self.todos.iter_mut().find(|t| t.hash.starts_with(hash_prefix)) {
            Some(todo) => {
                todo.text = new_text.into();
                Ok(())
            }
            None => Err(RecordError::ItemNotFound(hash_prefix.to_string())),
        }
    }

    /// Remove the first todo matching a hash prefix.
    pub fn remove_todo(&mut self, hash_prefix: &str) -> Result<()> {
        match self.todos.iter().position(|t| t.hash.starts_with(hash_prefix)) {
            Some(idx) => {
                self.todos.remove(idx);
                Ok(())
            }
            None => Err(RecordError::ItemNotFound(hash_prefix.to_string())),
        }
    }

    /// Set the checked state of the first todo matching a hash prefix.
    pub fn set_todo_checked(&mut self, hash_prefix: &str, checked: bool) -> Result<()> {
        match self.todos.iter_mut().find(|t| t.hash.starts_with(hash_prefix)) {
            Some(todo) => {
                todo.checked = checked;
                Ok(())
            }
            None => Err(RecordError::ItemNotFound(hash_prefix.to_string())),
        }
    }

    /// Add a log entry under today's date with the current `HH:MM` time.
    pub fn add_log_entry(&mut self, text: impl Into<String>) {
        let now = Local::now();
        let date = now.format("%Y-%m-%d").to_string();
        let time = now.format("%H:%M").to_string();
        self.add_log_entry_at(&date, &time, text);
    }

    /// Add a log entry at the front of the given date's group.
    pub fn add_log_entry_at(&mut self, date: &str, time: &str, text: impl Into<String>) {
        self.log.entry(date.to_string()).or_default().insert(
            0,
            LogEntry {
                time: time.to_string(),
                text: text.into(),
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_base_status() {
        let cases = vec![
            ("active", "active"),
            ("blocked (waiting for review)", "blocked"),
            ("resolved (done)", "resolved"),
            ("paused (vacation)", "paused"),
            ("idea", "idea"),
        ];

        for (status, want) in cases {
            assert_eq!(base_status(status), want, "base_status({status:?})");
        }
    }

    #[test]
    fn test_is_terminal() {
        let cases = vec![
            ("active", false),
            ("blocked", false),
            ("blocked (waiting on review)", false),
            ("resolved", true),
            ("resolved (done)", true),
            ("superseded", true),
            ("deferred", true),
            ("rejected", true),
        ];

        for (status, want) in cases {
            assert_eq!(is_terminal(status), want, "is_terminal({status:?})");
        }
    }

    #[test]
    fn test_is_valid_status() {
        assert!(is_valid_status("active"));
        assert!(is_valid_status("blocked (reason)"));
        assert!(is_valid_status("resolved"));
        assert!(!is_valid_status("invalid"));
        assert!(!is_valid_status("done"));
    }

    #[test]
    fn test_new_record_defaults() {
        let record = Record::new("abc123", "Fix login");
        assert_eq!(record.status, "idea");
        assert!(record.notes.is_empty());
        assert!(record.location.is_none());
    }

    #[test]
    fn test_notes_newest_first() {
        let mut record = Record::new("abc123", "Fix login");
        record.add_note("first");
        record.add_note("second");
        assert_eq!(record.notes[0].text, "second");
        assert_eq!(record.notes[1].text, "first");
    }

    #[test]
    fn test_edit_note_by_hash_prefix() {
        let mut record = Record::new("abc123", "Fix login");
        let hash = record.add_note("draft");
        record.edit_note(&hash[..2], "final").unwrap();
        assert_eq!(record.notes[0].text, "final");
        assert!(record.edit_note("zzzz", "nope").is_err());
    }

    #[test]
    fn test_remove_note_first_match_wins() {
        let mut record = Record::new("abc123", "Fix login");
        record.notes = vec![
            Note {
                text: "newer".to_string(),
                hash: "aa11".to_string(),
            },
            Note {
                text: "older".to_string(),
                hash: "aa22".to_string(),
            },
        ];

        // Both share the "aa" prefix; only the first match is removed.
        record.remove_note("aa").unwrap();
        assert_eq!(record.notes.len(), 1);
        assert_eq!(record.notes[0].text, "older");
    }

    #[test]
    fn test_todo_check_cycle() {
        let mut record = Record::new("abc123", "Fix login");
        let hash = record.add_todo("write tests");
        assert!(!record.todos[0].checked);

        record.set_todo_checked(&hash, true).unwrap();
        assert!(record.todos[0].checked);

        record.set_todo_checked(&hash, false).unwrap();
        assert!(!record.todos[0].checked);
    }

    #[test]
    fn test_log_entries_front_inserted() {
        let mut record = Record::new("abc123", "Fix login");
        record.add_log_entry_at("2025-08-20", "09:00", "started");
        record.add_log_entry_at("2025-08-20", "14:30", "made progress");
        record.add_log_entry_at("2025-08-21", "08:15", "wrapped up");

        let day_one = &record.log["2025-08-20"];
        assert_eq!(day_one[0].time, "14:30");
        assert_eq!(day_one[1].time, "09:00");
        assert_eq!(record.log["2025-08-21"].len(), 1);
    }
}
