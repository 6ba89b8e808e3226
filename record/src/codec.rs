//! Decoding and encoding of the on-disk thread document format.
//!
//! A document is a YAML front matter block delimited by `---` lines, followed
//! by markdown split into level-2 sections. Recognized sections are `Body`,
//! `Notes`, `Todo`, and `Log`; anything else is dropped on decode. Within a
//! recognized section, lines that don't match the grammar are dropped too —
//! decoding fails only when the front matter itself cannot be parsed.
//!
//! Encoding normalizes layout: sections come out in a fixed order, `Notes` is
//! omitted when empty, and log dates are rendered descending. The guarantee
//! is record-level round-tripping, not byte preservation.

use std::collections::BTreeMap;
use std::fmt::Write;
use std::sync::LazyLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{RecordError, Result};
use crate::record::{DEFAULT_STATUS, LogEntry, Note, Record, Todo};

#[allow(clippy::unwrap_used)]
static SECTION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^## (\w+)\s*$").unwrap());

#[allow(clippy::unwrap_used)]
static NOTE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^- (.+?)\s*<!--\s*([0-9a-f]{4})\s*-->$").unwrap());

#[allow(clippy::unwrap_used)]
static TODO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^- \[([ x])\] (.+?)\s*<!--\s*([0-9a-f]{4})\s*-->$").unwrap());

#[allow(clippy::unwrap_used)]
static LOG_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^### (\d{4}-\d{2}-\d{2})\s*$").unwrap());

#[allow(clippy::unwrap_used)]
static LOG_ENTRY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^- \*\*(\d{2}:\d{2})\*\* (.+)$").unwrap());

/// The YAML front matter block.
///
/// `title` is a legacy alias for `name`: it is read when `name` is absent and
/// never written back, so saving a legacy document migrates it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct FrontMatter {
    #[serde(default)]
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default, skip_serializing)]
    title: String,
    #[serde(default)]
    desc: String,
    #[serde(default)]
    status: String,
}

/// Parse a thread document into a [`Record`].
///
/// The returned record has no `location`; use [`crate::storage::load`] when
/// reading from a file.
pub fn decode(content: &str) -> Result<Record> {
    let (front, body_text) = split_front_matter(content)?;
    let meta: FrontMatter = serde_yaml::from_str(front)?;

    let name = if meta.name.is_empty() {
        meta.title
    } else {
        meta.name
    };
    let status = if meta.status.is_empty() {
        DEFAULT_STATUS.to_string()
    } else {
        meta.status
    };

    let sections = split_sections(body_text);
    let section = |name: &str| sections.get(name).map(String::as_str).unwrap_or("");

    Ok(Record {
        id: meta.id,
        name,
        desc: meta.desc,
        status,
        body: section("Body").to_string(),
        notes: parse_notes(section("Notes")),
        todos: parse_todos(section("Todo")),
        log: parse_log(section("Log")),
        location: None,
    })
}

/// Serialize a [`Record`] back to its document form.
pub fn encode(record: &Record) -> Result<String> {
    let meta = FrontMatter {
        id: record.id.clone(),
        name: record.name.clone(),
        title: String::new(),
        desc: record.desc.clone(),
        status: record.status.clone(),
    };
    let yaml = serde_yaml::to_string(&meta)?;

    let mut out = String::new();
    out.push_str("---\n");
    out.push_str(&yaml);
    out.push_str("---\n\n");

    out.push_str("## Body\n\n");
    if !record.body.is_empty() {
        out.push_str(record.body.trim_end());
        out.push_str("\n\n");
    }

    if !record.notes.is_empty() {
        out.push_str("## Notes\n\n");
        for note in &record.notes {
            let _ = writeln!(out, "- {}  <!-- {} -->", note.text, note.hash);
        }
        out.push('\n');
    }

    out.push_str("## Todo\n\n");
    if !record.todos.is_empty() {
        for todo in &record.todos {
            let check = if todo.checked { 'x' } else { ' ' };
            let _ = writeln!(out, "- [{check}] {}  <!-- {} -->", todo.text, todo.hash);
        }
        out.push('\n');
    }

    out.push_str("## Log\n");
    for (date, entries) in record.log.iter().rev() {
        let _ = write!(out, "\n### {date}\n\n");
        for entry in entries {
            let _ = writeln!(out, "- **{}** {}", entry.time, entry.text);
        }
    }

    Ok(out)
}

fn split_front_matter(content: &str) -> Result<(&str, &str)> {
    let Some(rest) = content.strip_prefix("---\n") else {
        return Err(RecordError::MissingFrontMatter);
    };
    let end = rest.find("\n---").ok_or(RecordError::UnclosedFrontMatter)?;

    let front = &rest[..end];
    let after = &rest[end + 4..];
    let body = after.strip_prefix('\n').unwrap_or(after);
    Ok((front, body))
}

/// Split markdown into `{section name -> content}` on level-2 headings.
/// Text before the first heading and duplicate sections keep last-wins
/// semantics; callers only look up the recognized names.
fn split_sections(text: &str) -> BTreeMap<String, String> {
    let mut sections = BTreeMap::new();
    let mut current: Option<String> = None;
    let mut buf = String::new();

    for line in text.lines() {
        if let Some(caps) = SECTION_RE.captures(line) {
            if let Some(name) = current.take() {
                sections.insert(name, buf.trim().to_string());
                buf.clear();
            }
            current = Some(caps[1].to_string());
        } else if current.is_some() {
            buf.push_str(line);
            buf.push('\n');
        }
    }
    if let Some(name) = current {
        sections.insert(name, buf.trim().to_string());
    }

    sections
}

fn parse_notes(text: &str) -> Vec<Note> {
    text.lines()
        .filter_map(|line| {
            let caps = NOTE_RE.captures(line.trim())?;
            Some(Note {
                text: caps[1].to_string(),
                hash: caps[2].to_string(),
            })
        })
        .collect()
}

fn parse_todos(text: &str) -> Vec<Todo> {
    text.lines()
        .filter_map(|line| {
            let caps = TODO_RE.captures(line.trim())?;
            Some(Todo {
                checked: &caps[1] == "x",
                text: caps[2].to_string(),
                hash: caps[3].to_string(),
            })
        })
        .collect()
}

fn parse_log(text: &str) -> BTreeMap<String, Vec<LogEntry>> {
    let mut log: BTreeMap<String, Vec<LogEntry>> = BTreeMap::new();
    let mut current_date: Option<String> = None;

    for line in text.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }

        if let Some(caps) = LOG_DATE_RE.captures(line) {
            let date = caps[1].to_string();
            log.entry(date.clone()).or_default();
            current_date = Some(date);
            continue;
        }

        if let Some(date) = &current_date
            && let Some(caps) = LOG_ENTRY_RE.captures(line)
        {
            log.entry(date.clone()).or_default().push(LogEntry {
                time: caps[1].to_string(),
                text: caps[2].to_string(),
            });
        }
    }

    log
}
