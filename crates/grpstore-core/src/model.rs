//! # Group Records
//!
//! The group database is a plain text file with one record per line:
//!
//! ```text
//! <name>:<placeholder>:<gid>[:<member1>,<member2>,...]
//! ```
//!
//! [`GroupFile`] is the parsed form of one snapshot of that file. It keeps the
//! original text of every line next to the parsed [`Record`], so lines that a
//! mutation does not touch are written back exactly as they were read. Only
//! new or modified records are rendered from their fields, always with the
//! four-field layout (an empty member list becomes a trailing `:`).
//!
//! Parsing is strict: anything that is not a well-formed record, and any
//! duplicate name, GID, or member, is rejected with the offending line number
//! instead of being skipped or guessed at.

use crate::error::{GroupStoreError, Result};
use crate::validation::validate_name;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// Numeric group identifier.
pub type Gid = u32;

const FIELD_SEP: char = ':';
const MEMBER_SEP: char = ',';

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub name: String,
    pub placeholder: String,
    pub gid: Gid,
    pub members: Vec<String>,
}

impl Record {
    pub fn new(name: impl Into<String>, placeholder: impl Into<String>, gid: Gid) -> Self {
        Self {
            name: name.into(),
            placeholder: placeholder.into(),
            gid,
            members: Vec::new(),
        }
    }

    pub fn has_member(&self, user: &str) -> bool {
        self.members.iter().any(|m| m == user)
    }

    /// Render the record as a line, without the trailing newline.
    pub fn to_line(&self) -> String {
        format!(
            "{}{sep}{}{sep}{}{sep}{}",
            self.name,
            self.placeholder,
            self.gid,
            self.members.join(","),
            sep = FIELD_SEP
        )
    }

    /// Parse a single line (without its newline) into a record.
    ///
    /// The error is a human-readable reason; [`GroupFile::parse`] attaches the
    /// line number.
    pub fn parse_line(line: &str) -> std::result::Result<Self, String> {
        let fields: Vec<&str> = line.split(FIELD_SEP).collect();
        if fields.len() != 3 && fields.len() != 4 {
            return Err(format!(
                "expected 3 or 4 ':'-separated fields, found {}",
                fields.len()
            ));
        }

        let name = fields[0];
        validate_name(name).map_err(|e| format!("bad group name {:?}: {}", name, e))?;

        let gid = parse_gid(fields[2])?;

        let mut members = Vec::new();
        if let Some(list) = fields.get(3).filter(|list| !list.is_empty()) {
            for member in list.split(MEMBER_SEP) {
                validate_name(member)
                    .map_err(|e| format!("bad member {:?} in group {}: {}", member, name, e))?;
                if members.iter().any(|m| m == member) {
                    return Err(format!("member {} listed twice in group {}", member, name));
                }
                members.push(member.to_string());
            }
        }

        Ok(Self {
            name: name.to_string(),
            placeholder: fields[1].to_string(),
            gid,
            members,
        })
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_line())
    }
}

fn parse_gid(field: &str) -> std::result::Result<Gid, String> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("gid {:?} is not a non-negative integer", field));
    }
    field
        .parse()
        .map_err(|_| format!("gid {} is out of range", field))
}

/// A line that could not be parsed into a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// 1-based line number
    pub line: usize,
    pub reason: String,
}

#[derive(Debug, Clone)]
struct Entry {
    record: Record,
    /// Original text of the line; `None` once the record has been modified.
    raw: Option<String>,
}

impl Entry {
    fn render(&self) -> String {
        match &self.raw {
            Some(raw) => raw.clone(),
            None => self.record.to_line(),
        }
    }
}

/// Parsed snapshot of the whole group database.
#[derive(Debug, Clone, Default)]
pub struct GroupFile {
    entries: Vec<Entry>,
}

impl GroupFile {
    pub fn parse(text: &str) -> std::result::Result<Self, ParseError> {
        let mut entries = Vec::new();
        let mut names = HashSet::new();
        let mut gids = HashSet::new();

        if text.is_empty() {
            return Ok(Self { entries });
        }

        let body = text.strip_suffix('\n').unwrap_or(text);
        for (idx, line) in body.split('\n').enumerate() {
            let line_no = idx + 1;
            let corrupt = |reason: String| ParseError {
                line: line_no,
                reason,
            };

            if line.is_empty() {
                return Err(corrupt("empty line".to_string()));
            }

            let record = Record::parse_line(line).map_err(corrupt)?;
            if !names.insert(record.name.clone()) {
                return Err(corrupt(format!("duplicate group name {}", record.name)));
            }
            if !gids.insert(record.gid) {
                return Err(corrupt(format!("duplicate gid {}", record.gid)));
            }

            entries.push(Entry {
                record,
                raw: Some(line.to_string()),
            });
        }

        Ok(Self { entries })
    }

    /// Render the full file contents. Every line, including the last, ends
    /// with a newline.
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            out.push_str(&entry.render());
            out.push('\n');
        }
        out
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.entries.iter().map(|e| &e.record)
    }

    /// Exact-match lookup on the group name.
    pub fn find(&self, name: &str) -> Option<&Record> {
        self.records().find(|r| r.name == name)
    }

    pub fn gids(&self) -> impl Iterator<Item = Gid> + '_ {
        self.records().map(|r| r.gid)
    }

    /// Append a new record at the end of the file.
    pub(crate) fn append(&mut self, record: Record) -> Result<()> {
        if self.find(&record.name).is_some() {
            return Err(GroupStoreError::DuplicateGroup(record.name));
        }
        debug_assert!(
            self.gids().all(|gid| gid != record.gid),
            "gid {} already allocated",
            record.gid
        );
        self.entries.push(Entry { record, raw: None });
        Ok(())
    }

    /// Add `user` to the member list of `group`.
    ///
    /// Returns `Ok(false)` when the user is already a member, leaving the
    /// record untouched.
    pub(crate) fn add_member(&mut self, group: &str, user: &str) -> Result<bool> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.record.name == group)
            .ok_or_else(|| GroupStoreError::GroupNotFound(group.to_string()))?;

        if entry.record.has_member(user) {
            return Ok(false);
        }

        entry.record.members.push(user.to_string());
        entry.raw = None;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line_with_members() {
        let record = Record::parse_line("build:x:1000:alice,bob").unwrap();
        assert_eq!(record.name, "build");
        assert_eq!(record.placeholder, "x");
        assert_eq!(record.gid, 1000);
        assert_eq!(record.members, vec!["alice", "bob"]);
    }

    #[test]
    fn test_parse_line_empty_members() {
        let four = Record::parse_line("build:x:1000:").unwrap();
        let three = Record::parse_line("build:x:1000").unwrap();
        assert!(four.members.is_empty());
        assert_eq!(four, three);
    }

    #[test]
    fn test_parse_line_keeps_placeholder_verbatim() {
        let record = Record::parse_line("wheel:!*:10:").unwrap();
        assert_eq!(record.placeholder, "!*");
        let record = Record::parse_line("wheel::10:").unwrap();
        assert_eq!(record.placeholder, "");
    }

    #[test]
    fn test_parse_line_rejects_bad_field_count() {
        assert!(Record::parse_line("build:x").is_err());
        assert!(Record::parse_line("build:x:1000:alice:extra").is_err());
    }

    #[test]
    fn test_parse_line_rejects_bad_gid() {
        assert!(Record::parse_line("build:x::").is_err());
        assert!(Record::parse_line("build:x:-1:").is_err());
        assert!(Record::parse_line("build:x:+7:").is_err());
        assert!(Record::parse_line("build:x:abc:").is_err());
        assert!(Record::parse_line("build:x:99999999999:").is_err());
    }

    #[test]
    fn test_parse_line_rejects_bad_members() {
        assert!(Record::parse_line("build:x:1000:alice,,bob").is_err());
        assert!(Record::parse_line("build:x:1000:alice,").is_err());
        assert!(Record::parse_line("build:x:1000:alice,alice").is_err());
    }

    #[test]
    fn test_to_line() {
        let mut record = Record::new("build", "x", 1000);
        assert_eq!(record.to_line(), "build:x:1000:");
        record.members.push("alice".into());
        record.members.push("bob".into());
        assert_eq!(record.to_string(), "build:x:1000:alice,bob");
    }

    #[test]
    fn test_parse_empty_file() {
        let file = GroupFile::parse("").unwrap();
        assert!(file.is_empty());
        assert_eq!(file.serialize(), "");
    }

    #[test]
    fn test_round_trip_is_byte_identical() {
        let text = "root:x:0:\nwheel:x:10:alice,bob\nlegacy:*:20\nnogroup:x:65534:\n";
        let file = GroupFile::parse(text).unwrap();
        assert_eq!(file.len(), 4);
        assert_eq!(file.serialize(), text);
    }

    #[test]
    fn test_missing_final_newline_is_accepted() {
        let file = GroupFile::parse("root:x:0:\nwheel:x:10:").unwrap();
        assert_eq!(file.serialize(), "root:x:0:\nwheel:x:10:\n");
    }

    #[test]
    fn test_parse_reports_line_number() {
        let err = GroupFile::parse("root:x:0:\nbroken\nwheel:x:10:\n").unwrap_err();
        assert_eq!(err.line, 2);
    }

    #[test]
    fn test_parse_rejects_blank_lines() {
        let err = GroupFile::parse("root:x:0:\n\nwheel:x:10:\n").unwrap_err();
        assert_eq!(err.line, 2);
        assert!(err.reason.contains("empty"));
    }

    #[test]
    fn test_parse_rejects_duplicates() {
        let err = GroupFile::parse("a:x:1:\na:x:2:\n").unwrap_err();
        assert_eq!(err.line, 2);
        assert!(err.reason.contains("name"));

        let err = GroupFile::parse("a:x:1:\nb:x:1:\n").unwrap_err();
        assert_eq!(err.line, 2);
        assert!(err.reason.contains("gid"));
    }

    #[test]
    fn test_find_is_exact() {
        let file = GroupFile::parse("admins:x:1000:\n").unwrap();
        assert!(file.find("admin").is_none());
        assert!(file.find("admins").is_some());
    }

    #[test]
    fn test_add_member_touches_only_target_line() {
        let text = "legacy:*:20\nbuild:x:1000:\nother:x:1001:carol\n";
        let mut file = GroupFile::parse(text).unwrap();
        assert!(file.add_member("build", "alice").unwrap());
        assert_eq!(
            file.serialize(),
            "legacy:*:20\nbuild:x:1000:alice\nother:x:1001:carol\n"
        );
    }

    #[test]
    fn test_add_member_to_three_field_line_gains_member_field() {
        let mut file = GroupFile::parse("legacy:*:20\n").unwrap();
        file.add_member("legacy", "alice").unwrap();
        assert_eq!(file.serialize(), "legacy:*:20:alice\n");
    }

    #[test]
    fn test_add_member_existing_is_noop() {
        let text = "build:x:1000:alice\n";
        let mut file = GroupFile::parse(text).unwrap();
        assert!(!file.add_member("build", "alice").unwrap());
        assert_eq!(file.serialize(), text);
    }

    #[test]
    fn test_add_member_unknown_group() {
        let mut file = GroupFile::parse("admins:x:1000:\n").unwrap();
        let err = file.add_member("admin", "alice").unwrap_err();
        assert!(matches!(err, GroupStoreError::GroupNotFound(name) if name == "admin"));
    }

    #[test]
    fn test_append_rejects_duplicate_name() {
        let mut file = GroupFile::parse("build:x:1000:\n").unwrap();
        let err = file.append(Record::new("build", "x", 1001)).unwrap_err();
        assert!(matches!(err, GroupStoreError::DuplicateGroup(_)));
        assert_eq!(file.len(), 1);
    }

    #[test]
    fn test_append_renders_four_fields() {
        let mut file = GroupFile::default();
        file.append(Record::new("build", "x", 1000)).unwrap();
        assert_eq!(file.serialize(), "build:x:1000:\n");
    }
}
