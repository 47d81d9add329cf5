//! Snapshot input files for the CLI
//!
//! A snapshot file is either a JSON array of [`EntryRecord`] objects or a
//! plain list of relative paths, one per line, where a trailing `/` marks a
//! directory. Blank lines and lines starting with `#` are skipped.

use crate::entry::Entry;
use crate::path;
use anyhow::Context;
use serde::Deserialize;
use std::path::Path;
use std::time::{Duration, UNIX_EPOCH};

/// One entry in a JSON snapshot file
#[derive(Debug, Clone, Deserialize)]
pub struct EntryRecord {
    pub path: String,
    #[serde(default)]
    pub size: u64,
    /// Milliseconds since the Unix epoch
    #[serde(default)]
    pub mtime: u64,
    #[serde(default)]
    pub mode: Option<u32>,
    #[serde(default)]
    pub checksum: Option<String>,
}

impl From<EntryRecord> for Entry {
    fn from(record: EntryRecord) -> Self {
        let relative_path = path::normalize_relative_path(&record.path);
        let mtime = UNIX_EPOCH + Duration::from_millis(record.mtime);
        match record.mode {
            Some(mode) => {
                Entry::with_mode(relative_path, mode, record.size, mtime, record.checksum)
            }
            None => Entry::new(relative_path, record.size, mtime, record.checksum),
        }
    }
}

/// Load the entries of a snapshot file
pub fn load_entries(file: &Path) -> anyhow::Result<Vec<Entry>> {
    let contents = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read snapshot {}", file.display()))?;
    parse_entries(&contents).with_context(|| format!("Invalid snapshot {}", file.display()))
}

fn parse_entries(contents: &str) -> anyhow::Result<Vec<Entry>> {
    if contents.trim_start().starts_with('[') {
        let records: Vec<EntryRecord> = serde_json::from_str(contents)?;
        return Ok(records.into_iter().map(Entry::from).collect());
    }

    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| Entry::from_path(path::normalize_relative_path(line)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_path_list() {
        let entries = parse_entries("# snapshot\na/\n\na/b.js\n").unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].is_directory());
        assert_eq!(entries[1].relative_path(), "a/b.js");
    }

    #[test]
    fn test_parse_json_records() {
        let entries = parse_entries(
            r#"[{"path": "a/"}, {"path": "a/b.js", "size": 10, "mtime": 2000, "checksum": "ff"}]"#,
        )
        .unwrap();
        assert!(entries[0].is_directory());
        assert_eq!(entries[1].size(), 10);
        assert_eq!(entries[1].mtime_ms(), 2000);
        assert_eq!(entries[1].checksum(), Some("ff"));
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(parse_entries("[{\"size\": 1}]").is_err());
    }
}
