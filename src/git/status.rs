//! Parsing of `git status --porcelain -z`.
//!
//! Each record is `XY <path>\0`, where `X` is the index status and `Y` the
//! work tree status. Renamed and copied records are followed by a second
//! NUL-terminated field holding the path they came from.

use crate::error::{GitError, Result};
use serde::{Deserialize, Serialize};

/// Status of a path in the index or the work tree.
///
/// See `git help status`, section "Short Format".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileStatus {
    /// `' '`
    Unmodified,
    /// `M`
    Modified,
    /// `T`
    TypeChanged,
    /// `A`
    Added,
    /// `D`
    Deleted,
    /// `R`
    Renamed,
    /// `C`
    Copied,
    /// `U`
    UpdatedUnmerged,
    /// `?`
    Untracked,
    /// `!`
    Ignored,
    /// Any code this crate does not recognise
    Unsupported,
}

impl FileStatus {
    /// Map a porcelain status byte to its variant
    pub fn from_code(code: u8) -> Self {
        match code {
            b' ' => FileStatus::Unmodified,
            b'M' => FileStatus::Modified,
            b'T' => FileStatus::TypeChanged,
            b'A' => FileStatus::Added,
            b'D' => FileStatus::Deleted,
            b'R' => FileStatus::Renamed,
            b'C' => FileStatus::Copied,
            b'U' => FileStatus::UpdatedUnmerged,
            b'?' => FileStatus::Untracked,
            b'!' => FileStatus::Ignored,
            _ => FileStatus::Unsupported,
        }
    }

    fn has_source(self) -> bool {
        matches!(self, FileStatus::Renamed | FileStatus::Copied)
    }
}

/// One path reported by `git status`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEntry {
    /// Path in the work tree, relative to the repository root
    pub path: String,
    /// Status in the index (or "ours" side of a merge conflict)
    pub index: FileStatus,
    /// Status in the work tree (or "theirs" side of a merge conflict)
    pub worktree: FileStatus,
    /// Path the entry was renamed or copied from
    pub original_path: Option<String>,
}

/// Argument vector (after `git`) producing the format [`parse_porcelain`] expects
pub(crate) const STATUS_ARGS: [&str; 5] = [
    "status",
    "--porcelain",
    "-z",
    "--untracked-files=all",
    "--ignored",
];

/// Parse NUL-separated porcelain v1 output.
pub(crate) fn parse_porcelain(mut output: &[u8]) -> Result<Vec<StatusEntry>> {
    let mut entries = Vec::new();

    while !output.is_empty() {
        let (record, rest) = split_field(output)?;
        output = rest;

        if record.len() < 4 || record[2] != b' ' {
            return Err(parse_error(format!(
                "malformed record '{}'",
                String::from_utf8_lossy(record)
            )));
        }

        let index = FileStatus::from_code(record[0]);
        let worktree = FileStatus::from_code(record[1]);
        let path = String::from_utf8_lossy(&record[3..]).into_owned();

        let original_path = if index.has_source() || worktree.has_source() {
            let (source, rest) = split_field(output)?;
            output = rest;
            Some(String::from_utf8_lossy(source).into_owned())
        } else {
            None
        };

        entries.push(StatusEntry {
            path,
            index,
            worktree,
            original_path,
        });
    }

    Ok(entries)
}

fn split_field(bytes: &[u8]) -> Result<(&[u8], &[u8])> {
    let end = bytes
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| parse_error("record is not NUL-terminated".to_string()))?;
    Ok((&bytes[..end], &bytes[end + 1..]))
}

fn parse_error(reason: String) -> GitError {
    GitError::Parse {
        what: "git status output",
        reason,
    }
}
