use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

/// Metadata for one commit, read from a single log line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub hash: String,
    pub author_name: String,
    pub author_email: String,
    /// Seconds since the epoch
    pub timestamp: i64,
}

/// One numstat line: line counts for a single file within a commit.
///
/// Binary files report unknown counts, which are recorded as 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRecord {
    pub added: u64,
    pub removed: u64,
    pub path: String,
}

/// A commit together with the numstat lines that followed it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommit {
    pub commit: CommitRecord,
    pub changes: Vec<ChangeRecord>,
}

impl ParsedCommit {
    pub fn new(commit: CommitRecord) -> Self {
        Self {
            commit,
            changes: Vec::new(),
        }
    }
}

/// An author paired with a commit time in the author's recorded offset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatedCommit {
    pub author: String,
    pub time: DateTime<FixedOffset>,
}

/// A commit as exported to JSON.
///
/// Field names are part of the output format and must not change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub hash: String,
    pub author: String,
    pub date: String,
    pub message: String,
}

/// A commit subject as listed in a changelog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogLine {
    pub date: NaiveDate,
    pub subject: String,
    pub author: String,
}
