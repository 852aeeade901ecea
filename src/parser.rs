//! Parsing of line-oriented backend output.
//!
//! Every parser here is tolerant: blank lines and lines of the wrong shape
//! are skipped, never reported.

use chrono::{DateTime, FixedOffset, NaiveDate};

use crate::models::{
    ChangeRecord, ChangelogLine, CommitRecord, DatedCommit, LogEntry, ParsedCommit,
};

/// Separator placed between fields of single-line formats (`%x1f`).
pub const FIELD_SEP: char = '\x1f';

/// Token the backend prints in place of line counts for binary files.
const BINARY_SENTINEL: &str = "-";

/// A classified line of `--numstat` output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogLine {
    /// `hash \t name \t email \t raw-date`
    Commit(CommitRecord),
    /// `added \t removed \t path`
    Change(ChangeRecord),
}

/// Classify one line by its tab-separated field count.
pub fn classify_line(line: &str) -> Option<LogLine> {
    if line.trim().is_empty() || !line.contains('\t') {
        return None;
    }

    let fields: Vec<&str> = line.split('\t').collect();
    match fields.as_slice() {
        [hash, name, email, raw_date] => {
            let timestamp = raw_date.split_whitespace().next()?.parse().ok()?;
            Some(LogLine::Commit(CommitRecord {
                hash: hash.to_string(),
                author_name: name.to_string(),
                author_email: email.to_string(),
                timestamp,
            }))
        }
        [added, removed, path] => Some(LogLine::Change(ChangeRecord {
            added: parse_count(added)?,
            removed: parse_count(removed)?,
            path: path.to_string(),
        })),
        _ => None,
    }
}

fn parse_count(field: &str) -> Option<u64> {
    if field == BINARY_SENTINEL {
        Some(0)
    } else {
        field.parse().ok()
    }
}

/// Fold state for `--numstat` streams.
///
/// Change lines attach to the most recent commit line; those seen before any
/// commit line are dropped.
#[derive(Debug, Default)]
pub struct NumstatState {
    commits: Vec<ParsedCommit>,
}

impl NumstatState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one line of output.
    pub fn step(mut self, line: &str) -> Self {
        match classify_line(line) {
            Some(LogLine::Commit(commit)) => self.commits.push(ParsedCommit::new(commit)),
            Some(LogLine::Change(change)) => {
                if let Some(current) = self.commits.last_mut() {
                    current.changes.push(change);
                }
            }
            None => {}
        }
        self
    }

    /// Author of the commit that change lines currently attach to.
    pub fn current_author(&self) -> Option<&str> {
        self.commits
            .last()
            .map(|c| c.commit.author_name.as_str())
    }

    pub fn finish(self) -> Vec<ParsedCommit> {
        self.commits
    }
}

/// Parse `--pretty=format:%H%x09%aN%x09%aE%x09%ad --numstat --date=raw` output.
pub fn parse_numstat_log(text: &str) -> Vec<ParsedCommit> {
    text.lines()
        .fold(NumstatState::new(), NumstatState::step)
        .finish()
}

/// Trimmed, non-empty lines.
pub fn non_empty_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().map(str::trim).filter(|line| !line.is_empty())
}

/// Split a `%x1f`-separated line into exactly `n` fields.
///
/// The last field keeps any further separators.
pub fn split_fields(line: &str, n: usize) -> Option<Vec<&str>> {
    let fields: Vec<&str> = line.splitn(n, FIELD_SEP).collect();
    if fields.len() == n {
        Some(fields)
    } else {
        None
    }
}

/// Parse one `--date=iso-strict` timestamp, keeping the recorded offset.
pub fn parse_iso_timestamp(line: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(line.trim()).ok()
}

/// Parse `%aN%x1f%ad` lines produced with `--date=iso-strict`.
pub fn parse_dated_commits(text: &str) -> Vec<DatedCommit> {
    non_empty_lines(text)
        .filter_map(|line| {
            let fields = split_fields(line, 2)?;
            Some(DatedCommit {
                author: fields[0].to_string(),
                time: parse_iso_timestamp(fields[1])?,
            })
        })
        .collect()
}

/// Parse `%H%x1f%aN%x1f%ad%x1f%s` lines.
pub fn parse_log_entries(text: &str) -> Vec<LogEntry> {
    non_empty_lines(text)
        .filter_map(|line| {
            let fields = split_fields(line, 4)?;
            Some(LogEntry {
                hash: fields[0].to_string(),
                author: fields[1].to_string(),
                date: fields[2].to_string(),
                message: fields[3].to_string(),
            })
        })
        .collect()
}

/// Parse `%aE%x1f%at` lines into (email, epoch seconds).
pub fn parse_email_times(text: &str) -> Vec<(String, i64)> {
    non_empty_lines(text)
        .filter_map(|line| {
            let fields = split_fields(line, 2)?;
            let timestamp = fields[1].trim().parse().ok()?;
            Some((fields[0].to_string(), timestamp))
        })
        .collect()
}

/// Parse `%ad%x1f%s%x1f%aN` lines produced with `--date=short`.
pub fn parse_changelog_lines(text: &str) -> Vec<ChangelogLine> {
    non_empty_lines(text)
        .filter_map(|line| {
            let fields = split_fields(line, 3)?;
            let date = NaiveDate::parse_from_str(fields[0], "%Y-%m-%d").ok()?;
            Some(ChangelogLine {
                date,
                subject: fields[1].to_string(),
                author: fields[2].to_string(),
            })
        })
        .collect()
}
