//! Contributor listings: everyone, newcomers since a date, and changelogs.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;

use crate::config::AuthorFilter;
use crate::models::ChangelogLine;
use crate::stats::sort::compare_names;

/// A cutoff date that is not `YYYY-MM-DD`.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid date format. Please use YYYY-MM-DD.")]
pub struct InvalidDate(pub String);

/// Parse a `YYYY-MM-DD` cutoff into the epoch second of its UTC midnight.
pub fn parse_cutoff(value: &str) -> Result<i64, InvalidDate> {
    let date = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| InvalidDate(value.to_string()))?;
    Ok(date.and_time(NaiveTime::MIN).and_utc().timestamp())
}

/// An email whose first commit falls on or after the cutoff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContributor {
    pub email: String,
    pub first_commit: i64,
    /// Display name, once resolved
    pub name: Option<String>,
}

/// Find emails whose earliest commit is at or after `cutoff`.
///
/// Identity is the email here, unlike contribution totals. Results are
/// ordered by email.
pub fn detect_new_contributors(
    email_times: &[(String, i64)],
    cutoff: i64,
    ignore: &AuthorFilter,
) -> Vec<NewContributor> {
    let mut earliest: BTreeMap<&str, i64> = BTreeMap::new();
    for (email, timestamp) in email_times {
        if ignore.is_ignored(email) {
            continue;
        }
        earliest
            .entry(email.as_str())
            .and_modify(|t| *t = (*t).min(*timestamp))
            .or_insert(*timestamp);
    }

    earliest
        .into_iter()
        .filter(|(_, first)| *first >= cutoff)
        .map(|(email, first_commit)| NewContributor {
            email: email.to_string(),
            first_commit,
            name: None,
        })
        .collect()
}

/// Distinct names, case-insensitively sorted, at most `limit`.
pub fn distinct_contributors<'a>(
    names: impl IntoIterator<Item = &'a str>,
    ignore: &AuthorFilter,
    limit: usize,
) -> Vec<String> {
    let unique: BTreeSet<&str> = names
        .into_iter()
        .filter(|name| !ignore.is_ignored(name))
        .collect();
    let mut sorted: Vec<&str> = unique.into_iter().collect();
    sorted.sort_by(|a, b| compare_names(a, b));
    sorted.into_iter().take(limit).map(str::to_string).collect()
}

/// Changelog entries for one day, in log order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogDay {
    pub date: NaiveDate,
    pub entries: Vec<ChangelogLine>,
}

/// Group changelog lines by date, most recent `limit` dates first.
pub fn group_changelog(
    lines: Vec<ChangelogLine>,
    ignore: &AuthorFilter,
    limit: usize,
) -> Vec<ChangelogDay> {
    let mut by_date: HashMap<NaiveDate, Vec<ChangelogLine>> = HashMap::new();
    for line in lines {
        if ignore.is_ignored(&line.author) {
            continue;
        }
        by_date.entry(line.date).or_default().push(line);
    }

    let mut days: Vec<ChangelogDay> = by_date
        .into_iter()
        .map(|(date, entries)| ChangelogDay { date, entries })
        .collect();
    days.sort_by(|a, b| b.date.cmp(&a.date));
    days.truncate(limit);
    days
}
