//! Commit counts grouped by calendar fields.
//!
//! Keys are read from the timestamp as recorded, in the author's own offset,
//! so a commit made at 23:30 local time lands on that local day and hour.

use std::collections::BTreeMap;

use chrono::{Datelike, Days, NaiveDate, Timelike};

use crate::config::AuthorFilter;
use crate::models::DatedCommit;

pub const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

pub const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Counts over an ordered key domain.
///
/// Every key of the domain is present, with zero when unobserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketedCount<K> {
    entries: Vec<(K, usize)>,
}

impl<K: PartialEq> BucketedCount<K> {
    pub fn with_domain(keys: impl IntoIterator<Item = K>) -> Self {
        Self {
            entries: keys.into_iter().map(|k| (k, 0)).collect(),
        }
    }

    /// Add one to `key`. Keys outside the domain are not counted.
    pub fn increment(&mut self, key: &K) -> bool {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, count)) => {
                *count += 1;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, key: &K) -> Option<usize> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, count)| *count)
    }
}

impl<K> BucketedCount<K> {
    pub fn entries(&self) -> &[(K, usize)] {
        &self.entries
    }

    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    pub fn max(&self) -> usize {
        self.entries.iter().map(|(_, count)| *count).max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

fn counted<'a>(
    commits: &'a [DatedCommit],
    ignore: &'a AuthorFilter,
) -> impl Iterator<Item = &'a DatedCommit> + 'a {
    commits.iter().filter(move |c| !ignore.is_ignored(&c.author))
}

/// Commits per calendar day, spanning the first to the last observed day.
pub fn count_by_date(commits: &[DatedCommit], ignore: &AuthorFilter) -> BucketedCount<NaiveDate> {
    let mut observed: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for commit in counted(commits, ignore) {
        *observed.entry(commit.time.date_naive()).or_default() += 1;
    }

    let (Some(first), Some(last)) = (
        observed.keys().next().copied(),
        observed.keys().next_back().copied(),
    ) else {
        return BucketedCount::with_domain(Vec::new());
    };

    let days = day_range(first, last)
        .into_iter()
        .map(|day| (day, observed.get(&day).copied().unwrap_or(0)))
        .collect();
    BucketedCount { entries: days }
}

/// Commits per month of the year, January through December.
pub fn count_by_month(
    commits: &[DatedCommit],
    ignore: &AuthorFilter,
) -> BucketedCount<&'static str> {
    let mut buckets = BucketedCount::with_domain(MONTHS);
    for commit in counted(commits, ignore) {
        buckets.increment(&MONTHS[commit.time.month0() as usize]);
    }
    buckets
}

/// Commits per year, spanning the first to the last observed year.
pub fn count_by_year(commits: &[DatedCommit], ignore: &AuthorFilter) -> BucketedCount<i32> {
    let years: Vec<i32> = counted(commits, ignore).map(|c| c.time.year()).collect();
    let (Some(&first), Some(&last)) = (years.iter().min(), years.iter().max()) else {
        return BucketedCount::with_domain(Vec::new());
    };

    let mut buckets = BucketedCount::with_domain(first..=last);
    for year in &years {
        buckets.increment(year);
    }
    buckets
}

/// Commits per weekday, Monday through Sunday.
pub fn count_by_weekday(
    commits: &[DatedCommit],
    ignore: &AuthorFilter,
) -> BucketedCount<&'static str> {
    let mut buckets = BucketedCount::with_domain(WEEKDAYS);
    for commit in counted(commits, ignore) {
        let index = commit.time.weekday().num_days_from_monday() as usize;
        buckets.increment(&WEEKDAYS[index]);
    }
    buckets
}

/// Commits per hour of the day, 0 through 23.
pub fn count_by_hour(commits: &[DatedCommit], ignore: &AuthorFilter) -> BucketedCount<u32> {
    let mut buckets = BucketedCount::with_domain(0..24);
    for commit in counted(commits, ignore) {
        buckets.increment(&commit.time.hour());
    }
    buckets
}

/// Commits per recorded UTC offset (`+0100`).
///
/// Only observed offsets appear, busiest first, ties by offset.
pub fn count_by_timezone(commits: &[DatedCommit], ignore: &AuthorFilter) -> BucketedCount<String> {
    let mut observed: BTreeMap<String, usize> = BTreeMap::new();
    for commit in counted(commits, ignore) {
        *observed
            .entry(commit.time.format("%z").to_string())
            .or_default() += 1;
    }

    let mut entries: Vec<(String, usize)> = observed.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    BucketedCount { entries }
}

/// Every day from `start` to `end` inclusive.
pub fn day_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut days = Vec::new();
    let mut day = start;
    while day <= end {
        days.push(day);
        match day.checked_add_days(Days::new(1)) {
            Some(next) => day = next,
            None => break,
        }
    }
    days
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_iso_timestamp;

    fn commit(author: &str, iso: &str) -> DatedCommit {
        DatedCommit {
            author: author.to_string(),
            time: parse_iso_timestamp(iso).unwrap(),
        }
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_year_range_fills_gaps() {
        let commits = vec![
            commit("a", "2020-05-01T10:00:00+00:00"),
            commit("a", "2022-01-01T10:00:00+00:00"),
            commit("a", "2022-03-01T10:00:00+00:00"),
        ];
        let years = count_by_year(&commits, &AuthorFilter::none());
        assert_eq!(years.entries(), &[(2020, 1), (2021, 0), (2022, 2)]);
    }

    #[test]
    fn test_date_range_fills_gaps() {
        let commits = vec![
            commit("a", "2024-02-28T10:00:00+00:00"),
            commit("a", "2024-03-01T10:00:00+00:00"),
        ];
        let dates = count_by_date(&commits, &AuthorFilter::none());
        assert_eq!(
            dates.entries(),
            &[
                (date("2024-02-28"), 1),
                (date("2024-02-29"), 0),
                (date("2024-03-01"), 1)
            ]
        );
    }

    #[test]
    fn test_empty_input_gives_empty_ranges() {
        assert!(count_by_date(&[], &AuthorFilter::none()).entries().is_empty());
        assert!(count_by_year(&[], &AuthorFilter::none()).entries().is_empty());
        let months = count_by_month(&[], &AuthorFilter::none());
        assert_eq!(months.entries().len(), 12);
        assert!(months.is_empty());
    }

    #[test]
    fn test_fixed_domains_are_total() {
        let commits = vec![commit("a", "2024-01-06T23:30:00-05:00")];
        let hours = count_by_hour(&commits, &AuthorFilter::none());
        assert_eq!(hours.entries().len(), 24);
        assert_eq!(hours.get(&23), Some(1));
        assert_eq!(hours.total(), 1);

        let weekdays = count_by_weekday(&commits, &AuthorFilter::none());
        assert_eq!(weekdays.entries().len(), 7);
        assert_eq!(weekdays.get(&"Sat"), Some(1));
    }

    #[test]
    fn test_uses_recorded_offset_not_utc() {
        // 04:30 UTC on the 7th, but recorded as the evening of the 6th
        let commits = vec![commit("a", "2024-01-06T23:30:00-05:00")];
        let dates = count_by_date(&commits, &AuthorFilter::none());
        assert_eq!(dates.entries(), &[(date("2024-01-06"), 1)]);
        let months = count_by_month(&commits, &AuthorFilter::none());
        assert_eq!(months.get(&"Jan"), Some(1));
    }

    #[test]
    fn test_timezones_sorted_by_count() {
        let commits = vec![
            commit("a", "2024-01-01T10:00:00+01:00"),
            commit("a", "2024-01-01T10:00:00-05:00"),
            commit("a", "2024-01-02T10:00:00-05:00"),
            commit("a", "2024-01-03T10:00:00+00:00"),
        ];
        let zones = count_by_timezone(&commits, &AuthorFilter::none());
        let keys: Vec<_> = zones.entries().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["-0500", "+0000", "+0100"]);
        assert_eq!(zones.max(), 2);
    }

    #[test]
    fn test_ignored_authors_not_counted() {
        let commits = vec![
            commit("Alice", "2024-01-01T10:00:00+00:00"),
            commit("bot", "2024-01-01T11:00:00+00:00"),
        ];
        let ignore = AuthorFilter::from_fn(|name| name == "bot");
        assert_eq!(count_by_hour(&commits, &ignore).total(), 1);
        assert_eq!(count_by_timezone(&commits, &ignore).total(), 1);
    }

    #[test]
    fn test_increment_outside_domain() {
        let mut buckets = BucketedCount::with_domain(0..3u32);
        assert!(buckets.increment(&1));
        assert!(!buckets.increment(&7));
        assert_eq!(buckets.total(), 1);
    }

    #[test]
    fn test_day_range() {
        let days = day_range(date("2024-12-30"), date("2025-01-01"));
        assert_eq!(days.len(), 3);
        assert!(day_range(date("2025-01-02"), date("2025-01-01")).is_empty());
    }
}
