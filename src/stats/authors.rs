//! Per-author contribution totals.

use std::collections::{BTreeSet, HashMap};

use crate::config::AuthorFilter;
use crate::models::{ChangeRecord, ParsedCommit};
use crate::stats::sort::SortSpec;
use crate::utils::percent;

/// Contribution totals for one display name.
///
/// Authors are keyed by name; different emails under one name are merged and
/// the first email seen is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorStats {
    pub name: String,
    pub email: String,
    pub insertions: u64,
    pub deletions: u64,
    pub files: BTreeSet<String>,
    pub commits: u64,
    pub lines_changed: u64,
    pub first_commit: i64,
    pub last_commit: i64,
}

impl AuthorStats {
    pub fn new(name: impl Into<String>, email: impl Into<String>, timestamp: i64) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            insertions: 0,
            deletions: 0,
            files: BTreeSet::new(),
            commits: 0,
            lines_changed: 0,
            first_commit: timestamp,
            last_commit: timestamp,
        }
    }

    fn record_commit(&mut self, timestamp: i64) {
        self.commits += 1;
        self.first_commit = self.first_commit.min(timestamp);
        self.last_commit = self.last_commit.max(timestamp);
    }

    fn record_change(&mut self, change: &ChangeRecord) {
        self.insertions += change.added;
        self.deletions += change.removed;
        self.lines_changed += change.added + change.removed;
        self.files.insert(change.path.clone());
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

/// Percentages of the repository totals held by one author.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AuthorShares {
    pub insertions: f64,
    pub deletions: f64,
    pub files: f64,
    pub commits: f64,
    pub lines_changed: f64,
}

/// Every counted author plus repository-wide totals.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContributionSummary {
    /// Authors ordered by the configured sort
    pub authors: Vec<AuthorStats>,
    pub total_insertions: u64,
    pub total_deletions: u64,
    /// Distinct paths touched by any counted author
    pub total_files: usize,
    pub total_commits: u64,
}

impl ContributionSummary {
    pub fn total_lines_changed(&self) -> u64 {
        self.total_insertions + self.total_deletions
    }

    pub fn is_empty(&self) -> bool {
        self.authors.is_empty()
    }

    pub fn shares(&self, author: &AuthorStats) -> AuthorShares {
        AuthorShares {
            insertions: percent(author.insertions, self.total_insertions),
            deletions: percent(author.deletions, self.total_deletions),
            files: percent(author.file_count() as u64, self.total_files as u64),
            commits: percent(author.commits, self.total_commits),
            lines_changed: percent(author.lines_changed, self.total_lines_changed()),
        }
    }
}

/// Reduce parsed commits to per-author totals.
///
/// Ignored authors are dropped before accumulation, so they count toward no
/// total.
pub fn aggregate_contributions(
    commits: &[ParsedCommit],
    ignore: &AuthorFilter,
    sort: &SortSpec,
) -> ContributionSummary {
    let mut by_author: HashMap<&str, AuthorStats> = HashMap::new();
    let mut all_files: BTreeSet<&str> = BTreeSet::new();
    let mut summary = ContributionSummary::default();

    for parsed in commits {
        let commit = &parsed.commit;
        if ignore.is_ignored(&commit.author_name) || ignore.is_ignored(&commit.author_email) {
            continue;
        }

        let stats = by_author
            .entry(commit.author_name.as_str())
            .or_insert_with(|| {
                AuthorStats::new(&commit.author_name, &commit.author_email, commit.timestamp)
            });
        stats.record_commit(commit.timestamp);
        summary.total_commits += 1;

        for change in &parsed.changes {
            stats.record_change(change);
            summary.total_insertions += change.added;
            summary.total_deletions += change.removed;
            all_files.insert(change.path.as_str());
        }
    }

    summary.total_files = all_files.len();
    summary.authors = by_author.into_values().collect();
    sort.sort(&mut summary.authors);
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_numstat_log;
    use crate::stats::sort::{SortDirection, SortKey};

    fn summarize(text: &str, ignore: &AuthorFilter) -> ContributionSummary {
        aggregate_contributions(&parse_numstat_log(text), ignore, &SortSpec::default())
    }

    #[test]
    fn test_single_commit_scenario() {
        let summary = summarize("h1\tAlice\ta@x.com\t1000\n10\t2\tf.py\n", &AuthorFilter::none());
        assert_eq!(summary.authors.len(), 1);
        let alice = &summary.authors[0];
        assert_eq!(alice.name, "Alice");
        assert_eq!(alice.email, "a@x.com");
        assert_eq!(alice.insertions, 10);
        assert_eq!(alice.deletions, 2);
        assert_eq!(alice.file_count(), 1);
        assert_eq!(alice.commits, 1);
        assert_eq!(alice.lines_changed, 12);
        assert_eq!(alice.first_commit, 1000);
        assert_eq!(alice.last_commit, 1000);
    }

    #[test]
    fn test_sums_over_numstat_lines() {
        let text = "h1\tAlice\ta@x\t5\n1\t1\ta.rs\n2\t0\tb.rs\n4\t3\ta.rs\n-\t-\tlogo.png\n";
        let summary = summarize(text, &AuthorFilter::none());
        let alice = &summary.authors[0];
        assert_eq!(alice.insertions, 7);
        assert_eq!(alice.deletions, 4);
        assert_eq!(alice.file_count(), 3);
        assert_eq!(alice.commits, 1);
    }

    #[test]
    fn test_same_name_different_email_is_merged() {
        let text = "h1\tAlice\twork@x\t300\n1\t0\ta\nh2\tAlice\thome@y\t100\n1\t0\tb\n";
        let summary = summarize(text, &AuthorFilter::none());
        assert_eq!(summary.authors.len(), 1);
        let alice = &summary.authors[0];
        assert_eq!(alice.email, "work@x");
        assert_eq!(alice.commits, 2);
        assert_eq!(alice.first_commit, 100);
        assert_eq!(alice.last_commit, 300);
    }

    #[test]
    fn test_ignored_author_contributes_nothing() {
        let text = "h1\tAlice\ta@x\t1\n10\t0\ta\nh2\tBob\tb@x\t2\n90\t5\tb\n";
        let ignore = AuthorFilter::from_fn(|name| name == "Bob");
        let summary = summarize(text, &ignore);
        assert_eq!(summary.authors.len(), 1);
        assert_eq!(summary.authors[0].name, "Alice");
        assert_eq!(summary.total_commits, 1);
        assert_eq!(summary.total_insertions, 10);
        assert_eq!(summary.total_deletions, 0);
        assert_eq!(summary.total_files, 1);
        assert_eq!(summary.shares(&summary.authors[0]).insertions, 100.0);
    }

    #[test]
    fn test_shares_sum_to_one_hundred() {
        let text = "h1\tA\ta@x\t1\n1\t2\ta\nh2\tB\tb@x\t2\n2\t0\tb\nh3\tC\tc@x\t3\n4\t1\tc\n";
        let summary = summarize(text, &AuthorFilter::none());
        let total: f64 = summary
            .authors
            .iter()
            .map(|a| summary.shares(a).commits)
            .sum();
        assert!((total - 100.0).abs() < 1e-9);
        let lines: f64 = summary
            .authors
            .iter()
            .map(|a| summary.shares(a).lines_changed)
            .sum();
        assert!((lines - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_totals_give_zero_shares() {
        let summary = summarize("h1\tAlice\ta@x\t1\n", &AuthorFilter::none());
        let shares = summary.shares(&summary.authors[0]);
        assert_eq!(shares.insertions, 0.0);
        assert_eq!(shares.deletions, 0.0);
        assert_eq!(shares.files, 0.0);
        assert_eq!(shares.lines_changed, 0.0);
        assert_eq!(shares.commits, 100.0);
    }

    #[test]
    fn test_uses_configured_sort() {
        let text = "h1\tamy\ta@x\t1\n1\t0\ta\nh2\tZoe\tz@x\t2\n9\t0\tb\n";
        let summary = aggregate_contributions(
            &parse_numstat_log(text),
            &AuthorFilter::none(),
            &SortSpec::new(SortKey::Insertions, SortDirection::Descending),
        );
        let names: Vec<_> = summary.authors.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Zoe", "amy"]);
    }
}
