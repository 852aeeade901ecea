//! Ordering policy shared by the aggregators.
//!
//! Whatever the primary metric and direction, entries with equal metric
//! values are ordered by display name, ascending and case-insensitive.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::stats::authors::AuthorStats;

/// Metric used as the primary sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Name,
    Commits,
    Insertions,
    Deletions,
    Lines,
}

impl SortKey {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Commits => "commits",
            Self::Insertions => "insertions",
            Self::Deletions => "deletions",
            Self::Lines => "lines",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// A metric plus direction, e.g. `commits-desc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortSpec {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// Compare two author aggregates under this ordering.
    pub fn compare(&self, a: &AuthorStats, b: &AuthorStats) -> Ordering {
        let primary = match self.key {
            SortKey::Name => compare_names(&a.name, &b.name),
            SortKey::Commits => a.commits.cmp(&b.commits),
            SortKey::Insertions => a.insertions.cmp(&b.insertions),
            SortKey::Deletions => a.deletions.cmp(&b.deletions),
            SortKey::Lines => a.lines_changed.cmp(&b.lines_changed),
        };
        let primary = match self.direction {
            SortDirection::Ascending => primary,
            SortDirection::Descending => primary.reverse(),
        };
        primary.then_with(|| compare_names(&a.name, &b.name))
    }

    /// Sort author aggregates in place.
    pub fn sort(&self, authors: &mut [AuthorStats]) {
        authors.sort_by(|a, b| self.compare(a, b));
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = match self.direction {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        };
        write!(f, "{}-{}", self.key.name(), direction)
    }
}

impl FromStr for SortSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        let (metric, direction) = match lowered.rsplit_once('-') {
            Some((metric, "asc")) => (metric, SortDirection::Ascending),
            Some((metric, "desc")) => (metric, SortDirection::Descending),
            _ => (lowered.as_str(), SortDirection::Ascending),
        };
        let key = match metric {
            "name" => SortKey::Name,
            "commits" | "commit-count" => SortKey::Commits,
            "insertions" => SortKey::Insertions,
            "deletions" => SortKey::Deletions,
            "lines" | "total-lines" => SortKey::Lines,
            _ => {
                return Err(format!(
                    "Unknown sort '{}'. Valid metrics: name, commits, insertions, deletions, lines (optionally suffixed with -asc or -desc).",
                    s
                ))
            }
        };
        Ok(Self { key, direction })
    }
}

/// Case-insensitive name order, falling back to the exact bytes so that the
/// order stays total for names differing only in case.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// A metric value paired with the identity it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedEntry {
    pub value: usize,
    pub identity: String,
}

/// Rank counted identities by descending value, ties by name.
pub fn rank_descending(counts: impl IntoIterator<Item = (String, usize)>) -> Vec<RankedEntry> {
    let mut ranked: Vec<RankedEntry> = counts
        .into_iter()
        .map(|(identity, value)| RankedEntry { value, identity })
        .collect();
    ranked.sort_by(|a, b| {
        b.value
            .cmp(&a.value)
            .then_with(|| compare_names(&a.identity, &b.identity))
    });
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author(name: &str, commits: u64, insertions: u64) -> AuthorStats {
        let mut stats = AuthorStats::new(name, "", 0);
        stats.commits = commits;
        stats.insertions = insertions;
        stats.lines_changed = insertions;
        stats
    }

    fn names(authors: &[AuthorStats]) -> Vec<&str> {
        authors.iter().map(|a| a.name.as_str()).collect()
    }

    #[test]
    fn test_parse_sort_spec() {
        assert_eq!(
            "commits-desc".parse::<SortSpec>().unwrap(),
            SortSpec::new(SortKey::Commits, SortDirection::Descending)
        );
        assert_eq!(
            "lines".parse::<SortSpec>().unwrap(),
            SortSpec::new(SortKey::Lines, SortDirection::Ascending)
        );
        assert_eq!(
            "Total-Lines-ASC".parse::<SortSpec>().unwrap(),
            SortSpec::new(SortKey::Lines, SortDirection::Ascending)
        );
        assert!("size-desc".parse::<SortSpec>().is_err());
    }

    #[test]
    fn test_display_round_trips() {
        let spec = SortSpec::new(SortKey::Deletions, SortDirection::Descending);
        assert_eq!(spec.to_string(), "deletions-desc");
        assert_eq!(spec.to_string().parse::<SortSpec>().unwrap(), spec);
    }

    #[test]
    fn test_default_is_name_ascending() {
        let mut authors = vec![author("carol", 1, 0), author("Alice", 2, 0), author("bob", 3, 0)];
        SortSpec::default().sort(&mut authors);
        assert_eq!(names(&authors), vec!["Alice", "bob", "carol"]);
    }

    #[test]
    fn test_ties_break_by_name_ascending_when_descending() {
        let mut authors = vec![
            author("zed", 5, 0),
            author("Bob", 5, 0),
            author("alice", 5, 0),
            author("Top", 9, 0),
        ];
        SortSpec::new(SortKey::Commits, SortDirection::Descending).sort(&mut authors);
        assert_eq!(names(&authors), vec!["Top", "alice", "Bob", "zed"]);
    }

    #[test]
    fn test_ties_break_by_name_ascending_when_ascending() {
        let mut authors = vec![author("zed", 1, 10), author("Amy", 1, 10), author("low", 1, 2)];
        SortSpec::new(SortKey::Insertions, SortDirection::Ascending).sort(&mut authors);
        assert_eq!(names(&authors), vec!["low", "Amy", "zed"]);
    }

    #[test]
    fn test_rank_descending() {
        let ranked = rank_descending(vec![
            ("bob".to_string(), 2),
            ("Al".to_string(), 2),
            ("cy".to_string(), 7),
        ]);
        let order: Vec<_> = ranked.iter().map(|r| r.identity.as_str()).collect();
        assert_eq!(order, vec!["cy", "Al", "bob"]);
        assert_eq!(ranked[0].value, 7);
    }
}
