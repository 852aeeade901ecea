//! Reviewer suggestions from recent authorship.

use std::collections::HashMap;

use crate::config::AuthorFilter;
use crate::stats::sort::{rank_descending, RankedEntry};

/// Number of most recent author occurrences considered.
pub const REVIEWER_WINDOW: usize = 100;

/// Rank authors among the first `REVIEWER_WINDOW` names, which the log lists
/// most recent first.
pub fn rank_reviewers<'a>(
    names: impl IntoIterator<Item = &'a str>,
    ignore: &AuthorFilter,
) -> Vec<RankedEntry> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for name in names.into_iter().take(REVIEWER_WINDOW) {
        if ignore.is_ignored(name) {
            continue;
        }
        *counts.entry(name.to_string()).or_default() += 1;
    }
    rank_descending(counts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_window_is_counted() {
        let mut names = vec!["recent"; 100];
        names.extend(vec!["old"; 50]);
        let ranked = rank_reviewers(names, &AuthorFilter::none());
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].identity, "recent");
        assert_eq!(ranked[0].value, 100);
    }

    #[test]
    fn test_ranked_by_count_then_name() {
        let names = vec!["bob", "amy", "cat", "cat", "bob"];
        let ranked = rank_reviewers(names, &AuthorFilter::none());
        let order: Vec<_> = ranked.iter().map(|r| (r.identity.as_str(), r.value)).collect();
        assert_eq!(order, vec![("bob", 2), ("cat", 2), ("amy", 1)]);
    }

    #[test]
    fn test_ignored_names_still_use_window() {
        let mut names = vec!["bot"; 100];
        names.push("human");
        let ignore = AuthorFilter::from_fn(|name| name == "bot");
        assert!(rank_reviewers(names, &ignore).is_empty());
    }
}
