/// Truncate a SHA to its first 8 characters for display
pub fn short_sha(sha: &str) -> &str {
    match sha.char_indices().nth(8) {
        Some((end, _)) => &sha[..end],
        None => sha,
    }
}

/// `part / total * 100`, or 0 when `total` is 0
pub fn percent(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

/// Pluralize "commit" for a count
pub fn commits_label(count: usize) -> &'static str {
    if count == 1 {
        "commit"
    } else {
        "commits"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_sha() {
        assert_eq!(short_sha("abc123def456"), "abc123de");
        assert_eq!(short_sha("short"), "short");
        assert_eq!(short_sha(""), "");
        assert_eq!(short_sha("ééééééééé"), "éééééééé");
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(1, 4), 25.0);
        assert_eq!(percent(5, 0), 0.0);
        assert_eq!(percent(0, 0), 0.0);
    }

    #[test]
    fn test_commits_label() {
        assert_eq!(commits_label(1), "commit");
        assert_eq!(commits_label(0), "commits");
        assert_eq!(commits_label(2), "commits");
    }
}
