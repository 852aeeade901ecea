//! Report configuration.
//!
//! A `Config` is resolved once per invocation and passed by reference into
//! every report. Settings can be supplied via:
//! - Environment: `_GIT_SINCE`, `_GIT_UNTIL`, `_GIT_PATHSPEC`, `_GIT_MERGE_VIEW`,
//!   `_GIT_LIMIT`, `_GIT_LOG_OPTIONS`, `_GIT_BRANCH`, `_GIT_SORT_BY`,
//!   `_GIT_IGNORE_AUTHORS`, `_GIT_DAYS`, `_GIT_OUTPUT_DIR`
//! - CLI overrides, which take precedence over the environment.
//!
//! Invalid values are reported once and replaced by their defaults.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use log::warn;
use regex::Regex;

use crate::stats::sort::SortSpec;

/// Default number of rows shown by limited reports.
pub const DEFAULT_LIMIT: usize = 10;

/// Default heatmap window in days.
pub const DEFAULT_DAYS: usize = 30;

/// Longest heatmap window, about ten years. Larger values are clamped.
pub const MAX_DAYS: usize = 3660;

/// Which commits the backend should return with respect to merges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergeView {
    /// Hide merge commits (default)
    #[default]
    ExcludeMerges,
    /// Show only merge commits
    MergesOnly,
    /// Defer to the backend's own default
    IncludeAll,
}

impl MergeView {
    /// Interpret a `_GIT_MERGE_VIEW` value. Anything unrecognised hides merges.
    pub fn from_setting(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "exclusive" => Self::MergesOnly,
            "enable" => Self::IncludeAll,
            _ => Self::ExcludeMerges,
        }
    }

    /// The backend option for this view, if any.
    pub fn as_arg(&self) -> Option<&'static str> {
        match self {
            Self::ExcludeMerges => Some("--no-merges"),
            Self::MergesOnly => Some("--merges"),
            Self::IncludeAll => None,
        }
    }
}

type Predicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Predicate deciding which author identities are excluded from reports.
#[derive(Clone, Default)]
pub struct AuthorFilter {
    predicate: Option<Predicate>,
    description: Option<String>,
}

impl AuthorFilter {
    /// A filter that ignores nobody.
    pub fn none() -> Self {
        Self::default()
    }

    /// Ignore identities matching a regular expression.
    pub fn from_pattern(pattern: &str) -> Result<Self, regex::Error> {
        let re = Regex::new(pattern)?;
        Ok(Self {
            predicate: Some(Arc::new(move |identity: &str| re.is_match(identity))),
            description: Some(pattern.to_string()),
        })
    }

    /// Ignore identities for which `predicate` returns true.
    pub fn from_fn(predicate: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        Self {
            predicate: Some(Arc::new(predicate)),
            description: None,
        }
    }

    pub fn is_ignored(&self, identity: &str) -> bool {
        self.predicate.as_ref().is_some_and(|p| p(identity))
    }

    pub fn is_active(&self) -> bool {
        self.predicate.is_some()
    }
}

impl fmt::Debug for AuthorFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.predicate, &self.description) {
            (None, _) => write!(f, "AuthorFilter(none)"),
            (Some(_), Some(pattern)) => write!(f, "AuthorFilter(/{}/)", pattern),
            (Some(_), None) => write!(f, "AuthorFilter(<fn>)"),
        }
    }
}

/// Values supplied on the command line, applied over the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub since: Option<String>,
    pub until: Option<String>,
    pub branch: Option<String>,
    pub limit: Option<usize>,
    pub sort: Option<SortSpec>,
    pub days: Option<usize>,
}

/// Immutable report parameters.
#[derive(Debug, Clone)]
pub struct Config {
    /// Lower date bound passed as `--since`; `None` is unbounded.
    pub since: Option<String>,
    /// Upper date bound passed as `--until`; `None` is unbounded.
    pub until: Option<String>,
    pub merge_view: MergeView,
    /// Branch to inspect; `None` is the current branch.
    pub branch: Option<String>,
    /// Extra backend options, passed through verbatim.
    pub log_options: String,
    /// Path filter; empty means no filter.
    pub pathspec: String,
    pub limit: usize,
    pub sort: SortSpec,
    pub ignore_authors: AuthorFilter,
    /// Heatmap window in days.
    pub days: usize,
    /// Directory exported files are written to.
    pub output_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            since: None,
            until: None,
            merge_view: MergeView::default(),
            branch: None,
            log_options: String::new(),
            pathspec: String::new(),
            limit: DEFAULT_LIMIT,
            sort: SortSpec::default(),
            ignore_authors: AuthorFilter::none(),
            days: DEFAULT_DAYS,
            output_dir: PathBuf::from("."),
        }
    }
}

impl Config {
    /// Create a config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create config from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Create config from an arbitrary key lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut config = Self::default();
        config.since = get("_GIT_SINCE");
        config.until = get("_GIT_UNTIL");
        config.branch = get("_GIT_BRANCH");
        config.pathspec = get("_GIT_PATHSPEC").unwrap_or_default();
        config.log_options = get("_GIT_LOG_OPTIONS").unwrap_or_default();
        config.merge_view = get("_GIT_MERGE_VIEW")
            .map(|v| MergeView::from_setting(&v))
            .unwrap_or_default();

        if let Some(value) = get("_GIT_LIMIT") {
            config.limit = positive_or_default("_GIT_LIMIT", &value, DEFAULT_LIMIT);
        }
        if let Some(value) = get("_GIT_DAYS") {
            config.days = bounded_days(positive_or_default("_GIT_DAYS", &value, DEFAULT_DAYS));
        }

        if let Some(value) = get("_GIT_SORT_BY") {
            config.sort = value.parse().unwrap_or_else(|err| {
                warn!("{} Using default sort {}.", err, SortSpec::default());
                SortSpec::default()
            });
        }

        if let Some(pattern) = get("_GIT_IGNORE_AUTHORS") {
            config.ignore_authors = AuthorFilter::from_pattern(&pattern).unwrap_or_else(|err| {
                warn!(
                    "Invalid value for _GIT_IGNORE_AUTHORS ({}). No authors will be ignored.",
                    err
                );
                AuthorFilter::none()
            });
        }

        if let Some(dir) = get("_GIT_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(dir);
        }

        config
    }

    /// Merge with CLI overrides. CLI values take precedence.
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(since) = overrides.since {
            self.since = Some(since);
        }
        if let Some(until) = overrides.until {
            self.until = Some(until);
        }
        if let Some(branch) = overrides.branch {
            self.branch = Some(branch);
        }
        if let Some(limit) = overrides.limit {
            self.limit = if limit == 0 {
                warn!("Invalid limit 0. Using default value {}.", DEFAULT_LIMIT);
                DEFAULT_LIMIT
            } else {
                limit
            };
        }
        if let Some(sort) = overrides.sort {
            self.sort = sort;
        }
        if let Some(days) = overrides.days {
            self.days = if days == 0 {
                warn!("Invalid day count 0. Using default value {}.", DEFAULT_DAYS);
                DEFAULT_DAYS
            } else {
                bounded_days(days)
            };
        }
        self
    }

    pub fn with_since(mut self, since: impl Into<String>) -> Self {
        self.since = Some(since.into());
        self
    }

    pub fn with_until(mut self, until: impl Into<String>) -> Self {
        self.until = Some(until.into());
        self
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    pub fn with_pathspec(mut self, pathspec: impl Into<String>) -> Self {
        self.pathspec = pathspec.into();
        self
    }

    pub fn with_log_options(mut self, options: impl Into<String>) -> Self {
        self.log_options = options.into();
        self
    }

    pub fn with_merge_view(mut self, view: MergeView) -> Self {
        self.merge_view = view;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_ignore_authors(mut self, filter: AuthorFilter) -> Self {
        self.ignore_authors = filter;
        self
    }

    pub fn with_days(mut self, days: usize) -> Self {
        self.days = days;
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }
}

fn bounded_days(days: usize) -> usize {
    if days > MAX_DAYS {
        warn!("Day count {} is too large. Using {} days.", days, MAX_DAYS);
        MAX_DAYS
    } else {
        days
    }
}

fn positive_or_default(name: &str, value: &str, default: usize) -> usize {
    match value.parse::<usize>() {
        Ok(n) if n > 0 => n,
        _ => {
            warn!(
                "Invalid value for {} ('{}'). Using default value {}.",
                name, value, default
            );
            default
        }
    }
}
