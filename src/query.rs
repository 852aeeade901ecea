//! Backend argument vectors for every report.
//!
//! Builders never emit empty tokens: options whose value is empty are left
//! out, and `--` is only added when there is a path filter to follow it.

use chrono::NaiveDate;

use crate::config::Config;
use crate::parser::FIELD_SEP;

pub const GIT: &str = "git";

/// Format for contribution stats; tab-separated so numstat lines stay distinct.
pub const NUMSTAT_FORMAT: &str = "%H%x09%aN%x09%aE%x09%ad";

/// Incremental builder for one backend invocation.
#[derive(Debug, Clone, Default)]
pub struct GitCommand {
    args: Vec<String>,
    revision: Option<String>,
    pathspec: Vec<String>,
}

impl GitCommand {
    /// `git <subcommand>`
    pub fn new(subcommand: &str) -> Self {
        Self::default().arg(GIT).arg(subcommand)
    }

    /// `git log` with the configured merge view, date bounds, extra options,
    /// branch and path filter.
    pub fn log(config: &Config) -> Self {
        Self::unbounded_log(config)
            .opt("--since", config.since.as_deref())
            .opt("--until", config.until.as_deref())
    }

    /// Like [`GitCommand::log`] but over the whole history.
    pub fn unbounded_log(config: &Config) -> Self {
        let mut command = Self::default()
            .arg(GIT)
            .arg("-c")
            .arg("log.showSignature=false")
            .arg("log")
            .arg("--use-mailmap");
        if let Some(merges) = config.merge_view.as_arg() {
            command = command.arg(merges);
        }
        command
            .split_args(&config.log_options)
            .revision(config.branch.as_deref())
            .pathspec(&config.pathspec)
    }

    /// Append one token, skipping empty ones.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        let arg = arg.into();
        if !arg.is_empty() {
            self.args.push(arg);
        }
        self
    }

    /// Append every whitespace-separated token of `text`.
    pub fn split_args(self, text: &str) -> Self {
        text.split_whitespace().fold(self, |cmd, token| cmd.arg(token))
    }

    /// Append `name=value` when the value is present and non-empty.
    pub fn opt(self, name: &str, value: Option<&str>) -> Self {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            Some(value) => self.arg(format!("{}={}", name, value)),
            None => self,
        }
    }

    /// Restrict to one author; `None` means all authors.
    pub fn author(self, author: Option<&str>) -> Self {
        self.opt("--author", author)
    }

    pub fn format(self, format: &str) -> Self {
        self.arg(format!("--pretty=format:{}", format))
    }

    pub fn date(self, style: &str) -> Self {
        self.opt("--date", Some(style))
    }

    /// Branch or revision to walk; replaces any configured one when present.
    pub fn revision(mut self, revision: Option<&str>) -> Self {
        if let Some(rev) = revision.map(str::trim).filter(|r| !r.is_empty()) {
            self.revision = Some(rev.to_string());
        }
        self
    }

    pub fn pathspec(mut self, pathspec: &str) -> Self {
        self.pathspec = pathspec.split_whitespace().map(str::to_string).collect();
        self
    }

    pub fn build(self) -> Vec<String> {
        let mut argv = self.args;
        argv.extend(self.revision);
        if !self.pathspec.is_empty() {
            argv.push("--".to_string());
            argv.extend(self.pathspec);
        }
        argv
    }
}

/// Join format placeholders with the field separator.
fn fields(placeholders: &[&str]) -> String {
    let sep = format!("%x{:02x}", FIELD_SEP as u32);
    placeholders.join(&sep)
}

/// The primary query behind each report family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    DetailedStats,
    Changelogs,
    DailyDiff,
    DailyStatsCsv,
    JsonLog,
    BranchTree,
    BranchesByDate,
    Contributors,
    NewContributors,
    CommitsPerAuthor,
    TimeBuckets,
    Reviewers,
    Calendar,
    Heatmap,
}

impl ReportKind {
    pub const ALL: [ReportKind; 14] = [
        Self::DetailedStats,
        Self::Changelogs,
        Self::DailyDiff,
        Self::DailyStatsCsv,
        Self::JsonLog,
        Self::BranchTree,
        Self::BranchesByDate,
        Self::Contributors,
        Self::NewContributors,
        Self::CommitsPerAuthor,
        Self::TimeBuckets,
        Self::Reviewers,
        Self::Calendar,
        Self::Heatmap,
    ];
}

const BRANCH_TREE_FORMAT: &str =
    "--format=--+ Commit:  %h%n  | Date:    %aD (%ar)%n  | Message: %s %d%n  + Author:  %aN %n";

const BRANCHES_FORMAT: &str = "--format=[%(authordate:relative)] %(authorname) %(refname:short)";

/// Build the query for `kind`.
///
/// `arg` is the report-specific argument: a branch for `DetailedStats` and
/// `DailyStatsCsv`, an author for `Changelogs`, `TimeBuckets` and `Calendar`,
/// and the first day (`YYYY-MM-DD`) of the window for `Heatmap`. It is
/// ignored elsewhere.
pub fn build_query(kind: ReportKind, config: &Config, arg: Option<&str>) -> Vec<String> {
    match kind {
        ReportKind::DetailedStats => GitCommand::log(config)
            .format(NUMSTAT_FORMAT)
            .arg("--numstat")
            .date("raw")
            .revision(arg)
            .build(),
        ReportKind::Changelogs => GitCommand::log(config)
            .date("short")
            .format(&fields(&["%ad", "%s", "%aN"]))
            .author(arg)
            .build(),
        ReportKind::DailyDiff => GitCommand::new("diff")
            .arg("--shortstat")
            .arg("@{0 day ago}")
            .build(),
        ReportKind::DailyStatsCsv => GitCommand::log(config)
            .date("iso-strict")
            .format(&fields(&["%aN", "%ad"]))
            .revision(arg)
            .build(),
        ReportKind::JsonLog => GitCommand::log(config)
            .date("iso-strict")
            .format(&fields(&["%H", "%aN", "%ad", "%s"]))
            .build(),
        ReportKind::BranchTree => GitCommand::log(config)
            .arg("--graph")
            .arg("--abbrev-commit")
            .arg("--decorate")
            .arg(BRANCH_TREE_FORMAT)
            .arg("--all")
            .build(),
        ReportKind::BranchesByDate => GitCommand::new("for-each-ref")
            .arg("--sort=committerdate")
            .arg("refs/heads/")
            .arg(BRANCHES_FORMAT)
            .build(),
        ReportKind::Contributors | ReportKind::CommitsPerAuthor | ReportKind::Reviewers => {
            GitCommand::log(config).format("%aN").build()
        }
        ReportKind::NewContributors => GitCommand::unbounded_log(config)
            .format(&fields(&["%aE", "%at"]))
            .build(),
        ReportKind::TimeBuckets | ReportKind::Calendar => GitCommand::log(config)
            .date("iso-strict")
            .format(&fields(&["%aN", "%ad"]))
            .author(arg)
            .build(),
        ReportKind::Heatmap => GitCommand::log(config)
            .opt("--since", arg)
            .date("iso-strict")
            .format(&fields(&["%aN", "%ad"]))
            .build(),
    }
}

/// Most recent display name recorded for `email`.
///
/// The pattern is `<email>` as a fixed string, so one address never matches
/// another that merely contains it.
pub fn resolve_author_name(config: &Config, email: &str) -> Vec<String> {
    GitCommand::unbounded_log(config)
        .arg("--fixed-strings")
        .author(Some(&format!("<{}>", email.trim())))
        .format("%aN")
        .arg("-n")
        .arg("1")
        .build()
}

pub fn user_name() -> Vec<String> {
    GitCommand::new("config").arg("user.name").build()
}

/// Hashes of commits by `author` made on `day`.
pub fn commits_on_day(config: &Config, author: &str, day: NaiveDate) -> Vec<String> {
    let day = day.format("%Y-%m-%d");
    GitCommand::unbounded_log(config)
        .author(Some(author))
        .opt("--since", Some(&format!("{}T00:00:00", day)))
        .opt("--until", Some(&format!("{}T23:59:59", day)))
        .format("%H")
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MergeView;

    #[test]
    fn test_name_lookup_matches_whole_email() {
        let argv = resolve_author_name(&Config::default(), "bob+ci@x.com");
        assert!(argv.contains(&"--fixed-strings".to_string()));
        assert!(argv.contains(&"--author=<bob+ci@x.com>".to_string()));
        assert_eq!(&argv[argv.len() - 2..], ["-n", "1"]);
    }

    #[test]
    fn test_default_config_queries_are_token_clean() {
        let config = Config::default();
        for kind in ReportKind::ALL {
            for arg in [None, Some(""), Some("value")] {
                let argv = build_query(kind, &config, arg);
                assert!(!argv.is_empty(), "{:?} built nothing", kind);
                assert_eq!(argv[0], GIT);
                assert!(
                    argv.iter().all(|token| !token.is_empty()),
                    "{:?} has an empty token: {:?}",
                    kind,
                    argv
                );
            }
        }
    }

    #[test]
    fn test_log_base_order() {
        let config = Config::default()
            .with_since("2024-01-01")
            .with_log_options("--first-parent   --topo-order")
            .with_branch("main")
            .with_pathspec("src docs");
        let argv = GitCommand::log(&config).format("%aN").build();
        assert_eq!(
            argv,
            vec![
                "git",
                "-c",
                "log.showSignature=false",
                "log",
                "--use-mailmap",
                "--no-merges",
                "--first-parent",
                "--topo-order",
                "--since=2024-01-01",
                "--pretty=format:%aN",
                "main",
                "--",
                "src",
                "docs",
            ]
        );
    }

    #[test]
    fn test_include_all_adds_no_merge_option() {
        let config = Config::default().with_merge_view(MergeView::IncludeAll);
        let argv = build_query(ReportKind::Reviewers, &config, None);
        assert!(!argv.iter().any(|a| a.contains("merges")));
        assert!(!argv.contains(&"--".to_string()));
    }

    #[test]
    fn test_author_is_a_single_token() {
        let argv = build_query(ReportKind::TimeBuckets, &Config::default(), Some("Ada Lovelace"));
        assert_eq!(
            argv.iter().filter(|a| a.starts_with("--author")).count(),
            1
        );
        assert!(argv.contains(&"--author=Ada Lovelace".to_string()));
    }

    #[test]
    fn test_branch_argument_overrides_configured_branch() {
        let config = Config::default().with_branch("main");
        let argv = build_query(ReportKind::DetailedStats, &config, Some("feature"));
        assert!(argv.contains(&"feature".to_string()));
        assert!(!argv.contains(&"main".to_string()));
    }

    #[test]
    fn test_parsed_fields_use_machine_dates() {
        let config = Config::default();
        for kind in [ReportKind::TimeBuckets, ReportKind::JsonLog, ReportKind::Heatmap] {
            assert!(build_query(kind, &config, None).contains(&"--date=iso-strict".to_string()));
        }
        assert!(build_query(ReportKind::DetailedStats, &config, None)
            .contains(&"--date=raw".to_string()));
    }

    #[test]
    fn test_field_separator_placeholder() {
        assert_eq!(fields(&["%aN", "%ad"]), "%aN%x1f%ad");
    }

    #[test]
    fn test_new_contributors_ignore_date_bounds() {
        let config = Config::default().with_since("2024-01-01").with_until("2024-02-01");
        let argv = build_query(ReportKind::NewContributors, &config, None);
        assert!(!argv.iter().any(|a| a.starts_with("--since") || a.starts_with("--until")));
    }
}
