use clap::{ArgAction, ArgGroup, Parser};

use crate::config::ConfigOverrides;
use crate::reports::Action;
use crate::stats::sort::SortSpec;

/// Command line interface definition for git-quick-stats.
///
/// Without a report flag the interactive menu is shown.
#[derive(Parser, Debug)]
#[command(name = "git-quick-stats")]
#[command(about = "Simple statistics about a git repository")]
#[command(disable_version_flag = true)]
#[command(group(ArgGroup::new("report").multiple(false)))]
pub struct Cli {
    /// Contribution stats by author on the current branch
    #[arg(short = 'T', long, group = "report")]
    pub detailed_git_stats: bool,

    /// Contribution stats by author on a specific branch
    #[arg(short = 'R', long, value_name = "BRANCH", group = "report")]
    pub git_stats_by_branch: Option<String>,

    /// Commit subjects grouped by day
    #[arg(short = 'c', long, group = "report")]
    pub changelogs: bool,

    /// Commit subjects grouped by day for one author
    #[arg(short = 'L', long, value_name = "AUTHOR", group = "report")]
    pub changelogs_by_author: Option<String>,

    /// Working tree changes and today's commits
    #[arg(short = 'S', long, group = "report")]
    pub my_daily_stats: bool,

    /// Write commits per day to daily_stats.csv (current branch if omitted)
    #[arg(
        short = 'V',
        long,
        value_name = "BRANCH",
        num_args = 0..=1,
        default_missing_value = "",
        group = "report"
    )]
    pub csv_output_by_branch: Option<String>,

    /// Write the log to git_log.json
    #[arg(short = 'j', long, group = "report")]
    pub json_output: bool,

    /// Graph of recent commits across branches
    #[arg(short = 'b', long, group = "report")]
    pub branch_tree: bool,

    /// Branches sorted by most recent commit
    #[arg(short = 'D', long, group = "report")]
    pub branches_by_date: bool,

    /// All contributors sorted by name
    #[arg(short = 'C', long, group = "report")]
    pub contributors: bool,

    /// Contributors whose first commit is on or after a date (YYYY-MM-DD)
    #[arg(short = 'n', long, value_name = "DATE", group = "report")]
    pub new_contributors: Option<String>,

    /// Commits per author
    #[arg(short = 'a', long, group = "report")]
    pub commits_per_author: bool,

    /// Commits per day
    #[arg(short = 'd', long, group = "report")]
    pub commits_per_day: bool,

    /// Commits per month
    #[arg(short = 'm', long, group = "report")]
    pub commits_by_month: bool,

    /// Commits per year
    #[arg(short = 'Y', long, group = "report")]
    pub commits_by_year: bool,

    /// Commits per weekday
    #[arg(short = 'w', long, group = "report")]
    pub commits_by_weekday: bool,

    /// Commits per weekday for one author
    #[arg(short = 'W', long, value_name = "AUTHOR", group = "report")]
    pub commits_by_author_by_weekday: Option<String>,

    /// Commits per hour
    #[arg(short = 'o', long, group = "report")]
    pub commits_by_hour: bool,

    /// Commits per hour for one author
    #[arg(short = 'A', long, value_name = "AUTHOR", group = "report")]
    pub commits_by_author_by_hour: Option<String>,

    /// Commits per timezone
    #[arg(short = 'z', long, group = "report")]
    pub commits_by_timezone: bool,

    /// Commits per timezone for one author
    #[arg(short = 'Z', long, value_name = "AUTHOR", group = "report")]
    pub commits_by_author_by_timezone: Option<String>,

    /// Suggest code reviewers from recent history
    #[arg(short = 'r', long, group = "report")]
    pub suggest_reviewers: bool,

    /// Weekday by month activity calendar for one author
    #[arg(short = 'k', long, value_name = "AUTHOR", group = "report")]
    pub commits_calendar_by_author: Option<String>,

    /// Hourly heatmap of the last N days (see --days)
    #[arg(short = 'H', long, group = "report")]
    pub commits_heatmap: bool,

    /// Only commits after this date (overrides _GIT_SINCE)
    #[arg(long, value_name = "DATE")]
    pub since: Option<String>,

    /// Only commits before this date (overrides _GIT_UNTIL)
    #[arg(long, value_name = "DATE")]
    pub until: Option<String>,

    /// Branch to inspect (overrides _GIT_BRANCH)
    #[arg(long)]
    pub branch: Option<String>,

    /// Maximum rows in limited reports (overrides _GIT_LIMIT)
    #[arg(long)]
    pub limit: Option<usize>,

    /// Sort for contribution stats, e.g. commits-desc (overrides _GIT_SORT_BY)
    #[arg(long, value_name = "SORT")]
    pub sort_by: Option<SortSpec>,

    /// Heatmap window in days, at most 3660 (overrides _GIT_DAYS)
    #[arg(long)]
    pub days: Option<usize>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbosity: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

impl Cli {
    /// The report selected by flags, if any.
    pub fn action(&self) -> Option<Action> {
        let optional = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let action = if self.detailed_git_stats {
            Action::DetailedStats
        } else if let Some(branch) = self.git_stats_by_branch.clone() {
            Action::DetailedStatsByBranch(branch)
        } else if self.changelogs {
            Action::Changelogs
        } else if let Some(author) = self.changelogs_by_author.clone() {
            Action::ChangelogsByAuthor(author)
        } else if self.my_daily_stats {
            Action::MyDailyStatus
        } else if self.csv_output_by_branch.is_some() {
            Action::DailyStatsCsv(optional(&self.csv_output_by_branch))
        } else if self.json_output {
            Action::JsonLog
        } else if self.branch_tree {
            Action::BranchTree
        } else if self.branches_by_date {
            Action::BranchesByDate
        } else if self.contributors {
            Action::Contributors
        } else if let Some(date) = self.new_contributors.clone() {
            Action::NewContributors(date)
        } else if self.commits_per_author {
            Action::CommitsPerAuthor
        } else if self.commits_per_day {
            Action::CommitsPerDay
        } else if self.commits_by_month {
            Action::CommitsPerMonth
        } else if self.commits_by_year {
            Action::CommitsPerYear
        } else if self.commits_by_weekday {
            Action::CommitsPerWeekday(None)
        } else if self.commits_by_author_by_weekday.is_some() {
            Action::CommitsPerWeekday(optional(&self.commits_by_author_by_weekday))
        } else if self.commits_by_hour {
            Action::CommitsPerHour(None)
        } else if self.commits_by_author_by_hour.is_some() {
            Action::CommitsPerHour(optional(&self.commits_by_author_by_hour))
        } else if self.commits_by_timezone {
            Action::CommitsPerTimezone(None)
        } else if self.commits_by_author_by_timezone.is_some() {
            Action::CommitsPerTimezone(optional(&self.commits_by_author_by_timezone))
        } else if self.suggest_reviewers {
            Action::SuggestReviewers
        } else if let Some(author) = self.commits_calendar_by_author.clone() {
            Action::CommitsCalendar(author)
        } else if self.commits_heatmap {
            Action::CommitsHeatmap
        } else {
            return None;
        };
        Some(action)
    }

    /// Configuration values given on the command line.
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            since: self.since.clone(),
            until: self.until.clone(),
            branch: self.branch.clone(),
            limit: self.limit,
            sort: self.sort_by,
            days: self.days,
        }
    }
}
