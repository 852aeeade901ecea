//! Report entry points.
//!
//! Every report takes its optional argument, writes to the sink and returns
//! nothing. A failed query, an empty history or a failed export ends the
//! current report with a message; it never propagates.

use std::collections::HashMap;
use std::fmt::Display;
use std::io::Write;

use chrono::{DateTime, Local, NaiveDate, Utc};
use log::{debug, info};

use crate::config::Config;
use crate::git::GitOps;
use crate::models::DatedCommit;
use crate::parser::{
    non_empty_lines, parse_changelog_lines, parse_dated_commits, parse_email_times,
    parse_log_entries, parse_numstat_log,
};
use crate::query::{self, build_query, ReportKind};
use crate::render::chart::{count_chart, render_calendar, render_heatmap};
use crate::render::export::{write_csv, write_json};
use crate::render::table::{Align, Table};
use crate::stats::authors::aggregate_contributions;
use crate::stats::buckets::{
    count_by_date, count_by_hour, count_by_month, count_by_timezone, count_by_weekday,
    count_by_year,
};
use crate::stats::contributors::{
    detect_new_contributors, distinct_contributors, group_changelog, parse_cutoff,
};
use crate::stats::heatmap::{day_hour_grid, weekday_month_calendar, window_days, window_start};
use crate::stats::reviewers::rank_reviewers;
use crate::stats::sort::rank_descending;
use crate::utils::{commits_label, percent, short_sha};

pub const NO_DATA: &str = "No data available.";
pub const NO_COMMITS: &str = "No commits found.";

pub const CSV_FILE: &str = "daily_stats.csv";
pub const JSON_FILE: &str = "git_log.json";

/// Lines of graph output shown per unit of the configured limit.
const TREE_LINES_PER_ENTRY: usize = 5;

/// A report together with its argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    DetailedStats,
    DetailedStatsByBranch(String),
    Changelogs,
    ChangelogsByAuthor(String),
    MyDailyStatus,
    DailyStatsCsv(Option<String>),
    JsonLog,
    BranchTree,
    BranchesByDate,
    Contributors,
    NewContributors(String),
    CommitsPerAuthor,
    CommitsPerDay,
    CommitsPerMonth,
    CommitsPerYear,
    CommitsPerWeekday(Option<String>),
    CommitsPerHour(Option<String>),
    CommitsPerTimezone(Option<String>),
    SuggestReviewers,
    CommitsCalendar(String),
    CommitsHeatmap,
}

/// Runs reports against a backend, writing to `out`.
pub struct Reporter<G: GitOps, W: Write> {
    git: G,
    config: Config,
    out: W,
    today: NaiveDate,
}

impl<G: GitOps, W: Write> Reporter<G, W> {
    pub fn new(git: G, config: Config, out: W) -> Self {
        Self {
            git,
            config,
            out,
            today: Local::now().date_naive(),
        }
    }

    /// Pin the date used for "today" and the heatmap window.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The sink, for callers that interleave their own output.
    pub fn output_mut(&mut self) -> &mut W {
        &mut self.out
    }

    pub fn into_output(self) -> W {
        self.out
    }

    pub fn run(&mut self, action: &Action) {
        info!("Running {:?}", action);
        match action {
            Action::DetailedStats => self.detailed_stats(None),
            Action::DetailedStatsByBranch(branch) => self.detailed_stats(Some(branch)),
            Action::Changelogs => self.changelogs(None),
            Action::ChangelogsByAuthor(author) => self.changelogs(Some(author)),
            Action::MyDailyStatus => self.my_daily_status(),
            Action::DailyStatsCsv(branch) => self.daily_stats_csv(branch.as_deref()),
            Action::JsonLog => self.json_log(),
            Action::BranchTree => self.branch_tree(),
            Action::BranchesByDate => self.branches_by_date(),
            Action::Contributors => self.contributors(),
            Action::NewContributors(since) => self.new_contributors(since),
            Action::CommitsPerAuthor => self.commits_per_author(),
            Action::CommitsPerDay => self.commits_per_day(),
            Action::CommitsPerMonth => self.commits_per_month(),
            Action::CommitsPerYear => self.commits_per_year(),
            Action::CommitsPerWeekday(author) => self.commits_per_weekday(author.as_deref()),
            Action::CommitsPerHour(author) => self.commits_per_hour(author.as_deref()),
            Action::CommitsPerTimezone(author) => self.commits_per_timezone(author.as_deref()),
            Action::SuggestReviewers => self.suggest_reviewers(),
            Action::CommitsCalendar(author) => self.commits_calendar(author),
            Action::CommitsHeatmap => self.commits_heatmap(),
        }
    }

    fn line(&mut self, text: impl Display) {
        if let Err(err) = writeln!(self.out, "{}", text) {
            debug!("Failed to write report output: {}", err);
        }
    }

    /// Run a query, treating failure and blank output alike.
    fn fetch(&self, argv: Vec<String>) -> Option<String> {
        self.git
            .capture(&argv)
            .filter(|output| !output.trim().is_empty())
    }

    fn fetch_dated(&self, kind: ReportKind, arg: Option<&str>) -> Option<Vec<DatedCommit>> {
        let output = self.fetch(build_query(kind, &self.config, arg))?;
        Some(parse_dated_commits(&output)).filter(|commits| !commits.is_empty())
    }

    /// Contribution totals per author, optionally on a named branch.
    pub fn detailed_stats(&mut self, branch: Option<&str>) {
        let Some(output) = self.fetch(build_query(ReportKind::DetailedStats, &self.config, branch))
        else {
            self.line(NO_DATA);
            return;
        };

        let commits = parse_numstat_log(&output);
        let summary =
            aggregate_contributions(&commits, &self.config.ignore_authors, &self.config.sort);
        if summary.is_empty() {
            self.line(NO_DATA);
            return;
        }

        let shown = branch
            .or(self.config.branch.as_deref())
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .unwrap_or("current");
        self.line(format!(
            "Contribution stats (by author) on the {} branch:\n",
            shown
        ));
        for author in &summary.authors {
            let shares = summary.shares(author);
            self.line(format!("  {} <{}>:", author.name, author.email));
            self.line(stat_row("insertions", author.insertions, shares.insertions));
            self.line(stat_row("deletions", author.deletions, shares.deletions));
            self.line(stat_row("files", author.file_count() as u64, shares.files));
            self.line(stat_row("commits", author.commits, shares.commits));
            self.line(stat_row("lines changed", author.lines_changed, shares.lines_changed));
            self.line(format!("    first commit:  {}", format_epoch(author.first_commit)));
            self.line(format!("    last commit:   {}\n", format_epoch(author.last_commit)));
        }

        self.line("  total:");
        self.line(stat_row("insertions", summary.total_insertions, 100.0));
        self.line(stat_row("deletions", summary.total_deletions, 100.0));
        self.line(stat_row("files", summary.total_files as u64, 100.0));
        self.line(stat_row("commits", summary.total_commits, 100.0));
    }

    /// Commit subjects grouped by day, for the most recent `limit` days.
    pub fn changelogs(&mut self, author: Option<&str>) {
        let limit = self.config.limit;
        match author {
            Some(author) => self.line(format!("Git changelogs by {} (last {} days)", author, limit)),
            None => self.line(format!("Git changelogs (last {} days)", limit)),
        }

        let days = self
            .fetch(build_query(ReportKind::Changelogs, &self.config, author))
            .map(|output| {
                group_changelog(
                    parse_changelog_lines(&output),
                    &self.config.ignore_authors,
                    limit,
                )
            })
            .unwrap_or_default();
        if days.is_empty() {
            self.line(NO_COMMITS);
            return;
        }

        for day in days {
            self.line(format!("\n[{} - {}]", day.date, day.date.format("%A")));
            for entry in &day.entries {
                self.line(format!(" * {} ({})", entry.subject, entry.author));
            }
        }
    }

    /// Working tree changes since yesterday and today's commit count.
    pub fn my_daily_status(&mut self) {
        self.line("My daily status:");

        match self.fetch(build_query(ReportKind::DailyDiff, &self.config, None)) {
            Some(diff) => {
                for part in diff.split(',') {
                    self.line(format!("\t{}", part.trim()));
                }
            }
            None => self.line("\tNo changes in the last day."),
        }

        let user = self
            .fetch(query::user_name())
            .map(|name| name.trim().to_string())
            .unwrap_or_else(|| "unknown".to_string());
        let count = self
            .fetch(query::commits_on_day(&self.config, &user, self.today))
            .map(|output| non_empty_lines(&output).count())
            .unwrap_or(0);
        self.line(format!("\t{} {}", count, commits_label(count)));
    }

    /// Export commits per day to `daily_stats.csv`.
    pub fn daily_stats_csv(&mut self, branch: Option<&str>) {
        let Some(commits) = self.fetch_dated(ReportKind::DailyStatsCsv, branch) else {
            self.line(NO_DATA);
            return;
        };
        let dates = count_by_date(&commits, &self.config.ignore_authors);
        if dates.is_empty() {
            self.line(NO_DATA);
            return;
        }

        let rows: Vec<(String, usize)> = dates
            .entries()
            .iter()
            .map(|(date, count)| (date.format("%Y-%m-%d").to_string(), *count))
            .collect();
        match write_csv(&self.config.output_dir, CSV_FILE, ("Date", "Commits"), &rows) {
            Ok(path) => self.line(format!("Daily stats saved to {}", path.display())),
            Err(err) => self.line(err),
        }
    }

    /// Export the log to `git_log.json`.
    pub fn json_log(&mut self) {
        let entries: Vec<_> = self
            .fetch(build_query(ReportKind::JsonLog, &self.config, None))
            .map(|output| parse_log_entries(&output))
            .unwrap_or_default()
            .into_iter()
            .filter(|entry| !self.config.ignore_authors.is_ignored(&entry.author))
            .collect();
        let Some(newest) = entries.first() else {
            self.line(NO_DATA);
            return;
        };
        let summary = format!(
            "{} {}, newest {}",
            entries.len(),
            commits_label(entries.len()),
            short_sha(&newest.hash)
        );
        debug!("Exporting {}", summary);

        match write_json(&self.config.output_dir, JSON_FILE, &entries) {
            Ok(path) => self.line(format!("Git log saved to {} ({})", path.display(), summary)),
            Err(err) => self.line(err),
        }
    }

    /// Graph of recent history across all branches.
    pub fn branch_tree(&mut self) {
        let Some(output) = self.fetch(build_query(ReportKind::BranchTree, &self.config, None))
        else {
            self.line(NO_DATA);
            return;
        };

        self.line("Branching tree view:\n");
        let max_lines = self.config.limit * TREE_LINES_PER_ENTRY;
        for line in output.lines().take(max_lines) {
            self.line(line);
        }
    }

    /// Local branches, least recently committed first.
    pub fn branches_by_date(&mut self) {
        let Some(output) = self.fetch(build_query(ReportKind::BranchesByDate, &self.config, None))
        else {
            self.line(NO_COMMITS);
            return;
        };

        self.line("All branches (sorted by most recent commit):\n");
        for (idx, branch) in non_empty_lines(&output).enumerate() {
            self.line(format!("\t{}  {}", idx + 1, branch));
        }
    }

    /// Distinct contributors, sorted by name.
    pub fn contributors(&mut self) {
        let names = self
            .fetch(build_query(ReportKind::Contributors, &self.config, None))
            .map(|output| {
                distinct_contributors(
                    non_empty_lines(&output),
                    &self.config.ignore_authors,
                    self.config.limit,
                )
            })
            .unwrap_or_default();
        if names.is_empty() {
            self.line(NO_DATA);
            return;
        }

        self.line("All contributors (sorted by name):\n");
        for (idx, name) in names.iter().enumerate() {
            self.line(format!("\t{}  {}", idx + 1, name));
        }
    }

    /// Emails whose first commit is on or after `since` (`YYYY-MM-DD`).
    pub fn new_contributors(&mut self, since: &str) {
        let cutoff = match parse_cutoff(since) {
            Ok(cutoff) => cutoff,
            Err(err) => {
                self.line(err);
                return;
            }
        };

        let Some(output) = self.fetch(build_query(ReportKind::NewContributors, &self.config, None))
        else {
            self.line(NO_DATA);
            return;
        };

        let mut found = detect_new_contributors(
            &parse_email_times(&output),
            cutoff,
            &self.config.ignore_authors,
        );
        if found.is_empty() {
            self.line(format!("No new contributors since {}.", since.trim()));
            return;
        }

        for contributor in &mut found {
            contributor.name = self
                .fetch(query::resolve_author_name(&self.config, &contributor.email))
                .and_then(|name| non_empty_lines(&name).next().map(str::to_string));
        }

        self.line(format!("New contributors since {}:\n", since.trim()));
        for contributor in &found {
            match &contributor.name {
                Some(name) => self.line(format!("{} <{}>", name, contributor.email)),
                None => self.line(&contributor.email),
            }
        }
    }

    pub fn commits_per_author(&mut self) {
        let Some(output) = self.fetch(build_query(ReportKind::CommitsPerAuthor, &self.config, None))
        else {
            self.line(NO_DATA);
            return;
        };

        let mut counts: HashMap<String, usize> = HashMap::new();
        for name in non_empty_lines(&output) {
            if !self.config.ignore_authors.is_ignored(name) {
                *counts.entry(name.to_string()).or_default() += 1;
            }
        }
        let ranked = rank_descending(counts);
        let total: usize = ranked.iter().map(|r| r.value).sum();
        if total == 0 {
            self.line(NO_DATA);
            return;
        }

        self.line("Git commits per author:\n");
        let mut table = Table::new()
            .column("Author", Align::Left)
            .column("Commits", Align::Right)
            .column("Share", Align::Right);
        for entry in &ranked {
            table.row([
                entry.identity.clone(),
                entry.value.to_string(),
                format!("{:.1}%", percent(entry.value as u64, total as u64)),
            ]);
        }
        self.line(table.render());
        self.line(format!("Total: {} {}", total, commits_label(total)));
    }

    pub fn commits_per_day(&mut self) {
        let buckets = self
            .fetch_dated(ReportKind::TimeBuckets, None)
            .map(|commits| count_by_date(&commits, &self.config.ignore_authors));
        let entries = buckets.filter(|b| !b.is_empty()).map(|b| {
            b.entries()
                .iter()
                .map(|(date, count)| (date.format("%Y-%m-%d").to_string(), *count))
                .collect()
        });
        self.bucket_report("Git commits per date", "Date", None, entries);
    }

    pub fn commits_per_month(&mut self) {
        let entries = self
            .fetch_dated(ReportKind::TimeBuckets, None)
            .map(|commits| count_by_month(&commits, &self.config.ignore_authors))
            .filter(|b| !b.is_empty())
            .map(|b| labelled(b.entries()));
        self.bucket_report("Git commits per month", "Month", None, entries);
    }

    pub fn commits_per_year(&mut self) {
        let entries = self
            .fetch_dated(ReportKind::TimeBuckets, None)
            .map(|commits| count_by_year(&commits, &self.config.ignore_authors))
            .filter(|b| !b.is_empty())
            .map(|b| labelled(b.entries()));
        self.bucket_report("Git commits per year", "Year", None, entries);
    }

    pub fn commits_per_weekday(&mut self, author: Option<&str>) {
        let entries = self
            .fetch_dated(ReportKind::TimeBuckets, author)
            .map(|commits| count_by_weekday(&commits, &self.config.ignore_authors))
            .filter(|b| !b.is_empty())
            .map(|b| labelled(b.entries()));
        self.bucket_report("Git commits per weekday", "Day", author, entries);
    }

    pub fn commits_per_hour(&mut self, author: Option<&str>) {
        let entries = self
            .fetch_dated(ReportKind::TimeBuckets, author)
            .map(|commits| count_by_hour(&commits, &self.config.ignore_authors))
            .filter(|b| !b.is_empty())
            .map(|b| {
                b.entries()
                    .iter()
                    .map(|(hour, count)| (format!("{:02}", hour), *count))
                    .collect()
            });
        self.bucket_report("Git commits per hour", "Hour", author, entries);
    }

    pub fn commits_per_timezone(&mut self, author: Option<&str>) {
        let entries = self
            .fetch_dated(ReportKind::TimeBuckets, author)
            .map(|commits| count_by_timezone(&commits, &self.config.ignore_authors))
            .filter(|b| !b.is_empty())
            .map(|b| labelled(b.entries()));
        self.bucket_report("Git commits per timezone", "Timezone", author, entries);
    }

    fn bucket_report(
        &mut self,
        title: &str,
        label: &str,
        author: Option<&str>,
        entries: Option<Vec<(String, usize)>>,
    ) {
        match author.map(str::trim).filter(|a| !a.is_empty()) {
            Some(author) => self.line(format!("{} by {}:\n", title, author)),
            None => self.line(format!("{}:\n", title)),
        }
        match entries {
            Some(entries) => self.line(count_chart(label, &entries)),
            None => self.line(NO_COMMITS),
        }
    }

    /// Most frequent recent authors, as candidate reviewers.
    pub fn suggest_reviewers(&mut self) {
        let Some(output) = self.fetch(build_query(ReportKind::Reviewers, &self.config, None)) else {
            self.line(NO_DATA);
            return;
        };

        let ranked = rank_reviewers(non_empty_lines(&output), &self.config.ignore_authors);
        if ranked.is_empty() {
            self.line("No potential reviewers found.");
            return;
        }

        self.line("Suggested code reviewers (based on git history):\n");
        let mut table = Table::new()
            .column("Commits", Align::Right)
            .column("Reviewer", Align::Left);
        for entry in ranked.iter().take(self.config.limit) {
            table.row([entry.value.to_string(), entry.identity.clone()]);
        }
        self.line(table.render());
    }

    /// Weekday by month activity calendar for one author.
    pub fn commits_calendar(&mut self, author: &str) {
        self.line(format!("Commit Activity Calendar for '{}'\n", author));

        let calendar = self
            .fetch_dated(ReportKind::Calendar, Some(author))
            .map(|commits| weekday_month_calendar(&commits, &self.config.ignore_authors))
            .filter(|calendar| calendar.total() > 0);
        match calendar {
            Some(calendar) => self.line(render_calendar(&calendar)),
            None => self.line(NO_COMMITS),
        }
    }

    /// Day by hour heatmap for the last `days` days.
    pub fn commits_heatmap(&mut self) {
        let days = window_days(self.config.days);
        self.line(format!("Commit Heatmap for the last {} days\n", days));

        let since = format!("{} 00:00:00", window_start(self.today, days).format("%Y-%m-%d"));
        let grid = self
            .fetch_dated(ReportKind::Heatmap, Some(&since))
            .map(|commits| day_hour_grid(&commits, &self.config.ignore_authors, self.today, days))
            .filter(|grid| grid.total() > 0);
        match grid {
            Some(grid) => self.line(render_heatmap(&grid)),
            None => self.line(NO_COMMITS),
        }
    }
}

fn labelled<K: Display>(entries: &[(K, usize)]) -> Vec<(String, usize)> {
    entries
        .iter()
        .map(|(key, count)| (key.to_string(), *count))
        .collect()
}

fn stat_row(label: &str, value: u64, share: f64) -> String {
    format!("    {:<14} {:<6} ({:.0}%)", format!("{}:", label), value, share)
}

fn format_epoch(timestamp: i64) -> String {
    DateTime::<Utc>::from_timestamp(timestamp, 0)
        .map(|dt| dt.format("%a %b %d %H:%M:%S %Y %z").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}
