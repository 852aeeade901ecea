//! Two-dimensional activity grids.

use chrono::{Datelike, Days, NaiveDate, Timelike, Weekday};

use crate::config::{AuthorFilter, MAX_DAYS};
use crate::models::DatedCommit;
use crate::stats::buckets::day_range;

/// Commits per hour for each of the last N days.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayHourGrid {
    /// Oldest day first
    pub rows: Vec<(NaiveDate, [usize; 24])>,
}

impl DayHourGrid {
    pub fn total(&self) -> usize {
        self.rows.iter().flat_map(|(_, hours)| hours.iter()).sum()
    }
}

/// Window length actually drawn: at least one day, at most `MAX_DAYS`.
pub fn window_days(days: usize) -> usize {
    days.clamp(1, MAX_DAYS)
}

/// First day of a `days`-long window ending on `today`.
pub fn window_start(today: NaiveDate, days: usize) -> NaiveDate {
    let back = (window_days(days) - 1) as u64;
    today.checked_sub_days(Days::new(back)).unwrap_or(NaiveDate::MIN)
}

/// Build the grid for the `days` days ending on `today`. Commits outside the
/// window are not counted.
pub fn day_hour_grid(
    commits: &[DatedCommit],
    ignore: &AuthorFilter,
    today: NaiveDate,
    days: usize,
) -> DayHourGrid {
    let start = window_start(today, days);
    let mut rows: Vec<(NaiveDate, [usize; 24])> = day_range(start, today)
        .into_iter()
        .map(|day| (day, [0; 24]))
        .collect();

    for commit in commits.iter().filter(|c| !ignore.is_ignored(&c.author)) {
        let offset = (commit.time.date_naive() - start).num_days();
        let row = usize::try_from(offset).ok().and_then(|idx| rows.get_mut(idx));
        if let Some((_, hours)) = row {
            hours[commit.time.hour() as usize] += 1;
        }
    }

    DayHourGrid { rows }
}

pub fn is_weekend(day: NaiveDate) -> bool {
    matches!(day.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Commits per weekday (rows, Monday first) and month (columns).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WeekdayMonthCalendar {
    pub counts: [[usize; 12]; 7],
}

impl WeekdayMonthCalendar {
    pub fn total(&self) -> usize {
        self.counts.iter().flat_map(|row| row.iter()).sum()
    }
}

pub fn weekday_month_calendar(
    commits: &[DatedCommit],
    ignore: &AuthorFilter,
) -> WeekdayMonthCalendar {
    let mut calendar = WeekdayMonthCalendar::default();
    for commit in commits.iter().filter(|c| !ignore.is_ignored(&c.author)) {
        let weekday = commit.time.weekday().num_days_from_monday() as usize;
        let month = commit.time.month0() as usize;
        calendar.counts[weekday][month] += 1;
    }
    calendar
}
