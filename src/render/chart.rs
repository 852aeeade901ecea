//! ASCII bar charts for bucketed counts.

use crate::render::table::{Align, Table};
use crate::stats::buckets::{MONTHS, WEEKDAYS};
use crate::stats::heatmap::{is_weekend, DayHourGrid, WeekdayMonthCalendar};

/// Longest bar drawn for the largest value.
pub const MAX_BAR_LENGTH: usize = 40;

const BAR_GLYPH: char = '#';
const EMPTY_BAR: &str = "-";

/// `round(value * max_len / max_value)`, or 0 when `max_value` is 0.
pub fn bar_length(value: usize, max_value: usize, max_len: usize) -> usize {
    if max_value == 0 {
        return 0;
    }
    let scale = max_len as f64 / max_value as f64;
    (value as f64 * scale).round() as usize
}

/// A bar for `value`, or a dash when it scales to nothing.
pub fn bar(value: usize, max_value: usize) -> String {
    match bar_length(value, max_value, MAX_BAR_LENGTH) {
        0 => EMPTY_BAR.to_string(),
        n => BAR_GLYPH.to_string().repeat(n),
    }
}

/// Render labelled counts as a table with a bar column.
pub fn count_chart<L: AsRef<str>>(label_header: &str, entries: &[(L, usize)]) -> String {
    let max_value = entries.iter().map(|(_, v)| *v).max().unwrap_or(0);

    let mut table = Table::new()
        .column(label_header, Align::Left)
        .column("Commits", Align::Right)
        .column("", Align::Left);
    for (label, value) in entries {
        table.row([
            label.as_ref().to_string(),
            value.to_string(),
            bar(*value, max_value),
        ]);
    }
    table.render()
}

/// Three-character calendar cell for a count.
pub fn calendar_cell(count: usize) -> &'static str {
    match count {
        0 => "...",
        1..=9 => "░░░",
        10..=19 => "▒▒▒",
        _ => "▓▓▓",
    }
}

pub fn render_calendar(calendar: &WeekdayMonthCalendar) -> String {
    let mut output = format!("      {}\n", MONTHS.join(" "));
    for (weekday, row) in WEEKDAYS.iter().zip(calendar.counts.iter()) {
        let cells: Vec<&str> = row.iter().map(|c| calendar_cell(*c)).collect();
        output.push_str(&format!("{:<5} {}\n", weekday, cells.join(" ")));
    }
    output.push_str("\nLegend: ... = 0   ░░░ = 1-9   ▒▒▒ = 10-19   ▓▓▓ = 20+ commits\n");
    output
}

/// Heatmap glyph for a count within one hour.
pub fn heat_glyph(count: usize) -> char {
    match count {
        0 => '.',
        1 => '░',
        2 => '▒',
        3..=4 => '▓',
        _ => '█',
    }
}

/// Render a day by hour grid, one row per day. Weekend days are starred.
pub fn render_heatmap(grid: &DayHourGrid) -> String {
    let hours: String = (0..24).map(|h| format!(" {:2}", h)).collect();
    let header = format!("Day  | Date       |{}", hours);
    let rule = "-".repeat(header.chars().count());

    let mut output = format!("{}\n{}\n", header, rule);
    for (day, counts) in &grid.rows {
        let marker = if is_weekend(*day) { '*' } else { ' ' };
        let cells: String = counts
            .iter()
            .map(|c| format!("  {}", heat_glyph(*c)))
            .collect();
        output.push_str(&format!(
            "{}{} | {} |{}\n",
            day.format("%a"),
            marker,
            day.format("%Y-%m-%d"),
            cells
        ));
    }
    output.push_str(&rule);
    output.push_str("\n\nLegend: . = 0   ░ = 1   ▒ = 2   ▓ = 3-4   █ = 5+ commits   * = weekend\n");
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_length_scales_to_max() {
        assert_eq!(bar_length(10, 10, 40), 40);
        assert_eq!(bar_length(5, 10, 40), 20);
        assert_eq!(bar_length(1, 80, 40), 1);
        assert_eq!(bar_length(1, 81, 40), 0);
    }

    #[test]
    fn test_zero_max_gives_placeholders() {
        assert_eq!(bar_length(0, 0, 40), 0);
        assert_eq!(bar(0, 0), "-");
        assert_eq!(bar(0, 5), "-");
    }

    #[test]
    fn test_calendar_cells() {
        assert_eq!(calendar_cell(0), "...");
        assert_eq!(calendar_cell(9), "░░░");
        assert_eq!(calendar_cell(10), "▒▒▒");
        assert_eq!(calendar_cell(20), "▓▓▓");
    }

    #[test]
    fn test_render_calendar_rows() {
        let mut calendar = WeekdayMonthCalendar::default();
        calendar.counts[0][0] = 3;
        calendar.counts[6][11] = 25;
        let rendered = render_calendar(&calendar);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "      Jan Feb Mar Apr May Jun Jul Aug Sep Oct Nov Dec");
        assert!(lines[1].starts_with("Mon   ░░░ ..."));
        assert!(lines[7].starts_with("Sun   ..."));
        assert!(lines[7].ends_with("▓▓▓"));
    }

    #[test]
    fn test_render_heatmap_marks_weekends() {
        use chrono::NaiveDate;
        let friday = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        let saturday = NaiveDate::from_ymd_opt(2024, 5, 11).unwrap();
        let mut busy = [0; 24];
        busy[9] = 7;
        let grid = DayHourGrid {
            rows: vec![(friday, busy), (saturday, [0; 24])],
        };
        let rendered = render_heatmap(&grid);
        let lines: Vec<&str> = rendered.lines().collect();
        assert!(lines[2].starts_with("Fri  | 2024-05-10 |"));
        assert!(lines[3].starts_with("Sat* | 2024-05-11 |"));
        assert_eq!(lines[0].chars().count(), lines[2].chars().count());
        assert!(lines[2].contains('█'));
        assert!(!lines[3].contains('█'));
    }

    #[test]
    fn test_count_chart() {
        let chart = count_chart("Hour", &[("00", 2), ("01", 0), ("02", 1)]);
        let lines: Vec<&str> = chart.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[2].ends_with(&"#".repeat(40)));
        assert!(lines[3].ends_with(" -"));
        assert!(lines[4].ends_with(&format!(" {}", "#".repeat(20))));
    }
}
