//! Numbered text menu over the same reports as the command line.

use std::io::{self, BufRead, Write};

use crate::git::GitOps;
use crate::reports::{Action, Reporter};

const MENU: &str = "
 Generate:
    1) Contribution stats (by author)
    2) Contribution stats (by author) on a specific branch
    3) Git changelogs
    4) Git changelogs by author
    5) My daily status
    6) Output daily stats by branch in CSV format
    7) Save git log output in JSON format

 List:
    8) Branch tree view
    9) All branches (sorted by most recent commit)
   10) All contributors (sorted by name)
   11) New contributors (sorted by email)
   12) Git commits per author
   13) Git commits per date
   14) Git commits per month
   15) Git commits per year
   16) Git commits per weekday
   17) Git commits per weekday by author
   18) Git commits per hour
   19) Git commits per hour by author
   20) Git commits per timezone
   21) Git commits per timezone by author

 Suggest:
   22) Code reviewers (based on git history)

 Calendar:
   23) Activity calendar by author
   24) Activity heatmap (last N days)

Please enter a menu option or press Enter to exit.";

pub const INVALID_SELECTION: &str = "Invalid selection. Please try again.";

/// What a menu choice needs before it can run.
enum Entry {
    Ready(Action),
    Required(&'static str, fn(String) -> Action),
    Optional(&'static str, fn(Option<String>) -> Action),
}

fn entry(choice: &str) -> Option<Entry> {
    use Entry::*;

    let entry = match choice {
        "1" => Ready(Action::DetailedStats),
        "2" => Required("Enter branch name: ", Action::DetailedStatsByBranch),
        "3" => Ready(Action::Changelogs),
        "4" => Required("Enter author name: ", Action::ChangelogsByAuthor),
        "5" => Ready(Action::MyDailyStatus),
        "6" => Optional(
            "Enter branch name (leave empty for current branch): ",
            Action::DailyStatsCsv,
        ),
        "7" => Ready(Action::JsonLog),
        "8" => Ready(Action::BranchTree),
        "9" => Ready(Action::BranchesByDate),
        "10" => Ready(Action::Contributors),
        "11" => Required("Enter cutoff date (YYYY-MM-DD): ", Action::NewContributors),
        "12" => Ready(Action::CommitsPerAuthor),
        "13" => Ready(Action::CommitsPerDay),
        "14" => Ready(Action::CommitsPerMonth),
        "15" => Ready(Action::CommitsPerYear),
        "16" => Ready(Action::CommitsPerWeekday(None)),
        "17" => Optional("Enter author name: ", Action::CommitsPerWeekday),
        "18" => Ready(Action::CommitsPerHour(None)),
        "19" => Optional("Enter author name: ", Action::CommitsPerHour),
        "20" => Ready(Action::CommitsPerTimezone(None)),
        "21" => Optional("Enter author name: ", Action::CommitsPerTimezone),
        "22" => Ready(Action::SuggestReviewers),
        "23" => Required("Enter author name: ", Action::CommitsCalendar),
        "24" => Ready(Action::CommitsHeatmap),
        _ => return None,
    };
    Some(entry)
}

/// Read one trimmed line; `None` at end of input.
fn read_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut buf = String::new();
    if input.read_line(&mut buf)? == 0 {
        return Ok(None);
    }
    Ok(Some(buf.trim().to_string()))
}

fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    text: &str,
) -> io::Result<Option<String>> {
    write!(out, "{}", text)?;
    out.flush()?;
    Ok(read_line(input)?.filter(|value| !value.is_empty()))
}

/// Show the menu and run choices until empty input, `quit`, `exit` or end of
/// input.
pub fn run_menu<G, W, R>(reporter: &mut Reporter<G, W>, mut input: R) -> io::Result<()>
where
    G: GitOps,
    W: Write,
    R: BufRead,
{
    loop {
        {
            let out = reporter.output_mut();
            writeln!(out, "{}", MENU)?;
            write!(out, "> ")?;
            out.flush()?;
        }

        let Some(choice) = read_line(&mut input)? else {
            break;
        };
        if choice.is_empty() || matches!(choice.to_lowercase().as_str(), "quit" | "exit") {
            break;
        }

        let action = match entry(&choice) {
            Some(Entry::Ready(action)) => action,
            Some(Entry::Required(text, build)) => {
                match prompt(&mut input, reporter.output_mut(), text)? {
                    Some(value) => build(value),
                    None => {
                        writeln!(reporter.output_mut(), "A value is required.")?;
                        continue;
                    }
                }
            }
            Some(Entry::Optional(text, build)) => {
                build(prompt(&mut input, reporter.output_mut(), text)?)
            }
            None => {
                writeln!(reporter.output_mut(), "{}", INVALID_SELECTION)?;
                continue;
            }
        };

        writeln!(reporter.output_mut())?;
        reporter.run(&action);
    }
    Ok(())
}
