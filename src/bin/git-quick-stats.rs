use std::io;

use clap::Parser;
use log::{error, LevelFilter};

use git_quick_stats::cli::Cli;
use git_quick_stats::config::Config;
use git_quick_stats::git::{Git, GitOps};
use git_quick_stats::interactive::run_menu;
use git_quick_stats::reports::Reporter;

fn main() {
    let cli = Cli::parse();

    // Initialize logging based on verbosity flags
    let log_level = if cli.quiet {
        LevelFilter::Error
    } else {
        match cli.verbosity {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_target(false)
        .format_timestamp(None)
        .init();

    // Environment first, then CLI overrides
    let config = Config::from_env().with_overrides(cli.overrides());

    let git = Git::new();
    if !git.is_inside_work_tree() {
        error!("Not a git repository (or any of the parent directories)");
        std::process::exit(1);
    }

    let mut reporter = Reporter::new(git, config, io::stdout().lock());
    match cli.action() {
        Some(action) => reporter.run(&action),
        None => {
            if let Err(err) = run_menu(&mut reporter, io::stdin().lock()) {
                error!("{}", err);
            }
        }
    }
}
