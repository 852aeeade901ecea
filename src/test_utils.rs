//! Shared test utilities for scripting backend output.
//!
//! `ScriptedGit` answers each call with the next queued response and records
//! the argument vectors it was given, so tests can assert on both the
//! rendered report and the queries that produced it.

use std::cell::RefCell;
use std::collections::VecDeque;

use crate::config::Config;
use crate::git::{GitError, GitOps};
use crate::reports::Reporter;

/// A `GitOps` double returning queued outputs in order
pub struct ScriptedGit {
    responses: RefCell<VecDeque<Option<String>>>,
    calls: RefCell<Vec<Vec<String>>>,
}

impl ScriptedGit {
    /// Queue responses; `None` simulates a failing command
    pub fn new(responses: Vec<Option<&str>>) -> Self {
        Self {
            responses: RefCell::new(
                responses
                    .into_iter()
                    .map(|r| r.map(|s| s.to_string()))
                    .collect(),
            ),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// All argument vectors seen so far
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.borrow().clone()
    }

    /// Number of commands run so far
    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl GitOps for ScriptedGit {
    fn run(&self, argv: &[String]) -> Result<String, GitError> {
        self.calls.borrow_mut().push(argv.to_vec());
        match self.responses.borrow_mut().pop_front() {
            Some(Some(output)) => Ok(output),
            _ => Err(GitError::CommandFailed(argv.join(" "))),
        }
    }
}

/// Build a reporter over scripted output writing into a buffer
pub fn reporter(
    git: &ScriptedGit,
    config: Config,
) -> Reporter<&ScriptedGit, Vec<u8>> {
    Reporter::new(git, config, Vec::new())
}

/// Consume a reporter and return everything it printed
pub fn output_of(reporter: Reporter<&ScriptedGit, Vec<u8>>) -> String {
    String::from_utf8_lossy(&reporter.into_output()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_git_replays_in_order() {
        let git = ScriptedGit::new(vec![Some("one"), None]);
        let argv = vec!["git".to_string(), "log".to_string()];
        assert_eq!(git.run(&argv).unwrap(), "one");
        assert!(git.run(&argv).is_err());
        assert!(git.run(&argv).is_err());
        assert_eq!(git.call_count(), 3);
        assert_eq!(git.calls()[0], argv);
    }
}
