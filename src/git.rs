use std::path::{Path, PathBuf};
use std::process::Command;

use log::debug;

/// Errors from running the git backend
#[derive(Debug, thiserror::Error)]
pub enum GitError {
    #[error("Command list is empty")]
    EmptyCommand,
    #[error("Git command failed: {0}")]
    CommandFailed(String),
    #[error("Failed to execute git: {0}")]
    ExecutionFailed(#[from] std::io::Error),
}

/// Trait for running backend commands - allows scripting output in tests
pub trait GitOps {
    /// Run `argv` (first element is the program) and return its stdout with
    /// trailing whitespace trimmed.
    fn run(&self, argv: &[String]) -> Result<String, GitError>;

    /// Run `argv`, collapsing every failure into `None`.
    ///
    /// Reports only care whether text came back; the reason for a failure is
    /// logged at debug level.
    fn capture(&self, argv: &[String]) -> Option<String> {
        match self.run(argv) {
            Ok(output) => Some(output),
            Err(err) => {
                debug!("{}", err);
                None
            }
        }
    }

    /// Check whether the working directory is inside a git work tree
    fn is_inside_work_tree(&self) -> bool {
        let argv: Vec<String> = ["git", "rev-parse", "--is-inside-work-tree"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        matches!(self.run(&argv).as_deref(), Ok("true"))
    }
}

impl<T: GitOps + ?Sized> GitOps for &T {
    fn run(&self, argv: &[String]) -> Result<String, GitError> {
        (**self).run(argv)
    }
}

/// Real implementation of GitOps that spawns processes
pub struct Git {
    /// Working directory for spawned commands
    work_dir: Option<PathBuf>,
}

impl Git {
    pub fn new() -> Self {
        Self { work_dir: None }
    }

    pub fn with_work_dir(work_dir: impl AsRef<Path>) -> Self {
        Self {
            work_dir: Some(work_dir.as_ref().to_path_buf()),
        }
    }
}

impl Default for Git {
    fn default() -> Self {
        Self::new()
    }
}

impl GitOps for Git {
    fn run(&self, argv: &[String]) -> Result<String, GitError> {
        let (program, args) = argv.split_first().ok_or(GitError::EmptyCommand)?;

        let mut cmd = Command::new(program);
        if let Some(ref dir) = self.work_dir {
            cmd.current_dir(dir);
        }
        cmd.args(args);

        debug!("Running: {}", argv.join(" "));
        let output = cmd.output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GitError::CommandFailed(format!(
                "{} failed: {}",
                argv.join(" "),
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim_end().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::ScriptedGit;

    #[test]
    fn test_empty_command_is_an_error() {
        let git = Git::new();
        assert!(matches!(git.run(&[]), Err(GitError::EmptyCommand)));
        assert_eq!(git.capture(&[]), None);
    }

    #[test]
    fn test_capture_maps_failure_to_none() {
        let git = ScriptedGit::new(vec![None]);
        assert_eq!(git.capture(&["git".to_string(), "log".to_string()]), None);
    }

    #[test]
    fn test_capture_keeps_empty_output() {
        let git = ScriptedGit::new(vec![Some("")]);
        assert_eq!(git.capture(&["git".to_string()]), Some(String::new()));
    }

    #[test]
    fn test_is_inside_work_tree() {
        assert!(ScriptedGit::new(vec![Some("true")]).is_inside_work_tree());
        assert!(!ScriptedGit::new(vec![Some("false")]).is_inside_work_tree());
        assert!(!ScriptedGit::new(vec![None]).is_inside_work_tree());
    }
}
