//! Error types for git subprocess operations.
//!
//! Every failure carries enough context (the command line, the working
//! directory or git's own stderr) for a caller to diagnose it without
//! re-running the command.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for kodegen_git_runner operations
pub type Result<T> = std::result::Result<T, GitError>;

/// Main error type for all subprocess and repository operations
#[derive(Error, Debug)]
pub enum GitError {
    /// The external tool could not be started
    #[error("Failed to spawn '{command}' in {cwd}: {source}")]
    Spawn {
        /// Command line that was being started
        command: String,
        /// Working directory the command was rooted at
        cwd: PathBuf,
        /// Underlying spawn or lookup failure
        #[source]
        source: std::io::Error,
    },

    /// Reading or writing the child's streams failed before it exited
    #[error("I/O error while running '{command}': {source}")]
    Io {
        /// Command line that was running
        command: String,
        /// Underlying stream error
        #[source]
        source: std::io::Error,
    },

    /// The command ran to completion but exited with a non-zero status
    #[error("Command '{command}' failed with exit code {code}: {}", failure_text(.stderr, .stdout))]
    CommandFailure {
        /// Command line that failed
        command: String,
        /// Exit code (-1 if the process was terminated by a signal)
        code: i32,
        /// Captured standard error, verbatim
        stderr: String,
        /// Captured standard output; git reports some refusals here (e.g. "nothing to commit")
        stdout: String,
    },

    /// The runner's deadline elapsed and the child was killed
    #[error("Command '{command}' timed out after {}s", .timeout.as_secs_f64())]
    Timeout {
        /// Command line that timed out
        command: String,
        /// Configured deadline
        timeout: Duration,
    },

    /// The invocation was cancelled and the child was killed
    #[error("Command '{command}' was cancelled")]
    Cancelled {
        /// Command line that was cancelled
        command: String,
    },

    /// Arguments failed a minimal shape check
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// A path that must not exist already does
    #[error("Path already exists: {path}")]
    PathExists {
        /// Offending path
        path: PathBuf,
    },

    /// Git output did not match the expected machine-readable format
    #[error("Failed to parse {what}: {reason}")]
    Parse {
        /// What was being parsed
        what: &'static str,
        /// Reason for the error
        reason: String,
    },
}

/// Git writes most complaints to stderr, but a few only to stdout
fn failure_text<'a>(stderr: &'a str, stdout: &'a str) -> &'a str {
    match stderr.trim() {
        "" => stdout.trim(),
        stderr => stderr,
    }
}

impl GitError {
    /// Exit code of the failed command, if the command ran to completion
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            GitError::CommandFailure { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Captured standard error of the failed command, if it ran to completion
    pub fn stderr(&self) -> Option<&str> {
        match self {
            GitError::CommandFailure { stderr, .. } => Some(stderr),
            _ => None,
        }
    }

    /// Whether the tool never started
    pub fn is_spawn_error(&self) -> bool {
        matches!(self, GitError::Spawn { .. })
    }

    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            GitError::Spawn { source, .. } if source.kind() == std::io::ErrorKind::NotFound => {
                vec![
                    "Ensure git is installed and on PATH: git --version".to_string(),
                    "Verify the working directory exists".to_string(),
                ]
            }
            GitError::CommandFailure { stderr, .. } if stderr.contains("not a git repository") => {
                vec!["Initialize the repository first: git init".to_string()]
            }
            GitError::CommandFailure { stderr, .. } if stderr.contains("index.lock") => vec![
                "Another git process is using this repository; wait for it to finish".to_string(),
                "Remove a stale .git/index.lock if no git process is running".to_string(),
            ],
            GitError::CommandFailure { stderr, .. }
                if stderr.contains("Please tell me who you are") =>
            {
                vec![
                    "Configure an identity: git config user.name / git config user.email"
                        .to_string(),
                ]
            }
            GitError::Timeout { .. } => {
                vec!["Increase the runner timeout or check for a hanging remote".to_string()]
            }
            GitError::PathExists { path } => vec![format!(
                "Remove {} or clone into a different directory",
                path.display()
            )],
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }

    /// Check if retrying the same call could succeed without caller changes
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            GitError::Io { .. } | GitError::Timeout { .. } | GitError::Cancelled { .. }
        ) || self.stderr().is_some_and(|stderr| stderr.contains("index.lock"))
    }
}
