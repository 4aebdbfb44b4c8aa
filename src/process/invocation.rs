//! Command invocations and their captured results.

use crate::error::{GitError, Result};
use serde::{Deserialize, Serialize};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// A single command to run: program, arguments, working directory and optional stdin.
///
/// The program is a required constructor argument, so an invocation can never
/// carry an empty argument vector.
#[derive(Debug, Clone)]
pub struct CommandInvocation {
    program: OsString,
    args: Vec<OsString>,
    cwd: PathBuf,
    stdin: Option<Vec<u8>>,
}

impl CommandInvocation {
    /// Create an invocation of `program` rooted at `cwd`
    pub fn new(program: impl Into<OsString>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.into(),
            stdin: None,
        }
    }

    /// Create an invocation from a full argument vector whose first element is the program
    pub fn from_argv<I, S>(argv: I, cwd: impl Into<PathBuf>) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let mut argv = argv.into_iter().map(Into::into);
        let program = argv.next().ok_or_else(|| GitError::InvalidArguments {
            reason: "argument vector must not be empty".to_string(),
        })?;
        if program.is_empty() {
            return Err(GitError::InvalidArguments {
                reason: "program name must not be empty".to_string(),
            });
        }
        Ok(Self::new(program, cwd).args(argv))
    }

    /// Append a single argument
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append multiple arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Bytes to write to the child's standard input
    pub fn stdin(mut self, input: impl Into<Vec<u8>>) -> Self {
        self.stdin = Some(input.into());
        self
    }

    /// Program to execute
    pub fn program(&self) -> &OsStr {
        &self.program
    }

    /// Arguments after the program
    pub fn arguments(&self) -> &[OsString] {
        &self.args
    }

    /// Working directory of the child
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub(crate) fn take_stdin(&mut self) -> Option<Vec<u8>> {
        self.stdin.take()
    }

    pub(crate) fn has_stdin(&self) -> bool {
        self.stdin.is_some()
    }

    /// Human-readable command line, used in logs and error messages
    pub fn display(&self) -> String {
        std::iter::once(&self.program)
            .chain(&self.args)
            .map(|part| part.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Outcome of one completed subprocess: exit code plus everything it wrote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandResult {
    /// Exit code (-1 if the process was terminated by a signal)
    pub exit_code: i32,
    /// Captured standard output
    pub stdout: Vec<u8>,
    /// Captured standard error
    pub stderr: Vec<u8>,
}

impl CommandResult {
    /// Whether the process exited with code 0
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Standard output decoded as UTF-8, replacing invalid sequences
    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    /// Standard error decoded as UTF-8, replacing invalid sequences
    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_argv_rejects_empty() {
        let err = CommandInvocation::from_argv(Vec::<String>::new(), "/tmp").unwrap_err();
        assert!(matches!(err, GitError::InvalidArguments { .. }));

        let err = CommandInvocation::from_argv([""], "/tmp").unwrap_err();
        assert!(matches!(err, GitError::InvalidArguments { .. }));
    }

    #[test]
    fn test_from_argv_splits_program() {
        let invocation = CommandInvocation::from_argv(["git", "log", "--oneline"], "/repo").unwrap();
        assert_eq!(invocation.program(), "git");
        assert_eq!(invocation.arguments(), &["log", "--oneline"]);
        assert_eq!(invocation.cwd(), Path::new("/repo"));
        assert_eq!(invocation.display(), "git log --oneline");
    }

    #[test]
    fn test_result_text_is_lossy() {
        let result = CommandResult {
            exit_code: 1,
            stdout: b"ok\n".to_vec(),
            stderr: vec![b'e', 0xff, b'r'],
        };
        assert!(!result.success());
        assert_eq!(result.stdout_text(), "ok\n");
        assert_eq!(result.stderr_text(), "e\u{fffd}r");
    }
}
