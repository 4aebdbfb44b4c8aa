//! Core Git operations trait and types.
//!
//! This module defines the GitOperations trait that specifies the curated
//! set of repository operations. The subprocess-backed implementation is
//! provided by the repository module.

use crate::error::Result;
use crate::git::status::StatusEntry;
use crate::process::CommandResult;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::future::Future;
use std::path::PathBuf;

/// Trait defining the supported repository operations
pub trait GitOperations {
    /// Initialize a repository in the working directory (`git init`)
    fn init(&self) -> impl Future<Output = Result<()>> + Send;

    /// Initialize a repository with options (`git init [--bare]`)
    fn init_with(&self, options: InitOptions) -> impl Future<Output = Result<()>> + Send;

    /// Clone `source` into the working directory, which must not exist yet
    fn clone_remote(&self, source: &str) -> impl Future<Output = Result<()>> + Send;

    /// Stage all changes or an explicit list of paths (`git add`)
    fn stage(&self, target: StageTarget) -> impl Future<Output = Result<()>> + Send;

    /// Commit staged changes and return the new `HEAD`
    fn commit(&self, message: &str) -> impl Future<Output = Result<CommitInfo>> + Send;

    /// Commit with options and return the new `HEAD`
    fn commit_with(
        &self,
        message: &str,
        options: CommitOptions,
    ) -> impl Future<Output = Result<CommitInfo>> + Send;

    /// Parsed `git status` of the working tree, including untracked and ignored paths
    fn status(&self) -> impl Future<Output = Result<Vec<StatusEntry>>> + Send;

    /// Push to `remote` (a remote name, URL or path)
    fn push(&self, remote: &str, options: PushOptions)
    -> impl Future<Output = Result<()>> + Send;

    /// Get the commit `HEAD` points at
    fn head_commit(&self) -> impl Future<Output = Result<CommitInfo>> + Send;

    /// Get commit history, newest first
    fn recent_commits(&self, count: usize)
    -> impl Future<Output = Result<Vec<CommitInfo>>> + Send;

    /// Resolve a revision to its full object name (`git rev-parse`).
    ///
    /// A revision starting with `-` is rejected as [`GitError::InvalidArguments`].
    ///
    /// [`GitError::InvalidArguments`]: crate::GitError::InvalidArguments
    fn rev_parse(&self, rev: &str) -> impl Future<Output = Result<String>> + Send;

    /// Run an arbitrary git subcommand and return its unprocessed result.
    ///
    /// `args` excludes the program name, e.g. `["log", "--oneline"]`. A non-zero
    /// exit code is returned as data, not as an error.
    fn run<I, S>(&self, args: I) -> impl Future<Output = Result<CommandResult>> + Send
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>;
}

/// What `git add` should stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageTarget {
    /// Every change git can find (`git add --all`)
    All,
    /// Explicit paths or pathspecs; must not be empty
    Paths(Vec<PathBuf>),
}

impl StageTarget {
    /// Stage the given paths
    pub fn paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        StageTarget::Paths(paths.into_iter().map(Into::into).collect())
    }
}

/// Options for `git init`
#[derive(Debug, Clone, Copy, Default)]
pub struct InitOptions {
    /// Create a bare repository
    pub bare: bool,
}

/// Options for `git commit`
#[derive(Debug, Clone, Copy, Default)]
pub struct CommitOptions {
    /// Add a Signed-off-by trailer (`-s`)
    pub signoff: bool,
    /// Allow a commit that records no changes (`--allow-empty`)
    pub allow_empty: bool,
}

/// Options for `git push`; one of `branch` or `all` is required
#[derive(Debug, Clone, Default)]
pub struct PushOptions {
    /// Branch to push
    pub branch: Option<String>,
    /// Push all branches (`--all`)
    pub all: bool,
    /// Remove remote branches without a local counterpart (`--prune`)
    pub prune: bool,
}

/// Information about a Git commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitInfo {
    /// Commit hash (full SHA)
    pub hash: String,
    /// Short commit hash
    pub short_hash: String,
    /// Commit message (subject line)
    pub message: String,
    /// Author name
    pub author_name: String,
    /// Author email
    pub author_email: String,
    /// Commit timestamp
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// Parent commit hashes
    pub parents: Vec<String>,
}
