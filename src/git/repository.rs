//! Subprocess-backed implementation of [`GitOperations`].
//!
//! A [`Repository`] is a thin, stateless dispatcher bound to one working
//! directory. It never caches what it believes the repository looks like:
//! git and the filesystem own that state, and every call asks git afresh.
//!
//! No lock is taken around a working directory. Callers that issue
//! operations concurrently against the same path get whatever git's own
//! `index.lock` handling produces, typically a [`GitError::CommandFailure`]
//! for the loser.

use crate::error::{GitError, Result};
use crate::git::history::{LOG_FORMAT, parse_log};
use crate::git::status::{STATUS_ARGS, StatusEntry, parse_porcelain};
use crate::git::{
    CommitInfo, CommitOptions, GitConfig, GitOperations, InitOptions, PushOptions, StageTarget,
};
use crate::process::{CommandInvocation, CommandResult, ProcessRunner};
use path_absolutize::Absolutize;
use std::ffi::OsString;
use std::future::Future;
use std::path::{Path, PathBuf};

/// Handle to a git working directory
#[derive(Debug, Clone)]
pub struct Repository {
    path: PathBuf,
    runner: ProcessRunner,
    config: GitConfig,
}

impl Repository {
    /// Bind a handle to `path` using a default [`ProcessRunner`].
    ///
    /// Relative paths are made absolute against the current directory. The
    /// path does not need to exist or be a repository yet.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::with_runner(path, ProcessRunner::default())
    }

    /// Bind a handle to `path` that spawns git through `runner`
    pub fn with_runner<P: AsRef<Path>>(path: P, runner: ProcessRunner) -> Result<Self> {
        let path = path.as_ref();
        let path = path
            .absolutize()
            .map_err(|e| GitError::InvalidArguments {
                reason: format!("cannot resolve {}: {}", path.display(), e),
            })?
            .into_owned();

        Ok(Self {
            path,
            runner,
            config: GitConfig::default(),
        })
    }

    /// Replace the git configuration
    pub fn with_config(mut self, config: GitConfig) -> Self {
        self.config = config;
        self
    }

    /// Absolute working-directory path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Runner used to spawn git
    pub fn runner(&self) -> &ProcessRunner {
        &self.runner
    }

    /// Push to the configured default remote
    pub async fn push_default(&self, options: PushOptions) -> Result<()> {
        self.push(&self.config.default_remote, options).await
    }

    fn git(&self) -> CommandInvocation {
        CommandInvocation::new(&self.config.program, &self.path)
    }

    /// Run `invocation`, mapping a non-zero exit to [`GitError::CommandFailure`]
    async fn execute(&self, invocation: CommandInvocation) -> Result<CommandResult> {
        let command = invocation.display();
        let result = self.runner.run(invocation).await?;

        if !result.success() {
            log::debug!("'{}' failed with exit code {}", command, result.exit_code);
            return Err(GitError::CommandFailure {
                command,
                code: result.exit_code,
                stderr: result.stderr_text(),
                stdout: result.stdout_text(),
            });
        }

        Ok(result)
    }

    async fn log(&self, count: usize) -> Result<Vec<CommitInfo>> {
        let invocation = self
            .git()
            .args(["log", "-z", "-n"])
            .arg(count.to_string())
            .arg(LOG_FORMAT);
        let result = self.execute(invocation).await?;
        parse_log(&result.stdout_text())
    }
}

impl GitOperations for Repository {
    async fn init(&self) -> Result<()> {
        self.init_with(InitOptions::default()).await
    }

    async fn init_with(&self, options: InitOptions) -> Result<()> {
        let mut invocation = self.git().arg("init");
        if options.bare {
            invocation = invocation.arg("--bare");
        }
        self.execute(invocation).await?;
        log::info!("Initialized repository at {}", self.path.display());
        Ok(())
    }

    async fn clone_remote(&self, source: &str) -> Result<()> {
        let exists = tokio::fs::try_exists(&self.path)
            .await
            .map_err(|source| GitError::Io {
                command: format!("stat {}", self.path.display()),
                source,
            })?;
        if exists {
            return Err(GitError::PathExists {
                path: self.path.clone(),
            });
        }

        // The target does not exist yet, so git runs from its parent
        let parent = self.path.parent().unwrap_or(Path::new("/"));
        let invocation = CommandInvocation::new(&self.config.program, parent)
            .args(["clone", "-q", "--"])
            .arg(source)
            .arg(&self.path);
        self.execute(invocation).await?;
        log::info!("Cloned {} into {}", source, self.path.display());
        Ok(())
    }

    async fn stage(&self, target: StageTarget) -> Result<()> {
        let invocation = match target {
            StageTarget::All => self.git().args(["add", "--all"]),
            StageTarget::Paths(paths) => {
                if paths.is_empty() {
                    return Err(GitError::InvalidArguments {
                        reason: "stage requires at least one path".to_string(),
                    });
                }
                self.git().args(["add", "--"]).args(paths)
            }
        };
        self.execute(invocation).await?;
        Ok(())
    }

    async fn commit(&self, message: &str) -> Result<CommitInfo> {
        self.commit_with(message, CommitOptions::default()).await
    }

    async fn commit_with(&self, message: &str, options: CommitOptions) -> Result<CommitInfo> {
        let mut invocation = self.git().arg("commit");
        if options.signoff {
            invocation = invocation.arg("-s");
        }
        if options.allow_empty {
            invocation = invocation.arg("--allow-empty");
        }
        self.execute(invocation.arg("-m").arg(message)).await?;

        // git commit prints no machine-readable id; ask for HEAD instead
        let commit = self.head_commit().await?;
        log::info!("Created commit {} ({})", commit.short_hash, commit.message);
        Ok(commit)
    }

    async fn status(&self) -> Result<Vec<StatusEntry>> {
        let result = self.execute(self.git().args(STATUS_ARGS)).await?;
        parse_porcelain(&result.stdout)
    }

    async fn push(&self, remote: &str, options: PushOptions) -> Result<()> {
        if options.branch.is_none() && !options.all {
            return Err(GitError::InvalidArguments {
                reason: "push requires a branch or all = true".to_string(),
            });
        }

        let mut invocation = self.git().args(["push", "-q"]);
        if options.all {
            invocation = invocation.arg("--all");
        }
        if options.prune {
            invocation = invocation.arg("--prune");
        }
        invocation = invocation.arg("--").arg(remote);
        if let Some(branch) = options.branch {
            invocation = invocation.arg(branch);
        }
        self.execute(invocation).await?;
        Ok(())
    }

    async fn head_commit(&self) -> Result<CommitInfo> {
        self.log(1)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| GitError::Parse {
                what: "git log output",
                reason: "no commit returned for HEAD".to_string(),
            })
    }

    async fn recent_commits(&self, count: usize) -> Result<Vec<CommitInfo>> {
        self.log(count).await
    }

    async fn rev_parse(&self, rev: &str) -> Result<String> {
        // rev-parse has no portable end-of-options marker
        if rev.is_empty() || rev.starts_with('-') {
            return Err(GitError::InvalidArguments {
                reason: format!("'{}' is not a revision", rev),
            });
        }
        let invocation = self.git().args(["rev-parse", "--verify"]).arg(rev);
        let result = self.execute(invocation).await?;
        Ok(result.stdout_text().trim().to_string())
    }

    fn run<I, S>(&self, args: I) -> impl Future<Output = Result<CommandResult>> + Send
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let invocation = self.git().args(args);
        async move { self.runner.run(invocation).await }
    }
}
