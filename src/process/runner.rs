//! Asynchronous subprocess execution.
//!
//! A [`ProcessRunner`] spawns one child per invocation, drains stdout and
//! stderr concurrently with waiting on the child, and hands back a
//! [`CommandResult`] only once the process has exited. A non-zero exit code
//! is data at this layer, not an error.

use super::config::RunnerConfig;
use super::invocation::{CommandInvocation, CommandResult};
use crate::error::{GitError, Result};
use std::io;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, Command};
use tokio_util::sync::CancellationToken;

/// How an in-flight invocation ended
enum Completion {
    Exited(io::Result<(ExitStatus, Vec<u8>, Vec<u8>)>),
    TimedOut(Duration),
    Cancelled,
}

/// Spawns external tools and captures their output without blocking the runtime.
///
/// The runner holds no per-invocation state; clone it freely and run any
/// number of invocations concurrently. Dropping an in-flight `run` future
/// kills its child.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    config: RunnerConfig,
}

impl ProcessRunner {
    /// Create a runner with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a runner with custom configuration
    pub fn with_config(config: RunnerConfig) -> Self {
        Self { config }
    }

    /// Configuration applied to every child
    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Run `invocation` to completion and capture its output.
    ///
    /// # Errors
    ///
    /// * [`GitError::Spawn`] - the program is not on `PATH` or the working directory is invalid
    /// * [`GitError::Io`] - reading or writing the child's streams failed
    /// * [`GitError::Timeout`] - the configured timeout elapsed; the child was killed
    pub async fn run(&self, invocation: CommandInvocation) -> Result<CommandResult> {
        self.execute(invocation, None).await
    }

    /// Like [`run`](Self::run), but kills the child and returns
    /// [`GitError::Cancelled`] as soon as `token` is cancelled.
    ///
    /// The child is reaped before this returns, so no process outlives the call.
    pub async fn run_until_cancelled(
        &self,
        invocation: CommandInvocation,
        token: &CancellationToken,
    ) -> Result<CommandResult> {
        self.execute(invocation, Some(token)).await
    }

    async fn execute(
        &self,
        mut invocation: CommandInvocation,
        token: Option<&CancellationToken>,
    ) -> Result<CommandResult> {
        let command = invocation.display();
        let mut child = self.spawn(&invocation, &command)?;
        let input = invocation.take_stdin();

        log::debug!(
            "Spawned '{}' (pid {:?}) in {}",
            command,
            child.id(),
            invocation.cwd().display()
        );

        // The borrow of `child` ends with the select, so it can be killed below.
        let completion = tokio::select! {
            output = collect(&mut child, input) => Completion::Exited(output),
            limit = deadline(self.config.timeout) => Completion::TimedOut(limit),
            _ = cancelled(token) => Completion::Cancelled,
        };

        match completion {
            Completion::Exited(Ok((status, stdout, stderr))) => {
                let exit_code = status.code().unwrap_or(-1);
                log::trace!("'{}' exited with code {}", command, exit_code);
                Ok(CommandResult {
                    exit_code,
                    stdout,
                    stderr,
                })
            }
            Completion::Exited(Err(source)) => {
                terminate(&mut child, &command).await;
                Err(GitError::Io { command, source })
            }
            Completion::TimedOut(timeout) => {
                log::warn!(
                    "'{}' timed out after {:.1}s, terminating",
                    command,
                    timeout.as_secs_f64()
                );
                terminate(&mut child, &command).await;
                Err(GitError::Timeout { command, timeout })
            }
            Completion::Cancelled => {
                log::warn!("'{}' cancelled, terminating", command);
                terminate(&mut child, &command).await;
                Err(GitError::Cancelled { command })
            }
        }
    }

    fn spawn(&self, invocation: &CommandInvocation, command: &str) -> Result<Child> {
        let spawn_error = |source| GitError::Spawn {
            command: command.to_string(),
            cwd: invocation.cwd().to_path_buf(),
            source,
        };

        let program = self.resolve(invocation).map_err(spawn_error)?;

        let stdin = if invocation.has_stdin() {
            Stdio::piped()
        } else {
            Stdio::null()
        };

        Command::new(program)
            .args(invocation.arguments())
            .current_dir(invocation.cwd())
            .envs(self.config.env.iter().map(|(k, v)| (k, v)))
            .stdin(stdin)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(spawn_error)
    }

    /// Locate the executable for `invocation`.
    ///
    /// A bare name is searched on the child's `PATH` (the configured one if
    /// set). A name with a path separator is taken as is, relative names
    /// against the invocation's working directory.
    fn resolve(&self, invocation: &CommandInvocation) -> io::Result<PathBuf> {
        let program = Path::new(invocation.program());
        if program.components().count() > 1 {
            return Ok(invocation.cwd().join(program));
        }

        let found = match self.config.env_value("PATH") {
            Some(paths) => which::which_in(program, Some(paths), invocation.cwd()),
            None => which::which(program),
        };
        found.map_err(|e| io::Error::new(io::ErrorKind::NotFound, e))
    }
}

/// Feed stdin, drain both output pipes and wait for exit, all concurrently.
async fn collect(
    child: &mut Child,
    input: Option<Vec<u8>>,
) -> io::Result<(ExitStatus, Vec<u8>, Vec<u8>)> {
    let stdin = child.stdin.take();
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let feed = async move {
        if let (Some(mut pipe), Some(bytes)) = (stdin, input) {
            match pipe.write_all(&bytes).await {
                // The child may exit without reading all of its input
                Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {}
                other => other?,
            }
            // Dropping the pipe signals EOF
        }
        Ok::<(), io::Error>(())
    };

    let ((), stdout, stderr, status) =
        tokio::try_join!(feed, drain(stdout), drain(stderr), child.wait())?;

    Ok((status, stdout, stderr))
}

async fn drain<R: AsyncRead + Unpin>(pipe: Option<R>) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        pipe.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}

async fn deadline(limit: Option<Duration>) -> Duration {
    match limit {
        Some(limit) => {
            tokio::time::sleep(limit).await;
            limit
        }
        None => std::future::pending().await,
    }
}

async fn cancelled(token: Option<&CancellationToken>) {
    match token {
        Some(token) => token.cancelled().await,
        None => std::future::pending().await,
    }
}

/// Kill (SIGKILL) and reap the child.
async fn terminate(child: &mut Child, command: &str) {
    if let Err(e) = child.kill().await {
        log::warn!("Failed to kill '{}': {}", command, e);
    }
}
