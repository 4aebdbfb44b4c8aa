//! # Kodegen Git Runner
//!
//! Non-blocking git automation by driving the `git` executable as a subprocess.
//!
//! This crate gives build tools, bots and pipelines a typed, async surface
//! over a working directory without hand-rolled subprocess plumbing.
//!
//! ## Features
//!
//! - **Async Process Runner**: Spawns children with tokio, drains stdout and
//!   stderr concurrently, and never blocks the runtime
//! - **Typed Failures**: Spawn, I/O and non-zero-exit failures are distinct
//!   [`GitError`] variants carrying git's own stderr
//! - **Cancellation**: Dropping a call or cancelling its token kills the child
//! - **Stateless Handles**: [`Repository`] caches nothing; git owns the state
//!
//! ## Usage
//!
//! ```no_run
//! use kodegen_git_runner::{GitOperations, Repository, StageTarget};
//!
//! # async fn example() -> kodegen_git_runner::Result<()> {
//! let repo = Repository::new("/srv/checkouts/site")?;
//! repo.init().await?;
//! repo.stage(StageTarget::All).await?;
//! let commit = repo.commit("initial commit").await?;
//! println!("created {}", commit.short_hash);
//!
//! let log = repo.run(["log", "--oneline"]).await?;
//! assert!(log.success());
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod error;
pub mod git;
pub mod process;

pub use error::{GitError, Result};
pub use git::{
    CommitInfo, CommitOptions, FileStatus, GitConfig, GitOperations, InitOptions, PushOptions,
    Repository, StageTarget, StatusEntry,
};
pub use process::{CommandInvocation, CommandResult, ProcessRunner, RunnerConfig};
pub use tokio_util::sync::CancellationToken;
