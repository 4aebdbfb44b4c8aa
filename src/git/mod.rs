//! Git repository operations over the `git` command-line tool.
//!
//! [`GitOperations`] declares the curated operation set; [`Repository`]
//! implements it by building argument vectors and running them through a
//! [`ProcessRunner`](crate::process::ProcessRunner).

mod config;
mod history;
mod operations;
mod repository;
mod status;

pub use config::GitConfig;
pub use operations::{
    CommitInfo, CommitOptions, GitOperations, InitOptions, PushOptions, StageTarget,
};
pub use repository::Repository;
pub use status::{FileStatus, StatusEntry};
