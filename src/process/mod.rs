//! Subprocess execution layer.
//!
//! Spawns external tools with `tokio::process`, captures their output
//! streams in full and reports exit status as data. Everything in
//! [`crate::git`] is built on this module.

mod config;
mod invocation;
mod runner;

pub use config::RunnerConfig;
pub use invocation::{CommandInvocation, CommandResult};
pub use runner::ProcessRunner;
