//! Shared fixtures for integration tests.

#![allow(dead_code)]

use kodegen_git_runner::{ProcessRunner, Repository, RunnerConfig};
use std::path::Path;
use tempfile::TempDir;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Runner isolated from the user's git configuration, with a fixed identity
pub fn isolated_runner(ceiling: &Path) -> ProcessRunner {
    let config = RunnerConfig::default()
        .env("GIT_CONFIG_GLOBAL", "/dev/null")
        .env("GIT_CONFIG_NOSYSTEM", "1")
        .env("GIT_AUTHOR_NAME", "Kodegen Test")
        .env("GIT_AUTHOR_EMAIL", "test@kodegen.ai")
        .env("GIT_COMMITTER_NAME", "Kodegen Test")
        .env("GIT_COMMITTER_EMAIL", "test@kodegen.ai")
        // Keep git from discovering a repository above the temp dir
        .env("GIT_CEILING_DIRECTORIES", ceiling.to_string_lossy());
    ProcessRunner::with_config(config)
}

/// Handle bound to `path`, isolated as in [`isolated_runner`]
pub fn repository_at(path: &Path) -> Repository {
    let ceiling = path.parent().unwrap_or(Path::new("/"));
    Repository::with_runner(path, isolated_runner(ceiling)).unwrap()
}

/// Fresh empty directory plus a handle bound to it
pub fn empty_repository() -> (TempDir, Repository) {
    let dir = TempDir::new().unwrap();
    let repo = repository_at(dir.path());
    (dir, repo)
}

pub fn write_file(dir: &Path, name: &str, contents: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, contents).unwrap();
}

/// Number of live processes with `marker` as one of their arguments
#[cfg(target_os = "linux")]
pub fn processes_with_arg(marker: &str) -> usize {
    let Ok(entries) = std::fs::read_dir("/proc") else {
        return 0;
    };
    entries
        .filter_map(Result::ok)
        .filter(|entry| {
            entry
                .file_name()
                .to_string_lossy()
                .chars()
                .all(|c| c.is_ascii_digit())
        })
        // Zombies report an empty cmdline, so only running processes match
        .filter_map(|entry| std::fs::read(entry.path().join("cmdline")).ok())
        .filter(|cmdline| cmdline.split(|&b| b == 0).any(|arg| arg == marker.as_bytes()))
        .count()
}
