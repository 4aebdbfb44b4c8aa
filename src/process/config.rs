//! Configuration for the process runner.

use std::time::Duration;

/// Configuration applied to every child process a [`ProcessRunner`] spawns.
///
/// [`ProcessRunner`]: super::ProcessRunner
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Environment variables set on every child, in addition to the inherited environment
    pub env: Vec<(String, String)>,
    /// Deadline for a single invocation; `None` waits indefinitely
    pub timeout: Option<Duration>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            // Never block on an interactive credential prompt
            env: vec![("GIT_TERMINAL_PROMPT".to_string(), "0".to_string())],
            timeout: None,
        }
    }
}

impl RunnerConfig {
    /// Set (or override) an environment variable for every child
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        self.env.retain(|(existing, _)| *existing != key);
        self.env.push((key, value.into()));
        self
    }

    /// Value configured for `key`, if any
    pub fn env_value(&self, key: &str) -> Option<&str> {
        self.env
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value.as_str())
    }

    /// Kill children that run longer than `timeout`
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
