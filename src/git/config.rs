//! Configuration for Git operations.

/// Configuration for Git operations
#[derive(Debug, Clone)]
pub struct GitConfig {
    /// Executable to run, looked up on `PATH` unless it contains a path separator
    pub program: String,
    /// Default remote name for push operations
    pub default_remote: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            program: "git".to_string(),
            default_remote: "origin".to_string(),
        }
    }
}
