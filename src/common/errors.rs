use std::path::PathBuf;

/// Typed errors for sweep operations.
/// The binary reports these through `anyhow`; only `Authorization` ever
/// aborts a run. Everything else is recorded on a
/// `SweepResult` and the sweep moves on.
#[derive(Debug, thiserror::Error)]
pub enum SweepError {
    /// Elevated credentials were declined or could not be obtained
    #[error("Authorization failed: {message}")]
    Authorization { message: String },

    /// Free-space query failed
    #[error("Could not measure free space on '{}': {message}", .root.display())]
    Measurement { root: PathBuf, message: String },

    /// File system operation failed on a single path
    #[error("I/O error at '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A pattern resolved to a path that must never be wiped
    #[error("Refusing to clean protected path: '{}'", .path.display())]
    Protected { path: PathBuf },

    /// External tool could not be started
    #[error("Failed to run '{tool}': {source}")]
    ToolSpawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// External tool ran but exited unsuccessfully
    #[error("'{tool}' exited with {}", describe_code(.code))]
    ToolFailed { tool: String, code: Option<i32> },
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("status {}", c),
        None => "a signal".to_string(),
    }
}

impl SweepError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SweepError::Io {
            path: path.into(),
            source,
        }
    }
}
