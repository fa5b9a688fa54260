use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::common::errors::SweepError;

/// Whether an operation runs as the invoking user or through the elevated
/// session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Privilege {
    User,
    Elevated,
}

/// Exit status of an external tool, reduced to what the sweep looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolExit {
    /// `None` when the process was killed by a signal
    pub code: Option<i32>,
}

impl ToolExit {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Presence check and invocation of external command-line tools.
///
/// Every concrete tool (package manager, container engine, ...) is just a
/// program name handed to this trait; nothing else in the crate spawns
/// processes for cleanup work.
pub trait ToolProbe {
    /// Whether `tool` resolves to an executable. Never fails.
    fn present(&self, tool: &str) -> bool;

    /// Run `program args..`, discarding its output
    fn invoke(
        &self,
        program: &str,
        args: &[String],
        privilege: Privilege,
    ) -> Result<ToolExit, SweepError>;
}

/// Resolves tools with `which` and runs them for real.
/// Elevated invocations go through `sudo -n`, relying on the credentials
/// cached by the privilege session.
#[derive(Debug, Clone, Default)]
pub struct SystemTools {
    /// `None` searches the process `PATH`
    search_path: Option<Vec<PathBuf>>,
}

impl SystemTools {
    /// Search the process `PATH`
    pub fn from_env() -> Self {
        Self { search_path: None }
    }

    /// Search only `search_path`, in order
    pub fn with_search_path(search_path: Vec<PathBuf>) -> Self {
        Self {
            search_path: Some(search_path),
        }
    }

    /// Full path of `tool` if it resolves to an executable
    pub fn resolve(&self, tool: &str) -> Option<PathBuf> {
        let Some(dirs) = &self.search_path else {
            return which::which(tool).ok();
        };
        if dirs.is_empty() && !tool.contains('/') {
            return None;
        }
        let paths = std::env::join_paths(dirs).ok()?;
        let cwd = std::env::current_dir().ok()?;
        which::which_in(tool, Some(paths), cwd).ok()
    }
}

impl ToolProbe for SystemTools {
    fn present(&self, tool: &str) -> bool {
        self.resolve(tool).is_some()
    }

    fn invoke(
        &self,
        program: &str,
        args: &[String],
        privilege: Privilege,
    ) -> Result<ToolExit, SweepError> {
        let mut cmd = match privilege {
            Privilege::User => Command::new(program),
            Privilege::Elevated => {
                let mut c = Command::new("sudo");
                c.arg("-n").arg(program);
                c
            }
        };

        tracing::debug!(program, ?args, ?privilege, "invoking tool");

        let status = cmd
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|source| SweepError::ToolSpawn {
                tool: program.to_string(),
                source,
            })?;

        Ok(ToolExit {
            code: status.code(),
        })
    }
}
