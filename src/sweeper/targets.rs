use chrono::{DateTime, Utc};

use crate::common::errors::SweepError;
pub use crate::tools::Privilege;

// ─── Target definitions ───────────────────────────────────────────────────────

/// Precondition that must hold before a target runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gate {
    /// Some expansion of the pattern is an existing directory
    DirExists(String),
    /// The named executable is on the search path
    ToolPresent(String),
}

/// When a tool step runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepWhen {
    Always,
    /// Only when the operator asked for package-manager updates
    OnUpdate,
}

/// One external command within a tool target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolStep {
    pub program: String,
    pub args: Vec<String>,
    pub privilege: Privilege,
    pub when: StepWhen,
}

impl ToolStep {
    pub fn user(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            privilege: Privilege::User,
            when: StepWhen::Always,
        }
    }

    pub fn elevated(program: &str, args: &[&str]) -> Self {
        Self {
            privilege: Privilege::Elevated,
            ..Self::user(program, args)
        }
    }

    pub fn on_update(mut self) -> Self {
        self.when = StepWhen::OnUpdate;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetKind {
    /// Filesystem locations (`~` and glob patterns). Directories have their
    /// contents removed, files are removed outright.
    PathSet {
        paths: Vec<String>,
        privilege: Privilege,
    },
    /// Native cleanup subcommands of `tool`, implicitly gated on its presence
    ToolCommand { tool: String, steps: Vec<ToolStep> },
}

/// A named unit of cleanup work
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupTarget {
    pub name: String,
    pub kind: TargetKind,
    pub precondition: Option<Gate>,
}

impl CleanupTarget {
    pub fn paths(name: &str, privilege: Privilege, paths: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            kind: TargetKind::PathSet {
                paths: paths.iter().map(|p| p.to_string()).collect(),
                privilege,
            },
            precondition: None,
        }
    }

    pub fn tool(name: &str, tool: &str, steps: Vec<ToolStep>) -> Self {
        Self {
            name: name.to_string(),
            kind: TargetKind::ToolCommand {
                tool: tool.to_string(),
                steps,
            },
            precondition: None,
        }
    }

    /// Gate this target on `gate`
    pub fn when(mut self, gate: Gate) -> Self {
        self.precondition = Some(gate);
        self
    }

    pub fn when_dir(self, pattern: &str) -> Self {
        self.when(Gate::DirExists(pattern.to_string()))
    }

    pub fn when_tool(self, tool: &str) -> Self {
        self.when(Gate::ToolPresent(tool.to_string()))
    }
}

// ─── Results ──────────────────────────────────────────────────────────────────

/// Lifecycle of a single target within one sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetState {
    Pending,
    Running,
    Skipped,
    Completed,
    PartiallyFailed,
}

impl std::fmt::Display for TargetState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetState::Pending => write!(f, "pending"),
            TargetState::Running => write!(f, "running"),
            TargetState::Skipped => write!(f, "skipped"),
            TargetState::Completed => write!(f, "completed"),
            TargetState::PartiallyFailed => write!(f, "partially failed"),
        }
    }
}

/// Outcome of one target
#[derive(Debug)]
pub struct SweepResult {
    pub name: String,
    pub state: TargetState,
    pub attempted: bool,
    /// `None` when the size could not be measured (always for tool targets)
    pub bytes_freed: Option<u64>,
    pub errors: Vec<SweepError>,
}

impl SweepResult {
    pub fn pending(name: &str) -> Self {
        Self {
            name: name.to_string(),
            state: TargetState::Pending,
            attempted: false,
            bytes_freed: None,
            errors: Vec::new(),
        }
    }

    pub fn skip(&mut self) {
        debug_assert_eq!(self.state, TargetState::Pending);
        self.state = TargetState::Skipped;
    }

    pub fn start(&mut self) {
        debug_assert_eq!(self.state, TargetState::Pending);
        self.state = TargetState::Running;
        self.attempted = true;
    }

    pub fn finish(&mut self) {
        debug_assert_eq!(self.state, TargetState::Running);
        self.state = if self.errors.is_empty() {
            TargetState::Completed
        } else {
            TargetState::PartiallyFailed
        };
    }
}

/// Everything one sweep produced
#[derive(Debug)]
pub struct SweepReport {
    pub started_at: DateTime<Utc>,
    pub duration_secs: f64,
    pub results: Vec<SweepResult>,
}

impl SweepReport {
    pub fn attempted(&self) -> impl Iterator<Item = &SweepResult> {
        self.results.iter().filter(|r| r.attempted)
    }

    pub fn skipped_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.state == TargetState::Skipped)
            .count()
    }

    pub fn error_count(&self) -> usize {
        self.results.iter().map(|r| r.errors.len()).sum()
    }

    /// Sum of per-target measurements, ignoring targets that could not be
    /// measured
    pub fn measured_bytes(&self) -> u64 {
        self.results.iter().filter_map(|r| r.bytes_freed).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders() {
        let t = CleanupTarget::paths("Gradle", Privilege::User, &["~/.gradle/caches"])
            .when_dir("~/.gradle/caches");
        assert_eq!(
            t.precondition,
            Some(Gate::DirExists("~/.gradle/caches".into()))
        );

        let step = ToolStep::user("brew", &["update"]).on_update();
        assert_eq!(step.when, StepWhen::OnUpdate);
        assert_eq!(step.privilege, Privilege::User);
        assert_eq!(step.args, vec!["update".to_string()]);

        let step = ToolStep::elevated("purge", &[]);
        assert_eq!(step.privilege, Privilege::Elevated);
        assert_eq!(step.when, StepWhen::Always);
    }

    #[test]
    fn test_result_transitions() {
        let mut r = SweepResult::pending("a");
        r.skip();
        assert_eq!(r.state, TargetState::Skipped);
        assert!(!r.attempted);

        let mut r = SweepResult::pending("b");
        r.start();
        r.finish();
        assert_eq!(r.state, TargetState::Completed);
        assert!(r.attempted);

        let mut r = SweepResult::pending("c");
        r.start();
        r.errors.push(SweepError::ToolFailed {
            tool: "npm".into(),
            code: Some(1),
        });
        r.finish();
        assert_eq!(r.state, TargetState::PartiallyFailed);
    }

    #[test]
    fn test_report_totals() {
        let mut a = SweepResult::pending("a");
        a.start();
        a.bytes_freed = Some(100);
        a.finish();

        let mut b = SweepResult::pending("b");
        b.start();
        b.errors.push(SweepError::ToolFailed {
            tool: "gem".into(),
            code: Some(2),
        });
        b.finish();

        let mut c = SweepResult::pending("c");
        c.skip();

        let report = SweepReport {
            started_at: Utc::now(),
            duration_secs: 0.1,
            results: vec![a, b, c],
        };
        assert_eq!(report.attempted().count(), 2);
        assert_eq!(report.skipped_count(), 1);
        assert_eq!(report.error_count(), 1);
        assert_eq!(report.measured_bytes(), 100);
    }
}
