use std::io::ErrorKind;
use std::path::Path;
use std::time::Instant;

use super::targets::{
    CleanupTarget, Gate, Privilege, StepWhen, SweepReport, SweepResult, TargetKind, ToolStep,
};
use super::walker;
use crate::common::config::RunConfig;
use crate::common::errors::SweepError;
use crate::common::safety;
use crate::tools::ToolProbe;

/// Hooks for narrating a sweep as it happens
pub trait SweepObserver {
    fn target_started(&self, _target: &CleanupTarget) {}
    fn target_finished(&self, _result: &SweepResult) {}
}

/// Observer that says nothing
pub struct Silent;

impl SweepObserver for Silent {}

/// Runs cleanup targets one after another.
///
/// Nothing a single target does can stop the sweep: unmet preconditions
/// skip the target, and per-path or per-tool failures are recorded on its
/// result. Every target is idempotent, so an interrupted sweep can simply
/// be run again.
pub struct TargetSweeper<'a> {
    tools: &'a dyn ToolProbe,
    config: &'a RunConfig,
    observer: &'a dyn SweepObserver,
}

impl<'a> TargetSweeper<'a> {
    pub fn new(tools: &'a dyn ToolProbe, config: &'a RunConfig) -> Self {
        Self {
            tools,
            config,
            observer: &Silent,
        }
    }

    pub fn with_observer(mut self, observer: &'a dyn SweepObserver) -> Self {
        self.observer = observer;
        self
    }

    /// Run every target in declared order
    pub fn run_all(&self, targets: &[CleanupTarget]) -> SweepReport {
        let started_at = chrono::Utc::now();
        let start = Instant::now();

        let results = targets.iter().map(|t| self.run_target(t)).collect();

        SweepReport {
            started_at,
            duration_secs: start.elapsed().as_secs_f64(),
            results,
        }
    }

    /// Run one target through Pending -> Skipped, or Pending -> Running ->
    /// Completed / PartiallyFailed
    pub fn run_target(&self, target: &CleanupTarget) -> SweepResult {
        let mut result = SweepResult::pending(&target.name);

        if let Some(gate) = &target.precondition {
            if !self.gate_open(gate) {
                tracing::debug!(name = %target.name, ?gate, "precondition unmet, skipping");
                result.skip();
                return result;
            }
        }

        if let TargetKind::ToolCommand { tool, .. } = &target.kind {
            if !self.tools.present(tool) {
                tracing::debug!(name = %target.name, tool = %tool, "tool not installed, skipping");
                result.skip();
                return result;
            }
        }

        result.start();
        self.observer.target_started(target);

        match &target.kind {
            TargetKind::PathSet { paths, privilege } => {
                self.sweep_paths(paths, *privilege, &mut result)
            }
            TargetKind::ToolCommand { steps, .. } => self.run_steps(steps, &mut result),
        }

        for e in &result.errors {
            tracing::warn!(name = %target.name, "{}", e);
        }

        result.finish();
        self.observer.target_finished(&result);
        result
    }

    fn gate_open(&self, gate: &Gate) -> bool {
        match gate {
            Gate::DirExists(pattern) => {
                walker::expand_paths(std::slice::from_ref(pattern), &self.config.home)
                    .iter()
                    .any(|p| p.is_dir())
            }
            Gate::ToolPresent(tool) => self.tools.present(tool),
        }
    }

    fn sweep_paths(&self, patterns: &[String], privilege: Privilege, result: &mut SweepResult) {
        let mut freed = Some(0u64);

        for path in walker::expand_paths(patterns, &self.config.home) {
            let meta = match std::fs::symlink_metadata(&path) {
                Ok(m) => m,
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    tracing::debug!("nothing at {}", path.display());
                    continue;
                }
                Err(e) => {
                    result.errors.push(SweepError::io(&path, e));
                    continue;
                }
            };

            if safety::is_protected(&path, &self.config.home) {
                result.errors.push(SweepError::Protected { path });
                continue;
            }

            let before = walker::path_size(&path);
            let errors = match privilege {
                Privilege::User => walker::remove_contents(&path),
                Privilege::Elevated => self.remove_elevated(&path, meta.is_dir()),
            };
            let after = walker::path_size(&path).unwrap_or(0);

            freed = match (freed, before) {
                (Some(total), Some(b)) => Some(total + b.saturating_sub(after)),
                _ => None,
            };

            tracing::debug!(
                path = %path.display(),
                before = ?before,
                after,
                errors = errors.len(),
                "swept path"
            );
            result.errors.extend(errors);
        }

        result.bytes_freed = freed;
    }

    fn remove_elevated(&self, path: &Path, is_dir: bool) -> Vec<SweepError> {
        let (program, args) = if is_dir {
            ("find", walker::elevated_contents_args(path))
        } else {
            ("rm", walker::elevated_file_args(path))
        };

        match self.tools.invoke(program, &args, Privilege::Elevated) {
            Ok(exit) if exit.success() => Vec::new(),
            Ok(exit) => vec![SweepError::ToolFailed {
                tool: format!("{} {}", program, path.display()),
                code: exit.code,
            }],
            Err(e) => vec![e],
        }
    }

    fn run_steps(&self, steps: &[ToolStep], result: &mut SweepResult) {
        for step in steps {
            if step.when == StepWhen::OnUpdate && !self.config.update {
                continue;
            }

            match self.tools.invoke(&step.program, &step.args, step.privilege) {
                Ok(exit) if exit.success() => {}
                Ok(exit) => {
                    result.errors.push(SweepError::ToolFailed {
                        tool: step.program.clone(),
                        code: exit.code,
                    });
                    break;
                }
                Err(e) => {
                    result.errors.push(e);
                    break;
                }
            }
        }
    }
}
