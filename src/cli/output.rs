use colored::*;

use crate::common::format::{self, format_optional_size};
use crate::space::{SpaceMeter, SpaceSample};
use crate::sweeper::{CleanupTarget, SweepObserver, SweepReport, SweepResult, TargetState};

/// Renders status lines on stderr and the final result on stdout.
/// Color is decided once by the caller and never re-checked.
#[derive(Debug, Clone, Copy)]
pub struct Reporter {
    color: bool,
    verbose: bool,
}

impl Reporter {
    pub fn new(color: bool, verbose: bool) -> Self {
        Self { color, verbose }
    }

    fn paint(&self, s: &str, style: fn(&str) -> ColoredString) -> String {
        if self.color {
            style(s).to_string()
        } else {
            s.to_string()
        }
    }

    pub fn step_line(&self, msg: &str) -> String {
        format!("{} {}", self.paint("==>", |s| s.blue().bold()), msg)
    }

    pub fn warn_line(&self, msg: &str) -> String {
        format!("{} {}", self.paint("warning:", |s| s.yellow().bold()), msg)
    }

    pub fn error_line(&self, msg: &str) -> String {
        format!("{} {}", self.paint("error:", |s| s.red().bold()), msg)
    }

    pub fn success_line(&self, reclaimed: &str) -> String {
        format!(
            "{} Success! Freed up {} of space",
            self.paint("✓", |s| s.green().bold()),
            self.paint(reclaimed, |s| s.cyan())
        )
    }

    /// One-line phase status
    pub fn step(&self, msg: &str) {
        eprintln!("{}", self.step_line(msg));
    }

    pub fn warn(&self, msg: &str) {
        eprintln!("{}", self.warn_line(msg));
    }

    pub fn error(&self, msg: &str) {
        eprintln!("{}", self.error_line(msg));
    }

    /// Announce and take a free-space sample. A failed sample is only a
    /// warning; the reclaimed figure then reads `unknown`.
    pub fn sample_space(&self, meter: &SpaceMeter) -> Option<SpaceSample> {
        self.step(&format!("Measuring free space on {}...", meter.root().display()));
        match meter.sample() {
            Ok(s) => Some(s),
            Err(e) => {
                self.warn(&format!("{}; reclaimed space will be unknown", e));
                None
            }
        }
    }

    /// Final line, on stdout
    pub fn success(&self, reclaimed: &str) {
        println!("{}", self.success_line(reclaimed));
    }

    /// Per-target table for every target that actually ran
    pub fn summary_lines(&self, report: &SweepReport) -> Vec<String> {
        let mut lines = Vec::new();
        lines.push(self.paint(&"─".repeat(60), |s| s.dimmed()));

        for result in report.attempted() {
            lines.push(self.result_line(result));
            if self.verbose {
                for e in &result.errors {
                    lines.push(format!("      {} {}", self.paint("→", |s| s.dimmed()), e));
                }
            }
        }

        lines.push(self.paint(&"─".repeat(60), |s| s.dimmed()));
        lines.push(format!(
            "  {} targets run, {} skipped, {} problems in {}",
            report.attempted().count(),
            report.skipped_count(),
            report.error_count(),
            format::format_duration(report.duration_secs)
        ));
        lines
    }

    fn result_line(&self, result: &SweepResult) -> String {
        let marker = match result.state {
            TargetState::Completed => self.paint("●", |s| s.green()),
            TargetState::PartiallyFailed => self.paint("●", |s| s.yellow()),
            _ => self.paint("○", |s| s.dimmed()),
        };
        let problems = if result.errors.is_empty() {
            String::new()
        } else {
            format!("  ({} problems)", result.errors.len())
        };
        format!(
            "  {} {:<40} {:>12}{}",
            marker,
            format::truncate(&result.name, 40),
            format_optional_size(result.bytes_freed),
            problems
        )
    }

    pub fn print_summary(&self, report: &SweepReport) {
        for line in self.summary_lines(report) {
            eprintln!("{}", line);
        }
    }
}

impl SweepObserver for Reporter {
    fn target_started(&self, target: &CleanupTarget) {
        self.step(&format!("Cleaning {}...", target.name));
    }

    fn target_finished(&self, result: &SweepResult) {
        if !result.errors.is_empty() {
            self.warn(&format!(
                "{}: {} of its paths or steps failed",
                result.name,
                result.errors.len()
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::errors::SweepError;

    fn report() -> SweepReport {
        let mut done = SweepResult::pending("User Caches");
        done.start();
        done.bytes_freed = Some(1536);
        done.finish();

        let mut partial = SweepResult::pending("Docker");
        partial.start();
        partial.errors.push(SweepError::ToolFailed {
            tool: "docker".into(),
            code: Some(1),
        });
        partial.finish();

        let mut skipped = SweepResult::pending("Gradle Cache");
        skipped.skip();

        SweepReport {
            started_at: chrono::Utc::now(),
            duration_secs: 2.5,
            results: vec![done, partial, skipped],
        }
    }

    #[test]
    fn test_plain_lines_have_no_escape_codes() {
        let r = Reporter::new(false, false);
        assert_eq!(r.step_line("Emptying trash"), "==> Emptying trash");
        assert_eq!(r.warn_line("x"), "warning: x");
        assert_eq!(r.error_line("x"), "error: x");
        assert_eq!(
            r.success_line("1.50 KiB"),
            "✓ Success! Freed up 1.50 KiB of space"
        );
    }

    #[test]
    fn test_summary_lists_only_attempted_targets() {
        let r = Reporter::new(false, false);
        let lines = r.summary_lines(&report());
        let body = lines.join("\n");
        assert!(body.contains("User Caches"));
        assert!(body.contains("1.50 KiB"));
        assert!(body.contains("Docker"));
        assert!(body.contains("(1 problems)"));
        assert!(!body.contains("Gradle Cache"));
        assert!(body.contains("2 targets run, 1 skipped, 1 problems in 2.5s"));
        // Tool targets cannot be measured
        assert!(lines.iter().any(|l| l.contains("Docker") && l.contains('?')));
    }

    #[test]
    fn test_verbose_summary_lists_errors() {
        let r = Reporter::new(false, true);
        let body = r.summary_lines(&report()).join("\n");
        assert!(body.contains("'docker' exited with status 1"));
    }

    #[test]
    fn test_sample_space_degrades_to_none() {
        let r = Reporter::new(false, false);
        assert!(r.sample_space(&SpaceMeter::new("/")).is_some());
        assert!(r
            .sample_space(&SpaceMeter::new("/definitely/not/mounted/here"))
            .is_none());
    }
}
