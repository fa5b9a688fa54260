pub mod catalog;
pub mod engine;
pub mod targets;
pub mod walker;

pub use catalog::default_targets;
pub use engine::{Silent, SweepObserver, TargetSweeper};
pub use targets::{
    CleanupTarget, Gate, Privilege, StepWhen, SweepReport, SweepResult, TargetKind, TargetState,
    ToolStep,
};
