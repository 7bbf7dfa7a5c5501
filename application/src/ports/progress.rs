//! Progress notification port
//!
//! Defines the interface for reporting progress during a deliberation.

use council_domain::Stage;

/// Callback for progress updates during a deliberation
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (progress bars, plain log lines, nothing).
pub trait ProgressNotifier: Send + Sync {
    /// Called when a stage starts
    fn on_stage_start(&self, stage: Stage, total_tasks: usize);

    /// Called when one backend finishes within a stage
    fn on_task_complete(&self, stage: Stage, model: &str, success: bool);

    /// Called when a stage completes
    fn on_stage_complete(&self, stage: Stage);

    /// Called instead of start/complete when a stage does not run
    fn on_stage_skipped(&self, _stage: Stage, _reason: &str) {}

    /// Called once the chairman is known
    fn on_chairman_selected(&self, _model: &str) {}

    /// Called before each debate round (1-based)
    fn on_round_start(&self, _round: usize, _total_rounds: usize) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_stage_start(&self, _stage: Stage, _total_tasks: usize) {}
    fn on_task_complete(&self, _stage: Stage, _model: &str, _success: bool) {}
    fn on_stage_complete(&self, _stage: Stage) {}
}
