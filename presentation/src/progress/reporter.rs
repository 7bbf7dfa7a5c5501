//! Progress reporting for council execution

use colored::Colorize;
use council_application::ProgressNotifier;
use council_domain::Stage;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Mutex;

/// Reports progress during council execution with progress bars
pub struct ProgressReporter {
    multi: MultiProgress,
    stage_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            stage_bar: Mutex::new(None),
        }
    }

    fn stage_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn stage_short_name(stage: Stage) -> &'static str {
        match stage {
            Stage::Independent => "Stage 1",
            Stage::PeerReview => "Stage 2",
            Stage::Synthesis => "Stage 3",
        }
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.stage_bar.lock()
            && let Some(pb) = guard.as_ref()
        {
            f(pb);
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_stage_start(&self, stage: Stage, total_tasks: usize) {
        let pb = self.multi.add(ProgressBar::new(total_tasks as u64));
        pb.set_style(Self::stage_style());
        pb.set_prefix(stage.display_name().to_string());
        pb.set_message("Starting...");

        if let Ok(mut guard) = self.stage_bar.lock() {
            *guard = Some(pb);
        }
    }

    fn on_task_complete(&self, _stage: Stage, model: &str, success: bool) {
        self.with_bar(|pb| {
            let status = if success {
                format!("{} {}", "v".green(), model)
            } else {
                format!("{} {}", "x".red(), model)
            };
            pb.set_message(status);
            pb.inc(1);
        });
    }

    fn on_stage_complete(&self, stage: Stage) {
        if let Ok(mut guard) = self.stage_bar.lock()
            && let Some(pb) = guard.take()
        {
            pb.finish_with_message(format!("{} complete!", Self::stage_short_name(stage).green()));
        }
    }

    fn on_stage_skipped(&self, stage: Stage, reason: &str) {
        let _ = self.multi.println(format!(
            "{} {} skipped: {}",
            "-".dimmed(),
            stage.display_name(),
            reason
        ));
    }

    fn on_chairman_selected(&self, model: &str) {
        let _ = self
            .multi
            .println(format!("{} {}", "Chairman:".cyan().bold(), model));
    }

    fn on_round_start(&self, round: usize, total_rounds: usize) {
        let _ = self
            .multi
            .println(format!("{}", format!("Round {}/{}", round, total_rounds).bold()));
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_stage_start(&self, stage: Stage, total_tasks: usize) {
        eprintln!(
            "{} {} ({} tasks)",
            "->".cyan(),
            stage.display_name().bold(),
            total_tasks
        );
    }

    fn on_task_complete(&self, _stage: Stage, model: &str, success: bool) {
        if success {
            eprintln!("  {} {}", "v".green(), model);
        } else {
            eprintln!("  {} {} (failed)", "x".red(), model);
        }
    }

    fn on_stage_complete(&self, _stage: Stage) {
        eprintln!();
    }

    fn on_stage_skipped(&self, stage: Stage, reason: &str) {
        eprintln!("{} {} skipped: {}", "-".dimmed(), stage.display_name(), reason);
    }

    fn on_chairman_selected(&self, model: &str) {
        eprintln!("{} {}", "Chairman:".cyan().bold(), model);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reporter_tracks_one_stage_at_a_time() {
        let reporter = ProgressReporter::new();
        reporter.on_stage_start(Stage::Independent, 2);
        reporter.on_task_complete(Stage::Independent, "gpt", true);
        reporter.on_task_complete(Stage::Independent, "gemini", false);

        {
            let guard = reporter.stage_bar.lock().unwrap();
            assert_eq!(guard.as_ref().unwrap().position(), 2);
        }

        reporter.on_stage_complete(Stage::Independent);
        assert!(reporter.stage_bar.lock().unwrap().is_none());

        // Events without an active stage are ignored
        reporter.on_task_complete(Stage::PeerReview, "gpt", true);
        reporter.on_stage_complete(Stage::PeerReview);
    }

    #[test]
    fn test_short_names() {
        assert_eq!(ProgressReporter::stage_short_name(Stage::Synthesis), "Stage 3");
    }
}
