//! Progress reporting for ensemble verification

use colored::Colorize;
use ensemble_application::ports::progress::VerificationProgress;
use ensemble_domain::VerificationPhase;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;

/// Reports verification progress with a progress bar over the panel
pub struct ProgressReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn panel_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn phase_display_name(phase: VerificationPhase) -> &'static str {
        match phase {
            VerificationPhase::Idle => "Idle",
            VerificationPhase::PanelAssembled => "Panel assembled",
            VerificationPhase::Executing => "Executing panel",
            VerificationPhase::SafetyEvaluated => "Safety checks",
            VerificationPhase::Accepted => "Accepted",
            VerificationPhase::Rejected => "Rejected",
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl VerificationProgress for ProgressReporter {
    fn on_phase(&self, phase: VerificationPhase, panel_size: usize) {
        let Ok(mut slot) = self.bar.lock() else {
            return;
        };

        match phase {
            VerificationPhase::Executing => {
                let pb = ProgressBar::new(panel_size as u64);
                pb.set_style(Self::panel_style());
                pb.set_prefix(Self::phase_display_name(phase));
                pb.set_message("Starting...");
                *slot = Some(pb);
            }
            VerificationPhase::SafetyEvaluated => {
                if let Some(pb) = slot.take() {
                    pb.finish_with_message(format!("{}", "panel settled".green()));
                }
            }
            VerificationPhase::Accepted | VerificationPhase::Rejected => {
                if let Some(pb) = slot.take() {
                    pb.finish_and_clear();
                }
            }
            VerificationPhase::Idle | VerificationPhase::PanelAssembled => {}
        }
    }

    fn on_member_complete(&self, model_id: &str, success: bool) {
        if let Ok(slot) = self.bar.lock()
            && let Some(pb) = slot.as_ref()
        {
            let status = if success {
                format!("{} {}", "v".green(), model_id)
            } else {
                format!("{} {}", "x".red(), model_id)
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl VerificationProgress for SimpleProgress {
    fn on_phase(&self, phase: VerificationPhase, panel_size: usize) {
        let name = ProgressReporter::phase_display_name(phase);
        match phase {
            VerificationPhase::Accepted => eprintln!("{} {}", "->".cyan(), name.green().bold()),
            VerificationPhase::Rejected => eprintln!("{} {}", "->".cyan(), name.red().bold()),
            _ => eprintln!("{} {} ({} models)", "->".cyan(), name.bold(), panel_size),
        }
    }

    fn on_member_complete(&self, model_id: &str, success: bool) {
        if success {
            eprintln!("  {} {}", "v".green(), model_id);
        } else {
            eprintln!("  {} {} (failed)", "x".red(), model_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reporter_tracks_panel() {
        let reporter = ProgressReporter::new();
        reporter.on_phase(VerificationPhase::PanelAssembled, 2);
        reporter.on_phase(VerificationPhase::Executing, 2);
        reporter.on_member_complete("a", true);
        reporter.on_member_complete("b", false);

        let position = reporter
            .bar
            .lock()
            .unwrap()
            .as_ref()
            .map(|pb| pb.position());
        assert_eq!(position, Some(2));

        reporter.on_phase(VerificationPhase::SafetyEvaluated, 2);
        assert!(reporter.bar.lock().unwrap().is_none());
    }

    #[test]
    fn test_member_before_execution_is_ignored() {
        let reporter = ProgressReporter::default();
        reporter.on_member_complete("a", true);
        reporter.on_phase(VerificationPhase::Rejected, 0);
        assert!(reporter.bar.lock().unwrap().is_none());
    }
}
