//! Progress notification port
//!
//! Defines the interface for reporting progress during a verification.

use ensemble_domain::VerificationPhase;

/// Callback for progress updates during ensemble verification
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (console, progress bars, etc.)
pub trait VerificationProgress: Send + Sync {
    /// Called when the verification enters a new phase
    fn on_phase(&self, phase: VerificationPhase, panel_size: usize);

    /// Called when a panel member settles
    fn on_member_complete(&self, model_id: &str, success: bool);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl VerificationProgress for NoProgress {
    fn on_phase(&self, _phase: VerificationPhase, _panel_size: usize) {}
    fn on_member_complete(&self, _model_id: &str, _success: bool) {}
}
