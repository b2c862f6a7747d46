//! Verification parameters.
//!
//! Controls quorum size, agreement threshold, the similarity comparator and
//! the per-member execution timeout.

use ensemble_domain::verification::consensus::{DEFAULT_AGREEMENT_THRESHOLD, DEFAULT_QUORUM_SIZE};
use ensemble_domain::{QuorumGate, SimilarityKind};
use std::time::Duration;

/// Default per-member timeout, in seconds.
pub const DEFAULT_MEMBER_TIMEOUT_SECS: u64 = 120;

/// Verifier behavior configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct VerificationParams {
    /// Successful members required for destructive operations.
    pub quorum_size: usize,
    /// Panel members to assemble. Never below the quorum size.
    pub panel_size: Option<usize>,
    /// Minimum agreement score for destructive operations.
    pub agreement_threshold: f64,
    /// Maximum time a single member may take. `None` waits indefinitely.
    pub member_timeout: Option<Duration>,
    /// Pairwise comparator used for agreement.
    pub similarity: SimilarityKind,
}

impl Default for VerificationParams {
    fn default() -> Self {
        Self {
            quorum_size: DEFAULT_QUORUM_SIZE,
            panel_size: None,
            agreement_threshold: DEFAULT_AGREEMENT_THRESHOLD,
            member_timeout: Some(Duration::from_secs(DEFAULT_MEMBER_TIMEOUT_SECS)),
            similarity: SimilarityKind::default(),
        }
    }
}

impl VerificationParams {
    pub fn with_quorum_size(mut self, quorum_size: usize) -> Self {
        self.quorum_size = quorum_size.max(1);
        self
    }

    pub fn with_panel_size(mut self, panel_size: usize) -> Self {
        self.panel_size = Some(panel_size);
        self
    }

    pub fn with_agreement_threshold(mut self, threshold: f64) -> Self {
        self.agreement_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    pub fn with_similarity(mut self, similarity: SimilarityKind) -> Self {
        self.similarity = similarity;
        self
    }

    /// Sets the per-member timeout in seconds.
    pub fn with_timeout_seconds(mut self, seconds: u64) -> Self {
        self.member_timeout = Some(Duration::from_secs(seconds));
        self
    }

    pub fn with_member_timeout(mut self, timeout: Duration) -> Self {
        self.member_timeout = Some(timeout);
        self
    }

    /// Sets the per-member timeout from an optional number of seconds.
    ///
    /// If `seconds` is `None`, no timeout is applied.
    pub fn with_optional_timeout_seconds(mut self, seconds: Option<u64>) -> Self {
        self.member_timeout = seconds.map(Duration::from_secs);
        self
    }

    /// Members to assemble for a call requiring `quorum_size` successes.
    pub fn panel_target(&self, quorum_size: usize) -> usize {
        self.panel_size.unwrap_or(quorum_size).max(quorum_size)
    }

    /// Quorum gate for a call that asked for `quorum_size` members.
    pub fn gate(&self, quorum_size: usize) -> QuorumGate {
        QuorumGate::new(quorum_size, self.agreement_threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let params = VerificationParams::default();
        assert_eq!(params.quorum_size, 2);
        assert_eq!(params.agreement_threshold, 0.7);
        assert_eq!(params.member_timeout, Some(Duration::from_secs(120)));
        assert_eq!(params.similarity, SimilarityKind::LengthRatio);
    }

    #[test]
    fn test_builders_clamp() {
        let params = VerificationParams::default()
            .with_quorum_size(0)
            .with_agreement_threshold(1.5)
            .with_optional_timeout_seconds(None);
        assert_eq!(params.quorum_size, 1);
        assert_eq!(params.agreement_threshold, 1.0);
        assert!(params.member_timeout.is_none());
    }

    #[test]
    fn test_panel_target_never_below_quorum() {
        let params = VerificationParams::default();
        assert_eq!(params.panel_target(3), 3);

        let params = params.with_panel_size(4);
        assert_eq!(params.panel_target(2), 4);
        assert_eq!(params.panel_target(5), 5);
    }
}
