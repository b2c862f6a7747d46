//! Ensemble configuration container.
//!
//! [`EnsembleConfig`] groups the selector's canary settings and the
//! verifier's parameters. Both are set at initialization and remain static
//! for the lifetime of the use cases built from them.

use crate::config::VerificationParams;
use ensemble_domain::CanaryConfig;

/// Configuration for the selector and verifier use cases.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnsembleConfig {
    canary: CanaryConfig,
    verification: VerificationParams,
}

impl EnsembleConfig {
    pub fn new(canary: CanaryConfig, verification: VerificationParams) -> Self {
        Self {
            canary,
            verification,
        }
    }

    /// Canary experiment settings.
    pub fn canary(&self) -> &CanaryConfig {
        &self.canary
    }

    /// Verification parameters.
    pub fn verification(&self) -> &VerificationParams {
        &self.verification
    }

    pub fn with_canary(mut self, canary: CanaryConfig) -> Self {
        self.canary = canary;
        self
    }

    pub fn with_verification(mut self, verification: VerificationParams) -> Self {
        self.verification = verification;
        self
    }
}
