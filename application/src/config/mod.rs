//! Application-level configuration.
//!
//! This module provides configuration types that control how use cases behave:
//!
//! - [`VerificationParams`] — quorum, agreement threshold, timeout, comparator
//! - [`EnsembleConfig`] — container for canary and verification settings

pub mod ensemble_config;
pub mod verification_params;

pub use ensemble_config::EnsembleConfig;
pub use verification_params::{DEFAULT_MEMBER_TIMEOUT_SECS, VerificationParams};
