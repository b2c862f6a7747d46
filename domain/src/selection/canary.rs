//! Deterministic canary bucketing
//!
//! Canary traffic is split by hashing `(user, project, role)` into a bucket
//! in `1..=100`. The same triple always lands in the same bucket, so a user
//! stays on the same side of an experiment and tests are reproducible.
//! A triple is routed to canary when its bucket is at most the configured
//! percentage, which makes raising the percentage monotonic.

use super::context::SelectionContext;
use crate::model::ModelRole;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Token hashed in place of a missing user id
pub const ANONYMOUS_USER: &str = "anonymous";
/// Token hashed in place of a missing project id
pub const DEFAULT_PROJECT: &str = "default";

/// Canary experiment settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanaryConfig {
    /// Global switch
    pub enabled: bool,
    /// Share of buckets routed to canary, 0..=100
    pub percentage: u8,
    /// Only route critical selections to canary
    pub critical_only: bool,
    /// Roles that never receive canary traffic
    pub excluded_roles: BTreeSet<ModelRole>,
}

impl Default for CanaryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            percentage: 10,
            critical_only: false,
            excluded_roles: BTreeSet::new(),
        }
    }
}

impl CanaryConfig {
    pub fn enabled(percentage: u8) -> Self {
        Self {
            enabled: true,
            percentage: percentage.min(100),
            ..Default::default()
        }
    }

    pub fn with_critical_only(mut self, critical_only: bool) -> Self {
        self.critical_only = critical_only;
        self
    }

    pub fn excluding_role(mut self, role: ModelRole) -> Self {
        self.excluded_roles.insert(role);
        self
    }

    /// Whether a selection with `context` should be served from the canary
    /// subset, given whether that subset is non-empty.
    pub fn routes_to_canary(&self, context: &SelectionContext, has_canary: bool) -> bool {
        if !self.enabled || !has_canary {
            return false;
        }
        if self.excluded_roles.contains(&context.role) {
            return false;
        }
        if self.critical_only && !context.is_critical {
            return false;
        }
        canary_bucket(context) <= self.percentage
    }
}

/// Order-sensitive 32-bit hash over UTF-8 bytes (`h = h * 31 + byte`, wrapping)
pub fn stable_hash(input: &str) -> i32 {
    input
        .bytes()
        .fold(0i32, |h, b| h.wrapping_mul(31).wrapping_add(i32::from(b)))
}

/// Hash seed for the `(user, project, role)` triple of `context`
pub fn canary_seed(context: &SelectionContext) -> i32 {
    let user = context.user_id.as_deref().unwrap_or(ANONYMOUS_USER);
    let project = context.project_id.as_deref().unwrap_or(DEFAULT_PROJECT);
    stable_hash(&format!("{}:{}:{}", user, project, context.role))
}

/// Percentage bucket in `1..=100` for `context`
pub fn canary_bucket(context: &SelectionContext) -> u8 {
    (canary_seed(context).unsigned_abs() % 100) as u8 + 1
}
