//! Verification configuration from TOML (`[verification]` section)

use ensemble_application::VerificationParams;
use ensemble_application::config::DEFAULT_MEMBER_TIMEOUT_SECS;
use ensemble_domain::verification::consensus::{DEFAULT_AGREEMENT_THRESHOLD, DEFAULT_QUORUM_SIZE};
use ensemble_domain::{ConfigIssue, ConfigIssueCode, SimilarityKind};
use serde::{Deserialize, Serialize};

/// Verification configuration
///
/// # Example
///
/// ```toml
/// [verification]
/// quorum_size = 2              # successful members required for destructive operations
/// panel_size = 3               # members to assemble (never below quorum_size)
/// agreement_threshold = 0.7
/// member_timeout_secs = 120    # omit or 0 to wait indefinitely
/// similarity = "length_ratio"  # or "structural"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileVerificationConfig {
    pub quorum_size: usize,
    pub panel_size: Option<usize>,
    pub agreement_threshold: f64,
    pub member_timeout_secs: Option<u64>,
    pub similarity: String,
}

impl Default for FileVerificationConfig {
    fn default() -> Self {
        Self {
            quorum_size: DEFAULT_QUORUM_SIZE,
            panel_size: None,
            agreement_threshold: DEFAULT_AGREEMENT_THRESHOLD,
            member_timeout_secs: Some(DEFAULT_MEMBER_TIMEOUT_SECS),
            similarity: SimilarityKind::default().as_str().to_string(),
        }
    }
}

impl FileVerificationConfig {
    /// Parse the similarity strategy, falling back to length ratio.
    pub fn parse_similarity(&self) -> (SimilarityKind, Vec<ConfigIssue>) {
        match self.similarity.parse::<SimilarityKind>() {
            Ok(kind) => (kind, Vec::new()),
            Err(_) => {
                let issue = ConfigIssue::warning(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "verification.similarity".to_string(),
                        value: self.similarity.clone(),
                        valid_values: vec![
                            SimilarityKind::LengthRatio.as_str().to_string(),
                            SimilarityKind::Structural.as_str().to_string(),
                        ],
                    },
                    format!(
                        "verification.similarity: unknown value '{}', falling back to '{}'",
                        self.similarity,
                        SimilarityKind::default().as_str()
                    ),
                );
                (SimilarityKind::default(), vec![issue])
            }
        }
    }

    /// Range checks for the numeric fields.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if self.quorum_size == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::OutOfRange {
                    field: "verification.quorum_size".to_string(),
                    value: "0".to_string(),
                },
                "verification.quorum_size: must be at least 1",
            ));
        }

        if !(0.0..=1.0).contains(&self.agreement_threshold) {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::OutOfRange {
                    field: "verification.agreement_threshold".to_string(),
                    value: self.agreement_threshold.to_string(),
                },
                format!(
                    "verification.agreement_threshold: {} is outside [0, 1]",
                    self.agreement_threshold
                ),
            ));
        }

        if let Some(panel_size) = self.panel_size
            && panel_size < self.quorum_size
        {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::OutOfRange {
                    field: "verification.panel_size".to_string(),
                    value: panel_size.to_string(),
                },
                format!(
                    "verification.panel_size: {} is below quorum_size {}, using {}",
                    panel_size, self.quorum_size, self.quorum_size
                ),
            ));
        }

        issues.extend(self.parse_similarity().1);
        issues
    }

    /// Convert to application [`VerificationParams`].
    pub fn to_params(&self) -> VerificationParams {
        let mut params = VerificationParams::default()
            .with_quorum_size(self.quorum_size)
            .with_agreement_threshold(self.agreement_threshold)
            .with_similarity(self.parse_similarity().0)
            .with_optional_timeout_seconds(self.member_timeout_secs.filter(|s| *s > 0));
        if let Some(panel_size) = self.panel_size {
            params = params.with_panel_size(panel_size);
        }
        params
    }
}
