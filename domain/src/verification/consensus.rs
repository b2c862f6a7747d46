//! Agreement scoring and quorum gating
//!
//! ```text
//! n = 0   → agreement 0.0, no result
//! n = 1   → agreement 1.0, result = that output
//! n >= 2  → agreement = agreeing_pairs / total_pairs
//!           (a pair agrees when similarity > PAIR_AGREEMENT_THRESHOLD)
//!           result = first successful output
//! ```

use super::member::PanelMemberResult;
use super::outcome::RejectionReason;
use super::similarity::SimilarityStrategy;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Similarity above which a pair of outputs counts as agreeing
pub const PAIR_AGREEMENT_THRESHOLD: f64 = 0.8;
/// Default minimum agreement score for destructive operations
pub const DEFAULT_AGREEMENT_THRESHOLD: f64 = 0.7;
/// Default number of successful members required
pub const DEFAULT_QUORUM_SIZE: usize = 2;

/// Similarity of one unordered pair of successful members
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairSimilarity {
    pub left: String,
    pub right: String,
    pub similarity: f64,
    pub agrees: bool,
}

/// Aggregate agreement among the successful members of a panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusReport {
    pub successful: usize,
    pub agreement_score: f64,
    pub pairs: Vec<PairSimilarity>,
    /// Accepted payload candidate (first successful output)
    pub result: Option<Value>,
}

impl ConsensusReport {
    pub fn agreeing_pairs(&self) -> usize {
        self.pairs.iter().filter(|p| p.agrees).count()
    }
}

/// Compute agreement over the successful members of `results`
pub fn compute_consensus(
    results: &[PanelMemberResult],
    strategy: &dyn SimilarityStrategy,
) -> ConsensusReport {
    let successful: Vec<(&str, &Value)> = results
        .iter()
        .filter_map(|r| r.output().map(|out| (r.model_id.as_str(), out)))
        .collect();

    let mut pairs = Vec::new();
    for (i, (left_id, left)) in successful.iter().enumerate() {
        for (right_id, right) in successful.iter().skip(i + 1) {
            let similarity = strategy.similarity(left, right);
            pairs.push(PairSimilarity {
                left: left_id.to_string(),
                right: right_id.to_string(),
                similarity,
                agrees: similarity > PAIR_AGREEMENT_THRESHOLD,
            });
        }
    }

    let agreement_score = match successful.len() {
        0 => 0.0,
        1 => 1.0,
        _ => pairs.iter().filter(|p| p.agrees).count() as f64 / pairs.len() as f64,
    };

    ConsensusReport {
        successful: successful.len(),
        agreement_score,
        pairs,
        result: successful.first().map(|(_, out)| (*out).clone()),
    }
}

/// Quorum and agreement requirements for destructive operations
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuorumGate {
    pub quorum_size: usize,
    pub agreement_threshold: f64,
}

impl Default for QuorumGate {
    fn default() -> Self {
        Self {
            quorum_size: DEFAULT_QUORUM_SIZE,
            agreement_threshold: DEFAULT_AGREEMENT_THRESHOLD,
        }
    }
}

impl QuorumGate {
    pub fn new(quorum_size: usize, agreement_threshold: f64) -> Self {
        Self {
            quorum_size,
            agreement_threshold,
        }
    }

    /// Whether the agreement score reaches the threshold
    pub fn is_agreement(&self, agreement_score: f64) -> bool {
        agreement_score >= self.agreement_threshold
    }

    /// Check quorum first, then agreement
    pub fn check(&self, report: &ConsensusReport) -> Result<(), RejectionReason> {
        if report.successful < self.quorum_size {
            return Err(RejectionReason::InsufficientQuorum {
                successful: report.successful,
                required: self.quorum_size,
            });
        }
        if !self.is_agreement(report.agreement_score) {
            return Err(RejectionReason::InsufficientAgreement {
                score: report.agreement_score,
                threshold: self.agreement_threshold,
            });
        }
        Ok(())
    }
}
