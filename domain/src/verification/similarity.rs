//! Pairwise similarity of opaque result payloads
//!
//! The comparator is a strategy: the default length ratio is deliberately
//! coarse, and [`StructuralSimilarity`] is available where outputs are
//! structured JSON.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Similarity of two payloads, in [0, 1]
pub trait SimilarityStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn similarity(&self, left: &Value, right: &Value) -> f64;
}

/// Exact match scores 1.0; otherwise shorter/longer serialized length
#[derive(Debug, Clone, Copy, Default)]
pub struct LengthRatioSimilarity;

impl SimilarityStrategy for LengthRatioSimilarity {
    fn name(&self) -> &'static str {
        "length_ratio"
    }

    fn similarity(&self, left: &Value, right: &Value) -> f64 {
        if left == right {
            return 1.0;
        }
        let left_len = left.to_string().len();
        let right_len = right.to_string().len();
        let longer = left_len.max(right_len);
        if longer == 0 {
            return 1.0;
        }
        left_len.min(right_len) as f64 / longer as f64
    }
}

/// Jaccard index over the flattened `path=value` leaves of both payloads
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralSimilarity;

impl StructuralSimilarity {
    fn leaves(value: &Value) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        Self::flatten("$", value, &mut out);
        out
    }

    fn flatten(path: &str, value: &Value, out: &mut BTreeSet<String>) {
        match value {
            Value::Object(map) if !map.is_empty() => {
                for (key, child) in map {
                    Self::flatten(&format!("{path}.{key}"), child, out);
                }
            }
            Value::Array(items) if !items.is_empty() => {
                for (i, child) in items.iter().enumerate() {
                    Self::flatten(&format!("{path}[{i}]"), child, out);
                }
            }
            leaf => {
                out.insert(format!("{path}={leaf}"));
            }
        }
    }
}

impl SimilarityStrategy for StructuralSimilarity {
    fn name(&self) -> &'static str {
        "structural"
    }

    fn similarity(&self, left: &Value, right: &Value) -> f64 {
        if left == right {
            return 1.0;
        }
        let left = Self::leaves(left);
        let right = Self::leaves(right);
        let union = left.union(&right).count();
        if union == 0 {
            return 1.0;
        }
        left.intersection(&right).count() as f64 / union as f64
    }
}

/// Configurable choice of similarity strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityKind {
    #[default]
    LengthRatio,
    Structural,
}

impl SimilarityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SimilarityKind::LengthRatio => "length_ratio",
            SimilarityKind::Structural => "structural",
        }
    }

    pub fn strategy(&self) -> Arc<dyn SimilarityStrategy> {
        match self {
            SimilarityKind::LengthRatio => Arc::new(LengthRatioSimilarity),
            SimilarityKind::Structural => Arc::new(StructuralSimilarity),
        }
    }
}

impl std::str::FromStr for SimilarityKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "length_ratio" => Ok(SimilarityKind::LengthRatio),
            "structural" => Ok(SimilarityKind::Structural),
            _ => Err(DomainError::UnknownSimilarity(s.to_string())),
        }
    }
}
