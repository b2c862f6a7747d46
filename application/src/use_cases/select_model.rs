//! Select Model use case
//!
//! Routes a task for one role to a single model backend.
//!
//! ```text
//! registry.list_by_role ─▶ capability/exclusion filter ─▶ stable | canary
//!                                                            │
//!            canary eligible (bucket <= percentage)? ── yes ─▶ best canary   (canary)
//!                                                            │ no
//!            stable candidates? ── 1 ─▶ that one, 0.8        (stable)
//!                                ── n ─▶ best by score       (performance_based if > 0.8)
//!                                ── 0 ─▶ first eligible, 0.5 (fallback)
//! ```
//!
//! Selection is a pure function of the registry and metrics snapshots: it
//! mutates nothing and never calls a backend.

use crate::ports::metrics_source::MetricsSource;
use crate::ports::model_registry::{ModelRegistry, RegistryError};
use ensemble_domain::selection::scoring::{
    FALLBACK_CONFIDENCE, NEUTRAL_SCORE, PERFORMANCE_BASED_THRESHOLD, SINGLE_CANDIDATE_CONFIDENCE,
};
use ensemble_domain::{
    CanaryConfig, MetricsWindow, ModelDescriptor, NotFoundReason, SelectionContext,
    SelectionMetadata, SelectionOutcome, SelectionReason, SelectionResult, performance_score,
};
use futures::future::join_all;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during model selection
///
/// "No eligible model" is not an error: it is reported as
/// [`SelectionOutcome::NotFound`].
#[derive(Error, Debug)]
pub enum SelectionError {
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),
}

/// Use case for selecting one model for a role
pub struct ModelSelector<R: ModelRegistry + 'static, M: MetricsSource + 'static> {
    registry: Arc<R>,
    metrics: Arc<M>,
    canary: CanaryConfig,
}

impl<R: ModelRegistry + 'static, M: MetricsSource + 'static> ModelSelector<R, M> {
    pub fn new(registry: Arc<R>, metrics: Arc<M>, canary: CanaryConfig) -> Self {
        Self {
            registry,
            metrics,
            canary,
        }
    }

    pub fn canary_config(&self) -> &CanaryConfig {
        &self.canary
    }

    /// Select one model for `context`
    pub async fn select(
        &self,
        context: &SelectionContext,
    ) -> Result<SelectionOutcome, SelectionError> {
        let models = self.registry.list_by_role(context.role).await?;
        if models.is_empty() {
            debug!("No models registered for role {}", context.role);
            return Ok(SelectionOutcome::not_found(NotFoundReason::NoModelsForRole));
        }

        let eligible: Vec<ModelDescriptor> = models
            .into_iter()
            .filter(|m| m.satisfies(&context.required_capabilities) && !context.is_excluded(&m.id))
            .collect();
        if eligible.is_empty() {
            debug!(
                "No eligible model for role {} (capabilities: {:?}, excluded: {:?})",
                context.role, context.required_capabilities, context.excluded_models
            );
            return Ok(SelectionOutcome::not_found(NotFoundReason::NoCapableModels));
        }

        let (canary, stable): (Vec<&ModelDescriptor>, Vec<&ModelDescriptor>) =
            eligible.iter().partition(|m| m.status.is_canary());

        let canary_active = self.canary.routes_to_canary(context, !canary.is_empty());
        let mut metadata = SelectionMetadata {
            candidates_considered: eligible.len(),
            canary_active,
            ..Default::default()
        };

        if canary_active && let Some((model, score)) = self.rank(&canary).await {
            metadata.performance_ranked = true;
            info!(
                "Selected canary model {} for role {} (score {:.3})",
                model.id, context.role, score
            );
            return Ok(SelectionOutcome::Selected(
                SelectionResult::new(model.clone(), SelectionReason::Canary, score)
                    .with_metadata(metadata),
            ));
        }

        if stable.len() == 1 {
            let model = stable[0];
            info!("Selected sole stable model {} for role {}", model.id, context.role);
            return Ok(SelectionOutcome::Selected(
                SelectionResult::new(
                    model.clone(),
                    SelectionReason::Stable,
                    SINGLE_CANDIDATE_CONFIDENCE,
                )
                .with_metadata(metadata),
            ));
        }

        if let Some((model, score)) = self.rank(&stable).await {
            metadata.performance_ranked = true;
            let reason = if score > PERFORMANCE_BASED_THRESHOLD {
                SelectionReason::PerformanceBased
            } else {
                SelectionReason::Stable
            };
            info!(
                "Selected {} model {} for role {} (score {:.3})",
                reason, model.id, context.role, score
            );
            return Ok(SelectionOutcome::Selected(
                SelectionResult::new(model.clone(), reason, score).with_metadata(metadata),
            ));
        }

        let model = &eligible[0];
        metadata.fallback_used = true;
        info!(
            "No stable model for role {}, falling back to {}",
            context.role, model.id
        );
        Ok(SelectionOutcome::Selected(
            SelectionResult::new(model.clone(), SelectionReason::Fallback, FALLBACK_CONFIDENCE)
                .with_metadata(metadata),
        ))
    }

    /// Best candidate by performance score; ties keep registry order
    async fn rank<'a>(
        &self,
        candidates: &[&'a ModelDescriptor],
    ) -> Option<(&'a ModelDescriptor, f64)> {
        let scores = join_all(candidates.iter().map(|m| self.score(&m.id))).await;

        let mut best: Option<(&'a ModelDescriptor, f64)> = None;
        for (model, score) in candidates.iter().copied().zip(scores) {
            debug!("Candidate {} scored {:.3}", model.id, score);
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((model, score)),
            }
        }
        best
    }

    /// Score from the freshest available window, or neutral
    async fn score(&self, model_id: &str) -> f64 {
        for window in MetricsWindow::PREFERENCE {
            match self.metrics.get_window(model_id, window).await {
                Ok(Some(w)) => return performance_score(Some(&w)),
                Ok(None) => continue,
                Err(e) => {
                    warn!(
                        "Metrics lookup for {} ({}) failed, using neutral score: {}",
                        model_id, window, e
                    );
                    return NEUTRAL_SCORE;
                }
            }
        }
        NEUTRAL_SCORE
    }
}
