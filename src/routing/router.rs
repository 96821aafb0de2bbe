//! Route selection and conflict handling.
//!
//! Takes the classifier's ranked candidates and applies the destination
//! policy: best match wins, weak fields fall through to the default route,
//! and close seconds surface as alternates unless the config says the
//! primary always stands.

use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::entity::EntityLookup;
use crate::routing::classifier::Classifier;
use crate::routing::path;
use crate::routing::types::{
    ClassificationResult, ConflictResolution, RouteDecision, RoutingConfig, RoutingContext,
};

/// Matches at or below this confidence are weak signals, not worth surfacing
/// as conflicts even when technically ranked.
const CONFLICT_THRESHOLD: f64 = 0.5;

pub struct Router<'a> {
    config: &'a RoutingConfig,
    classifier: Classifier<'a>,
}

impl<'a> Router<'a> {
    pub fn new(config: &'a RoutingConfig, entities: &'a dyn EntityLookup) -> Self {
        Self {
            config,
            classifier: Classifier::new(entities),
        }
    }

    /// Pick the winning destination for a transcript.
    pub fn route(&self, context: &RoutingContext) -> RouteDecision {
        let results = self.classifier.classify(context, &self.config.projects);

        let Some(best) = results.first() else {
            info!("no project matched, using default routing");
            return self.default_decision();
        };

        let Some(route) = self
            .config
            .projects
            .iter()
            .find(|r| r.project_id == best.project_id)
        else {
            // classify only emits ids taken from config.projects; getting
            // here means the caller handed us inconsistent routes.
            warn!(
                "winning project {} missing from config, using default routing",
                best.project_id
            );
            return self.default_decision();
        };

        let high_confidence: Vec<&ClassificationResult> = results
            .iter()
            .filter(|r| r.confidence > CONFLICT_THRESHOLD)
            .collect();

        let alternate_matches = if high_confidence.len() > 1
            && self.config.conflict_resolution != ConflictResolution::Primary
        {
            Some(
                high_confidence[1..]
                    .iter()
                    .map(|r| (*r).clone())
                    .collect::<Vec<_>>(),
            )
        } else {
            None
        };

        debug!(
            "routed to {} at {:.3} with {} alternate(s)",
            best.project_id,
            best.confidence,
            alternate_matches.as_ref().map_or(0, |a| a.len())
        );

        RouteDecision {
            project_id: Some(best.project_id.clone()),
            destination: route.destination.clone(),
            confidence: best.confidence,
            signals: best.signals.clone(),
            reasoning: best.reasoning.clone(),
            auto_tags: route.auto_tags.clone(),
            alternate_matches,
        }
    }

    /// Derive the concrete output path for a decision.
    pub fn build_output_path(&self, decision: &RouteDecision, context: &RoutingContext) -> PathBuf {
        path::build_output_path(decision, context)
    }

    fn default_decision(&self) -> RouteDecision {
        RouteDecision {
            project_id: None,
            destination: self.config.default.clone(),
            // 1.0 is the explicit "certain fallback" sentinel, never a
            // competitive confidence.
            confidence: 1.0,
            signals: Vec::new(),
            reasoning: "No project matches found, using default routing".to_string(),
            auto_tags: None,
            alternate_matches: None,
        }
    }
}
