//! Multi-signal route classification.
//!
//! Scores every candidate route against a transcript using five independent
//! evidence signals (explicit trigger phrases, mentioned people, mentioned
//! companies, topic keywords, inferred context type) and folds them into a
//! single confidence via a position-decayed weighted average. Matching is
//! case-insensitive substring containment, by contract; this is not a place
//! for fuzzy matching or embeddings.

use std::collections::HashSet;

use tracing::debug;

use crate::entity::EntityLookup;
use crate::routing::types::{
    ClassificationResult, ClassificationSignal, ContextType, ProjectRoute, RoutingContext,
    SignalKind,
};

// Signal weights and the position decay are contract constants, not tunables.
const EXPLICIT_PHRASE_WEIGHT: f64 = 0.9;
const ASSOCIATED_PERSON_WEIGHT: f64 = 0.6;
const ASSOCIATED_COMPANY_WEIGHT: f64 = 0.5;
const TOPIC_WEIGHT: f64 = 0.3;
const CONTEXT_TYPE_WEIGHT: f64 = 0.2;

/// Position factor is 1 / (1 + i * POSITION_DECAY): the first signal counts
/// fully, later ones progressively less.
const POSITION_DECAY: f64 = 0.3;

/// Competitive confidence never reaches 1.0; that value is the router's
/// sentinel for the pure default-route fallback.
const MAX_CONFIDENCE: f64 = 0.99;

const WORK_INDICATORS: &[&str] = &["meeting", "project", "deadline", "team", "client", "report"];
const PERSONAL_INDICATORS: &[&str] = &["family", "weekend", "vacation", "hobby", "friend"];

pub struct Classifier<'a> {
    entities: &'a dyn EntityLookup,
}

impl<'a> Classifier<'a> {
    pub fn new(entities: &'a dyn EntityLookup) -> Self {
        Self { entities }
    }

    /// Score every active route against the transcript.
    ///
    /// Routes that produce no signal at all are dropped entirely; the rest
    /// come back sorted by confidence descending, ties keeping route order.
    pub fn classify(
        &self,
        context: &RoutingContext,
        routes: &[ProjectRoute],
    ) -> Vec<ClassificationResult> {
        let text = context.transcript_text.to_lowercase();
        let mentioned_people = self.mentioned_people(context, &text);
        let mentioned_companies = self.mentioned_companies(context, &text);
        let inferred_context = infer_context_type(&text);

        let mut results = Vec::new();
        for route in routes.iter().filter(|r| r.is_active()) {
            let signals = self.collect_signals(
                route,
                &text,
                &mentioned_people,
                &mentioned_companies,
                inferred_context,
            );
            if signals.is_empty() {
                continue;
            }

            let confidence = calculate_confidence(&signals);
            let reasoning = describe_signals(&signals);
            debug!(
                "route {} qualified with {} signal(s), confidence {:.3}",
                route.project_id,
                signals.len(),
                confidence
            );
            results.push(ClassificationResult {
                project_id: route.project_id.clone(),
                confidence,
                signals,
                reasoning,
            });
        }

        // Stable sort: equal-confidence routes keep their configured order.
        results.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results
    }

    /// Emission order is load-bearing: explicit phrases first, then people,
    /// companies, topics, context type. calculate_confidence decays by
    /// position, so earlier kinds keep more of their weight.
    fn collect_signals(
        &self,
        route: &ProjectRoute,
        text: &str,
        mentioned_people: &HashSet<String>,
        mentioned_companies: &HashSet<String>,
        inferred_context: ContextType,
    ) -> Vec<ClassificationSignal> {
        let rules = &route.classification;
        let mut signals = Vec::new();

        for phrase in rules.explicit_phrases.iter().flatten() {
            if text.contains(phrase.to_lowercase().as_str()) {
                signals.push(ClassificationSignal {
                    kind: SignalKind::ExplicitPhrase,
                    value: phrase.clone(),
                    weight: EXPLICIT_PHRASE_WEIGHT,
                });
            }
        }

        for person_id in rules.associated_people.iter().flatten() {
            if mentioned_people.contains(person_id) {
                let value = self
                    .entities
                    .person(person_id)
                    .map(|p| p.name.clone())
                    .unwrap_or_else(|| person_id.clone());
                signals.push(ClassificationSignal {
                    kind: SignalKind::AssociatedPerson,
                    value,
                    weight: ASSOCIATED_PERSON_WEIGHT,
                });
            }
        }

        for company_id in rules.associated_companies.iter().flatten() {
            if mentioned_companies.contains(company_id) {
                let value = self
                    .entities
                    .company(company_id)
                    .map(|c| c.name.clone())
                    .unwrap_or_else(|| company_id.clone());
                signals.push(ClassificationSignal {
                    kind: SignalKind::AssociatedCompany,
                    value,
                    weight: ASSOCIATED_COMPANY_WEIGHT,
                });
            }
        }

        for topic in rules.topics.iter().flatten() {
            if text.contains(topic.to_lowercase().as_str()) {
                signals.push(ClassificationSignal {
                    kind: SignalKind::Topic,
                    value: topic.clone(),
                    weight: TOPIC_WEIGHT,
                });
            }
        }

        if inferred_context == rules.context_type {
            signals.push(ClassificationSignal {
                kind: SignalKind::ContextType,
                value: inferred_context.to_string(),
                weight: CONTEXT_TYPE_WEIGHT,
            });
        }

        signals
    }

    fn mentioned_people(&self, context: &RoutingContext, text: &str) -> HashSet<String> {
        if let Some(ids) = &context.detected_people {
            return ids.iter().cloned().collect();
        }
        find_mentions(
            text,
            self.entities.people().iter().map(|p| {
                let mut names = vec![p.name.clone()];
                names.extend(p.sounds_like.iter().flatten().cloned());
                (p.id.clone(), names)
            }),
        )
    }

    fn mentioned_companies(&self, context: &RoutingContext, text: &str) -> HashSet<String> {
        if let Some(ids) = &context.detected_companies {
            return ids.iter().cloned().collect();
        }
        find_mentions(
            text,
            self.entities.companies().iter().map(|c| {
                let mut names = vec![c.name.clone()];
                names.extend(c.full_name.iter().cloned());
                names.extend(c.sounds_like.iter().flatten().cloned());
                (c.id.clone(), names)
            }),
        )
    }
}

/// Generic entity scan: an entity counts as mentioned when any of its
/// candidate names appears (case-insensitively) in the transcript. The first
/// matching candidate settles that entity; remaining variants are skipped.
fn find_mentions<I>(text: &str, entities: I) -> HashSet<String>
where
    I: IntoIterator<Item = (String, Vec<String>)>,
{
    entities
        .into_iter()
        .filter(|(_, names)| {
            names
                .iter()
                .any(|name| text.contains(name.to_lowercase().as_str()))
        })
        .map(|(id, _)| id)
        .collect()
}

/// Keyword inference of whether a note reads as work or personal. Each
/// indicator counts once regardless of repetition, and a margin of two is
/// required before leaving `mixed`.
pub(crate) fn infer_context_type(text: &str) -> ContextType {
    let work_count = WORK_INDICATORS
        .iter()
        .filter(|word| text.contains(*word))
        .count();
    let personal_count = PERSONAL_INDICATORS
        .iter()
        .filter(|word| text.contains(*word))
        .count();

    if work_count > personal_count + 1 {
        ContextType::Work
    } else if personal_count > work_count + 1 {
        ContextType::Personal
    } else {
        ContextType::Mixed
    }
}

/// Weighted average with position-based diminishing returns.
///
/// Signal order must be exactly the emission order; do not re-sort by weight
/// before calling. The 0.99 cap keeps competitive confidence strictly below
/// the router's 1.0 fallback sentinel.
pub fn calculate_confidence(signals: &[ClassificationSignal]) -> f64 {
    if signals.is_empty() {
        return 0.0;
    }

    let mut weighted_sum = 0.0;
    let mut factor_sum = 0.0;
    for (index, signal) in signals.iter().enumerate() {
        let position_factor = 1.0 / (1.0 + index as f64 * POSITION_DECAY);
        weighted_sum += signal.weight * position_factor;
        factor_sum += position_factor;
    }

    (weighted_sum / factor_sum.max(1.0)).min(MAX_CONFIDENCE)
}

fn describe_signals(signals: &[ClassificationSignal]) -> String {
    signals
        .iter()
        .map(|signal| match signal.kind {
            SignalKind::ExplicitPhrase => format!("explicit phrase: \"{}\"", signal.value),
            SignalKind::AssociatedPerson => format!("mentioned {} (associated)", signal.value),
            SignalKind::AssociatedCompany => {
                format!("mentioned {} (associated company)", signal.value)
            }
            SignalKind::Topic => format!("topic: {}", signal.value),
            SignalKind::ContextType => format!("context: {}", signal.value),
        })
        .collect::<Vec<_>>()
        .join(", ")
}
