//! Alignment pipeline orchestration
//!
//! Sequences the classification stages over a graph document:
//!
//! 1. eligibility screen — nodes outside the configured collections get
//!    `alignment = null` and never enter direct classification
//! 2. explicit extraction over eligible nodes
//! 3. model fallback for eligible nodes still unclassified
//! 4. relationship classification over edges with an eligible source
//! 5. behavioral aggregation + ceiling + drift per stated node
//! 6. propagation over the full graph
//!
//! Model calls are issued one at a time; nothing in here is fatal. The
//! design goal is graceful degradation to "fewer entities directly
//! classified", with propagation as the backstop.

use crate::alignment::{
    apply_ceiling, behavioral_alignment, drift, extract_stated, link_context, propagate,
    AlignmentResult, AlignmentSource, ScoredAction, StatedAlignment,
};
use crate::classify::{Classifier, DEFAULT_MODEL_TIMEOUT};
use crate::graph::{ClassifiedRelationship, Graph, Node};
use crate::model::AlignmentModel;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Confidence lost per unit of drift for explicitly stated entities.
const DRIFT_CONFIDENCE_PENALTY: f64 = 0.3;

/// Pipeline configuration.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Collection name → collection id. Only nodes in a listed
    /// collection are eligible for direct classification.
    pub collections: HashMap<String, String>,
    /// Location of the persistent classification cache.
    pub cache_path: PathBuf,
    /// Per-call model timeout; expiry counts as a failed classification.
    pub model_timeout: Duration,
}

impl PipelineConfig {
    pub fn new(collections: HashMap<String, String>, cache_path: impl Into<PathBuf>) -> Self {
        Self {
            collections,
            cache_path: cache_path.into(),
            model_timeout: DEFAULT_MODEL_TIMEOUT,
        }
    }

    pub fn with_model_timeout(mut self, timeout: Duration) -> Self {
        self.model_timeout = timeout;
        self
    }
}

/// Counts from one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineReport {
    /// Nodes in an eligible collection.
    pub eligible: usize,
    /// Nodes screened out by collection.
    pub skipped: usize,
    /// Eligible nodes with an explicitly stated alignment.
    pub explicit: usize,
    /// Eligible nodes classified by the model.
    pub llm: usize,
    /// Edges that received relationship evidence.
    pub relationships: usize,
    /// Nodes filled in by propagation.
    pub propagated: usize,
    /// Propagation rounds executed.
    pub propagation_rounds: usize,
}

/// The orchestrator. Owns the configuration and an optional model; runs
/// the full pipeline over a mutable graph document.
pub struct AlignmentPipeline {
    config: PipelineConfig,
    model: Option<Arc<dyn AlignmentModel>>,
}

impl AlignmentPipeline {
    /// A pipeline without a model: explicit extraction and propagation
    /// only. Stages 3 and 4 are skipped entirely.
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            model: None,
        }
    }

    pub fn with_model(mut self, model: Arc<dyn AlignmentModel>) -> Self {
        self.model = Some(model);
        self
    }

    /// Run every stage, annotating `graph` in place.
    pub async fn run(&self, graph: &mut Graph) -> PipelineReport {
        info!(
            nodes = graph.nodes.len(),
            links = graph.links.len(),
            "starting alignment classification"
        );

        let eligible_ids: HashSet<&str> = self
            .config
            .collections
            .values()
            .map(String::as_str)
            .collect();
        let mut classifier = self.model.as_ref().map(|model| {
            Classifier::new(model.clone(), self.config.cache_path.clone())
                .with_timeout(self.config.model_timeout)
        });

        let mut report = PipelineReport::default();

        // Stages 1-3: eligibility screen, explicit extraction, model fallback.
        let mut stated: HashMap<String, StatedAlignment> = HashMap::new();
        for node in &mut graph.nodes {
            if !eligible_ids.contains(node.collection_id.as_str()) {
                node.alignment = None;
                report.skipped += 1;
                continue;
            }
            report.eligible += 1;

            if let Some(s) = extract_stated(&node.content) {
                stated.insert(node.id.clone(), s);
                report.explicit += 1;
                continue;
            }

            if let Some(classifier) = classifier.as_mut() {
                debug!(title = %node.title, "no explicit alignment, asking the model");
                if let Some(s) = classifier.classify_entity(&node.title, &node.content).await {
                    stated.insert(node.id.clone(), s);
                    report.llm += 1;
                }
            }
        }
        info!(
            eligible = report.eligible,
            skipped = report.skipped,
            explicit = report.explicit,
            llm = report.llm,
            "direct classification complete"
        );

        // Stage 4: relationship classification over edges whose source is
        // eligible and whose endpoints both resolve to known nodes.
        if let Some(classifier) = classifier.as_mut() {
            let nodes_by_id: HashMap<&str, &Node> =
                graph.nodes.iter().map(|n| (n.id.as_str(), n)).collect();

            for edge in &mut graph.links {
                let (Some(source), Some(target)) = (
                    nodes_by_id.get(edge.source.as_str()),
                    nodes_by_id.get(edge.target.as_str()),
                ) else {
                    continue;
                };
                if !eligible_ids.contains(source.collection_id.as_str()) {
                    continue;
                }

                let Some(context) = link_context(&source.content, &target.title) else {
                    continue;
                };
                if let Some(evidence) = classifier
                    .classify_relationship(&source.title, &target.title, &context)
                    .await
                {
                    edge.relationship = Some(ClassifiedRelationship {
                        evidence,
                        source_id: edge.source.clone(),
                        target_id: edge.target.clone(),
                    });
                    report.relationships += 1;
                }
            }
            info!(
                relationships = report.relationships,
                "relationship classification complete"
            );
        }

        // Stage 5: behavioral aggregation, ceiling, drift. Other nodes'
        // stated scores serve as the target lookup for harm discounts.
        let target_good_evil: HashMap<&str, f64> = stated
            .iter()
            .map(|(id, s)| (id.as_str(), s.good_evil))
            .collect();

        for node in &mut graph.nodes {
            let Some(s) = stated.get(&node.id) else {
                continue;
            };

            let actions: Vec<ScoredAction<'_>> = graph
                .links
                .iter()
                .filter(|edge| edge.source == node.id)
                .filter_map(|edge| edge.relationship.as_ref())
                .map(|rel| {
                    (
                        &rel.evidence,
                        target_good_evil.get(rel.target_id.as_str()).copied(),
                    )
                })
                .collect();

            let behavioral = behavioral_alignment(Some(s), &actions);
            let final_ = apply_ceiling(Some(s), behavioral);
            let drift_value = drift(Some(s), final_);

            let confidence = match s.source {
                AlignmentSource::Explicit => 1.0 - drift_value * DRIFT_CONFIDENCE_PENALTY,
                _ => s.confidence,
            };

            node.alignment = Some(AlignmentResult {
                stated: Some(*s),
                behavioral,
                final_,
                confidence,
                drift: drift_value,
                source: s.source,
            });
        }

        // Stage 6: propagation over the full graph fills whatever direct
        // classification could not reach.
        let outcome = propagate(&mut graph.nodes, &graph.links);
        report.propagated = outcome.assigned;
        report.propagation_rounds = outcome.rounds;

        if let Some(classifier) = classifier.as_ref() {
            classifier.flush();
        }

        let with_alignment = graph
            .nodes
            .iter()
            .filter(|n| n.alignment.is_some())
            .count();
        info!(
            with_alignment,
            total = graph.nodes.len(),
            propagated = report.propagated,
            rounds = report.propagation_rounds,
            "alignment classification complete"
        );

        report
    }
}
