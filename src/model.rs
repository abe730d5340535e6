//! Alignment model client — boundary to the external inference service
//!
//! Defines the client trait and judgment types for scoring entities and
//! relationships. Production deployments wire in a service-backed client;
//! `MockModel` returns preconfigured judgments for testing.
//!
//! Judgments are raw and untrusted: the classifier layer clamps every
//! numeric field before anything is stored or used.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Raw entity judgment as returned by the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityJudgment {
    /// -1 (chaotic) to +1 (lawful).
    pub law_chaos: f64,
    /// -1 (evil) to +1 (good).
    pub good_evil: f64,
    /// 0 to 1.
    pub confidence: f64,
    /// Brief free-text justification.
    #[serde(default)]
    pub reasoning: String,
}

/// Raw relationship judgment as returned by the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationshipJudgment {
    /// Action label ("killed", "saved", "betrayed", ...).
    #[serde(rename = "type")]
    pub kind: String,
    /// -1 (evil act) to +1 (good act).
    pub moral_valence: f64,
    /// -1 (chaotic act) to +1 (lawful act).
    pub order_valence: f64,
    #[serde(default)]
    pub summary: String,
}

/// Errors from model client operations.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("model not available: {0}")]
    Unavailable(String),
    #[error("invocation failed: {0}")]
    InvocationFailed(String),
    #[error("response parse error: {0}")]
    ParseError(String),
}

/// Client trait for requesting alignment judgments.
///
/// Abstracts over transport so the pipeline doesn't depend on how the
/// inference service is reached.
#[async_trait]
pub trait AlignmentModel: Send + Sync {
    /// Judge an entity's alignment from its title and description.
    async fn judge_entity(&self, title: &str, content: &str)
        -> Result<EntityJudgment, ModelError>;

    /// Judge one relationship from the context where the target is mentioned.
    async fn judge_relationship(
        &self,
        source_title: &str,
        target_title: &str,
        context: &str,
    ) -> Result<RelationshipJudgment, ModelError>;
}

/// Mock model for testing — returns preconfigured judgments.
///
/// Entity judgments are keyed by title, relationship judgments by
/// (source title, target title). Anything unregistered fails with
/// [`ModelError::InvocationFailed`]. Call counters let tests assert the
/// cache short-circuits repeat lookups.
#[derive(Default)]
pub struct MockModel {
    entities: HashMap<String, EntityJudgment>,
    relationships: HashMap<(String, String), RelationshipJudgment>,
    delay: Option<Duration>,
    entity_calls: AtomicUsize,
    relationship_calls: AtomicUsize,
}

impl MockModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity judgment for a title.
    pub fn with_entity(mut self, title: impl Into<String>, judgment: EntityJudgment) -> Self {
        self.entities.insert(title.into(), judgment);
        self
    }

    /// Register a relationship judgment for a (source, target) pair.
    pub fn with_relationship(
        mut self,
        source_title: impl Into<String>,
        target_title: impl Into<String>,
        judgment: RelationshipJudgment,
    ) -> Self {
        self.relationships
            .insert((source_title.into(), target_title.into()), judgment);
        self
    }

    /// Delay every call, for exercising timeout handling.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn entity_calls(&self) -> usize {
        self.entity_calls.load(Ordering::SeqCst)
    }

    pub fn relationship_calls(&self) -> usize {
        self.relationship_calls.load(Ordering::SeqCst)
    }

    async fn maybe_delay(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl AlignmentModel for MockModel {
    async fn judge_entity(
        &self,
        title: &str,
        _content: &str,
    ) -> Result<EntityJudgment, ModelError> {
        self.entity_calls.fetch_add(1, Ordering::SeqCst);
        self.maybe_delay().await;
        self.entities.get(title).cloned().ok_or_else(|| {
            ModelError::InvocationFailed(format!("no mock judgment for entity '{}'", title))
        })
    }

    async fn judge_relationship(
        &self,
        source_title: &str,
        target_title: &str,
        _context: &str,
    ) -> Result<RelationshipJudgment, ModelError> {
        self.relationship_calls.fetch_add(1, Ordering::SeqCst);
        self.maybe_delay().await;
        self.relationships
            .get(&(source_title.to_string(), target_title.to_string()))
            .cloned()
            .ok_or_else(|| {
                ModelError::InvocationFailed(format!(
                    "no mock judgment for relationship '{}' -> '{}'",
                    source_title, target_title
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_returns_registered_entity_judgment() {
        let model = MockModel::new().with_entity(
            "Karras",
            EntityJudgment {
                law_chaos: 0.5,
                good_evil: -0.8,
                confidence: 0.9,
                reasoning: "burns granaries".to_string(),
            },
        );

        let judgment = model.judge_entity("Karras", "description").await.unwrap();
        assert_eq!(judgment.good_evil, -0.8);
        assert_eq!(model.entity_calls(), 1);
    }

    #[tokio::test]
    async fn mock_fails_for_unregistered_lookups() {
        let model = MockModel::new();

        let err = model.judge_entity("nobody", "").await.unwrap_err();
        assert!(matches!(err, ModelError::InvocationFailed(_)));

        let err = model.judge_relationship("a", "b", "ctx").await.unwrap_err();
        assert!(matches!(err, ModelError::InvocationFailed(_)));
    }
}
