//! Cached, clamping classifier layer over the alignment model
//!
//! Contract for both operations: look up the cache first and return a
//! hit verbatim without touching the model; on a miss, invoke the model
//! under a timeout, clamp every numeric field into range, write the
//! result through to disk, and return it. Every failure — model error,
//! timeout, persistence problem — degrades to "no signal" rather than
//! aborting the run.

use crate::alignment::{
    clamp_axis, clamp_unit, AlignmentSource, RelationshipEvidence, StatedAlignment,
};
use crate::cache::{self, AlignmentCache, EntityEntry, RelationshipEntry};
use crate::model::AlignmentModel;
use chrono::Utc;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Characters of content forwarded in an entity payload.
const ENTITY_CONTENT_CHARS: usize = 3000;
/// Default per-call timeout; expiry counts as a failed classification.
pub const DEFAULT_MODEL_TIMEOUT: Duration = Duration::from_secs(30);

/// Cache-backed front end to an [`AlignmentModel`].
pub struct Classifier {
    model: Arc<dyn AlignmentModel>,
    cache: AlignmentCache,
    cache_path: PathBuf,
    timeout: Duration,
}

impl Classifier {
    /// Create a classifier, loading any existing cache at `cache_path`.
    pub fn new(model: Arc<dyn AlignmentModel>, cache_path: impl Into<PathBuf>) -> Self {
        let cache_path = cache_path.into();
        Self {
            model,
            cache: AlignmentCache::load(&cache_path),
            cache_path,
            timeout: DEFAULT_MODEL_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Classify an entity's alignment from its title and content.
    ///
    /// Returns `None` for empty content, a model failure, or a timeout.
    pub async fn classify_entity(&mut self, title: &str, content: &str) -> Option<StatedAlignment> {
        if content.is_empty() {
            return None;
        }

        let key = cache::content_hash(content);
        if let Some(entry) = self.cache.entities.get(&key) {
            return Some(entry.alignment);
        }

        let payload = cache::truncate_chars(content, ENTITY_CONTENT_CHARS);
        let judgment =
            match tokio::time::timeout(self.timeout, self.model.judge_entity(title, payload)).await
            {
                Ok(Ok(judgment)) => judgment,
                Ok(Err(e)) => {
                    warn!(title, error = %e, "entity classification failed");
                    return None;
                }
                Err(_) => {
                    warn!(title, timeout = ?self.timeout, "entity classification timed out");
                    return None;
                }
            };

        let alignment = StatedAlignment {
            law_chaos: clamp_axis(judgment.law_chaos),
            good_evil: clamp_axis(judgment.good_evil),
            confidence: clamp_unit(judgment.confidence),
            source: AlignmentSource::Llm,
        };

        self.cache.entities.insert(
            key,
            EntityEntry {
                alignment,
                timestamp: Utc::now(),
                title: title.to_string(),
            },
        );
        self.persist();

        Some(alignment)
    }

    /// Classify one relationship from the context where the target is
    /// mentioned in the source document.
    pub async fn classify_relationship(
        &mut self,
        source_title: &str,
        target_title: &str,
        context: &str,
    ) -> Option<RelationshipEvidence> {
        let key = cache::relationship_hash(source_title, target_title, context);
        if let Some(entry) = self.cache.relationships.get(&key) {
            return Some(entry.result.clone());
        }

        let call = self
            .model
            .judge_relationship(source_title, target_title, context);
        let judgment = match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(judgment)) => judgment,
            Ok(Err(e)) => {
                warn!(
                    source = source_title,
                    target = target_title,
                    error = %e,
                    "relationship classification failed"
                );
                return None;
            }
            Err(_) => {
                warn!(
                    source = source_title,
                    target = target_title,
                    timeout = ?self.timeout,
                    "relationship classification timed out"
                );
                return None;
            }
        };

        let evidence = RelationshipEvidence {
            kind: judgment.kind,
            moral_valence: clamp_axis(judgment.moral_valence),
            order_valence: clamp_axis(judgment.order_valence),
            summary: judgment.summary,
        };

        self.cache.relationships.insert(
            key,
            RelationshipEntry {
                result: evidence.clone(),
                timestamp: Utc::now(),
                source: source_title.to_string(),
                target: target_title.to_string(),
            },
        );
        self.persist();

        Some(evidence)
    }

    /// Persist the cache; the final write of a pipeline run.
    pub fn flush(&self) {
        self.persist();
    }

    fn persist(&self) {
        if let Err(e) = self.cache.persist(&self.cache_path) {
            warn!(path = %self.cache_path.display(), error = %e, "could not persist alignment cache");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EntityJudgment, MockModel, RelationshipJudgment};

    fn cache_path(dir: &tempfile::TempDir) -> PathBuf {
        dir.path().join("cache.json")
    }

    #[tokio::test]
    async fn out_of_range_model_output_is_clamped() {
        let dir = tempfile::tempdir().unwrap();
        let model = MockModel::new().with_entity(
            "Karras",
            EntityJudgment {
                law_chaos: 7.0,
                good_evil: -42.0,
                confidence: 3.5,
                reasoning: String::new(),
            },
        );

        let mut classifier = Classifier::new(Arc::new(model), cache_path(&dir));
        let stated = classifier.classify_entity("Karras", "body").await.unwrap();
        assert_eq!(stated.law_chaos, 1.0);
        assert_eq!(stated.good_evil, -1.0);
        assert_eq!(stated.confidence, 1.0);
        assert_eq!(stated.source, AlignmentSource::Llm);
    }

    #[tokio::test]
    async fn second_identical_lookup_hits_the_cache() {
        let dir = tempfile::tempdir().unwrap();
        let model = Arc::new(MockModel::new().with_entity(
            "Karras",
            EntityJudgment {
                law_chaos: 0.2,
                good_evil: -0.4,
                confidence: 0.9,
                reasoning: String::new(),
            },
        ));

        let mut classifier = Classifier::new(model.clone(), cache_path(&dir));
        let first = classifier.classify_entity("Karras", "body").await.unwrap();
        let second = classifier.classify_entity("Karras", "body").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(model.entity_calls(), 1);
    }

    #[tokio::test]
    async fn cache_survives_a_new_classifier_instance() {
        let dir = tempfile::tempdir().unwrap();
        let path = cache_path(&dir);
        let judgment = RelationshipJudgment {
            kind: "killed".to_string(),
            moral_valence: -1.0,
            order_valence: 0.0,
            summary: "slew the wyrm".to_string(),
        };

        let model = Arc::new(MockModel::new().with_relationship("A", "B", judgment));
        let mut classifier = Classifier::new(model.clone(), &path);
        let first = classifier
            .classify_relationship("A", "B", "A slew B")
            .await
            .unwrap();

        // Fresh instance, fresh model with nothing registered: only the
        // persisted cache can answer.
        let empty_model = Arc::new(MockModel::new());
        let mut revived = Classifier::new(empty_model.clone(), &path);
        let second = revived
            .classify_relationship("A", "B", "A slew B")
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(empty_model.relationship_calls(), 0);
    }

    #[tokio::test]
    async fn model_failure_is_no_signal() {
        let dir = tempfile::tempdir().unwrap();
        let mut classifier = Classifier::new(Arc::new(MockModel::new()), cache_path(&dir));
        assert!(classifier.classify_entity("unknown", "body").await.is_none());
        assert!(classifier
            .classify_relationship("a", "b", "ctx")
            .await
            .is_none());
    }

    #[tokio::test]
    async fn timeout_is_no_signal() {
        let dir = tempfile::tempdir().unwrap();
        let model = MockModel::new()
            .with_entity(
                "Karras",
                EntityJudgment {
                    law_chaos: 0.0,
                    good_evil: 0.0,
                    confidence: 0.5,
                    reasoning: String::new(),
                },
            )
            .with_delay(Duration::from_millis(200));

        let mut classifier = Classifier::new(Arc::new(model), cache_path(&dir))
            .with_timeout(Duration::from_millis(10));
        assert!(classifier.classify_entity("Karras", "body").await.is_none());
    }

    #[tokio::test]
    async fn empty_content_skips_the_model() {
        let dir = tempfile::tempdir().unwrap();
        let model = Arc::new(MockModel::new());
        let mut classifier = Classifier::new(model.clone(), cache_path(&dir));
        assert!(classifier.classify_entity("Karras", "").await.is_none());
        assert_eq!(model.entity_calls(), 0);
    }
}
