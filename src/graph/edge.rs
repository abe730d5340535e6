//! Edge records and endpoint normalization

use crate::alignment::RelationshipEvidence;
use serde::{Deserialize, Deserializer, Serialize};

/// A directed link between two documents.
///
/// The wire format is polymorphic: each endpoint may be a bare id string
/// or an object carrying an `id` field. Both forms normalize to a plain
/// id at deserialization, so nothing downstream ever branches on shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    #[serde(deserialize_with = "endpoint_id")]
    pub source: String,
    #[serde(deserialize_with = "endpoint_id")]
    pub target: String,
    /// Attached by the relationship classification pass, when the source
    /// document yields usable context for this link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship: Option<ClassifiedRelationship>,
}

impl Edge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            relationship: None,
        }
    }
}

/// Relationship evidence plus the normalized endpoint ids it applies to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedRelationship {
    #[serde(flatten)]
    pub evidence: RelationshipEvidence,
    pub source_id: String,
    pub target_id: String,
}

/// Endpoint wire forms: `"abc"` or `{"id": "abc", ...}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum EndpointRepr {
    Id(String),
    Object { id: String },
}

fn endpoint_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match EndpointRepr::deserialize(deserializer)? {
        EndpointRepr::Id(id) => id,
        EndpointRepr::Object { id } => id,
    })
}
