//! Score types shared across the alignment pipeline

use serde::{Deserialize, Serialize};

/// Clamp a value onto an alignment axis.
pub(crate) fn clamp_axis(value: f64) -> f64 {
    value.clamp(-1.0, 1.0)
}

/// Clamp a value into the unit interval (confidence, drift).
pub(crate) fn clamp_unit(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

/// A point in the two-axis alignment space.
///
/// Both axes run over [-1, 1]: `law_chaos` is +1 lawful / -1 chaotic,
/// `good_evil` is +1 good / -1 evil.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisPair {
    pub law_chaos: f64,
    pub good_evil: f64,
}

impl AxisPair {
    /// The origin of the alignment space (true neutral).
    pub const NEUTRAL: AxisPair = AxisPair {
        law_chaos: 0.0,
        good_evil: 0.0,
    };

    pub fn new(law_chaos: f64, good_evil: f64) -> Self {
        Self {
            law_chaos,
            good_evil,
        }
    }
}

/// How an alignment judgment was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlignmentSource {
    /// Stated outright in the entity's own text.
    Explicit,
    /// Inferred once by the external model, trusted like a statement.
    Llm,
    /// Derived purely from recorded actions.
    Behavioral,
    /// Inherited from connected entities.
    Propagated,
}

/// The alignment an entity claims for itself.
///
/// Acts as a ceiling: behavior can pull the final score toward neutral
/// or worse, but never above the stated level of virtue or order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatedAlignment {
    pub law_chaos: f64,
    pub good_evil: f64,
    pub confidence: f64,
    pub source: AlignmentSource,
}

impl StatedAlignment {
    /// A statement taken verbatim from the entity's text.
    pub fn explicit(law_chaos: f64, good_evil: f64) -> Self {
        Self {
            law_chaos,
            good_evil,
            confidence: 1.0,
            source: AlignmentSource::Explicit,
        }
    }

    pub fn axes(&self) -> AxisPair {
        AxisPair::new(self.law_chaos, self.good_evil)
    }
}

/// One recorded action between two entities, scored on both axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipEvidence {
    /// Free-form action label ("killed", "betrayed", "allied", ...).
    #[serde(rename = "type")]
    pub kind: String,
    /// -1 (evil act) to +1 (good act).
    pub moral_valence: f64,
    /// -1 (chaotic act) to +1 (lawful act).
    pub order_valence: f64,
    #[serde(default)]
    pub summary: String,
}

impl RelationshipEvidence {
    /// Whether the moral penalty of this action is discounted by the
    /// target's own alignment (harming the already-evil counts for less).
    pub fn is_harm(&self) -> bool {
        matches!(self.kind.as_str(), "killed" | "destroyed" | "harmed")
    }
}

/// The full alignment record the pipeline attaches to a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentResult {
    /// Claimed alignment, if any evidence of a claim exists.
    pub stated: Option<StatedAlignment>,
    /// Score after folding in relationship evidence.
    pub behavioral: AxisPair,
    /// Behavioral score with the ceiling constraint applied.
    #[serde(rename = "final")]
    pub final_: AxisPair,
    pub confidence: f64,
    /// Normalized distance between stated and final; 0 when nothing was stated.
    pub drift: f64,
    pub source: AlignmentSource,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_statement_has_full_confidence() {
        let stated = StatedAlignment::explicit(1.0, -1.0);
        assert_eq!(stated.confidence, 1.0);
        assert_eq!(stated.source, AlignmentSource::Explicit);
        assert_eq!(stated.axes(), AxisPair::new(1.0, -1.0));
    }

    #[test]
    fn harm_kinds_are_recognized() {
        for kind in ["killed", "destroyed", "harmed"] {
            let evidence = RelationshipEvidence {
                kind: kind.to_string(),
                moral_valence: -1.0,
                order_valence: 0.0,
                summary: String::new(),
            };
            assert!(evidence.is_harm(), "{kind} should be a harm action");
        }
        let allied = RelationshipEvidence {
            kind: "allied".to_string(),
            moral_valence: 0.5,
            order_valence: 0.5,
            summary: String::new(),
        };
        assert!(!allied.is_harm());
    }

    #[test]
    fn result_serializes_final_field_name() {
        let result = AlignmentResult {
            stated: None,
            behavioral: AxisPair::NEUTRAL,
            final_: AxisPair::NEUTRAL,
            confidence: 0.3,
            drift: 0.0,
            source: AlignmentSource::Propagated,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("final").is_some());
        assert_eq!(json["source"], "propagated");
        assert!(json["stated"].is_null());
    }
}
