//! Behavioral aggregation, ceiling constraint, and drift
//!
//! The deterministic numeric core. Recorded actions shift an entity away
//! from its stated alignment; the ceiling constraint guarantees they can
//! only pull toward neutral or worse, never above the stated virtue.

use super::types::{clamp_axis, AxisPair, RelationshipEvidence, StatedAlignment};

/// Floor weight so any recorded action carries some influence.
const MIN_ACTION_WEIGHT: f64 = 0.1;
/// Actions shift alignment but never dominate the stated score.
const IMPACT_SCALE: f64 = 0.5;
/// Fraction of the target's good-evil score folded into harm actions:
/// harming the already-evil is discounted toward neutral, harming the
/// good is not mitigated.
const HARM_DISCOUNT: f64 = 0.3;
/// Corner-to-corner distance of the alignment square, the largest drift
/// geometrically possible.
const MAX_DRIFT_DISTANCE: f64 = 2.0 * std::f64::consts::SQRT_2;

/// One piece of relationship evidence paired with the target's known
/// good-evil score, when the target has one.
pub type ScoredAction<'a> = (&'a RelationshipEvidence, Option<f64>);

/// Fold relationship evidence into a behavioral score.
///
/// Starts from the stated alignment (or neutral), then applies the
/// severity-weighted average of action valences at [`IMPACT_SCALE`].
/// Harm actions against a target with a known good-evil score have their
/// moral valence adjusted by [`HARM_DISCOUNT`] of that score.
pub fn behavioral_alignment(
    stated: Option<&StatedAlignment>,
    actions: &[ScoredAction<'_>],
) -> AxisPair {
    let base = stated.map(StatedAlignment::axes).unwrap_or(AxisPair::NEUTRAL);

    if actions.is_empty() {
        return base;
    }

    let mut moral_sum = 0.0;
    let mut order_sum = 0.0;
    let mut weight_sum = 0.0;

    for (evidence, target_good_evil) in actions {
        let mut moral = evidence.moral_valence;
        let order = evidence.order_valence;

        // Severity weight comes from the raw valences, before any discount.
        let weight = ((moral.abs() + order.abs()) / 2.0).max(MIN_ACTION_WEIGHT);

        if evidence.is_harm() {
            if let Some(target) = target_good_evil {
                moral -= target * HARM_DISCOUNT;
            }
        }

        moral_sum += moral * weight;
        order_sum += order * weight;
        weight_sum += weight;
    }

    if weight_sum > 0.0 {
        AxisPair::new(
            clamp_axis(base.law_chaos + (order_sum / weight_sum) * IMPACT_SCALE),
            clamp_axis(base.good_evil + (moral_sum / weight_sum) * IMPACT_SCALE),
        )
    } else {
        base
    }
}

/// Clamp the behavioral score against the stated ceiling, per axis.
///
/// A non-negative stated value caps the final score at the stated value;
/// a negative stated value passes behavior through unchanged (an
/// evil-stated entity may drift further evil).
pub fn apply_ceiling(stated: Option<&StatedAlignment>, behavioral: AxisPair) -> AxisPair {
    let Some(stated) = stated else {
        return behavioral;
    };

    let good_evil = if stated.good_evil >= 0.0 {
        behavioral.good_evil.min(stated.good_evil)
    } else {
        behavioral.good_evil
    };
    let law_chaos = if stated.law_chaos >= 0.0 {
        behavioral.law_chaos.min(stated.law_chaos)
    } else {
        behavioral.law_chaos
    };

    AxisPair::new(law_chaos, good_evil)
}

/// Normalized distance between stated and final alignment.
///
/// 0 when nothing was stated, up to 1 at the opposite corner of the
/// alignment square.
pub fn drift(stated: Option<&StatedAlignment>, final_: AxisPair) -> f64 {
    let Some(stated) = stated else {
        return 0.0;
    };

    let law_diff = stated.law_chaos - final_.law_chaos;
    let good_diff = stated.good_evil - final_.good_evil;
    let distance = (law_diff * law_diff + good_diff * good_diff).sqrt();

    (distance / MAX_DRIFT_DISTANCE).min(1.0)
}
