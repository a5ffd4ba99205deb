//! Estimate engine
//!
//! ```text
//! complexity = (sprints + Σ designer levels + breakpoints + fidelity) / 4
//! base       = round(effort × complexity)
//! subtotal   = base + Σ discovery impact + Σ design impact
//! raw        = round((subtotal + subtotal × buffer) × iterations)
//! points     = min(raw, MAX_POINTS)
//! ```
//!
//! Every function here is pure. The same selection always yields the same
//! estimate; nothing reads the clock or a random source.

use crate::aggregate::{finalize, round_half_up};
use crate::catalog::{design_impact, discovery_impact, CatalogFactor};
use crate::factors::{validate, CompleteFactors, EstimationFactors};
use serde::{Deserialize, Serialize};

/// Ceiling for a single estimate
pub const MAX_POINTS: u32 = 100;

/// A scored selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Estimate {
    /// Value to display, never above [`MAX_POINTS`]
    pub points: u32,
    /// Value before the ceiling was applied
    pub raw: u32,
    /// True only when `raw` exceeded the ceiling
    pub capped: bool,
}

impl Estimate {
    fn from_raw(raw: u32) -> Self {
        Self {
            points: raw.min(MAX_POINTS),
            raw,
            capped: raw > MAX_POINTS,
        }
    }
}

/// Every intermediate of the scoring formula
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EstimateBreakdown {
    /// Mean of the four complexity weights
    pub complexity_average: f64,
    /// Effort scaled by complexity, rounded
    pub base: u32,
    /// Sum of selected activity impacts
    pub activity_points: u32,
    /// `base + activity_points`
    pub subtotal: u32,
    /// After buffer and iterations, before the ceiling
    pub raw: u32,
    /// Clamped result
    pub points: u32,
    /// Whether the ceiling was applied
    pub capped: bool,
}

impl EstimateBreakdown {
    /// Collapse to the displayed estimate
    #[inline]
    #[must_use]
    pub fn estimate(&self) -> Estimate {
        Estimate {
            points: self.points,
            raw: self.raw,
            capped: self.capped,
        }
    }
}

/// Score a possibly partial selection
///
/// Returns `None` while the selection is incomplete or invalid; use
/// [`validate`] to learn why.
#[must_use]
pub fn compute_estimate(factors: &EstimationFactors) -> Option<Estimate> {
    match validate(factors) {
        Ok(complete) => Some(estimate(&complete)),
        Err(err) => {
            tracing::trace!(%err, "factor selection not computable");
            None
        }
    }
}

/// Score a validated selection
#[inline]
#[must_use]
pub fn estimate(factors: &CompleteFactors) -> Estimate {
    compute_breakdown(factors).estimate()
}

/// Score a validated selection, keeping every intermediate
#[must_use]
pub fn compute_breakdown(factors: &CompleteFactors) -> EstimateBreakdown {
    let designer_weight: f64 = factors.designer_levels.iter().map(|l| l.weight()).sum();
    let complexity_average = (factors.sprints.weight()
        + designer_weight
        + factors.breakpoints.weight()
        + factors.fidelity.weight())
        / 4.0;

    let base = round_half_up(factors.effort.weight() * complexity_average) as u32;

    let activity_points: u32 = factors
        .discovery_activities
        .iter()
        .map(|id| discovery_impact(id))
        .chain(factors.design_activities.iter().map(|id| design_impact(id)))
        .sum();

    let subtotal = base + activity_points;
    let raw = finalize(subtotal, factors.meeting_buffer, factors.iteration_multiplier);
    let Estimate {
        points,
        raw,
        capped,
    } = Estimate::from_raw(raw);

    EstimateBreakdown {
        complexity_average,
        base,
        activity_points,
        subtotal,
        raw,
        points,
        capped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Breakpoints, DesignerLevel, Effort, Fidelity, SprintAllocation};

    #[test]
    fn neutral_baseline_scores_three() {
        // 3 × (0.5 + 1 + 1 + 1) / 4 = 2.625
        let bd = compute_breakdown(&CompleteFactors::neutral());
        assert_eq!(bd.complexity_average, 0.875);
        assert_eq!(bd.base, 3);
        assert_eq!(bd.points, 3);
        assert!(!bd.capped);
    }

    #[test]
    fn activities_add_after_rounding() {
        let mut factors = CompleteFactors::neutral();
        factors.discovery_activities.insert("user-research".into());
        factors.design_activities.insert("design-qa".into());
        factors.design_activities.insert("not-an-activity".into());

        let bd = compute_breakdown(&factors);
        assert_eq!(bd.activity_points, 6);
        assert_eq!(bd.subtotal, 9);
        assert_eq!(bd.raw, 9);
    }

    #[test]
    fn buffer_applies_before_iterations() {
        let mut factors = CompleteFactors::neutral();
        factors.effort = Effort::Massive;
        factors.sprints = SprintAllocation::Two;
        // 13 × (2 + 1 + 1 + 1) / 4 = 16.25 → 16
        factors.meeting_buffer = 0.25;
        factors.iteration_multiplier = 2.0;

        let bd = compute_breakdown(&factors);
        assert_eq!(bd.base, 16);
        assert_eq!(bd.raw, 40);
    }

    #[test]
    fn designer_levels_are_summed() {
        let mut factors = CompleteFactors::neutral();
        factors.effort = Effort::VeryLarge;
        factors.designer_levels = vec![DesignerLevel::Junior, DesignerLevel::Junior];
        // 8 × (0.5 + 2.4 + 1 + 1) / 4 = 9.8
        assert_eq!(compute_breakdown(&factors).base, 10);
    }

    #[test]
    fn ceiling_sets_capped_flag() {
        let factors = CompleteFactors {
            effort: Effort::Massive,
            sprints: SprintAllocation::Three,
            designer_levels: vec![DesignerLevel::Junior; 4],
            breakpoints: Breakpoints::FourPlus,
            fidelity: Fidelity::Interactive,
            meeting_buffer: 0.3,
            iteration_multiplier: 3.0,
            ..CompleteFactors::neutral()
        };
        let est = estimate(&factors);
        assert!(est.raw > MAX_POINTS);
        assert_eq!(est.points, MAX_POINTS);
        assert!(est.capped);
    }

    #[test]
    fn incomplete_selection_is_not_computable() {
        assert_eq!(compute_estimate(&EstimationFactors::new()), None);
    }
}
