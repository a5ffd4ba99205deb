//! Factor selections
//!
//! [`EstimationFactors`] is what the voting form builds up and what gets
//! persisted with a vote: every field optional, numbers as the catalogs
//! store them. [`validate`] turns it into a [`CompleteFactors`], the only
//! input the engine accepts.

use crate::catalog::{
    Breakpoints, CatalogFactor, DesignerCount, DesignerLevel, Effort, FactorKind, Fidelity,
    SprintAllocation,
};
use crate::error::FactorError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A possibly partial factor selection, as built by a voter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimationFactors {
    /// Effort catalog value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effort: Option<f64>,
    /// Sprint allocation catalog value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sprints: Option<f64>,
    /// Number of designers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub designer_count: Option<f64>,
    /// One seniority weight per designer
    #[serde(default)]
    pub designer_levels: Vec<f64>,
    /// Breakpoint catalog value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakpoints: Option<f64>,
    /// Fidelity catalog value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fidelity: Option<f64>,
    /// Fractional surcharge, 0 when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meeting_buffer: Option<f64>,
    /// Review cycles, 1 when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iteration_multiplier: Option<f64>,
    /// Selected discovery activity ids
    #[serde(default)]
    pub discovery_activities: Vec<String>,
    /// Selected design/testing activity ids
    #[serde(default)]
    pub design_activities: Vec<String>,
}

impl EstimationFactors {
    /// Empty selection
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With effort
    #[inline]
    #[must_use]
    pub fn with_effort(mut self, effort: Effort) -> Self {
        self.effort = Some(effort.weight());
        self
    }

    /// With sprint allocation
    #[inline]
    #[must_use]
    pub fn with_sprints(mut self, sprints: SprintAllocation) -> Self {
        self.sprints = Some(sprints.weight());
        self
    }

    /// With designers, one level per slot
    #[must_use]
    pub fn with_designers(mut self, levels: &[DesignerLevel]) -> Self {
        self.designer_count = Some(levels.len() as f64);
        self.designer_levels = levels.iter().map(|l| l.weight()).collect();
        self
    }

    /// With breakpoints
    #[inline]
    #[must_use]
    pub fn with_breakpoints(mut self, breakpoints: Breakpoints) -> Self {
        self.breakpoints = Some(breakpoints.weight());
        self
    }

    /// With fidelity
    #[inline]
    #[must_use]
    pub fn with_fidelity(mut self, fidelity: Fidelity) -> Self {
        self.fidelity = Some(fidelity.weight());
        self
    }

    /// With meeting buffer
    #[inline]
    #[must_use]
    pub fn with_meeting_buffer(mut self, buffer: f64) -> Self {
        self.meeting_buffer = Some(buffer);
        self
    }

    /// With iteration multiplier
    #[inline]
    #[must_use]
    pub fn with_iteration_multiplier(mut self, multiplier: f64) -> Self {
        self.iteration_multiplier = Some(multiplier);
        self
    }

    /// Add a discovery activity
    #[must_use]
    pub fn with_discovery(mut self, id: impl Into<String>) -> Self {
        self.discovery_activities.push(id.into());
        self
    }

    /// Add a design/testing activity
    #[must_use]
    pub fn with_design(mut self, id: impl Into<String>) -> Self {
        self.design_activities.push(id.into());
        self
    }
}

/// A validated selection the engine can score
#[derive(Debug, Clone, PartialEq)]
pub struct CompleteFactors {
    /// Effort level
    pub effort: Effort,
    /// Sprint allocation
    pub sprints: SprintAllocation,
    /// One entry per designer; never empty, at most four
    pub designer_levels: Vec<DesignerLevel>,
    /// Breakpoints
    pub breakpoints: Breakpoints,
    /// Fidelity
    pub fidelity: Fidelity,
    /// Finite and non-negative
    pub meeting_buffer: f64,
    /// Finite and positive
    pub iteration_multiplier: f64,
    /// Discovery activity ids, deduplicated
    pub discovery_activities: BTreeSet<String>,
    /// Design/testing activity ids, deduplicated
    pub design_activities: BTreeSet<String>,
}

impl CompleteFactors {
    /// Fixed baseline for option hints: medium effort, half sprint, one mid
    /// designer, single breakpoint, mid fidelity, no buffer, single pass
    #[must_use]
    pub fn neutral() -> Self {
        Self {
            effort: Effort::Medium,
            sprints: SprintAllocation::Half,
            designer_levels: vec![DesignerLevel::Mid],
            breakpoints: Breakpoints::Single,
            fidelity: Fidelity::Mid,
            meeting_buffer: 0.0,
            iteration_multiplier: 1.0,
            discovery_activities: BTreeSet::new(),
            design_activities: BTreeSet::new(),
        }
    }

    /// Designer count implied by the level slots
    #[inline]
    #[must_use]
    pub fn designer_count(&self) -> usize {
        self.designer_levels.len()
    }
}

impl From<&CompleteFactors> for EstimationFactors {
    fn from(factors: &CompleteFactors) -> Self {
        Self {
            effort: Some(factors.effort.weight()),
            sprints: Some(factors.sprints.weight()),
            designer_count: Some(factors.designer_count() as f64),
            designer_levels: factors.designer_levels.iter().map(|l| l.weight()).collect(),
            breakpoints: Some(factors.breakpoints.weight()),
            fidelity: Some(factors.fidelity.weight()),
            meeting_buffer: Some(factors.meeting_buffer),
            iteration_multiplier: Some(factors.iteration_multiplier),
            discovery_activities: factors.discovery_activities.iter().cloned().collect(),
            design_activities: factors.design_activities.iter().cloned().collect(),
        }
    }
}

/// Check a selection and resolve it against the catalogs
///
/// Optional fields never fail validation: a missing, negative or non-finite
/// buffer becomes 0 and a missing or non-positive multiplier becomes 1.
/// Activity ids are kept as given; unknown ids simply score nothing.
///
/// # Errors
/// - [`FactorError::Missing`] if a required factor is unset
/// - [`FactorError::UnknownValue`] if a value is not in its catalog
/// - [`FactorError::DesignerLevelMismatch`] if the level count differs from
///   the designer count
pub fn validate(factors: &EstimationFactors) -> Result<CompleteFactors, FactorError> {
    let effort = required::<Effort>(factors.effort)?;
    let sprints = required::<SprintAllocation>(factors.sprints)?;
    let designer_count = required::<DesignerCount>(factors.designer_count)?;
    let breakpoints = required::<Breakpoints>(factors.breakpoints)?;
    let fidelity = required::<Fidelity>(factors.fidelity)?;

    if factors.designer_levels.len() != designer_count.count() {
        return Err(FactorError::DesignerLevelMismatch {
            expected: designer_count.count(),
            found: factors.designer_levels.len(),
        });
    }

    let designer_levels = factors
        .designer_levels
        .iter()
        .map(|&weight| {
            DesignerLevel::from_value(weight).ok_or(FactorError::UnknownValue {
                kind: FactorKind::DesignerLevel,
                value: weight,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CompleteFactors {
        effort,
        sprints,
        designer_levels,
        breakpoints,
        fidelity,
        meeting_buffer: sanitize_buffer(factors.meeting_buffer),
        iteration_multiplier: sanitize_multiplier(factors.iteration_multiplier),
        discovery_activities: factors.discovery_activities.iter().cloned().collect(),
        design_activities: factors.design_activities.iter().cloned().collect(),
    })
}

/// Whether [`validate`] would succeed
#[inline]
#[must_use]
pub fn is_complete(factors: &EstimationFactors) -> bool {
    validate(factors).is_ok()
}

fn required<T: CatalogFactor>(value: Option<f64>) -> Result<T, FactorError> {
    let value = value.ok_or(FactorError::Missing(T::KIND))?;
    T::from_value(value).ok_or(FactorError::UnknownValue {
        kind: T::KIND,
        value,
    })
}

pub(crate) fn sanitize_buffer(buffer: Option<f64>) -> f64 {
    match buffer {
        Some(b) if b.is_finite() && b >= 0.0 => b,
        _ => 0.0,
    }
}

pub(crate) fn sanitize_multiplier(multiplier: Option<f64>) -> f64 {
    match multiplier {
        Some(m) if m.is_finite() && m > 0.0 => m,
        _ => 1.0,
    }
}
