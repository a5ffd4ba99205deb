//! Stored factor shapes
//!
//! Older votes recorded a single `designers` count instead of per-designer
//! levels, and a `prototypes` count instead of activity checklists.
//! [`normalize`] reads any stored shape into [`CompleteFactors`] or says why
//! it cannot.

use crate::catalog::{CatalogFactor, DesignerLevel};
use crate::error::FactorError;
use crate::factors::{validate, CompleteFactors, EstimationFactors};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Design activity a legacy prototype count maps onto
pub const LEGACY_PROTOTYPE_ACTIVITY: &str = "interactive-prototype";

/// Upper bound on level slots synthesized from a legacy headcount
const MAX_LEGACY_SLOTS: usize = 16;

/// Factors as found on a stored vote
///
/// Serializes as the inner shape. Reading picks the shape from the keys
/// present, see [`StoredFactors::from_value`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StoredFactors {
    /// Pre-seniority layout: `designers` without per-designer levels
    Legacy(LegacyFactors),
    /// Current layout
    Current(EstimationFactors),
    /// Anything else that was persisted
    Unrecognized(Value),
}

impl StoredFactors {
    /// Classify a persisted JSON document
    ///
    /// A `designers` headcount marks the legacy layout only when neither
    /// `designerCount` nor `designerLevels` is present; records carrying both
    /// keep their explicit seniority.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        let Some(object) = value.as_object() else {
            return Self::Unrecognized(value);
        };
        let legacy = object.contains_key("designers")
            && !object.contains_key("designerCount")
            && !object.contains_key("designerLevels");

        if legacy {
            if let Ok(factors) = LegacyFactors::deserialize(&value) {
                return Self::Legacy(factors);
            }
        }
        match EstimationFactors::deserialize(&value) {
            Ok(factors) => Self::Current(factors),
            Err(_) => Self::Unrecognized(value),
        }
    }
}

impl<'de> Deserialize<'de> for StoredFactors {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from_value)
    }
}

impl From<EstimationFactors> for StoredFactors {
    fn from(factors: EstimationFactors) -> Self {
        Self::Current(factors)
    }
}

/// Older vote layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyFactors {
    /// Effort catalog value
    #[serde(default)]
    pub effort: Option<f64>,
    /// Sprint allocation catalog value
    #[serde(default)]
    pub sprints: Option<f64>,
    /// Designer headcount, no seniority
    pub designers: f64,
    /// Breakpoint catalog value
    #[serde(default)]
    pub breakpoints: Option<f64>,
    /// Fidelity catalog value
    #[serde(default)]
    pub fidelity: Option<f64>,
    /// Number of prototypes requested
    #[serde(default)]
    pub prototypes: Option<f64>,
    /// Fractional surcharge
    #[serde(default)]
    pub meeting_buffer: Option<f64>,
    /// Review cycles
    #[serde(default)]
    pub iteration_multiplier: Option<f64>,
}

impl LegacyFactors {
    /// Rewrite into the current layout
    ///
    /// Every legacy designer becomes a mid-level designer. Any positive
    /// prototype count selects [`LEGACY_PROTOTYPE_ACTIVITY`].
    #[must_use]
    pub fn upgrade(&self) -> EstimationFactors {
        let slots = if self.designers.is_finite() && self.designers >= 0.0 {
            (self.designers as usize).min(MAX_LEGACY_SLOTS)
        } else {
            0
        };

        let design_activities = match self.prototypes {
            Some(p) if p > 0.0 => vec![LEGACY_PROTOTYPE_ACTIVITY.to_string()],
            _ => Vec::new(),
        };

        EstimationFactors {
            effort: self.effort,
            sprints: self.sprints,
            designer_count: Some(self.designers),
            designer_levels: vec![DesignerLevel::Mid.weight(); slots],
            breakpoints: self.breakpoints,
            fidelity: self.fidelity,
            meeting_buffer: self.meeting_buffer,
            iteration_multiplier: self.iteration_multiplier,
            discovery_activities: Vec::new(),
            design_activities,
        }
    }
}

/// Outcome of reading stored factors
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizedFactors {
    /// Scoreable selection
    Ready(CompleteFactors),
    /// Cannot be scored; the vote's stored value is all there is
    Unrecoverable(FactorError),
}

impl NormalizedFactors {
    /// The selection, if scoreable
    #[inline]
    #[must_use]
    pub fn ready(self) -> Option<CompleteFactors> {
        match self {
            Self::Ready(factors) => Some(factors),
            Self::Unrecoverable(_) => None,
        }
    }
}

/// Read any stored shape; never panics
#[must_use]
pub fn normalize(stored: &StoredFactors) -> NormalizedFactors {
    let result = match stored {
        StoredFactors::Legacy(legacy) => validate(&legacy.upgrade()),
        StoredFactors::Current(current) => validate(current),
        StoredFactors::Unrecognized(value) => {
            Err(FactorError::Unrecognized(truncate(&value.to_string())))
        }
    };

    match result {
        Ok(factors) => NormalizedFactors::Ready(factors),
        Err(err) => NormalizedFactors::Unrecoverable(err),
    }
}

fn truncate(s: &str) -> String {
    const MAX: usize = 80;
    match s.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
