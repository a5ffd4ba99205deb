//! "Adds N pts" hints
//!
//! A hint is the difference between the estimate with one choice applied
//! and the estimate without it, both taken from the same baseline. The UI
//! uses [`CompleteFactors::neutral`] as that baseline, not the voter's other
//! selections, so hints are guidance rather than an exact decomposition.
//! Hints never go below zero.

use crate::catalog::{
    self, ActivityOption, Breakpoints, CatalogFactor, DesignerCount, DesignerLevel, Effort,
    FactorKind, FactorOption, Fidelity, SprintAllocation, DESIGN_ACTIVITY_SECTIONS,
    DISCOVERY_ACTIVITIES,
};
use crate::engine::estimate;
use crate::factors::{sanitize_buffer, sanitize_multiplier, CompleteFactors};
use serde::Serialize;

/// A single candidate selection for one factor
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FactorChoice<'a> {
    /// Effort level
    Effort(Effort),
    /// Sprint allocation
    Sprints(SprintAllocation),
    /// Designer headcount; new slots copy the first existing level
    DesignerCount(DesignerCount),
    /// Seniority applied to every designer slot
    DesignerLevel(DesignerLevel),
    /// Breakpoints
    Breakpoints(Breakpoints),
    /// Fidelity
    Fidelity(Fidelity),
    /// Meeting buffer fraction
    MeetingBuffer(f64),
    /// Iteration multiplier
    IterationMultiplier(f64),
    /// Add one discovery activity
    DiscoveryActivity(&'a str),
    /// Add one design/testing activity
    DesignActivity(&'a str),
}

impl FactorChoice<'_> {
    /// Choice for a catalog value; `None` if the value is not in the catalog
    #[must_use]
    pub fn from_kind_value(kind: FactorKind, value: f64) -> Option<Self> {
        match kind {
            FactorKind::Effort => Effort::from_value(value).map(FactorChoice::Effort),
            FactorKind::Sprints => SprintAllocation::from_value(value).map(FactorChoice::Sprints),
            FactorKind::DesignerCount => {
                DesignerCount::from_value(value).map(FactorChoice::DesignerCount)
            }
            FactorKind::DesignerLevel => {
                DesignerLevel::from_value(value).map(FactorChoice::DesignerLevel)
            }
            FactorKind::Breakpoints => {
                Breakpoints::from_value(value).map(FactorChoice::Breakpoints)
            }
            FactorKind::Fidelity => Fidelity::from_value(value).map(FactorChoice::Fidelity),
            FactorKind::MeetingBuffer => catalog::find(kind, value)
                .map(|opt| FactorChoice::MeetingBuffer(opt.value)),
            FactorKind::IterationMultiplier => catalog::find(kind, value)
                .map(|opt| FactorChoice::IterationMultiplier(opt.value)),
        }
    }

    fn apply(self, factors: &mut CompleteFactors) {
        match self {
            FactorChoice::Effort(e) => factors.effort = e,
            FactorChoice::Sprints(s) => factors.sprints = s,
            FactorChoice::DesignerCount(count) => {
                let fill = factors
                    .designer_levels
                    .first()
                    .copied()
                    .unwrap_or(DesignerLevel::Mid);
                factors.designer_levels.resize(count.count(), fill);
            }
            FactorChoice::DesignerLevel(level) => {
                factors.designer_levels.iter_mut().for_each(|l| *l = level);
            }
            FactorChoice::Breakpoints(b) => factors.breakpoints = b,
            FactorChoice::Fidelity(f) => factors.fidelity = f,
            FactorChoice::MeetingBuffer(b) => factors.meeting_buffer = sanitize_buffer(Some(b)),
            FactorChoice::IterationMultiplier(m) => {
                factors.iteration_multiplier = sanitize_multiplier(Some(m));
            }
            FactorChoice::DiscoveryActivity(id) => {
                factors.discovery_activities.insert(id.to_string());
            }
            FactorChoice::DesignActivity(id) => {
                factors.design_activities.insert(id.to_string());
            }
        }
    }
}

/// Points `choice` adds on top of `baseline`, floored at zero
#[must_use]
pub fn marginal_contribution(choice: FactorChoice<'_>, baseline: &CompleteFactors) -> u32 {
    let before = estimate(baseline).points;
    let mut with_choice = baseline.clone();
    choice.apply(&mut with_choice);
    estimate(&with_choice).points.saturating_sub(before)
}

/// Hint for one catalog option
#[derive(Debug, Clone, Copy, Serialize)]
pub struct OptionHint {
    /// The option
    pub option: &'static FactorOption,
    /// Points added over the neutral baseline
    pub points: u32,
}

/// Hint for one checklist activity
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ActivityHint {
    /// Section heading ("Discovery" for the discovery list)
    pub section: &'static str,
    /// The activity
    pub activity: &'static ActivityOption,
    /// Points added over the neutral baseline
    pub points: u32,
}

/// Hints for every option of one factor kind
#[must_use]
pub fn option_hints(kind: FactorKind) -> Vec<OptionHint> {
    let neutral = CompleteFactors::neutral();
    kind.catalog()
        .iter()
        .filter_map(|option| {
            let choice = FactorChoice::from_kind_value(kind, option.value)?;
            Some(OptionHint {
                option,
                points: marginal_contribution(choice, &neutral),
            })
        })
        .collect()
}

/// Hints for every discovery and design/testing activity
#[must_use]
pub fn activity_hints() -> Vec<ActivityHint> {
    let neutral = CompleteFactors::neutral();
    let mut hints: Vec<ActivityHint> = DISCOVERY_ACTIVITIES
        .iter()
        .map(|activity| ActivityHint {
            section: "Discovery",
            activity,
            points: marginal_contribution(FactorChoice::DiscoveryActivity(activity.id), &neutral),
        })
        .collect();

    for section in DESIGN_ACTIVITY_SECTIONS {
        hints.extend(section.activities.iter().map(|activity| ActivityHint {
            section: section.name,
            activity,
            points: marginal_contribution(FactorChoice::DesignActivity(activity.id), &neutral),
        }));
    }
    hints
}
