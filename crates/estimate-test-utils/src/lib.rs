//! Testing utilities for the estimate workspace
//!
//! Shared fixtures and proptest strategies.

#![allow(missing_docs)]

use estimate_core::{
    Breakpoints, CatalogFactor, CompleteFactors, DesignerLevel, Effort, EstimationFactors,
    Fidelity, ParticipantId, SprintAllocation, StoredFactors, TaskId, Vote,
};
use proptest::prelude::*;
use proptest::sample::select;

/// A mid-sized selection: large effort, one sprint, a senior/junior pair,
/// two breakpoints, high fidelity, user research and usability testing
pub fn sample_factors() -> EstimationFactors {
    EstimationFactors::new()
        .with_effort(Effort::Large)
        .with_sprints(SprintAllocation::One)
        .with_designers(&[DesignerLevel::Senior, DesignerLevel::Junior])
        .with_breakpoints(Breakpoints::Two)
        .with_fidelity(Fidelity::High)
        .with_discovery("user-research")
        .with_design("usability-testing")
}

/// The neutral baseline in its stored shape
pub fn neutral_factors() -> EstimationFactors {
    EstimationFactors::from(&CompleteFactors::neutral())
}

/// A vote carrying only a stored value
pub fn raw_vote(task_id: TaskId, value: u32) -> Vote {
    Vote::new(task_id, ParticipantId::new(), value, None)
}

/// A vote carrying current-shape factors and the given stored value
pub fn factor_vote(task_id: TaskId, factors: EstimationFactors, value: u32) -> Vote {
    Vote::new(
        task_id,
        ParticipantId::new(),
        value,
        Some(StoredFactors::Current(factors)),
    )
}

/// A vote carrying the legacy `designers`/`prototypes` layout
pub fn legacy_vote(task_id: TaskId, value: u32) -> Vote {
    let json = serde_json::json!({
        "effort": 5,
        "sprints": 1,
        "designers": 2,
        "breakpoints": 1.5,
        "fidelity": 1,
        "prototypes": 2
    });
    let factors: StoredFactors =
        serde_json::from_value(json).expect("legacy fixture deserializes");
    Vote::new(task_id, ParticipantId::new(), value, Some(factors))
}

fn variant<T: CatalogFactor + std::fmt::Debug>() -> impl Strategy<Value = T> {
    select(T::ALL.to_vec())
}

/// Any complete selection the catalogs allow
pub fn arb_complete_factors() -> impl Strategy<Value = CompleteFactors> {
    (
        variant::<Effort>(),
        variant::<SprintAllocation>(),
        proptest::collection::vec(variant::<DesignerLevel>(), 1..=4),
        variant::<Breakpoints>(),
        variant::<Fidelity>(),
        select(vec![0.0, 0.1, 0.2, 0.3]),
        select(vec![1.0, 2.0, 3.0]),
        proptest::collection::btree_set(
            select(vec!["stakeholder-interviews", "user-research", "journey-mapping"]),
            0..3,
        ),
        proptest::collection::btree_set(
            select(vec!["interactive-prototype", "usability-testing", "design-qa"]),
            0..3,
        ),
    )
        .prop_map(
            |(effort, sprints, levels, breakpoints, fidelity, buffer, mult, disc, design)| {
                CompleteFactors {
                    effort,
                    sprints,
                    designer_levels: levels,
                    breakpoints,
                    fidelity,
                    meeting_buffer: buffer,
                    iteration_multiplier: mult,
                    discovery_activities: disc.into_iter().map(String::from).collect(),
                    design_activities: design.into_iter().map(String::from).collect(),
                }
            },
        )
}
