//! Factor catalogs
//!
//! Static, closed tables of selectable options. Each factor kind has its own
//! enum so a value from one catalog cannot be passed where another is
//! expected; the numeric `value` of an option doubles as its weight.
//!
//! Lookups go by value, never by array position. A value that is not in a
//! catalog resolves to `None` and displays as [`UNKNOWN_LABEL`].

use serde::Serialize;
use std::fmt;

/// Display fallback for values not found in a catalog
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Tolerance for matching stored floating-point values against catalog weights
const VALUE_EPSILON: f64 = 1e-9;

/// A selectable catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FactorOption {
    /// Weight and identity of the option
    pub value: f64,
    /// Short display label
    pub label: &'static str,
    /// Longer help text
    pub description: &'static str,
}

impl FactorOption {
    const fn new(value: f64, label: &'static str, description: &'static str) -> Self {
        Self {
            value,
            label,
            description,
        }
    }

    /// Whether `value` identifies this option
    #[inline]
    #[must_use]
    pub fn matches(&self, value: f64) -> bool {
        (self.value - value).abs() < VALUE_EPSILON
    }
}

/// Multi-select checklist entry with an additive point impact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActivityOption {
    /// Stable key stored in votes
    pub id: &'static str,
    /// Short display label
    pub label: &'static str,
    /// Longer help text
    pub description: &'static str,
    /// Points added when selected
    pub impact: u32,
}

impl ActivityOption {
    const fn new(
        id: &'static str,
        label: &'static str,
        description: &'static str,
        impact: u32,
    ) -> Self {
        Self {
            id,
            label,
            description,
            impact,
        }
    }
}

/// Named group of design/testing activities
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ActivitySection {
    /// Section heading
    pub name: &'static str,
    /// Activities in display order
    pub activities: &'static [ActivityOption],
}

/// Every catalog-valued factor dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FactorKind {
    /// Overall effort level
    Effort,
    /// Share of sprint capacity
    Sprints,
    /// Number of designers assigned
    DesignerCount,
    /// Seniority of one designer slot
    DesignerLevel,
    /// Responsive breakpoints to cover
    Breakpoints,
    /// Deliverable fidelity
    Fidelity,
    /// Meeting/coordination surcharge
    MeetingBuffer,
    /// Expected review cycles
    IterationMultiplier,
}

impl FactorKind {
    /// All kinds in display order
    pub const ALL: [FactorKind; 8] = [
        FactorKind::Effort,
        FactorKind::Sprints,
        FactorKind::DesignerCount,
        FactorKind::DesignerLevel,
        FactorKind::Breakpoints,
        FactorKind::Fidelity,
        FactorKind::MeetingBuffer,
        FactorKind::IterationMultiplier,
    ];

    /// Catalog backing this kind
    #[must_use]
    pub fn catalog(self) -> &'static [FactorOption] {
        match self {
            FactorKind::Effort => EFFORT,
            FactorKind::Sprints => SPRINTS,
            FactorKind::DesignerCount => DESIGNER_COUNTS,
            FactorKind::DesignerLevel => DESIGNER_LEVELS,
            FactorKind::Breakpoints => BREAKPOINTS,
            FactorKind::Fidelity => FIDELITY,
            FactorKind::MeetingBuffer => MEETING_BUFFERS,
            FactorKind::IterationMultiplier => ITERATION_MULTIPLIERS,
        }
    }
}

impl fmt::Display for FactorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FactorKind::Effort => "effort",
            FactorKind::Sprints => "sprint allocation",
            FactorKind::DesignerCount => "designer count",
            FactorKind::DesignerLevel => "designer level",
            FactorKind::Breakpoints => "breakpoints",
            FactorKind::Fidelity => "fidelity",
            FactorKind::MeetingBuffer => "meeting buffer",
            FactorKind::IterationMultiplier => "iteration multiplier",
        };
        f.write_str(name)
    }
}

/// Find the option carrying `value` in the catalog for `kind`
#[must_use]
pub fn find(kind: FactorKind, value: f64) -> Option<&'static FactorOption> {
    kind.catalog().iter().find(|opt| opt.matches(value))
}

/// Label for `value`, or [`UNKNOWN_LABEL`]
#[must_use]
pub fn label_or_unknown(kind: FactorKind, value: f64) -> &'static str {
    find(kind, value).map_or(UNKNOWN_LABEL, |opt| opt.label)
}

/// A closed catalog enum
///
/// Implementors list their variants in `ALL` in the same order as the
/// entries of their catalog, so `index` addresses both.
pub trait CatalogFactor: Copy + Sized + 'static {
    /// Which catalog this enum is drawn from
    const KIND: FactorKind;

    /// Every variant, in catalog order
    const ALL: &'static [Self];

    /// Position of this variant in `ALL` and in the catalog
    fn index(self) -> usize;

    /// Catalog entry for this variant
    #[inline]
    fn option(self) -> &'static FactorOption {
        &Self::KIND.catalog()[self.index()]
    }

    /// Numeric weight
    #[inline]
    fn weight(self) -> f64 {
        self.option().value
    }

    /// Resolve a stored value back to a variant
    fn from_value(value: f64) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|variant| variant.option().matches(value))
    }
}

/// Overall effort level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Effort {
    /// Copy change, icon swap
    Trivial,
    /// Single screen tweak
    Small,
    /// A few screens or one flow
    Medium,
    /// Multi-flow feature
    Large,
    /// New product area
    VeryLarge,
    /// Platform-wide redesign
    Massive,
}

/// Effort options
pub const EFFORT: &[FactorOption] = &[
    FactorOption::new(1.0, "Trivial", "Copy change, icon swap or minor polish"),
    FactorOption::new(2.0, "Small", "A single screen or component tweak"),
    FactorOption::new(3.0, "Medium", "A few screens or one complete flow"),
    FactorOption::new(5.0, "Large", "A multi-flow feature with new patterns"),
    FactorOption::new(8.0, "Very large", "A new product area or major feature"),
    FactorOption::new(13.0, "Massive", "Platform-wide redesign or new product"),
];

impl CatalogFactor for Effort {
    const KIND: FactorKind = FactorKind::Effort;
    const ALL: &'static [Self] = &[
        Effort::Trivial,
        Effort::Small,
        Effort::Medium,
        Effort::Large,
        Effort::VeryLarge,
        Effort::Massive,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// Share of sprint capacity the task occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SprintAllocation {
    /// Quarter of a sprint
    Quarter,
    /// Half a sprint
    Half,
    /// One sprint
    One,
    /// One and a half sprints
    OneAndHalf,
    /// Two sprints
    Two,
    /// Three sprints
    Three,
}

/// Sprint allocation options
pub const SPRINTS: &[FactorOption] = &[
    FactorOption::new(0.25, "Quarter sprint", "A couple of days inside one sprint"),
    FactorOption::new(0.5, "Half sprint", "About a week of sprint capacity"),
    FactorOption::new(1.0, "1 sprint", "A full sprint"),
    FactorOption::new(1.5, "1.5 sprints", "Spills into a second sprint"),
    FactorOption::new(2.0, "2 sprints", "Two full sprints"),
    FactorOption::new(3.0, "3 sprints", "Three sprints or a full cycle"),
];

impl CatalogFactor for SprintAllocation {
    const KIND: FactorKind = FactorKind::Sprints;
    const ALL: &'static [Self] = &[
        SprintAllocation::Quarter,
        SprintAllocation::Half,
        SprintAllocation::One,
        SprintAllocation::OneAndHalf,
        SprintAllocation::Two,
        SprintAllocation::Three,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// Number of designers assigned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DesignerCount {
    /// Solo designer
    One,
    /// Pair
    Two,
    /// Three designers
    Three,
    /// Four designers
    Four,
}

impl DesignerCount {
    /// Number of designer slots
    #[inline]
    #[must_use]
    pub fn count(self) -> usize {
        self.index() + 1
    }

    /// Variant for a slot count
    #[must_use]
    pub fn from_count(count: usize) -> Option<Self> {
        count
            .checked_sub(1)
            .and_then(|i| Self::ALL.get(i).copied())
    }
}

/// Designer count options
pub const DESIGNER_COUNTS: &[FactorOption] = &[
    FactorOption::new(1.0, "1 designer", "One designer owns the task"),
    FactorOption::new(2.0, "2 designers", "A pair shares the work"),
    FactorOption::new(3.0, "3 designers", "A small squad"),
    FactorOption::new(4.0, "4 designers", "A full design team"),
];

impl CatalogFactor for DesignerCount {
    const KIND: FactorKind = FactorKind::DesignerCount;
    const ALL: &'static [Self] = &[
        DesignerCount::One,
        DesignerCount::Two,
        DesignerCount::Three,
        DesignerCount::Four,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// Seniority of one designer slot
///
/// Less experienced designers carry a higher weight: the same task costs
/// them more effort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DesignerLevel {
    /// Senior designer
    Senior,
    /// Mid-level designer
    Mid,
    /// Junior designer
    Junior,
}

/// Designer seniority options
pub const DESIGNER_LEVELS: &[FactorOption] = &[
    FactorOption::new(0.8, "Senior", "Works independently, knows the system"),
    FactorOption::new(1.0, "Mid", "Needs occasional guidance"),
    FactorOption::new(1.2, "Junior", "Needs regular review and pairing"),
];

impl CatalogFactor for DesignerLevel {
    const KIND: FactorKind = FactorKind::DesignerLevel;
    const ALL: &'static [Self] = &[
        DesignerLevel::Senior,
        DesignerLevel::Mid,
        DesignerLevel::Junior,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// Responsive breakpoints to design for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Breakpoints {
    /// One layout
    Single,
    /// Two layouts
    Two,
    /// Three layouts
    Three,
    /// Four or more layouts
    FourPlus,
}

/// Breakpoint options
pub const BREAKPOINTS: &[FactorOption] = &[
    FactorOption::new(1.0, "Single", "One layout, e.g. desktop only"),
    FactorOption::new(1.5, "Two", "Desktop and mobile"),
    FactorOption::new(2.0, "Three", "Desktop, tablet and mobile"),
    FactorOption::new(2.5, "Four or more", "Every breakpoint plus edge cases"),
];

impl CatalogFactor for Breakpoints {
    const KIND: FactorKind = FactorKind::Breakpoints;
    const ALL: &'static [Self] = &[
        Breakpoints::Single,
        Breakpoints::Two,
        Breakpoints::Three,
        Breakpoints::FourPlus,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// Deliverable fidelity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Fidelity {
    /// Wireframes
    Wireframe,
    /// Mid-fidelity mockups
    Mid,
    /// Pixel-perfect mockups
    High,
    /// Clickable prototype
    Interactive,
}

/// Fidelity options
pub const FIDELITY: &[FactorOption] = &[
    FactorOption::new(0.5, "Wireframe", "Low-fidelity structure only"),
    FactorOption::new(1.0, "Mid-fidelity", "Layout and content with basic styling"),
    FactorOption::new(1.5, "High-fidelity", "Pixel-perfect, production-ready mockups"),
    FactorOption::new(2.0, "Interactive", "High-fidelity with clickable prototype"),
];

impl CatalogFactor for Fidelity {
    const KIND: FactorKind = FactorKind::Fidelity;
    const ALL: &'static [Self] = &[
        Fidelity::Wireframe,
        Fidelity::Mid,
        Fidelity::High,
        Fidelity::Interactive,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// Meeting buffer options (fractional surcharge)
pub const MEETING_BUFFERS: &[FactorOption] = &[
    FactorOption::new(0.0, "None", "No extra coordination expected"),
    FactorOption::new(0.1, "10%", "A few check-ins"),
    FactorOption::new(0.2, "20%", "Regular stakeholder reviews"),
    FactorOption::new(0.3, "30%", "Heavy cross-team alignment"),
];

/// Iteration multiplier options
pub const ITERATION_MULTIPLIERS: &[FactorOption] = &[
    FactorOption::new(1.0, "1x", "Single pass"),
    FactorOption::new(2.0, "2x", "One round of revisions"),
    FactorOption::new(3.0, "3x", "Several review cycles"),
];

/// Discovery checklist
pub const DISCOVERY_ACTIVITIES: &[ActivityOption] = &[
    ActivityOption::new(
        "stakeholder-interviews",
        "Stakeholder interviews",
        "Align on goals and constraints with stakeholders",
        3,
    ),
    ActivityOption::new(
        "user-research",
        "User research",
        "Interviews or surveys with end users",
        5,
    ),
    ActivityOption::new(
        "competitive-analysis",
        "Competitive analysis",
        "Review comparable products and patterns",
        2,
    ),
    ActivityOption::new(
        "journey-mapping",
        "Journey mapping",
        "Map the end-to-end user journey",
        3,
    ),
    ActivityOption::new(
        "content-audit",
        "Content audit",
        "Inventory and assess existing content",
        2,
    ),
];

const DESIGN_ACTIVITIES: &[ActivityOption] = &[
    ActivityOption::new(
        "design-system-components",
        "New design system components",
        "Components that must be added to the design system",
        3,
    ),
    ActivityOption::new(
        "interactive-prototype",
        "Interactive prototype",
        "Clickable prototype for review or testing",
        3,
    ),
    ActivityOption::new(
        "micro-interactions",
        "Micro-interactions",
        "Motion and transition specifications",
        2,
    ),
    ActivityOption::new(
        "dark-mode",
        "Dark mode variants",
        "Alternate theme for every screen",
        2,
    ),
];

const TESTING_ACTIVITIES: &[ActivityOption] = &[
    ActivityOption::new(
        "usability-testing",
        "Usability testing",
        "Moderated or unmoderated sessions with users",
        5,
    ),
    ActivityOption::new(
        "accessibility-review",
        "Accessibility review",
        "Contrast, focus order and screen reader checks",
        2,
    ),
    ActivityOption::new(
        "design-qa",
        "Design QA",
        "Review the implementation against the designs",
        1,
    ),
    ActivityOption::new(
        "ab-test-variants",
        "A/B test variants",
        "Alternate designs for experimentation",
        3,
    ),
];

/// Design and testing checklist, grouped by section
pub const DESIGN_ACTIVITY_SECTIONS: &[ActivitySection] = &[
    ActivitySection {
        name: "Design",
        activities: DESIGN_ACTIVITIES,
    },
    ActivitySection {
        name: "Testing",
        activities: TESTING_ACTIVITIES,
    },
];

/// Look up a discovery activity by id
#[must_use]
pub fn find_discovery_activity(id: &str) -> Option<&'static ActivityOption> {
    DISCOVERY_ACTIVITIES.iter().find(|a| a.id == id)
}

/// Look up a design/testing activity by id across all sections
#[must_use]
pub fn find_design_activity(id: &str) -> Option<&'static ActivityOption> {
    DESIGN_ACTIVITY_SECTIONS
        .iter()
        .flat_map(|section| section.activities.iter())
        .find(|a| a.id == id)
}

/// Impact of a discovery activity; unknown ids contribute nothing
#[inline]
#[must_use]
pub fn discovery_impact(id: &str) -> u32 {
    find_discovery_activity(id).map_or(0, |a| a.impact)
}

/// Impact of a design/testing activity; unknown ids contribute nothing
#[inline]
#[must_use]
pub fn design_impact(id: &str) -> u32 {
    find_design_activity(id).map_or(0, |a| a.impact)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn assert_variants_match_catalog<T: CatalogFactor>() {
        assert_eq!(T::ALL.len(), T::KIND.catalog().len());
        for (i, variant) in T::ALL.iter().enumerate() {
            assert_eq!(variant.index(), i);
            assert_eq!(T::from_value(variant.weight()).map(T::index), Some(i));
        }
    }

    #[test]
    fn enums_line_up_with_catalogs() {
        assert_variants_match_catalog::<Effort>();
        assert_variants_match_catalog::<SprintAllocation>();
        assert_variants_match_catalog::<DesignerCount>();
        assert_variants_match_catalog::<DesignerLevel>();
        assert_variants_match_catalog::<Breakpoints>();
        assert_variants_match_catalog::<Fidelity>();
    }

    #[test]
    fn catalog_values_are_unique_and_ascending() {
        for kind in FactorKind::ALL {
            let values: Vec<f64> = kind.catalog().iter().map(|o| o.value).collect();
            for pair in values.windows(2) {
                assert!(pair[0] < pair[1], "{kind} catalog not ascending");
            }
            assert!(values.iter().all(|v| *v >= 0.0));
        }
    }

    #[test]
    fn activity_ids_are_unique() {
        let mut seen = HashSet::new();
        for a in DISCOVERY_ACTIVITIES {
            assert!(seen.insert(a.id));
        }
        for section in DESIGN_ACTIVITY_SECTIONS {
            for a in section.activities {
                assert!(seen.insert(a.id), "duplicate id {}", a.id);
            }
        }
    }

    #[test]
    fn find_by_value() {
        assert_eq!(find(FactorKind::Effort, 5.0).map(|o| o.label), Some("Large"));
        assert_eq!(find(FactorKind::Sprints, 0.5).map(|o| o.label), Some("Half sprint"));
        assert!(find(FactorKind::Effort, 4.0).is_none());
    }

    #[test]
    fn unknown_values_get_fallback_label() {
        assert_eq!(label_or_unknown(FactorKind::Fidelity, 7.0), UNKNOWN_LABEL);
        assert_eq!(label_or_unknown(FactorKind::Fidelity, 2.0), "Interactive");
    }

    #[test]
    fn activity_lookup() {
        assert_eq!(discovery_impact("user-research"), 5);
        assert_eq!(design_impact("usability-testing"), 5);
        assert_eq!(design_impact("user-research"), 0);
        assert_eq!(discovery_impact("nope"), 0);
    }

    #[test]
    fn designer_count_round_trip() {
        assert_eq!(DesignerCount::from_count(3), Some(DesignerCount::Three));
        assert_eq!(DesignerCount::from_count(0), None);
        assert_eq!(DesignerCount::from_count(5), None);
        assert_eq!(DesignerCount::Four.count(), 4);
    }
}
