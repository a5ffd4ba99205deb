//! Estimate Core - scoring for collaborative design-task estimation
//!
//! One pure module for everything that turns estimation factors into
//! points:
//! - Factor catalogs (effort, sprints, designers, breakpoints, fidelity,
//!   buffers, iterations, activities)
//! - Factor validation and legacy vote normalization
//! - The estimate engine, with hours and T-shirt conversions
//! - "Adds N pts" hints per option
//! - Vote aggregation and the task total formula
//! - Session join codes
//!
//! # Example
//!
//! ```rust
//! use estimate_core::prelude::*;
//!
//! let factors = EstimationFactors::new()
//!     .with_effort(Effort::Large)
//!     .with_sprints(SprintAllocation::One)
//!     .with_designers(&[DesignerLevel::Mid])
//!     .with_breakpoints(Breakpoints::Two)
//!     .with_fidelity(Fidelity::High)
//!     .with_discovery("user-research");
//!
//! let est = compute_estimate(&factors).expect("complete selection");
//! assert_eq!(est.points, 11);
//! assert_eq!(estimate_to_tshirt_size(est.points), "M");
//! assert_eq!(finalize(est.points, 0.2, 2.0), 26);
//! ```

#![warn(unreachable_pub)]

pub mod aggregate;
pub mod buckets;
pub mod catalog;
pub mod engine;
pub mod error;
pub mod factors;
pub mod hints;
pub mod legacy;
pub mod model;
pub mod session_code;

// Re-exports for convenience
pub use aggregate::{
    aggregate, finalize, round_half_up, try_finalize, vote_points, PointSource, VotePoints,
    VoteSummary,
};
pub use buckets::{estimate_to_hours, estimate_to_tshirt_size, HoursBucket, TShirtSize};
pub use catalog::{
    find, label_or_unknown, ActivityOption, ActivitySection, Breakpoints, CatalogFactor,
    DesignerCount, DesignerLevel, Effort, FactorKind, FactorOption, Fidelity, SprintAllocation,
    UNKNOWN_LABEL,
};
pub use engine::{
    compute_breakdown, compute_estimate, estimate, Estimate, EstimateBreakdown, MAX_POINTS,
};
pub use error::{EstimateError, FactorError, SessionCodeError};
pub use factors::{is_complete, validate, CompleteFactors, EstimationFactors};
pub use hints::{activity_hints, marginal_contribution, option_hints, FactorChoice};
pub use legacy::{normalize, LegacyFactors, NormalizedFactors, StoredFactors};
pub use model::{
    Participant, ParticipantId, Session, SessionId, Task, TaskId, TaskStatus, Vote, VoteId,
};
pub use session_code::{generate_session_code, generate_session_code_with, SessionCode};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for scoring and aggregation
    pub use crate::{
        aggregate, compute_estimate, estimate_to_hours, estimate_to_tshirt_size, finalize,
        Breakpoints, CatalogFactor, CompleteFactors, DesignerLevel, Effort, Estimate,
        EstimationFactors, Fidelity, SprintAllocation, Vote, VoteSummary,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
