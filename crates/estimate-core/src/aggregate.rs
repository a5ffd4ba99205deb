//! Vote aggregation and task totals
//!
//! [`finalize`] is the one place the buffer/iteration arithmetic lives.
//! Task cards, history, exports and the engine itself all go through it.

use crate::engine::estimate;
use crate::error::EstimateError;
use crate::legacy::{normalize, NormalizedFactors};
use crate::model::Vote;
use serde::{Deserialize, Serialize};

/// Round to the nearest integer, halves toward positive infinity
#[inline]
#[must_use]
pub fn round_half_up(x: f64) -> f64 {
    let floor = x.floor();
    if x - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

/// Total points for a base estimate: `round((base + base × buffer) × multiplier)`
///
/// # Panics
/// If `meeting_buffer` or `iteration_multiplier` is NaN or infinite. Use
/// [`try_finalize`] for values that have not been checked yet.
#[must_use]
pub fn finalize(base_estimate: u32, meeting_buffer: f64, iteration_multiplier: f64) -> u32 {
    assert!(
        meeting_buffer.is_finite() && iteration_multiplier.is_finite(),
        "finalize called with non-finite buffer {meeting_buffer} or multiplier {iteration_multiplier}"
    );
    let base = f64::from(base_estimate);
    // `as` saturates: negative products land on 0
    round_half_up((base + base * meeting_buffer) * iteration_multiplier) as u32
}

/// Checked [`finalize`] for boundary callers
///
/// # Errors
/// - [`EstimateError::NonFinite`] for NaN or infinite parameters
/// - [`EstimateError::OutOfRange`] for a negative buffer or a multiplier
///   that is not positive
pub fn try_finalize(
    base_estimate: u32,
    meeting_buffer: f64,
    iteration_multiplier: f64,
) -> Result<u32, EstimateError> {
    for (name, value) in [
        ("meeting buffer", meeting_buffer),
        ("iteration multiplier", iteration_multiplier),
    ] {
        if !value.is_finite() {
            return Err(EstimateError::NonFinite { name, value });
        }
    }
    if meeting_buffer < 0.0 {
        return Err(EstimateError::OutOfRange {
            name: "meeting buffer",
            value: meeting_buffer,
        });
    }
    if iteration_multiplier <= 0.0 {
        return Err(EstimateError::OutOfRange {
            name: "iteration multiplier",
            value: iteration_multiplier,
        });
    }
    Ok(finalize(base_estimate, meeting_buffer, iteration_multiplier))
}

/// Where a vote's point value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointSource {
    /// Rescored from the stored factors
    Recomputed,
    /// Stored value used as-is
    Stored,
}

/// Point value of one vote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VotePoints {
    /// Points counted for this vote
    pub points: u32,
    /// Provenance
    pub source: PointSource,
}

/// Summary statistics over a task's votes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteSummary {
    /// Mean, rounded once at the end
    pub average: u32,
    /// Lowest vote
    pub min: u32,
    /// Highest vote
    pub max: u32,
    /// Number of votes
    pub count: usize,
}

/// Points a vote contributes to aggregation
///
/// Stored factors win over the stored value whenever they can be scored.
/// Votes without factors use their stored value. Votes whose factors are
/// present but unusable also fall back to the stored value, with a warning.
#[must_use]
pub fn vote_points(vote: &Vote) -> VotePoints {
    let stored = VotePoints {
        points: vote.value,
        source: PointSource::Stored,
    };

    let Some(factors) = &vote.factors else {
        return stored;
    };

    match normalize(factors) {
        NormalizedFactors::Ready(complete) => VotePoints {
            points: estimate(&complete).points,
            source: PointSource::Recomputed,
        },
        NormalizedFactors::Unrecoverable(err) => {
            tracing::warn!(
                vote_id = %vote.id,
                task_id = %vote.task_id,
                stored_value = vote.value,
                %err,
                "vote factors unusable, falling back to stored value"
            );
            stored
        }
    }
}

/// Summarize votes; `None` when there are no votes
#[must_use]
pub fn aggregate(votes: &[Vote]) -> Option<VoteSummary> {
    let points: Vec<u32> = votes.iter().map(|v| vote_points(v).points).collect();
    let min = *points.iter().min()?;
    let max = *points.iter().max()?;
    let sum: u64 = points.iter().map(|&p| u64::from(p)).sum();
    let average = round_half_up(sum as f64 / points.len() as f64) as u32;

    Some(VoteSummary {
        average,
        min,
        max,
        count: points.len(),
    })
}
