//! Error types for the estimate core
//!
//! None of these are fatal to an estimation round:
//! - Factor validation failures mean "not yet computable"
//! - Estimate errors flag programmer mistakes at the arithmetic boundary
//! - Session code errors come from parsing user-typed join codes

use crate::catalog::FactorKind;

/// Why a factor selection cannot produce a point value
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FactorError {
    /// A required factor has not been selected yet
    #[error("missing required factor: {0}")]
    Missing(FactorKind),

    /// Value does not belong to the factor's catalog
    #[error("value {value} is not a {kind} option")]
    UnknownValue {
        /// Which catalog was consulted
        kind: FactorKind,
        /// The rejected value
        value: f64,
    },

    /// One seniority level is required per designer slot
    #[error("expected {expected} designer levels, found {found}")]
    DesignerLevelMismatch {
        /// Number of designers selected
        expected: usize,
        /// Number of levels supplied
        found: usize,
    },

    /// Stored factors could not be read as any known shape
    #[error("unrecognized factor shape: {0}")]
    Unrecognized(String),
}

impl FactorError {
    /// Incomplete selections are expected while a vote is being built
    #[inline]
    #[must_use]
    pub fn is_incomplete(&self) -> bool {
        matches!(
            self,
            Self::Missing(_) | Self::DesignerLevelMismatch { .. }
        )
    }
}

/// Arithmetic boundary errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EstimateError {
    /// Buffer or multiplier was NaN or infinite
    #[error("non-finite {name}: {value}")]
    NonFinite {
        /// Parameter name
        name: &'static str,
        /// Offending value
        value: f64,
    },

    /// Buffer below zero or multiplier not positive
    #[error("{name} out of range: {value}")]
    OutOfRange {
        /// Parameter name
        name: &'static str,
        /// Offending value
        value: f64,
    },
}

/// Join code parsing errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionCodeError {
    /// Wrong number of characters
    #[error("session code must be {expected} characters, got {found}")]
    InvalidLength {
        /// Required length
        expected: usize,
        /// Actual length
        found: usize,
    },

    /// Character outside the code alphabet
    #[error("invalid character in session code: {0:?}")]
    InvalidCharacter(char),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factor_error_display() {
        let err = FactorError::Missing(FactorKind::Effort);
        assert!(err.to_string().contains("effort"));

        let err = FactorError::DesignerLevelMismatch {
            expected: 2,
            found: 1,
        };
        assert_eq!(err.to_string(), "expected 2 designer levels, found 1");
    }

    #[test]
    fn factor_error_incomplete() {
        assert!(FactorError::Missing(FactorKind::Fidelity).is_incomplete());
        assert!(!FactorError::UnknownValue {
            kind: FactorKind::Effort,
            value: 4.0
        }
        .is_incomplete());
    }
}
