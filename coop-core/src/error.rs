//! Coop Score Error Codes Registry
//!
//! Error code format: COOP-{area}-{sequence}
//! - COOP-GRADE: Grade resolution errors
//! - COOP-SPEC: Contract specification errors
//! - COOP-PARAM: Calculation parameter errors
//! - COOP-PLAYER: Contributor data errors
//! - COOP-DATA: Missing snapshot data

use thiserror::Error;

/// Coop score result type
pub type CoopResult<T> = Result<T, CoopError>;

/// Coop score error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoopError {
    // ============================================================
    // Grade Errors (COOP-GRADE-*)
    // ============================================================
    /// [COOP-GRADE-001] Grade code outside the five letter tiers
    #[error("[COOP-GRADE-001] Unknown grade {grade:?}")]
    UnknownGrade { grade: String },

    // ============================================================
    // Spec Errors (COOP-SPEC-*)
    // ============================================================
    /// [COOP-SPEC-001] Contract has no grade spec for the resolved grade
    #[error("[COOP-SPEC-001] No grade spec for grade {grade} in contract {contract_id}")]
    SpecNotFound { contract_id: String, grade: String },

    /// [COOP-SPEC-002] Grade spec or contract is malformed
    #[error("[COOP-SPEC-002] Invalid spec: {reason}")]
    InvalidSpec { reason: String },

    // ============================================================
    // Parameter Errors (COOP-PARAM-*)
    // ============================================================
    /// [COOP-PARAM-001] Calculation input is not an integer
    #[error("[COOP-PARAM-001] Invalid parameter {name}: {value} is not an integer")]
    InvalidParameter { name: String, value: f64 },

    /// [COOP-PARAM-002] Combined contribution rate is not positive
    #[error("[COOP-PARAM-002] Total contribution rate {total_rate} is not positive")]
    ZeroRate { total_rate: f64 },

    // ============================================================
    // Contributor Errors (COOP-PLAYER-*)
    // ============================================================
    /// [COOP-PLAYER-001] Contributor record is unusable
    #[error("[COOP-PLAYER-001] Invalid contributor data for {player}: {reason}")]
    InvalidContributorData { player: String, reason: String },

    // ============================================================
    // Data Errors (COOP-DATA-*)
    // ============================================================
    /// [COOP-DATA-001] Required field absent
    #[error("[COOP-DATA-001] Missing required field {field}")]
    MissingData { field: String },
}

impl CoopError {
    /// Create an invalid spec error
    pub fn invalid_spec(reason: impl Into<String>) -> Self {
        CoopError::InvalidSpec {
            reason: reason.into(),
        }
    }

    /// Create an invalid contributor data error
    pub fn invalid_contributor(player: impl Into<String>, reason: impl Into<String>) -> Self {
        CoopError::InvalidContributorData {
            player: player.into(),
            reason: reason.into(),
        }
    }

    /// Create a missing data error
    pub fn missing(field: impl Into<String>) -> Self {
        CoopError::MissingData {
            field: field.into(),
        }
    }

    /// Stable error code used in structured output
    pub fn code(&self) -> &'static str {
        match self {
            CoopError::UnknownGrade { .. } => "COOP-GRADE-001",
            CoopError::SpecNotFound { .. } => "COOP-SPEC-001",
            CoopError::InvalidSpec { .. } => "COOP-SPEC-002",
            CoopError::InvalidParameter { .. } => "COOP-PARAM-001",
            CoopError::ZeroRate { .. } => "COOP-PARAM-002",
            CoopError::InvalidContributorData { .. } => "COOP-PLAYER-001",
            CoopError::MissingData { .. } => "COOP-DATA-001",
        }
    }
}

/// Require an integral, finite value
pub(crate) fn require_integer(name: &str, value: f64) -> CoopResult<f64> {
    if value.is_finite() && value.fract() == 0.0 {
        Ok(value)
    } else {
        Err(CoopError::InvalidParameter {
            name: name.to_string(),
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_carries_code() {
        let err = CoopError::UnknownGrade {
            grade: "zz".to_string(),
        };
        assert!(err.to_string().starts_with("[COOP-GRADE-001]"));
        assert_eq!(err.code(), "COOP-GRADE-001");
    }

    #[test]
    fn test_require_integer() {
        assert_eq!(require_integer("x", 259200.0), Ok(259200.0));
        assert!(matches!(
            require_integer("x", 1.5),
            Err(CoopError::InvalidParameter { .. })
        ));
        assert!(require_integer("x", f64::NAN).is_err());
        assert!(require_integer("x", f64::INFINITY).is_err());
    }
}
