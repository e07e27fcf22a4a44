//! Grade Resolution
//!
//! Maps a coop's letter grade to its score multiplier and to the contract's
//! grade spec (main goal and allowed duration).

use crate::error::{CoopError, CoopResult};
use crate::params::GradeMultipliers;
use crate::types::{ContractSpec, Grade, GradeData};

/// Scalar parameters of one grade of one contract
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradeParams {
    pub grade: Grade,
    pub multiplier: f64,
    /// Target of the final goal
    pub main_goal: f64,
    /// Integral number of seconds allowed
    pub max_allowed_seconds: f64,
}

impl GradeParams {
    /// Report form with the registry's coop size
    pub fn to_data(&self, coop_size: Option<u32>) -> GradeData {
        GradeData {
            grade: self.grade,
            multiplier: self.multiplier,
            main_goal: self.main_goal,
            max_allowed_seconds: self.max_allowed_seconds,
            coop_size,
        }
    }
}

/// Grade resolver
#[derive(Clone, Debug, Default)]
pub struct GradeResolver {
    multipliers: GradeMultipliers,
}

impl GradeResolver {
    /// Create resolver with a multiplier table
    pub fn new(multipliers: GradeMultipliers) -> Self {
        Self { multipliers }
    }

    /// Multiplier for a grade code
    pub fn multiplier(&self, code: &str) -> CoopResult<f64> {
        Grade::parse(code).map(|grade| self.multipliers.get(grade))
    }

    /// Resolve a grade code against a contract
    pub fn resolve(&self, code: &str, contract: &ContractSpec) -> CoopResult<GradeParams> {
        let grade = Grade::parse(code)?;

        let mut matching = contract
            .grade_specs
            .iter()
            .filter(|spec| grade.matches(&spec.grade));
        let spec = matching.next().ok_or_else(|| CoopError::SpecNotFound {
            contract_id: contract.id.clone(),
            grade: grade.code().to_string(),
        })?;
        if matching.next().is_some() {
            return Err(CoopError::invalid_spec(format!(
                "contract {} has more than one grade spec for grade {}",
                contract.id, grade
            )));
        }

        let max_allowed_seconds = match spec.length_seconds {
            Some(length) if length.is_finite() && length.fract() == 0.0 && length > 0.0 => length,
            Some(length) => {
                return Err(CoopError::invalid_spec(format!(
                    "lengthSeconds {} for grade {} is not a positive integer",
                    length, grade
                )))
            }
            None => {
                return Err(CoopError::invalid_spec(format!(
                    "lengthSeconds missing for grade {}",
                    grade
                )))
            }
        };

        let main_goal = spec.final_target().ok_or_else(|| {
            CoopError::invalid_spec(format!("no final goal target for grade {}", grade))
        })?;

        Ok(GradeParams {
            grade,
            multiplier: self.multipliers.get(grade),
            main_goal,
            max_allowed_seconds,
        })
    }
}
