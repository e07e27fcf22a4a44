//! Scoring Parameters
//!
//! Every constant of the score formula lives here and is injected into the
//! scorers, so a caller can swap any of them without touching the formulas.

use crate::types::Grade;
use serde::{Deserialize, Serialize};

/// Score multiplier per grade tier
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GradeMultipliers {
    pub c: f64,
    pub b: f64,
    pub a: f64,
    pub aa: f64,
    pub aaa: f64,
}

impl GradeMultipliers {
    /// Multiplier for a tier
    pub fn get(&self, grade: Grade) -> f64 {
        match grade {
            Grade::C => self.c,
            Grade::B => self.b,
            Grade::A => self.a,
            Grade::AA => self.aa,
            Grade::AAA => self.aaa,
        }
    }
}

impl Default for GradeMultipliers {
    fn default() -> Self {
        Self {
            c: 1.0,
            b: 2.0,
            a: 3.5,
            aa: 5.0,
            aaa: 7.0,
        }
    }
}

/// Two-regime contribution curve
///
/// `ratio <= breakpoint`: `low_scale * ratio^low_exponent + low_offset`
/// `ratio > breakpoint`: `high_slope * min(ratio, saturation) + high_offset`
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContributionCurve {
    pub breakpoint: f64,
    pub low_scale: f64,
    pub low_exponent: f64,
    pub low_offset: f64,
    pub high_slope: f64,
    pub high_offset: f64,
    pub saturation: f64,
}

impl Default for ContributionCurve {
    fn default() -> Self {
        Self {
            breakpoint: 2.5,
            low_scale: 3.0,
            low_exponent: 0.15,
            low_offset: 1.0,
            high_slope: 0.02221,
            high_offset: 4.386486,
            saturation: 12.5,
        }
    }
}

/// Value per second of one percent of buff
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BuffWeights {
    pub egg_laying: f64,
    pub earnings: f64,
}

impl Default for BuffWeights {
    fn default() -> Self {
        Self {
            egg_laying: 7.5,
            earnings: 0.75,
        }
    }
}

/// Teamwork score constants
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TeamworkParams {
    /// Cap on buff value per second of play
    pub buff_rate_cap: f64,
    /// Weight of the capped buff rate in the teamwork score
    pub buff_weight: f64,
    pub score_divisor: f64,
    /// Weight of the teamwork score in the teamwork factor
    pub factor_weight: f64,
    /// Added to the upper-bound score for value a snapshot cannot observe.
    /// Opaque game calibration: 6 + 10.
    pub upper_score_allowance: f64,
}

impl Default for TeamworkParams {
    fn default() -> Self {
        Self {
            buff_rate_cap: 2.0,
            buff_weight: 5.0,
            score_divisor: 19.0,
            factor_weight: 0.19,
            upper_score_allowance: 6.0 + 10.0,
        }
    }
}

/// Completion time bonus: `scale * (1 - duration/max)^exponent + offset`
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompletionBonus {
    pub scale: f64,
    pub exponent: i32,
    pub offset: f64,
}

impl Default for CompletionBonus {
    fn default() -> Self {
        Self {
            scale: 4.0,
            exponent: 3,
            offset: 1.0,
        }
    }
}

/// Complete parameter set for one scoring pass
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoringParams {
    pub grade_multipliers: GradeMultipliers,
    pub contribution: ContributionCurve,
    pub buffs: BuffWeights,
    pub teamwork: TeamworkParams,
    pub completion: CompletionBonus,
    /// Contract length that earns one extra base point (three days)
    pub base_length_seconds: f64,
    /// Fixed game scaling applied to every composite score
    pub score_scale: f64,
}

impl Default for ScoringParams {
    fn default() -> Self {
        Self {
            grade_multipliers: GradeMultipliers::default(),
            contribution: ContributionCurve::default(),
            buffs: BuffWeights::default(),
            teamwork: TeamworkParams::default(),
            completion: CompletionBonus::default(),
            base_length_seconds: 259_200.0,
            score_scale: 187.5,
        }
    }
}
