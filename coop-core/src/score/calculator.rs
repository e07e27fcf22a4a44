//! Composite Score Calculator
//!
//! Implements the score pipeline for one player:
//! 1. Base points from contract length and grade
//! 2. Contribution ratio against the fair share, then contribution factor
//! 3. Completion time bonus
//! 4. Teamwork factor from buff value per second (lower and upper bound)
//! 5. Product of all factors and the game scale

use super::ScoreContext;
use crate::contribution::ContributionScorer;
use crate::error::{CoopError, CoopResult};
use crate::grade::GradeParams;
use crate::params::ScoringParams;

/// Lower and upper teamwork bounds
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Teamwork {
    /// Capped buff value per second of play
    pub buff_rate: f64,
    pub score: f64,
    pub upper_score: f64,
    pub factor: f64,
    pub upper_factor: f64,
}

/// Calculated metrics for one player
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompositeScore {
    pub base_points: f64,
    pub contribution_ratio: f64,
    pub contribution_factor: f64,
    pub completion_time_bonus: f64,
    pub time_to_complete_factor: f64,
    pub teamwork: Teamwork,
    pub cs: f64,
    pub upper_cs: f64,
}

/// Composite score calculator
#[derive(Clone, Debug)]
pub struct CompositeScoreCalculator {
    params: ScoringParams,
    contribution: ContributionScorer,
}

impl CompositeScoreCalculator {
    /// Create calculator with parameters
    pub fn new(params: ScoringParams) -> Self {
        Self {
            contribution: ContributionScorer::new(params.contribution),
            params,
        }
    }

    /// Calculate both score bounds for one player
    pub fn calculate(
        &self,
        ctx: &ScoreContext,
        eggs_shipped: f64,
        buff_value: f64,
    ) -> CoopResult<CompositeScore> {
        if !eggs_shipped.is_finite() || eggs_shipped < 0.0 {
            return Err(CoopError::InvalidParameter {
                name: "eggsShipped".to_string(),
                value: eggs_shipped,
            });
        }
        if !buff_value.is_finite() || buff_value < 0.0 {
            return Err(CoopError::InvalidParameter {
                name: "buffValue".to_string(),
                value: buff_value,
            });
        }

        let base_points = self.base_points(&ctx.grade);
        let contribution_ratio = eggs_shipped / ctx.fair_share();
        let contribution_factor = self.contribution.factor(contribution_ratio);
        let completion_time_bonus = self.completion_time_bonus(ctx);
        let teamwork = self.teamwork(buff_value, ctx.duration_seconds);

        let scaled = base_points * contribution_factor * completion_time_bonus * self.params.score_scale;

        Ok(CompositeScore {
            base_points,
            contribution_ratio,
            contribution_factor,
            completion_time_bonus,
            time_to_complete_factor: ctx.time_to_complete_factor(),
            teamwork,
            cs: scaled * teamwork.factor,
            upper_cs: scaled * teamwork.upper_factor,
        })
    }

    /// `(1 + maxAllowed / baseLength) * gradeMultiplier`
    pub fn base_points(&self, grade: &GradeParams) -> f64 {
        (1.0 + grade.max_allowed_seconds / self.params.base_length_seconds) * grade.multiplier
    }

    /// `scale * (1 - duration/maxAllowed)^exponent + offset`
    ///
    /// Not clamped: a duration past the allowance gives a bonus below the
    /// offset.
    pub fn completion_time_bonus(&self, ctx: &ScoreContext) -> f64 {
        let bonus = &self.params.completion;
        bonus.scale * (1.0 - ctx.time_to_complete_factor()).powi(bonus.exponent) + bonus.offset
    }

    /// Teamwork bounds from buff value over the coop duration
    pub fn teamwork(&self, buff_value: f64, duration_seconds: f64) -> Teamwork {
        let params = &self.params.teamwork;

        let buff_rate = if duration_seconds > 0.0 {
            (buff_value / duration_seconds).min(params.buff_rate_cap)
        } else {
            0.0
        };

        let weighted = params.buff_weight * buff_rate;
        let score = weighted / params.score_divisor;
        let upper_score = (weighted + params.upper_score_allowance) / params.score_divisor;

        Teamwork {
            buff_rate,
            score,
            upper_score,
            factor: params.factor_weight * score + 1.0,
            upper_factor: params.factor_weight * upper_score + 1.0,
        }
    }

    /// Contribution scorer used by this calculator
    pub fn contribution(&self) -> &ContributionScorer {
        &self.contribution
    }

    /// Parameters
    pub fn params(&self) -> &ScoringParams {
        &self.params
    }
}

impl Default for CompositeScoreCalculator {
    fn default() -> Self {
        Self::new(ScoringParams::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Grade;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= 1e-9 * expected.abs().max(1.0),
            "expected {}, got {}",
            expected,
            actual
        );
    }

    fn grade() -> GradeParams {
        GradeParams {
            grade: Grade::AAA,
            multiplier: 7.0,
            main_goal: 1_000_000.0,
            max_allowed_seconds: 259_200.0,
        }
    }

    fn ctx(duration: f64) -> ScoreContext {
        ScoreContext::new(grade(), duration, 10, true).unwrap()
    }

    #[test]
    fn test_base_points() {
        let calculator = CompositeScoreCalculator::default();
        assert_close(calculator.base_points(&grade()), 14.0);
    }

    #[test]
    fn test_completion_time_bonus() {
        let calculator = CompositeScoreCalculator::default();
        assert_close(calculator.completion_time_bonus(&ctx(0.0)), 5.0);
        assert_close(calculator.completion_time_bonus(&ctx(129_600.0)), 1.5);
        assert_close(calculator.completion_time_bonus(&ctx(259_200.0)), 1.0);
        // Overtime is not clamped
        assert_close(calculator.completion_time_bonus(&ctx(518_400.0)), -3.0);
    }

    #[test]
    fn test_teamwork_bounds() {
        let calculator = CompositeScoreCalculator::default();

        let none = calculator.teamwork(0.0, 1000.0);
        assert_eq!(none.score, 0.0);
        assert_eq!(none.factor, 1.0);
        assert_close(none.upper_score, 16.0 / 19.0);
        assert_close(none.upper_factor, 0.19 * 16.0 / 19.0 + 1.0);

        let capped = calculator.teamwork(1e9, 1000.0);
        assert_eq!(capped.buff_rate, 2.0);
        assert_close(capped.score, 10.0 / 19.0);
        assert_close(capped.factor, 1.1);
        assert_close(capped.upper_factor, 0.19 * 26.0 / 19.0 + 1.0);
    }

    #[test]
    fn test_teamwork_zero_duration() {
        let teamwork = CompositeScoreCalculator::default().teamwork(500.0, 0.0);
        assert_eq!(teamwork.buff_rate, 0.0);
        assert_eq!(teamwork.factor, 1.0);
    }

    #[test]
    fn test_full_calculation() {
        let calculator = CompositeScoreCalculator::default();
        // Fair share is 100000 eggs; half time; buff rate 1/s
        let score = calculator.calculate(&ctx(129_600.0), 100_000.0, 129_600.0).unwrap();

        assert_close(score.contribution_ratio, 1.0);
        assert_close(score.contribution_factor, 4.0);
        assert_close(score.completion_time_bonus, 1.5);
        assert_close(score.time_to_complete_factor, 0.5);
        assert_close(score.teamwork.buff_rate, 1.0);
        assert_close(score.teamwork.factor, 0.19 * 5.0 / 19.0 + 1.0);
        assert_close(score.cs, 14.0 * 4.0 * 1.5 * 1.05 * 187.5);
        assert_close(score.upper_cs, 14.0 * 4.0 * 1.5 * (0.19 * 21.0 / 19.0 + 1.0) * 187.5);
        assert!(score.upper_cs > score.cs);
    }

    #[test]
    fn test_ratio_round_trips_through_factor() {
        let calculator = CompositeScoreCalculator::default();
        for eggs in [0.0, 12_345.0, 100_000.0, 250_000.0, 260_000.0, 2_000_000.0] {
            let score = calculator.calculate(&ctx(100_000.0), eggs, 0.0).unwrap();
            assert_eq!(
                calculator.contribution().factor(score.contribution_ratio),
                score.contribution_factor
            );
        }
    }

    #[test]
    fn test_rejects_invalid_inputs() {
        let calculator = CompositeScoreCalculator::default();
        assert!(calculator.calculate(&ctx(1.0), -1.0, 0.0).is_err());
        assert!(calculator.calculate(&ctx(1.0), f64::NAN, 0.0).is_err());
        assert!(calculator.calculate(&ctx(1.0), 1.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_injected_scale() {
        let params = ScoringParams {
            score_scale: 1.0,
            ..Default::default()
        };
        let calculator = CompositeScoreCalculator::new(params);
        let score = calculator.calculate(&ctx(259_200.0), 100_000.0, 0.0).unwrap();
        assert_close(score.cs, 14.0 * 4.0 * 1.0 * 1.0);
    }
}
