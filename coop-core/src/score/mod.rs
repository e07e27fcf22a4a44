//! Composite Scoring
//!
//! Turns resolved grade parameters, the estimated duration and one player's
//! shipped eggs and buff value into lower and upper composite scores.

mod calculator;

pub use calculator::*;

use crate::error::{CoopError, CoopResult};
use crate::grade::GradeParams;
use crate::types::{Contributor, ScoredPlayerRecord};

/// Coop-wide inputs shared by every player's calculation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoreContext {
    pub grade: GradeParams,
    /// Estimated seconds from start to completion
    pub duration_seconds: f64,
    /// Contract capacity, used for the fair share
    pub max_coop_size: u32,
    pub green_scroll: bool,
}

impl ScoreContext {
    /// Create context, rejecting parameters that would divide by zero
    pub fn new(
        grade: GradeParams,
        duration_seconds: f64,
        max_coop_size: u32,
        green_scroll: bool,
    ) -> CoopResult<Self> {
        if max_coop_size == 0 {
            return Err(CoopError::invalid_spec("maxCoopSize must be positive"));
        }
        if grade.main_goal.is_nan() || grade.main_goal <= 0.0 {
            return Err(CoopError::invalid_spec(format!(
                "main goal {} must be positive",
                grade.main_goal
            )));
        }
        if grade.max_allowed_seconds.is_nan() || grade.max_allowed_seconds <= 0.0 {
            return Err(CoopError::invalid_spec(format!(
                "lengthSeconds {} must be positive",
                grade.max_allowed_seconds
            )));
        }
        Ok(Self {
            grade,
            duration_seconds,
            max_coop_size,
            green_scroll,
        })
    }

    /// Each player's even share of the goal by contract capacity
    pub fn fair_share(&self) -> f64 {
        self.grade.main_goal / f64::from(self.max_coop_size)
    }

    /// Duration as a fraction of the allowance
    pub fn time_to_complete_factor(&self) -> f64 {
        self.duration_seconds / self.grade.max_allowed_seconds
    }
}

impl ScoredPlayerRecord {
    /// Assemble a player record from a calculated score
    pub fn from_score(
        contributor: &Contributor,
        ctx: &ScoreContext,
        eggs_shipped: f64,
        buff_time_value: f64,
        score: &CompositeScore,
    ) -> Self {
        Self {
            ei_uuid: contributor.ei_uuid.clone(),
            user_name: contributor.user_name.clone(),
            eggs_shipped,
            contribution_ratio: score.contribution_ratio,
            contribution_factor: score.contribution_factor,
            completion_time_bonus: score.completion_time_bonus,
            time_to_complete_factor: score.time_to_complete_factor,
            green_scroll: ctx.green_scroll,
            buff_history: contributor.buffs().to_vec(),
            buff_time_value,
            teamwork_score: score.teamwork.score,
            upper_teamwork_score: score.teamwork.upper_score,
            team_work: score.teamwork.factor,
            upper_team_work: score.teamwork.upper_factor,
            cs: score.cs,
            upper_cs: score.upper_cs,
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Grade;

    fn grade(main_goal: f64) -> GradeParams {
        GradeParams {
            grade: Grade::AA,
            multiplier: 5.0,
            main_goal,
            max_allowed_seconds: 432_000.0,
        }
    }

    #[test]
    fn test_context_fair_share() {
        let ctx = ScoreContext::new(grade(2e15), 216_000.0, 4, false).unwrap();
        assert_eq!(ctx.fair_share(), 5e14);
        assert_eq!(ctx.time_to_complete_factor(), 0.5);
    }

    #[test]
    fn test_context_rejects_zero_divisors() {
        assert!(matches!(
            ScoreContext::new(grade(2e15), 1.0, 0, false),
            Err(CoopError::InvalidSpec { .. })
        ));
        assert!(matches!(
            ScoreContext::new(grade(0.0), 1.0, 4, false),
            Err(CoopError::InvalidSpec { .. })
        ));
    }

    #[test]
    fn test_record_from_score() {
        let ctx = ScoreContext::new(grade(2e15), 216_000.0, 4, true).unwrap();
        let contributor = Contributor {
            ei_uuid: Some("EI42".to_string()),
            user_name: Some("yolk".to_string()),
            contribution_amount: Some(5e14),
            ..Default::default()
        };
        let score = CompositeScoreCalculator::default()
            .calculate(&ctx, 5e14, 0.0)
            .unwrap();
        let record = ScoredPlayerRecord::from_score(&contributor, &ctx, 5e14, 0.0, &score);

        assert_eq!(record.user_name.as_deref(), Some("yolk"));
        assert!(record.green_scroll);
        assert_eq!(record.contribution_factor, 4.0);
        assert_eq!(record.cs, score.cs);
        assert!(!record.is_degraded());
    }
}
