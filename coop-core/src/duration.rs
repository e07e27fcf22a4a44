//! Duration Estimation
//!
//! Reconstructs how long a coop took (or will take) from one snapshot.
//!
//! A completed snapshot is taken after the finish, so the slack left at the
//! finish and the time since the finish are both subtracted from the
//! allowance. An in-progress snapshot extrapolates the remaining eggs at the
//! team's combined rate, crediting eggs laid by players who have not synced.

use crate::error::{require_integer, CoopError, CoopResult};
use crate::types::{Contributor, CoopSnapshot};
use tracing::debug;

/// State of a coop as seen by one snapshot
#[derive(Clone, Copy, Debug)]
pub enum CoopPhase<'a> {
    Completed {
        seconds_remaining: f64,
        seconds_since_all_goals_achieved: f64,
    },
    InProgress {
        total_amount: f64,
        seconds_remaining: f64,
        contributors: &'a [Contributor],
    },
}

impl<'a> CoopPhase<'a> {
    /// Classify a snapshot
    pub fn of(snapshot: &'a CoopSnapshot) -> CoopResult<Self> {
        if snapshot.all_goals_achieved {
            Ok(CoopPhase::Completed {
                seconds_remaining: snapshot.seconds_remaining,
                seconds_since_all_goals_achieved: snapshot.seconds_since_all_goals_achieved,
            })
        } else {
            Ok(CoopPhase::InProgress {
                total_amount: snapshot.total_amount,
                seconds_remaining: snapshot.seconds_remaining,
                contributors: snapshot.require_contributors()?,
            })
        }
    }
}

/// Duration estimator
#[derive(Clone, Copy, Debug, Default)]
pub struct DurationEstimator;

impl DurationEstimator {
    /// Create estimator
    pub fn new() -> Self {
        Self
    }

    /// Estimate total seconds from coop start to completion
    ///
    /// Both parameters must be integral. The result is never negative.
    pub fn estimate(
        &self,
        snapshot: &CoopSnapshot,
        max_allowed_seconds: f64,
        main_goal: f64,
    ) -> CoopResult<f64> {
        let max_allowed_seconds = require_integer("maxAllowedSeconds", max_allowed_seconds)?;
        let main_goal = require_integer("mainGoal", main_goal)?;

        let duration = match CoopPhase::of(snapshot)? {
            CoopPhase::Completed {
                seconds_remaining,
                seconds_since_all_goals_achieved,
            } => max_allowed_seconds - seconds_remaining - seconds_since_all_goals_achieved,
            CoopPhase::InProgress {
                total_amount,
                seconds_remaining,
                contributors,
            } => {
                let elapsed = max_allowed_seconds - seconds_remaining;
                elapsed + self.time_to_finish(main_goal - total_amount, contributors)?
            }
        };

        Ok(duration.max(0.0))
    }

    /// Seconds needed to ship the remaining eggs at the combined rate
    fn time_to_finish(&self, eggs_remaining: f64, contributors: &[Contributor]) -> CoopResult<f64> {
        let mut eggs_remaining = eggs_remaining.max(0.0);
        let mut total_rate = 0.0;

        for contributor in contributors {
            let rate = contributor.rate()?;
            if let Some(offline_seconds) = contributor.offline_seconds() {
                eggs_remaining -= rate * offline_seconds;
            }
            total_rate += rate;
        }

        if total_rate.is_nan() || total_rate <= 0.0 {
            return Err(CoopError::ZeroRate { total_rate });
        }

        let eggs_remaining = eggs_remaining.max(0.0);
        debug!(eggs_remaining, total_rate, "extrapolating in-progress coop");
        Ok(eggs_remaining / total_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FarmInfo;

    fn contributor(rate: f64) -> Contributor {
        Contributor {
            contribution_rate: Some(rate),
            ..Default::default()
        }
    }

    fn in_progress(total: f64, remaining: f64, contributors: Vec<Contributor>) -> CoopSnapshot {
        CoopSnapshot {
            total_amount: total,
            seconds_remaining: remaining,
            grace_period_seconds_remaining: remaining,
            contributors: Some(contributors),
            ..Default::default()
        }
    }

    #[test]
    fn test_completed_coop() {
        let snapshot = CoopSnapshot {
            all_goals_achieved: true,
            seconds_remaining: 1000.0,
            seconds_since_all_goals_achieved: 500.0,
            ..Default::default()
        };
        let duration = DurationEstimator::new()
            .estimate(&snapshot, 259200.0, 5e15)
            .unwrap();
        assert_eq!(duration, 257700.0);
    }

    #[test]
    fn test_completed_coop_floors_at_zero() {
        let snapshot = CoopSnapshot {
            all_goals_achieved: true,
            seconds_remaining: 200000.0,
            seconds_since_all_goals_achieved: 100000.0,
            ..Default::default()
        };
        let duration = DurationEstimator::new()
            .estimate(&snapshot, 259200.0, 5e15)
            .unwrap();
        assert_eq!(duration, 0.0);
    }

    #[test]
    fn test_in_progress_extrapolates() {
        // 100000s elapsed, 1000 eggs left at 10 eggs/s
        let snapshot = in_progress(9000.0, 159200.0, vec![contributor(4.0), contributor(6.0)]);
        let duration = DurationEstimator::new()
            .estimate(&snapshot, 259200.0, 10000.0)
            .unwrap();
        assert_eq!(duration, 100000.0 + 100.0);
    }

    #[test]
    fn test_in_progress_credits_offline_eggs() {
        let mut offline = contributor(5.0);
        offline.farm_info = Some(FarmInfo {
            timestamp: Some(100.0),
        });
        offline.offline_seconds = Some(1.0);

        // 1000 eggs left, 500 laid offline by the first player, 10 eggs/s total
        let snapshot = in_progress(9000.0, 159200.0, vec![offline, contributor(5.0)]);
        let duration = DurationEstimator::new()
            .estimate(&snapshot, 259200.0, 10000.0)
            .unwrap();
        assert_eq!(duration, 100000.0 + 50.0);
    }

    #[test]
    fn test_in_progress_offline_eggs_clamped() {
        let mut offline = contributor(10.0);
        offline.offline_seconds = Some(1_000_000.0);

        let snapshot = in_progress(9000.0, 159200.0, vec![offline]);
        let duration = DurationEstimator::new()
            .estimate(&snapshot, 259200.0, 10000.0)
            .unwrap();
        assert_eq!(duration, 100000.0);
    }

    #[test]
    fn test_in_progress_goal_already_reached() {
        let snapshot = in_progress(20000.0, 159200.0, vec![contributor(1.0)]);
        let duration = DurationEstimator::new()
            .estimate(&snapshot, 259200.0, 10000.0)
            .unwrap();
        assert_eq!(duration, 100000.0);
    }

    #[test]
    fn test_missing_rate_fails() {
        let snapshot = in_progress(0.0, 100.0, vec![contributor(1.0), Contributor::default()]);
        let err = DurationEstimator::new()
            .estimate(&snapshot, 259200.0, 10000.0)
            .unwrap_err();
        assert!(matches!(err, CoopError::InvalidContributorData { .. }));
    }

    #[test]
    fn test_zero_rate_fails() {
        let snapshot = in_progress(0.0, 100.0, vec![contributor(0.0)]);
        let err = DurationEstimator::new()
            .estimate(&snapshot, 259200.0, 10000.0)
            .unwrap_err();
        assert_eq!(err, CoopError::ZeroRate { total_rate: 0.0 });

        let empty = in_progress(0.0, 100.0, vec![]);
        assert!(DurationEstimator::new().estimate(&empty, 259200.0, 10000.0).is_err());
    }

    #[test]
    fn test_non_integer_parameters_fail() {
        let snapshot = in_progress(0.0, 100.0, vec![contributor(1.0)]);
        let estimator = DurationEstimator::new();
        assert!(matches!(
            estimator.estimate(&snapshot, 259200.5, 10000.0),
            Err(CoopError::InvalidParameter { .. })
        ));
        assert!(matches!(
            estimator.estimate(&snapshot, 259200.0, 0.25),
            Err(CoopError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_never_negative() {
        let estimator = DurationEstimator::new();
        for remaining in [0.0, 1.0, 259200.0, 400000.0, 1e9] {
            for total in [0.0, 5000.0, 1e6] {
                for done in [true, false] {
                    let snapshot = CoopSnapshot {
                        all_goals_achieved: done,
                        seconds_since_all_goals_achieved: remaining / 2.0,
                        ..in_progress(total, remaining, vec![contributor(3.0)])
                    };
                    let duration = estimator.estimate(&snapshot, 259200.0, 10000.0).unwrap();
                    assert!(duration >= 0.0, "negative duration {}", duration);
                }
            }
        }
    }
}
