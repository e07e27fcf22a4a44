//! Coop Scoring Entry Point
//!
//! Runs the full pipeline for one coop:
//! 1. Coop setup: contributors, grade, coop size, duration, green scroll
//! 2. Per player: eggs shipped, buff value, composite score
//!
//! A setup failure turns the whole coop into a [`FailedCoop`]. A player
//! failure turns only that player into a degraded record.

use crate::buffs::BuffValuator;
use crate::duration::DurationEstimator;
use crate::error::{CoopError, CoopResult};
use crate::grade::GradeResolver;
use crate::params::ScoringParams;
use crate::score::{CompositeScoreCalculator, ScoreContext};
use crate::types::*;
use tracing::{debug, warn};

/// Scores whole coops
///
/// Holds only immutable parameters; one instance can be shared across
/// threads and used for any number of coops.
#[derive(Clone, Debug)]
pub struct CoopScorer {
    resolver: GradeResolver,
    estimator: DurationEstimator,
    valuator: BuffValuator,
    calculator: CompositeScoreCalculator,
}

impl CoopScorer {
    /// Create scorer with parameters
    pub fn new(params: ScoringParams) -> Self {
        Self {
            resolver: GradeResolver::new(params.grade_multipliers),
            estimator: DurationEstimator::new(),
            valuator: BuffValuator::new(params.buffs),
            calculator: CompositeScoreCalculator::new(params),
        }
    }

    /// Score one coop
    pub fn score(
        &self,
        snapshot: &CoopSnapshot,
        contract: &ContractSpec,
        assignment: &GradeAssignment,
    ) -> CoopReport {
        match self.score_coop(snapshot, contract, assignment) {
            Ok(scored) => CoopReport::Scored(scored),
            Err(err) => {
                warn!(
                    contract = %assignment.contract_id,
                    coop = %assignment.coop_code,
                    error = %err,
                    "coop scoring aborted"
                );
                CoopReport::Failed(FailedCoop::new(
                    assignment.contract_id.clone(),
                    assignment.coop_code.clone(),
                    ErrorDetail::from(&err),
                ))
            }
        }
    }

    fn score_coop(
        &self,
        snapshot: &CoopSnapshot,
        contract: &ContractSpec,
        assignment: &GradeAssignment,
    ) -> CoopResult<ScoredCoop> {
        if assignment.contract_id != contract.id {
            return Err(CoopError::invalid_spec(format!(
                "grade assignment for contract {} applied to contract {}",
                assignment.contract_id, contract.id
            )));
        }

        let contributors = snapshot.require_contributors()?;
        let grade = self.resolver.resolve(&assignment.grade, contract)?;
        let max_coop_size = max_coop_size(contract, assignment)?;
        let duration = self
            .estimator
            .estimate(snapshot, grade.max_allowed_seconds, grade.main_goal)?;
        let ctx = ScoreContext::new(grade, duration, max_coop_size, snapshot.is_green_scroll())?;

        // Buff server times share the contract clock; the coop ends where
        // the estimated duration runs out.
        let reference = (grade.max_allowed_seconds - duration).max(0.0);

        debug!(
            contract = %contract.id,
            coop = %assignment.coop_code,
            grade = %grade.grade,
            duration,
            players = contributors.len(),
            "scoring coop"
        );

        let user_data: Vec<ScoredPlayerRecord> = contributors
            .iter()
            .map(|contributor| {
                self.score_player(&ctx, contributor, reference)
                    .unwrap_or_else(|err| {
                        warn!(
                            coop = %assignment.coop_code,
                            player = contributor.label(),
                            error = %err,
                            "player scoring degraded"
                        );
                        ScoredPlayerRecord::degraded(contributor, ctx.green_scroll, &err)
                    })
            })
            .collect();

        let degraded_players = user_data.iter().filter(|r| r.is_degraded()).count();

        Ok(ScoredCoop {
            coop_data: CoopData {
                contract_id: contract.id.clone(),
                coop_code: assignment.coop_code.clone(),
                total_amount: snapshot.total_amount,
                seconds_remaining: snapshot.seconds_remaining,
                all_goals_achieved: snapshot.all_goals_achieved,
                all_members_reporting: snapshot.all_members_reporting,
                grace_period_seconds_remaining: snapshot.grace_period_seconds_remaining,
                duration_seconds: duration,
                green_scroll: ctx.green_scroll,
                contributor_count: contributors.len(),
                degraded_players,
            },
            contract_data: ContractData {
                id: contract.id.clone(),
                name: contract.name.clone(),
                season_id: contract.season_id().map(str::to_string),
                max_coop_size,
            },
            grade_data: grade.to_data(assignment.coop_size),
            user_data,
        })
    }

    /// Score one player against a prepared context
    pub fn score_player(
        &self,
        ctx: &ScoreContext,
        contributor: &Contributor,
        reference_timestamp: f64,
    ) -> CoopResult<ScoredPlayerRecord> {
        let eggs_shipped = contributor.eggs_shipped()?;
        let buff_value = self.valuator.value(contributor.buffs(), reference_timestamp);
        let score = self.calculator.calculate(ctx, eggs_shipped, buff_value)?;
        Ok(ScoredPlayerRecord::from_score(
            contributor,
            ctx,
            eggs_shipped,
            buff_value,
            &score,
        ))
    }

    /// Calculator used for player scores
    pub fn calculator(&self) -> &CompositeScoreCalculator {
        &self.calculator
    }
}

impl Default for CoopScorer {
    fn default() -> Self {
        Self::new(ScoringParams::default())
    }
}

/// Contract capacity, falling back to the registry's coop size
fn max_coop_size(contract: &ContractSpec, assignment: &GradeAssignment) -> CoopResult<u32> {
    match contract.max_coop_size {
        Some(size) if size.fract() == 0.0 && size >= 1.0 && size <= f64::from(u32::MAX) => {
            Ok(size as u32)
        }
        Some(size) => Err(CoopError::invalid_spec(format!(
            "maxCoopSize {} is not a positive integer",
            size
        ))),
        None => assignment
            .coop_size
            .filter(|size| *size > 0)
            .ok_or_else(|| CoopError::missing("maxCoopSize")),
    }
}
