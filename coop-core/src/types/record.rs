//! Scoring output types

use super::coop::{BuffEvent, Contributor};
use super::grade::Grade;
use crate::error::CoopError;
use serde::{Deserialize, Serialize};

/// One player's computed metrics for one coop
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredPlayerRecord {
    pub ei_uuid: Option<String>,
    pub user_name: Option<String>,
    pub eggs_shipped: f64,
    pub contribution_ratio: f64,
    pub contribution_factor: f64,
    pub completion_time_bonus: f64,
    pub time_to_complete_factor: f64,
    pub green_scroll: bool,
    pub buff_history: Vec<BuffEvent>,
    pub buff_time_value: f64,
    pub teamwork_score: f64,
    pub upper_teamwork_score: f64,
    pub team_work: f64,
    pub upper_team_work: f64,
    pub cs: f64,
    #[serde(rename = "upperCS")]
    pub upper_cs: f64,
    /// Set on degraded records only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScoredPlayerRecord {
    /// Degraded record for a player whose calculation failed
    ///
    /// Factors and bonuses sit at their neutral value 1, ratios and scores
    /// at 0. The green scroll flag is the coop's.
    pub fn degraded(contributor: &Contributor, green_scroll: bool, error: &CoopError) -> Self {
        Self {
            ei_uuid: contributor.ei_uuid.clone(),
            user_name: contributor.user_name.clone(),
            eggs_shipped: contributor
                .contribution_amount
                .filter(|amount| amount.is_finite())
                .unwrap_or(0.0),
            contribution_ratio: 0.0,
            contribution_factor: 1.0,
            completion_time_bonus: 1.0,
            time_to_complete_factor: 0.0,
            green_scroll,
            buff_history: contributor.buffs().to_vec(),
            buff_time_value: 0.0,
            teamwork_score: 0.0,
            upper_teamwork_score: 0.0,
            team_work: 1.0,
            upper_team_work: 1.0,
            cs: 0.0,
            upper_cs: 0.0,
            error: Some(error.to_string()),
        }
    }

    /// Whether this record came from a failed calculation
    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }
}

/// Coop-level facts reported alongside player records
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoopData {
    pub contract_id: String,
    pub coop_code: String,
    pub total_amount: f64,
    pub seconds_remaining: f64,
    pub all_goals_achieved: bool,
    pub all_members_reporting: bool,
    pub grace_period_seconds_remaining: f64,
    /// Estimated seconds from start to completion
    pub duration_seconds: f64,
    pub green_scroll: bool,
    pub contributor_count: usize,
    pub degraded_players: usize,
}

/// Contract facts used by the calculation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractData {
    pub id: String,
    pub name: Option<String>,
    pub season_id: Option<String>,
    pub max_coop_size: u32,
}

/// Resolved grade parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeData {
    pub grade: Grade,
    pub multiplier: f64,
    pub main_goal: f64,
    pub max_allowed_seconds: f64,
    pub coop_size: Option<u32>,
}

/// Successful coop report
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredCoop {
    pub coop_data: CoopData,
    pub contract_data: ContractData,
    pub grade_data: GradeData,
    pub user_data: Vec<ScoredPlayerRecord>,
}

/// Error code and message of a failed coop
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl From<&CoopError> for ErrorDetail {
    fn from(err: &CoopError) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

/// Coop whose setup failed; carries no player records
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedCoop {
    pub contract_id: String,
    pub coop_code: String,
    pub error: ErrorDetail,
    pub user_data: Vec<ScoredPlayerRecord>,
}

impl FailedCoop {
    /// Create a failed report with an empty `userData`
    pub fn new(contract_id: impl Into<String>, coop_code: impl Into<String>, error: ErrorDetail) -> Self {
        Self {
            contract_id: contract_id.into(),
            coop_code: coop_code.into(),
            error,
            user_data: Vec::new(),
        }
    }
}

/// Result of scoring one coop
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CoopReport {
    Scored(ScoredCoop),
    Failed(FailedCoop),
}

impl CoopReport {
    /// Contract identifier
    pub fn contract_id(&self) -> &str {
        match self {
            CoopReport::Scored(scored) => &scored.coop_data.contract_id,
            CoopReport::Failed(failed) => &failed.contract_id,
        }
    }

    /// Coop code
    pub fn coop_code(&self) -> &str {
        match self {
            CoopReport::Scored(scored) => &scored.coop_data.coop_code,
            CoopReport::Failed(failed) => &failed.coop_code,
        }
    }

    /// Player records, empty for failed coops
    pub fn user_data(&self) -> &[ScoredPlayerRecord] {
        match self {
            CoopReport::Scored(scored) => &scored.user_data,
            CoopReport::Failed(failed) => &failed.user_data,
        }
    }

    /// Whether the coop failed at setup
    pub fn is_failed(&self) -> bool {
        matches!(self, CoopReport::Failed(_))
    }
}
