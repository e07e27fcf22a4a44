//! Coop status snapshot types

use super::common::{bool_or_false, lenient_list, lenient_number, number_or_zero};
use crate::error::{CoopError, CoopResult};
use serde::{Deserialize, Serialize};

/// A temporary boost event from a contributor's buff history
///
/// `server_time` runs on the contract count-down clock, so a larger value is
/// an earlier event.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BuffEvent {
    #[serde(default, alias = "serverTimestamp", deserialize_with = "lenient_number")]
    pub server_time: Option<f64>,
    #[serde(default, alias = "eggLayingBuff", deserialize_with = "lenient_number")]
    pub egg_laying_buff: Option<f64>,
    #[serde(default, alias = "earningsBuff", deserialize_with = "lenient_number")]
    pub earnings_buff: Option<f64>,
}

impl BuffEvent {
    /// Create a fully populated event
    pub fn new(server_time: f64, egg_laying_buff: f64, earnings_buff: f64) -> Self {
        Self {
            server_time: Some(server_time),
            egg_laying_buff: Some(egg_laying_buff),
            earnings_buff: Some(earnings_buff),
        }
    }
}

/// Farm sync information
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FarmInfo {
    /// Seconds since the farm last reported
    #[serde(default, deserialize_with = "lenient_number")]
    pub timestamp: Option<f64>,
}

/// One player's entry in a coop snapshot
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contributor {
    #[serde(default, alias = "userId")]
    pub ei_uuid: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
    /// Eggs shipped
    #[serde(default, deserialize_with = "lenient_number")]
    pub contribution_amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub contribution_rate: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub contribution_rate_per_second: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub farm_info: Option<FarmInfo>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub offline_seconds: Option<f64>,
    #[serde(default, deserialize_with = "lenient_list", skip_serializing_if = "Option::is_none")]
    pub buff_history: Option<Vec<BuffEvent>>,
}

impl Contributor {
    /// Name used in diagnostics
    pub fn label(&self) -> &str {
        self.ei_uuid
            .as_deref()
            .or(self.user_name.as_deref())
            .unwrap_or("unknown")
    }

    /// Eggs-per-second rate, preferring `contributionRate`
    pub fn rate(&self) -> CoopResult<f64> {
        self.contribution_rate
            .or(self.contribution_rate_per_second)
            .ok_or_else(|| {
                CoopError::invalid_contributor(
                    self.label(),
                    "neither contributionRate nor contributionRatePerSecond is numeric",
                )
            })
    }

    /// Offline seconds, preferring `farmInfo.timestamp`
    pub fn offline_seconds(&self) -> Option<f64> {
        self.farm_info
            .as_ref()
            .and_then(|info| info.timestamp)
            .or(self.offline_seconds)
    }

    /// Eggs shipped, required for scoring
    pub fn eggs_shipped(&self) -> CoopResult<f64> {
        match self.contribution_amount {
            Some(amount) if amount.is_finite() && amount >= 0.0 => Ok(amount),
            Some(amount) => Err(CoopError::invalid_contributor(
                self.label(),
                format!("contributionAmount {} is not a valid egg count", amount),
            )),
            None => Err(CoopError::invalid_contributor(
                self.label(),
                "contributionAmount is missing or not numeric",
            )),
        }
    }

    /// Buff history, empty when not reported
    pub fn buffs(&self) -> &[BuffEvent] {
        self.buff_history.as_deref().unwrap_or(&[])
    }
}

/// A point-in-time observation of a coop
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoopSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coop_identifier: Option<String>,
    /// Eggs shipped by the whole coop
    #[serde(default, deserialize_with = "number_or_zero")]
    pub total_amount: f64,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub seconds_remaining: f64,
    #[serde(default, deserialize_with = "bool_or_false")]
    pub all_goals_achieved: bool,
    #[serde(default, deserialize_with = "bool_or_false")]
    pub all_members_reporting: bool,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub grace_period_seconds_remaining: f64,
    /// Only meaningful once `all_goals_achieved` is set
    #[serde(default, deserialize_with = "number_or_zero")]
    pub seconds_since_all_goals_achieved: f64,
    #[serde(default)]
    pub contributors: Option<Vec<Contributor>>,
}

impl CoopSnapshot {
    /// Contributor list, required for scoring
    pub fn require_contributors(&self) -> CoopResult<&[Contributor]> {
        self.contributors
            .as_deref()
            .ok_or_else(|| CoopError::missing("contributors"))
    }

    /// Fully successful and fully reported, or out of grace period
    pub fn is_green_scroll(&self) -> bool {
        (self.all_goals_achieved && self.all_members_reporting)
            || self.grace_period_seconds_remaining == 0.0
    }
}
