//! Contract and grade specification types

use super::common::{lenient_number, string_or_number};
use serde::{Deserialize, Serialize};

/// Season metadata attached to a contract
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonInfo {
    /// Season identifier (e.g. `fall_2024`)
    #[serde(default)]
    pub id: Option<String>,
    /// Season start, unix seconds
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub start_time: Option<f64>,
}

/// One milestone of a grade's goal ladder
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    /// Eggs required to reach this milestone
    #[serde(default, deserialize_with = "lenient_number")]
    pub target_amount: Option<f64>,
}

/// Per-grade contract parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeSpec {
    /// Grade identifier (`aaa`, `GRADE_AAA` or the numeric tier)
    #[serde(deserialize_with = "string_or_number")]
    pub grade: String,
    /// Maximum allowed duration in seconds
    #[serde(default, deserialize_with = "lenient_number")]
    pub length_seconds: Option<f64>,
    /// Ordered goal milestones, last one is the full target
    #[serde(default)]
    pub goals: Vec<Goal>,
}

impl GradeSpec {
    /// Target amount of the final goal
    pub fn final_target(&self) -> Option<f64> {
        self.goals.last().and_then(|goal| goal.target_amount)
    }
}

/// A game contract
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractSpec {
    /// Contract identifier
    #[serde(alias = "identifier")]
    pub id: String,
    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Season metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<SeasonInfo>,
    /// Contract start, unix seconds
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub start_time: Option<f64>,
    /// Players per coop
    #[serde(default, deserialize_with = "lenient_number")]
    pub max_coop_size: Option<f64>,
    /// Grade specifications, possibly fetched after the contract itself
    #[serde(default)]
    pub grade_specs: Vec<GradeSpec>,
}

impl ContractSpec {
    /// Season start if known, otherwise the contract start
    pub fn effective_start_time(&self) -> Option<f64> {
        self.season
            .as_ref()
            .and_then(|season| season.start_time)
            .or(self.start_time)
    }

    /// Season identifier if known
    pub fn season_id(&self) -> Option<&str> {
        self.season.as_ref().and_then(|season| season.id.as_deref())
    }

    /// Whether grade specs still have to be fetched
    pub fn needs_grade_specs(&self) -> bool {
        self.grade_specs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_contract_deserialization() {
        let contract: ContractSpec = serde_json::from_value(json!({
            "identifier": "spring-cleaning",
            "name": "Spring Cleaning",
            "season": {"id": "spring_2024", "startTime": 1710000000},
            "maxCoopSize": 10,
            "gradeSpecs": [{
                "grade": "GRADE_AAA",
                "lengthSeconds": 259200,
                "goals": [{"targetAmount": 1e15}, {"targetAmount": 5e15}]
            }]
        }))
        .unwrap();

        assert_eq!(contract.id, "spring-cleaning");
        assert_eq!(contract.season_id(), Some("spring_2024"));
        assert_eq!(contract.effective_start_time(), Some(1710000000.0));
        assert_eq!(contract.grade_specs[0].final_target(), Some(5e15));
        assert!(!contract.needs_grade_specs());
    }

    #[test]
    fn test_numeric_grade_identifier() {
        let spec: GradeSpec = serde_json::from_value(json!({"grade": 5, "goals": []})).unwrap();
        assert_eq!(spec.grade, "5");
        assert_eq!(spec.length_seconds, None);
        assert_eq!(spec.final_target(), None);
    }
}
