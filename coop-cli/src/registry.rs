//! Grade Registry
//!
//! The list of coops to score, each with the grade it achieved. Loaded
//! from a local JSON file or from a URL.

use crate::error::{CliError, CliResult};
use coop_core::GradeAssignment;
use std::collections::BTreeSet;
use std::path::Path;
use std::time::Duration;
use tokio::fs;
use tracing::{info, warn};

/// Registered coops and their grades
#[derive(Clone, Debug, Default)]
pub struct GradeRegistry {
    assignments: Vec<GradeAssignment>,
}

impl GradeRegistry {
    /// Create from assignments, dropping repeated contract/coop pairs
    pub fn new(assignments: Vec<GradeAssignment>) -> Self {
        let mut seen = BTreeSet::new();
        let mut kept = Vec::with_capacity(assignments.len());
        for assignment in assignments {
            let key = (assignment.contract_id.clone(), assignment.coop_code.clone());
            if seen.insert(key) {
                kept.push(assignment);
            } else {
                warn!(
                    contract = %assignment.contract_id,
                    coop = %assignment.coop_code,
                    "duplicate grade assignment ignored"
                );
            }
        }
        Self { assignments: kept }
    }

    /// Load from a path or an `http(s)://` URL
    pub async fn load(source: &str, timeout_secs: u64) -> CliResult<Self> {
        if is_url(source) {
            Self::from_url(source, timeout_secs).await
        } else {
            Self::from_file(source).await
        }
    }

    /// Load from a JSON file
    pub async fn from_file(path: impl AsRef<Path>) -> CliResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).await.map_err(|e| {
            CliError::config(format!("Failed to read grade registry {:?}: {}", path, e))
        })?;
        let registry = Self::from_json(&json)?;
        info!("Loaded {} grade assignments from {:?}", registry.len(), path);
        Ok(registry)
    }

    /// Load from a URL
    pub async fn from_url(url: &str, timeout_secs: u64) -> CliResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| CliError::connection(e.to_string()))?;
        let response = client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(CliError::api(
                response.status().as_u16(),
                response.text().await.unwrap_or_default(),
            ));
        }
        let assignments: Vec<GradeAssignment> = response.json().await?;
        let registry = Self::new(assignments);
        info!("Loaded {} grade assignments from {}", registry.len(), url);
        Ok(registry)
    }

    /// Parse a JSON array of assignments
    pub fn from_json(json: &str) -> CliResult<Self> {
        let assignments: Vec<GradeAssignment> = serde_json::from_str(json)?;
        Ok(Self::new(assignments))
    }

    /// Assignment for one coop
    pub fn lookup(&self, contract_id: &str, coop_code: &str) -> Option<&GradeAssignment> {
        self.assignments
            .iter()
            .find(|a| a.contract_id == contract_id && a.coop_code == coop_code)
    }

    /// Assignments registered under a contract
    pub fn for_contract<'a>(
        &'a self,
        contract_id: &'a str,
    ) -> impl Iterator<Item = &'a GradeAssignment> + 'a {
        self.assignments
            .iter()
            .filter(move |a| a.contract_id == contract_id)
    }

    /// Distinct contract identifiers, sorted
    pub fn contract_ids(&self) -> BTreeSet<&str> {
        self.assignments
            .iter()
            .map(|a| a.contract_id.as_str())
            .collect()
    }

    /// Number of registered coops
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    /// Whether no coops are registered
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}

fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const REGISTRY: &str = r#"[
        {"contractId": "hatchery-rush", "coopCode": "sunny-side", "grade": "aaa", "coopSize": 10},
        {"contract": "hatchery-rush", "coop": "over-easy", "grade": "AA"},
        {"contractId": "cold-storage", "coopCode": "frosty", "grade": "c"},
        {"contractId": "hatchery-rush", "coopCode": "sunny-side", "grade": "b"}
    ]"#;

    #[test]
    fn test_parse_and_dedupe() {
        let registry = GradeRegistry::from_json(REGISTRY).unwrap();
        assert_eq!(registry.len(), 3);

        let sunny = registry.lookup("hatchery-rush", "sunny-side").unwrap();
        assert_eq!(sunny.grade, "aaa");
        assert_eq!(sunny.coop_size, Some(10));
        assert!(registry.lookup("hatchery-rush", "scrambled").is_none());
    }

    #[test]
    fn test_for_contract() {
        let registry = GradeRegistry::from_json(REGISTRY).unwrap();
        let coops: Vec<&str> = registry
            .for_contract("hatchery-rush")
            .map(|a| a.coop_code.as_str())
            .collect();
        assert_eq!(coops, vec!["sunny-side", "over-easy"]);
        assert_eq!(
            registry.contract_ids().into_iter().collect::<Vec<_>>(),
            vec!["cold-storage", "hatchery-rush"]
        );
    }

    #[test]
    fn test_rejects_malformed_registry() {
        assert!(matches!(
            GradeRegistry::from_json(r#"{"contractId": "x"}"#),
            Err(CliError::JsonError(_))
        ));
    }

    #[test]
    fn test_is_url() {
        assert!(is_url("https://grades.example.com/registry.json"));
        assert!(!is_url("./grades.json"));
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("grades.json");
        tokio::fs::write(&path, REGISTRY).await.unwrap();

        let registry = GradeRegistry::load(path.to_str().unwrap(), 5).await.unwrap();
        assert_eq!(registry.len(), 3);
    }

    #[tokio::test]
    async fn test_missing_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = GradeRegistry::from_file(temp_dir.path().join("absent.json"))
            .await
            .unwrap_err();
        assert_eq!(err.exit_code(), 1);
    }
}
