//! Result Store
//!
//! Persists coop reports grouped by contract.

use crate::error::{CliError, CliResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use coop_core::CoopReport;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// All reports of one contract from one run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractReports {
    pub contract_id: String,
    pub generated_at: DateTime<Utc>,
    pub reports: Vec<CoopReport>,
}

impl ContractReports {
    /// Stamp a set of reports with the current time
    pub fn new(contract_id: impl Into<String>, reports: Vec<CoopReport>) -> Self {
        Self {
            contract_id: contract_id.into(),
            generated_at: Utc::now(),
            reports,
        }
    }

    /// Number of failed coops
    pub fn failed(&self) -> usize {
        self.reports.iter().filter(|r| r.is_failed()).count()
    }
}

/// Report storage interface
#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Save a contract's reports, replacing any earlier run
    async fn save(&self, reports: &ContractReports) -> CliResult<()>;

    /// Load a contract's reports
    async fn load(&self, contract_id: &str) -> CliResult<Option<ContractReports>>;

    /// List stored contract identifiers, sorted
    async fn list(&self) -> CliResult<Vec<String>>;
}

/// One pretty-printed JSON file per contract
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    base_path: PathBuf,
}

impl JsonFileStore {
    /// Open a store rooted at a directory, creating it if needed
    pub async fn new(base_path: impl AsRef<Path>) -> CliResult<Self> {
        let base_path = base_path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path).await.map_err(|e| {
            CliError::store(format!("Failed to create directory {:?}: {}", base_path, e))
        })?;

        info!("Initialized report store at {:?}", base_path);
        Ok(Self { base_path })
    }

    /// File holding a contract's reports
    ///
    /// The contract id is the file stem, so only file-safe ids are stored.
    pub fn contract_path(&self, contract_id: &str) -> CliResult<PathBuf> {
        if !is_file_safe(contract_id) {
            return Err(CliError::store(format!(
                "contract id {:?} cannot be used as a file name",
                contract_id
            )));
        }
        Ok(self.base_path.join(format!("{}.json", contract_id)))
    }
}

#[async_trait]
impl ResultStore for JsonFileStore {
    async fn save(&self, reports: &ContractReports) -> CliResult<()> {
        let path = self.contract_path(&reports.contract_id)?;
        let json = serde_json::to_string_pretty(reports)?;

        // Write beside the target, then swap in
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, json)
            .await
            .map_err(|e| CliError::store(format!("Failed to write {:?}: {}", staging, e)))?;
        fs::rename(&staging, &path)
            .await
            .map_err(|e| CliError::store(format!("Failed to replace {:?}: {}", path, e)))?;

        debug!(contract = %reports.contract_id, path = ?path, "reports saved");
        Ok(())
    }

    async fn load(&self, contract_id: &str) -> CliResult<Option<ContractReports>> {
        let path = self.contract_path(contract_id)?;
        if !fs::try_exists(&path).await? {
            return Ok(None);
        }

        let json = fs::read_to_string(&path)
            .await
            .map_err(|e| CliError::store(format!("Failed to read {:?}: {}", path, e)))?;
        Ok(Some(serde_json::from_str(&json)?))
    }

    async fn list(&self) -> CliResult<Vec<String>> {
        let mut entries = fs::read_dir(&self.base_path).await?;
        let mut ids = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .filter(|stem| is_file_safe(stem))
            {
                ids.push(stem.to_string());
            }
        }
        ids.sort();
        Ok(ids)
    }
}

/// In-memory store for dry runs and tests
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    contracts: Arc<RwLock<HashMap<String, ContractReports>>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResultStore for MemoryStore {
    async fn save(&self, reports: &ContractReports) -> CliResult<()> {
        self.contracts
            .write()
            .await
            .insert(reports.contract_id.clone(), reports.clone());
        Ok(())
    }

    async fn load(&self, contract_id: &str) -> CliResult<Option<ContractReports>> {
        Ok(self.contracts.read().await.get(contract_id).cloned())
    }

    async fn list(&self) -> CliResult<Vec<String>> {
        let mut ids: Vec<String> = self.contracts.read().await.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}

/// Contract identifiers are slugs of ASCII letters, digits, `-` and `_`
fn is_file_safe(contract_id: &str) -> bool {
    !contract_id.is_empty()
        && contract_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
