//! Data Source Clients
//!
//! HTTP clients for the contract source and the coop status source. Each
//! request is made once; a failure is returned to the caller.

use crate::error::{CliError, CliResult};
use async_trait::async_trait;
use coop_core::{BuffEvent, ContractSpec, CoopSnapshot, GradeSpec};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

/// Build the shared HTTP client
fn build_http_client(timeout_secs: u64) -> CliResult<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| CliError::connection(e.to_string()))
}

/// Decode a JSON body or turn the status into an API error
async fn decode<T: DeserializeOwned>(response: Response) -> CliResult<T> {
    if response.status().is_success() {
        Ok(response.json().await?)
    } else {
        Err(CliError::api(
            response.status().as_u16(),
            response.text().await.unwrap_or_default(),
        ))
    }
}

/// Contract source client
#[derive(Clone)]
pub struct ContractSource {
    /// HTTP client
    client: Client,
    /// Base URL
    base_url: String,
}

impl ContractSource {
    /// Create a new client
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> CliResult<Self> {
        Ok(Self {
            client: build_http_client(timeout_secs)?,
            base_url: trim_base(base_url.into()),
        })
    }

    /// URL listing every contract
    pub fn contracts_url(&self) -> String {
        self.base_url.clone()
    }

    /// URL of one contract's grade specs
    pub fn grade_specs_url(&self, contract_id: &str) -> String {
        format!("{}/{}/grades", self.base_url, contract_id)
    }

    /// Fetch all contracts
    pub async fn fetch_contracts(&self) -> CliResult<Vec<ContractSpec>> {
        let url = self.contracts_url();
        debug!(%url, "fetching contracts");
        let response = self.client.get(&url).send().await?;
        decode(response).await
    }

    /// Fetch grade specs for one contract
    pub async fn fetch_grade_specs(&self, contract_id: &str) -> CliResult<Vec<GradeSpec>> {
        let url = self.grade_specs_url(contract_id);
        debug!(%url, "fetching grade specs");
        let response = self.client.get(&url).send().await?;
        decode(response).await
    }

    /// Fill in grade specs for a contract that arrived without them
    pub async fn ensure_grade_specs(&self, contract: &mut ContractSpec) -> CliResult<()> {
        if contract.needs_grade_specs() {
            contract.grade_specs = self.fetch_grade_specs(&contract.id).await?;
        }
        Ok(())
    }
}

/// Anything that can produce a coop snapshot
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Current snapshot of one coop, buff histories included where available
    async fn snapshot(&self, contract_id: &str, coop_code: &str) -> CliResult<CoopSnapshot>;
}

/// Coop status source client
#[derive(Clone)]
pub struct CoopStatusSource {
    /// HTTP client
    client: Client,
    /// Base URL
    base_url: String,
    /// Fetch missing buff histories
    fetch_buffs: bool,
}

impl CoopStatusSource {
    /// Create a new client
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> CliResult<Self> {
        Ok(Self {
            client: build_http_client(timeout_secs)?,
            base_url: trim_base(base_url.into()),
            fetch_buffs: true,
        })
    }

    /// Enable or disable buff history lookups
    pub fn with_buff_history(mut self, enabled: bool) -> Self {
        self.fetch_buffs = enabled;
        self
    }

    /// Fetch the current snapshot of one coop
    pub async fn fetch_status(&self, contract_id: &str, coop_code: &str) -> CliResult<CoopSnapshot> {
        debug!(contract = contract_id, coop = coop_code, "fetching coop status");
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("contractId", contract_id), ("coopCode", coop_code)])
            .send()
            .await?;
        decode(response).await
    }

    /// Fetch one contributor's buff history
    pub async fn fetch_buff_history(
        &self,
        contract_id: &str,
        coop_code: &str,
        ei_uuid: &str,
    ) -> CliResult<Vec<BuffEvent>> {
        let url = format!("{}/buffs", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("contractId", contract_id),
                ("coopCode", coop_code),
                ("eiUuid", ei_uuid),
            ])
            .send()
            .await?;
        decode(response).await
    }

    /// Fill in buff history for contributors that arrived without one
    ///
    /// Buff history is optional: a failed lookup leaves the contributor
    /// without history and is only logged.
    pub async fn ensure_buff_history(
        &self,
        contract_id: &str,
        coop_code: &str,
        snapshot: &mut CoopSnapshot,
    ) {
        let Some(contributors) = snapshot.contributors.as_mut() else {
            return;
        };

        for contributor in contributors.iter_mut() {
            if contributor.buff_history.is_some() {
                continue;
            }
            let Some(ei_uuid) = contributor.ei_uuid.clone() else {
                continue;
            };
            match self.fetch_buff_history(contract_id, coop_code, &ei_uuid).await {
                Ok(history) => contributor.buff_history = Some(history),
                Err(e) => warn!(
                    contract = contract_id,
                    coop = coop_code,
                    player = %ei_uuid,
                    error = %e,
                    "buff history unavailable"
                ),
            }
        }
    }
}

#[async_trait]
impl SnapshotSource for CoopStatusSource {
    async fn snapshot(&self, contract_id: &str, coop_code: &str) -> CliResult<CoopSnapshot> {
        let mut snapshot = self.fetch_status(contract_id, coop_code).await?;
        if self.fetch_buffs {
            self.ensure_buff_history(contract_id, coop_code, &mut snapshot).await;
        }
        Ok(snapshot)
    }
}

fn trim_base(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
