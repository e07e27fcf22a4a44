//! Batch Runner
//!
//! Fetches and scores registered coops in fixed-size batches. Coops inside a
//! batch are fetched concurrently; batches are separated by a fixed pause.
//! A failed fetch becomes a failed report and never stops the run.

use crate::client::{ContractSource, SnapshotSource};
use crate::error::CliResult;
use crate::registry::GradeRegistry;
use crate::season::SeasonWindow;
use crate::store::{ContractReports, ResultStore};
use coop_core::{ContractSpec, CoopReport, CoopScorer, ErrorDetail, FailedCoop, GradeAssignment};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Error code of a coop whose snapshot could not be fetched
pub const FETCH_ERROR_CODE: &str = "FETCH";

/// One coop to score
#[derive(Clone, Debug)]
pub struct CoopJob {
    pub contract: Arc<ContractSpec>,
    pub assignment: GradeAssignment,
}

/// Contracts selected for a run
#[derive(Debug, Default)]
pub struct JobPlan {
    pub jobs: Vec<CoopJob>,
    /// Coops whose contract could not be prepared
    pub failed: Vec<CoopReport>,
    /// Registered coops outside the season window or unknown upstream
    pub skipped: usize,
}

/// Match fetched contracts against the registry
///
/// Contracts missing grade specs get them fetched here; if that fails,
/// every coop of the contract is reported as a fetch failure.
pub async fn plan_jobs(
    contracts: Vec<ContractSpec>,
    registry: &GradeRegistry,
    season: &SeasonWindow,
    source: &ContractSource,
) -> JobPlan {
    let mut by_id: BTreeMap<String, ContractSpec> = contracts
        .into_iter()
        .map(|contract| (contract.id.clone(), contract))
        .collect();
    let mut plan = JobPlan::default();

    for contract_id in registry.contract_ids() {
        let registered: Vec<&GradeAssignment> = registry.for_contract(contract_id).collect();

        let Some(mut contract) = by_id.remove(contract_id) else {
            warn!(contract = contract_id, coops = registered.len(), "contract not found upstream");
            plan.skipped += registered.len();
            continue;
        };
        if !season.contains(&contract) {
            plan.skipped += registered.len();
            continue;
        }

        if let Err(e) = source.ensure_grade_specs(&mut contract).await {
            warn!(contract = contract_id, error = %e, "grade specs unavailable");
            plan.failed.extend(
                registered
                    .iter()
                    .map(|a| fetch_failure(&a.contract_id, &a.coop_code, e.to_string())),
            );
            continue;
        }

        let contract = Arc::new(contract);
        plan.jobs.extend(registered.into_iter().map(|assignment| CoopJob {
            contract: Arc::clone(&contract),
            assignment: assignment.clone(),
        }));
    }

    plan
}

/// Completed-coop counter printed to stderr
#[derive(Debug)]
pub struct Progress {
    total: usize,
    done: AtomicUsize,
    enabled: bool,
}

impl Progress {
    /// Create a counter; disabled counters only count
    pub fn new(total: usize, enabled: bool) -> Self {
        Self {
            total,
            done: AtomicUsize::new(0),
            enabled,
        }
    }

    /// Record one finished coop
    pub fn tick(&self, report: &CoopReport) -> usize {
        let done = self.done.fetch_add(1, Ordering::Relaxed) + 1;
        if self.enabled {
            eprintln!("{}", self.line(done, report));
        }
        done
    }

    /// Progress line for a finished coop
    pub fn line(&self, done: usize, report: &CoopReport) -> String {
        let status = match report {
            CoopReport::Scored(_) => "ok".to_string(),
            CoopReport::Failed(failed) => format!("failed ({})", failed.error.code),
        };
        format!(
            "[{}/{}] {}/{} {}",
            done,
            self.total,
            report.contract_id(),
            report.coop_code(),
            status
        )
    }

    /// Coops finished so far
    pub fn done(&self) -> usize {
        self.done.load(Ordering::Relaxed)
    }
}

/// Fetches and scores coops batch by batch
pub struct BatchRunner<'a> {
    snapshots: &'a dyn SnapshotSource,
    scorer: &'a CoopScorer,
    batch_size: usize,
    pause: Duration,
}

impl<'a> BatchRunner<'a> {
    /// Create a runner
    pub fn new(
        snapshots: &'a dyn SnapshotSource,
        scorer: &'a CoopScorer,
        batch_size: usize,
        pause: Duration,
    ) -> Self {
        Self {
            snapshots,
            scorer,
            batch_size: batch_size.max(1),
            pause,
        }
    }

    /// Score every job
    pub async fn run(&self, jobs: &[CoopJob], progress: &Progress) -> Vec<CoopReport> {
        let batches = jobs.len().div_ceil(self.batch_size);
        let mut reports = Vec::with_capacity(jobs.len());

        for (index, batch) in jobs.chunks(self.batch_size).enumerate() {
            if index > 0 && !self.pause.is_zero() {
                tokio::time::sleep(self.pause).await;
            }

            let scored: Vec<CoopReport> = stream::iter(batch)
                .map(|job| async move {
                    let report = self.score_job(job).await;
                    progress.tick(&report);
                    report
                })
                .buffer_unordered(self.batch_size)
                .collect()
                .await;

            info!(batch = index + 1, batches, coops = scored.len(), "batch finished");
            reports.extend(scored);
        }

        reports
    }

    /// Fetch and score one coop
    pub async fn score_job(&self, job: &CoopJob) -> CoopReport {
        let assignment = &job.assignment;
        match self
            .snapshots
            .snapshot(&assignment.contract_id, &assignment.coop_code)
            .await
        {
            Ok(snapshot) => self.scorer.score(&snapshot, &job.contract, assignment),
            Err(e) => {
                warn!(
                    contract = %assignment.contract_id,
                    coop = %assignment.coop_code,
                    error = %e,
                    "coop status fetch failed"
                );
                fetch_failure(&assignment.contract_id, &assignment.coop_code, e.to_string())
            }
        }
    }
}

/// Failed report for a coop that could not be fetched
pub fn fetch_failure(contract_id: &str, coop_code: &str, message: String) -> CoopReport {
    CoopReport::Failed(FailedCoop::new(
        contract_id,
        coop_code,
        ErrorDetail {
            code: FETCH_ERROR_CODE.to_string(),
            message,
        },
    ))
}

/// Group reports by contract, each sorted by coop code
pub fn group_by_contract(reports: Vec<CoopReport>) -> Vec<ContractReports> {
    let mut grouped: BTreeMap<String, Vec<CoopReport>> = BTreeMap::new();
    for report in reports {
        grouped
            .entry(report.contract_id().to_string())
            .or_default()
            .push(report);
    }

    grouped
        .into_iter()
        .map(|(contract_id, mut reports)| {
            reports.sort_by(|a, b| a.coop_code().cmp(b.coop_code()));
            ContractReports::new(contract_id, reports)
        })
        .collect()
}

/// Save every contract's reports
pub async fn persist(store: &dyn ResultStore, contracts: &[ContractReports]) -> CliResult<()> {
    for reports in contracts {
        store.save(reports).await?;
        info!(
            contract = %reports.contract_id,
            coops = reports.reports.len(),
            failed = reports.failed(),
            "reports stored"
        );
    }
    Ok(())
}

/// Totals of one run
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub contracts: usize,
    pub coops_scored: usize,
    pub coops_failed: usize,
    pub coops_skipped: usize,
    pub players_scored: usize,
    pub players_degraded: usize,
}

impl RunSummary {
    /// Tally stored reports
    pub fn from_contracts(contracts: &[ContractReports], skipped: usize) -> Self {
        let mut summary = Self {
            contracts: contracts.len(),
            coops_skipped: skipped,
            ..Default::default()
        };
        for report in contracts.iter().flat_map(|c| c.reports.iter()) {
            match report {
                CoopReport::Scored(scored) => {
                    summary.coops_scored += 1;
                    summary.players_scored += scored.user_data.len();
                    summary.players_degraded += scored.coop_data.degraded_players;
                }
                CoopReport::Failed(_) => summary.coops_failed += 1,
            }
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use crate::store::MemoryStore;
    use async_trait::async_trait;
    use coop_core::CoopSnapshot;
    use serde_json::json;

    struct FixtureSource;

    #[async_trait]
    impl SnapshotSource for FixtureSource {
        async fn snapshot(&self, _contract_id: &str, coop_code: &str) -> CliResult<CoopSnapshot> {
            if coop_code.starts_with("offline") {
                return Err(CliError::api(503, "status source unavailable"));
            }
            Ok(serde_json::from_value(json!({
                "totalAmount": 2000000,
                "secondsRemaining": 100000,
                "allGoalsAchieved": true,
                "allMembersReporting": true,
                "secondsSinceAllGoalsAchieved": 20000,
                "gracePeriodSecondsRemaining": 100000,
                "contributors": [
                    {"eiUuid": "EI1", "userName": "yolk", "contributionAmount": 1200000, "contributionRate": 3.0},
                    {"eiUuid": "EI2", "userName": "shell", "contributionAmount": 800000, "contributionRate": 2.0}
                ]
            }))
            .unwrap())
        }
    }

    fn contract() -> Arc<ContractSpec> {
        Arc::new(
            serde_json::from_value(json!({
                "id": "hatchery-rush",
                "maxCoopSize": 2,
                "gradeSpecs": [{
                    "grade": "GRADE_AAA",
                    "lengthSeconds": 259200,
                    "goals": [{"targetAmount": 2000000}]
                }]
            }))
            .unwrap(),
        )
    }

    fn jobs(coops: &[&str]) -> Vec<CoopJob> {
        let contract = contract();
        coops
            .iter()
            .map(|coop| CoopJob {
                contract: Arc::clone(&contract),
                assignment: GradeAssignment::new("hatchery-rush", *coop, "aaa"),
            })
            .collect()
    }

    #[tokio::test]
    async fn test_runs_every_job_across_batches() {
        let scorer = CoopScorer::default();
        let runner = BatchRunner::new(&FixtureSource, &scorer, 2, Duration::ZERO);
        let jobs = jobs(&["a", "b", "c", "d", "e"]);
        let progress = Progress::new(jobs.len(), false);

        let reports = runner.run(&jobs, &progress).await;

        assert_eq!(reports.len(), 5);
        assert_eq!(progress.done(), 5);
        assert!(reports.iter().all(|r| !r.is_failed()));
    }

    #[tokio::test]
    async fn test_fetch_failure_is_isolated() {
        let scorer = CoopScorer::default();
        let runner = BatchRunner::new(&FixtureSource, &scorer, 3, Duration::ZERO);
        let jobs = jobs(&["a", "offline-1", "b"]);

        let reports = runner.run(&jobs, &Progress::new(3, false)).await;
        let failed: Vec<&CoopReport> = reports.iter().filter(|r| r.is_failed()).collect();

        assert_eq!(failed.len(), 1);
        let CoopReport::Failed(failure) = failed[0] else {
            unreachable!();
        };
        assert_eq!(failure.coop_code, "offline-1");
        assert_eq!(failure.error.code, FETCH_ERROR_CODE);
        assert!(failure.error.message.contains("503"));
        assert!(failure.user_data.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_pauses_between_batches() {
        let scorer = CoopScorer::default();
        let runner = BatchRunner::new(&FixtureSource, &scorer, 1, Duration::from_secs(5));
        let jobs = jobs(&["a", "b", "c"]);

        let started = tokio::time::Instant::now();
        runner.run(&jobs, &Progress::new(3, false)).await;
        assert!(started.elapsed() >= Duration::from_secs(10));
    }

    #[test]
    fn test_progress_line() {
        let progress = Progress::new(12, false);
        let report = fetch_failure("hatchery-rush", "sunny-side", "timed out".to_string());
        assert_eq!(progress.tick(&report), 1);
        assert_eq!(
            progress.line(1, &report),
            "[1/12] hatchery-rush/sunny-side failed (FETCH)"
        );
    }

    #[tokio::test]
    async fn test_group_persist_and_summarize() {
        let scorer = CoopScorer::default();
        let runner = BatchRunner::new(&FixtureSource, &scorer, 4, Duration::ZERO);
        let mut reports = runner
            .run(&jobs(&["zulu", "alpha", "offline-2"]), &Progress::new(3, false))
            .await;
        reports.push(fetch_failure("cold-storage", "frosty", "timed out".to_string()));

        let grouped = group_by_contract(reports);
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].contract_id, "cold-storage");
        let coops: Vec<&str> = grouped[1].reports.iter().map(|r| r.coop_code()).collect();
        assert_eq!(coops, vec!["alpha", "offline-2", "zulu"]);

        let store = MemoryStore::new();
        persist(&store, &grouped).await.unwrap();
        assert_eq!(store.list().await.unwrap(), vec!["cold-storage", "hatchery-rush"]);

        let summary = RunSummary::from_contracts(&grouped, 4);
        assert_eq!(
            summary,
            RunSummary {
                contracts: 2,
                coops_scored: 2,
                coops_failed: 2,
                coops_skipped: 4,
                players_scored: 4,
                players_degraded: 0,
            }
        );
    }
}
