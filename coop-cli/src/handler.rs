//! Command Handlers
//!
//! Handler functions for CLI commands.

use crate::client::{ContractSource, CoopStatusSource};
use crate::commands::{Cli, Commands, OutputFormat};
use crate::config::RunConfig;
use crate::error::{CliError, CliResult};
use crate::output;
use crate::registry::GradeRegistry;
use crate::runner::{self, BatchRunner, CoopJob, Progress, RunSummary};
use crate::store::{JsonFileStore, MemoryStore, ResultStore};
use coop_core::{CoopScorer, Grade, GradeAssignment};
use std::sync::Arc;
use tracing::info;

/// Run the CLI with parsed arguments
pub async fn run(cli: Cli) -> CliResult<()> {
    let config = RunConfig::from_cli(&cli)?;
    match cli.command {
        Commands::Score { dry_run } => handle_score(&config, dry_run, cli.format).await,
        Commands::Coop {
            contract,
            coop,
            grade,
        } => handle_coop(&config, &contract, &coop, grade, cli.format).await,
        Commands::Show { contract } => handle_show(&config, contract, cli.format).await,
        Commands::Config => {
            output::print_config(&config, cli.format);
            Ok(())
        }
    }
}

fn contract_source(config: &RunConfig) -> CliResult<ContractSource> {
    ContractSource::new(config.require_contracts_url()?, config.timeout_secs)
}

fn status_source(config: &RunConfig) -> CliResult<CoopStatusSource> {
    Ok(CoopStatusSource::new(config.require_status_url()?, config.timeout_secs)?
        .with_buff_history(config.fetch_buffs))
}

/// Score every registered coop
async fn handle_score(config: &RunConfig, dry_run: bool, format: OutputFormat) -> CliResult<()> {
    let contracts = contract_source(config)?;
    let statuses = status_source(config)?;
    let registry = GradeRegistry::load(&config.grades_source, config.timeout_secs).await?;
    if registry.is_empty() {
        return Err(CliError::config(format!(
            "grade registry {} has no entries",
            config.grades_source
        )));
    }

    let store: Box<dyn ResultStore> = if dry_run {
        Box::new(MemoryStore::new())
    } else {
        Box::new(JsonFileStore::new(&config.output_dir).await?)
    };

    let fetched = contracts.fetch_contracts().await?;
    info!(contracts = fetched.len(), registered = registry.len(), "contracts fetched");

    let plan = runner::plan_jobs(fetched, &registry, &config.season, &contracts).await;
    info!(
        coops = plan.jobs.len(),
        failed = plan.failed.len(),
        skipped = plan.skipped,
        "run planned"
    );

    let scorer = CoopScorer::default();
    let batch_runner = BatchRunner::new(&statuses, &scorer, config.batch_size, config.batch_pause());
    let progress = Progress::new(plan.jobs.len(), format == OutputFormat::Table);

    let mut reports = batch_runner.run(&plan.jobs, &progress).await;
    reports.extend(plan.failed);

    let grouped = runner::group_by_contract(reports);
    runner::persist(store.as_ref(), &grouped).await?;

    output::print_summary(&RunSummary::from_contracts(&grouped, plan.skipped), format);
    if !dry_run && format == OutputFormat::Table {
        output::print_row("Reports:", &config.output_dir.display().to_string());
    }
    Ok(())
}

/// Score a single coop
async fn handle_coop(
    config: &RunConfig,
    contract_id: &str,
    coop_code: &str,
    grade: Option<String>,
    format: OutputFormat,
) -> CliResult<()> {
    let contracts = contract_source(config)?;
    let statuses = status_source(config)?;

    let assignment = match grade {
        Some(grade) => manual_assignment(contract_id, coop_code, grade)?,
        None => {
            let registry = GradeRegistry::load(&config.grades_source, config.timeout_secs).await?;
            registry
                .lookup(contract_id, coop_code)
                .cloned()
                .ok_or_else(|| CliError::not_found(format!("grade for {}/{}", contract_id, coop_code)))?
        }
    };

    let mut contract = contracts
        .fetch_contracts()
        .await?
        .into_iter()
        .find(|c| c.id == contract_id)
        .ok_or_else(|| CliError::not_found(format!("contract {}", contract_id)))?;
    contracts.ensure_grade_specs(&mut contract).await?;

    let scorer = CoopScorer::default();
    let batch_runner = BatchRunner::new(&statuses, &scorer, 1, config.batch_pause());
    let job = CoopJob {
        contract: Arc::new(contract),
        assignment,
    };

    let report = batch_runner.score_job(&job).await;
    output::print_report(&report, format);
    Ok(())
}

/// Assignment from a `--grade` flag, rejected before anything is fetched
fn manual_assignment(contract_id: &str, coop_code: &str, grade: String) -> CliResult<GradeAssignment> {
    Grade::parse(&grade)?;
    Ok(GradeAssignment::new(contract_id, coop_code, grade))
}

/// Print stored reports
async fn handle_show(config: &RunConfig, contract: Option<String>, format: OutputFormat) -> CliResult<()> {
    let store = JsonFileStore::new(&config.output_dir).await?;
    match contract {
        Some(contract_id) => {
            let reports = store
                .load(&contract_id)
                .await?
                .ok_or_else(|| CliError::not_found(format!("reports for {}", contract_id)))?;
            output::print_contract_reports(&reports, format);
        }
        None => output::print_contract_list(&store.list().await?, format),
    }
    Ok(())
}
