//! Retention cleanup

use super::Workspace;
use crate::error::CliResult;
use crate::output::{
    print_info, print_output, print_single, print_success, print_warning, OutputFormat,
};
use serde::Serialize;
use stagekeep_lifecycle::{LifecycleConfig, RetirementOutcome, RetirementStatus};
use tabled::Tabled;

/// Table row for retirement outcomes
#[derive(Debug, Serialize, Tabled)]
struct OutcomeRow {
    version: String,
    resource_group: String,
    status: String,
}

impl From<&RetirementOutcome> for OutcomeRow {
    fn from(outcome: &RetirementOutcome) -> Self {
        let status = match &outcome.status {
            RetirementStatus::Retired => "retired".to_string(),
            RetirementStatus::Failed { error } => format!("failed: {}", error),
            RetirementStatus::Skipped { reason } => format!("skipped: {}", reason),
            RetirementStatus::Planned => "planned".to_string(),
        };
        Self {
            version: outcome.version.clone().unwrap_or_else(|| "-".into()),
            resource_group: outcome.resource_group.clone().unwrap_or_else(|| "-".into()),
            status,
        }
    }
}

/// Retire versions outside the window and update the snapshot
pub async fn execute(
    dry_run: bool,
    mut config: LifecycleConfig,
    workspace: &Workspace,
    format: OutputFormat,
) -> CliResult<()> {
    config.dry_run |= dry_run;
    let dry_run = config.dry_run;

    let orchestrator = workspace.orchestrator(config)?;
    let report = orchestrator.cleanup(&workspace.ctx).await?;

    if !dry_run {
        workspace.persist()?;
    }

    match format {
        OutputFormat::Table => {
            let rows: Vec<OutcomeRow> = report.outcomes.iter().map(OutcomeRow::from).collect();
            print_output(rows, format)?;
            let summary = format!(
                "kept {}, retired {}, failed {}, skipped {}",
                report.kept, report.retired_successfully, report.retired_with_error, report.skipped
            );
            if dry_run {
                print_info(&format!("Dry run: {} would be retired; {}", report.planned, summary));
            } else if report.is_clean() {
                print_success(&summary);
            } else {
                print_warning(&summary);
            }
        }
        _ => print_single(&report, format)?,
    }
    Ok(())
}
