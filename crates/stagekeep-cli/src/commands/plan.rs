//! Retention plan preview

use super::Workspace;
use crate::error::CliResult;
use crate::output::{print_output, OutputFormat};
use serde::Serialize;
use stagekeep_lifecycle::LifecycleConfig;
use stagekeep_types::DeployedVersion;
use tabled::Tabled;

/// Table row for plan display
#[derive(Debug, Serialize, Tabled)]
struct PlanRow {
    /// Version tag
    version: String,
    /// Stage identifier
    stage: String,
    /// keep or retire
    action: String,
}

impl PlanRow {
    fn new(version: &DeployedVersion, action: &str) -> Self {
        Self {
            version: version.raw.clone().unwrap_or_else(|| "-".into()),
            stage: version.identifier.clone().unwrap_or_else(|| "-".into()),
            action: action.to_string(),
        }
    }
}

/// Print which versions would be kept and which retired
pub async fn execute(
    config: LifecycleConfig,
    workspace: &Workspace,
    format: OutputFormat,
) -> CliResult<()> {
    let orchestrator = workspace.orchestrator(config)?;
    let decision = orchestrator.plan_cleanup(&workspace.ctx).await?;

    let rows: Vec<PlanRow> = decision
        .retire
        .iter()
        .map(|v| PlanRow::new(v, "retire"))
        .chain(decision.keep.iter().map(|v| PlanRow::new(v, "keep")))
        .collect();

    print_output(rows, format)
}
