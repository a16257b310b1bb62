//! Candidate version gate

use super::Workspace;
use crate::error::CliResult;
use crate::output::{print_single, print_success, OutputFormat};
use serde::Serialize;
use stagekeep_lifecycle::LifecycleConfig;

#[derive(Debug, Serialize)]
struct Accepted {
    candidate: String,
    retention_count: usize,
}

/// Check the candidate against the latest deployed version
pub async fn execute(
    candidate: Option<String>,
    mut config: LifecycleConfig,
    workspace: &Workspace,
    format: OutputFormat,
) -> CliResult<()> {
    if candidate.is_some() {
        config.candidate_version = candidate;
    }
    let orchestrator = workspace.orchestrator(config)?;
    let token = orchestrator.gate_candidate(&workspace.ctx).await?;

    // Echo the candidate as written; the token renders in the default syntax.
    let candidate = orchestrator
        .config()
        .candidate_version
        .as_deref()
        .map(|c| c.trim().to_string())
        .unwrap_or_else(|| token.to_string());
    let accepted = Accepted {
        candidate,
        retention_count: orchestrator.policy().count(),
    };
    match format {
        OutputFormat::Table => print_success(&format!(
            "Version {} accepted for {} (keeping {} versions)",
            accepted.candidate, workspace.ctx, accepted.retention_count
        )),
        _ => print_single(&accepted, format)?,
    }
    Ok(())
}
