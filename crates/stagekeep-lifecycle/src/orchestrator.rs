//! Lifecycle Orchestrator - Version gate and retention cleanup
//!
//! The orchestrator is the main entry point. It reads deployed versions from
//! a [`DeploymentRegistry`], gates candidate versions, and retires versions
//! outside the retention window through a [`ResourceManager`].
//!
//! Retirement is strictly sequential: one full delete-then-wait cycle per
//! version, oldest first. A failing teardown is logged and recorded, and the
//! loop moves on to the next version.

use crate::config::{LifecycleConfig, RetentionPolicy};
use crate::error::{LifecycleError, Result};
use crate::planner::{RetentionDecision, RetentionPlanner};
use crate::report::{CleanupReport, RetirementOutcome, RetirementStatus};
use stagekeep_registry::{DeploymentRegistry, ResourceError, ResourceManager};
use stagekeep_types::*;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, error, info, instrument, warn};

/// Orchestrates version validation and retention cleanup
pub struct LifecycleOrchestrator {
    /// Validated configuration
    config: LifecycleConfig,
    /// Retention window derived from the configuration
    planner: RetentionPlanner,
    /// Parser/comparator for the configured version syntax
    comparator: VersionComparator,
    /// Source of truth for deployed stages
    registry: Arc<dyn DeploymentRegistry>,
    /// Teardown backend
    resources: Arc<dyn ResourceManager>,
    /// Event channel
    event_tx: broadcast::Sender<LifecycleEventEnvelope>,
}

impl LifecycleOrchestrator {
    /// Create an orchestrator, rejecting an invalid retention policy.
    pub fn new(
        config: LifecycleConfig,
        registry: Arc<dyn DeploymentRegistry>,
        resources: Arc<dyn ResourceManager>,
    ) -> Result<Self> {
        let policy = config.validate()?;
        let (event_tx, _) = broadcast::channel(1024);

        info!(
            retention_count = policy.count(),
            dry_run = config.dry_run,
            "Lifecycle orchestrator configured"
        );

        Ok(Self {
            comparator: VersionComparator::new(config.syntax.clone()),
            planner: RetentionPlanner::new(policy),
            config,
            registry,
            resources,
            event_tx,
        })
    }

    pub fn config(&self) -> &LifecycleConfig {
        &self.config
    }

    pub fn policy(&self) -> RetentionPolicy {
        self.planner.policy()
    }

    /// Subscribe to lifecycle events
    pub fn subscribe(&self) -> broadcast::Receiver<LifecycleEventEnvelope> {
        self.event_tx.subscribe()
    }

    /// Check that `candidate` may be published on top of `latest`.
    ///
    /// Never touches deployed state. When `latest` has no readable tag the
    /// ordering check is skipped.
    #[instrument(skip(self, latest))]
    pub fn validate_candidate(
        &self,
        candidate: Option<&str>,
        latest: Option<&DeployedVersion>,
    ) -> Result<VersionToken> {
        let (candidate, token) = self.parse_candidate(candidate)?;

        if let Some(latest) = latest {
            if let Some(latest_token) = latest.token.as_ref() {
                if !self.comparator.is_greater(&token, latest_token) {
                    error!(
                        candidate,
                        latest = latest.label(),
                        "Candidate version is not greater than the latest deployed version"
                    );
                    return Err(LifecycleError::VersionNotIncreasing {
                        candidate: candidate.to_string(),
                        latest: latest.label().to_string(),
                    });
                }
            }
        }

        info!(
            candidate,
            retention_count = self.policy().count(),
            "Candidate version accepted"
        );
        self.emit(
            None,
            LifecycleEvent::CandidateAccepted {
                candidate: candidate.to_string(),
                retention_count: self.policy().count(),
            },
        );

        Ok(token)
    }

    /// Validate the configured candidate against the latest deployed version.
    #[instrument(skip(self, ctx), fields(context = %ctx))]
    pub async fn gate_candidate(&self, ctx: &ServiceContext) -> Result<VersionToken> {
        // Fail on the candidate itself before any registry call.
        let candidate = self.config.candidate_version.as_deref();
        self.parse_candidate(candidate)?;

        let versions = self.fetch_versions(ctx).await?;
        let latest = versions.iter().rev().find(|v| v.present());
        self.validate_candidate(candidate, latest)
    }

    /// Query the registry and compute the retention decision, without teardown.
    #[instrument(skip(self, ctx), fields(context = %ctx))]
    pub async fn plan_cleanup(&self, ctx: &ServiceContext) -> Result<RetentionDecision> {
        let ordered = self.fetch_versions(ctx).await?;
        Ok(self.planner.plan(ordered))
    }

    /// Retire every version outside the retention window.
    ///
    /// Only registry resolution errors abort the run. Teardown failures are
    /// absorbed into the returned report.
    #[instrument(skip(self, ctx), fields(context = %ctx))]
    pub async fn cleanup(&self, ctx: &ServiceContext) -> Result<CleanupReport> {
        let run_id = RunId::generate();
        let mut report = CleanupReport::new(run_id, ctx.clone());
        self.enter(run_id, CleanupPhase::Idle);

        self.enter(run_id, CleanupPhase::QueryingRegistry);
        let ordered = match self.fetch_versions(ctx).await {
            Ok(ordered) => ordered,
            Err(e) => {
                error!(%run_id, error = %e, "Cleanup aborted");
                self.enter(run_id, CleanupPhase::Aborted);
                self.emit(
                    Some(run_id),
                    LifecycleEvent::CleanupAborted {
                        reason: e.to_string(),
                    },
                );
                return Err(e);
            }
        };

        self.enter(run_id, CleanupPhase::Planning);
        let decision = self.planner.plan(ordered);
        report.kept = decision.keep.len();

        info!(
            %run_id,
            kept = decision.keep.len(),
            retire = decision.retire.len(),
            dry_run = self.config.dry_run,
            "Retention plan computed"
        );

        let total = decision.retire.len();
        for (index, version) in decision.retire.into_iter().enumerate() {
            self.enter(run_id, CleanupPhase::Retiring { index, total });
            let outcome = self.retire(run_id, ctx, version).await;
            report.record(outcome);
        }

        report.finish();
        self.enter(run_id, CleanupPhase::Done);

        info!(
            %run_id,
            kept = report.kept,
            retired = report.retired_successfully,
            failed = report.retired_with_error,
            skipped = report.skipped,
            planned = report.planned,
            "Cleanup completed"
        );
        self.emit(
            Some(run_id),
            LifecycleEvent::CleanupCompleted {
                kept: report.kept,
                retired_successfully: report.retired_successfully,
                retired_with_error: report.retired_with_error,
                skipped: report.skipped,
                planned: report.planned,
            },
        );

        Ok(report)
    }

    /// Post-deployment hook: runs [`cleanup`](Self::cleanup) unconditionally.
    pub async fn after_deploy(&self, ctx: &ServiceContext) -> Result<CleanupReport> {
        self.cleanup(ctx).await
    }

    fn parse_candidate<'a>(&self, candidate: Option<&'a str>) -> Result<(&'a str, VersionToken)> {
        let candidate = candidate
            .filter(|c| !c.trim().is_empty())
            .ok_or(LifecycleError::MissingCandidateVersion)?;

        let token = self
            .comparator
            .parse_candidate(candidate)
            .map_err(|_| LifecycleError::InvalidFormat {
                candidate: candidate.to_string(),
                expected: self.comparator.syntax().describe(),
            })?;

        Ok((candidate, token))
    }

    /// Deployed versions in ascending order.
    async fn fetch_versions(&self, ctx: &ServiceContext) -> Result<Vec<DeployedVersion>> {
        if !ctx.is_defined() {
            return Err(LifecycleError::ServiceUndefined(ctx.to_string()));
        }

        let root = self.registry.resolve_api_root(ctx).await?;
        let records = self.registry.list_versioned_stages(ctx, &root).await?;

        debug!(root = %root, count = records.len(), "Fetched version stages");

        let versions = records
            .into_iter()
            .map(|record| DeployedVersion::from_record(record, &self.comparator))
            .collect();
        Ok(RetentionPlanner::order(versions))
    }

    async fn retire(
        &self,
        run_id: RunId,
        ctx: &ServiceContext,
        version: DeployedVersion,
    ) -> RetirementOutcome {
        let skip = if !version.is_identified() {
            Some(SkipReason::MissingIdentifier)
        } else if !version.present() {
            Some(SkipReason::UnreadableVersionTag)
        } else {
            None
        };

        if let Some(reason) = skip {
            warn!(
                %run_id,
                identifier = ?version.identifier,
                version = ?version.raw,
                %reason,
                "Skipping retirement"
            );
            self.emit(
                Some(run_id),
                LifecycleEvent::RetirementSkipped {
                    identifier: version.identifier.clone(),
                    version: version.raw.clone(),
                    reason,
                },
            );
            return RetirementOutcome {
                identifier: version.identifier,
                version: version.raw,
                resource_group: None,
                status: RetirementStatus::Skipped { reason },
            };
        }

        // A present token implies a readable raw tag.
        let tag = version.raw.as_deref().unwrap_or_default().trim().to_string();
        let resource_group = ctx.resource_group_name(&tag);

        let status = if self.config.dry_run {
            info!(%run_id, version = %tag, %resource_group, "Dry run: would retire version");
            self.emit(
                Some(run_id),
                LifecycleEvent::RetirementPlanned {
                    version: tag.clone(),
                    resource_group: resource_group.clone(),
                },
            );
            RetirementStatus::Planned
        } else {
            info!(%run_id, version = %tag, %resource_group, "Retiring version");
            match self.teardown(&resource_group).await {
                Ok(()) => {
                    info!(%run_id, version = %tag, %resource_group, "Version retired");
                    self.emit(
                        Some(run_id),
                        LifecycleEvent::VersionRetired {
                            version: tag.clone(),
                            resource_group: resource_group.clone(),
                        },
                    );
                    RetirementStatus::Retired
                }
                Err(e) => {
                    error!(
                        %run_id,
                        version = %tag,
                        %resource_group,
                        error = %e,
                        "Failed to retire version"
                    );
                    self.emit(
                        Some(run_id),
                        LifecycleEvent::RetirementFailed {
                            version: tag.clone(),
                            resource_group: resource_group.clone(),
                            error: e.to_string(),
                        },
                    );
                    RetirementStatus::Failed {
                        error: e.to_string(),
                    }
                }
            }
        };

        RetirementOutcome {
            identifier: version.identifier,
            version: Some(tag),
            resource_group: Some(resource_group),
            status,
        }
    }

    async fn teardown(&self, resource_group: &str) -> std::result::Result<(), ResourceError> {
        self.resources.delete(resource_group).await?;
        self.resources.wait_for_deletion(resource_group).await
    }

    fn enter(&self, run_id: RunId, phase: CleanupPhase) {
        debug!(%run_id, ?phase, "Cleanup phase");
        self.emit(Some(run_id), LifecycleEvent::PhaseChanged { phase });
    }

    fn emit(&self, run_id: Option<RunId>, event: LifecycleEvent) {
        // No subscribers is fine.
        let _ = self.event_tx.send(LifecycleEventEnvelope::new(run_id, event));
    }
}
