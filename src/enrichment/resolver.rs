use futures::future::join_all;
use indexmap::IndexMap;
use log::{debug, info, warn};
use tokio::sync::OnceCell;

use super::correlation::{correlate_approval_checkpoint, CheckpointMatch};
use super::keys::make_key;
use super::snapshot::{Enrichment, EnrichmentSnapshot};
use super::source::EnrichmentSource;
use crate::dashboard::{DeploymentInstance, PipelineInstance};
use crate::providers::azure_devops::Approval;

/// How far the approval chain of one deployment got.
///
/// Only [`ApprovalResolution::Approved`] yields an approver. The other
/// variants split into expected outcomes (most environments are not gated)
/// and anomalies that point at an inconsistent data chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApprovalResolution {
    NoBuildReference,
    BuildNotFound,
    NoTimeline,
    NoApprovalCheckpoint,
    StageNotGated,
    OrphanApprovalRecord { approval_record_id: String },
    NoApprovals,
    ApprovalNotFound { approval_record_id: String },
    NoApprover { approval_id: String },
    Approved(String),
}

impl ApprovalResolution {
    pub fn approver(self) -> Option<String> {
        match self {
            Self::Approved(name) => Some(name),
            Self::NoBuildReference
            | Self::BuildNotFound
            | Self::NoTimeline
            | Self::NoApprovalCheckpoint
            | Self::StageNotGated
            | Self::OrphanApprovalRecord { .. }
            | Self::NoApprovals
            | Self::ApprovalNotFound { .. }
            | Self::NoApprover { .. } => None,
        }
    }

    fn log(&self, key: &str, project: &str) {
        match self {
            Self::NoBuildReference => debug!("{key}: no build reference, using deployment label"),
            Self::BuildNotFound => debug!("{key}: build not found, using deployment label"),
            Self::NoTimeline => debug!("{key}: no timeline available"),
            Self::NoApprovalCheckpoint => debug!("{key}: build has no approval checkpoint"),
            Self::StageNotGated => debug!("{key}: stage has no approval gate"),
            Self::Approved(name) => debug!("{key}: approved by {name}"),
            Self::OrphanApprovalRecord { approval_record_id } => warn!(
                "{key}: no checkpoint record found for approval timeline record {approval_record_id}"
            ),
            Self::NoApprovals => warn!("{key}: no approvals found for project {project}"),
            Self::ApprovalNotFound { approval_record_id } => warn!(
                "{key}: no approval found for timeline record {approval_record_id}"
            ),
            Self::NoApprover { approval_id } => {
                warn!("{key}: no approver found for approval {approval_id}")
            }
        }
    }
}

/// Approvals fetched during one enrichment pass.
enum ApprovalsScope {
    /// Shared by every deployment once a fetch returns approvals. An empty
    /// (failed) fetch is not kept, so the next gated deployment asks again.
    Shared(OnceCell<Vec<Approval>>),
    /// Fetched again by every deployment whose stage is gated.
    PerDeployment,
}

/// Resolves build labels and approvers for every cell of a dashboard.
///
/// Each deployment runs its own lookup chain; all chains are polled together
/// and the snapshot is assembled only after every chain has finished, so a
/// caller never observes a partially filled result.
pub struct EnrichmentResolver<S> {
    source: S,
    share_approvals: bool,
}

impl<S: EnrichmentSource> EnrichmentResolver<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            share_approvals: true,
        }
    }

    /// Whether one approvals fetch is reused by all deployments of a pass.
    ///
    /// Only a non-empty result is reused; an empty list is retried by the
    /// next gated deployment, as without sharing.
    #[must_use]
    pub fn with_shared_approvals(mut self, share_approvals: bool) -> Self {
        self.share_approvals = share_approvals;
        self
    }

    #[cfg(test)]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Enriches every pipeline/environment cell of `pipelines`.
    ///
    /// Never fails: the worst outcome for a cell is the deployment's own label
    /// without an approver.
    pub async fn enrich(&self, pipelines: &[PipelineInstance], project: &str) -> EnrichmentSnapshot {
        let scope = if self.share_approvals {
            ApprovalsScope::Shared(OnceCell::new())
        } else {
            ApprovalsScope::PerDeployment
        };
        let scope = &scope;

        let chains = pipelines.iter().flat_map(move |pipeline| {
            pipeline
                .environments
                .iter()
                .map(move |(environment_name, instance)| {
                    let key = make_key(pipeline, environment_name);
                    async move {
                        let enrichment = self.enrich_instance(project, &key, instance, scope).await;
                        (key, enrichment)
                    }
                })
        });

        let entries: IndexMap<String, Enrichment> = join_all(chains).await.into_iter().collect();

        let snapshot = EnrichmentSnapshot::new(entries);
        if snapshot.is_empty() {
            debug!("No deployments to enrich");
        } else {
            info!(
                "Enriched {} deployments ({} with approvers)",
                snapshot.len(),
                snapshot.approved_count()
            );
        }
        snapshot
    }

    async fn enrich_instance(
        &self,
        project: &str,
        key: &str,
        instance: &DeploymentInstance,
        scope: &ApprovalsScope,
    ) -> Enrichment {
        let (build_label, resolution) = self.resolve_instance(project, instance, scope).await;
        resolution.log(key, project);

        Enrichment {
            build_label,
            approver_name: resolution.approver(),
        }
    }

    /// Runs the lookup chain of one deployment and returns its label and how
    /// far the approval chain got.
    async fn resolve_instance(
        &self,
        project: &str,
        instance: &DeploymentInstance,
        scope: &ApprovalsScope,
    ) -> (String, ApprovalResolution) {
        let Some(build_id) = instance.build_id else {
            return (instance.value.clone(), ApprovalResolution::NoBuildReference);
        };

        let Some(build) = self.source.resolve_build(project, build_id).await else {
            return (instance.value.clone(), ApprovalResolution::BuildNotFound);
        };

        let build_label = if build.build_number.is_empty() {
            instance.value.clone()
        } else {
            build.build_number
        };

        let Some(timeline) = self.source.resolve_timeline(project, build_id).await else {
            return (build_label, ApprovalResolution::NoTimeline);
        };

        let approval_record_id =
            match correlate_approval_checkpoint(&timeline.records, &instance.stage_name) {
                CheckpointMatch::Gated { approval_record_id } => approval_record_id,
                CheckpointMatch::NoApprovalCheckpoint => {
                    return (build_label, ApprovalResolution::NoApprovalCheckpoint)
                }
                CheckpointMatch::StageNotGated => {
                    return (build_label, ApprovalResolution::StageNotGated)
                }
                CheckpointMatch::OrphanApproval { approval_record_id } => {
                    return (
                        build_label,
                        ApprovalResolution::OrphanApprovalRecord {
                            approval_record_id: approval_record_id.to_string(),
                        },
                    )
                }
            };

        let resolution = match scope {
            ApprovalsScope::Shared(cell) => {
                let approvals = cell
                    .get_or_try_init(|| async {
                        let approvals = self.source.resolve_approvals(project).await;
                        if approvals.is_empty() {
                            Err(ApprovalResolution::NoApprovals)
                        } else {
                            Ok(approvals)
                        }
                    })
                    .await;
                match approvals {
                    Ok(approvals) => match_approval(approvals, approval_record_id),
                    Err(resolution) => resolution,
                }
            }
            ApprovalsScope::PerDeployment => {
                let approvals = self.source.resolve_approvals(project).await;
                match_approval(&approvals, approval_record_id)
            }
        };

        (build_label, resolution)
    }
}

fn match_approval(approvals: &[Approval], approval_record_id: &str) -> ApprovalResolution {
    if approvals.is_empty() {
        return ApprovalResolution::NoApprovals;
    }

    let Some(approval) = approvals
        .iter()
        .find(|approval| approval.id == approval_record_id)
    else {
        return ApprovalResolution::ApprovalNotFound {
            approval_record_id: approval_record_id.to_string(),
        };
    };

    match approval.first_step_approver() {
        Some(name) => ApprovalResolution::Approved(name.to_string()),
        None => ApprovalResolution::NoApprover {
            approval_id: approval.id.clone(),
        },
    }
}
