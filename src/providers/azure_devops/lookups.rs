use log::{debug, warn};
use std::sync::Arc;

use super::client::AzureDevOpsClient;
use super::types::{Approval, ApprovalExpand, ApprovalStatus, Build, Timeline};
use crate::enrichment::EnrichmentSource;

/// Enrichment lookups backed by the Azure DevOps REST API.
///
/// Every request failure is logged and turned into an absent result here, so
/// the resolver never sees an error.
#[derive(Clone)]
pub struct AzureDevOpsLookups {
    client: Arc<AzureDevOpsClient>,
    approvals_top: Option<usize>,
}

impl AzureDevOpsLookups {
    pub fn new(client: Arc<AzureDevOpsClient>) -> Self {
        Self {
            client,
            approvals_top: None,
        }
    }

    /// Caps how many approvals one fetch returns (`$top`); `None` leaves it to the service.
    #[must_use]
    pub fn with_approvals_top(mut self, approvals_top: Option<usize>) -> Self {
        self.approvals_top = approvals_top;
        self
    }
}

impl EnrichmentSource for AzureDevOpsLookups {
    async fn resolve_build(&self, project: &str, build_id: u64) -> Option<Build> {
        self.client
            .get_build(project, build_id)
            .await
            .inspect_err(|e| debug!("Could not fetch build {build_id}: {e}"))
            .ok()
    }

    async fn resolve_timeline(&self, project: &str, build_id: u64) -> Option<Timeline> {
        self.client
            .get_build_timeline(project, build_id)
            .await
            .inspect_err(|e| debug!("Could not fetch timeline of build {build_id}: {e}"))
            .ok()
    }

    async fn resolve_approvals(&self, project: &str) -> Vec<Approval> {
        self.client
            .get_approvals(
                project,
                Some(ApprovalStatus::Approved),
                Some(ApprovalExpand::Steps),
                self.approvals_top,
            )
            .await
            .unwrap_or_else(|e| {
                warn!("Error fetching pipeline approvals for {project}: {e}");
                Vec::new()
            })
    }
}
