use crate::providers::azure_devops::{Approval, Build, Timeline};

/// The three lookups the enrichment resolver correlates.
///
/// Implementations absorb every failure: a lookup that cannot be answered
/// returns `None` (or an empty list) and never an error.
#[allow(async_fn_in_trait)]
pub trait EnrichmentSource {
    async fn resolve_build(&self, project: &str, build_id: u64) -> Option<Build>;

    async fn resolve_timeline(&self, project: &str, build_id: u64) -> Option<Timeline>;

    /// Completed (approved) approvals of the project with step details.
    async fn resolve_approvals(&self, project: &str) -> Vec<Approval>;
}
