mod client;
mod lookups;
mod types;

pub use client::{AzureDevOpsClient, DEFAULT_MAX_CONCURRENT_REQUESTS};
pub use lookups::AzureDevOpsLookups;
pub use types::{
    Approval, Build, DeploymentRecord, DeploymentResult, Environment, Pipeline, ReferenceLinks,
    Timeline, TimelineRecord,
};

#[cfg(test)]
pub use types::{ApprovalStatus, ApprovalStep, ApprovalUser};
