mod approvals;
mod builds;
mod core;
mod environments;

pub use self::core::{AzureDevOpsClient, DEFAULT_MAX_CONCURRENT_REQUESTS};
