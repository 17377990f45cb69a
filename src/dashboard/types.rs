use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::providers::azure_devops::DeploymentResult;

/// One pipeline's latest deployment into one environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentInstance {
    /// Label shown when no enrichment is available (the run name)
    pub value: String,
    /// Build that performed the deployment; `None` disables enrichment
    pub build_id: Option<u64>,
    /// Web link to the run
    pub uri: String,
    pub result: DeploymentResult,
    pub finish_time: Option<DateTime<Utc>>,
    pub environment_id: u64,
    /// Stage expected to carry the approval gate for this environment
    pub stage_name: String,
    /// Backslash-delimited folder of the owning pipeline
    pub folder: Option<String>,
    /// Run reference as reported by the deployment record owner
    pub owner_id: Option<u64>,
}

/// A pipeline and its deployments keyed by environment name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineInstance {
    /// Stable identifier, unique across the dashboard
    pub key: String,
    pub name: String,
    pub uri: String,
    pub environments: IndexMap<String, DeploymentInstance>,
}

impl PipelineInstance {
    /// Folder of the pipeline, taken from its first deployment.
    pub fn folder(&self) -> Option<&str> {
        self.environments
            .values()
            .next()
            .and_then(|instance| instance.folder.as_deref())
    }
}

/// Everything needed to render one dashboard: environment columns in display
/// order and one row per pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dashboard {
    pub environments: Vec<String>,
    pub pipelines: Vec<PipelineInstance>,
}
