use serde::Serialize;

use super::snapshot::EnrichmentSnapshot;
use crate::dashboard::PipelineInstance;

/// Key of a pipeline/environment cell: `"<pipeline key>:<environment name>"`.
///
/// Collision free as long as pipeline keys are unique.
pub fn make_key(pipeline: &PipelineInstance, environment_name: &str) -> String {
    format!("{}:{}", pipeline.key, environment_name)
}

/// Labels to display in one dashboard cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CellLabels {
    pub build_name: String,
    pub approval_name: Option<String>,
}

/// Reads the labels of a cell back out of a snapshot.
///
/// Returns `None` when the pipeline never deployed to `environment_name`.
/// Without a snapshot (refresh still pending) or without an entry for the
/// cell, the deployment's own label is used and there is no approver.
pub fn extract(
    pipeline: &PipelineInstance,
    environment_name: &str,
    snapshot: Option<&EnrichmentSnapshot>,
) -> Option<CellLabels> {
    let instance = pipeline.environments.get(environment_name)?;

    let entry = snapshot.and_then(|snapshot| snapshot.get(&make_key(pipeline, environment_name)));

    Some(match entry {
        Some(entry) => CellLabels {
            build_name: entry.build_label.clone(),
            approval_name: entry.approver_name.clone(),
        },
        None => CellLabels {
            build_name: instance.value.clone(),
            approval_name: None,
        },
    })
}
