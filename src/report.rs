use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;

use crate::dashboard::{Dashboard, PipelineInstance};
use crate::enrichment::{extract, EnrichmentSnapshot};
use crate::providers::azure_devops::DeploymentResult;

/// Serializable view of an enriched dashboard.
#[derive(Debug, Serialize)]
pub struct DashboardReport {
    pub project: String,
    pub collected_at: DateTime<Utc>,
    pub environments: Vec<String>,
    pub pipelines: Vec<PipelineRow>,
}

#[derive(Debug, Serialize)]
pub struct PipelineRow {
    pub key: String,
    pub name: String,
    pub uri: String,
    pub folder: Option<String>,
    pub deployments: IndexMap<String, DeploymentCell>,
}

#[derive(Debug, Serialize)]
pub struct DeploymentCell {
    pub build_name: String,
    pub approval_name: Option<String>,
    pub result: DeploymentResult,
    pub finish_time: Option<DateTime<Utc>>,
    pub uri: String,
    /// Run that performed the deployment
    pub owner_id: Option<u64>,
}

impl DashboardReport {
    pub fn new(project: &str, dashboard: &Dashboard, snapshot: Option<&EnrichmentSnapshot>) -> Self {
        Self {
            project: project.to_string(),
            collected_at: Utc::now(),
            environments: dashboard.environments.clone(),
            pipelines: dashboard
                .pipelines
                .iter()
                .map(|pipeline| PipelineRow::new(pipeline, snapshot))
                .collect(),
        }
    }
}

impl PipelineRow {
    fn new(pipeline: &PipelineInstance, snapshot: Option<&EnrichmentSnapshot>) -> Self {
        let deployments = pipeline
            .environments
            .iter()
            .filter_map(|(environment_name, instance)| {
                let labels = extract(pipeline, environment_name, snapshot)?;
                Some((
                    environment_name.clone(),
                    DeploymentCell {
                        build_name: labels.build_name,
                        approval_name: labels.approval_name,
                        result: instance.result,
                        finish_time: instance.finish_time,
                        uri: instance.uri.clone(),
                        owner_id: instance.owner_id,
                    },
                ))
            })
            .collect();

        Self {
            key: pipeline.key.clone(),
            name: pipeline.name.clone(),
            uri: pipeline.uri.clone(),
            folder: pipeline.folder().map(ToString::to_string),
            deployments,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrichment::fixtures::{approval, gated_timeline, instance, pipeline, FakeSource};
    use crate::enrichment::EnrichmentResolver;

    #[tokio::test]
    async fn test_report_carries_enriched_labels() {
        // Arrange
        let dashboard = Dashboard {
            environments: vec!["Dev".to_string(), "Prod".to_string()],
            pipelines: vec![pipeline(
                "12",
                vec![
                    ("Dev", instance("run-1", Some(1), "Dev")),
                    ("Prod", instance("run-0", None, "Prod")),
                ],
            )],
        };
        let source = FakeSource::default()
            .with_build(1, "20240612.1")
            .with_timeline(1, gated_timeline("A", "C", "S", "Dev"))
            .with_approval(approval("A", Some("Jane Doe")));
        let snapshot = EnrichmentResolver::new(source)
            .enrich(&dashboard.pipelines, "proj")
            .await;

        // Act
        let report = DashboardReport::new("proj", &dashboard, Some(&snapshot));

        // Assert
        let row = &report.pipelines[0];
        assert_eq!(row.folder.as_deref(), Some("\\"));
        assert_eq!(row.deployments["Dev"].build_name, "20240612.1");
        assert_eq!(row.deployments["Dev"].approval_name.as_deref(), Some("Jane Doe"));
        assert_eq!(row.deployments["Prod"].build_name, "run-0");
        assert_eq!(row.deployments["Prod"].approval_name, None);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["pipelines"][0]["deployments"]["Dev"]["result"], "succeeded");
        assert_eq!(json["pipelines"][0]["deployments"]["Dev"]["owner_id"], 1);
        assert!(json["pipelines"][0]["deployments"]["Prod"]["owner_id"].is_null());
    }

    #[test]
    fn test_report_without_snapshot_uses_deployment_labels() {
        let dashboard = Dashboard {
            environments: vec!["Dev".to_string()],
            pipelines: vec![pipeline("12", vec![("Dev", instance("run-1", Some(1), "Dev"))])],
        };

        let report = DashboardReport::new("proj", &dashboard, None);

        assert_eq!(report.pipelines[0].deployments["Dev"].build_name, "run-1");
    }
}
