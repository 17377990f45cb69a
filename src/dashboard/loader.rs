use futures::future::try_join_all;
use indexmap::IndexMap;
use log::info;

use super::types::{Dashboard, DeploymentInstance, PipelineInstance};
use crate::error::{DashboardError, Result};
use crate::providers::azure_devops::{
    AzureDevOpsClient, DeploymentRecord, Environment, Pipeline, ReferenceLinks,
};

/// Loads the latest deployment of every pipeline into every environment.
///
/// Pipelines and environments are fetched concurrently, then the deployment
/// records of all environments. A 404 on the project routes is reported as
/// [`DashboardError::ProjectNotFound`].
pub async fn load_dashboard(client: &AzureDevOpsClient, project: &str) -> Result<Dashboard> {
    info!("Loading environments and pipelines for project: {project}");

    let (pipelines, environments) = tokio::try_join!(
        client.list_pipelines(project),
        client.get_environments(project),
    )
    .map_err(|e| project_not_found(e, project))?;

    let deployments = try_join_all(environments.iter().map(|environment| async move {
        client
            .get_environment_deployment_records(project, environment.id)
            .await
            .map(|records| (environment, records))
    }))
    .await?;

    let dashboard = build_dashboard(&pipelines, &deployments);

    info!(
        "Loaded {} pipelines across {} environments",
        dashboard.pipelines.len(),
        dashboard.environments.len()
    );

    Ok(dashboard)
}

fn project_not_found(error: DashboardError, project: &str) -> DashboardError {
    match error {
        DashboardError::Api { status: 404, .. } => {
            DashboardError::ProjectNotFound(project.to_string())
        }
        other => other,
    }
}

/// Folds deployment records into dashboard rows.
///
/// Records are newest first, so the first record per pipeline definition in
/// an environment is the one shown. Rows keep the order in which pipelines are
/// first seen; columns keep environment order.
pub(super) fn build_dashboard(
    pipelines: &[Pipeline],
    deployments: &[(&Environment, Vec<DeploymentRecord>)],
) -> Dashboard {
    let mut rows: IndexMap<u64, PipelineInstance> = IndexMap::new();

    for (environment, records) in deployments {
        for record in records {
            let definition = &record.definition;
            let pipeline = pipelines.iter().find(|p| p.id == definition.id);

            let row = rows
                .entry(definition.id)
                .or_insert_with(|| PipelineInstance {
                    key: definition.id.to_string(),
                    name: definition.name.clone(),
                    uri: pipeline
                        .and_then(|p| p.links.as_ref())
                        .or(definition.links.as_ref())
                        .map(|links| ReferenceLinks::web_href(Some(links)))
                        .unwrap_or_default(),
                    environments: IndexMap::new(),
                });

            if row.environments.contains_key(&environment.name) {
                continue;
            }

            row.environments.insert(
                environment.name.clone(),
                DeploymentInstance {
                    value: record.owner.name.clone(),
                    build_id: Some(record.owner.id),
                    uri: ReferenceLinks::web_href(record.owner.links.as_ref()),
                    result: record.result,
                    finish_time: record.finish_time,
                    environment_id: record.environment_id,
                    stage_name: record.stage_name.clone(),
                    folder: pipeline.and_then(|p| p.folder.clone()),
                    owner_id: Some(record.owner.id),
                },
            );
        }
    }

    Dashboard {
        environments: deployments
            .iter()
            .map(|(environment, _)| environment.name.clone())
            .collect(),
        pipelines: rows.into_values().collect(),
    }
}
