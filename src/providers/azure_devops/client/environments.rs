use super::core::AzureDevOpsClient;
use crate::error::Result;
use crate::providers::azure_devops::types::{
    DeploymentRecord, Environment, ListResponse, Pipeline,
};

impl AzureDevOpsClient {
    pub async fn list_pipelines(&self, project: &str) -> Result<Vec<Pipeline>> {
        let url = self.api_url(project, &["pipelines"])?;
        let response: ListResponse<Pipeline> = self.execute_get(url).await?;
        Ok(response.value)
    }

    pub async fn get_environments(&self, project: &str) -> Result<Vec<Environment>> {
        let url = self.api_url(project, &["distributedtask", "environments"])?;
        let response: ListResponse<Environment> = self.execute_get(url).await?;
        Ok(response.value)
    }

    /// Deployment execution records of an environment, newest first.
    pub async fn get_environment_deployment_records(
        &self,
        project: &str,
        environment_id: u64,
    ) -> Result<Vec<DeploymentRecord>> {
        let url = self.api_url(
            project,
            &[
                "distributedtask",
                "environments",
                &environment_id.to_string(),
                "environmentdeploymentrecords",
            ],
        )?;
        let response: ListResponse<DeploymentRecord> = self.execute_get(url).await?;
        Ok(response.value)
    }
}
