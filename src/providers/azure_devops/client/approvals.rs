use super::core::AzureDevOpsClient;
use crate::error::Result;
use crate::providers::azure_devops::types::{
    Approval, ApprovalExpand, ApprovalStatus, ListResponse,
};

impl AzureDevOpsClient {
    /// Lists approvals of a project, optionally filtered by state.
    ///
    /// `GET {project}/_apis/pipelines/approvals?state=&$expand=&$top=`
    pub async fn get_approvals(
        &self,
        project: &str,
        state: Option<ApprovalStatus>,
        expand: Option<ApprovalExpand>,
        top: Option<usize>,
    ) -> Result<Vec<Approval>> {
        let mut url = self.api_url(project, &["pipelines", "approvals"])?;

        {
            let mut query = url.query_pairs_mut();
            if let Some(expand) = expand {
                query.append_pair("$expand", expand.as_str());
            }
            if let Some(top) = top {
                query.append_pair("$top", &top.to_string());
            }
            if let Some(state) = state {
                query.append_pair("state", state.as_str());
            }
        }

        let response: ListResponse<Approval> = self.execute_get(url).await?;
        Ok(response.value)
    }
}
