use super::core::AzureDevOpsClient;
use crate::error::Result;
use crate::providers::azure_devops::types::{Build, Timeline};

impl AzureDevOpsClient {
    pub async fn get_build(&self, project: &str, build_id: u64) -> Result<Build> {
        let url = self.api_url(project, &["build", "builds", &build_id.to_string()])?;
        self.execute_get(url).await
    }

    pub async fn get_build_timeline(&self, project: &str, build_id: u64) -> Result<Timeline> {
        let url = self.api_url(
            project,
            &["build", "builds", &build_id.to_string(), "timeline"],
        )?;
        self.execute_get(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DashboardError;

    #[tokio::test]
    async fn test_get_build() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/org/proj/_apis/build/builds/17")
            .match_query(mockito::Matcher::UrlEncoded(
                "api-version".into(),
                "7.1".into(),
            ))
            .with_header("content-type", "application/json")
            .with_body(r#"{"id": 17, "buildNumber": "20240612.3", "status": "completed"}"#)
            .create_async()
            .await;

        let client = AzureDevOpsClient::new(&format!("{}/org", server.url()), None, 4).unwrap();

        let build = client.get_build("proj", 17).await.unwrap();

        mock.assert_async().await;
        assert_eq!(build.id, 17);
        assert_eq!(build.build_number, "20240612.3");
    }

    #[tokio::test]
    async fn test_get_build_timeline() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/org/proj/_apis/build/builds/17/timeline")
            .match_query(mockito::Matcher::Any)
            .with_body(
                r#"{"id": "t", "records": [
                    {"id": "s1", "parentId": null, "type": "Stage", "name": "Dev"},
                    {"id": "c1", "parentId": "s1", "type": "Checkpoint", "name": "Checkpoint"}
                ]}"#,
            )
            .create_async()
            .await;

        let client = AzureDevOpsClient::new(&format!("{}/org", server.url()), None, 4).unwrap();

        let timeline = client.get_build_timeline("proj", 17).await.unwrap();

        assert_eq!(timeline.records.len(), 2);
        assert_eq!(timeline.records[1].parent_id.as_deref(), Some("s1"));
    }

    #[tokio::test]
    async fn test_get_build_malformed_body_is_json_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/org/proj/_apis/build/builds/5")
            .match_query(mockito::Matcher::Any)
            .with_body("<html>sign in</html>")
            .create_async()
            .await;

        let client = AzureDevOpsClient::new(&format!("{}/org", server.url()), None, 4).unwrap();

        let result = client.get_build("proj", 5).await;

        assert!(matches!(result, Err(DashboardError::Json(_))));
    }
}
