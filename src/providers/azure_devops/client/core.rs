use log::debug;
use reqwest::Client;
use std::sync::Arc;
use tokio::sync::Semaphore;
use url::Url;

use crate::auth::Token;
use crate::error::{DashboardError, Result};

pub(super) const API_VERSION: &str = "7.1";
pub const DEFAULT_MAX_CONCURRENT_REQUESTS: usize = 50;

/// Thin REST client for one Azure DevOps organization.
///
/// Requests are project scoped and carry `api-version=7.1`. A semaphore bounds
/// how many requests are in flight at once so a large dashboard refresh does
/// not flood the service. Requests are never retried.
pub struct AzureDevOpsClient {
    client: Client,
    organization_url: Url,
    token: Option<Token>,
    semaphore: Arc<Semaphore>,
}

impl AzureDevOpsClient {
    pub fn new(
        organization_url: &str,
        token: Option<Token>,
        max_concurrent_requests: usize,
    ) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("release-dashboard/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DashboardError::Config(format!("Failed to create HTTP client: {e}")))?;

        let organization_url = Url::parse(organization_url)
            .map_err(|e| DashboardError::Config(format!("Invalid organization URL: {e}")))?;

        if organization_url.cannot_be_a_base() {
            return Err(DashboardError::Config(format!(
                "Organization URL cannot be used as a base: {organization_url}"
            )));
        }

        Ok(Self {
            client,
            organization_url,
            token,
            semaphore: Arc::new(Semaphore::new(max_concurrent_requests.max(1))),
        })
    }

    pub fn auth_request(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(token) = &self.token {
            request.basic_auth("", Some(token.as_str()))
        } else {
            request
        }
    }

    /// Builds `{organization}/{project}/_apis/{segments...}?api-version=7.1`.
    ///
    /// Segments are percent-encoded individually, so project names with spaces
    /// are safe.
    pub(super) fn api_url(&self, project: &str, segments: &[&str]) -> Result<Url> {
        let mut url = self.organization_url.clone();
        url.path_segments_mut()
            .map_err(|()| DashboardError::Config("Organization URL has no path".to_string()))?
            .pop_if_empty()
            .push(project)
            .push("_apis")
            .extend(segments);
        url.query_pairs_mut().append_pair("api-version", API_VERSION);
        Ok(url)
    }

    /// Issues a GET and decodes the JSON body.
    ///
    /// Non-success statuses become [`DashboardError::Api`] carrying the
    /// response text.
    pub(super) async fn execute_get<T>(&self, url: Url) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|e| DashboardError::Config(format!("Request limiter closed: {e}")))?;

        debug!("GET {url}");

        let response = self
            .auth_request(self.client.get(url))
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(DashboardError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
