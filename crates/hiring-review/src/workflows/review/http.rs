//! REST adapter for the posting/application backend.

use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::domain::{
    ApplicationId, ApplicationPatch, JobApplication, JobCategory, JobPosting, NewJobPosting,
    PostingDetail, PostingId, PostingPatch,
};
use super::gateway::{GatewayError, ResourceGateway};
use crate::config::BackendConfig;

pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
}

/// Error payload returned by the backend on failed requests.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl HttpGateway {
    pub fn new(config: &BackendConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(transport)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

fn transport(err: reqwest::Error) -> GatewayError {
    GatewayError::Transport(err.to_string())
}

async fn check(response: Response) -> Result<Response, GatewayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(GatewayError::NotFound);
    }

    let fallback = status
        .canonical_reason()
        .unwrap_or("request failed")
        .to_string();
    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.message,
        Err(_) => fallback,
    };
    Err(GatewayError::Rejected {
        status: status.as_u16(),
        message,
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, GatewayError> {
    check(response).await?.json::<T>().await.map_err(transport)
}

#[async_trait]
impl ResourceGateway for HttpGateway {
    async fn fetch_posting(&self, id: PostingId) -> Result<PostingDetail, GatewayError> {
        let url = self.url(&format!("jobpostings/{}", id.0));
        let response = self.client.get(url).send().await.map_err(transport)?;
        decode(response).await
    }

    async fn update_posting(
        &self,
        id: PostingId,
        patch: PostingPatch,
    ) -> Result<JobPosting, GatewayError> {
        let url = self.url(&format!("jobpostings/{}", id.0));
        let response = self
            .client
            .patch(url)
            .json(&patch)
            .send()
            .await
            .map_err(transport)?;
        decode(response).await
    }

    async fn delete_posting(&self, id: PostingId) -> Result<(), GatewayError> {
        let url = self.url(&format!("jobpostings/{}", id.0));
        let response = self.client.delete(url).send().await.map_err(transport)?;
        check(response).await.map(|_| ())
    }

    async fn update_application(
        &self,
        id: ApplicationId,
        patch: ApplicationPatch,
    ) -> Result<JobApplication, GatewayError> {
        let url = self.url(&format!("jobapplications/{}", id.0));
        let response = self
            .client
            .patch(url)
            .json(&patch)
            .send()
            .await
            .map_err(transport)?;
        decode(response).await
    }

    async fn create_posting(&self, draft: NewJobPosting) -> Result<JobPosting, GatewayError> {
        let response = self
            .client
            .post(self.url("jobpostings"))
            .json(&draft)
            .send()
            .await
            .map_err(transport)?;
        decode(response).await
    }

    async fn list_job_categories(&self) -> Result<Vec<JobCategory>, GatewayError> {
        let response = self
            .client
            .get(self.url("jobcategories"))
            .send()
            .await
            .map_err(transport)?;
        decode(response).await
    }
}
