use async_trait::async_trait;

use super::domain::{
    ApplicationId, ApplicationPatch, JobApplication, JobCategory, JobPosting, NewJobPosting,
    PostingDetail, PostingId, PostingPatch,
};

/// Transport to the remote posting/application store. Implementations carry no business rules.
#[async_trait]
pub trait ResourceGateway: Send + Sync {
    async fn fetch_posting(&self, id: PostingId) -> Result<PostingDetail, GatewayError>;

    async fn update_posting(
        &self,
        id: PostingId,
        patch: PostingPatch,
    ) -> Result<JobPosting, GatewayError>;

    async fn delete_posting(&self, id: PostingId) -> Result<(), GatewayError>;

    async fn update_application(
        &self,
        id: ApplicationId,
        patch: ApplicationPatch,
    ) -> Result<JobApplication, GatewayError>;

    async fn create_posting(&self, draft: NewJobPosting) -> Result<JobPosting, GatewayError>;

    async fn list_job_categories(&self) -> Result<Vec<JobCategory>, GatewayError>;
}

/// Failure reported by a gateway call. The workflow treats every variant as a failed call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("server rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("resource not found")]
    NotFound,
}

impl GatewayError {
    /// Message suitable for showing to the reviewer.
    pub fn message(&self) -> String {
        match self {
            GatewayError::Rejected { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}
