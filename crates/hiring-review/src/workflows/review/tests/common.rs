use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;

use crate::workflows::review::domain::{
    ApplicantProfile, ApplicationId, ApplicationPatch, ApplicationStatus, JobApplication,
    JobCategory, JobPosting, NewJobPosting, PostingDetail, PostingId, PostingPatch,
    PostingStatus, RemoteMode,
};
use crate::workflows::review::gateway::{GatewayError, ResourceGateway};
use crate::workflows::review::memory::InMemoryGateway;
use crate::workflows::review::WorkflowEngine;

pub(super) fn posting(id: u64, status: PostingStatus) -> JobPosting {
    JobPosting {
        id: PostingId(id),
        title: format!("Line Cook {id}"),
        category: "Cook".to_string(),
        description: "Prep and line work".to_string(),
        salary: 42_000.0,
        job_type: "Full time".to_string(),
        remote: RemoteMode::OnSite,
        status,
    }
}

pub(super) fn application(id: u64, posting_id: u64, status: ApplicationStatus) -> JobApplication {
    JobApplication {
        id: ApplicationId(id),
        posting_id: PostingId(posting_id),
        applicant: ApplicantProfile {
            first_name: "Dana".to_string(),
            last_name: format!("Applicant{id}"),
            email: format!("applicant{id}@example.com"),
            mobile: Some("(515)555-0100".to_string()),
            phone: None,
        },
        education: "Culinary certificate".to_string(),
        experience: "Three years line cook".to_string(),
        certificate: "Food handler".to_string(),
        status,
    }
}

pub(super) fn categories() -> Vec<JobCategory> {
    vec![
        JobCategory {
            id: 1,
            category: "Cleaner".to_string(),
        },
        JobCategory {
            id: 2,
            category: "Cook".to_string(),
        },
    ]
}

/// Gateway call as observed by the scripted double.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Call {
    FetchPosting(PostingId),
    UpdatePosting(PostingId, Option<PostingStatus>),
    DeletePosting(PostingId),
    UpdateApplication(ApplicationId, Option<ApplicationStatus>),
    CreatePosting(String),
    ListCategories,
}

impl Call {
    pub(super) fn is_mutation(&self) -> bool {
        !matches!(self, Call::FetchPosting(_) | Call::ListCategories)
    }
}

/// In-memory gateway that records every call and fails calls for chosen entities.
pub(super) struct ScriptedGateway {
    inner: InMemoryGateway,
    calls: Mutex<Vec<Call>>,
    failing_postings: Mutex<HashSet<PostingId>>,
    failing_applications: Mutex<HashSet<ApplicationId>>,
}

impl ScriptedGateway {
    pub(super) fn new(postings: Vec<JobPosting>, applications: Vec<JobApplication>) -> Self {
        Self {
            inner: InMemoryGateway::new(postings, applications, categories()),
            calls: Mutex::new(Vec::new()),
            failing_postings: Mutex::new(HashSet::new()),
            failing_applications: Mutex::new(HashSet::new()),
        }
    }

    pub(super) fn fail_posting(&self, id: u64) {
        self.failing_postings
            .lock()
            .expect("failure mutex poisoned")
            .insert(PostingId(id));
    }

    pub(super) fn fail_application(&self, id: u64) {
        self.failing_applications
            .lock()
            .expect("failure mutex poisoned")
            .insert(ApplicationId(id));
    }

    pub(super) fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("call mutex poisoned").clone()
    }

    pub(super) fn mutations(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(Call::is_mutation)
            .collect()
    }

    pub(super) fn clear_calls(&self) {
        self.calls.lock().expect("call mutex poisoned").clear();
    }

    pub(super) fn stored_application(&self, id: u64) -> JobApplication {
        self.inner
            .application(ApplicationId(id))
            .expect("store readable")
            .expect("application stored")
    }

    fn record(&self, call: Call) {
        self.calls.lock().expect("call mutex poisoned").push(call);
    }

    fn posting_fails(&self, id: PostingId) -> bool {
        self.failing_postings
            .lock()
            .expect("failure mutex poisoned")
            .contains(&id)
    }

    fn application_fails(&self, id: ApplicationId) -> bool {
        self.failing_applications
            .lock()
            .expect("failure mutex poisoned")
            .contains(&id)
    }
}

fn offline() -> GatewayError {
    GatewayError::Rejected {
        status: 503,
        message: "database offline".to_string(),
    }
}

#[async_trait]
impl ResourceGateway for ScriptedGateway {
    async fn fetch_posting(&self, id: PostingId) -> Result<PostingDetail, GatewayError> {
        self.record(Call::FetchPosting(id));
        self.inner.fetch_posting(id).await
    }

    async fn update_posting(
        &self,
        id: PostingId,
        patch: PostingPatch,
    ) -> Result<JobPosting, GatewayError> {
        self.record(Call::UpdatePosting(id, patch.status));
        if self.posting_fails(id) {
            return Err(offline());
        }
        self.inner.update_posting(id, patch).await
    }

    async fn delete_posting(&self, id: PostingId) -> Result<(), GatewayError> {
        self.record(Call::DeletePosting(id));
        if self.posting_fails(id) {
            return Err(offline());
        }
        self.inner.delete_posting(id).await
    }

    async fn update_application(
        &self,
        id: ApplicationId,
        patch: ApplicationPatch,
    ) -> Result<JobApplication, GatewayError> {
        self.record(Call::UpdateApplication(id, patch.status));
        if self.application_fails(id) {
            return Err(GatewayError::Transport("connection reset".to_string()));
        }
        self.inner.update_application(id, patch).await
    }

    async fn create_posting(&self, draft: NewJobPosting) -> Result<JobPosting, GatewayError> {
        self.record(Call::CreatePosting(draft.title.clone()));
        self.inner.create_posting(draft).await
    }

    async fn list_job_categories(&self) -> Result<Vec<JobCategory>, GatewayError> {
        self.record(Call::ListCategories);
        self.inner.list_job_categories().await
    }
}

pub(super) fn scripted(
    postings: Vec<JobPosting>,
    applications: Vec<JobApplication>,
) -> (WorkflowEngine<ScriptedGateway>, Arc<ScriptedGateway>) {
    let gateway = Arc::new(ScriptedGateway::new(postings, applications));
    (WorkflowEngine::new(gateway.clone()), gateway)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
