use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use super::domain::{
    ApplicationId, ApplicationPatch, JobApplication, JobCategory, JobPosting, NewJobPosting,
    PostingDetail, PostingId, PostingPatch,
};
use super::gateway::{GatewayError, ResourceGateway};

/// Gateway backed by process memory, used by the demo and the standalone server mode.
pub struct InMemoryGateway {
    store: Mutex<Store>,
}

struct Store {
    postings: BTreeMap<PostingId, JobPosting>,
    applications: BTreeMap<ApplicationId, JobApplication>,
    categories: Vec<JobCategory>,
    next_posting_id: u64,
}

impl Default for InMemoryGateway {
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new(), Vec::new())
    }
}

impl InMemoryGateway {
    pub fn new(
        postings: Vec<JobPosting>,
        applications: Vec<JobApplication>,
        categories: Vec<JobCategory>,
    ) -> Self {
        let next_posting_id = postings.iter().map(|posting| posting.id.0).max().unwrap_or(0) + 1;
        let store = Store {
            postings: postings.into_iter().map(|p| (p.id, p)).collect(),
            applications: applications.into_iter().map(|a| (a.id, a)).collect(),
            categories,
            next_posting_id,
        };
        Self {
            store: Mutex::new(store),
        }
    }

    /// Postings in id order.
    pub fn postings(&self) -> Result<Vec<JobPosting>, GatewayError> {
        Ok(self.lock()?.postings.values().cloned().collect())
    }

    pub fn application(&self, id: ApplicationId) -> Result<Option<JobApplication>, GatewayError> {
        Ok(self.lock()?.applications.get(&id).cloned())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Store>, GatewayError> {
        self.store
            .lock()
            .map_err(|_| GatewayError::Transport("in-memory store poisoned".to_string()))
    }
}

#[async_trait]
impl ResourceGateway for InMemoryGateway {
    async fn fetch_posting(&self, id: PostingId) -> Result<PostingDetail, GatewayError> {
        let store = self.lock()?;
        let posting = store.postings.get(&id).cloned().ok_or(GatewayError::NotFound)?;
        let applications = store
            .applications
            .values()
            .filter(|application| application.posting_id == id)
            .cloned()
            .collect();
        Ok(PostingDetail {
            posting,
            applications,
        })
    }

    async fn update_posting(
        &self,
        id: PostingId,
        patch: PostingPatch,
    ) -> Result<JobPosting, GatewayError> {
        let mut store = self.lock()?;
        let posting = store.postings.get_mut(&id).ok_or(GatewayError::NotFound)?;
        if let Some(status) = patch.status {
            posting.status = status;
        }
        Ok(posting.clone())
    }

    async fn delete_posting(&self, id: PostingId) -> Result<(), GatewayError> {
        let mut store = self.lock()?;
        store.postings.remove(&id).ok_or(GatewayError::NotFound)?;
        store
            .applications
            .retain(|_, application| application.posting_id != id);
        Ok(())
    }

    async fn update_application(
        &self,
        id: ApplicationId,
        patch: ApplicationPatch,
    ) -> Result<JobApplication, GatewayError> {
        let mut store = self.lock()?;
        let application = store.applications.get_mut(&id).ok_or(GatewayError::NotFound)?;
        if let Some(status) = patch.status {
            application.status = status;
        }
        Ok(application.clone())
    }

    async fn create_posting(&self, draft: NewJobPosting) -> Result<JobPosting, GatewayError> {
        let mut store = self.lock()?;
        let id = PostingId(store.next_posting_id);
        store.next_posting_id += 1;

        let posting = JobPosting {
            id,
            title: draft.title,
            category: draft.category,
            description: draft.description,
            salary: draft.salary,
            job_type: draft.job_type,
            remote: draft.remote,
            status: draft.status,
        };
        store.postings.insert(id, posting.clone());
        Ok(posting)
    }

    async fn list_job_categories(&self) -> Result<Vec<JobCategory>, GatewayError> {
        Ok(self.lock()?.categories.clone())
    }
}
