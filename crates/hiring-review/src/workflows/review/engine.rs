use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use super::domain::{
    ApplicationId, ApplicationPatch, ApplicationStatus, Decision, DraftError, JobApplication,
    JobCategory, JobPosting, NewJobPosting, PostingDetail, PostingId, PostingPatch,
    PostingStatus, StatusParseError,
};
use super::gateway::{GatewayError, ResourceGateway};
use super::selection::repair_after_removal;

/// Stateless rules for posting transitions, application decisions, and posting removal.
///
/// Every call receives the working collections it needs and hands back replacements; nothing
/// is retained between calls.
pub struct WorkflowEngine<G> {
    gateway: Arc<G>,
}

impl<G> Clone for WorkflowEngine<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
        }
    }
}

impl<G> WorkflowEngine<G>
where
    G: ResourceGateway + 'static,
{
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &Arc<G> {
        &self.gateway
    }

    /// Fetch a posting together with its applications.
    pub async fn load_posting(&self, id: PostingId) -> Result<PostingDetail, WorkflowError> {
        self.gateway
            .fetch_posting(id)
            .await
            .map_err(|source| WorkflowError::gateway("load", EntityRef::Posting(id), source))
    }

    /// Move `posting` to `target`, resetting its decided applications when it reopens.
    ///
    /// The posting update is issued first and nothing else is attempted if it fails. Reset
    /// calls run one at a time; a failed reset does not stop the remaining ones and is
    /// recorded in the returned [`CascadeReport`].
    pub async fn transition_posting(
        &self,
        posting: Option<&JobPosting>,
        applications: &[JobApplication],
        target: PostingStatus,
    ) -> Result<TransitionOutcome, WorkflowError> {
        let Some(posting) = posting else {
            return Ok(TransitionOutcome::Unchanged);
        };
        if posting.status == target {
            return Ok(TransitionOutcome::Unchanged);
        }

        let updated = self
            .gateway
            .update_posting(posting.id, PostingPatch::status(target))
            .await
            .map_err(|source| {
                WorkflowError::gateway("update", EntityRef::Posting(posting.id), source)
            })?;

        info!(
            posting = %posting.id,
            from = posting.status.key(),
            to = updated.status.key(),
            "posting transitioned"
        );

        let mut cascade = CascadeReport::new(posting.id);
        let mut applications = applications.to_vec();

        if target == PostingStatus::Open {
            for slot in applications.iter_mut() {
                if slot.posting_id != posting.id || slot.status == ApplicationStatus::New {
                    continue;
                }

                let reset = self
                    .gateway
                    .update_application(slot.id, ApplicationPatch::status(ApplicationStatus::New))
                    .await;

                match reset {
                    Ok(application) => {
                        cascade.reset.push(slot.id);
                        *slot = application;
                    }
                    Err(error) => {
                        warn!(
                            posting = %posting.id,
                            application = %slot.id,
                            %error,
                            "application reset failed"
                        );
                        cascade.failed.push(CascadeFailure::new(slot.id, error));
                    }
                }
            }

            if !cascade.is_complete() {
                warn!(
                    posting = %posting.id,
                    reset = cascade.reset.len(),
                    failed = cascade.failed.len(),
                    "posting reopened with applications left decided"
                );
            }
        }

        Ok(TransitionOutcome::Applied(Transition {
            posting: updated,
            applications,
            cascade,
        }))
    }

    /// Record a hire/decline decision. Refused without a network call unless the owning
    /// posting is in review.
    pub async fn decide_application(
        &self,
        posting: &JobPosting,
        application: &JobApplication,
        decision: Decision,
    ) -> Result<JobApplication, WorkflowError> {
        if application.posting_id != posting.id {
            return Err(PolicyViolation::ForeignApplication {
                application: application.id,
                posting: posting.id,
            }
            .into());
        }
        if posting.status != PostingStatus::Review {
            return Err(PolicyViolation::PostingNotInReview {
                application: application.id,
                posting: posting.id,
                status: posting.status,
            }
            .into());
        }

        let updated = self
            .gateway
            .update_application(
                application.id,
                ApplicationPatch::status(decision.resulting_status()),
            )
            .await
            .map_err(|source| {
                WorkflowError::gateway("update", EntityRef::Application(application.id), source)
            })?;

        info!(
            posting = %posting.id,
            application = %application.id,
            status = updated.status.key(),
            "application decided"
        );
        Ok(updated)
    }

    /// Delete `target` and return the remaining postings with a repaired selection.
    pub async fn remove_posting(
        &self,
        postings: &[JobPosting],
        selected: Option<PostingId>,
        target: PostingId,
    ) -> Result<Removal, WorkflowError> {
        if !postings.iter().any(|posting| posting.id == target) {
            return Err(PolicyViolation::UnknownPosting(target).into());
        }

        self.gateway
            .delete_posting(target)
            .await
            .map_err(|source| WorkflowError::gateway("delete", EntityRef::Posting(target), source))?;

        let selection = repair_after_removal(postings, selected, target);
        let postings = postings
            .iter()
            .filter(|posting| posting.id != target)
            .cloned()
            .collect();

        info!(posting = %target, selection = ?selection, "posting removed");
        Ok(Removal {
            postings,
            selection,
        })
    }

    /// Validate a draft locally and create the posting.
    pub async fn create_posting(&self, draft: NewJobPosting) -> Result<JobPosting, WorkflowError> {
        draft.validate()?;
        let created = self
            .gateway
            .create_posting(draft)
            .await
            .map_err(|source| WorkflowError::gateway("create", EntityRef::NewPosting, source))?;
        info!(posting = %created.id, title = %created.title, "posting created");
        Ok(created)
    }

    pub async fn job_categories(&self) -> Result<Vec<JobCategory>, WorkflowError> {
        self.gateway
            .list_job_categories()
            .await
            .map_err(|source| WorkflowError::gateway("list", EntityRef::Categories, source))
    }
}

/// Replace the entry with the same id, leaving order and every other entry untouched.
pub fn replace_application(
    applications: &[JobApplication],
    updated: JobApplication,
) -> Vec<JobApplication> {
    applications
        .iter()
        .map(|application| {
            if application.id == updated.id {
                updated.clone()
            } else {
                application.clone()
            }
        })
        .collect()
}

/// Replace the posting with the same id.
pub fn replace_posting(postings: &[JobPosting], updated: JobPosting) -> Vec<JobPosting> {
    postings
        .iter()
        .map(|posting| {
            if posting.id == updated.id {
                updated.clone()
            } else {
                posting.clone()
            }
        })
        .collect()
}

#[derive(Debug, Clone)]
pub enum TransitionOutcome {
    /// Posting absent or already at the target status. No calls were issued.
    Unchanged,
    Applied(Transition),
}

/// Collections to adopt after a transition, plus the cascade outcome.
#[derive(Debug, Clone, Serialize)]
pub struct Transition {
    pub posting: JobPosting,
    pub applications: Vec<JobApplication>,
    pub cascade: CascadeReport,
}

/// Per-application result of reopening a posting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CascadeReport {
    pub posting_id: Option<PostingId>,
    pub reset: Vec<ApplicationId>,
    pub failed: Vec<CascadeFailure>,
}

impl CascadeReport {
    fn new(posting_id: PostingId) -> Self {
        Self {
            posting_id: Some(posting_id),
            ..Self::default()
        }
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn attempted(&self) -> usize {
        self.reset.len() + self.failed.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CascadeFailure {
    pub application_id: ApplicationId,
    pub message: String,
    #[serde(skip)]
    pub error: GatewayError,
}

impl CascadeFailure {
    fn new(application_id: ApplicationId, error: GatewayError) -> Self {
        Self {
            application_id,
            message: error.message(),
            error,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Removal {
    pub postings: Vec<JobPosting>,
    pub selection: Option<PostingId>,
}

/// Entity a failed gateway call was about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityRef {
    Posting(PostingId),
    Application(ApplicationId),
    NewPosting,
    Categories,
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityRef::Posting(id) => write!(f, "{id}"),
            EntityRef::Application(id) => write!(f, "{id}"),
            EntityRef::NewPosting => write!(f, "new posting"),
            EntityRef::Categories => write!(f, "job categories"),
        }
    }
}

/// Precondition the engine refused to act on. No call reaches the gateway.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolicyViolation {
    #[error(
        "cannot decide {application}: {posting} is {current} (decisions require review)",
        current = .status.key()
    )]
    PostingNotInReview {
        application: ApplicationId,
        posting: PostingId,
        status: PostingStatus,
    },
    #[error("{application} does not belong to {posting}")]
    ForeignApplication {
        application: ApplicationId,
        posting: PostingId,
    },
    #[error("{0} is not in the working collection")]
    UnknownPosting(PostingId),
    #[error("{0} is not in the working collection")]
    UnknownApplication(ApplicationId),
    #[error("no posting is selected")]
    NoSelection,
    #[error("applications for {0} are not loaded; refresh before acting on it")]
    SelectionNotLoaded(PostingId),
}

/// Error raised by the workflow engine and the review surface.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Policy(#[from] PolicyViolation),
    #[error(transparent)]
    Draft(#[from] DraftError),
    #[error(transparent)]
    Status(#[from] StatusParseError),
    #[error("failed to {action} {entity}: {source}")]
    Gateway {
        action: &'static str,
        entity: EntityRef,
        #[source]
        source: GatewayError,
    },
}

impl WorkflowError {
    fn gateway(action: &'static str, entity: EntityRef, source: GatewayError) -> Self {
        Self::Gateway {
            action,
            entity,
            source,
        }
    }
}
