use serde::Serialize;
use tracing::{debug, warn};

use super::domain::{
    ApplicationId, Decision, JobApplication, JobPosting, NewJobPosting, PostingId, PostingStatus,
};
use super::engine::{
    replace_application, replace_posting, CascadeReport, PolicyViolation, TransitionOutcome,
    WorkflowEngine, WorkflowError,
};
use super::gateway::ResourceGateway;
use super::selection::default_selection;
use super::status::{self, ApplicationRow, DisplayCategory};

/// Working state for one employer session: postings, the selected posting, its applications,
/// and the active category filter.
///
/// Every operation settles before the next one starts. A failed call leaves the state as it was.
/// Status changes and decisions are refused until the selected posting's applications have
/// been loaded.
pub struct ReviewSurface<G> {
    engine: WorkflowEngine<G>,
    postings: Vec<JobPosting>,
    selected: Option<PostingId>,
    loaded: Option<PostingId>,
    applications: Vec<JobApplication>,
    filter: Vec<DisplayCategory>,
}

/// A confirmed removal. The delete stands even when the new selection failed to load.
#[derive(Debug, Clone, PartialEq)]
pub struct Removed {
    pub posting: PostingId,
    pub selection: Option<PostingId>,
    /// Set when the new selection could not be loaded; `refresh` retries it.
    pub reload_error: Option<WorkflowError>,
}

/// Summary line for a posting in the list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostingCard {
    pub id: PostingId,
    pub title: String,
    pub status: PostingStatus,
    pub status_label: &'static str,
    pub selected: bool,
}

impl<G> ReviewSurface<G>
where
    G: ResourceGateway + 'static,
{
    /// Build a surface with the default selection but nothing loaded yet. Call `refresh`
    /// before acting on the selection, or use `open`.
    pub fn new(engine: WorkflowEngine<G>, postings: Vec<JobPosting>) -> Self {
        let selected = default_selection(&postings, None);
        Self {
            engine,
            postings,
            selected,
            loaded: None,
            applications: Vec::new(),
            filter: Vec::new(),
        }
    }

    /// Build a surface and load the applications of the default selection.
    pub async fn open(
        engine: WorkflowEngine<G>,
        postings: Vec<JobPosting>,
    ) -> Result<Self, WorkflowError> {
        let mut surface = Self::new(engine, postings);
        surface.refresh().await?;
        Ok(surface)
    }

    pub fn postings(&self) -> &[JobPosting] {
        &self.postings
    }

    pub fn selected_id(&self) -> Option<PostingId> {
        self.selected
    }

    pub fn selected(&self) -> Option<&JobPosting> {
        let id = self.selected?;
        self.postings.iter().find(|posting| posting.id == id)
    }

    pub fn applications(&self) -> &[JobApplication] {
        &self.applications
    }

    pub fn filter(&self) -> &[DisplayCategory] {
        &self.filter
    }

    /// Whether the applications held belong to the selected posting.
    pub fn is_loaded(&self) -> bool {
        self.selected.is_some() && self.loaded == self.selected
    }

    fn ensure_loaded(&self) -> Result<(), PolicyViolation> {
        match self.selected {
            Some(id) if self.loaded != Some(id) => Err(PolicyViolation::SelectionNotLoaded(id)),
            _ => Ok(()),
        }
    }

    /// Load applications for the current selection.
    pub async fn refresh(&mut self) -> Result<(), WorkflowError> {
        let Some(id) = self.selected else {
            self.applications.clear();
            self.loaded = None;
            return Ok(());
        };

        let detail = self.engine.load_posting(id).await?;
        self.postings = replace_posting(&self.postings, detail.posting);
        self.applications = detail.applications;
        self.loaded = Some(id);
        self.sanitize_filter();
        Ok(())
    }

    /// Make `id` the selected posting and load its applications. Selecting the current,
    /// already loaded posting again does nothing.
    pub async fn select_posting(&mut self, id: PostingId) -> Result<(), WorkflowError> {
        if self.selected == Some(id) && self.loaded == Some(id) {
            return Ok(());
        }
        if !self.postings.iter().any(|posting| posting.id == id) {
            return Err(PolicyViolation::UnknownPosting(id).into());
        }

        let detail = self.engine.load_posting(id).await?;
        self.postings = replace_posting(&self.postings, detail.posting);
        self.selected = Some(id);
        self.loaded = Some(id);
        self.applications = detail.applications;
        self.sanitize_filter();
        debug!(posting = %id, applications = self.applications.len(), "posting selected");
        Ok(())
    }

    /// Transition the selected posting. Returns the cascade report when a transition happened,
    /// which may list reset failures that still need attention.
    pub async fn change_status(
        &mut self,
        target: PostingStatus,
    ) -> Result<Option<CascadeReport>, WorkflowError> {
        self.ensure_loaded()?;
        let outcome = self
            .engine
            .transition_posting(self.selected(), &self.applications, target)
            .await?;

        match outcome {
            TransitionOutcome::Unchanged => Ok(None),
            TransitionOutcome::Applied(transition) => {
                self.postings = replace_posting(&self.postings, transition.posting);
                self.applications = transition.applications;
                self.filter.clear();
                Ok(Some(transition.cascade))
            }
        }
    }

    /// Hire or decline one of the selected posting's applications.
    pub async fn decide(
        &mut self,
        application: ApplicationId,
        decision: Decision,
    ) -> Result<(), WorkflowError> {
        let posting = self.selected().ok_or(PolicyViolation::NoSelection)?;
        self.ensure_loaded()?;
        let current = self
            .applications
            .iter()
            .find(|candidate| candidate.id == application)
            .ok_or(PolicyViolation::UnknownApplication(application))?;

        let updated = self
            .engine
            .decide_application(posting, current, decision)
            .await?;
        self.applications = replace_application(&self.applications, updated);
        Ok(())
    }

    /// Delete a posting, repairing the selection and reloading applications when the
    /// selection moved. `Err` means nothing was deleted.
    pub async fn remove_posting(&mut self, id: PostingId) -> Result<Removed, WorkflowError> {
        let removal = self
            .engine
            .remove_posting(&self.postings, self.selected, id)
            .await?;

        let moved = removal.selection != self.selected;
        self.postings = removal.postings;
        self.selected = removal.selection;

        let mut reload_error = None;
        if moved {
            self.applications.clear();
            self.loaded = None;
            self.filter.clear();
            if let Err(error) = self.refresh().await {
                warn!(
                    posting = %id,
                    error = %error,
                    "posting removed but the new selection failed to load"
                );
                reload_error = Some(error);
            }
        }

        Ok(Removed {
            posting: id,
            selection: self.selected,
            reload_error,
        })
    }

    /// Create a posting and append it to the list.
    pub async fn create_posting(&mut self, draft: NewJobPosting) -> Result<JobPosting, WorkflowError> {
        let created = self.engine.create_posting(draft).await?;
        self.postings.push(created.clone());

        if self.selected.is_none() {
            // A new posting has no applications yet.
            self.selected = default_selection(&self.postings, None);
            self.loaded = self.selected;
            self.applications.clear();
        }
        Ok(created)
    }

    /// Replace the category filter, keeping only categories offered for the selected posting.
    pub fn set_filter(&mut self, categories: &[DisplayCategory]) -> &[DisplayCategory] {
        self.filter = match self.selected() {
            Some(posting) => status::sanitize_filter(posting.status, categories),
            None => Vec::new(),
        };
        &self.filter
    }

    pub fn filter_options(&self) -> &'static [DisplayCategory] {
        self.selected()
            .map(|posting| status::filter_options(posting.status))
            .unwrap_or(&[])
    }

    /// Applications of the selected posting that pass the filter, with derived status.
    pub fn rows(&self) -> Vec<ApplicationRow> {
        match self.selected() {
            Some(posting) => status::application_rows(posting, &self.applications, &self.filter),
            None => Vec::new(),
        }
    }

    pub fn cards(&self) -> Vec<PostingCard> {
        self.postings
            .iter()
            .map(|posting| PostingCard {
                id: posting.id,
                title: posting.title.clone(),
                status: posting.status,
                status_label: posting.status.label(),
                selected: self.selected == Some(posting.id),
            })
            .collect()
    }

    fn sanitize_filter(&mut self) {
        let current = std::mem::take(&mut self.filter);
        self.set_filter(&current);
    }
}
