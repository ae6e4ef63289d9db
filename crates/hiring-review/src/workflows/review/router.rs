use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{ApplicationId, Decision, JobPosting, NewJobPosting, PostingId, PostingStatus};
use super::engine::{CascadeReport, PolicyViolation, TransitionOutcome, WorkflowEngine, WorkflowError};
use super::gateway::{GatewayError, ResourceGateway};
use super::status::{self, ApplicationRow, DisplayCategory};

/// Router exposing the review workflow over HTTP.
pub fn review_router<G>(engine: Arc<WorkflowEngine<G>>) -> Router
where
    G: ResourceGateway + 'static,
{
    Router::new()
        .route("/api/v1/categories", get(categories_handler::<G>))
        .route("/api/v1/postings", post(create_handler::<G>))
        .route(
            "/api/v1/postings/:posting_id",
            get(posting_handler::<G>).delete(delete_handler::<G>),
        )
        .route(
            "/api/v1/postings/:posting_id/status",
            patch(status_handler::<G>),
        )
        .route(
            "/api/v1/postings/:posting_id/applications/:application_id/decision",
            post(decision_handler::<G>),
        )
        .with_state(engine)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct FilterQuery {
    /// Comma separated display categories.
    #[serde(default)]
    pub(crate) status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatusRequest {
    pub(crate) status: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DecisionRequest {
    pub(crate) decision: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct PostingView {
    pub(crate) posting: JobPosting,
    pub(crate) status_label: &'static str,
    pub(crate) filter_options: &'static [DisplayCategory],
    pub(crate) filter: Vec<DisplayCategory>,
    pub(crate) applications: Vec<ApplicationRow>,
}

#[derive(Debug, Serialize)]
pub(crate) struct TransitionView {
    pub(crate) changed: bool,
    pub(crate) posting: JobPosting,
    pub(crate) status_label: &'static str,
    pub(crate) applications: Vec<ApplicationRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) cascade: Option<CascadeReport>,
}

fn parse_filter(query: &FilterQuery) -> Result<Vec<DisplayCategory>, String> {
    let Some(raw) = query.status.as_deref() else {
        return Ok(Vec::new());
    };
    raw.split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::parse::<DisplayCategory>)
        .collect()
}

pub(crate) fn error_response(error: WorkflowError) -> Response {
    let status = match &error {
        WorkflowError::Policy(
            PolicyViolation::UnknownPosting(_) | PolicyViolation::UnknownApplication(_),
        ) => StatusCode::NOT_FOUND,
        WorkflowError::Policy(_) => StatusCode::CONFLICT,
        WorkflowError::Draft(_) | WorkflowError::Status(_) => StatusCode::UNPROCESSABLE_ENTITY,
        WorkflowError::Gateway {
            source: GatewayError::NotFound,
            ..
        } => StatusCode::NOT_FOUND,
        WorkflowError::Gateway { .. } => StatusCode::BAD_GATEWAY,
    };

    let payload = json!({ "error": error.to_string() });
    (status, Json(payload)).into_response()
}

pub(crate) async fn categories_handler<G>(State(engine): State<Arc<WorkflowEngine<G>>>) -> Response
where
    G: ResourceGateway + 'static,
{
    match engine.job_categories().await {
        Ok(categories) => (StatusCode::OK, Json(categories)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn create_handler<G>(
    State(engine): State<Arc<WorkflowEngine<G>>>,
    Json(draft): Json<NewJobPosting>,
) -> Response
where
    G: ResourceGateway + 'static,
{
    match engine.create_posting(draft).await {
        Ok(posting) => (StatusCode::CREATED, Json(posting)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn posting_handler<G>(
    State(engine): State<Arc<WorkflowEngine<G>>>,
    Path(posting_id): Path<u64>,
    Query(query): Query<FilterQuery>,
) -> Response
where
    G: ResourceGateway + 'static,
{
    let requested = match parse_filter(&query) {
        Ok(requested) => requested,
        Err(message) => {
            let payload = json!({ "error": message });
            return (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response();
        }
    };

    let detail = match engine.load_posting(PostingId(posting_id)).await {
        Ok(detail) => detail,
        Err(error) => return error_response(error),
    };

    let filter = status::sanitize_filter(detail.posting.status, &requested);
    let applications = status::application_rows(&detail.posting, &detail.applications, &filter);
    let view = PostingView {
        status_label: detail.posting.status.label(),
        filter_options: status::filter_options(detail.posting.status),
        filter,
        applications,
        posting: detail.posting,
    };
    (StatusCode::OK, Json(view)).into_response()
}

pub(crate) async fn status_handler<G>(
    State(engine): State<Arc<WorkflowEngine<G>>>,
    Path(posting_id): Path<u64>,
    Json(request): Json<StatusRequest>,
) -> Response
where
    G: ResourceGateway + 'static,
{
    let target = match request.status.parse::<PostingStatus>() {
        Ok(target) => target,
        Err(error) => return error_response(error.into()),
    };

    let detail = match engine.load_posting(PostingId(posting_id)).await {
        Ok(detail) => detail,
        Err(error) => return error_response(error),
    };

    let outcome = match engine
        .transition_posting(Some(&detail.posting), &detail.applications, target)
        .await
    {
        Ok(outcome) => outcome,
        Err(error) => return error_response(error),
    };

    let (code, view) = match outcome {
        TransitionOutcome::Unchanged => (
            StatusCode::OK,
            TransitionView {
                changed: false,
                status_label: detail.posting.status.label(),
                applications: status::application_rows(&detail.posting, &detail.applications, &[]),
                posting: detail.posting,
                cascade: None,
            },
        ),
        TransitionOutcome::Applied(transition) => {
            let code = if transition.cascade.is_complete() {
                StatusCode::OK
            } else {
                StatusCode::MULTI_STATUS
            };
            (
                code,
                TransitionView {
                    changed: true,
                    status_label: transition.posting.status.label(),
                    applications: status::application_rows(
                        &transition.posting,
                        &transition.applications,
                        &[],
                    ),
                    posting: transition.posting,
                    cascade: Some(transition.cascade),
                },
            )
        }
    };
    (code, Json(view)).into_response()
}

pub(crate) async fn delete_handler<G>(
    State(engine): State<Arc<WorkflowEngine<G>>>,
    Path(posting_id): Path<u64>,
) -> Response
where
    G: ResourceGateway + 'static,
{
    let detail = match engine.load_posting(PostingId(posting_id)).await {
        Ok(detail) => detail,
        Err(error) => return error_response(error),
    };

    let postings = [detail.posting];
    match engine.remove_posting(&postings, None, PostingId(posting_id)).await {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn decision_handler<G>(
    State(engine): State<Arc<WorkflowEngine<G>>>,
    Path((posting_id, application_id)): Path<(u64, u64)>,
    Json(request): Json<DecisionRequest>,
) -> Response
where
    G: ResourceGateway + 'static,
{
    let decision = match request.decision.parse::<Decision>() {
        Ok(decision) => decision,
        Err(error) => return error_response(error.into()),
    };

    let detail = match engine.load_posting(PostingId(posting_id)).await {
        Ok(detail) => detail,
        Err(error) => return error_response(error),
    };

    let application_id = ApplicationId(application_id);
    let Some(application) = detail
        .applications
        .iter()
        .find(|application| application.id == application_id)
    else {
        return error_response(PolicyViolation::UnknownApplication(application_id).into());
    };

    match engine
        .decide_application(&detail.posting, application, decision)
        .await
    {
        Ok(updated) => {
            let row = ApplicationRow {
                display: status::derive(detail.posting.status, updated.status),
                decision_enabled: status::decision_enabled(detail.posting.status),
                application: updated,
            };
            (StatusCode::OK, Json(row)).into_response()
        }
        Err(error) => error_response(error),
    }
}
