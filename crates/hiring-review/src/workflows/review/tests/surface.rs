use super::common::*;
use crate::workflows::review::domain::{
    ApplicationId, ApplicationStatus, Decision, NewJobPosting, PostingId, PostingStatus,
};
use crate::workflows::review::engine::{EntityRef, PolicyViolation, WorkflowError};
use crate::workflows::review::gateway::GatewayError;
use crate::workflows::review::status::DisplayCategory;
use crate::workflows::review::surface::{Removed, ReviewSurface};

async fn surface_with(
    postings: Vec<crate::workflows::review::JobPosting>,
    applications: Vec<crate::workflows::review::JobApplication>,
) -> (
    ReviewSurface<ScriptedGateway>,
    std::sync::Arc<ScriptedGateway>,
) {
    let (engine, gateway) = scripted(postings.clone(), applications);
    let mut surface = ReviewSurface::new(engine, postings);
    surface.refresh().await.expect("initial load");
    gateway.clear_calls();
    (surface, gateway)
}

#[tokio::test]
async fn first_posting_is_selected_and_loaded() {
    let (surface, _gateway) = surface_with(
        vec![posting(1, PostingStatus::Review), posting(2, PostingStatus::Open)],
        vec![
            application(1, 1, ApplicationStatus::New),
            application(2, 2, ApplicationStatus::New),
        ],
    )
    .await;

    assert_eq!(surface.selected_id(), Some(PostingId(1)));
    assert_eq!(surface.applications().len(), 1);
    let cards = surface.cards();
    assert!(cards[0].selected);
    assert_eq!(cards[0].status_label, "In review");
    assert_eq!(cards[1].status_label, "Open");
}

#[tokio::test]
async fn empty_session_has_no_selection() {
    let (surface, gateway) = surface_with(Vec::new(), Vec::new()).await;
    assert_eq!(surface.selected_id(), None);
    assert!(surface.rows().is_empty());
    assert!(surface.filter_options().is_empty());
    assert!(gateway.calls().is_empty());
}

#[tokio::test]
async fn reselecting_current_posting_issues_no_call() {
    let (mut surface, gateway) = surface_with(
        vec![posting(1, PostingStatus::Review), posting(2, PostingStatus::Close)],
        Vec::new(),
    )
    .await;

    surface
        .select_posting(PostingId(1))
        .await
        .expect("no-op select");
    assert!(gateway.calls().is_empty());

    surface
        .select_posting(PostingId(2))
        .await
        .expect("select second");
    assert_eq!(gateway.calls(), vec![Call::FetchPosting(PostingId(2))]);
    assert_eq!(surface.selected_id(), Some(PostingId(2)));
}

#[tokio::test]
async fn selecting_unknown_posting_is_refused() {
    let (mut surface, gateway) =
        surface_with(vec![posting(1, PostingStatus::Review)], Vec::new()).await;

    let error = surface
        .select_posting(PostingId(8))
        .await
        .expect_err("unknown posting");
    assert_eq!(
        error,
        WorkflowError::Policy(PolicyViolation::UnknownPosting(PostingId(8)))
    );
    assert_eq!(surface.selected_id(), Some(PostingId(1)));
    assert!(gateway.calls().is_empty());
}

#[tokio::test]
async fn status_change_adopts_results_and_clears_filter() {
    let (mut surface, _gateway) = surface_with(
        vec![posting(1, PostingStatus::Review)],
        vec![
            application(1, 1, ApplicationStatus::Hired),
            application(2, 1, ApplicationStatus::New),
        ],
    )
    .await;

    surface.set_filter(&[DisplayCategory::Hired]);
    assert_eq!(surface.rows().len(), 1);

    let report = surface
        .change_status(PostingStatus::Open)
        .await
        .expect("transition succeeds")
        .expect("transition applied");
    assert_eq!(report.reset, vec![ApplicationId(1)]);

    assert_eq!(
        surface.selected().map(|posting| posting.status),
        Some(PostingStatus::Open)
    );
    assert!(surface.filter().is_empty());
    let labels: Vec<&str> = surface.rows().iter().map(|row| row.display.label).collect();
    assert_eq!(labels, vec!["Open", "Open"]);
    assert!(surface
        .applications()
        .iter()
        .all(|application| application.status == ApplicationStatus::New));
}

#[tokio::test]
async fn partial_cascade_is_returned_to_caller() {
    let (mut surface, gateway) = surface_with(
        vec![posting(1, PostingStatus::Close)],
        vec![
            application(1, 1, ApplicationStatus::Hired),
            application(2, 1, ApplicationStatus::Declined),
        ],
    )
    .await;
    gateway.fail_application(1);

    let report = surface
        .change_status(PostingStatus::Open)
        .await
        .expect("transition settles")
        .expect("transition applied");

    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].application_id, ApplicationId(1));
    assert!(report.failed[0].message.contains("connection reset"));
    assert_eq!(surface.applications()[0].status, ApplicationStatus::Hired);
    assert_eq!(surface.applications()[1].status, ApplicationStatus::New);
}

#[tokio::test]
async fn unchanged_status_reports_nothing() {
    let (mut surface, gateway) =
        surface_with(vec![posting(1, PostingStatus::Review)], Vec::new()).await;

    let report = surface
        .change_status(PostingStatus::Review)
        .await
        .expect("no-op");
    assert!(report.is_none());
    assert!(gateway.calls().is_empty());
}

#[tokio::test]
async fn decision_replaces_only_the_decided_application() {
    let (mut surface, _gateway) = surface_with(
        vec![posting(1, PostingStatus::Review)],
        vec![
            application(1, 1, ApplicationStatus::New),
            application(2, 1, ApplicationStatus::New),
        ],
    )
    .await;

    surface
        .decide(ApplicationId(1), Decision::Hire)
        .await
        .expect("decision recorded");

    let labels: Vec<&str> = surface.rows().iter().map(|row| row.display.label).collect();
    assert_eq!(labels, vec!["Hired", "Not Reviewed"]);
}

#[tokio::test]
async fn decision_on_closed_posting_leaves_state_alone() {
    let (mut surface, gateway) = surface_with(
        vec![posting(1, PostingStatus::Close)],
        vec![application(1, 1, ApplicationStatus::New)],
    )
    .await;

    let error = surface
        .decide(ApplicationId(1), Decision::Decline)
        .await
        .expect_err("policy violation");
    assert!(matches!(
        error,
        WorkflowError::Policy(PolicyViolation::PostingNotInReview { .. })
    ));
    assert_eq!(surface.applications()[0].status, ApplicationStatus::New);
    assert!(gateway.calls().is_empty());
}

#[tokio::test]
async fn decision_for_unknown_application_is_refused() {
    let (mut surface, gateway) =
        surface_with(vec![posting(1, PostingStatus::Review)], Vec::new()).await;

    let error = surface
        .decide(ApplicationId(42), Decision::Hire)
        .await
        .expect_err("unknown application");
    assert_eq!(
        error,
        WorkflowError::Policy(PolicyViolation::UnknownApplication(ApplicationId(42)))
    );
    assert!(gateway.calls().is_empty());
}

#[tokio::test]
async fn removing_selected_posting_moves_selection_and_reloads() {
    let (mut surface, gateway) = surface_with(
        vec![
            posting(1, PostingStatus::Review),
            posting(2, PostingStatus::Close),
        ],
        vec![
            application(1, 1, ApplicationStatus::New),
            application(2, 2, ApplicationStatus::Hired),
        ],
    )
    .await;

    let removed = surface
        .remove_posting(PostingId(1))
        .await
        .expect("removal succeeds");

    assert_eq!(removed.reload_error, None);
    assert!(surface.is_loaded());
    assert_eq!(surface.selected_id(), Some(PostingId(2)));
    assert_eq!(surface.postings().len(), 1);
    assert_eq!(surface.applications()[0].id, ApplicationId(2));
    assert_eq!(
        gateway.calls(),
        vec![
            Call::DeletePosting(PostingId(1)),
            Call::FetchPosting(PostingId(2))
        ]
    );

    surface
        .remove_posting(PostingId(2))
        .await
        .expect("removal succeeds");
    assert_eq!(surface.selected_id(), None);
    assert!(surface.applications().is_empty());
}

#[tokio::test]
async fn removing_other_posting_keeps_selection_and_applications() {
    let (mut surface, gateway) = surface_with(
        vec![
            posting(1, PostingStatus::Review),
            posting(2, PostingStatus::Close),
        ],
        vec![application(1, 1, ApplicationStatus::New)],
    )
    .await;

    surface
        .remove_posting(PostingId(2))
        .await
        .expect("removal succeeds");

    assert_eq!(surface.selected_id(), Some(PostingId(1)));
    assert_eq!(surface.applications().len(), 1);
    assert_eq!(gateway.calls(), vec![Call::DeletePosting(PostingId(2))]);
}

#[tokio::test]
async fn failed_removal_keeps_collection() {
    let (mut surface, gateway) =
        surface_with(vec![posting(1, PostingStatus::Open)], Vec::new()).await;
    gateway.fail_posting(1);

    surface
        .remove_posting(PostingId(1))
        .await
        .expect_err("delete fails");
    assert_eq!(surface.postings().len(), 1);
    assert_eq!(surface.selected_id(), Some(PostingId(1)));
}

#[tokio::test]
async fn filter_keeps_only_offered_categories() {
    let (mut surface, _gateway) = surface_with(
        vec![posting(1, PostingStatus::Close)],
        vec![
            application(1, 1, ApplicationStatus::New),
            application(2, 1, ApplicationStatus::Hired),
        ],
    )
    .await;

    let kept = surface
        .set_filter(&[DisplayCategory::NotReviewed, DisplayCategory::Declined])
        .to_vec();
    assert_eq!(kept, vec![DisplayCategory::Declined]);

    let rows = surface.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].application.id, ApplicationId(1));
}

#[tokio::test]
async fn created_posting_is_selected_when_list_was_empty() {
    let (mut surface, _gateway) = surface_with(Vec::new(), Vec::new()).await;

    let created = surface
        .create_posting(NewJobPosting {
            title: "Prep Cook".to_string(),
            salary: 19.0,
            ..NewJobPosting::default()
        })
        .await
        .expect("posting created");

    assert_eq!(surface.selected_id(), Some(created.id));
    assert_eq!(surface.cards().len(), 1);
    assert_eq!(surface.filter_options(), &[] as &[DisplayCategory]);
}

#[tokio::test]
async fn reopening_before_applications_load_is_refused() {
    let (engine, gateway) = scripted(
        vec![posting(1, PostingStatus::Close)],
        vec![application(1, 1, ApplicationStatus::Hired)],
    );
    let mut surface = ReviewSurface::new(engine, vec![posting(1, PostingStatus::Close)]);
    assert!(!surface.is_loaded());

    let error = surface
        .change_status(PostingStatus::Open)
        .await
        .expect_err("selection not loaded");
    assert_eq!(
        error,
        WorkflowError::Policy(PolicyViolation::SelectionNotLoaded(PostingId(1)))
    );
    assert!(gateway.calls().is_empty());
    assert_eq!(surface.selected().map(|p| p.status), Some(PostingStatus::Close));

    surface.refresh().await.expect("applications load");
    let report = surface
        .change_status(PostingStatus::Open)
        .await
        .expect("transition succeeds")
        .expect("transition applied");
    assert_eq!(report.reset, vec![ApplicationId(1)]);
    assert_eq!(gateway.stored_application(1).status, ApplicationStatus::New);
}

#[tokio::test]
async fn deciding_before_applications_load_is_refused() {
    let (engine, gateway) = scripted(
        vec![posting(1, PostingStatus::Review)],
        vec![application(1, 1, ApplicationStatus::New)],
    );
    let mut surface = ReviewSurface::new(engine, vec![posting(1, PostingStatus::Review)]);

    let error = surface
        .decide(ApplicationId(1), Decision::Hire)
        .await
        .expect_err("selection not loaded");
    assert_eq!(
        error,
        WorkflowError::Policy(PolicyViolation::SelectionNotLoaded(PostingId(1)))
    );
    assert!(gateway.calls().is_empty());
}

#[tokio::test]
async fn open_loads_the_default_selection() {
    let (engine, gateway) = scripted(
        vec![posting(1, PostingStatus::Close)],
        vec![
            application(1, 1, ApplicationStatus::Hired),
            application(2, 1, ApplicationStatus::Declined),
        ],
    );
    let mut surface = ReviewSurface::open(engine, vec![posting(1, PostingStatus::Close)])
        .await
        .expect("surface opens");
    assert!(surface.is_loaded());
    assert_eq!(surface.applications().len(), 2);

    let report = surface
        .change_status(PostingStatus::Open)
        .await
        .expect("transition succeeds")
        .expect("transition applied");
    assert_eq!(report.reset, vec![ApplicationId(1), ApplicationId(2)]);
    assert_eq!(gateway.stored_application(2).status, ApplicationStatus::New);
}

#[tokio::test]
async fn removal_stands_when_new_selection_fails_to_load() {
    // The backend no longer knows posting 2, so reloading it after the delete fails.
    let (engine, gateway) = scripted(
        vec![posting(1, PostingStatus::Review)],
        vec![application(1, 1, ApplicationStatus::New)],
    );
    let mut surface = ReviewSurface::open(
        engine,
        vec![posting(1, PostingStatus::Review), posting(2, PostingStatus::Close)],
    )
    .await
    .expect("surface opens");
    gateway.clear_calls();

    let removed = surface
        .remove_posting(PostingId(1))
        .await
        .expect("delete confirmed");

    assert_eq!(
        removed,
        Removed {
            posting: PostingId(1),
            selection: Some(PostingId(2)),
            reload_error: Some(WorkflowError::Gateway {
                action: "load",
                entity: EntityRef::Posting(PostingId(2)),
                source: GatewayError::NotFound,
            }),
        }
    );
    assert_eq!(surface.postings().len(), 1);
    assert!(surface.applications().is_empty());
    assert!(!surface.is_loaded());

    let error = surface
        .change_status(PostingStatus::Open)
        .await
        .expect_err("selection not loaded");
    assert_eq!(
        error,
        WorkflowError::Policy(PolicyViolation::SelectionNotLoaded(PostingId(2)))
    );
    assert_eq!(
        gateway.calls(),
        vec![Call::DeletePosting(PostingId(1)), Call::FetchPosting(PostingId(2))]
    );
}
