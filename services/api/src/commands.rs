use crate::cli::BackendArgs;
use crate::infra::{http_gateway, load_config};
use clap::Subcommand;
use hiring_review::error::AppError;
use hiring_review::telemetry;
use hiring_review::workflows::review::status::{self, ApplicationRow};
use hiring_review::workflows::review::{
    ApplicationId, CascadeReport, Decision, DisplayCategory, HttpGateway, JobPosting,
    PolicyViolation, PostingId, PostingStatus, TransitionOutcome, WorkflowEngine, WorkflowError,
};
use std::sync::Arc;

#[derive(Subcommand, Debug)]
pub(crate) enum PostingCommand {
    /// Show a posting and its applications with derived status
    Show {
        id: u64,
        /// Only list these categories (not-reviewed, hired, declined)
        #[arg(long, value_delimiter = ',')]
        status: Vec<DisplayCategory>,
    },
    /// Move a posting to open, review, or close
    Transition {
        id: u64,
        #[arg(long)]
        to: PostingStatus,
    },
    /// Delete a posting
    Remove { id: u64 },
}

#[derive(Subcommand, Debug)]
pub(crate) enum ApplicationCommand {
    /// Hire or decline an application on a posting under review
    Decide {
        #[arg(long)]
        posting: u64,
        id: u64,
        #[arg(long)]
        decision: Decision,
    },
}

fn backend_engine(backend: &BackendArgs) -> Result<WorkflowEngine<HttpGateway>, AppError> {
    let config = load_config(backend)?;
    telemetry::init(&config.telemetry)?;
    Ok(WorkflowEngine::new(Arc::new(http_gateway(&config)?)))
}

pub(crate) async fn run_posting_command(
    backend: BackendArgs,
    command: PostingCommand,
) -> Result<(), AppError> {
    let engine = backend_engine(&backend)?;

    match command {
        PostingCommand::Show { id, status: wanted } => {
            let detail = engine.load_posting(PostingId(id)).await?;
            let filter = status::sanitize_filter(detail.posting.status, &wanted);
            let rows = status::application_rows(&detail.posting, &detail.applications, &filter);
            render_posting(&detail.posting, false);
            render_rows(&rows);
        }
        PostingCommand::Transition { id, to } => {
            let detail = engine.load_posting(PostingId(id)).await?;
            let outcome = engine
                .transition_posting(Some(&detail.posting), &detail.applications, to)
                .await?;
            match outcome {
                TransitionOutcome::Unchanged => {
                    println!("{} already {}", detail.posting.id, to.label());
                }
                TransitionOutcome::Applied(transition) => {
                    render_posting(&transition.posting, false);
                    render_cascade(&transition.cascade);
                }
            }
        }
        PostingCommand::Remove { id } => {
            let detail = engine.load_posting(PostingId(id)).await?;
            engine
                .remove_posting(&[detail.posting], None, PostingId(id))
                .await?;
            println!("Removed {}", PostingId(id));
        }
    }

    Ok(())
}

pub(crate) async fn run_application_command(
    backend: BackendArgs,
    command: ApplicationCommand,
) -> Result<(), AppError> {
    let engine = backend_engine(&backend)?;

    match command {
        ApplicationCommand::Decide {
            posting,
            id,
            decision,
        } => {
            let detail = engine.load_posting(PostingId(posting)).await?;
            let application = detail
                .applications
                .iter()
                .find(|application| application.id == ApplicationId(id))
                .ok_or(PolicyViolation::UnknownApplication(ApplicationId(id)))
                .map_err(WorkflowError::from)?;
            let updated = engine
                .decide_application(&detail.posting, application, decision)
                .await?;
            let display = status::derive(detail.posting.status, updated.status);
            println!(
                "{} ({}) -> {}",
                updated.applicant.display_name(),
                updated.id,
                display.label
            );
        }
    }

    Ok(())
}

pub(crate) fn render_posting(posting: &JobPosting, selected: bool) {
    let marker = if selected { '>' } else { ' ' };
    println!(
        "{marker} [{}] {} | {} | {:?} | {}",
        posting.id.0,
        posting.title,
        posting.category,
        posting.remote,
        posting.status.label()
    );
}

pub(crate) fn render_rows(rows: &[ApplicationRow]) {
    if rows.is_empty() {
        println!("    (no applications)");
        return;
    }
    for row in rows {
        let action = if row.decision_enabled {
            " [hire/decline]"
        } else {
            ""
        };
        println!(
            "    - {} <{}>: {}{}",
            row.application.applicant.display_name(),
            row.application.applicant.email,
            row.display.label,
            action
        );
    }
}

pub(crate) fn render_cascade(report: &CascadeReport) {
    if report.attempted() == 0 {
        return;
    }
    println!(
        "    reset {} of {} applications to new",
        report.reset.len(),
        report.attempted()
    );
    for failure in &report.failed {
        eprintln!(
            "    ! {} was not reset: {}",
            failure.application_id, failure.message
        );
    }
}
