use crate::commands::{render_cascade, render_posting, render_rows};
use crate::infra::seeded_gateway;
use clap::Args;
use hiring_review::error::AppError;
use hiring_review::workflows::review::{
    ApplicationId, Decision, DisplayCategory, InMemoryGateway, NewJobPosting, PostingId,
    PostingStatus, RemoteMode, ReviewSurface, WorkflowEngine,
};
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Print the posting list as JSON after each step instead of text
    #[arg(long)]
    pub(crate) json: bool,
    /// Stop after the reopen step and keep every posting
    #[arg(long)]
    pub(crate) skip_removal: bool,
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let gateway = Arc::new(seeded_gateway());
    let postings = gateway.postings()?;
    let mut surface = ReviewSurface::open(WorkflowEngine::new(gateway), postings).await?;

    println!("Hiring review demo");
    render_step(&surface, "Loaded postings", args.json)?;

    surface.decide(ApplicationId(1), Decision::Hire).await?;
    surface.decide(ApplicationId(2), Decision::Decline).await?;
    render_step(&surface, "Hired Avery, declined Jordan", args.json)?;

    if let Some(report) = surface.change_status(PostingStatus::Close).await? {
        render_step(&surface, "Closed the Line Cook posting", args.json)?;
        render_cascade(&report);
    }

    let kept = surface.set_filter(&[DisplayCategory::Declined]).to_vec();
    println!("\nFilter: {}", category_keys(&kept));
    render_rows(&surface.rows());

    if let Some(report) = surface.change_status(PostingStatus::Open).await? {
        render_step(&surface, "Reopened the Line Cook posting", args.json)?;
        render_cascade(&report);
    }

    let created = surface
        .create_posting(NewJobPosting {
            title: "Sous Chef".to_string(),
            category: "Cook".to_string(),
            salary: 52_000.0,
            remote: RemoteMode::OnSite,
            ..NewJobPosting::default()
        })
        .await?;
    println!("\nCreated {} ({})", created.title, created.id);

    if args.skip_removal {
        return Ok(());
    }

    let removed = surface.remove_posting(PostingId(1)).await?;
    render_step(&surface, "Removed the Line Cook posting", args.json)?;
    if let Some(error) = removed.reload_error {
        eprintln!("    ! could not load the next posting: {error}");
    }

    Ok(())
}

fn render_step(
    surface: &ReviewSurface<InMemoryGateway>,
    heading: &str,
    json: bool,
) -> Result<(), AppError> {
    println!("\n{heading}");
    if json {
        let cards = serde_json::to_string_pretty(&surface.cards())
            .map_err(|error| AppError::Io(std::io::Error::other(error)))?;
        println!("{cards}");
        return Ok(());
    }

    for posting in surface.postings() {
        let selected = surface.selected_id() == Some(posting.id);
        render_posting(posting, selected);
        if selected {
            render_rows(&surface.rows());
        }
    }
    Ok(())
}

fn category_keys(categories: &[DisplayCategory]) -> String {
    categories
        .iter()
        .map(|category| category.key())
        .collect::<Vec<_>>()
        .join(", ")
}
