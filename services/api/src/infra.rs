use crate::cli::BackendArgs;
use hiring_review::config::{AppConfig, BackendConfig};
use hiring_review::error::AppError;
use hiring_review::workflows::review::{
    ApplicantProfile, ApplicationId, ApplicationStatus, HttpGateway, InMemoryGateway,
    JobApplication, JobCategory, JobPosting, PostingId, PostingStatus, RemoteMode,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Load configuration and apply a command-line backend override.
pub(crate) fn load_config(backend: &BackendArgs) -> Result<AppConfig, AppError> {
    let mut config = AppConfig::load()?;
    if let Some(url) = backend.backend_url.clone() {
        config.backend = BackendConfig::new(url, config.backend.timeout)?;
    }
    Ok(config)
}

pub(crate) fn http_gateway(config: &AppConfig) -> Result<HttpGateway, AppError> {
    Ok(HttpGateway::new(&config.backend)?)
}

fn seeded_posting(id: u64, title: &str, remote: RemoteMode, status: PostingStatus) -> JobPosting {
    JobPosting {
        id: PostingId(id),
        title: title.to_string(),
        category: "Cook".to_string(),
        description: format!("{title} for a downtown bistro"),
        salary: 41_000.0,
        job_type: "Full time".to_string(),
        remote,
        status,
    }
}

fn seeded_application(
    id: u64,
    posting: u64,
    first_name: &str,
    last_name: &str,
    status: ApplicationStatus,
) -> JobApplication {
    JobApplication {
        id: ApplicationId(id),
        posting_id: PostingId(posting),
        applicant: ApplicantProfile {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: format!("{}@example.com", first_name.to_ascii_lowercase()),
            mobile: Some("(515)555-0142".to_string()),
            phone: None,
        },
        education: "Culinary arts diploma".to_string(),
        experience: "Two years prep, one year line".to_string(),
        certificate: "ServSafe".to_string(),
        status,
    }
}

pub(crate) fn seeded_postings() -> Vec<JobPosting> {
    vec![
        seeded_posting(1, "Line Cook", RemoteMode::OnSite, PostingStatus::Review),
        seeded_posting(2, "Pastry Chef", RemoteMode::OnSite, PostingStatus::Close),
        seeded_posting(3, "Menu Consultant", RemoteMode::Remote, PostingStatus::Open),
    ]
}

/// In-memory gateway with a small employer dataset for demos and local serving.
pub(crate) fn seeded_gateway() -> InMemoryGateway {
    let applications = vec![
        seeded_application(1, 1, "Avery", "Nguyen", ApplicationStatus::New),
        seeded_application(2, 1, "Jordan", "Okafor", ApplicationStatus::New),
        seeded_application(3, 1, "Sam", "Lindqvist", ApplicationStatus::Declined),
        seeded_application(4, 2, "Riley", "Moreau", ApplicationStatus::Hired),
        seeded_application(5, 2, "Casey", "Tanaka", ApplicationStatus::New),
        seeded_application(6, 3, "Morgan", "Patel", ApplicationStatus::New),
    ];
    let categories = ["Cleaner", "Cook", "Server", "Host"]
        .into_iter()
        .enumerate()
        .map(|(index, name)| JobCategory {
            id: index as u64 + 1,
            category: name.to_string(),
        })
        .collect();

    InMemoryGateway::new(seeded_postings(), applications, categories)
}
