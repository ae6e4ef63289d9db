use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Backend-owned identifier for a job posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostingId(pub u64);

impl fmt::Display for PostingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "posting-{}", self.0)
    }
}

/// Backend-owned identifier for a job application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationId(pub u64);

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "application-{}", self.0)
    }
}

/// Review lifecycle of a posting. Every posting carries exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostingStatus {
    Open,
    Review,
    Close,
}

impl PostingStatus {
    pub const fn ordered() -> [Self; 3] {
        [Self::Open, Self::Review, Self::Close]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Review => "review",
            Self::Close => "close",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::Review => "In review",
            Self::Close => "Closed",
        }
    }
}

impl FromStr for PostingStatus {
    type Err = StatusParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::ordered()
            .into_iter()
            .find(|status| status.key() == raw)
            .ok_or_else(|| StatusParseError::Posting(raw.to_string()))
    }
}

/// Stored decision state of an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    New,
    Hired,
    Declined,
}

impl ApplicationStatus {
    pub const fn key(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Hired => "hired",
            Self::Declined => "declined",
        }
    }
}

/// Employer verdict on an application under review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Hire,
    Decline,
}

impl Decision {
    pub const fn resulting_status(self) -> ApplicationStatus {
        match self {
            Self::Hire => ApplicationStatus::Hired,
            Self::Decline => ApplicationStatus::Declined,
        }
    }
}

impl FromStr for Decision {
    type Err = StatusParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "hire" => Ok(Self::Hire),
            "decline" => Ok(Self::Decline),
            other => Err(StatusParseError::Decision(other.to_string())),
        }
    }
}

/// Raised when a wire or command-line value names no known status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StatusParseError {
    #[error("unknown posting status '{0}' (expected open, review, or close)")]
    Posting(String),
    #[error("unknown decision '{0}' (expected hire or decline)")]
    Decision(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemoteMode {
    #[serde(rename = "On-Site")]
    OnSite,
    Remote,
    Hybrid,
}

/// A job listing owned by the employer of the current session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: PostingId,
    pub title: String,
    pub category: String,
    #[serde(default)]
    pub description: String,
    pub salary: f64,
    pub job_type: String,
    pub remote: RemoteMode,
    pub status: PostingStatus,
}

/// Posting as returned by the backend detail endpoint, with its applications embedded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostingDetail {
    #[serde(flatten)]
    pub posting: JobPosting,
    #[serde(default, rename = "job_applications")]
    pub applications: Vec<JobApplication>,
}

/// Applicant details shown to the reviewer. Read-only to the review workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantProfile {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub mobile: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl ApplicantProfile {
    pub fn display_name(&self) -> String {
        format!("{}, {}", self.first_name, self.last_name)
    }
}

/// An applicant's submission against exactly one posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobApplication {
    pub id: ApplicationId,
    #[serde(rename = "job_posting_id")]
    pub posting_id: PostingId,
    pub applicant: ApplicantProfile,
    #[serde(default)]
    pub education: String,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub certificate: String,
    pub status: ApplicationStatus,
}

/// Partial update for a posting; absent fields are left untouched by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PostingPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PostingStatus>,
}

impl PostingPatch {
    pub fn status(status: PostingStatus) -> Self {
        Self {
            status: Some(status),
        }
    }
}

/// Partial update for an application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApplicationPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ApplicationStatus>,
}

impl ApplicationPatch {
    pub fn status(status: ApplicationStatus) -> Self {
        Self {
            status: Some(status),
        }
    }
}

/// Posting category offered by the backend for new postings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobCategory {
    pub id: u64,
    pub category: String,
}

/// Employer-entered fields for a new posting. Missing fields take the form defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewJobPosting {
    pub title: String,
    pub category: String,
    pub description: String,
    pub salary: f64,
    pub job_type: String,
    pub remote: RemoteMode,
    pub status: PostingStatus,
}

impl Default for NewJobPosting {
    fn default() -> Self {
        Self {
            title: String::new(),
            category: "Cleaner".to_string(),
            description: String::new(),
            salary: 0.0,
            job_type: "Full time".to_string(),
            remote: RemoteMode::OnSite,
            status: PostingStatus::Open,
        }
    }
}

impl NewJobPosting {
    pub fn validate(&self) -> Result<(), DraftError> {
        if self.title.trim().is_empty() {
            return Err(DraftError::MissingTitle);
        }
        if self.salary.is_nan() || self.salary <= 0.0 {
            return Err(DraftError::NonPositiveSalary(self.salary));
        }
        Ok(())
    }
}

/// Local validation failure for a posting draft.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DraftError {
    #[error("posting title must not be empty")]
    MissingTitle,
    #[error("salary must be a positive number (got {0})")]
    NonPositiveSalary(f64),
}
