//! Display status derived from a posting and application status pair.
//!
//! Nothing here is persisted. Callers recompute on every read so the stored `status` fields
//! remain the single source of truth.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::domain::{ApplicationStatus, JobApplication, JobPosting, PostingStatus};

/// Category an application is displayed (and filtered) under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayCategory {
    OpenPending,
    NotReviewed,
    Hired,
    Declined,
}

impl DisplayCategory {
    pub const fn key(self) -> &'static str {
        match self {
            Self::OpenPending => "open-pending",
            Self::NotReviewed => "not-reviewed",
            Self::Hired => "hired",
            Self::Declined => "declined",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::OpenPending => "Open",
            Self::NotReviewed => "Not Reviewed",
            Self::Hired => "Hired",
            Self::Declined => "Declined",
        }
    }
}

impl FromStr for DisplayCategory {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "open-pending" => Ok(Self::OpenPending),
            "not-reviewed" => Ok(Self::NotReviewed),
            "hired" => Ok(Self::Hired),
            "declined" => Ok(Self::Declined),
            other => Err(format!("unknown display category '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DisplayStatus {
    pub label: &'static str,
    pub category: DisplayCategory,
}

impl From<DisplayCategory> for DisplayStatus {
    fn from(category: DisplayCategory) -> Self {
        Self {
            label: category.label(),
            category,
        }
    }
}

/// Derive the displayed status. Rules apply in order:
/// an open posting masks the stored status, `new` on a posting in review is not reviewed,
/// `hired` stays hired, and everything else reads as declined. That last branch includes
/// `new` applications on a closed posting (implicit decline).
pub fn derive(posting: PostingStatus, application: ApplicationStatus) -> DisplayStatus {
    let category = match (posting, application) {
        (PostingStatus::Open, _) => DisplayCategory::OpenPending,
        (PostingStatus::Review, ApplicationStatus::New) => DisplayCategory::NotReviewed,
        (_, ApplicationStatus::Hired) => DisplayCategory::Hired,
        _ => DisplayCategory::Declined,
    };
    category.into()
}

/// Filter choices offered for a posting's applications. Empty while the posting is open.
pub fn filter_options(posting: PostingStatus) -> &'static [DisplayCategory] {
    match posting {
        PostingStatus::Open => &[],
        PostingStatus::Review => &[
            DisplayCategory::NotReviewed,
            DisplayCategory::Hired,
            DisplayCategory::Declined,
        ],
        PostingStatus::Close => &[DisplayCategory::Hired, DisplayCategory::Declined],
    }
}

/// Keep only the requested categories that are offered for `posting`, preserving order and
/// dropping duplicates.
pub fn sanitize_filter(posting: PostingStatus, requested: &[DisplayCategory]) -> Vec<DisplayCategory> {
    let offered = filter_options(posting);
    let mut kept = Vec::new();
    for category in requested {
        if offered.contains(category) && !kept.contains(category) {
            kept.push(*category);
        }
    }
    kept
}

/// Decisions are only accepted while the posting is in review.
pub const fn decision_enabled(posting: PostingStatus) -> bool {
    matches!(posting, PostingStatus::Review)
}

/// An application paired with its freshly derived display status.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationRow {
    pub application: JobApplication,
    pub display: DisplayStatus,
    pub decision_enabled: bool,
}

/// Filter by derived category; an empty filter keeps everything.
pub fn filter_applications<'a>(
    posting: &JobPosting,
    applications: &'a [JobApplication],
    categories: &[DisplayCategory],
) -> Vec<&'a JobApplication> {
    applications
        .iter()
        .filter(|application| {
            categories.is_empty()
                || categories.contains(&derive(posting.status, application.status).category)
        })
        .collect()
}

/// Build display rows for the applications that pass the filter.
pub fn application_rows(
    posting: &JobPosting,
    applications: &[JobApplication],
    categories: &[DisplayCategory],
) -> Vec<ApplicationRow> {
    filter_applications(posting, applications, categories)
        .into_iter()
        .map(|application| ApplicationRow {
            application: application.clone(),
            display: derive(posting.status, application.status),
            decision_enabled: decision_enabled(posting.status),
        })
        .collect()
}
