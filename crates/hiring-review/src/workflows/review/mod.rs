//! Job posting review workflow: status model, display derivation, transition and decision
//! rules, and the session-level review surface that drives them.

pub mod domain;
pub mod engine;
pub mod gateway;
pub mod http;
pub mod memory;
pub mod router;
pub mod selection;
pub mod status;
pub mod surface;

#[cfg(test)]
mod tests;

pub use domain::{
    ApplicantProfile, ApplicationId, ApplicationPatch, ApplicationStatus, Decision, DraftError,
    JobApplication, JobCategory, JobPosting, NewJobPosting, PostingDetail, PostingId,
    PostingPatch, PostingStatus, RemoteMode, StatusParseError,
};
pub use engine::{
    CascadeFailure, CascadeReport, EntityRef, PolicyViolation, Removal, Transition,
    TransitionOutcome, WorkflowEngine, WorkflowError,
};
pub use gateway::{GatewayError, ResourceGateway};
pub use http::HttpGateway;
pub use memory::InMemoryGateway;
pub use router::review_router;
pub use status::{ApplicationRow, DisplayCategory, DisplayStatus};
pub use surface::{PostingCard, Removed, ReviewSurface};
