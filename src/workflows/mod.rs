//! Role-facing operations. Each function validates the acting user's role
//! and the operation's preconditions before touching the store; an `Err`
//! means nothing was mutated.

pub mod applicant;
pub mod auth;
pub mod manager;
pub mod officer;

use crate::domain::{ApplicationId, EnquiryId, ProjectId, UserId};
use crate::lifecycle::LifecycleError;

#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("user '{0}' is not in the store")]
    UnknownUser(UserId),
    #[error("project '{0}' is not in the store")]
    UnknownProject(ProjectId),
    #[error("application '{0}' is not in the store")]
    UnknownApplication(ApplicationId),
    #[error("enquiry '{0}' is not in the store")]
    UnknownEnquiry(EnquiryId),
    #[error("user '{0}' does not act in the required role")]
    RoleMismatch(UserId),
    #[error("the user is not eligible for this project")]
    NotEligible,
    #[error("the user already has an active application")]
    AlreadyApplied,
    #[error("a withdrawal is already in flight")]
    AlreadyWithdrawing,
    #[error("the user has no applied project")]
    NoAppliedProject,
    #[error("no booking receipt is ready for this user")]
    ReceiptNotReady,
    #[error("the enquiry has a staff reply and is locked")]
    EnquiryLocked,
    #[error("only the filer may change an enquiry")]
    NotEnquiryFiler,
    #[error("user '{0}' is not staff for this enquiry")]
    NotEnquiryStaff(UserId),
    #[error("user '{0}' is not staff for this project")]
    NotProjectStaff(UserId),
    #[error("application '{0}' is not ready for booking")]
    NotReadyForBooking(ApplicationId),
    #[error("the candidate project's window overlaps a joined project")]
    WindowConflict,
    #[error("incorrect password")]
    IncorrectPassword,
    #[error("the new password must not be empty")]
    EmptyPassword,
    #[error("officer slot count {0} is out of range")]
    InvalidOfficerSlots(u32),
    #[error("the application window is empty")]
    InvalidWindow,
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
}

/// Free text is stored in comma-separated files, so commas are flattened to
/// spaces on the way in.
pub(crate) fn sanitize_text(text: &str) -> String {
    text.replace(',', " ")
}
