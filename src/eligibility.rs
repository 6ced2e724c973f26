//! Pure predicates gating which workflows a user may start.
//!
//! Nothing here mutates state; callers combine these with the store and the
//! lifecycle engine.

use chrono::NaiveDate;

use crate::domain::{Applicant, Project, RoomType};

/// Whether an applicant may apply to a project.
///
/// Married applicants qualify from age 21 for any room type. Single
/// applicants qualify from age 35 and only for two-room projects.
pub fn applicant_may_apply(applicant: &Applicant, project: &Project) -> bool {
    let age = applicant.identity.age;
    let married = applicant.identity.is_married();
    (age >= 21 && married)
        || (age >= 35 && !married && project.room_type == RoomType::TwoRoom)
}

/// Whether an officer may join a candidate project given the projects they
/// already administer.
///
/// A joined project blocks the candidate when either of its window endpoints
/// falls strictly inside the candidate's application window. Windows that
/// merely share an endpoint are treated as non-overlapping.
pub fn officer_may_join<'a, I>(joined: I, candidate: &Project) -> bool
where
    I: IntoIterator<Item = &'a Project>,
{
    for project in joined {
        let start_inside = project.application_start > candidate.application_start
            && project.application_start < candidate.application_end;
        let end_inside = project.application_end > candidate.application_start
            && project.application_end < candidate.application_end;
        if start_inside || end_inside {
            return false;
        }
    }
    true
}

/// Officer slot counts are capped at ten per project.
pub fn valid_officer_slots(count: u32) -> bool {
    count <= 10
}

/// Application windows must be non-empty.
pub fn valid_application_window(start: NaiveDate, end: NaiveDate) -> bool {
    start < end
}
