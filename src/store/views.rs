//! Role-scoped, read-only projections over the store.
//!
//! Every function here borrows the store immutably; mutation always goes
//! through the lifecycle engine or the owning entity's setters.

use crate::domain::{
    Applicant, Application, ApplicationKind, ApplicationStatus, Enquiry, Project, RoomType, User,
    UserId,
};
use crate::eligibility;
use crate::store::Store;

/// Narrowing criteria for project listings. `None` means no constraint;
/// name and neighbourhood match case-insensitively on substrings.
#[derive(Debug, Clone, Default)]
pub struct ProjectFilter {
    pub name: Option<String>,
    pub neighbourhood: Option<String>,
    pub room_type: Option<RoomType>,
}

impl ProjectFilter {
    fn matches(&self, project: &Project) -> bool {
        fn contains_ci(haystack: &str, needle: &str) -> bool {
            haystack.to_lowercase().contains(&needle.to_lowercase())
        }
        if let Some(name) = &self.name {
            if !contains_ci(&project.name, name) {
                return false;
            }
        }
        if let Some(neighbourhood) = &self.neighbourhood {
            if !contains_ci(&project.neighbourhood, neighbourhood) {
                return false;
            }
        }
        if let Some(room_type) = self.room_type {
            if project.room_type != room_type {
                return false;
            }
        }
        true
    }
}

/// Applies the filter to a project listing and sorts the result by name.
pub fn filter_projects<'a>(projects: Vec<&'a Project>, filter: &ProjectFilter) -> Vec<&'a Project> {
    let mut selected: Vec<&Project> = projects.into_iter().filter(|p| filter.matches(p)).collect();
    selected.sort_by(|a, b| a.name.cmp(&b.name));
    selected
}

/// Projects visible to a user.
///
/// Managers see everything. Officers see visible projects minus their
/// prohibited set. Applicants see visible projects.
pub fn projects_for<'a>(store: &'a Store, user: &User) -> Vec<&'a Project> {
    match user {
        User::Manager(_) => store.projects().iter().collect(),
        User::Officer(officer) => store
            .projects()
            .iter()
            .filter(|p| p.visible)
            .filter(|p| !officer.is_prohibited(&p.id))
            .collect(),
        User::Applicant(_) => store.projects().iter().filter(|p| p.visible).collect(),
    }
}

/// Visible projects further narrowed to those the applicant is eligible to
/// apply for.
pub fn eligible_projects<'a>(store: &'a Store, applicant: &Applicant) -> Vec<&'a Project> {
    store
        .projects()
        .iter()
        .filter(|p| p.visible)
        .filter(|p| eligibility::applicant_may_apply(applicant, p))
        .collect()
}

/// Applications a staff user reviews.
///
/// Managers get pending applications on projects they manage. Officers get
/// not-yet-booked BTO applications on projects they have joined. Other roles
/// review nothing.
pub fn applications_for<'a>(store: &'a Store, user: &User) -> Vec<&'a Application> {
    match user {
        User::Manager(manager) => store
            .applications()
            .iter()
            .filter(|a| a.status() == ApplicationStatus::Pending)
            .filter(|a| {
                store
                    .project(&a.project)
                    .is_some_and(|p| p.is_managed_by(manager.id()))
            })
            .collect(),
        User::Officer(officer) => store
            .applications()
            .iter()
            .filter(|a| a.kind() == ApplicationKind::Bto)
            .filter(|a| a.status() != ApplicationStatus::Booked)
            .filter(|a| officer.joined_projects().contains(&a.project))
            .collect(),
        User::Applicant(_) => Vec::new(),
    }
}

/// Enquiries a user may read.
///
/// Managers act in admin mode here and see everything; use
/// [`managed_enquiries`] for the own-projects view. Officers see enquiries
/// on joined projects, applicants only their own filings.
pub fn enquiries_for<'a>(store: &'a Store, user: &User) -> Vec<&'a Enquiry> {
    match user {
        User::Manager(_) => store.enquiries().iter().collect(),
        User::Officer(officer) => store
            .enquiries()
            .iter()
            .filter(|e| e.project_officers.contains(officer.id()))
            .collect(),
        User::Applicant(applicant) => store
            .enquiries()
            .iter()
            .filter(|e| e.filer == *applicant.id())
            .collect(),
    }
}

/// Enquiries whose snapshot names the given manager as project manager.
pub fn managed_enquiries<'a>(store: &'a Store, manager: &UserId) -> Vec<&'a Enquiry> {
    store
        .enquiries()
        .iter()
        .filter(|e| e.project_manager.as_ref() == Some(manager))
        .collect()
}
