//! Operations a manager performs over the projects they own.

use chrono::NaiveDate;

use crate::domain::{
    ApplicationId, ApplicationStatus, EnquiryId, MaritalStatus, Project, ProjectId, RoomType,
    User, UserId,
};
use crate::eligibility;
use crate::ident::{self, IdKind};
use crate::lifecycle;
use crate::store::Store;
use crate::workflows::{sanitize_text, WorkflowError};

/// Everything needed to open a new project. Officer ids listed here join the
/// project immediately, skipping the registration flow.
#[derive(Debug, Clone)]
pub struct NewProject {
    pub name: String,
    pub neighbourhood: String,
    pub unit_count: u32,
    pub room_type: RoomType,
    pub selling_price: f64,
    pub application_start: NaiveDate,
    pub application_end: NaiveDate,
    pub officer_slots: u32,
    pub officers: Vec<UserId>,
    pub visible: bool,
}

/// Creates a project owned by the manager.
pub fn create_project(
    store: &mut Store,
    manager_id: &UserId,
    details: NewProject,
) -> Result<ProjectId, WorkflowError> {
    require_manager(store, manager_id)?;
    if !eligibility::valid_officer_slots(details.officer_slots) {
        return Err(WorkflowError::InvalidOfficerSlots(details.officer_slots));
    }
    if !eligibility::valid_application_window(details.application_start, details.application_end) {
        return Err(WorkflowError::InvalidWindow);
    }
    for officer_id in &details.officers {
        if store
            .user(officer_id)
            .ok_or_else(|| WorkflowError::UnknownUser(officer_id.clone()))?
            .as_officer()
            .is_none()
        {
            return Err(WorkflowError::RoleMismatch(officer_id.clone()));
        }
    }

    let project_id = ProjectId::from(ident::new_id(IdKind::Project).as_str());
    let project = Project::new(
        project_id.clone(),
        sanitize_text(&details.name),
        details.unit_count,
        sanitize_text(&details.neighbourhood),
        details.room_type,
        details.selling_price,
        details.application_start,
        details.application_end,
        Some(manager_id.clone()),
        details.officer_slots,
        details.officers.clone(),
        details.visible,
    );
    store.add_project(project);
    for officer_id in &details.officers {
        if let Some(officer) = store.user_mut(officer_id).and_then(User::as_officer_mut) {
            officer.join_project(project_id.clone());
        }
    }
    Ok(project_id)
}

/// Flips the project's visibility and returns the new value.
pub fn toggle_visibility(
    store: &mut Store,
    manager_id: &UserId,
    project_id: &ProjectId,
) -> Result<bool, WorkflowError> {
    require_manager(store, manager_id)?;
    let project = managed_project_mut(store, manager_id, project_id)?;
    Ok(project.toggle_visibility())
}

/// Retires a project outright. Links elsewhere keep their ids and resolve to
/// absent afterwards.
pub fn remove_project(
    store: &mut Store,
    manager_id: &UserId,
    project_id: &ProjectId,
) -> Result<(), WorkflowError> {
    require_manager(store, manager_id)?;
    managed_project_mut(store, manager_id, project_id)?;
    store.remove_project(project_id);
    Ok(())
}

/// Rules on an application against one of this manager's projects. The
/// transition guard and cascades run in the lifecycle engine.
pub fn review_application(
    store: &mut Store,
    manager_id: &UserId,
    application_id: &ApplicationId,
    new_status: ApplicationStatus,
) -> Result<(), WorkflowError> {
    require_manager(store, manager_id)?;
    let project_id = store
        .application(application_id)
        .ok_or_else(|| WorkflowError::UnknownApplication(application_id.clone()))?
        .project
        .clone();
    let managed = store
        .project(&project_id)
        .is_some_and(|p| p.is_managed_by(manager_id));
    if !managed {
        return Err(WorkflowError::NotProjectStaff(manager_id.clone()));
    }
    lifecycle::update_status(store, application_id, new_status)?;
    Ok(())
}

/// Answers an enquiry whose snapshot names this manager.
pub fn reply_enquiry(
    store: &mut Store,
    manager_id: &UserId,
    enquiry_id: &EnquiryId,
    reply: &str,
) -> Result<(), WorkflowError> {
    require_manager(store, manager_id)?;
    let enquiry = store
        .enquiry_mut(enquiry_id)
        .ok_or_else(|| WorkflowError::UnknownEnquiry(enquiry_id.clone()))?;
    if enquiry.project_manager.as_ref() != Some(manager_id) {
        return Err(WorkflowError::NotEnquiryStaff(manager_id.clone()));
    }
    enquiry.set_reply(sanitize_text(reply));
    Ok(())
}

/// Filters for the booking report. `None` means no constraint.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportFilter {
    pub marital_status: Option<MaritalStatus>,
    pub room_type: Option<RoomType>,
}

/// One booked applicant in the report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub applicant: UserId,
    pub name: String,
    pub age: u32,
    pub marital_status: MaritalStatus,
    pub project: String,
    pub room_type: RoomType,
}

/// Lists applicants with booked flats across the store, optionally narrowed
/// by marital status and room type.
pub fn booking_report(store: &Store, filter: ReportFilter) -> Vec<ReportRow> {
    store
        .applications()
        .iter()
        .filter(|a| a.status() == ApplicationStatus::Booked)
        .filter_map(|a| {
            let user = store.user(&a.user)?;
            let identity = user.identity();
            let project = store.project(&a.project)?;
            if filter
                .marital_status
                .is_some_and(|wanted| identity.marital_status != wanted)
            {
                return None;
            }
            if filter
                .room_type
                .is_some_and(|wanted| project.room_type != wanted)
            {
                return None;
            }
            Some(ReportRow {
                applicant: identity.id.clone(),
                name: identity.name.clone(),
                age: identity.age,
                marital_status: identity.marital_status,
                project: project.name.clone(),
                room_type: project.room_type,
            })
        })
        .collect()
}

fn require_manager(store: &Store, manager_id: &UserId) -> Result<(), WorkflowError> {
    let user = store
        .user(manager_id)
        .ok_or_else(|| WorkflowError::UnknownUser(manager_id.clone()))?;
    if user.as_manager().is_none() {
        return Err(WorkflowError::RoleMismatch(manager_id.clone()));
    }
    Ok(())
}

fn managed_project_mut<'a>(
    store: &'a mut Store,
    manager_id: &UserId,
    project_id: &ProjectId,
) -> Result<&'a mut Project, WorkflowError> {
    let project = store
        .project_mut(project_id)
        .ok_or_else(|| WorkflowError::UnknownProject(project_id.clone()))?;
    if !project.is_managed_by(manager_id) {
        return Err(WorkflowError::NotProjectStaff(manager_id.clone()));
    }
    Ok(project)
}
