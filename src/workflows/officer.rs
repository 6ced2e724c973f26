//! Operations an officer performs on projects they administer, plus the
//! registration flow that gets them there.

use crate::domain::{
    Application, ApplicationId, ApplicationKind, ApplicationStatus, EnquiryId, Project, ProjectId,
    User, UserId,
};
use crate::eligibility;
use crate::ident::{self, IdKind};
use crate::lifecycle;
use crate::store::Store;
use crate::workflows::{sanitize_text, WorkflowError};

/// Registers an officer's interest in administering a project.
///
/// The officer must not have applied to the project as an applicant, and the
/// project's application window must not overlap any project they already
/// joined.
pub fn register_for_project(
    store: &mut Store,
    officer_id: &UserId,
    project_id: &ProjectId,
) -> Result<ApplicationId, WorkflowError> {
    {
        let officer = store
            .user(officer_id)
            .ok_or_else(|| WorkflowError::UnknownUser(officer_id.clone()))?
            .as_officer()
            .ok_or_else(|| WorkflowError::RoleMismatch(officer_id.clone()))?;
        if officer.applicant().applied_project() == Some(project_id) {
            return Err(WorkflowError::NotEligible);
        }
        let candidate = store
            .project(project_id)
            .ok_or_else(|| WorkflowError::UnknownProject(project_id.clone()))?;
        let joined: Vec<&Project> = officer
            .joined_projects()
            .iter()
            .filter_map(|id| store.project(id))
            .collect();
        if !eligibility::officer_may_join(joined, candidate) {
            return Err(WorkflowError::WindowConflict);
        }
    }

    let application_id = ApplicationId::from(ident::new_id(IdKind::Application).as_str());
    store.add_application(Application::new(
        application_id.clone(),
        officer_id.clone(),
        project_id.clone(),
        ApplicationKind::ProjectRegistration,
    ));
    if let Some(officer) = store.user_mut(officer_id).and_then(User::as_officer_mut) {
        officer.register_project(project_id.clone(), application_id.clone());
    }
    Ok(application_id)
}

/// Books a flat for a successful BTO application on a project this officer
/// has joined.
pub fn book_flat(
    store: &mut Store,
    officer_id: &UserId,
    application_id: &ApplicationId,
) -> Result<(), WorkflowError> {
    {
        let officer = store
            .user(officer_id)
            .ok_or_else(|| WorkflowError::UnknownUser(officer_id.clone()))?
            .as_officer()
            .ok_or_else(|| WorkflowError::RoleMismatch(officer_id.clone()))?;
        let application = store
            .application(application_id)
            .ok_or_else(|| WorkflowError::UnknownApplication(application_id.clone()))?;
        if !officer.joined_projects().contains(&application.project) {
            return Err(WorkflowError::NotProjectStaff(officer_id.clone()));
        }
        if application.kind() != ApplicationKind::Bto
            || application.status() != ApplicationStatus::Successful
        {
            return Err(WorkflowError::NotReadyForBooking(application_id.clone()));
        }
    }
    lifecycle::book_flat(store, application_id)?;
    Ok(())
}

/// Folds the officer's own applied project into their prohibited set, so a
/// project they applied to as an applicant cannot also be administered.
pub fn refresh_prohibited(store: &mut Store, officer_id: &UserId) -> Result<(), WorkflowError> {
    let officer = store
        .user_mut(officer_id)
        .ok_or_else(|| WorkflowError::UnknownUser(officer_id.clone()))?
        .as_officer_mut()
        .ok_or_else(|| WorkflowError::RoleMismatch(officer_id.clone()))?;
    let applied = {
        let applicant = officer.applicant();
        (!applicant.can_apply())
            .then(|| applicant.applied_project().cloned())
            .flatten()
    };
    if let Some(project) = applied {
        officer.mark_prohibited(project);
    }
    Ok(())
}

/// Answers an enquiry this officer was snapshotted on. The reply locks the
/// enquiry against further edits by the filer.
pub fn reply_enquiry(
    store: &mut Store,
    officer_id: &UserId,
    enquiry_id: &EnquiryId,
    reply: &str,
) -> Result<(), WorkflowError> {
    if store
        .user(officer_id)
        .ok_or_else(|| WorkflowError::UnknownUser(officer_id.clone()))?
        .as_officer()
        .is_none()
    {
        return Err(WorkflowError::RoleMismatch(officer_id.clone()));
    }
    let enquiry = store
        .enquiry_mut(enquiry_id)
        .ok_or_else(|| WorkflowError::UnknownEnquiry(enquiry_id.clone()))?;
    if !enquiry.project_officers.contains(officer_id) {
        return Err(WorkflowError::NotEnquiryStaff(officer_id.clone()));
    }
    enquiry.set_reply(sanitize_text(reply));
    Ok(())
}
