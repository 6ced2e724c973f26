//! Operations an applicant (or an officer acting as one) starts themselves.

use crate::domain::{
    Application, ApplicationId, ApplicationKind, Enquiry, EnquiryId, ProjectId, User, UserId,
};
use crate::eligibility;
use crate::ident::{self, IdKind};
use crate::store::Store;
use crate::workflows::{sanitize_text, WorkflowError};

/// Submits a BTO application for the project.
///
/// The applicant must be free to apply, must pass the age and marital
/// eligibility rules, and an officer may not apply to a project they
/// administer.
pub fn apply_for_project(
    store: &mut Store,
    user_id: &UserId,
    project_id: &ProjectId,
) -> Result<ApplicationId, WorkflowError> {
    let user = store
        .user(user_id)
        .ok_or_else(|| WorkflowError::UnknownUser(user_id.clone()))?;
    let applicant = user
        .as_applicant()
        .ok_or_else(|| WorkflowError::RoleMismatch(user_id.clone()))?;
    if !applicant.can_apply() {
        return Err(WorkflowError::AlreadyApplied);
    }
    if let Some(officer) = user.as_officer() {
        if officer.is_prohibited(project_id) {
            return Err(WorkflowError::NotEligible);
        }
    }
    let project = store
        .project(project_id)
        .ok_or_else(|| WorkflowError::UnknownProject(project_id.clone()))?;
    if !eligibility::applicant_may_apply(applicant, project) {
        return Err(WorkflowError::NotEligible);
    }

    let application_id = ApplicationId::from(ident::new_id(IdKind::Application).as_str());
    store.add_application(Application::new(
        application_id.clone(),
        user_id.clone(),
        project_id.clone(),
        ApplicationKind::Bto,
    ));
    if let Some(applicant) = store.user_mut(user_id).and_then(User::as_applicant_mut) {
        applicant.assign_applied_project(project_id.clone());
        applicant.set_project_application(application_id.clone());
    }
    Ok(application_id)
}

/// Files a withdrawal against the currently applied project. The withdrawal
/// itself is an application that staff rule on later.
pub fn submit_withdrawal(
    store: &mut Store,
    user_id: &UserId,
) -> Result<ApplicationId, WorkflowError> {
    let (project_id, withdrawing) = {
        let user = store
            .user(user_id)
            .ok_or_else(|| WorkflowError::UnknownUser(user_id.clone()))?;
        let applicant = user
            .as_applicant()
            .ok_or_else(|| WorkflowError::RoleMismatch(user_id.clone()))?;
        let project = applicant
            .applied_project()
            .ok_or(WorkflowError::NoAppliedProject)?;
        (project.clone(), applicant.is_withdrawing())
    };
    if withdrawing {
        return Err(WorkflowError::AlreadyWithdrawing);
    }

    let application_id = ApplicationId::from(ident::new_id(IdKind::Application).as_str());
    store.add_application(Application::new(
        application_id.clone(),
        user_id.clone(),
        project_id,
        ApplicationKind::Withdrawal,
    ));
    if let Some(applicant) = store.user_mut(user_id).and_then(User::as_applicant_mut) {
        applicant.set_withdrawal_application(application_id.clone());
    }
    Ok(application_id)
}

/// Returns the booking receipt text, generating it from the applied project
/// if the booking happened in an earlier session.
pub fn booking_receipt(store: &mut Store, user_id: &UserId) -> Result<String, WorkflowError> {
    let (ready, cached, project_id) = {
        let applicant = store
            .user(user_id)
            .ok_or_else(|| WorkflowError::UnknownUser(user_id.clone()))?
            .as_applicant()
            .ok_or_else(|| WorkflowError::RoleMismatch(user_id.clone()))?;
        (
            applicant.receipt_ready(),
            applicant.receipt().map(str::to_string),
            applicant.applied_project().cloned(),
        )
    };
    if !ready {
        return Err(WorkflowError::ReceiptNotReady);
    }
    if let Some(receipt) = cached {
        return Ok(receipt);
    }

    let project_id = project_id.ok_or(WorkflowError::NoAppliedProject)?;
    let project_name = store
        .project(&project_id)
        .ok_or(WorkflowError::UnknownProject(project_id))?
        .name
        .clone();
    let applicant = store
        .user_mut(user_id)
        .and_then(User::as_applicant_mut)
        .ok_or_else(|| WorkflowError::UnknownUser(user_id.clone()))?;
    applicant.generate_receipt(&project_name);
    Ok(applicant.receipt().unwrap_or_default().to_string())
}

/// Files an enquiry about a project, snapshotting the project's staff at
/// this moment.
pub fn file_enquiry(
    store: &mut Store,
    user_id: &UserId,
    project_id: &ProjectId,
    question: &str,
) -> Result<EnquiryId, WorkflowError> {
    let user = store
        .user(user_id)
        .ok_or_else(|| WorkflowError::UnknownUser(user_id.clone()))?;
    if user.as_applicant().is_none() {
        return Err(WorkflowError::RoleMismatch(user_id.clone()));
    }
    let project = store
        .project(project_id)
        .ok_or_else(|| WorkflowError::UnknownProject(project_id.clone()))?;

    let enquiry_id = EnquiryId::from(ident::new_id(IdKind::Enquiry).as_str());
    let enquiry = Enquiry::new(
        enquiry_id.clone(),
        user_id.clone(),
        project_id.clone(),
        project.manager.clone(),
        project.officers.clone(),
        sanitize_text(question),
        None,
    );
    store.add_enquiry(enquiry);
    Ok(enquiry_id)
}

/// Rewrites an unanswered enquiry's question. Only the filer may edit, and a
/// staff reply locks the enquiry for good.
pub fn edit_enquiry(
    store: &mut Store,
    user_id: &UserId,
    enquiry_id: &EnquiryId,
    question: &str,
) -> Result<(), WorkflowError> {
    let enquiry = store
        .enquiry_mut(enquiry_id)
        .ok_or_else(|| WorkflowError::UnknownEnquiry(enquiry_id.clone()))?;
    if enquiry.filer != *user_id {
        return Err(WorkflowError::NotEnquiryFiler);
    }
    if !enquiry.set_question(sanitize_text(question)) {
        return Err(WorkflowError::EnquiryLocked);
    }
    Ok(())
}

/// Deletes an unanswered enquiry. Same rules as editing.
pub fn delete_enquiry(
    store: &mut Store,
    user_id: &UserId,
    enquiry_id: &EnquiryId,
) -> Result<(), WorkflowError> {
    let enquiry = store
        .enquiry(enquiry_id)
        .ok_or_else(|| WorkflowError::UnknownEnquiry(enquiry_id.clone()))?;
    if enquiry.filer != *user_id {
        return Err(WorkflowError::NotEnquiryFiler);
    }
    if enquiry.is_locked() {
        return Err(WorkflowError::EnquiryLocked);
    }
    store.remove_enquiry(enquiry_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Applicant, ApplicationStatus, Identity, Manager, MaritalStatus, Officer, Project, RoomType,
    };
    use chrono::NaiveDate;

    fn identity(id: &str, age: u32, status: MaritalStatus) -> Identity {
        Identity::new(UserId::from(id), "Tan Mei".to_string(), age, status, None)
            .expect("valid identity")
    }

    fn project(id: &str, room: RoomType) -> Project {
        Project::new(
            ProjectId::from(id),
            format!("Project {id}"),
            10,
            "Sengkang".to_string(),
            room,
            260_000.0,
            NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid date"),
            NaiveDate::from_ymd_opt(2025, 3, 31).expect("valid date"),
            Some(UserId::from("S7000001A")),
            5,
            vec![UserId::from("S2000001C")],
            true,
        )
    }

    fn seeded() -> Store {
        let mut store = Store::new();
        store.add_user(User::Applicant(Applicant::new(identity(
            "S1234567A",
            30,
            MaritalStatus::Married,
        ))));
        store.add_project(project("p-1", RoomType::TwoRoom));
        store
    }

    #[test]
    fn applying_creates_a_pending_application_and_locks_the_applicant() {
        let mut store = seeded();
        let user_id = UserId::from("S1234567A");
        let app_id =
            apply_for_project(&mut store, &user_id, &ProjectId::from("p-1")).expect("eligible");

        let application = store.application(&app_id).expect("stored");
        assert_eq!(application.kind(), ApplicationKind::Bto);
        assert_eq!(application.status(), ApplicationStatus::Pending);

        let applicant = store
            .user(&user_id)
            .and_then(User::as_applicant)
            .expect("present");
        assert!(!applicant.can_apply());
        assert_eq!(applicant.applied_project(), Some(&ProjectId::from("p-1")));
        assert_eq!(applicant.project_application(), Some(&app_id));
    }

    #[test]
    fn a_second_application_is_rejected() {
        let mut store = seeded();
        let user_id = UserId::from("S1234567A");
        apply_for_project(&mut store, &user_id, &ProjectId::from("p-1")).expect("eligible");
        let err = apply_for_project(&mut store, &user_id, &ProjectId::from("p-1"))
            .expect_err("already applied");
        assert!(matches!(err, WorkflowError::AlreadyApplied));
        assert_eq!(store.applications().len(), 1);
    }

    #[test]
    fn ineligible_applicants_are_rejected_without_mutation() {
        let mut store = seeded();
        store.add_user(User::Applicant(Applicant::new(identity(
            "S7654321B",
            30,
            MaritalStatus::Single,
        ))));
        let err = apply_for_project(
            &mut store,
            &UserId::from("S7654321B"),
            &ProjectId::from("p-1"),
        )
        .expect_err("single under 35");
        assert!(matches!(err, WorkflowError::NotEligible));
        assert!(store.applications().is_empty());
    }

    #[test]
    fn managers_cannot_apply() {
        let mut store = seeded();
        store.add_user(User::Manager(Manager::new(identity(
            "S7000001A",
            45,
            MaritalStatus::Married,
        ))));
        let err = apply_for_project(
            &mut store,
            &UserId::from("S7000001A"),
            &ProjectId::from("p-1"),
        )
        .expect_err("wrong role");
        assert!(matches!(err, WorkflowError::RoleMismatch(_)));
    }

    #[test]
    fn officers_cannot_apply_to_their_own_projects() {
        let mut store = seeded();
        let mut officer = Officer::new(identity("S2000001C", 30, MaritalStatus::Married));
        officer.join_project(ProjectId::from("p-1"));
        store.add_user(User::Officer(officer));
        let err = apply_for_project(
            &mut store,
            &UserId::from("S2000001C"),
            &ProjectId::from("p-1"),
        )
        .expect_err("prohibited project");
        assert!(matches!(err, WorkflowError::NotEligible));
    }

    #[test]
    fn withdrawal_requires_an_applied_project() {
        let mut store = seeded();
        let user_id = UserId::from("S1234567A");
        let err = submit_withdrawal(&mut store, &user_id).expect_err("nothing applied");
        assert!(matches!(err, WorkflowError::NoAppliedProject));

        apply_for_project(&mut store, &user_id, &ProjectId::from("p-1")).expect("eligible");
        let withdrawal_id = submit_withdrawal(&mut store, &user_id).expect("applied");
        let withdrawal = store.application(&withdrawal_id).expect("stored");
        assert_eq!(withdrawal.kind(), ApplicationKind::Withdrawal);

        let err = submit_withdrawal(&mut store, &user_id).expect_err("already withdrawing");
        assert!(matches!(err, WorkflowError::AlreadyWithdrawing));
    }

    #[test]
    fn enquiry_questions_lose_their_commas() {
        let mut store = seeded();
        let user_id = UserId::from("S1234567A");
        let enquiry_id = file_enquiry(
            &mut store,
            &user_id,
            &ProjectId::from("p-1"),
            "Price, floor plan, and dates?",
        )
        .expect("filed");
        let enquiry = store.enquiry(&enquiry_id).expect("stored");
        assert_eq!(enquiry.question(), "Price  floor plan  and dates?");
        assert_eq!(enquiry.project_manager, Some(UserId::from("S7000001A")));
        assert_eq!(enquiry.project_officers, vec![UserId::from("S2000001C")]);
    }

    #[test]
    fn only_the_filer_edits_and_replies_lock() {
        let mut store = seeded();
        let user_id = UserId::from("S1234567A");
        let enquiry_id = file_enquiry(&mut store, &user_id, &ProjectId::from("p-1"), "Original?")
            .expect("filed");

        let stranger = UserId::from("S7654321B");
        let err = edit_enquiry(&mut store, &stranger, &enquiry_id, "Hijack").expect_err("not filer");
        assert!(matches!(err, WorkflowError::NotEnquiryFiler));

        edit_enquiry(&mut store, &user_id, &enquiry_id, "Revised?").expect("filer edits");

        store
            .enquiry_mut(&enquiry_id)
            .expect("stored")
            .set_reply("Answered.".to_string());
        let err = edit_enquiry(&mut store, &user_id, &enquiry_id, "Too late").expect_err("locked");
        assert!(matches!(err, WorkflowError::EnquiryLocked));
        let err = delete_enquiry(&mut store, &user_id, &enquiry_id).expect_err("locked");
        assert!(matches!(err, WorkflowError::EnquiryLocked));
    }

    #[test]
    fn delete_removes_the_enquiry() {
        let mut store = seeded();
        let user_id = UserId::from("S1234567A");
        let enquiry_id =
            file_enquiry(&mut store, &user_id, &ProjectId::from("p-1"), "Any news?").expect("filed");
        delete_enquiry(&mut store, &user_id, &enquiry_id).expect("unanswered");
        assert!(store.enquiries().is_empty());
    }
}
