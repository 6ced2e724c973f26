//! Application status state machine and the cascades it triggers on related
//! entities.
//!
//! A transition is first checked against the kind-specific guard; only then
//! is the status written and the cascade applied. A denied transition leaves
//! every entity untouched.

use tracing::warn;

use crate::domain::{ApplicationId, ApplicationKind, ApplicationStatus, UserId};
use crate::store::Store;

/// Guard deciding whether a kind accepts a target status.
type TransitionGuard = fn(ApplicationStatus) -> bool;

fn any_status(_: ApplicationStatus) -> bool {
    true
}

fn staff_flow_only(status: ApplicationStatus) -> bool {
    !matches!(
        status,
        ApplicationStatus::Booked | ApplicationStatus::Withdrawn
    )
}

/// Strategy table keyed on the application kind. Registrations and
/// withdrawals never reach `Booked` or `Withdrawn`; those values belong to
/// the BTO flow.
pub fn guard_for(kind: ApplicationKind) -> TransitionGuard {
    match kind {
        ApplicationKind::Bto => any_status,
        ApplicationKind::ProjectRegistration | ApplicationKind::Withdrawal => staff_flow_only,
    }
}

/// Convenience wrapper over [`guard_for`].
pub fn transition_permitted(kind: ApplicationKind, status: ApplicationStatus) -> bool {
    guard_for(kind)(status)
}

/// Errors raised by the lifecycle engine. Each variant implies that no
/// mutation took place.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("application '{0}' is not in the store")]
    UnknownApplication(ApplicationId),
    #[error("project '{0}' is not in the store")]
    UnknownProject(crate::domain::ProjectId),
    #[error("{kind:?} applications cannot move to {status:?}")]
    TransitionDenied {
        kind: ApplicationKind,
        status: ApplicationStatus,
    },
    #[error("no units remain in the project")]
    NoUnitsRemaining,
}

/// Moves an application to `new_status` and applies the cascade keyed on
/// `(kind, new_status)` to the submitter and project.
pub fn update_status(
    store: &mut Store,
    application_id: &ApplicationId,
    new_status: ApplicationStatus,
) -> Result<(), LifecycleError> {
    let (kind, user_id, project_id) = {
        let application = store
            .application(application_id)
            .ok_or_else(|| LifecycleError::UnknownApplication(application_id.clone()))?;
        (
            application.kind(),
            application.user.clone(),
            application.project.clone(),
        )
    };

    if !transition_permitted(kind, new_status) {
        return Err(LifecycleError::TransitionDenied {
            kind,
            status: new_status,
        });
    }

    if let Some(application) = store.application_mut(application_id) {
        application.force_status(new_status);
    }
    cascade(store, kind, new_status, &user_id, &project_id);
    Ok(())
}

/// Side effects of a permitted transition. The guard has already excluded
/// illegal combinations, so this cannot fail; a missing link is logged and
/// skipped.
fn cascade(
    store: &mut Store,
    kind: ApplicationKind,
    new_status: ApplicationStatus,
    user_id: &UserId,
    project_id: &crate::domain::ProjectId,
) {
    match (kind, new_status) {
        (ApplicationKind::ProjectRegistration, ApplicationStatus::Successful) => {
            match store.user_mut(user_id).and_then(|u| u.as_officer_mut()) {
                Some(officer) => officer.join_project(project_id.clone()),
                None => warn!(user = %user_id, "registration cascade: submitter is not an officer"),
            }
            match store.project_mut(project_id) {
                Some(project) => project.add_officer(user_id.clone()),
                None => warn!(project = %project_id, "registration cascade: project missing"),
            }
        }
        (ApplicationKind::Withdrawal, ApplicationStatus::Successful) => {
            if let Some(applicant) = applicant_mut(store, user_id) {
                applicant.clear_applied_project();
                applicant.set_can_apply(true);
                applicant.set_withdrawing(false);
                applicant.set_receipt_ready(false);
            }
        }
        (ApplicationKind::Withdrawal, _) => {
            // The applied project is intentionally left in place here; only a
            // successful withdrawal clears it.
            if let Some(applicant) = applicant_mut(store, user_id) {
                applicant.set_can_apply(true);
                applicant.set_withdrawing(false);
            }
        }
        (ApplicationKind::Bto, ApplicationStatus::Unsuccessful) => {
            if let Some(applicant) = applicant_mut(store, user_id) {
                applicant.clear_applied_project();
                applicant.set_can_apply(true);
                applicant.set_receipt_ready(false);
            }
        }
        (ApplicationKind::Bto, ApplicationStatus::Booked) => {
            if let Some(applicant) = applicant_mut(store, user_id) {
                applicant.set_can_apply(false);
                applicant.set_receipt_ready(true);
            }
        }
        _ => {}
    }
}

fn applicant_mut<'a>(
    store: &'a mut Store,
    user_id: &UserId,
) -> Option<&'a mut crate::domain::Applicant> {
    let applicant = store.user_mut(user_id).and_then(|u| u.as_applicant_mut());
    if applicant.is_none() {
        warn!(user = %user_id, "cascade target is missing or has no applicant state");
    }
    applicant
}

/// Books a flat against a successful BTO application: one unit is consumed,
/// the application moves to `Booked`, and the applicant's receipt is
/// generated.
pub fn book_flat(
    store: &mut Store,
    application_id: &ApplicationId,
) -> Result<(), LifecycleError> {
    let (kind, user_id, project_id) = {
        let application = store
            .application(application_id)
            .ok_or_else(|| LifecycleError::UnknownApplication(application_id.clone()))?;
        (
            application.kind(),
            application.user.clone(),
            application.project.clone(),
        )
    };

    // Guard before touching the unit count so a denied booking mutates
    // nothing.
    if !transition_permitted(kind, ApplicationStatus::Booked) {
        return Err(LifecycleError::TransitionDenied {
            kind,
            status: ApplicationStatus::Booked,
        });
    }

    let project_name = {
        let project = store
            .project_mut(&project_id)
            .ok_or_else(|| LifecycleError::UnknownProject(project_id.clone()))?;
        if !project.take_unit() {
            return Err(LifecycleError::NoUnitsRemaining);
        }
        project.name.clone()
    };

    update_status(store, application_id, ApplicationStatus::Booked)?;

    match store.user_mut(&user_id).and_then(|u| u.as_applicant_mut()) {
        Some(applicant) => applicant.generate_receipt(&project_name),
        None => warn!(user = %user_id, "booked application has no applicant to receipt"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Applicant, Application, ApplicationId, Identity, MaritalStatus, Officer, Project,
        ProjectId, RoomType, User, UserId,
    };
    use chrono::NaiveDate;

    fn identity(id: &str) -> Identity {
        Identity::new(
            UserId::from(id),
            "Lee Min".to_string(),
            30,
            MaritalStatus::Married,
            None,
        )
        .expect("valid identity")
    }

    fn project(id: &str, units: u32) -> Project {
        Project::new(
            ProjectId::from(id),
            format!("Project {id}"),
            units,
            "Punggol".to_string(),
            RoomType::TwoRoom,
            280_000.0,
            NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid date"),
            NaiveDate::from_ymd_opt(2025, 3, 31).expect("valid date"),
            None,
            5,
            Vec::new(),
            true,
        )
    }

    fn store_with(kind: ApplicationKind) -> (Store, ApplicationId, UserId, ProjectId) {
        let mut store = Store::new();
        let user_id = UserId::from("S1234567A");
        let project_id = ProjectId::from("p-1");
        let application_id = ApplicationId::from("a-1");
        match kind {
            ApplicationKind::ProjectRegistration => {
                store.add_user(User::Officer(Officer::new(identity("S1234567A"))));
            }
            _ => {
                store.add_user(User::Applicant(Applicant::new(identity("S1234567A"))));
            }
        }
        store.add_project(project("p-1", 5));
        store.add_application(Application::new(
            application_id.clone(),
            user_id.clone(),
            project_id.clone(),
            kind,
        ));
        (store, application_id, user_id, project_id)
    }

    #[test]
    fn registration_never_reaches_booked_or_withdrawn() {
        for status in [ApplicationStatus::Booked, ApplicationStatus::Withdrawn] {
            let (mut store, app_id, _, _) = store_with(ApplicationKind::ProjectRegistration);
            let err = update_status(&mut store, &app_id, status).expect_err("must be denied");
            assert!(matches!(err, LifecycleError::TransitionDenied { .. }));
            assert_eq!(
                store.application(&app_id).expect("present").status(),
                ApplicationStatus::Pending
            );
        }
    }

    #[test]
    fn withdrawal_never_reaches_booked_or_withdrawn() {
        for status in [ApplicationStatus::Booked, ApplicationStatus::Withdrawn] {
            let (mut store, app_id, _, _) = store_with(ApplicationKind::Withdrawal);
            assert!(update_status(&mut store, &app_id, status).is_err());
            assert_eq!(
                store.application(&app_id).expect("present").status(),
                ApplicationStatus::Pending
            );
        }
    }

    #[test]
    fn successful_registration_moves_project_to_joined() {
        let (mut store, app_id, user_id, project_id) =
            store_with(ApplicationKind::ProjectRegistration);
        {
            let officer = store
                .user_mut(&user_id)
                .and_then(|u| u.as_officer_mut())
                .expect("officer");
            officer.register_project(project_id.clone(), app_id.clone());
        }

        update_status(&mut store, &app_id, ApplicationStatus::Successful).expect("permitted");

        let officer = store
            .user(&user_id)
            .and_then(|u| u.as_officer())
            .expect("officer");
        assert_eq!(officer.joined_projects(), &[project_id.clone()]);
        assert!(officer.registered_projects().is_empty());
        assert!(officer.is_prohibited(&project_id));
        let project = store.project(&project_id).expect("present");
        assert!(project.officers.contains(&user_id));
    }

    #[test]
    fn successful_withdrawal_releases_the_applicant() {
        let (mut store, app_id, user_id, project_id) = store_with(ApplicationKind::Withdrawal);
        {
            let applicant = store
                .user_mut(&user_id)
                .and_then(|u| u.as_applicant_mut())
                .expect("applicant");
            applicant.assign_applied_project(project_id.clone());
            applicant.set_withdrawal_application(app_id.clone());
        }

        update_status(&mut store, &app_id, ApplicationStatus::Successful).expect("permitted");

        let applicant = store
            .user(&user_id)
            .and_then(|u| u.as_applicant())
            .expect("applicant");
        assert_eq!(applicant.applied_project(), None);
        assert!(applicant.can_apply());
        assert!(!applicant.is_withdrawing());
        assert!(!applicant.receipt_ready());
    }

    #[test]
    fn rejected_withdrawal_keeps_the_applied_project() {
        let (mut store, app_id, user_id, project_id) = store_with(ApplicationKind::Withdrawal);
        {
            let applicant = store
                .user_mut(&user_id)
                .and_then(|u| u.as_applicant_mut())
                .expect("applicant");
            applicant.assign_applied_project(project_id.clone());
            applicant.set_withdrawal_application(app_id.clone());
        }

        update_status(&mut store, &app_id, ApplicationStatus::Unsuccessful).expect("permitted");

        let applicant = store
            .user(&user_id)
            .and_then(|u| u.as_applicant())
            .expect("applicant");
        // Observed behavior: the slot is released but the project link stays.
        assert_eq!(applicant.applied_project(), Some(&project_id));
        assert!(applicant.can_apply());
        assert!(!applicant.is_withdrawing());
    }

    #[test]
    fn unsuccessful_bto_resets_the_applicant() {
        let (mut store, app_id, user_id, project_id) = store_with(ApplicationKind::Bto);
        {
            let applicant = store
                .user_mut(&user_id)
                .and_then(|u| u.as_applicant_mut())
                .expect("applicant");
            applicant.assign_applied_project(project_id.clone());
        }

        update_status(&mut store, &app_id, ApplicationStatus::Unsuccessful).expect("permitted");

        let applicant = store
            .user(&user_id)
            .and_then(|u| u.as_applicant())
            .expect("applicant");
        assert_eq!(applicant.applied_project(), None);
        assert!(applicant.can_apply());
        assert!(!applicant.receipt_ready());
    }

    #[test]
    fn booking_consumes_one_unit_and_readies_the_receipt() {
        let (mut store, app_id, user_id, project_id) = store_with(ApplicationKind::Bto);
        {
            let project = store.project_mut(&project_id).expect("present");
            while project.unit_count() > 1 {
                project.take_unit();
            }
        }

        book_flat(&mut store, &app_id).expect("units available");

        assert_eq!(store.project(&project_id).expect("present").unit_count(), 0);
        assert_eq!(
            store.application(&app_id).expect("present").status(),
            ApplicationStatus::Booked
        );
        let applicant = store
            .user(&user_id)
            .and_then(|u| u.as_applicant())
            .expect("applicant");
        assert!(applicant.receipt_ready());
        assert!(applicant.receipt().expect("generated").contains("Lee Min"));
    }

    #[test]
    fn booking_with_no_units_mutates_nothing() {
        let (mut store, app_id, user_id, project_id) = store_with(ApplicationKind::Bto);
        {
            let project = store.project_mut(&project_id).expect("present");
            while project.unit_count() > 0 {
                project.take_unit();
            }
        }

        let err = book_flat(&mut store, &app_id).expect_err("no units");
        assert!(matches!(err, LifecycleError::NoUnitsRemaining));
        assert_eq!(store.project(&project_id).expect("present").unit_count(), 0);
        assert_eq!(
            store.application(&app_id).expect("present").status(),
            ApplicationStatus::Pending
        );
        assert!(!store
            .user(&user_id)
            .and_then(|u| u.as_applicant())
            .expect("applicant")
            .receipt_ready());
    }
}
