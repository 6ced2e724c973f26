//! Two-phase store loader.
//!
//! Phase one constructs every entity from its record scalars; phase two
//! resolves the id links between them against the partially built store.
//! Users load before projects, projects before applications and enquiries,
//! so each link target already exists when it is looked up. A link whose
//! target is missing resolves to absent and is logged; a dangling submitter
//! or project on an application or enquiry drops the whole record.

use tracing::warn;

use crate::config::DataConfig;
use crate::domain::{
    ApplicationId, Enquiry, EnquiryId, ProjectId, User, UserId,
};
use crate::lifecycle;
use crate::persist::records::{
    blank_to_none, split_ids, ApplicantRecord, ApplicationRecord, EnquiryRecord, ManagerRecord,
    OfficerRecord, ProjectRecord,
};
use crate::persist::read_records;
use crate::store::Store;

/// Loads the full store from the configured data files.
pub fn load_store(config: &DataConfig) -> Store {
    let applicant_rows: Vec<ApplicantRecord> = read_records(&config.applicant_file());
    let officer_rows: Vec<OfficerRecord> = read_records(&config.officer_file());
    let manager_rows: Vec<ManagerRecord> = read_records(&config.manager_file());
    let project_rows: Vec<ProjectRecord> = read_records(&config.project_file());
    let application_rows: Vec<ApplicationRecord> = read_records(&config.application_file());
    let enquiry_rows: Vec<EnquiryRecord> = read_records(&config.enquiry_file());

    let mut store = Store::new();

    for row in &applicant_rows {
        match row.construct() {
            Ok(applicant) => store.add_user(User::Applicant(applicant)),
            Err(err) => warn!(id = %row.id, %err, "skipping applicant record"),
        }
    }
    for row in &officer_rows {
        match row.construct() {
            Ok(officer) => store.add_user(User::Officer(officer)),
            Err(err) => warn!(id = %row.id, %err, "skipping officer record"),
        }
    }
    for row in &manager_rows {
        match row.construct() {
            Ok(manager) => store.add_user(User::Manager(manager)),
            Err(err) => warn!(id = %row.id, %err, "skipping manager record"),
        }
    }

    for row in &project_rows {
        let manager = resolve_manager(&store, &row.manager, &row.id);
        let officers = resolve_users(&store, &row.officers, &row.id);
        match row.construct(manager, officers) {
            Ok(project) => store.add_project(project),
            Err(err) => warn!(id = %row.id, %err, "skipping project record"),
        }
    }

    for row in &application_rows {
        load_application(&mut store, row);
    }
    for row in &enquiry_rows {
        load_enquiry(&mut store, row);
    }

    // Phase two: wire user-side links now that every target exists.
    for row in &applicant_rows {
        link_applicant(&mut store, &row.id, &row.applied_project, &row.project_application, &row.withdrawal_application);
    }
    for row in &officer_rows {
        link_applicant(&mut store, &row.id, &row.applied_project, &row.project_application, &row.withdrawal_application);
        link_officer(&mut store, row);
    }

    store
}

fn resolve_manager(store: &Store, raw: &str, project: &str) -> Option<UserId> {
    let token = blank_to_none(raw)?;
    let id = UserId::from(token);
    if store.user(&id).and_then(User::as_manager).is_some() {
        Some(id)
    } else {
        warn!(project, manager = token, "project manager not found, link dropped");
        None
    }
}

fn resolve_users(store: &Store, raw: &str, project: &str) -> Vec<UserId> {
    split_ids(raw)
        .into_iter()
        .filter_map(|token| {
            let id = UserId::from(token);
            if store.user(&id).is_some() {
                Some(id)
            } else {
                warn!(project, officer = token, "project officer not found, link dropped");
                None
            }
        })
        .collect()
}

fn load_application(store: &mut Store, row: &ApplicationRecord) {
    let (application, status) = match row.construct() {
        Ok(parts) => parts,
        Err(err) => {
            warn!(id = %row.id, %err, "skipping application record");
            return;
        }
    };
    if store.user(&application.user).is_none() {
        warn!(id = %row.id, user = %application.user, "application submitter not found, record dropped");
        return;
    }
    if store.project(&application.project).is_none() {
        warn!(id = %row.id, project = %application.project, "application project not found, record dropped");
        return;
    }

    let id = application.id.clone();
    let kind = application.kind();
    store.add_application(application);
    // Replay the persisted status through the guard; a status the kind could
    // never have reached stays Pending.
    if status != crate::domain::ApplicationStatus::Pending {
        if lifecycle::transition_permitted(kind, status) {
            if let Some(application) = store.application_mut(&id) {
                application.force_status(status);
            }
        } else {
            warn!(id = %id, ?kind, ?status, "persisted status is illegal for this kind, keeping Pending");
        }
    }
}

fn load_enquiry(store: &mut Store, row: &EnquiryRecord) {
    let filer = UserId::from(row.filer.trim());
    if store.user(&filer).and_then(User::as_applicant).is_none() {
        warn!(id = %row.id, filer = %filer, "enquiry filer not found, record dropped");
        return;
    }
    let project_id = ProjectId::from(row.project.trim());
    let Some(project) = store.project(&project_id) else {
        warn!(id = %row.id, project = %project_id, "enquiry project not found, record dropped");
        return;
    };

    // The staff snapshot is rebuilt from the project as loaded.
    let enquiry = Enquiry::new(
        EnquiryId::from(row.id.trim()),
        filer,
        project_id,
        project.manager.clone(),
        project.officers.clone(),
        row.question.clone(),
        blank_to_none(&row.reply).map(str::to_string),
    );
    store.add_enquiry(enquiry);
}

fn link_applicant(
    store: &mut Store,
    user: &str,
    applied_project: &str,
    project_application: &str,
    withdrawal_application: &str,
) {
    let user_id = UserId::from(user.trim());

    if let Some(token) = blank_to_none(applied_project) {
        let project_id = ProjectId::from(token);
        if store.project(&project_id).is_some() {
            if let Some(applicant) = applicant_mut(store, &user_id) {
                applicant.assign_applied_project(project_id);
            }
        } else {
            warn!(user = %user_id, project = token, "applied project not found, link dropped");
        }
    }

    if let Some(token) = blank_to_none(project_application) {
        let application_id = ApplicationId::from(token);
        if store.application(&application_id).is_some() {
            if let Some(applicant) = applicant_mut(store, &user_id) {
                applicant.set_project_application(application_id);
            }
        } else {
            warn!(user = %user_id, application = token, "project application not found, link dropped");
        }
    }

    if let Some(token) = blank_to_none(withdrawal_application) {
        let application_id = ApplicationId::from(token);
        if store.application(&application_id).is_some() {
            if let Some(applicant) = applicant_mut(store, &user_id) {
                applicant.set_withdrawal_application(application_id);
            }
        } else {
            warn!(user = %user_id, application = token, "withdrawal application not found, link dropped");
        }
    }
}

fn link_officer(store: &mut Store, row: &OfficerRecord) {
    let user_id = UserId::from(row.id.trim());

    let joined: Vec<ProjectId> = resolve_projects(store, &row.joined_projects, &user_id);
    let registered: Vec<ProjectId> = resolve_projects(store, &row.registered_projects, &user_id);
    let registrations: Vec<ApplicationId> = split_ids(&row.project_registrations)
        .into_iter()
        .filter_map(|token| {
            let id = ApplicationId::from(token);
            if store.application(&id).is_some() {
                Some(id)
            } else {
                warn!(user = %user_id, application = token, "registration not found, link dropped");
                None
            }
        })
        .collect();

    match store.user_mut(&user_id).and_then(User::as_officer_mut) {
        Some(officer) => officer.restore_links(joined, registered, registrations),
        None => warn!(user = %user_id, "officer row has no officer in the store"),
    }
}

fn resolve_projects(store: &Store, raw: &str, user: &UserId) -> Vec<ProjectId> {
    split_ids(raw)
        .into_iter()
        .filter_map(|token| {
            let id = ProjectId::from(token);
            if store.project(&id).is_some() {
                Some(id)
            } else {
                warn!(user = %user, project = token, "linked project not found, link dropped");
                None
            }
        })
        .collect()
}

fn applicant_mut<'a>(
    store: &'a mut Store,
    user_id: &UserId,
) -> Option<&'a mut crate::domain::Applicant> {
    store.user_mut(user_id).and_then(User::as_applicant_mut)
}
