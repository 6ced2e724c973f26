//! Whole-store saver. Each entity class is rewritten to its own file; users
//! are partitioned by role so officers never appear in the applicant file.

use crate::config::DataConfig;
use crate::domain::User;
use crate::persist::records::{
    ApplicantRecord, ApplicationRecord, EnquiryRecord, ManagerRecord, OfficerRecord, ProjectRecord,
};
use crate::persist::{write_records, PersistError};
use crate::store::Store;

pub fn save_store(store: &Store, config: &DataConfig) -> Result<(), PersistError> {
    let mut applicants = Vec::new();
    let mut officers = Vec::new();
    let mut managers = Vec::new();
    for user in store.users() {
        match user {
            User::Applicant(applicant) => applicants.push(ApplicantRecord::from_entity(applicant)),
            User::Officer(officer) => officers.push(OfficerRecord::from_entity(officer)),
            User::Manager(manager) => managers.push(ManagerRecord::from_entity(manager)),
        }
    }

    let projects: Vec<ProjectRecord> = store.projects().iter().map(ProjectRecord::from_entity).collect();
    let applications: Vec<ApplicationRecord> = store
        .applications()
        .iter()
        .map(ApplicationRecord::from_entity)
        .collect();
    let enquiries: Vec<EnquiryRecord> = store
        .enquiries()
        .iter()
        .map(EnquiryRecord::from_entity)
        .collect();

    write_records(&config.applicant_file(), &applicants)?;
    write_records(&config.officer_file(), &officers)?;
    write_records(&config.manager_file(), &managers)?;
    write_records(&config.project_file(), &projects)?;
    write_records(&config.application_file(), &applications)?;
    write_records(&config.enquiry_file(), &enquiries)?;
    Ok(())
}
