//! Flat record schemas, one struct per persisted file.
//!
//! Records are plain field tuples in file order; every cross-reference is an
//! id string, with `;` separating multi-valued lists and an empty token for
//! an absent link. Converting a record into a domain entity only touches
//! scalars; id links are resolved by the loader in its second pass.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{
    Applicant, Application, ApplicationKind, ApplicationStatus, Enquiry, Identity, IdentityError,
    Manager, MaritalStatus, Officer, Project, ProjectId, RoomType, UserId,
};
use crate::persist::dates;

#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("'{0}' is not a marital status")]
    UnknownMaritalStatus(String),
    #[error("'{0}' is not a room type")]
    UnknownRoomType(String),
    #[error("'{0}' is not an application kind")]
    UnknownKind(String),
    #[error("'{0}' is not an application status")]
    UnknownStatus(String),
    #[error("'{value}' is not a DD-MM-YYYY date")]
    Date {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    #[error(transparent)]
    Identity(#[from] IdentityError),
}

/// `""` and whitespace-only tokens stand for an absent link.
pub fn blank_to_none(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Multi-valued id fields are `;`-joined inside one comma-separated cell.
pub fn join_ids<'a, I>(ids: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    ids.into_iter().collect::<Vec<_>>().join(";")
}

pub fn split_ids(value: &str) -> Vec<&str> {
    value
        .split(';')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .collect()
}

/// Boolean cells are `true`/`false`; anything else, including a blank cell,
/// falls back to the given default.
pub fn parse_flag(value: &str, default: bool) -> bool {
    match value.trim() {
        "true" => true,
        "false" => false,
        _ => default,
    }
}

fn parse_marital(value: &str) -> Result<MaritalStatus, RecordError> {
    MaritalStatus::parse(value).ok_or_else(|| RecordError::UnknownMaritalStatus(value.to_string()))
}

fn parse_record_date(value: &str) -> Result<NaiveDate, RecordError> {
    dates::parse_date(value).map_err(|source| RecordError::Date {
        value: value.to_string(),
        source,
    })
}

fn flag(value: bool) -> String {
    value.to_string()
}

/// `applicants.csv`: identity, current application links, and flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicantRecord {
    pub id: String,
    pub name: String,
    pub password: String,
    pub age: u32,
    pub marital_status: String,
    pub applied_project: String,
    pub project_application: String,
    pub withdrawal_application: String,
    pub can_apply: String,
    pub is_withdrawing: String,
    pub receipt_ready: String,
}

impl ApplicantRecord {
    pub fn construct(&self) -> Result<Applicant, RecordError> {
        let identity = Identity::new(
            UserId::from(self.id.trim()),
            self.name.clone(),
            self.age,
            parse_marital(&self.marital_status)?,
            blank_to_none(&self.password).map(str::to_string),
        )?;
        let mut applicant = Applicant::new(identity);
        applicant.set_can_apply(parse_flag(&self.can_apply, true));
        applicant.set_withdrawing(parse_flag(&self.is_withdrawing, false));
        applicant.set_receipt_ready(parse_flag(&self.receipt_ready, false));
        Ok(applicant)
    }

    pub fn from_entity(applicant: &Applicant) -> Self {
        Self {
            id: applicant.id().as_str().to_string(),
            name: applicant.identity.name.clone(),
            password: applicant.identity.password.clone(),
            age: applicant.identity.age,
            marital_status: applicant.identity.marital_status.label().to_string(),
            applied_project: applicant
                .applied_project()
                .map(|p| p.as_str().to_string())
                .unwrap_or_default(),
            project_application: applicant
                .project_application()
                .map(|a| a.as_str().to_string())
                .unwrap_or_default(),
            withdrawal_application: applicant
                .withdrawal_application()
                .map(|a| a.as_str().to_string())
                .unwrap_or_default(),
            can_apply: flag(applicant.can_apply()),
            is_withdrawing: flag(applicant.is_withdrawing()),
            receipt_ready: flag(applicant.receipt_ready()),
        }
    }
}

/// `officers.csv`: the applicant fields plus the three project link lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfficerRecord {
    pub id: String,
    pub name: String,
    pub password: String,
    pub age: u32,
    pub marital_status: String,
    pub applied_project: String,
    pub project_application: String,
    pub withdrawal_application: String,
    pub can_apply: String,
    pub is_withdrawing: String,
    pub receipt_ready: String,
    pub joined_projects: String,
    pub registered_projects: String,
    pub project_registrations: String,
}

impl OfficerRecord {
    pub fn construct(&self) -> Result<Officer, RecordError> {
        let identity = Identity::new(
            UserId::from(self.id.trim()),
            self.name.clone(),
            self.age,
            parse_marital(&self.marital_status)?,
            blank_to_none(&self.password).map(str::to_string),
        )?;
        let mut officer = Officer::new(identity);
        let applicant = officer.applicant_mut();
        applicant.set_can_apply(parse_flag(&self.can_apply, true));
        applicant.set_withdrawing(parse_flag(&self.is_withdrawing, false));
        applicant.set_receipt_ready(parse_flag(&self.receipt_ready, false));
        Ok(officer)
    }

    pub fn from_entity(officer: &Officer) -> Self {
        let applicant = ApplicantRecord::from_entity(officer.applicant());
        Self {
            id: applicant.id,
            name: applicant.name,
            password: applicant.password,
            age: applicant.age,
            marital_status: applicant.marital_status,
            applied_project: applicant.applied_project,
            project_application: applicant.project_application,
            withdrawal_application: applicant.withdrawal_application,
            can_apply: applicant.can_apply,
            is_withdrawing: applicant.is_withdrawing,
            receipt_ready: applicant.receipt_ready,
            joined_projects: join_ids(officer.joined_projects().iter().map(|p| p.as_str())),
            registered_projects: join_ids(
                officer.registered_projects().iter().map(|p| p.as_str()),
            ),
            project_registrations: join_ids(
                officer.project_registrations().iter().map(|a| a.as_str()),
            ),
        }
    }
}

/// `managers.csv`: identity only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManagerRecord {
    pub id: String,
    pub name: String,
    pub password: String,
    pub age: u32,
    pub marital_status: String,
}

impl ManagerRecord {
    pub fn construct(&self) -> Result<Manager, RecordError> {
        let identity = Identity::new(
            UserId::from(self.id.trim()),
            self.name.clone(),
            self.age,
            parse_marital(&self.marital_status)?,
            blank_to_none(&self.password).map(str::to_string),
        )?;
        Ok(Manager::new(identity))
    }

    pub fn from_entity(manager: &Manager) -> Self {
        Self {
            id: manager.id().as_str().to_string(),
            name: manager.identity.name.clone(),
            password: manager.identity.password.clone(),
            age: manager.identity.age,
            marital_status: manager.identity.marital_status.label().to_string(),
        }
    }
}

/// `projects.csv`. Dates are stored as `DD-MM-YYYY` literals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub id: String,
    pub name: String,
    pub unit_count: u32,
    pub neighbourhood: String,
    pub room_type: String,
    pub selling_price: f64,
    pub application_start: String,
    pub application_end: String,
    pub manager: String,
    pub officer_slots: u32,
    pub officers: String,
    pub visible: String,
}

impl ProjectRecord {
    /// Builds the project around links the loader already resolved.
    pub fn construct(
        &self,
        manager: Option<UserId>,
        officers: Vec<UserId>,
    ) -> Result<Project, RecordError> {
        let room_type = RoomType::parse(&self.room_type)
            .ok_or_else(|| RecordError::UnknownRoomType(self.room_type.clone()))?;
        Ok(Project::new(
            ProjectId::from(self.id.trim()),
            self.name.clone(),
            self.unit_count,
            self.neighbourhood.clone(),
            room_type,
            self.selling_price,
            parse_record_date(&self.application_start)?,
            parse_record_date(&self.application_end)?,
            manager,
            self.officer_slots,
            officers,
            parse_flag(&self.visible, true),
        ))
    }

    pub fn from_entity(project: &Project) -> Self {
        Self {
            id: project.id.as_str().to_string(),
            name: project.name.clone(),
            unit_count: project.unit_count(),
            neighbourhood: project.neighbourhood.clone(),
            room_type: project.room_type.label().to_string(),
            selling_price: project.selling_price,
            application_start: dates::format_date(project.application_start),
            application_end: dates::format_date(project.application_end),
            manager: project
                .manager
                .as_ref()
                .map(|m| m.as_str().to_string())
                .unwrap_or_default(),
            officer_slots: project.officer_slots,
            officers: join_ids(project.officers.iter().map(|o| o.as_str())),
            visible: flag(project.visible),
        }
    }
}

/// `applications.csv`: id, submitter, project, kind, status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub id: String,
    pub user: String,
    pub project: String,
    pub kind: String,
    pub status: String,
}

impl ApplicationRecord {
    /// Parses kind and status. The returned application is still `Pending`;
    /// the loader applies the persisted status through the transition guard.
    pub fn construct(&self) -> Result<(Application, ApplicationStatus), RecordError> {
        let kind = ApplicationKind::parse(&self.kind)
            .ok_or_else(|| RecordError::UnknownKind(self.kind.clone()))?;
        let status = ApplicationStatus::parse(&self.status)
            .ok_or_else(|| RecordError::UnknownStatus(self.status.clone()))?;
        let application = Application::new(
            crate::domain::ApplicationId::from(self.id.trim()),
            UserId::from(self.user.trim()),
            ProjectId::from(self.project.trim()),
            kind,
        );
        Ok((application, status))
    }

    pub fn from_entity(application: &Application) -> Self {
        Self {
            id: application.id.as_str().to_string(),
            user: application.user.as_str().to_string(),
            project: application.project.as_str().to_string(),
            kind: application.kind().label().to_string(),
            status: application.status().label().to_string(),
        }
    }
}

/// `enquiries.csv`. The staff snapshot is not persisted; the loader rebuilds
/// it from the linked project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnquiryRecord {
    pub id: String,
    pub filer: String,
    pub project: String,
    pub question: String,
    pub reply: String,
}

impl EnquiryRecord {
    pub fn from_entity(enquiry: &Enquiry) -> Self {
        Self {
            id: enquiry.id.as_str().to_string(),
            filer: enquiry.filer.as_str().to_string(),
            project: enquiry.project.as_str().to_string(),
            question: enquiry.question().to_string(),
            reply: enquiry.reply().unwrap_or_default().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_tokens_mean_absent() {
        assert_eq!(blank_to_none(""), None);
        assert_eq!(blank_to_none("   "), None);
        assert_eq!(blank_to_none(" p-1 "), Some("p-1"));
    }

    #[test]
    fn id_lists_round_trip_through_semicolons() {
        let joined = join_ids(["p-1", "p-2"]);
        assert_eq!(joined, "p-1;p-2");
        assert_eq!(split_ids(&joined), ["p-1", "p-2"]);
        assert!(split_ids("").is_empty());
        assert_eq!(split_ids("p-1;;p-2;"), ["p-1", "p-2"]);
    }

    #[test]
    fn flags_fall_back_to_their_default() {
        assert!(parse_flag("true", false));
        assert!(!parse_flag("false", true));
        assert!(parse_flag("", true));
        assert!(!parse_flag("yes", false));
    }

    #[test]
    fn applicant_record_restores_flags() {
        let record = ApplicantRecord {
            id: "S1234567A".to_string(),
            name: "Tan Mei".to_string(),
            password: String::new(),
            age: 34,
            marital_status: "MARRIED".to_string(),
            applied_project: "p-1".to_string(),
            project_application: String::new(),
            withdrawal_application: String::new(),
            can_apply: "false".to_string(),
            is_withdrawing: "true".to_string(),
            receipt_ready: String::new(),
        };
        let applicant = record.construct().expect("valid record");
        assert!(!applicant.can_apply());
        assert!(applicant.is_withdrawing());
        assert!(!applicant.receipt_ready());
        assert_eq!(applicant.identity.password, "password");
        // Link fields are the loader's job.
        assert_eq!(applicant.applied_project(), None);
    }

    #[test]
    fn bad_marital_status_is_an_error() {
        let record = ManagerRecord {
            id: "S7000001A".to_string(),
            name: "Koh".to_string(),
            password: "secret".to_string(),
            age: 50,
            marital_status: "DIVORCED".to_string(),
        };
        assert!(matches!(
            record.construct(),
            Err(RecordError::UnknownMaritalStatus(_))
        ));
    }

    #[test]
    fn application_record_parses_kind_and_status() {
        let record = ApplicationRecord {
            id: "a-1".to_string(),
            user: "S1234567A".to_string(),
            project: "p-1".to_string(),
            kind: "WITHDRAWAL_APPLICATION".to_string(),
            status: "SUCCESSFUL".to_string(),
        };
        let (application, status) = record.construct().expect("valid record");
        assert_eq!(application.kind(), ApplicationKind::Withdrawal);
        assert_eq!(application.status(), ApplicationStatus::Pending);
        assert_eq!(status, ApplicationStatus::Successful);
    }

    #[test]
    fn project_record_round_trips() {
        let project = Project::new(
            ProjectId::from("p-1"),
            "Maple Grove".to_string(),
            12,
            "Yishun".to_string(),
            RoomType::ThreeRoom,
            410_000.0,
            chrono::NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid date"),
            chrono::NaiveDate::from_ymd_opt(2025, 3, 31).expect("valid date"),
            Some(UserId::from("S7000001A")),
            5,
            vec![UserId::from("S2000001C")],
            false,
        );
        let record = ProjectRecord::from_entity(&project);
        assert_eq!(record.application_start, "01-01-2025");
        assert_eq!(record.officers, "S2000001C");
        let rebuilt = record
            .construct(Some(UserId::from("S7000001A")), vec![UserId::from("S2000001C")])
            .expect("valid record");
        assert_eq!(rebuilt, project);
    }
}
