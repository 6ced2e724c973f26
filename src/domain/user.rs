use serde::{Deserialize, Serialize};

use super::{ApplicationId, ProjectId, UserId};

/// Marital status recorded for every user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaritalStatus {
    Single,
    Married,
}

impl MaritalStatus {
    pub const fn label(self) -> &'static str {
        match self {
            MaritalStatus::Single => "SINGLE",
            MaritalStatus::Married => "MARRIED",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "SINGLE" => Some(MaritalStatus::Single),
            "MARRIED" => Some(MaritalStatus::Married),
            _ => None,
        }
    }
}

/// Role a user acts under. Officers carry the full applicant capability set
/// on top of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Applicant,
    Officer,
    Manager,
}

/// Checks the NRIC-like identifier format: nine characters, a leading `S` or
/// `T`, seven digits, and a trailing letter.
pub fn is_valid_nric(id: &str) -> bool {
    let bytes = id.as_bytes();
    if bytes.len() != 9 {
        return false;
    }
    if bytes[0] != b'S' && bytes[0] != b'T' {
        return false;
    }
    if !bytes[8].is_ascii_alphabetic() {
        return false;
    }
    bytes[1..8].iter().all(u8::is_ascii_digit)
}

/// Error raised when identity details fail validation.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("user id '{0}' is not a valid NRIC")]
    InvalidId(String),
    #[error("age must be positive")]
    InvalidAge,
}

/// Immutable identity shared by every user variant.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub id: UserId,
    pub name: String,
    pub age: u32,
    pub marital_status: MaritalStatus,
    pub password: String,
}

impl Identity {
    /// Validates the id format and age. An empty password falls back to the
    /// default one.
    pub fn new(
        id: UserId,
        name: String,
        age: u32,
        marital_status: MaritalStatus,
        password: Option<String>,
    ) -> Result<Self, IdentityError> {
        if !is_valid_nric(id.as_str()) {
            return Err(IdentityError::InvalidId(id.0));
        }
        if age == 0 {
            return Err(IdentityError::InvalidAge);
        }
        let password = match password {
            Some(p) if !p.is_empty() => p,
            _ => "password".to_string(),
        };
        Ok(Self {
            id,
            name,
            age,
            marital_status,
            password,
        })
    }

    pub fn is_married(&self) -> bool {
        self.marital_status == MaritalStatus::Married
    }
}

/// An applicant and the state of their current application, if any.
///
/// The applied project, application links, and flags move together: assigning
/// an applied project always clears the ability to apply again.
#[derive(Debug, Clone, PartialEq)]
pub struct Applicant {
    pub identity: Identity,
    applied_project: Option<ProjectId>,
    project_application: Option<ApplicationId>,
    withdrawal_application: Option<ApplicationId>,
    can_apply: bool,
    is_withdrawing: bool,
    receipt_ready: bool,
    receipt: Option<String>,
}

impl Applicant {
    pub fn new(identity: Identity) -> Self {
        Self {
            identity,
            applied_project: None,
            project_application: None,
            withdrawal_application: None,
            can_apply: true,
            is_withdrawing: false,
            receipt_ready: false,
            receipt: None,
        }
    }

    pub fn id(&self) -> &UserId {
        &self.identity.id
    }

    pub fn applied_project(&self) -> Option<&ProjectId> {
        self.applied_project.as_ref()
    }

    pub fn project_application(&self) -> Option<&ApplicationId> {
        self.project_application.as_ref()
    }

    pub fn withdrawal_application(&self) -> Option<&ApplicationId> {
        self.withdrawal_application.as_ref()
    }

    pub fn can_apply(&self) -> bool {
        self.can_apply
    }

    pub fn is_withdrawing(&self) -> bool {
        self.is_withdrawing
    }

    pub fn receipt_ready(&self) -> bool {
        self.receipt_ready
    }

    pub fn receipt(&self) -> Option<&str> {
        self.receipt.as_deref()
    }

    /// Records the project applied to. Applying locks further applications
    /// and cancels any in-flight withdrawal flag.
    pub fn assign_applied_project(&mut self, project: ProjectId) {
        self.applied_project = Some(project);
        self.can_apply = false;
        self.is_withdrawing = false;
    }

    pub fn clear_applied_project(&mut self) {
        self.applied_project = None;
    }

    pub fn set_project_application(&mut self, application: ApplicationId) {
        self.project_application = Some(application);
        self.can_apply = false;
        self.is_withdrawing = false;
    }

    pub fn set_withdrawal_application(&mut self, application: ApplicationId) {
        self.withdrawal_application = Some(application);
        self.is_withdrawing = true;
    }

    pub fn set_can_apply(&mut self, can_apply: bool) {
        self.can_apply = can_apply;
    }

    pub fn set_withdrawing(&mut self, withdrawing: bool) {
        self.is_withdrawing = withdrawing;
    }

    pub fn set_receipt_ready(&mut self, ready: bool) {
        self.receipt_ready = ready;
    }

    /// Builds the booking receipt text and marks it ready.
    pub fn generate_receipt(&mut self, project_name: &str) {
        self.receipt_ready = true;
        self.receipt = Some(format!(
            "Name: {}\nNRIC: {}\nAge: {}\nMarital Status: {}\nProject: {}",
            self.identity.name,
            self.identity.id,
            self.identity.age,
            if self.identity.is_married() {
                "Married"
            } else {
                "Single"
            },
            project_name,
        ));
    }
}

/// An officer embeds the applicant state (officers may apply like anyone
/// else) and tracks the projects they administer.
#[derive(Debug, Clone, PartialEq)]
pub struct Officer {
    applicant: Applicant,
    joined_projects: Vec<ProjectId>,
    registered_projects: Vec<ProjectId>,
    prohibited_projects: Vec<ProjectId>,
    project_registrations: Vec<ApplicationId>,
}

impl Officer {
    pub fn new(identity: Identity) -> Self {
        Self {
            applicant: Applicant::new(identity),
            joined_projects: Vec::new(),
            registered_projects: Vec::new(),
            prohibited_projects: Vec::new(),
            project_registrations: Vec::new(),
        }
    }

    pub fn id(&self) -> &UserId {
        self.applicant.id()
    }

    pub fn applicant(&self) -> &Applicant {
        &self.applicant
    }

    pub fn applicant_mut(&mut self) -> &mut Applicant {
        &mut self.applicant
    }

    pub fn joined_projects(&self) -> &[ProjectId] {
        &self.joined_projects
    }

    pub fn registered_projects(&self) -> &[ProjectId] {
        &self.registered_projects
    }

    pub fn prohibited_projects(&self) -> &[ProjectId] {
        &self.prohibited_projects
    }

    pub fn project_registrations(&self) -> &[ApplicationId] {
        &self.project_registrations
    }

    pub fn is_prohibited(&self, project: &ProjectId) -> bool {
        self.prohibited_projects.contains(project)
    }

    /// Records a pending registration for a project. The project immediately
    /// becomes prohibited for this officer's applicant side.
    pub fn register_project(&mut self, project: ProjectId, registration: ApplicationId) {
        self.mark_prohibited(project.clone());
        self.registered_projects.push(project);
        self.project_registrations.push(registration);
    }

    /// Moves a project from the registered set into the joined set, keeping
    /// it prohibited.
    pub fn join_project(&mut self, project: ProjectId) {
        self.registered_projects.retain(|p| *p != project);
        self.mark_prohibited(project.clone());
        if !self.joined_projects.contains(&project) {
            self.joined_projects.push(project);
        }
    }

    pub fn mark_prohibited(&mut self, project: ProjectId) {
        if !self.prohibited_projects.contains(&project) {
            self.prohibited_projects.push(project);
        }
    }

    /// Restores the link sets from persisted identifiers. The prohibited set
    /// is rebuilt as the union of joined and registered.
    pub fn restore_links(
        &mut self,
        joined: Vec<ProjectId>,
        registered: Vec<ProjectId>,
        registrations: Vec<ApplicationId>,
    ) {
        self.prohibited_projects.clear();
        for project in joined.iter().chain(registered.iter()) {
            if !self.prohibited_projects.contains(project) {
                self.prohibited_projects.push(project.clone());
            }
        }
        self.joined_projects = joined;
        self.registered_projects = registered;
        self.project_registrations = registrations;
    }
}

/// A manager owns projects and rules on their applications.
#[derive(Debug, Clone, PartialEq)]
pub struct Manager {
    pub identity: Identity,
}

impl Manager {
    pub fn new(identity: Identity) -> Self {
        Self { identity }
    }

    pub fn id(&self) -> &UserId {
        &self.identity.id
    }
}

/// Closed set of user variants. Role checks go through [`User::role`] and the
/// accessor methods instead of downcasts.
#[derive(Debug, Clone, PartialEq)]
pub enum User {
    Applicant(Applicant),
    Officer(Officer),
    Manager(Manager),
}

impl User {
    pub fn id(&self) -> &UserId {
        &self.identity().id
    }

    pub fn identity(&self) -> &Identity {
        match self {
            User::Applicant(a) => &a.identity,
            User::Officer(o) => &o.applicant().identity,
            User::Manager(m) => &m.identity,
        }
    }

    pub fn role(&self) -> Role {
        match self {
            User::Applicant(_) => Role::Applicant,
            User::Officer(_) => Role::Officer,
            User::Manager(_) => Role::Manager,
        }
    }

    /// The applicant view of this user, if the role carries one. Officers
    /// expose their embedded applicant state.
    pub fn as_applicant(&self) -> Option<&Applicant> {
        match self {
            User::Applicant(a) => Some(a),
            User::Officer(o) => Some(o.applicant()),
            User::Manager(_) => None,
        }
    }

    pub fn as_applicant_mut(&mut self) -> Option<&mut Applicant> {
        match self {
            User::Applicant(a) => Some(a),
            User::Officer(o) => Some(o.applicant_mut()),
            User::Manager(_) => None,
        }
    }

    pub fn as_officer(&self) -> Option<&Officer> {
        match self {
            User::Officer(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_officer_mut(&mut self) -> Option<&mut Officer> {
        match self {
            User::Officer(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_manager(&self) -> Option<&Manager> {
        match self {
            User::Manager(m) => Some(m),
            _ => None,
        }
    }
}
