//! The referential store: one collection per entity type, owned in one
//! place and handed by reference to every component that needs it.
//!
//! Collections are small, so lookup-by-id is a linear scan. Read-side
//! projections live in [`views`].

pub mod views;

use crate::domain::{
    Application, ApplicationId, Enquiry, EnquiryId, Project, ProjectId, User, UserId,
};

/// Owner of all users, projects, applications, and enquiries.
#[derive(Debug, Default)]
pub struct Store {
    users: Vec<User>,
    projects: Vec<Project>,
    applications: Vec<Application>,
    enquiries: Vec<Enquiry>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user(&mut self, user: User) {
        self.users.push(user);
    }

    pub fn add_project(&mut self, project: Project) {
        self.projects.push(project);
    }

    pub fn add_application(&mut self, application: Application) {
        self.applications.push(application);
    }

    pub fn add_enquiry(&mut self, enquiry: Enquiry) {
        self.enquiries.push(enquiry);
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn applications(&self) -> &[Application] {
        &self.applications
    }

    pub fn enquiries(&self) -> &[Enquiry] {
        &self.enquiries
    }

    pub fn user(&self, id: &UserId) -> Option<&User> {
        self.users.iter().find(|u| u.id() == id)
    }

    pub fn user_mut(&mut self, id: &UserId) -> Option<&mut User> {
        self.users.iter_mut().find(|u| u.id() == id)
    }

    pub fn project(&self, id: &ProjectId) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == *id)
    }

    pub fn project_mut(&mut self, id: &ProjectId) -> Option<&mut Project> {
        self.projects.iter_mut().find(|p| p.id == *id)
    }

    pub fn application(&self, id: &ApplicationId) -> Option<&Application> {
        self.applications.iter().find(|a| a.id == *id)
    }

    pub fn application_mut(&mut self, id: &ApplicationId) -> Option<&mut Application> {
        self.applications.iter_mut().find(|a| a.id == *id)
    }

    pub fn enquiry(&self, id: &EnquiryId) -> Option<&Enquiry> {
        self.enquiries.iter().find(|e| e.id == *id)
    }

    pub fn enquiry_mut(&mut self, id: &EnquiryId) -> Option<&mut Enquiry> {
        self.enquiries.iter_mut().find(|e| e.id == *id)
    }

    /// Enquiries are the only entities removed outright.
    pub fn remove_enquiry(&mut self, id: &EnquiryId) -> bool {
        let before = self.enquiries.len();
        self.enquiries.retain(|e| e.id != *id);
        self.enquiries.len() < before
    }

    /// Projects can be retired by the managing side; applications and users
    /// referring to it keep their identifiers and resolve to absent.
    pub fn remove_project(&mut self, id: &ProjectId) -> bool {
        let before = self.projects.len();
        self.projects.retain(|p| p.id != *id);
        self.projects.len() < before
    }
}
