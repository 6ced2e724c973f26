use serde::{Deserialize, Serialize};

use super::{ApplicationId, ProjectId, UserId};

/// Lifecycle state of an application. `Pending` is the initial state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicationStatus {
    Pending,
    Successful,
    Unsuccessful,
    Booked,
    Withdrawn,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "PENDING",
            ApplicationStatus::Successful => "SUCCESSFUL",
            ApplicationStatus::Unsuccessful => "UNSUCCESSFUL",
            ApplicationStatus::Booked => "BOOKED",
            ApplicationStatus::Withdrawn => "WITHDRAWN",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "PENDING" => Some(ApplicationStatus::Pending),
            "SUCCESSFUL" => Some(ApplicationStatus::Successful),
            "UNSUCCESSFUL" => Some(ApplicationStatus::Unsuccessful),
            "BOOKED" => Some(ApplicationStatus::Booked),
            "WITHDRAWN" => Some(ApplicationStatus::Withdrawn),
            _ => None,
        }
    }
}

/// The three application kinds. The kind is fixed at creation and selects
/// which status transitions are legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicationKind {
    Bto,
    ProjectRegistration,
    Withdrawal,
}

impl ApplicationKind {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationKind::Bto => "BTO_APPLICATION",
            ApplicationKind::ProjectRegistration => "PROJECT_REGISTRATION",
            ApplicationKind::Withdrawal => "WITHDRAWAL_APPLICATION",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "BTO_APPLICATION" => Some(ApplicationKind::Bto),
            "PROJECT_REGISTRATION" => Some(ApplicationKind::ProjectRegistration),
            "WITHDRAWAL_APPLICATION" => Some(ApplicationKind::Withdrawal),
            _ => None,
        }
    }
}

/// An application submitted by a user against a project.
#[derive(Debug, Clone, PartialEq)]
pub struct Application {
    pub id: ApplicationId,
    pub user: UserId,
    pub project: ProjectId,
    kind: ApplicationKind,
    status: ApplicationStatus,
}

impl Application {
    pub fn new(id: ApplicationId, user: UserId, project: ProjectId, kind: ApplicationKind) -> Self {
        Self {
            id,
            user,
            project,
            kind,
            status: ApplicationStatus::Pending,
        }
    }

    pub fn kind(&self) -> ApplicationKind {
        self.kind
    }

    pub fn status(&self) -> ApplicationStatus {
        self.status
    }

    /// Writes the status without consulting the transition guard. Only the
    /// lifecycle engine calls this, after the guard has passed.
    pub(crate) fn force_status(&mut self, status: ApplicationStatus) {
        self.status = status;
    }
}
