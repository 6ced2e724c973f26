//! Entity model for the allocation workflow: users, projects, applications,
//! and enquiries, all keyed by typed identifiers.
//!
//! Cross-entity links are stored as identifiers rather than references; the
//! [`crate::store::Store`] owns every entity and resolves links on demand.

mod application;
mod enquiry;
mod project;
mod user;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use application::{Application, ApplicationKind, ApplicationStatus};
pub use enquiry::Enquiry;
pub use project::{Project, RoomType};
pub use user::{
    is_valid_nric, Applicant, Identity, IdentityError, Manager, MaritalStatus, Officer, Role, User,
};

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

id_type! {
    /// National-ID-like user identifier (NRIC format).
    UserId
}

id_type! {
    /// Identifier of a housing project.
    ProjectId
}

id_type! {
    /// Identifier of an application of any kind.
    ApplicationId
}

id_type! {
    /// Identifier of an enquiry.
    EnquiryId
}
