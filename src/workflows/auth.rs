//! Password-based sign-in and password changes.

use crate::domain::{Role, User, UserId};
use crate::store::Store;
use crate::workflows::WorkflowError;

/// Checks the user's password and returns the role they act under.
pub fn authenticate(store: &Store, user_id: &UserId, password: &str) -> Result<Role, WorkflowError> {
    let user = store
        .user(user_id)
        .ok_or_else(|| WorkflowError::UnknownUser(user_id.clone()))?;
    if user.identity().password != password {
        return Err(WorkflowError::IncorrectPassword);
    }
    Ok(user.role())
}

/// Replaces the user's password after verifying the current one.
pub fn change_password(
    store: &mut Store,
    user_id: &UserId,
    current: &str,
    new: &str,
) -> Result<(), WorkflowError> {
    if new.trim().is_empty() {
        return Err(WorkflowError::EmptyPassword);
    }
    authenticate(store, user_id, current)?;
    let user = store
        .user_mut(user_id)
        .ok_or_else(|| WorkflowError::UnknownUser(user_id.clone()))?;
    match user {
        User::Applicant(applicant) => applicant.identity.password = new.to_string(),
        User::Officer(officer) => officer.applicant_mut().identity.password = new.to_string(),
        User::Manager(manager) => manager.identity.password = new.to_string(),
    }
    Ok(())
}
