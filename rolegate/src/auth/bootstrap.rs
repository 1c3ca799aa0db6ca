//! Signup role assignment.
//!
//! The first account created in an empty system may pick its role and becomes an administrator
//! when it does not ask for one. Once any user exists, every signup is a standard user, whatever
//! role it requested. Stores evaluate [`assign_role`] inside the same atomic section as the
//! insert, so two concurrent first signups cannot both observe [`SystemState::Empty`].

use crate::api::models::users::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemState {
    /// No user has been created yet
    Empty,
    /// At least one user exists
    Populated,
}

impl SystemState {
    pub fn from_user_count(count: i64) -> Self {
        if count == 0 { SystemState::Empty } else { SystemState::Populated }
    }
}

pub fn assign_role(state: SystemState, requested: Option<Role>) -> Role {
    match state {
        SystemState::Empty => requested.unwrap_or(Role::Admin),
        SystemState::Populated => Role::User,
    }
}
