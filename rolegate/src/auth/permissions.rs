//! Role checks. A single required role, compared by exact equality: `ADMIN` does not satisfy a
//! `USER` requirement and vice versa.

use crate::api::models::users::{CurrentUser, Role};
use thiserror::Error;

/// Raised when a user lacks the required role. The fields are for logs, not for clients.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Forbidden: user \"{user_name}\" does not have required role \"{required}\"")]
pub struct AuthorizationError {
    pub user_name: String,
    pub required: Role,
}

pub fn has_role(user: &CurrentUser, required: Role) -> bool {
    user.role == required
}

pub fn require_role(user: &CurrentUser, required: Role) -> Result<(), AuthorizationError> {
    if has_role(user, required) {
        Ok(())
    } else {
        Err(AuthorizationError {
            user_name: user.name.clone(),
            required,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn user_with(role: Role) -> CurrentUser {
        CurrentUser {
            id: Uuid::new_v4(),
            name: "carol".to_string(),
            email: None,
            role,
        }
    }

    #[test]
    fn test_exact_match_only() {
        assert!(has_role(&user_with(Role::Admin), Role::Admin));
        assert!(has_role(&user_with(Role::User), Role::User));
        assert!(!has_role(&user_with(Role::Admin), Role::User));
        assert!(!has_role(&user_with(Role::User), Role::Admin));
    }

    #[test]
    fn test_require_role_error_names_user_and_role() {
        let err = require_role(&user_with(Role::User), Role::Admin).unwrap_err();
        assert_eq!(err.user_name, "carol");
        assert_eq!(err.required, Role::Admin);
        assert_eq!(err.to_string(), "Forbidden: user \"carol\" does not have required role \"ADMIN\"");

        assert!(require_role(&user_with(Role::Admin), Role::Admin).is_ok());
    }
}
