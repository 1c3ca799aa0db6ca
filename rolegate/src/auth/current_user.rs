use axum::{extract::FromRequestParts, http::HeaderMap, http::request::Parts};
use tracing::{debug, instrument, trace};

use crate::{
    AppState,
    api::models::users::CurrentUser,
    auth::session,
    errors::{Error, Result},
    types::abbrev_uuid,
};

/// Resolve the session user from request headers.
///
/// Every session cookie is tried in order; the first one whose signature verifies decides the
/// outcome. Returns `Ok(None)` when no cookie verifies or when the signed user no longer exists.
/// Store failures propagate.
#[instrument(skip_all)]
pub async fn resolve_current_user(headers: &HeaderMap, state: &AppState) -> Result<Option<CurrentUser>> {
    let cookie_name = &state.config.auth.session.cookie_name;

    for token in session::read_session_cookies(headers, cookie_name) {
        let Some(user_id) = session::verify_session_token(token, &state.config)? else {
            trace!("Ignoring session cookie with invalid signature");
            continue;
        };

        return match state.users.get_by_id(user_id).await? {
            Some(user) => {
                debug!(user_id = %abbrev_uuid(&user.id), "Resolved session user");
                Ok(Some(user.into()))
            }
            None => {
                debug!(user_id = %abbrev_uuid(&user_id), "Session refers to a user that no longer exists");
                Ok(None)
            }
        };
    }

    Ok(None)
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Error;

    #[instrument(skip_all)]
    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        resolve_current_user(&parts.headers, state).await?.ok_or(Error::Unauthenticated)
    }
}
