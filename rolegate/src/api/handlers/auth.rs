use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use tracing::{debug, info};

use crate::{
    AppState,
    api::models::{
        auth::{AuthResponse, AuthSuccessResponse, LoginError, LoginRequest, LoginResponse, LogoutResponse, SignupRequest, SignupResponse},
        users::{CurrentUser, Role, UserResponse},
    },
    auth::session,
    db::models::users::BootstrapCreateDBRequest,
    errors::{Error, ErrorResponse},
    types::abbrev_uuid,
};

/// Trim a field, treating blank values as absent
fn normalize(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Sign up a new user
///
/// The first user in an empty system gets the requested role, or `ADMIN` when none (or an unknown
/// one) was requested. Every later signup is a `USER`.
#[utoipa::path(
    post,
    path = "/auth/signup",
    request_body = SignupRequest,
    tag = "authentication",
    responses(
        (status = 201, description = "User created", body = AuthResponse),
        (status = 400, description = "Name is missing", body = ErrorResponse),
        (status = 409, description = "A user with this email (or name) already exists", body = ErrorResponse),
        (status = 503, description = "User store unavailable", body = ErrorResponse),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn signup(State(state): State<AppState>, payload: Result<Json<SignupRequest>, JsonRejection>) -> Result<SignupResponse, Error> {
    // A malformed body is treated as an empty one
    let request = payload.map(|Json(request)| request).unwrap_or_default();

    let Some(name) = normalize(Some(request.name.as_str())) else {
        return Err(Error::InvalidInput {
            message: "Name is required.",
        });
    };
    let email = normalize(request.email.as_deref());

    // Existing user by email when given, otherwise by name
    if state.users.get_by_email_or_name(email, Some(name)).await?.is_some() {
        return Err(Error::Conflict);
    }

    let requested_role = request.role.as_deref().and_then(|role| match role.parse::<Role>() {
        Ok(role) => Some(role),
        Err(e) => {
            debug!("Ignoring requested role: {e}");
            None
        }
    });

    let created = state
        .users
        .create_bootstrapped(&BootstrapCreateDBRequest {
            name: name.to_string(),
            email: email.map(str::to_string),
            requested_role,
        })
        .await?;

    info!(user_id = %abbrev_uuid(&created.id), role = %created.role, "User signed up");

    Ok(SignupResponse {
        auth_response: AuthResponse {
            user: UserResponse::from(created),
        },
    })
}

/// Log in by email or name
///
/// On success a session cookie is set. When no user matches, any existing session cookie is
/// cleared.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    tag = "authentication",
    responses(
        (status = 200, description = "Login successful; session cookie set", body = AuthResponse),
        (status = 400, description = "Neither name nor email supplied", body = ErrorResponse),
        (status = 401, description = "No matching user; session cookie cleared", body = ErrorResponse),
        (status = 503, description = "User store unavailable", body = ErrorResponse),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn login(State(state): State<AppState>, payload: Result<Json<LoginRequest>, JsonRejection>) -> Result<LoginResponse, LoginError> {
    let request = payload.map(|Json(request)| request).unwrap_or_default();

    let email = normalize(request.email.as_deref());
    let name = normalize(request.name.as_deref());
    if email.is_none() && name.is_none() {
        return Err(Error::InvalidInput {
            message: "Provide at least a name or an email.",
        }
        .into());
    }

    let Some(user) = state.users.get_by_email_or_name(email, name).await.map_err(Error::from)? else {
        return Err(LoginError {
            error: Error::InvalidCredentials,
            clear_cookie: Some(session::clear_session_cookie(&state.config.auth.session)),
        });
    };

    let token = session::create_session_token(user.id, &state.config)?;
    let cookie = session::session_cookie(&token, &state.config.auth.session);

    info!(user_id = %abbrev_uuid(&user.id), "User logged in");

    Ok(LoginResponse {
        auth_response: AuthResponse {
            user: UserResponse::from(user),
        },
        cookie,
    })
}

/// Log out, clearing the session cookie
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "authentication",
    responses(
        (status = 200, description = "Logged out; session cookie cleared", body = AuthSuccessResponse),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn logout(State(state): State<AppState>) -> LogoutResponse {
    LogoutResponse {
        auth_response: AuthSuccessResponse {
            message: "Logged out.".to_string(),
        },
        cookie: session::clear_session_cookie(&state.config.auth.session),
    }
}

/// Get the user behind the current session
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "authentication",
    responses(
        (status = 200, description = "Current user", body = AuthResponse),
        (status = 401, description = "No valid session", body = ErrorResponse),
        (status = 503, description = "User store unavailable", body = ErrorResponse),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn me(current_user: CurrentUser) -> Json<AuthResponse> {
    Json(AuthResponse {
        user: UserResponse::from(current_user),
    })
}
