//! API request/response models for signup, login and session endpoints.

use axum::{
    Json,
    http::{StatusCode, header},
    response::{AppendHeaders, IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{api::models::users::UserResponse, errors::Error};

/// Signup payload. Every field is optional at the wire level so that a missing name is reported
/// as invalid input rather than a deserialisation failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct SignupRequest {
    /// Display name; required, surrounding whitespace is ignored
    pub name: String,
    /// Optional email address, unique across users
    pub email: Option<String>,
    /// Requested role ("ADMIN" or "USER"); only honoured for the first user. Values that are not
    /// strings are treated as absent.
    #[serde(deserialize_with = "parse_requested_role")]
    pub role: Option<String>,
}

fn parse_requested_role<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RequestedRole {
        Text(String),
        Other(serde::de::IgnoredAny),
    }

    Ok(match RequestedRole::deserialize(deserializer)? {
        RequestedRole::Text(role) => Some(role),
        RequestedRole::Other(_) => None,
    })
}

/// Login payload. At least one of `name` or `email` is required; `email` wins when both are given.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct LoginRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Response body carrying a user
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub user: UserResponse,
}

/// Response body for operations that only report success
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthSuccessResponse {
    pub message: String,
}

/// Successful signup: `201 Created`
pub struct SignupResponse {
    pub auth_response: AuthResponse,
}

impl IntoResponse for SignupResponse {
    fn into_response(self) -> Response {
        (StatusCode::CREATED, Json(self.auth_response)).into_response()
    }
}

/// Successful login: the user plus a session cookie
pub struct LoginResponse {
    pub auth_response: AuthResponse,
    pub cookie: String,
}

impl IntoResponse for LoginResponse {
    fn into_response(self) -> Response {
        (
            StatusCode::OK,
            AppendHeaders([(header::SET_COOKIE, self.cookie)]),
            Json(self.auth_response),
        )
            .into_response()
    }
}

/// Failed login. When the login identifiers matched nobody the session cookie is cleared as well.
pub struct LoginError {
    pub error: Error,
    pub clear_cookie: Option<String>,
}

impl From<Error> for LoginError {
    fn from(error: Error) -> Self {
        Self { error, clear_cookie: None }
    }
}

impl IntoResponse for LoginError {
    fn into_response(self) -> Response {
        match self.clear_cookie {
            Some(cookie) => (AppendHeaders([(header::SET_COOKIE, cookie)]), self.error).into_response(),
            None => self.error.into_response(),
        }
    }
}

/// Successful logout: a message plus a cookie that removes the session
pub struct LogoutResponse {
    pub auth_response: AuthSuccessResponse,
    pub cookie: String,
}

impl IntoResponse for LogoutResponse {
    fn into_response(self) -> Response {
        (
            StatusCode::OK,
            AppendHeaders([(header::SET_COOKIE, self.cookie)]),
            Json(self.auth_response),
        )
            .into_response()
    }
}
