use crate::api::models::users::Role;
use crate::auth::permissions::AuthorizationError;
use crate::db::errors::DbError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;
use utoipa::ToSchema;

#[derive(ThisError, Debug)]
pub enum Error {
    /// Malformed or missing required fields
    #[error("Invalid input: {message}")]
    InvalidInput { message: &'static str },

    /// A user with the same email (or name, when no email was given) already exists
    #[error("User already exists")]
    Conflict,

    /// Login identifiers matched no user
    #[error("No user matches the supplied login identifiers")]
    InvalidCredentials,

    /// No resolvable session on the request
    #[error("Not authenticated")]
    Unauthenticated,

    /// Authenticated, but the user's role does not match
    #[error(transparent)]
    Forbidden(#[from] AuthorizationError),

    /// Database operation error
    #[error(transparent)]
    Database(#[from] DbError),

    /// Generic internal service error
    #[error("Failed to {operation}")]
    Internal { operation: String },
}

/// JSON body of every error response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error kind, e.g. "InvalidInput" or "Forbidden"
    pub error: String,
    /// Human-readable, static message for the error kind
    pub message: String,
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            Error::Conflict => StatusCode::CONFLICT,
            Error::InvalidCredentials | Error::Unauthenticated => StatusCode::UNAUTHORIZED,
            Error::Forbidden(_) => StatusCode::FORBIDDEN,
            Error::Database(db_err) => match db_err {
                DbError::UniqueViolation { .. } => StatusCode::CONFLICT,
                DbError::NotFound | DbError::Unavailable(_) | DbError::Other(_) => StatusCode::SERVICE_UNAVAILABLE,
            },
            Error::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The error kind reported in the `error` field of the response body
    pub fn kind(&self) -> &'static str {
        match self {
            Error::InvalidInput { .. } => "InvalidInput",
            Error::Conflict | Error::Database(DbError::UniqueViolation { .. }) => "Conflict",
            Error::InvalidCredentials => "InvalidCredentials",
            Error::Unauthenticated => "Unauthenticated",
            Error::Forbidden(_) => "Forbidden",
            Error::Database(_) => "StorageUnavailable",
            Error::Internal { .. } => "InternalError",
        }
    }

    /// Returns a user-safe error message, without leaking internal implementation details
    pub fn user_message(&self) -> &'static str {
        match self {
            Error::InvalidInput { message } => *message,
            Error::Conflict | Error::Database(DbError::UniqueViolation { .. }) => "A user with this name or email already exists.",
            Error::InvalidCredentials => "No matching user found. Please sign up first.",
            Error::Unauthenticated => "You must be logged in to access this resource.",
            Error::Forbidden(e) => match e.required {
                Role::Admin => "You must be an admin to access this resource.",
                Role::User => "You must be a standard user to access this resource.",
            },
            Error::Database(_) => "The user store is temporarily unavailable. Please try again later.",
            Error::Internal { .. } => "Internal server error",
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // Log full error details for debugging - different log levels based on severity
        match &self {
            Error::Database(DbError::UniqueViolation { .. }) => {
                tracing::warn!("Database constraint error: {}", self);
            }
            Error::Database(_) | Error::Internal { .. } => {
                tracing::error!("Internal service error: {:#}", self);
            }
            Error::Unauthenticated | Error::InvalidCredentials | Error::Forbidden(_) => {
                tracing::info!("Authorization error: {}", self);
            }
            Error::InvalidInput { .. } => {
                tracing::debug!("Client error: {}", self);
            }
            Error::Conflict => {
                tracing::warn!("Conflict error: {}", self);
            }
        }

        let body = ErrorResponse {
            error: self.kind().to_string(),
            message: self.user_message().to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

/// Type alias for service operation results
pub type Result<T> = std::result::Result<T, Error>;
