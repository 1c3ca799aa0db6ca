use axum::Json;

use crate::{
    api::models::{
        admin::{AdminResponse, ExampleAdminData},
        users::{CurrentUser, Role, UserResponse},
    },
    auth::permissions,
    errors::{Error, ErrorResponse},
};

/// Admin-only resource
#[utoipa::path(
    get,
    path = "/admin",
    tag = "admin",
    responses(
        (status = 200, description = "Caller is an admin", body = AdminResponse),
        (status = 401, description = "No valid session", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
        (status = 503, description = "User store unavailable", body = ErrorResponse),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_admin(current_user: CurrentUser) -> Result<Json<AdminResponse>, Error> {
    permissions::require_role(&current_user, Role::Admin)?;

    Ok(Json(AdminResponse {
        message: "Welcome to the admin API.".to_string(),
        current_user: UserResponse::from(current_user),
        example_admin_data: ExampleAdminData {
            system_status: "ok".to_string(),
        },
    }))
}
