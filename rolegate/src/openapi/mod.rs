//! OpenAPI documentation, served as JSON at `/openapi.json` and rendered at `/docs`.

use utoipa::{
    Modify, OpenApi,
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
};

use crate::{api, errors};

/// Documents the session cookie as the security scheme of protected routes.
struct SessionCookieAddon;

impl Modify for SessionCookieAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.security_schemes.insert(
                "SessionCookie".to_string(),
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                    "demo_session_user_id",
                    "Signed session cookie set by `POST /auth/login`. The cookie name is configurable.",
                ))),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SessionCookieAddon),
    paths(
        api::handlers::auth::signup,
        api::handlers::auth::login,
        api::handlers::auth::logout,
        api::handlers::auth::me,
        api::handlers::admin::get_admin,
    ),
    components(
        schemas(
            api::models::users::Role,
            api::models::users::UserResponse,
            api::models::auth::SignupRequest,
            api::models::auth::LoginRequest,
            api::models::auth::AuthResponse,
            api::models::auth::AuthSuccessResponse,
            api::models::admin::AdminResponse,
            api::models::admin::ExampleAdminData,
            errors::ErrorResponse,
        )
    ),
    tags(
        (name = "authentication", description = "Signup, login and session management. There are no passwords: \
            a login names a user by email or name and receives a signed session cookie."),
        (name = "admin", description = "Resources restricted to users with the `ADMIN` role."),
    ),
    info(
        title = "rolegate",
        description = "Cookie-session authentication with role-based access control.",
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in ["/auth/signup", "/auth/login", "/auth/logout", "/auth/me", "/admin"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }

        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("SessionCookie"));
        assert!(components.schemas.contains_key("UserResponse"));
    }
}
