//! Admin authentication extractor.
//!
//! The console is an API surface: every request carries the admin's bearer
//! token, which is resolved against the auth provider and checked for an
//! admin role. There is no session here.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::backend::{BackendError, VerifiedUser};
use crate::error::AdminError;
use crate::state::AppState;

/// Extractor that requires an admin-role bearer token.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAdmin(admin): RequireAdmin,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", admin.email)
/// }
/// ```
pub struct RequireAdmin(pub VerifiedUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AdminError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .ok_or_else(|| AdminError::Unauthorized("missing bearer token".to_string()))?;

        let user = match state.backend().verify_user(token).await {
            Ok(user) => user,
            Err(BackendError::InvalidToken) => {
                return Err(AdminError::Unauthorized("invalid token".to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        if !user.role.is_admin() {
            tracing::warn!(user_id = %user.id, "non-admin token on admin console");
            return Err(AdminError::Forbidden(
                "admin role required".to_string(),
            ));
        }

        Ok(Self(user))
    }
}
