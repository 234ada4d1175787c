//! Session-related types.
//!
//! Types stored in the session for authentication and cart state.

use serde::{Deserialize, Serialize};

use crate::services::auth::{AuthToken, AuthUser};

/// Session-stored authentication state.
///
/// Holds the provider tokens plus the user they belong to; the bearer token
/// for backend API calls and the role flags are derived from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub token: AuthToken,
    pub user: AuthUser,
}

impl AuthSession {
    /// Bearer token (JWT) for user-scoped backend API calls.
    #[must_use]
    pub fn bearer(&self) -> &str {
        &self.token.access_token
    }

    /// Whether the signed-in user may access the admin console.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.user.role.is_admin()
    }

    /// Whether the signed-in user holds the super-admin role.
    #[must_use]
    pub const fn is_super_admin(&self) -> bool {
        self.user.role.is_super_admin()
    }
}

/// Session keys for storefront data.
pub mod keys {
    /// Key for storing the authentication state of the signed-in user.
    pub const AUTH_SESSION: &str = "auth_session";

    /// Key for the in-memory cart state machine.
    pub const CART_STATE: &str = "cart_state";

    /// Key for the backend-issued durable cart id.
    pub const CART_ID: &str = "cart_id";

    /// Key for OAuth state (CSRF protection).
    pub const OAUTH_STATE: &str = "oauth_state";
}
