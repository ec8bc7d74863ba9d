//! Session user as seen by the dashboard.

use serde::{Deserialize, Serialize};

/// Role that bypasses per-resource permission checks.
pub const ADMIN_ROLE: &str = "admin";

/// Claims carried by the session token.
///
/// The remote API issues `access_token`; this application only stores it and
/// forwards it as a bearer token on protected calls.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub sub: String,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
    pub access_token: String,
    pub exp: usize,
}

impl AuthenticatedUser {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(ADMIN_ROLE)
    }

    /// Admins can do everything; other users need the explicit permission.
    pub fn can(&self, permission: &str) -> bool {
        self.is_admin() || self.permissions.iter().any(|p| p == permission)
    }

    /// Bearer token to forward, `None` when the remote token is blank.
    pub fn bearer_token(&self) -> Option<&str> {
        let token = self.access_token.trim();
        (!token.is_empty()).then_some(token)
    }
}
