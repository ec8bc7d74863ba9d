//! Page-level workflows sitting between the routes and the remote API.

use thiserror::Error;

use crate::api::errors::{ApiError, FieldErrors};
use crate::domain::auth::AuthenticatedUser;

pub mod auth;
pub mod dashboard;
pub mod resources;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// No usable session; the user has to sign in again.
    #[error("unauthorized")]
    Unauthorized,

    /// Signed in but lacking the permission for the action.
    #[error("forbidden")]
    Forbidden,

    #[error("not found")]
    NotFound,

    #[error("form error: {0}")]
    Form(String),

    /// Submitted data was rejected, with messages per field.
    #[error("{message}")]
    Validation { message: String, errors: FieldErrors },

    #[error("type constraint violation: {0}")]
    TypeConstraint(String),

    #[error(transparent)]
    Api(ApiError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Fails with [`ServiceError::Forbidden`] unless `user` holds `permission`.
pub fn ensure_permission(user: &AuthenticatedUser, permission: &str) -> ServiceResult<()> {
    if user.can(permission) {
        Ok(())
    } else {
        log::warn!("User {} lacks permission {permission}", user.email);
        Err(ServiceError::Forbidden)
    }
}
