//! Form definitions backing the dashboard routes.

use thiserror::Error;
use validator::ValidationErrors;

pub mod auth;
pub mod resources;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("malformed form body: {0}")]
    Malformed(String),
}
