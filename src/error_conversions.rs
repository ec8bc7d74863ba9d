//! Error conversion glue between the data layer and the service layer.
//!
//! The domain and API layers must not depend on service error types, so the
//! conversions live here.

use crate::api::errors::ApiError;
use crate::domain::types::TypeConstraintError;
use crate::forms::FormError;
use crate::services::ServiceError;

impl From<TypeConstraintError> for ServiceError {
    fn from(val: TypeConstraintError) -> Self {
        ServiceError::TypeConstraint(val.to_string())
    }
}

impl From<FormError> for ServiceError {
    fn from(val: FormError) -> Self {
        ServiceError::Form(val.to_string())
    }
}

impl From<ApiError> for ServiceError {
    fn from(val: ApiError) -> Self {
        if val.is_unauthenticated() {
            return ServiceError::Unauthorized;
        }
        if val.is_not_found() {
            return ServiceError::NotFound;
        }
        if val.status_code() == Some(403) {
            return ServiceError::Forbidden;
        }
        match val.field_errors() {
            Some(errors) => ServiceError::Validation {
                message: val.to_string(),
                errors: errors.clone(),
            },
            None => ServiceError::Api(val),
        }
    }
}
