use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use crate::api::envelope::ErrorDetail;

pub const GENERIC_ERROR_MESSAGE: &str = "An unexpected error occurred. Please try again.";
pub const NO_SESSION_MESSAGE: &str = "No valid session. Please sign in again.";

/// First error message per form field.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps the first message of every field that has one.
    pub fn from_details(details: &BTreeMap<String, ErrorDetail>) -> Self {
        Self(
            details
                .iter()
                .filter_map(|(field, detail)| {
                    detail
                        .first()
                        .map(|message| (field.clone(), message.to_string()))
                })
                .collect(),
        )
    }

    /// Records a message unless the field already has one.
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[derive(Clone, Debug, Error)]
pub enum ApiError {
    /// Request never produced a usable HTTP response.
    #[error("{}", GENERIC_ERROR_MESSAGE)]
    Transport(String),

    /// Protected endpoint called without a session token.
    #[error("{}", NO_SESSION_MESSAGE)]
    Unauthenticated,

    /// Remote API reported `success: false` or a non-2xx status.
    #[error("{message}")]
    Failure {
        code: u16,
        message: String,
        errors: FieldErrors,
    },

    /// Response body did not match the expected envelope.
    #[error("{}", GENERIC_ERROR_MESSAGE)]
    Decode(String),
}

impl ApiError {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Failure { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Remote API rejected the token, so the session is no longer usable.
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, ApiError::Unauthenticated) || self.status_code() == Some(401)
    }

    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            ApiError::Failure { errors, .. } if !errors.is_empty() => Some(errors),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_keeps_first_message() {
        let mut errors = FieldErrors::new();
        errors.insert("name", "required");
        errors.insert("name", "too short");
        assert_eq!(errors.get("name"), Some("required"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn transport_errors_hide_details_from_users() {
        let err = ApiError::Transport("connection refused".to_string());
        assert_eq!(err.to_string(), GENERIC_ERROR_MESSAGE);
    }

    #[test]
    fn remote_401_counts_as_unauthenticated() {
        let err = ApiError::Failure {
            code: 401,
            message: "Unauthenticated.".to_string(),
            errors: FieldErrors::new(),
        };
        assert!(err.is_unauthenticated());
        assert!(err.field_errors().is_none());
    }
}
