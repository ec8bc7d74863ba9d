//! Wire format shared by every remote API response.
//!
//! Responses arrive as `{success, message, code, data, errors}`. The loose wire
//! shape is converted right away into `Result<ApiSuccess<T>, ApiError>` so that
//! a failed call can never hand out `data`.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::api::errors::{ApiError, FieldErrors, GENERIC_ERROR_MESSAGE};

/// Per-field error detail, either a list of messages or a single one.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ErrorDetail {
    Many(Vec<String>),
    One(String),
}

impl ErrorDetail {
    pub fn first(&self) -> Option<&str> {
        match self {
            ErrorDetail::Many(messages) => messages.first().map(String::as_str),
            ErrorDetail::One(message) => Some(message.as_str()),
        }
    }
}

/// Raw response envelope as sent by the remote API.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Option<BTreeMap<String, ErrorDetail>>,
}

/// Successful call with its payload.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiSuccess<T> {
    pub message: Option<String>,
    pub code: u16,
    pub data: T,
}

impl<T> ApiSuccess<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiSuccess<U> {
        ApiSuccess {
            message: self.message,
            code: self.code,
            data: f(self.data),
        }
    }
}

impl<T> ApiSuccess<Option<T>> {
    /// Turns a missing payload into a decode error.
    pub fn require_data(self) -> Result<ApiSuccess<T>, ApiError> {
        match self.data {
            Some(data) => Ok(ApiSuccess {
                message: self.message,
                code: self.code,
                data,
            }),
            None => Err(ApiError::Decode("response carried no data".to_string())),
        }
    }
}

pub type ApiResult<T> = Result<ApiSuccess<T>, ApiError>;

impl<T> ApiEnvelope<T> {
    /// Converts the envelope received with HTTP `status` into a typed result.
    ///
    /// A call only succeeds when both the HTTP status is 2xx and the envelope
    /// reports `success: true`.
    pub fn into_result(self, status: u16) -> ApiResult<Option<T>> {
        let http_ok = (200..300).contains(&status);
        if self.success && http_ok {
            return Ok(ApiSuccess {
                message: non_empty(self.message),
                code: self.code.unwrap_or(status),
                data: self.data,
            });
        }

        let errors = self
            .errors
            .map(|errors| FieldErrors::from_details(&errors))
            .unwrap_or_default();
        let message = non_empty(self.message)
            .or_else(|| errors.iter().next().map(|(_, message)| message.to_string()))
            .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string());

        Err(ApiError::Failure {
            code: self.code.unwrap_or(status),
            message,
            errors,
        })
    }
}

fn non_empty(message: Option<String>) -> Option<String> {
    message.filter(|m| !m.trim().is_empty())
}

/// Paging metadata produced by the remote API and relayed untouched.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaginationDescriptor {
    pub current_page: u32,
    pub last_page: u32,
    #[serde(default)]
    pub per_page: u32,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub from: Option<u64>,
    #[serde(default)]
    pub to: Option<u64>,
    #[serde(default)]
    pub has_more_pages: bool,
}

impl PaginationDescriptor {
    /// Descriptor for an unpaginated result that fits on one page.
    pub fn single_page(len: usize) -> Self {
        let len = len as u64;
        Self {
            current_page: 1,
            last_page: 1,
            per_page: len as u32,
            total: len,
            from: (len > 0).then_some(1),
            to: (len > 0).then_some(len),
            has_more_pages: false,
        }
    }

    /// Current page kept within `[1, last_page]`.
    pub fn current(&self) -> u32 {
        self.current_page.clamp(1, self.last_page.max(1))
    }

    pub fn has_more(&self) -> bool {
        self.has_more_pages || self.current_page < self.last_page
    }
}

/// One page of entities.
#[derive(Clone, Debug, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: PaginationDescriptor,
}

impl<T> Page<T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PagePayload<T> {
    Paged {
        #[serde(alias = "items")]
        data: Vec<T>,
        #[serde(flatten)]
        pagination: PaginationDescriptor,
    },
    Nested {
        #[serde(alias = "items")]
        data: Vec<T>,
        #[serde(alias = "meta")]
        pagination: PaginationDescriptor,
    },
    Plain(Vec<T>),
}

impl<'de, T> Deserialize<'de> for Page<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match PagePayload::deserialize(deserializer)? {
            PagePayload::Paged { data, pagination } | PagePayload::Nested { data, pagination } => {
                Page {
                    items: data,
                    pagination,
                }
            }
            PagePayload::Plain(items) => Page {
                pagination: PaginationDescriptor::single_page(items.len()),
                items,
            },
        })
    }
}
