//! In-memory [`ResourceApi`] for isolating services in tests.
//!
//! Responses are keyed by `"METHOD /endpoint"`; every call is recorded with
//! its query string so tests can assert on what would have been sent.

use std::cell::RefCell;
use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::api::client::{LoginData, ResourceApi, SelectOption};
use crate::api::envelope::{ApiResult, ApiSuccess, Page};
use crate::api::errors::{ApiError, FieldErrors};
use crate::domain::auth::AuthenticatedUser;
use crate::domain::resource::Resource;
use crate::domain::types::EntityId;
use crate::filters::query::ListQuery;

#[derive(Default)]
pub struct MockApi {
    responses: HashMap<String, ApiResult<Value>>,
    calls: RefCell<Vec<String>>,
    payloads: RefCell<Vec<Value>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, key: &str, result: ApiResult<Value>) -> Self {
        self.responses.insert(key.to_string(), result);
        self
    }

    pub fn ok(self, key: &str, data: Value) -> Self {
        self.respond(
            key,
            Ok(ApiSuccess {
                message: None,
                code: 200,
                data,
            }),
        )
    }

    pub fn ok_with_message(self, key: &str, message: &str, data: Value) -> Self {
        self.respond(
            key,
            Ok(ApiSuccess {
                message: Some(message.to_string()),
                code: 200,
                data,
            }),
        )
    }

    pub fn fail(self, key: &str, code: u16, message: &str, errors: FieldErrors) -> Self {
        self.respond(
            key,
            Err(ApiError::Failure {
                code,
                message: message.to_string(),
                errors,
            }),
        )
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn payloads(&self) -> Vec<Value> {
        self.payloads.borrow().clone()
    }

    fn reply<T: DeserializeOwned>(
        &self,
        key: String,
        call: String,
        session: Option<&AuthenticatedUser>,
        public: bool,
    ) -> ApiResult<T> {
        if !public && session.and_then(AuthenticatedUser::bearer_token).is_none() {
            return Err(ApiError::Unauthenticated);
        }
        self.calls.borrow_mut().push(call);

        let response = self.responses.get(&key).cloned().unwrap_or_else(|| {
            Err(ApiError::Failure {
                code: 404,
                message: format!("No mock response for {key}"),
                errors: FieldErrors::new(),
            })
        })?;
        let data = serde_json::from_value(response.data)
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(ApiSuccess {
            message: response.message,
            code: response.code,
            data,
        })
    }
}

fn query_string(query: &ListQuery) -> String {
    serde_html_form::to_string(query.to_pairs()).unwrap_or_default()
}

impl ResourceApi for MockApi {
    async fn list<R: Resource>(
        &self,
        session: Option<&AuthenticatedUser>,
        query: &ListQuery,
    ) -> ApiResult<Page<R>> {
        let key = format!("GET {}", R::ENDPOINT);
        let call = format!("{key}?{}", query_string(query));
        self.reply(key, call, session, R::PUBLIC)
    }

    async fn fetch<R: Resource>(
        &self,
        session: Option<&AuthenticatedUser>,
        id: EntityId,
    ) -> ApiResult<R> {
        let key = format!("GET {}/{id}", R::ENDPOINT);
        self.reply(key.clone(), key, session, R::PUBLIC)
    }

    async fn create<R: Resource>(
        &self,
        session: &AuthenticatedUser,
        payload: &Value,
    ) -> ApiResult<Option<R>> {
        self.payloads.borrow_mut().push(payload.clone());
        let key = format!("POST {}", R::ENDPOINT);
        self.reply(key.clone(), key, Some(session), false)
    }

    async fn update<R: Resource>(
        &self,
        session: &AuthenticatedUser,
        id: EntityId,
        payload: &Value,
    ) -> ApiResult<Option<R>> {
        self.payloads.borrow_mut().push(payload.clone());
        let key = format!("PUT {}/{id}", R::ENDPOINT);
        self.reply(key.clone(), key, Some(session), false)
    }

    async fn delete<R: Resource>(
        &self,
        session: &AuthenticatedUser,
        id: EntityId,
    ) -> ApiResult<()> {
        let key = format!("DELETE {}/{id}", R::ENDPOINT);
        self.reply::<Option<Value>>(key.clone(), key, Some(session), false)
            .map(|success| success.map(|_| ()))
    }

    async fn options(
        &self,
        session: Option<&AuthenticatedUser>,
        endpoint: &str,
    ) -> ApiResult<Vec<SelectOption>> {
        let key = format!("GET {endpoint}");
        let call = format!("{key}?page=1&per_page=999");
        self.reply::<Page<SelectOption>>(key, call, session, endpoint.starts_with("/public/"))
            .map(|success| success.map(|page| page.items))
    }

    async fn stats(&self, session: &AuthenticatedUser) -> ApiResult<Map<String, Value>> {
        let key = "GET /stats".to_string();
        self.reply(key.clone(), key, Some(session), false)
    }

    async fn login(&self, _email: &str, _password: &str) -> ApiResult<LoginData> {
        let key = "POST /auth/login".to_string();
        self.reply(key.clone(), key, None, true)
    }
}
