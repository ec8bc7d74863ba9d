//! HTTP client for the remote education-platform API.
//!
//! Every call goes through [`ApiClient::send`], which attaches the bearer
//! token, decodes the envelope and converts transport problems into
//! [`ApiError`]s. Entity-specific knowledge comes from the [`Resource`] trait.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::envelope::{ApiEnvelope, ApiResult, Page};
use crate::api::errors::ApiError;
use crate::api::{API_PREFIX, OPTIONS_PER_PAGE};
use crate::domain::auth::AuthenticatedUser;
use crate::domain::resource::Resource;
use crate::domain::types::{EntityId, PageNumber};
use crate::filters::query::ListQuery;

/// Option of a select input loaded from the remote API.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SelectOption {
    pub id: EntityId,
    #[serde(alias = "title", alias = "code")]
    pub name: String,
}

/// User profile returned by the login endpoint.
#[derive(Clone, Debug, Deserialize)]
pub struct RemoteUser {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
}

/// Payload of a successful login.
#[derive(Clone, Debug, Deserialize)]
pub struct LoginData {
    #[serde(alias = "token")]
    pub access_token: String,
    pub user: RemoteUser,
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

/// Operations the dashboard needs from the remote API.
///
/// Services depend on this trait rather than on [`ApiClient`] so tests can
/// substitute an in-memory implementation.
#[allow(async_fn_in_trait)]
pub trait ResourceApi {
    async fn list<R: Resource>(
        &self,
        session: Option<&AuthenticatedUser>,
        query: &ListQuery,
    ) -> ApiResult<Page<R>>;

    async fn fetch<R: Resource>(
        &self,
        session: Option<&AuthenticatedUser>,
        id: EntityId,
    ) -> ApiResult<R>;

    async fn create<R: Resource>(
        &self,
        session: &AuthenticatedUser,
        payload: &Value,
    ) -> ApiResult<Option<R>>;

    async fn update<R: Resource>(
        &self,
        session: &AuthenticatedUser,
        id: EntityId,
        payload: &Value,
    ) -> ApiResult<Option<R>>;

    async fn delete<R: Resource>(&self, session: &AuthenticatedUser, id: EntityId)
    -> ApiResult<()>;

    /// Reference options for a select input backed by `endpoint`.
    async fn options(
        &self,
        session: Option<&AuthenticatedUser>,
        endpoint: &str,
    ) -> ApiResult<Vec<SelectOption>>;

    /// Dashboard counters keyed by name.
    async fn stats(&self, session: &AuthenticatedUser) -> ApiResult<serde_json::Map<String, Value>>;

    async fn login(&self, email: &str, password: &str) -> ApiResult<LoginData>;
}

/// `reqwest`-backed implementation of [`ResourceApi`].
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Creates a client for `base_url` (without the `/api/v1` prefix).
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Transport(format!("Failed to build HTTP client: {e}")))?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{API_PREFIX}{endpoint}", self.base_url)
    }

    /// Prepares a request, refusing to build one for a protected endpoint
    /// without a token.
    fn request(
        &self,
        method: Method,
        endpoint: &str,
        session: Option<&AuthenticatedUser>,
        public: bool,
    ) -> Result<RequestBuilder, ApiError> {
        let token = session.and_then(AuthenticatedUser::bearer_token);
        if !public && token.is_none() {
            log::warn!("Refusing to call {endpoint} without a session token");
            return Err(ApiError::Unauthenticated);
        }

        let mut request = self
            .client
            .request(method, self.url(endpoint))
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        Ok(request)
    }

    /// Sends `request` and decodes the envelope.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<Option<T>> {
        let response = request.send().await.map_err(|e| {
            log::error!("Remote API request failed: {e}");
            ApiError::Transport(e.to_string())
        })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| {
            log::error!("Failed to read remote API response: {e}");
            ApiError::Transport(e.to_string())
        })?;

        match serde_json::from_slice::<ApiEnvelope<T>>(&body) {
            Ok(envelope) => envelope.into_result(status.as_u16()),
            Err(e) if status.is_success() => {
                log::error!("Unexpected remote API payload: {e}");
                Err(ApiError::Decode(e.to_string()))
            }
            Err(_) => {
                // Error pages without an envelope still produce a failure.
                ApiEnvelope::<T> {
                    success: false,
                    message: None,
                    code: None,
                    data: None,
                    errors: None,
                }
                .into_result(status.as_u16())
            }
        }
    }

    fn item_endpoint<R: Resource>(id: EntityId) -> String {
        format!("{}/{}", R::ENDPOINT, id)
    }
}

impl ResourceApi for ApiClient {
    async fn list<R: Resource>(
        &self,
        session: Option<&AuthenticatedUser>,
        query: &ListQuery,
    ) -> ApiResult<Page<R>> {
        let request = self
            .request(Method::GET, R::ENDPOINT, session, R::PUBLIC)?
            .query(&query.to_pairs());
        self.send::<Page<R>>(request).await?.require_data()
    }

    async fn fetch<R: Resource>(
        &self,
        session: Option<&AuthenticatedUser>,
        id: EntityId,
    ) -> ApiResult<R> {
        let request = self.request(
            Method::GET,
            &Self::item_endpoint::<R>(id),
            session,
            R::PUBLIC,
        )?;
        self.send::<R>(request).await?.require_data()
    }

    async fn create<R: Resource>(
        &self,
        session: &AuthenticatedUser,
        payload: &Value,
    ) -> ApiResult<Option<R>> {
        let request = self
            .request(Method::POST, R::ENDPOINT, Some(session), false)?
            .json(payload);
        self.send::<R>(request).await
    }

    async fn update<R: Resource>(
        &self,
        session: &AuthenticatedUser,
        id: EntityId,
        payload: &Value,
    ) -> ApiResult<Option<R>> {
        let request = self
            .request(
                Method::PUT,
                &Self::item_endpoint::<R>(id),
                Some(session),
                false,
            )?
            .json(payload);
        self.send::<R>(request).await
    }

    async fn delete<R: Resource>(
        &self,
        session: &AuthenticatedUser,
        id: EntityId,
    ) -> ApiResult<()> {
        let request = self.request(
            Method::DELETE,
            &Self::item_endpoint::<R>(id),
            Some(session),
            false,
        )?;
        Ok(self
            .send::<serde::de::IgnoredAny>(request)
            .await?
            .map(|_| ()))
    }

    async fn options(
        &self,
        session: Option<&AuthenticatedUser>,
        endpoint: &str,
    ) -> ApiResult<Vec<SelectOption>> {
        let public = endpoint.starts_with("/public/");
        let query = ListQuery::default()
            .page(PageNumber::FIRST)
            .per_page(OPTIONS_PER_PAGE);
        let request = self
            .request(Method::GET, endpoint, session, public)?
            .query(&query.to_pairs());
        Ok(self
            .send::<Page<SelectOption>>(request)
            .await?
            .require_data()?
            .map(|page| page.items))
    }

    async fn stats(&self, session: &AuthenticatedUser) -> ApiResult<serde_json::Map<String, Value>> {
        let request = self.request(Method::GET, "/stats", Some(session), false)?;
        self.send(request).await?.require_data()
    }

    async fn login(&self, email: &str, password: &str) -> ApiResult<LoginData> {
        let request = self
            .request(Method::POST, "/auth/login", None, true)?
            .json(&Credentials { email, password });
        self.send(request).await?.require_data()
    }
}
