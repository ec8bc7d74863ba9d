//! Sign-in workflow.

use validator::Validate;

use crate::api::client::ResourceApi;
use crate::api::errors::ApiError;
use crate::domain::auth::AuthenticatedUser;
use crate::forms::auth::LoginForm;
use crate::models::auth::session_from_login;
use crate::services::{ServiceError, ServiceResult};

/// Returns `raw` when it is a same-site relative path, `fallback` otherwise.
///
/// Protocol-relative (`//host`) and backslash variants are rejected so the
/// callback can never leave the site.
pub fn safe_callback(raw: Option<&str>, fallback: &str) -> String {
    match raw.map(str::trim) {
        Some(url)
            if url.starts_with('/')
                && !url.starts_with("//")
                && !url.contains('\\')
                && !url.chars().any(char::is_control) =>
        {
            url.to_string()
        }
        _ => fallback.to_string(),
    }
}

/// Validates the credentials and exchanges them for a session.
pub async fn login<A: ResourceApi>(
    api: &A,
    form: &LoginForm,
    session_ttl_secs: u64,
) -> ServiceResult<AuthenticatedUser> {
    if let Err(e) = form.validate() {
        log::debug!("Rejected login form: {e}");
        return Err(ServiceError::Form(
            "Please enter a valid email address and password.".to_string(),
        ));
    }

    match api.login(form.email.trim(), &form.password).await {
        Ok(success) => Ok(session_from_login(success.data, session_ttl_secs)),
        Err(ApiError::Failure { message, .. }) => Err(ServiceError::Form(message)),
        Err(err) => {
            log::error!("Login request failed: {err:?}");
            Err(ServiceError::Api(err))
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::api::errors::FieldErrors;
    use crate::api::mock::MockApi;

    fn form(email: &str, password: &str) -> LoginForm {
        LoginForm {
            email: email.to_string(),
            password: password.to_string(),
            callback_url: None,
        }
    }

    #[test]
    fn callback_must_stay_on_site() {
        assert_eq!(
            safe_callback(Some("/lms/courses?page=2"), "/dashboard"),
            "/lms/courses?page=2"
        );
        assert_eq!(safe_callback(None, "/dashboard"), "/dashboard");
        assert_eq!(safe_callback(Some(""), "/dashboard"), "/dashboard");
        assert_eq!(
            safe_callback(Some("https://evil.example"), "/dashboard"),
            "/dashboard"
        );
        assert_eq!(
            safe_callback(Some("//evil.example"), "/dashboard"),
            "/dashboard"
        );
        assert_eq!(
            safe_callback(Some("/\\evil.example"), "/dashboard"),
            "/dashboard"
        );
    }

    #[tokio::test]
    async fn successful_login_builds_session() {
        let api = MockApi::new().ok(
            "POST /auth/login",
            json!({
                "access_token": "remote-token",
                "user": {"id": 5, "name": "Admin", "email": "admin@example.com", "roles": ["admin"]}
            }),
        );

        let user = login(&api, &form("admin@example.com", "secret"), 3600)
            .await
            .unwrap();

        assert_eq!(user.sub, "5");
        assert_eq!(user.access_token, "remote-token");
        assert!(user.is_admin());
    }

    #[tokio::test]
    async fn rejected_credentials_surface_server_message() {
        let api = MockApi::new().fail(
            "POST /auth/login",
            401,
            "Invalid credentials",
            FieldErrors::new(),
        );

        let result = login(&api, &form("admin@example.com", "wrong"), 3600).await;

        assert!(matches!(result, Err(ServiceError::Form(message)) if message == "Invalid credentials"));
    }

    #[tokio::test]
    async fn invalid_form_skips_the_api() {
        let api = MockApi::new();

        let result = login(&api, &form("nope", ""), 3600).await;

        assert!(matches!(result, Err(ServiceError::Form(_))));
        assert!(api.calls().is_empty());
    }
}
