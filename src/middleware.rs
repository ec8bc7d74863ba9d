//! Route guard deciding, before any page renders, whether the request may
//! proceed, must sign in first or is already signed in.

use actix_identity::IdentityExt;
use actix_web::body::{EitherBody, MessageBody};
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::middleware::Next;
use actix_web::{Error, web};

use crate::models::auth::session_from_request;
use crate::models::config::{AccessConfig, ServerConfig};
use crate::routes::redirect;

/// Login URL carrying the page to return to.
pub fn login_redirect(login_path: &str, callback: &str) -> String {
    let query = serde_html_form::to_string(vec![("callbackUrl", callback)]).unwrap_or_default();
    format!("{login_path}?{query}")
}

/// `path` equals one of `prefixes` or lies below it.
pub fn is_protected(prefixes: &[String], path: &str) -> bool {
    prefixes.iter().any(|prefix| {
        path == prefix
            || path
                .strip_prefix(prefix.as_str())
                .is_some_and(|rest| rest.starts_with('/'))
    })
}

fn request_target(path: &str, query: &str) -> String {
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{query}")
    }
}

/// Guards protected sections and the auth pages.
///
/// * protected prefix without a session: redirect to login with the
///   original path and query as `callbackUrl`
/// * auth route with a session: redirect to the home page
/// * `401` from an inner handler: drop the identity and redirect to login
pub async fn route_guard<B>(
    req: ServiceRequest,
    next: Next<B>,
) -> Result<ServiceResponse<EitherBody<B>>, Error>
where
    B: MessageBody + 'static,
{
    let access = req
        .app_data::<web::Data<ServerConfig>>()
        .map(|config| config.access.clone())
        .unwrap_or_else(AccessConfig::default);
    let signed_in = session_from_request(req.request()).is_some();

    if !signed_in && is_protected(&access.protected_prefixes, req.path()) {
        let callback = request_target(req.path(), req.query_string());
        log::debug!("Redirecting anonymous request for {callback} to login");
        let response = redirect(&login_redirect(&access.login_path, &callback));
        return Ok(req.into_response(response).map_into_right_body());
    }

    if signed_in && access.auth_routes.iter().any(|route| route == req.path()) {
        let response = redirect(&access.home_path);
        return Ok(req.into_response(response).map_into_right_body());
    }

    let res = next.call(req).await?;

    if res.status() == StatusCode::UNAUTHORIZED {
        let callback = request_target(res.request().path(), res.request().query_string());
        if let Ok(identity) = res.request().get_identity() {
            identity.logout();
        }
        let response = redirect(&login_redirect(&access.login_path, &callback));
        return Ok(res.into_response(response).map_into_right_body());
    }

    Ok(res.map_into_left_body())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefixes() -> Vec<String> {
        AccessConfig::default().protected_prefixes
    }

    #[test]
    fn protected_prefix_matches_whole_segments() {
        assert!(is_protected(&prefixes(), "/dashboard"));
        assert!(is_protected(&prefixes(), "/dashboard/districts"));
        assert!(is_protected(&prefixes(), "/lms/courses/4/edit"));
        assert!(!is_protected(&prefixes(), "/dashboards"));
        assert!(!is_protected(&prefixes(), "/courses"));
        assert!(!is_protected(&prefixes(), "/"));
    }

    #[test]
    fn login_redirect_encodes_callback() {
        assert_eq!(
            login_redirect("/login", "/dashboard/districts?page=2"),
            "/login?callbackUrl=%2Fdashboard%2Fdistricts%3Fpage%3D2"
        );
    }
}
