use actix_web::cookie::Cookie;
use actix_web::http::{StatusCode, header};
use actix_web::test;
use actix_web_flash_messages::Level;
use serde_json::json;
use wiremock::matchers::{bearer_token, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use lms_admin::routes::alert_level_to_str;

#[macro_use]
mod common;

#[::core::prelude::v1::test]
fn test_alert_level_to_str_mappings() {
    assert_eq!(alert_level_to_str(&Level::Error), "danger");
    assert_eq!(alert_level_to_str(&Level::Warning), "warning");
    assert_eq!(alert_level_to_str(&Level::Success), "success");
    assert_eq!(alert_level_to_str(&Level::Info), "info");
    assert_eq!(alert_level_to_str(&Level::Debug), "info");
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Logged in",
            "data": {
                "access_token": "remote-token",
                "user": {
                    "id": 1,
                    "name": "Admin",
                    "email": "admin@example.com",
                    "roles": ["admin"]
                }
            }
        })))
        .mount(server)
        .await;
}

fn cookies_of<B>(resp: &actix_web::dev::ServiceResponse<B>) -> Vec<Cookie<'static>> {
    resp.response()
        .cookies()
        .map(|cookie| cookie.into_owned())
        .collect()
}

fn with_cookies(mut req: test::TestRequest, cookies: &[Cookie<'static>]) -> test::TestRequest {
    for cookie in cookies {
        req = req.cookie(cookie.clone());
    }
    req
}

#[actix_web::test]
async fn anonymous_listing_redirects_to_login_with_callback() {
    let server = MockServer::start().await;
    let app = test_app!(common::server_config(&server.uri()));

    let req = test::TestRequest::get()
        .uri("/dashboard/divisions?search=Dhaka")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        resp.headers().get(header::LOCATION).unwrap(),
        "/login?callbackUrl=%2Fdashboard%2Fdivisions%3Fsearch%3DDhaka"
    );
}

#[actix_web::test]
async fn public_catalogue_renders_rows_without_a_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/public/courses"))
        .and(query_param("search", "English"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "data": [{
                    "id": 9,
                    "title": "Spoken English",
                    "course_type": "online",
                    "price": 1500.0,
                    "category": {"id": 2, "name": "Language"}
                }],
                "current_page": 1,
                "last_page": 1,
                "per_page": 15,
                "total": 1
            }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/public/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [{"id": 2, "name": "Language"}]
        })))
        .mount(&server)
        .await;
    let app = test_app!(common::server_config(&server.uri()));

    let req = test::TestRequest::get()
        .uri("/courses?search=English&utm_source=ad")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains(r#"data-list-state="rows""#));
    assert!(body.contains("Spoken English"));
    assert!(body.contains("Language"));
}

#[actix_web::test]
async fn empty_catalogue_shows_not_found_state() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/public/courses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": []
        })))
        .mount(&server)
        .await;
    let app = test_app!(common::server_config(&server.uri()));

    let req = test::TestRequest::get().uri("/courses").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains(r#"data-list-state="not_found""#));
    assert!(body.contains("No courses found."));
}

#[actix_web::test]
async fn failed_catalogue_call_shows_error_state() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/public/courses"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "success": false,
            "message": "Database unavailable"
        })))
        .mount(&server)
        .await;
    let app = test_app!(common::server_config(&server.uri()));

    let req = test::TestRequest::get().uri("/courses").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains(r#"data-list-state="error""#));
    assert!(body.contains("Database unavailable"));
}

#[actix_web::test]
async fn sign_in_returns_to_callback_and_renders_the_listing() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/v1/divisions"))
        .and(bearer_token("remote-token"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "data": [
                    {"id": 1, "name": "Dhaka", "status": "active"},
                    {"id": 2, "name": "Khulna", "status": "inactive"}
                ],
                "current_page": 1,
                "last_page": 3,
                "per_page": 2,
                "total": 6,
                "from": 1,
                "to": 2
            }
        })))
        .mount(&server)
        .await;
    let app = test_app!(common::server_config(&server.uri()));

    let req = test::TestRequest::post()
        .uri("/login")
        .set_form([
            ("email", "admin@example.com"),
            ("password", "secret"),
            ("callbackUrl", "/dashboard/divisions"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        resp.headers().get(header::LOCATION).unwrap(),
        "/dashboard/divisions"
    );
    let cookies = cookies_of(&resp);

    let req = with_cookies(test::TestRequest::get().uri("/dashboard/divisions"), &cookies)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains("Dhaka"));
    assert!(body.contains("Khulna"));
    assert!(body.contains("divisions?page=2"));
    assert!(body.contains("divisions?page=3"));

    let req = with_cookies(test::TestRequest::get().uri("/login"), &cookies).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/dashboard");
}

#[actix_web::test]
async fn external_callback_is_replaced_by_home() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    let app = test_app!(common::server_config(&server.uri()));

    let req = test::TestRequest::post()
        .uri("/login")
        .set_form([
            ("email", "admin@example.com"),
            ("password", "secret"),
            ("callbackUrl", "//evil.example.com/phish"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/dashboard");
}

#[actix_web::test]
async fn rejected_remote_token_signs_the_user_out() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/v1/divisions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "success": false,
            "message": "Unauthenticated."
        })))
        .mount(&server)
        .await;
    let app = test_app!(common::server_config(&server.uri()));

    let req = test::TestRequest::post()
        .uri("/login")
        .set_form([("email", "admin@example.com"), ("password", "secret")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    let cookies = cookies_of(&resp);

    let req = with_cookies(
        test::TestRequest::get().uri("/dashboard/divisions?status=active"),
        &cookies,
    )
    .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        resp.headers().get(header::LOCATION).unwrap(),
        "/login?callbackUrl=%2Fdashboard%2Fdivisions%3Fstatus%3Dactive"
    );
}

const FILTERED_DIVISIONS: &str = "/dashboard/divisions?status=active&page=2";

/// Cookies of `resp` layered over `previous`, replacing same-named ones.
fn merge_cookies<B>(
    previous: &[Cookie<'static>],
    resp: &actix_web::dev::ServiceResponse<B>,
) -> Vec<Cookie<'static>> {
    let fresh = cookies_of(resp);
    let kept: Vec<Cookie<'static>> = previous
        .iter()
        .filter(|cookie| fresh.iter().all(|c| c.name() != cookie.name()))
        .cloned()
        .collect();
    kept.into_iter().chain(fresh).collect()
}

async fn mount_filtered_divisions(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/v1/divisions"))
        .and(query_param("status", "active"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "data": [{"id": 4, "name": "Sylhet", "status": "active"}],
                "current_page": 2,
                "last_page": 2,
                "per_page": 15,
                "total": 16
            }
        })))
        .mount(server)
        .await;
}

/// Signs the admin in and yields the session cookies.
macro_rules! sign_in {
    ($app:expr) => {{
        let req = test::TestRequest::post()
            .uri("/login")
            .set_form([("email", "admin@example.com"), ("password", "secret")])
            .to_request();
        let resp = test::call_service($app, req).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        cookies_of(&resp)
    }};
}

#[actix_web::test]
async fn delete_returns_to_filtered_listing_with_success_flash() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_filtered_divisions(&server).await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/divisions/3"))
        .and(bearer_token("remote-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Division deleted"
        })))
        .expect(1)
        .mount(&server)
        .await;
    let app = test_app!(common::server_config(&server.uri()));
    let cookies = sign_in!(&app);

    let req = with_cookies(
        test::TestRequest::post()
            .uri("/dashboard/divisions/3/delete")
            .set_form([("return_to", FILTERED_DIVISIONS)]),
        &cookies,
    )
    .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        resp.headers().get(header::LOCATION).unwrap(),
        FILTERED_DIVISIONS
    );
    assert!(cookies_of(&resp).iter().any(|c| c.name() == "_flash"));
    let cookies = merge_cookies(&cookies, &resp);

    let req = with_cookies(test::TestRequest::get().uri(FILTERED_DIVISIONS), &cookies)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains("alert-success"));
    assert!(body.contains("Division deleted"));
    assert!(body.contains("Sylhet"));
}

#[actix_web::test]
async fn failed_delete_returns_to_filtered_listing_with_error_flash() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_filtered_divisions(&server).await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/divisions/3"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "success": false,
            "message": "Division still has districts"
        })))
        .expect(1)
        .mount(&server)
        .await;
    let app = test_app!(common::server_config(&server.uri()));
    let cookies = sign_in!(&app);

    let req = with_cookies(
        test::TestRequest::post()
            .uri("/dashboard/divisions/3/delete")
            .set_form([("return_to", FILTERED_DIVISIONS)]),
        &cookies,
    )
    .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        resp.headers().get(header::LOCATION).unwrap(),
        FILTERED_DIVISIONS
    );
    assert!(cookies_of(&resp).iter().any(|c| c.name() == "_flash"));
    let cookies = merge_cookies(&cookies, &resp);

    let req = with_cookies(test::TestRequest::get().uri(FILTERED_DIVISIONS), &cookies)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains("alert-danger"));
    assert!(body.contains("Division still has districts"));
}
