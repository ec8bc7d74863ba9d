#![allow(dead_code, unused_macros)]

use lms_admin::domain::auth::AuthenticatedUser;
use lms_admin::models::config::{AccessConfig, ServerConfig};

pub const SECRET: &str =
    "test-secret-test-secret-test-secret-test-secret-test-secret-test-secret";

pub fn server_config(api_base_url: &str) -> ServerConfig {
    ServerConfig {
        domain: "localhost".to_string(),
        address: "127.0.0.1".to_string(),
        port: 8080,
        api_base_url: api_base_url.to_string(),
        site_url: "http://localhost:8080".to_string(),
        templates_dir: "templates/**/*".to_string(),
        secret: SECRET.to_string(),
        per_page: 15,
        filter_debounce_ms: 500,
        api_timeout_secs: 5,
        session_ttl_secs: 3600,
        access: AccessConfig::default(),
        dev_admin_email: None,
        dev_admin_password: None,
    }
}

pub fn admin() -> AuthenticatedUser {
    AuthenticatedUser {
        sub: "1".to_string(),
        email: "admin@example.com".to_string(),
        name: "Admin".to_string(),
        roles: vec!["admin".to_string()],
        permissions: vec![],
        access_token: "remote-token".to_string(),
        exp: 4_102_444_800,
    }
}

/// Full application wired the way `lms_admin::run` wires it.
macro_rules! test_app {
    ($config:expr) => {{
        let config: lms_admin::models::config::ServerConfig = $config;
        let key = actix_web::cookie::Key::from(config.secret.as_bytes());
        let message_store =
            actix_web_flash_messages::storage::CookieMessageStore::builder(key.clone()).build();
        let message_framework =
            actix_web_flash_messages::FlashMessagesFramework::builder(message_store).build();
        let tera = tera::Tera::new(&config.templates_dir).unwrap();
        let api = lms_admin::api::client::ApiClient::new(
            &config.api_base_url,
            std::time::Duration::from_secs(config.api_timeout_secs),
        )
        .unwrap();

        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(message_framework)
                .wrap(actix_identity::IdentityMiddleware::default())
                .wrap(
                    actix_session::SessionMiddleware::builder(
                        actix_session::storage::CookieSessionStore::default(),
                        key,
                    )
                    .cookie_secure(false)
                    .build(),
                )
                .configure(lms_admin::routes::configure)
                .app_data(actix_web::web::Data::new(tera))
                .app_data(actix_web::web::Data::new(api))
                .app_data(actix_web::web::Data::new(config)),
        )
        .await
    }};
}
