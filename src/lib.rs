//! Administrative dashboard for a learning-management platform.
//!
//! The dashboard renders server-side pages over a remote REST API. Every
//! entity listing shares one pipeline: query parameters are sanitized into a
//! [`filters::query::ListQuery`], the API envelope is decoded into a typed
//! result, and rows are rendered with a [`pagination::PaginationControl`].

#[cfg(feature = "server")]
use std::time::Duration;

#[cfg(feature = "server")]
use actix_identity::IdentityMiddleware;
#[cfg(feature = "server")]
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
#[cfg(feature = "server")]
use actix_web::cookie::Key;
#[cfg(feature = "server")]
use actix_web::middleware::{Compress, Logger};
#[cfg(feature = "server")]
use actix_web::{App, HttpServer, web};
#[cfg(feature = "server")]
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
#[cfg(feature = "server")]
use tera::Tera;

#[cfg(feature = "server")]
use crate::api::client::ApiClient;
#[cfg(feature = "server")]
use crate::models::config::ServerConfig;

pub mod api;
pub mod domain;
pub mod filters;
pub mod pagination;

#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "server")]
mod error_conversions;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "server")]
pub mod middleware;
#[cfg(feature = "server")]
pub mod models;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod services;

/// Builds and runs the Actix-Web HTTP server using the provided configuration.
#[cfg(feature = "server")]
pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
    let api = ApiClient::new(
        &server_config.api_base_url,
        Duration::from_secs(server_config.api_timeout_secs),
    )
    .map_err(|e| std::io::Error::other(format!("Failed to build API client: {e:?}")))?;

    // Keys and stores for identity, sessions, and flash messages.
    let secret_key = Key::try_from(server_config.secret.as_bytes()).map_err(|e| {
        std::io::Error::other(format!("Secret must be at least 64 bytes long: {e}"))
    })?;

    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let tera = Tera::new(&server_config.templates_dir)
        .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;

    let bind_address = (server_config.address.clone(), server_config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(message_framework.clone())
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false) // set to true in prod
                    .cookie_domain(Some(server_config.domain.clone()))
                    .build(),
            )
            .wrap(Compress::default())
            .wrap(Logger::default())
            .service(actix_files::Files::new("/assets", "./assets"))
            .configure(routes::configure)
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(api.clone()))
            .app_data(web::Data::new(server_config.clone()))
    })
    .bind(bind_address)?
    .run()
    .await
}
