//! HTTP handlers and the helpers they share.

use actix_web::middleware::from_fn;
use actix_web::{HttpResponse, http::header, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages, Level};
use tera::{Context, Tera};

use crate::domain::auth::AuthenticatedUser;
use crate::domain::blog::BlogCategory;
use crate::domain::catalog::{Category, Coupon, Course, Enrollment, Group};
use crate::domain::location::{Branch, District, Division};
use crate::domain::people::{Student, Teacher};
use crate::middleware::route_guard;
use crate::services::ServiceError;
use crate::services::dashboard::navigation;

pub mod auth;
pub mod main;
pub mod public;
pub mod resources;

/// Maps a flash message level onto the CSS alert class.
pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        _ => "info",
    }
}

/// `303 See Other` to `location`.
pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Maps a failed service call onto a flash message and a redirect.
///
/// `Unauthorized` becomes a bare `401`, which the route guard turns into a
/// redirect to the login page.
pub fn service_error_response(err: ServiceError, fallback: &str) -> HttpResponse {
    match err {
        ServiceError::Unauthorized => HttpResponse::Unauthorized().finish(),
        ServiceError::Forbidden => {
            FlashMessage::error("You do not have permission for this action.").send();
            redirect("/na")
        }
        ServiceError::NotFound | ServiceError::TypeConstraint(_) => {
            FlashMessage::error("The requested record was not found.").send();
            redirect(fallback)
        }
        ServiceError::Form(message) | ServiceError::Validation { message, .. } => {
            FlashMessage::error(message).send();
            redirect(fallback)
        }
        ServiceError::Api(err) => {
            log::error!("Remote API call failed: {err:?}");
            FlashMessage::error(err.to_string()).send();
            redirect(fallback)
        }
    }
}

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(e) => {
            log::error!("Failed to render template '{template}': {e:?}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Context every page starts from: alerts, the signed-in user and the
/// navigation entries they may open.
pub fn base_context(
    flash_messages: &IncomingFlashMessages,
    user: Option<&AuthenticatedUser>,
    current_page: &str,
) -> Context {
    let alerts = flash_messages
        .iter()
        .map(|f| (f.content(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_user", &user);
    context.insert("current_page", current_page);
    context.insert("navigation", &user.map(navigation).unwrap_or_default());
    context
}

/// Registers every route behind the route guard.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("")
            .wrap(from_fn(route_guard))
            .service(main::index)
            .service(main::dashboard)
            .service(main::not_assigned)
            .service(auth::show_login)
            .service(auth::login)
            .service(auth::logout)
            .service(public::courses)
            .service(public::course)
            .service(resources::resource_scope::<Division>())
            .service(resources::resource_scope::<District>())
            .service(resources::resource_scope::<Branch>())
            .service(resources::resource_scope::<Category>())
            .service(resources::resource_scope::<Course>())
            .service(resources::resource_scope::<Group>())
            .service(resources::resource_scope::<Enrollment>())
            .service(resources::resource_scope::<Coupon>())
            .service(resources::resource_scope::<BlogCategory>())
            .service(resources::resource_scope::<Student>())
            .service(resources::resource_scope::<Teacher>()),
    );
}
