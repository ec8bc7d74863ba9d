use actix_web::{HttpResponse, Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::api::client::ApiClient;
use crate::domain::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::routes::{base_context, redirect, render_template, service_error_response};
use crate::services::dashboard as dashboard_service;

/// Landing page; signed-in users go straight to the dashboard.
#[get("/")]
pub async fn index(
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    if user.is_some() {
        return redirect(&server_config.access.home_path);
    }

    let context = base_context(&flash_messages, None, "index");
    render_template(&tera, "main/index.html", &context)
}

#[get("/dashboard")]
pub async fn dashboard(
    user: AuthenticatedUser,
    api: web::Data<ApiClient>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match dashboard_service::load_dashboard(api.get_ref(), &user).await {
        Ok(data) => {
            let mut context = base_context(&flash_messages, Some(&user), "dashboard");
            context.insert("page", &data);
            render_template(&tera, "main/dashboard.html", &context)
        }
        Err(err) => service_error_response(err, "/"),
    }
}

#[get("/na")]
pub async fn not_assigned(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> HttpResponse {
    let context = base_context(&flash_messages, Some(&user), "na");
    render_template(&tera, "main/not_assigned.html", &context)
}
