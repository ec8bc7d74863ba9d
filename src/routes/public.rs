//! Course catalogue readable without signing in.

use actix_web::{HttpRequest, Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::api::client::ApiClient;
use crate::domain::auth::AuthenticatedUser;
use crate::domain::catalog::PublicCourse;
use crate::filters::FilterState;
use crate::models::config::ServerConfig;
use crate::routes::resources::list_settings;
use crate::routes::{base_context, render_template, service_error_response};
use crate::services::resources as resources_service;

#[get("/courses")]
pub async fn courses(
    req: HttpRequest,
    user: Option<AuthenticatedUser>,
    api: web::Data<ApiClient>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let params = FilterState::parse(req.query_string());

    match resources_service::load_list_page::<PublicCourse, _>(
        api.get_ref(),
        user.as_ref(),
        &params,
        list_settings(&server_config),
    )
    .await
    {
        Ok(data) => {
            let mut context = base_context(&flash_messages, user.as_ref(), "courses");
            context.insert("page", &data);
            render_template(&tera, "public/courses.html", &context)
        }
        Err(err) => service_error_response(err, "/"),
    }
}

#[get("/courses/{id}")]
pub async fn course(
    id: web::Path<i64>,
    user: Option<AuthenticatedUser>,
    api: web::Data<ApiClient>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match resources_service::load_detail_page::<PublicCourse, _>(
        api.get_ref(),
        user.as_ref(),
        id.into_inner(),
    )
    .await
    {
        Ok(data) => {
            let mut context = base_context(&flash_messages, user.as_ref(), "courses");
            context.insert("page", &data);
            render_template(&tera, "public/course.html", &context)
        }
        Err(err) => service_error_response(err, "/courses"),
    }
}
