//! Generic CRUD pages mounted once per resource under its base path.

use actix_web::{HttpRequest, HttpResponse, Scope, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::Deserialize;
use tera::Tera;

use crate::api::client::ApiClient;
use crate::domain::auth::AuthenticatedUser;
use crate::domain::resource::Resource;
use crate::dto::resources::FormPageData;
use crate::filters::FilterState;
use crate::forms::resources::ResourceForm;
use crate::models::config::ServerConfig;
use crate::routes::{base_context, redirect, render_template, service_error_response};
use crate::services::resources::{self as resources_service, ListSettings, SaveOutcome};

#[derive(Deserialize)]
pub struct DeleteForm {
    #[serde(default)]
    pub return_to: Option<String>,
}

/// Routes of one resource:
///
/// | method | path              | page                 |
/// |--------|-------------------|----------------------|
/// | GET    | `""`              | filtered listing     |
/// | GET    | `/new`            | create form          |
/// | POST   | `/new`            | create               |
/// | GET    | `/{id}`           | detail               |
/// | GET    | `/{id}/edit`      | edit form            |
/// | POST   | `/{id}/edit`      | update               |
/// | POST   | `/{id}/delete`    | delete, then go back |
pub fn resource_scope<R: Resource>() -> Scope {
    web::scope(&R::base_path())
        .route("", web::get().to(list::<R>))
        .route("/new", web::get().to(new_form::<R>))
        .route("/new", web::post().to(create::<R>))
        .route("/{id}", web::get().to(show::<R>))
        .route("/{id}/edit", web::get().to(edit_form::<R>))
        .route("/{id}/edit", web::post().to(update::<R>))
        .route("/{id}/delete", web::post().to(delete::<R>))
}

pub(crate) fn list_settings(server_config: &ServerConfig) -> ListSettings {
    ListSettings {
        per_page: server_config.per_page,
        debounce_ms: server_config.filter_debounce_ms,
    }
}

async fn list<R: Resource>(
    req: HttpRequest,
    user: AuthenticatedUser,
    api: web::Data<ApiClient>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> HttpResponse {
    let params = FilterState::parse(req.query_string());

    match resources_service::load_list_page::<R, _>(
        api.get_ref(),
        Some(&user),
        &params,
        list_settings(&server_config),
    )
    .await
    {
        Ok(data) => {
            let mut context = base_context(&flash_messages, Some(&user), R::SLUG);
            context.insert("page", &data);
            render_template(&tera, "resources/index.html", &context)
        }
        Err(err) => service_error_response(err, &server_config.access.home_path),
    }
}

async fn show<R: Resource>(
    id: web::Path<i64>,
    user: AuthenticatedUser,
    api: web::Data<ApiClient>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> HttpResponse {
    match resources_service::load_detail_page::<R, _>(api.get_ref(), Some(&user), id.into_inner())
        .await
    {
        Ok(data) => {
            let mut context = base_context(&flash_messages, Some(&user), R::SLUG);
            context.insert("page", &data);
            render_template(&tera, "resources/show.html", &context)
        }
        Err(err) => service_error_response(err, &R::base_path()),
    }
}

fn render_form(
    tera: &Tera,
    flash_messages: &IncomingFlashMessages,
    user: &AuthenticatedUser,
    current_page: &str,
    data: &FormPageData,
) -> HttpResponse {
    let mut context = base_context(flash_messages, Some(user), current_page);
    context.insert("page", data);
    render_template(tera, "resources/form.html", &context)
}

async fn new_form<R: Resource>(
    user: AuthenticatedUser,
    api: web::Data<ApiClient>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> HttpResponse {
    match resources_service::load_form_page::<R, _>(api.get_ref(), &user, None).await {
        Ok(data) => render_form(&tera, &flash_messages, &user, R::SLUG, &data),
        Err(err) => service_error_response(err, &R::base_path()),
    }
}

async fn edit_form<R: Resource>(
    id: web::Path<i64>,
    user: AuthenticatedUser,
    api: web::Data<ApiClient>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> HttpResponse {
    match resources_service::load_form_page::<R, _>(api.get_ref(), &user, Some(id.into_inner()))
        .await
    {
        Ok(data) => render_form(&tera, &flash_messages, &user, R::SLUG, &data),
        Err(err) => service_error_response(err, &R::base_path()),
    }
}

async fn save<R: Resource>(
    id: Option<i64>,
    user: AuthenticatedUser,
    api: web::Data<ApiClient>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    body: web::Bytes,
) -> HttpResponse {
    let form = match ResourceForm::parse(&body) {
        Ok(form) => form,
        Err(err) => {
            log::warn!("Rejected {} form body: {err}", R::SLUG);
            FlashMessage::error("The submitted form could not be read.").send();
            return redirect(&R::base_path());
        }
    };

    match resources_service::save_resource::<R, _>(api.get_ref(), &user, id, form).await {
        Ok(SaveOutcome::Saved { message }) => {
            FlashMessage::success(message).send();
            redirect(&R::base_path())
        }
        Ok(SaveOutcome::Rejected(data)) => {
            render_form(&tera, &flash_messages, &user, R::SLUG, &data)
        }
        Err(err) => service_error_response(err, &R::base_path()),
    }
}

async fn create<R: Resource>(
    user: AuthenticatedUser,
    api: web::Data<ApiClient>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    body: web::Bytes,
) -> HttpResponse {
    save::<R>(None, user, api, flash_messages, tera, body).await
}

async fn update<R: Resource>(
    id: web::Path<i64>,
    user: AuthenticatedUser,
    api: web::Data<ApiClient>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    body: web::Bytes,
) -> HttpResponse {
    save::<R>(Some(id.into_inner()), user, api, flash_messages, tera, body).await
}

/// Where to go after a delete: the submitted listing URL when it belongs to
/// this resource, the bare listing otherwise.
fn return_target<R: Resource>(return_to: Option<&str>) -> String {
    let base_path = R::base_path();
    match return_to {
        Some(url)
            if url == base_path
                || url.starts_with(&format!("{base_path}?"))
                || url.starts_with(&format!("{base_path}/")) =>
        {
            url.to_string()
        }
        _ => base_path,
    }
}

async fn delete<R: Resource>(
    id: web::Path<i64>,
    user: AuthenticatedUser,
    api: web::Data<ApiClient>,
    web::Form(form): web::Form<DeleteForm>,
) -> HttpResponse {
    let target = return_target::<R>(form.return_to.as_deref());

    match resources_service::delete_resource::<R, _>(api.get_ref(), &user, id.into_inner()).await {
        Ok(message) => {
            FlashMessage::success(message).send();
            redirect(&target)
        }
        Err(err) => service_error_response(err, &target),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::location::District;

    #[test]
    fn delete_returns_to_listing_with_filters() {
        assert_eq!(
            return_target::<District>(Some("/dashboard/districts?status=active&page=3")),
            "/dashboard/districts?status=active&page=3"
        );
        assert_eq!(
            return_target::<District>(Some("/dashboard/districts")),
            "/dashboard/districts"
        );
    }

    #[test]
    fn delete_ignores_foreign_return_targets() {
        assert_eq!(
            return_target::<District>(Some("https://evil.example")),
            "/dashboard/districts"
        );
        assert_eq!(
            return_target::<District>(Some("/dashboard/districtsX")),
            "/dashboard/districts"
        );
        assert_eq!(return_target::<District>(None), "/dashboard/districts");
    }
}
