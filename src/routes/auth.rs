use actix_identity::Identity;
use actix_web::{HttpMessage, HttpRequest, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::Deserialize;
use tera::Tera;

use crate::api::client::ApiClient;
use crate::forms::auth::LoginForm;
use crate::middleware::login_redirect;
use crate::models::auth::encode_session;
use crate::models::config::ServerConfig;
use crate::routes::{base_context, redirect, render_template};
use crate::services::ServiceError;
use crate::services::auth::{self as auth_service, safe_callback};

#[derive(Deserialize)]
struct LoginQuery {
    #[serde(default, rename = "callbackUrl")]
    callback_url: Option<String>,
}

#[get("/login")]
pub async fn show_login(
    query: web::Query<LoginQuery>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let mut context = base_context(&flash_messages, None, "login");
    context.insert(
        "callback_url",
        &safe_callback(
            query.callback_url.as_deref(),
            &server_config.access.home_path,
        ),
    );
    context.insert("prefill_email", &server_config.dev_admin_email);
    context.insert("prefill_password", &server_config.dev_admin_password);
    render_template(&tera, "auth/login.html", &context)
}

#[post("/login")]
pub async fn login(
    req: HttpRequest,
    api: web::Data<ApiClient>,
    server_config: web::Data<ServerConfig>,
    web::Form(form): web::Form<LoginForm>,
) -> impl Responder {
    let target = safe_callback(
        form.callback_url.as_deref(),
        &server_config.access.home_path,
    );

    let user = match auth_service::login(api.get_ref(), &form, server_config.session_ttl_secs).await
    {
        Ok(user) => user,
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            return redirect(&login_redirect(&server_config.access.login_path, &target));
        }
        Err(err) => {
            log::error!("Failed to sign in: {err}");
            FlashMessage::error(err.to_string()).send();
            return redirect(&login_redirect(&server_config.access.login_path, &target));
        }
    };

    let token = match encode_session(&user, &server_config.secret) {
        Ok(token) => token,
        Err(err) => {
            log::error!("Failed to encode session: {err}");
            FlashMessage::error("Could not start a session. Please try again.").send();
            return redirect(&server_config.access.login_path);
        }
    };

    if let Err(err) = Identity::login(&req.extensions(), token) {
        log::error!("Failed to attach identity: {err}");
        FlashMessage::error("Could not start a session. Please try again.").send();
        return redirect(&server_config.access.login_path);
    }

    log::info!("User {} signed in", user.email);
    redirect(&target)
}

#[post("/logout")]
pub async fn logout(
    identity: Option<Identity>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    if let Some(identity) = identity {
        identity.logout();
    }
    redirect(&server_config.access.login_path)
}
