//! Session token handling for the signed-in user.
//!
//! The identity cookie stores a JWT signed with the server secret. The token
//! wraps [`AuthenticatedUser`], including the remote API access token.

use std::future::{Ready, ready};

use actix_identity::IdentityExt;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;

use crate::api::client::LoginData;
use crate::domain::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
    #[error("no identity attached to the request")]
    MissingIdentity,
}

/// Builds the session user from a login response.
pub fn session_from_login(data: LoginData, ttl_secs: u64) -> AuthenticatedUser {
    let exp = Utc::now().timestamp().max(0) as usize + ttl_secs as usize;
    AuthenticatedUser {
        sub: data.user.id.to_string(),
        email: data.user.email,
        name: data.user.name,
        roles: data.user.roles,
        permissions: data.user.permissions,
        access_token: data.access_token,
        exp,
    }
}

pub fn encode_session(user: &AuthenticatedUser, secret: &str) -> Result<String, SessionError> {
    Ok(encode(
        &Header::default(),
        user,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?)
}

/// Decodes and validates (signature and expiry) a session token.
pub fn decode_session(token: &str, secret: &str) -> Result<AuthenticatedUser, SessionError> {
    let data = decode::<AuthenticatedUser>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}

/// Session user of the current request, if any.
pub fn session_from_request(req: &HttpRequest) -> Option<AuthenticatedUser> {
    let config = req.app_data::<web::Data<ServerConfig>>()?;
    let identity = req.get_identity().ok()?;
    let token = identity.id().ok()?;
    match decode_session(&token, &config.secret) {
        Ok(user) => Some(user),
        Err(e) => {
            log::warn!("Discarding invalid session: {e}");
            None
        }
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            session_from_request(req)
                .ok_or_else(|| actix_web::error::ErrorUnauthorized(SessionError::MissingIdentity)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::RemoteUser;

    fn login_data() -> LoginData {
        LoginData {
            access_token: "remote-token".to_string(),
            user: RemoteUser {
                id: 5,
                name: "Admin".to_string(),
                email: "admin@example.com".to_string(),
                roles: vec!["admin".to_string()],
                permissions: vec![],
            },
        }
    }

    #[test]
    fn session_round_trips_through_jwt() {
        let user = session_from_login(login_data(), 3600);
        let token = encode_session(&user, "secret").unwrap();

        assert_eq!(decode_session(&token, "secret").unwrap(), user);
        assert!(decode_session(&token, "other-secret").is_err());
    }

    #[test]
    fn expired_session_is_rejected() {
        let mut user = session_from_login(login_data(), 0);
        user.exp = 1;
        let token = encode_session(&user, "secret").unwrap();

        assert!(decode_session(&token, "secret").is_err());
    }
}
