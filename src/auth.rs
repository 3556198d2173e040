use actix_web::dev::Payload;
use actix_web::http::header::Header;
use actix_web::{web, FromRequest, HttpRequest};
use actix_web_httpauth::headers::authorization::{Authorization, Bearer};
use std::future::{ready, Ready};

use crate::constants::MESSAGE_TOKEN_MISSING;
use crate::error::AppError;
use crate::jwt::Jwt;

/// Identity proven by a valid bearer token. Handlers that take an `AuthUser`
/// never run for unauthenticated requests.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
}

impl FromRequest for AuthUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthUser, AppError> {
    let jwt = req
        .app_data::<web::Data<Jwt>>()
        .ok_or_else(|| AppError::Storage(anyhow::anyhow!("token verifier is not configured")))?;

    let header = Authorization::<Bearer>::parse(req)
        .map_err(|_| AppError::auth(MESSAGE_TOKEN_MISSING))?;

    let user_id = jwt.verify(header.into_scheme().token())?;
    Ok(AuthUser { user_id })
}
