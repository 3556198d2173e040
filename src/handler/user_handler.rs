use actix_web::{web, HttpResponse};
use sqlx::sqlite::SqlitePool;

use crate::error::AppError;
use crate::jwt::Jwt;
use crate::model::{RegisterRequest, TokenResponse, UserLogin};
use crate::service::CredentialService;

pub struct UserHandler;

impl UserHandler {
    pub async fn register(
        user_data: web::Json<RegisterRequest>,
        pool: web::Data<SqlitePool>,
    ) -> Result<HttpResponse, AppError> {
        let user = CredentialService::register(pool.get_ref(), user_data.into_inner()).await?;
        Ok(HttpResponse::Created().json(user))
    }

    pub async fn login(
        creds: web::Json<UserLogin>,
        pool: web::Data<SqlitePool>,
        jwt: web::Data<Jwt>,
    ) -> Result<HttpResponse, AppError> {
        let user_id = CredentialService::verify(pool.get_ref(), creds.into_inner()).await?;
        let token = jwt.issue(&user_id)?;
        log::info!("## User {} logged in", user_id);
        Ok(HttpResponse::Ok().json(TokenResponse { token }))
    }
}
