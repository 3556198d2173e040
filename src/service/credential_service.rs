use actix_web::web;
use sqlx::sqlite::SqlitePool;
use uuid::Uuid;

use crate::constants::{
    BCRYPT_COST, MESSAGE_LOGIN_FAILED, MESSAGE_LOGIN_MISSING_FIELDS, MESSAGE_PASSWORD_MISMATCH,
    MESSAGE_REGISTER_MISSING_FIELDS,
};
use crate::error::AppError;
use crate::model::{RegisterRequest, User, UserLogin, UserSummary};
use crate::repo::UserRepo;

pub struct CredentialService;

impl CredentialService {
    pub async fn register(pool: &SqlitePool, req: RegisterRequest) -> Result<UserSummary, AppError> {
        let (Some(username), Some(password), Some(confirm)) = (
            present(req.username),
            present(req.password),
            present(req.confirm_password),
        ) else {
            return Err(AppError::validation(MESSAGE_REGISTER_MISSING_FIELDS));
        };

        if password != confirm {
            return Err(AppError::validation(MESSAGE_PASSWORD_MISMATCH));
        }

        let password_hash = web::block(move || bcrypt::hash(password, BCRYPT_COST))
            .await?
            .map_err(|e| AppError::Storage(anyhow::anyhow!("hashing password: {}", e)))?;

        let user = User {
            id: Uuid::new_v4().to_string(),
            username,
            password_hash,
        };
        UserRepo::new(pool).create_user(&user).await?;

        log::info!("## Registered user {}", user.id);
        Ok(user.into())
    }

    /// Returns the user id for a correct username/password pair. An unknown
    /// user and a wrong password produce the same error.
    pub async fn verify(pool: &SqlitePool, creds: UserLogin) -> Result<String, AppError> {
        let (Some(username), Some(password)) = (present(creds.username), present(creds.password)) else {
            return Err(AppError::validation(MESSAGE_LOGIN_MISSING_FIELDS));
        };

        let Some(user) = UserRepo::new(pool).get_user_by_username(&username).await? else {
            return Err(AppError::auth(MESSAGE_LOGIN_FAILED));
        };

        let hash = user.password_hash;
        let matches = web::block(move || bcrypt::verify(password, &hash)).await?;
        match matches {
            Ok(true) => Ok(user.id),
            Ok(false) => Err(AppError::auth(MESSAGE_LOGIN_FAILED)),
            Err(e) => {
                log::warn!("## Unusable password hash for user {}: {}", user.id, e);
                Err(AppError::auth(MESSAGE_LOGIN_FAILED))
            }
        }
    }
}

fn present(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.is_empty())
}
