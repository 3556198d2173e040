use actix_files::Files;
use actix_web::{error, web};

use crate::constants::{MAX_JSON_BODY, UPLOADS_ROUTE};
use crate::error::AppError;
use crate::handler::{FileHandler, UserHandler};
use std::path::Path;

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/register", web::post().to(UserHandler::register))
        .route("/login", web::post().to(UserHandler::login))
        .route("/files", web::get().to(FileHandler::get_files))
        .route("/upload", web::post().to(FileHandler::upload))
        .route("/delete-file", web::post().to(FileHandler::delete_file))
        .route("/upload-cropped", web::post().to(FileHandler::upload_cropped));
}

/// Serves blobs by saved name. No directory listing.
pub fn uploads(upload_dir: &Path) -> Files {
    Files::new(UPLOADS_ROUTE, upload_dir)
}

/// Bad JSON bodies get the same `{message}` envelope as every other error.
/// The limit leaves room for a base64 cropped image of the maximum upload size.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().limit(MAX_JSON_BODY).error_handler(|err, _req| {
        let message = match &err {
            error::JsonPayloadError::ContentType => "Expected a JSON body".to_string(),
            other => format!("Invalid JSON body: {}", other),
        };
        AppError::validation(message).into()
    })
}
