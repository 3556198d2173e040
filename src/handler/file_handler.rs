use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use futures_util::TryStreamExt as _;
use sqlx::sqlite::SqlitePool;

use crate::auth::AuthUser;
use crate::config::Settings;
use crate::constants::{
    MAX_UPLOAD_SIZE, MESSAGE_CROPPED_UPLOADED, MESSAGE_FILE_DELETED, MESSAGE_FILE_TOO_LARGE,
    MESSAGE_NO_FILE, UPLOAD_FIELD,
};
use crate::error::{AppError, MessageResponse};
use crate::model::{CroppedUploadRequest, DeleteFileRequest, FileEntry, IncomingFile, UploadResponse};
use crate::service::{file_url_path, FileService};
use crate::storage::BlobStore;
use crate::utils::sanitize_base_name;

pub struct FileHandler;

impl FileHandler {
    pub async fn get_files(
        pool: web::Data<SqlitePool>,
        blobs: web::Data<BlobStore>,
        user: AuthUser,
    ) -> Result<HttpResponse, AppError> {
        let files = FileService::new(pool.get_ref(), blobs.get_ref()).list(&user).await?;
        let entries: Vec<FileEntry> = files.into_iter().map(FileEntry::from).collect();
        Ok(HttpResponse::Ok().json(entries))
    }

    pub async fn upload(
        pool: web::Data<SqlitePool>,
        blobs: web::Data<BlobStore>,
        settings: web::Data<Settings>,
        user: AuthUser,
        payload: Multipart,
    ) -> Result<HttpResponse, AppError> {
        let incoming = read_upload(payload).await?;
        let record = FileService::new(pool.get_ref(), blobs.get_ref())
            .upload(&user, incoming)
            .await?;

        let file_url = file_url_path(&record.saved_name);
        let full_url = settings.full_url(&file_url);
        Ok(HttpResponse::Created().json(UploadResponse { file_url, full_url }))
    }

    pub async fn delete_file(
        pool: web::Data<SqlitePool>,
        blobs: web::Data<BlobStore>,
        user: AuthUser,
        body: web::Json<DeleteFileRequest>,
    ) -> Result<HttpResponse, AppError> {
        let req = body.into_inner();
        if let Some(claimed) = req.saved_name.as_deref() {
            log::debug!("## Delete of {} names blob {} (ignored)", req.file_id, claimed);
        }

        FileService::new(pool.get_ref(), blobs.get_ref())
            .delete(&user, &req.file_id)
            .await?;
        Ok(HttpResponse::Ok().json(MessageResponse::new(MESSAGE_FILE_DELETED)))
    }

    pub async fn upload_cropped(
        pool: web::Data<SqlitePool>,
        blobs: web::Data<BlobStore>,
        user: AuthUser,
        body: web::Json<CroppedUploadRequest>,
    ) -> Result<HttpResponse, AppError> {
        FileService::new(pool.get_ref(), blobs.get_ref())
            .replace_cropped(&user, &body.saved_name, &body.cropped_image)
            .await?;
        Ok(HttpResponse::Ok().json(MessageResponse::new(MESSAGE_CROPPED_UPLOADED)))
    }
}

/// Pulls the first `file` part that carries a filename out of the body,
/// giving up as soon as it grows past the size cap.
async fn read_upload(mut payload: Multipart) -> Result<IncomingFile, AppError> {
    while let Some(mut field) = payload.try_next().await.map_err(malformed)? {
        let Some(disposition) = field.content_disposition() else {
            continue;
        };
        let file_name = match (disposition.get_name(), disposition.get_filename()) {
            (Some(UPLOAD_FIELD), Some(name)) => name.to_string(),
            _ => continue,
        };
        let content_type = field.content_type().map(|mime| mime.essence_str().to_string());
        log::debug!("## GOT a file: {}", sanitize_base_name(&file_name));

        let mut data = Vec::new();
        while let Some(chunk) = field.try_next().await.map_err(malformed)? {
            if data.len() + chunk.len() > MAX_UPLOAD_SIZE {
                return Err(AppError::validation(MESSAGE_FILE_TOO_LARGE));
            }
            data.extend_from_slice(&chunk);
        }

        return Ok(IncomingFile {
            file_name,
            content_type,
            data,
        });
    }

    Err(AppError::validation(MESSAGE_NO_FILE))
}

fn malformed(e: actix_multipart::MultipartError) -> AppError {
    AppError::validation(format!("Malformed upload: {}", e))
}
