use sqlx::sqlite::SqlitePool;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::constants::{
    MAX_UPLOAD_SIZE, MESSAGE_BAD_IMAGE_DATA, MESSAGE_FILE_NOT_FOUND, MESSAGE_FILE_TOO_LARGE,
    MESSAGE_FILE_TYPE_NOT_ALLOWED, MESSAGE_NOT_AN_IMAGE, UPLOADS_ROUTE,
};
use crate::error::AppError;
use crate::model::{FileRecord, IncomingFile};
use crate::repo::FileRepo;
use crate::storage::BlobStore;
use crate::utils::{decode_data_url, is_allowed_mime, is_image_name, sanitize_base_name};

/// Ties the registry and the blob store together. Neither store is
/// transactional with the other, so every write path orders its steps so
/// that a failure leaves no blob without a record and no record without a
/// blob.
pub struct FileService<'a> {
    files: FileRepo<'a>,
    blobs: &'a BlobStore,
}

impl<'a> FileService<'a> {
    pub fn new(pool: &'a SqlitePool, blobs: &'a BlobStore) -> Self {
        Self {
            files: FileRepo::new(pool),
            blobs,
        }
    }

    pub async fn list(&self, user: &AuthUser) -> Result<Vec<FileRecord>, AppError> {
        Ok(self.files.list_by_owner(&user.user_id).await?)
    }

    /// Validate, write the blob, then register it. If registration fails the
    /// blob is removed again before the error is returned.
    pub async fn upload(&self, user: &AuthUser, file: IncomingFile) -> Result<FileRecord, AppError> {
        validate_upload(&file)?;

        let original_name = sanitize_base_name(&file.file_name);
        let saved_name = BlobStore::generate_name(&original_name);
        let file_url = Uuid::new_v4().to_string();

        self.blobs.write(&saved_name, &file.data).await?;

        match self
            .files
            .insert(&user.user_id, &original_name, &saved_name, &file_url)
            .await
        {
            Ok(record) => {
                log::info!(
                    "## User {} uploaded {} as {} ({} bytes)",
                    user.user_id,
                    original_name,
                    saved_name,
                    file.data.len()
                );
                Ok(record)
            }
            Err(e) => {
                log::error!("## Registry insert failed for {}, removing blob", saved_name);
                if let Err(cleanup) = self.blobs.delete(&saved_name).await {
                    log::error!("## Could not remove orphan blob {}: {}", saved_name, cleanup);
                }
                Err(e.into())
            }
        }
    }

    /// Removes the record first; the blob goes only once the caller is known
    /// to own it.
    pub async fn delete(&self, user: &AuthUser, file_id: &str) -> Result<(), AppError> {
        let saved_name = self
            .files
            .delete_by_id_and_owner(file_id, &user.user_id)
            .await?
            .ok_or_else(|| AppError::not_found(MESSAGE_FILE_NOT_FOUND))?;

        self.blobs.delete(&saved_name).await?;
        log::info!("## User {} deleted file {} ({})", user.user_id, file_id, saved_name);
        Ok(())
    }

    /// Overwrites the blob of an image the caller already owns. The record is
    /// left untouched.
    pub async fn replace_cropped(
        &self,
        user: &AuthUser,
        saved_name: &str,
        cropped_image: &str,
    ) -> Result<(), AppError> {
        self.files
            .find_by_saved_name_and_owner(saved_name, &user.user_id)
            .await?
            .ok_or_else(|| AppError::not_found(MESSAGE_FILE_NOT_FOUND))?;

        if !is_image_name(saved_name) {
            return Err(AppError::validation(MESSAGE_NOT_AN_IMAGE));
        }

        let data = decode_data_url(cropped_image)
            .ok_or_else(|| AppError::validation(MESSAGE_BAD_IMAGE_DATA))?;
        if data.len() > MAX_UPLOAD_SIZE {
            return Err(AppError::validation(MESSAGE_FILE_TOO_LARGE));
        }

        self.blobs.write(saved_name, &data).await?;
        log::info!("## User {} replaced {} with a cropped image", user.user_id, saved_name);
        Ok(())
    }
}

pub fn file_url_path(saved_name: &str) -> String {
    format!("{}/{}", UPLOADS_ROUTE, saved_name)
}

fn validate_upload(file: &IncomingFile) -> Result<(), AppError> {
    if file.data.len() > MAX_UPLOAD_SIZE {
        return Err(AppError::validation(MESSAGE_FILE_TOO_LARGE));
    }
    if !is_allowed_mime(file.content_type.as_deref()) {
        return Err(AppError::validation(MESSAGE_FILE_TYPE_NOT_ALLOWED));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory_pool;

    async fn owner(pool: &SqlitePool, id: &str) -> AuthUser {
        sqlx::query("INSERT INTO users (id, username, password_hash) VALUES (?, ?, 'x')")
            .bind(id)
            .bind(id)
            .execute(pool)
            .await
            .unwrap();
        AuthUser { user_id: id.to_string() }
    }

    fn png(name: &str, len: usize) -> IncomingFile {
        IncomingFile {
            file_name: name.to_string(),
            content_type: Some("image/png".to_string()),
            data: vec![7u8; len],
        }
    }

    fn blob_count(store: &BlobStore) -> usize {
        std::fs::read_dir(store.root()).map(|d| d.count()).unwrap_or(0)
    }

    #[actix_rt::test]
    async fn upload_registers_and_stores() {
        let pool = memory_pool().await;
        let dir = tempfile::tempdir().unwrap();
        let blobs = BlobStore::new(dir.path());
        let alice = owner(&pool, "alice").await;
        let service = FileService::new(&pool, &blobs);

        let record = service.upload(&alice, png("../../cat.png", 2048)).await.unwrap();
        assert_eq!(record.original_name, "cat.png");
        assert!(record.saved_name.ends_with(".png"));
        assert_eq!(std::fs::read(dir.path().join(&record.saved_name)).unwrap().len(), 2048);
    }

    #[actix_rt::test]
    async fn failed_registration_removes_blob() {
        let pool = memory_pool().await;
        let dir = tempfile::tempdir().unwrap();
        let blobs = BlobStore::new(dir.path());
        // owner row missing: the foreign key makes the insert fail after the write
        let ghost = AuthUser { user_id: "ghost".to_string() };
        let service = FileService::new(&pool, &blobs);

        let err = service.upload(&ghost, png("cat.png", 10)).await.unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));
        assert_eq!(blob_count(&blobs), 0);
    }

    #[actix_rt::test]
    async fn rejected_uploads_touch_nothing() {
        let pool = memory_pool().await;
        let dir = tempfile::tempdir().unwrap();
        let blobs = BlobStore::new(dir.path());
        let alice = owner(&pool, "alice").await;
        let service = FileService::new(&pool, &blobs);

        let too_big = service.upload(&alice, png("big.png", MAX_UPLOAD_SIZE + 1)).await;
        assert!(matches!(too_big, Err(AppError::Validation(_))));

        let mut html = png("page.html", 10);
        html.content_type = Some("text/html".to_string());
        assert!(matches!(service.upload(&alice, html).await, Err(AppError::Validation(_))));

        assert_eq!(blob_count(&blobs), 0);
        assert!(service.list(&alice).await.unwrap().is_empty());
    }

    #[actix_rt::test]
    async fn delete_is_owner_scoped() {
        let pool = memory_pool().await;
        let dir = tempfile::tempdir().unwrap();
        let blobs = BlobStore::new(dir.path());
        let alice = owner(&pool, "alice").await;
        let bob = owner(&pool, "bob").await;
        let service = FileService::new(&pool, &blobs);

        let record = service.upload(&alice, png("cat.png", 16)).await.unwrap();

        let err = service.delete(&bob, &record.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(dir.path().join(&record.saved_name).exists());

        service.delete(&alice, &record.id).await.unwrap();
        assert!(!dir.path().join(&record.saved_name).exists());
        assert!(matches!(service.delete(&alice, &record.id).await, Err(AppError::NotFound(_))));
    }

    #[actix_rt::test]
    async fn delete_tolerates_missing_blob() {
        let pool = memory_pool().await;
        let dir = tempfile::tempdir().unwrap();
        let blobs = BlobStore::new(dir.path());
        let alice = owner(&pool, "alice").await;
        let service = FileService::new(&pool, &blobs);

        let record = service.upload(&alice, png("cat.png", 16)).await.unwrap();
        std::fs::remove_file(dir.path().join(&record.saved_name)).unwrap();

        service.delete(&alice, &record.id).await.unwrap();
        assert!(service.list(&alice).await.unwrap().is_empty());
    }

    #[actix_rt::test]
    async fn cropped_replacement() {
        let pool = memory_pool().await;
        let dir = tempfile::tempdir().unwrap();
        let blobs = BlobStore::new(dir.path());
        let alice = owner(&pool, "alice").await;
        let bob = owner(&pool, "bob").await;
        let service = FileService::new(&pool, &blobs);
        let record = service.upload(&alice, png("cat.png", 16)).await.unwrap();

        let other = service
            .replace_cropped(&bob, &record.saved_name, "data:image/png;base64,aGk=")
            .await;
        assert!(matches!(other, Err(AppError::NotFound(_))));

        service
            .replace_cropped(&alice, &record.saved_name, "data:image/png;base64,aGk=")
            .await
            .unwrap();
        assert_eq!(std::fs::read(dir.path().join(&record.saved_name)).unwrap(), b"hi");

        let bad = service.replace_cropped(&alice, &record.saved_name, "%%%").await;
        assert!(matches!(bad, Err(AppError::Validation(_))));
    }
}
