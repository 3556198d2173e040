use std::path::{Path, PathBuf};

use anyhow::Context;
use uuid::Uuid;

use crate::constants::MESSAGE_INVALID_SAVED_NAME;
use crate::error::AppError;
use crate::utils::safe_extension;

/// Blobs on the local filesystem, one file per saved name directly under
/// `root`.
pub struct BlobStore {
    root: PathBuf,
}

impl BlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn init(&self) -> Result<(), AppError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .with_context(|| format!("creating upload dir {}", self.root.display()))?;
        Ok(())
    }

    /// `<uuid v4>.<ext>`, keeping the original extension only when it is
    /// plain ASCII alphanumerics.
    pub fn generate_name(original_name: &str) -> String {
        let id = Uuid::new_v4();
        match safe_extension(original_name) {
            Some(ext) => format!("{}.{}", id, ext),
            None => id.to_string(),
        }
    }

    /// Writes to a hidden temp file next to the blob and renames it into
    /// place, so a reader sees either the old content or the new, never a
    /// truncated file.
    pub async fn write(&self, saved_name: &str, data: &[u8]) -> Result<(), AppError> {
        let path = self.path_for(saved_name)?;
        tokio::fs::create_dir_all(&self.root)
            .await
            .with_context(|| format!("creating upload dir {}", self.root.display()))?;

        let tmp = self.root.join(format!(".{}.{}.tmp", saved_name, Uuid::new_v4()));
        let written = match tokio::fs::write(&tmp, data).await {
            Ok(()) => tokio::fs::rename(&tmp, &path).await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            if let Err(cleanup) = tokio::fs::remove_file(&tmp).await {
                log::warn!("## Could not remove temp blob {}: {}", tmp.display(), cleanup);
            }
            return Err(anyhow::Error::new(e)
                .context(format!("writing blob {}", path.display()))
                .into());
        }

        log::debug!("## Stored blob {} ({} bytes)", saved_name, data.len());
        Ok(())
    }

    /// Removing a blob that is already gone is not an error.
    pub async fn delete(&self, saved_name: &str) -> Result<(), AppError> {
        let path = self.path_for(saved_name)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                log::debug!("## Removed blob {}", saved_name);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::warn!("## Blob {} already absent", saved_name);
                Ok(())
            }
            Err(e) => Err(anyhow::Error::new(e)
                .context(format!("removing blob {}", path.display()))
                .into()),
        }
    }

    fn path_for(&self, saved_name: &str) -> Result<PathBuf, AppError> {
        if !is_valid_saved_name(saved_name) {
            return Err(AppError::validation(MESSAGE_INVALID_SAVED_NAME));
        }
        Ok(self.root.join(saved_name))
    }
}

/// A single path component of ASCII alphanumerics, `-` and `.`, not
/// starting with a dot.
pub fn is_valid_saved_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
}
