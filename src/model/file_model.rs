use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registry row. `saved_name` is the blob key; `original_name` is whatever
/// the client sent and is never used as a path.
#[derive(Debug, Clone)]
pub struct FileRecord {
    pub id: String,
    pub user_id: String,
    pub original_name: String,
    pub saved_name: String,
    pub file_url: String,
    pub upload_time: DateTime<Utc>,
}

/// What `GET /files` returns for each record.
#[derive(Debug, Serialize, Deserialize)]
pub struct FileEntry {
    pub id: String,
    pub original_name: String,
    pub saved_name: String,
    pub file_url: String,
}

impl From<FileRecord> for FileEntry {
    fn from(file: FileRecord) -> Self {
        Self {
            id: file.id,
            original_name: file.original_name,
            saved_name: file.saved_name,
            file_url: file.file_url,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub file_url: String,
    pub full_url: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteFileRequest {
    pub file_id: String,
    // kept for client compatibility; the blob key always comes from the registry
    #[serde(default)]
    pub saved_name: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CroppedUploadRequest {
    pub cropped_image: String,
    pub saved_name: String,
}

/// A file part pulled out of a multipart body, not yet validated.
pub struct IncomingFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}
