mod credential_service;
mod file_service;

pub use credential_service::CredentialService;
pub use file_service::{file_url_path, FileService};
