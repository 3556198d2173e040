// Messages
pub const MESSAGE_REGISTER_MISSING_FIELDS: &str = "Username, password and confirmPassword are required";
pub const MESSAGE_PASSWORD_MISMATCH: &str = "Passwords do not match";
pub const MESSAGE_USERNAME_TAKEN: &str = "Username already exists";
pub const MESSAGE_LOGIN_MISSING_FIELDS: &str = "Username and password are required";
pub const MESSAGE_LOGIN_FAILED: &str = "Invalid credentials";
pub const MESSAGE_TOKEN_MISSING: &str = "Authorization token required";
pub const MESSAGE_INVALID_TOKEN: &str = "Invalid or expired token";
pub const MESSAGE_NO_FILE: &str = "No file uploaded";
pub const MESSAGE_FILE_TOO_LARGE: &str = "File exceeds the 10 MiB limit";
pub const MESSAGE_FILE_TYPE_NOT_ALLOWED: &str = "File type not allowed";
pub const MESSAGE_FILE_NOT_FOUND: &str = "File not found or unauthorized";
pub const MESSAGE_FILE_DELETED: &str = "File deleted successfully";
pub const MESSAGE_CROPPED_UPLOADED: &str = "Cropped image uploaded successfully";
pub const MESSAGE_NOT_AN_IMAGE: &str = "Only images can be cropped";
pub const MESSAGE_BAD_IMAGE_DATA: &str = "Cropped image is not valid base64";
pub const MESSAGE_INVALID_SAVED_NAME: &str = "Invalid file name";
pub const MESSAGE_INTERNAL_SERVER_ERROR: &str = "Internal server error";

// Auth
pub const BCRYPT_COST: u32 = 10;
pub const TOKEN_TTL_DAYS: i64 = 30;

// Uploads
pub const MAX_UPLOAD_SIZE: usize = 10 * 1024 * 1024;
// base64 of a full-size cropped image plus the data-URL prefix and JSON wrapper
pub const MAX_JSON_BODY: usize = (MAX_UPLOAD_SIZE + 2) / 3 * 4 + 1024;
pub const UPLOAD_FIELD: &str = "file";
pub const UPLOADS_ROUTE: &str = "/uploads";
pub const UNKNOWN_FILE_NAME: &str = "unknown";

pub const MIME_JPG: &str = "image/jpeg";
pub const MIME_PNG: &str = "image/png";
pub const MIME_GIF: &str = "image/gif";
pub const MIME_PDF: &str = "application/pdf";
pub const MIME_DOC: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

pub const ALLOWED_MIME_TYPES: [&str; 5] = [MIME_JPG, MIME_PNG, MIME_GIF, MIME_PDF, MIME_DOC];

// Config defaults
pub const DEFAULT_DB_URL: &str = "sqlite://fileshelf.db";
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_UPLOAD_DIR: &str = "./uploads";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
