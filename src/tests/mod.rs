use actix_web::http::header::{AUTHORIZATION, CONTENT_TYPE};
use actix_web::test::TestRequest;
use actix_web::web;
use sqlx::sqlite::SqlitePool;
use std::path::PathBuf;
use tempfile::TempDir;

use crate::config::Settings;
use crate::jwt::Jwt;
use crate::storage::BlobStore;

pub const TEST_SECRET: &str = "test_secret";
pub const BASE_URL: &str = "https://files.example.com";
const BOUNDARY: &str = "----fileshelf-test-boundary";

/// Builds the full application around the given context.
macro_rules! test_app {
    ($ctx:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($ctx.pool.clone()))
                .app_data($ctx.jwt.clone())
                .app_data($ctx.blobs.clone())
                .app_data($ctx.settings.clone())
                .app_data(crate::apis::json_config())
                .configure(crate::apis::routes)
                .service(crate::apis::uploads($ctx.blobs.root())),
        )
        .await
    };
}

/// Registers the user, logs in and evaluates to the bearer token.
macro_rules! login_as {
    ($app:expr, $user:expr, $pass:expr) => {{
        let req = actix_web::test::TestRequest::post()
            .uri("/register")
            .set_json(serde_json::json!({
                "username": $user,
                "password": $pass,
                "confirmPassword": $pass,
            }))
            .to_request();
        let resp = actix_web::test::call_service(&$app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::CREATED);

        let req = actix_web::test::TestRequest::post()
            .uri("/login")
            .set_json(serde_json::json!({ "username": $user, "password": $pass }))
            .to_request();
        let body: crate::model::TokenResponse =
            actix_web::test::call_and_read_body_json(&$app, req).await;
        body.token
    }};
}


pub struct TestContext {
    pub pool: SqlitePool,
    pub jwt: web::Data<Jwt>,
    pub blobs: web::Data<BlobStore>,
    pub settings: web::Data<Settings>,
    _dir: TempDir,
}

impl TestContext {
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let upload_dir = dir.path().join("uploads");
        let blobs = BlobStore::new(upload_dir.clone());
        blobs.init().await.unwrap();

        let settings = Settings {
            database_url: "sqlite::memory:".to_string(),
            jwt_secret: TEST_SECRET.to_string(),
            base_url: BASE_URL.to_string(),
            upload_dir,
            bind_addr: "127.0.0.1:0".to_string(),
        };

        Self {
            pool: crate::db::memory_pool().await,
            jwt: web::Data::new(Jwt::new(TEST_SECRET)),
            blobs: web::Data::new(blobs),
            settings: web::Data::new(settings),
            _dir: dir,
        }
    }

    pub fn blob_path(&self, saved_name: &str) -> PathBuf {
        self.blobs.root().join(saved_name)
    }

    pub fn blob_count(&self) -> usize {
        std::fs::read_dir(self.blobs.root()).unwrap().count()
    }
}

pub fn bearer(token: &str) -> (actix_web::http::header::HeaderName, String) {
    (AUTHORIZATION, format!("Bearer {}", token))
}

pub fn multipart_body(field: &str, file_name: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::with_capacity(data.len() + 256);
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, file_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn multipart_request(body: Vec<u8>) -> TestRequest {
    TestRequest::post()
        .uri("/upload")
        .insert_header((CONTENT_TYPE, format!("multipart/form-data; boundary={}", BOUNDARY)))
        .set_payload(body)
}

pub fn upload_request(token: &str, file_name: &str, content_type: &str, data: &[u8]) -> TestRequest {
    multipart_request(multipart_body("file", file_name, content_type, data)).insert_header(bearer(token))
}
