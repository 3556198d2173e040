use std::env;
use std::path::PathBuf;

use anyhow::{bail, Result};

use crate::constants::{DEFAULT_BASE_URL, DEFAULT_BIND_ADDR, DEFAULT_DB_URL, DEFAULT_UPLOAD_DIR};

/// Process-wide settings, read once in `main` and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub jwt_secret: String,
    pub base_url: String,
    pub upload_dir: PathBuf,
    pub bind_addr: String,
}

impl Settings {
    /// Reads the settings from the environment. A missing or empty
    /// `JWT_SECRET` is an error: the server must not start without it.
    pub fn from_env() -> Result<Self> {
        let jwt_secret = env::var("JWT_SECRET").unwrap_or_default();
        if jwt_secret.trim().is_empty() {
            bail!("JWT_SECRET must be set");
        }

        Ok(Self {
            database_url: env_or("SQLITE_DB_URL", DEFAULT_DB_URL),
            jwt_secret,
            base_url: env_or("BASE_URL", DEFAULT_BASE_URL),
            upload_dir: PathBuf::from(env_or("UPLOAD_DIR", DEFAULT_UPLOAD_DIR)),
            bind_addr: env_or("BIND_ADDR", DEFAULT_BIND_ADDR),
        })
    }

    /// Absolute URL for a path such as `/uploads/<saved name>`.
    pub fn full_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}
