use serde::{Deserialize, Serialize};

// Fields are optional so that a missing field is reported as a validation
// error with our own message instead of a deserialization failure.
#[derive(Deserialize)]
pub struct UserLogin {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default, rename = "confirmPassword")]
    pub confirm_password: Option<String>,
}

#[derive(Debug)]
pub struct User {
    pub id: String,
    pub username: String,
    pub password_hash: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct UserSummary {
    pub id: String,
    pub username: String,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}
