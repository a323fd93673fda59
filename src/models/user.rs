use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A registered account as held in the credential store.
///
/// `password_hash` is a bcrypt digest; the plaintext is never stored, and
/// this struct is never serialized to clients (`UserResponse` is).
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub roles: Vec<String>,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Builds a freshly registered account: default `USER` role, enabled.
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            username,
            email,
            password_hash,
            roles: vec!["USER".to_string()],
            enabled: true,
            created_at: Utc::now(),
        }
    }
}

/// Client-facing view of a user, with the credential hash stripped.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub roles: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub enabled: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            roles: user.roles,
            created_at: user.created_at,
            enabled: user.enabled,
        }
    }
}
