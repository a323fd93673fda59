pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

pub use extractors::AuthenticatedUser;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenService};

lazy_static! {
    // Usernames: alphanumeric, underscores, hyphens
    static ref USERNAME_REGEX: regex::Regex = regex::Regex::new(r"^[a-zA-Z0-9_-]+$").unwrap();
}

/// Login payload. Authentication is by username, not email.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Registration payload for a new account.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// 3 to 50 characters; alphanumeric plus underscores and hyphens.
    #[validate(
        length(min = 3, max = 50, message = "Username must be between 3 and 50 characters"),
        regex(
            path = "USERNAME_REGEX",
            message = "Username must be alphanumeric, underscores, or hyphens"
        )
    )]
    pub username: String,
    #[validate(email(message = "Email must be valid"))]
    pub email: String,
    /// At least 6 characters.
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Response to a successful login: the bearer token plus the identity it
/// was issued for.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub user_id: Uuid,
    pub username: String,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl AuthResponse {
    pub fn new(token: String, user_id: Uuid, username: String) -> Self {
        Self {
            token,
            token_type: default_token_type(),
            user_id,
            username,
        }
    }
}
