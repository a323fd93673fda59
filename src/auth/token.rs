use crate::error::AppError;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims carried by an identity token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject: the username the token was issued for.
    pub sub: String,
    /// The user's unique identifier.
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    /// Comma-joined role list, e.g. `"USER"` or `"USER,ADMIN"`.
    pub roles: String,
    /// Issued-at, seconds since epoch.
    pub iat: i64,
    /// Expiry, seconds since epoch.
    pub exp: i64,
}

impl Claims {
    /// Splits the comma-joined roles claim, dropping empty entries.
    pub fn role_list(&self) -> Vec<String> {
        self.roles
            .split(',')
            .filter(|r| !r.is_empty())
            .map(|r| r.to_string())
            .collect()
    }
}

/// Issues and verifies HMAC-signed identity tokens.
///
/// Key material is derived once from configuration at startup and shared
/// across workers; it is never rotated during the process lifetime.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    lifetime_hours: i64,
}

impl TokenService {
    pub fn new(secret: &str, lifetime_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            lifetime_hours,
        }
    }

    /// Signs a token for the given identity. Pure computation, no side
    /// effects beyond reading the clock.
    pub fn issue(&self, user_id: Uuid, username: &str, roles: &[String]) -> Result<String, AppError> {
        let now = chrono::Utc::now();
        let expiry = now + chrono::Duration::hours(self.lifetime_hours);

        let claims = Claims {
            sub: username.to_string(),
            user_id,
            roles: roles.join(","),
            iat: now.timestamp(),
            exp: expiry.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
    }

    /// Verifies signature and expiry, returning the decoded claims.
    ///
    /// Every distinct failure cause (bad signature, malformed token, expired,
    /// unsupported algorithm) collapses to `AppError::InvalidToken`.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| {
                log::warn!("Token verification failed: {}", e);
                e.into()
            })
    }

    /// Shortcut for callers that only need the owning user id. The token is
    /// expected to have been validated already; an invalid one errors here
    /// the same way `verify` does.
    pub fn extract_user_id(&self, token: &str) -> Result<Uuid, AppError> {
        self.verify(token).map(|claims| claims.user_id)
    }
}
