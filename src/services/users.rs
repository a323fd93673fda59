//!
//! # User service
//!
//! Registration and login orchestration over a `UserStore`, the bcrypt
//! helpers, and the `TokenService`.

use log::{info, warn};
use std::sync::Arc;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::token::TokenService;
use crate::auth::{AuthResponse, LoginRequest, RegisterRequest};
use crate::error::AppError;
use crate::models::{User, UserResponse};
use crate::store::UserStore;
use validator::Validate;

#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
    tokens: TokenService,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>, tokens: TokenService) -> Self {
        Self { store, tokens }
    }

    /// Creates a new account. The username is checked before the email, so
    /// when both collide the username error is the one that surfaces. New
    /// accounts get the default `USER` role and are enabled.
    pub async fn register(&self, request: RegisterRequest) -> Result<UserResponse, AppError> {
        request.validate()?;
        info!("Registering new user with username: {}", request.username);

        if self.store.exists_by_username(&request.username).await? {
            warn!("Username {} is already taken", request.username);
            return Err(AppError::DuplicateUsername);
        }
        if self.store.exists_by_email(&request.email).await? {
            warn!("Email {} is already in use", request.email);
            return Err(AppError::DuplicateEmail);
        }

        let password_hash = hash_password(&request.password)?;
        let user = User::new(request.username, request.email, password_hash);

        let saved = self.store.save(&user).await?;
        info!("User registered successfully with ID: {}", saved.id);
        Ok(UserResponse::from(saved))
    }

    /// Verifies credentials and issues a token. Unknown username, wrong
    /// password, and disabled accounts all collapse to the single
    /// `InvalidCredentials` outcome so the response never reveals which
    /// part failed.
    pub async fn authenticate(&self, request: LoginRequest) -> Result<AuthResponse, AppError> {
        request.validate()?;
        info!("Authenticating user: {}", request.username);

        let user = match self.store.find_by_username(&request.username).await? {
            Some(user) => user,
            None => {
                warn!("Authentication failed for user: {}", request.username);
                return Err(AppError::InvalidCredentials);
            }
        };

        if !user.enabled || !verify_password(&request.password, &user.password_hash)? {
            warn!("Authentication failed for user: {}", request.username);
            return Err(AppError::InvalidCredentials);
        }

        let token = self.tokens.issue(user.id, &user.username, &user.roles)?;
        info!("User authenticated successfully: {}", user.username);
        Ok(AuthResponse::new(token, user.id, user.username))
    }

    pub async fn is_username_available(&self, username: &str) -> Result<bool, AppError> {
        info!("Checking if username is available: {}", username);
        Ok(!self.store.exists_by_username(username).await?)
    }

    pub async fn is_email_available(&self, email: &str) -> Result<bool, AppError> {
        info!("Checking if email is available: {}", email);
        Ok(!self.store.exists_by_email(email).await?)
    }
}
