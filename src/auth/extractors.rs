use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};
use uuid::Uuid;

use crate::auth::token::Claims;
use crate::error::AppError;

/// The caller's identity, resolved once at the transport boundary.
///
/// `AuthMiddleware` verifies the bearer token and inserts the decoded
/// `Claims` into request extensions; this extractor turns them into an
/// explicit value that handlers pass down to the service layer. If no claims
/// are present the request is rejected as unauthenticated.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub username: String,
    pub roles: Vec<String>,
}

impl FromRequest for AuthenticatedUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<Claims>() {
            Some(claims) => ready(Ok(AuthenticatedUser {
                user_id: claims.user_id,
                username: claims.sub.clone(),
                roles: claims.role_list(),
            })),
            None => ready(Err(AppError::Unauthenticated.into())),
        }
    }
}
