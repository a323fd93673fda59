use crate::{
    auth::{LoginRequest, RegisterRequest},
    error::AppError,
    services::UserService,
};
use actix_web::{get, post, web, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;

/// Register a new user
///
/// Creates an account and returns it (without the credential hash).
/// Clients log in separately to obtain a token.
#[post("/register")]
pub async fn register(
    users: web::Data<UserService>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    let user = users.register(register_data.into_inner()).await?;
    Ok(HttpResponse::Created().json(user))
}

/// Login user
///
/// Verifies credentials and returns a bearer token with the identity it
/// was issued for.
#[post("/login")]
pub async fn login(
    users: web::Data<UserService>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    let auth = users.authenticate(login_data.into_inner()).await?;
    Ok(HttpResponse::Ok().json(auth))
}

#[derive(Debug, Deserialize)]
pub struct UsernameQuery {
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: String,
}

/// Check whether a username is still free.
#[get("/check-username")]
pub async fn check_username(
    users: web::Data<UserService>,
    query: web::Query<UsernameQuery>,
) -> Result<impl Responder, AppError> {
    let available = users.is_username_available(&query.username).await?;
    Ok(HttpResponse::Ok().json(json!({ "available": available })))
}

/// Check whether an email is still free.
#[get("/check-email")]
pub async fn check_email(
    users: web::Data<UserService>,
    query: web::Query<EmailQuery>,
) -> Result<impl Responder, AppError> {
    let available = users.is_email_available(&query.email).await?;
    Ok(HttpResponse::Ok().json(json!({ "available": available })))
}
