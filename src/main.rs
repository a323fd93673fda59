use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use sqlx::PgPool;
use std::sync::Arc;

use taskwarden::auth::{AuthMiddleware, TokenService};
use taskwarden::config::Config;
use taskwarden::routes::{self, health};
use taskwarden::services::{TaskService, UserService};
use taskwarden::store::{PgTaskStore, PgUserStore};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    let pool = PgPool::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    // Signing keys are derived once here and shared across workers.
    let tokens = TokenService::new(&config.jwt_secret, config.jwt_expiration_hours);
    let task_service = TaskService::new(Arc::new(PgTaskStore::new(pool.clone())));
    let user_service = UserService::new(Arc::new(PgUserStore::new(pool.clone())), tokens.clone());

    log::info!("Starting taskwarden server at {}", config.server_url());

    let bind_addr = (config.server_host.clone(), config.server_port);
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(tokens.clone()))
            .app_data(web::Data::new(task_service.clone()))
            .app_data(web::Data::new(user_service.clone()))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(health::health)
            .service(
                web::scope("/api")
                    .wrap(AuthMiddleware)
                    .configure(routes::config),
            )
    })
    .bind(bind_addr)?
    .run()
    .await
}
