#![doc = "The `taskwarden` library crate."]
#![doc = ""]
#![doc = "Core business logic for a per-user task tracking service: domain models,"]
#![doc = "token-based authentication, store abstractions, the service layer that"]
#![doc = "enforces ownership, and the HTTP route handlers. The binary (`main.rs`)"]
#![doc = "wires these together against Postgres."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;
