#![doc = "The `taskboard` library crate."]
#![doc = ""]
#![doc = "Models, persistence, services, routes and server bootstrap for the two"]
#![doc = "CRUD microservices built from it: `task-service` (`/tasks`) and"]
#![doc = "`user-service` (`/users`)."]

pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod server;
pub mod services;
pub mod store;

pub use crate::error::AppError;
pub use crate::models::{Task, User};
