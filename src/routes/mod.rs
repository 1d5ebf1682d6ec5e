pub mod docs;
pub mod health;
pub mod tasks;
pub mod users;

use actix_web::web;

use crate::error::{json_error_handler, AppError};

/// JSON extractor settings shared by both services. Undecodable bodies are
/// answered in the usual error shape, as a 500 on create and a 404 otherwise.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error_handler)
}

/// Coerces a `findById` path segment to an id. Anything that is not an
/// integer can never match a row, so it is reported as not found.
fn parse_id(label: &str, raw: &str) -> Result<i32, AppError> {
    raw.parse().map_err(|_| AppError::missing_id(label, raw))
}
