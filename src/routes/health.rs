use actix_web::{get, web, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;

use crate::server::Resource;

/// Health check endpoint
///
/// Reports which service answered and the current time.
#[get("/health")]
pub async fn health(resource: web::Data<Resource>) -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "service": resource.service_name(),
        "timestamp": Utc::now()
    }))
}
