use actix_web::{HttpResponse, Responder, get};
use serde_json::json;

pub const SERVICE_NAME: &str = "HRMS Lite API";

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service banner", body = Object)
    ),
    tag = "Root"
)]
#[get("/")]
pub async fn index() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "message": format!("Welcome to {}", SERVICE_NAME),
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
        "docs": "/swagger-ui/",
        "endpoints": {
            "employees": "/employees",
            "attendance": "/attendance"
        }
    }))
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = Object, example = json!({
            "status": "healthy",
            "service": "HRMS Lite API"
        }))
    ),
    tag = "Health"
)]
#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": SERVICE_NAME
    }))
}
