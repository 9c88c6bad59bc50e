// src/api/handlers/health.rs
use actix_web::web;
use crate::models::HealthStatus;

/// Liveness probe. Never touches the upstream.
pub async fn health_check() -> web::Json<HealthStatus> {
    web::Json(HealthStatus::ok())
}
