// src/api/routes.rs
use actix_web::web;
use super::handlers;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health_check))
            .route("/dog", web::get().to(handlers::get_dog_image))
            .default_service(web::to(handlers::api_not_found)),
    );
}
