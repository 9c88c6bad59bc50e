// src/api/assets.rs
use actix_web::{web, HttpRequest, HttpResponse};
use rust_embed::RustEmbed;
use std::borrow::Cow;

#[derive(RustEmbed)]
#[folder = "static/"]
struct StaticAssets;

const INDEX: &str = "index.html";

/// Serves the embedded frontend for every path not claimed by the API.
pub fn configure_assets(cfg: &mut web::ServiceConfig) {
    cfg.route("/{_:.*}", web::get().to(static_file_handler));
}

/// Unknown paths fall back to `index.html` so client-side routes still load.
async fn static_file_handler(req: HttpRequest) -> HttpResponse {
    let requested = req.path().trim_start_matches('/');
    let path = if requested.is_empty() { INDEX } else { requested };

    let (path, content) = match StaticAssets::get(path) {
        Some(content) => (path, content),
        None => match StaticAssets::get(INDEX) {
            Some(content) => (INDEX, content),
            None => return HttpResponse::NotFound().body("404 Not Found"),
        },
    };

    let mime = mime_guess::from_path(path).first_or_octet_stream();
    let cache = if path == INDEX { "no-cache" } else { "public, max-age=3600" };
    HttpResponse::Ok()
        .content_type(mime.as_ref())
        .insert_header(("Cache-Control", cache))
        .body(Cow::into_owned(content.data))
}
