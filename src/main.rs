// src/main.rs
use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use dogpic::api::{configure_assets, configure_routes, AppState};
use dogpic::{banner, config};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Print the startup banner
    banner::print_banner();

    // Load .env before the logger so RUST_LOG can come from it
    let dotenv = dotenvy::dotenv();

    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    if let Err(e) = dotenv {
        log::debug!("no .env file loaded: {}", e);
    }

    let app_config = match config::AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    let bind = (app_config.host.clone(), app_config.port);
    let cors_permissive = app_config.cors_permissive;

    log::info!(
        "proxying {} (attempts: {}, timeout: {:?}, retry delay: {:?})",
        app_config.upstream.url,
        app_config.upstream.retry.attempts(),
        app_config.upstream.retry.timeout,
        app_config.upstream.retry.retry_delay
    );

    let state = AppState::new(app_config);

    println!("🚀 Starting server...");
    println!("🐶 Frontend available at http://{}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(middleware::Condition::new(cors_permissive, Cors::permissive()))
            .wrap(middleware::Logger::default())
            .configure(configure_routes)
            .configure(configure_assets)
    })
    .bind(bind)?
    .run()
    .await
}
