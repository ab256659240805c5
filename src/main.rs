use actix_web::cookie::Key;
use actix_web::{middleware::Logger, web, App, HttpServer};
use log::{error, info};

use mailpilot::config::{self, Config};
use mailpilot::routes::{self, app_state::AppState};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    config::init_logging();

    let config = Config::from_env().map_err(|e| {
        error!("Configuration error: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    let state = AppState::from_config(&config).await.map_err(|e| {
        error!("Failed to initialise application state: {:#}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;

    let key = Key::derive_from(config.session_secret.as_bytes());
    let secure = config.secure_cookies();

    info!("Starting server on http://{}", config.bind_addr);
    HttpServer::new(move || {
        App::new()
            .wrap(routes::session_middleware(key.clone(), secure))
            .wrap(Logger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(routes::init_routes)
    })
    .bind(&config.bind_addr)?
    .run()
    .await
}
