use actix_session::config::{CookieContentSecurity, PersistentSession};
use actix_session::storage::CookieSessionStore;
use actix_session::SessionMiddleware;
use actix_web::cookie::time::Duration;
use actix_web::cookie::Key;
use actix_web::web;
use log::warn;

use crate::config::SESSION_MAX_AGE_DAYS;
use crate::error::ApiError;

pub mod app_state;
pub mod chat_routes;
pub mod email_routes;
pub mod oauth_routes;
pub mod outlook_routes;

pub const SESSION_COOKIE_NAME: &str = "mailpilot.session";

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config());
    chat_routes::init_routes(cfg);
    email_routes::init_routes(cfg);
    outlook_routes::init_routes(cfg);
    oauth_routes::init_routes(cfg);
}

/// Malformed request bodies are reported as internal failures, not 400s.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, req| {
        warn!("Rejecting unparseable body for {}: {}", req.path(), err);
        ApiError::Internal(err.to_string()).into()
    })
}

/// Encrypted cookie sessions that live at most 30 days.
pub fn session_middleware(key: Key, secure: bool) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name(SESSION_COOKIE_NAME.to_string())
        .cookie_secure(secure)
        .cookie_content_security(CookieContentSecurity::Private)
        .session_lifecycle(PersistentSession::default().session_ttl(Duration::days(SESSION_MAX_AGE_DAYS)))
        .build()
}
