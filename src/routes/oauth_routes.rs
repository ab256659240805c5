use actix_session::Session;
use actix_web::{get, route, web, Responder};

use crate::handlers::oauth_handler::CallbackParams;
use crate::routes::app_state::AppState;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(oauth_login)
        .service(oauth_callback)
        .service(current_session)
        .service(sign_out);
}

#[get("/api/auth/signin")]
async fn oauth_login(data: web::Data<AppState>, session: Session) -> impl Responder {
    crate::handlers::oauth_handler::oauth_login(data, session).await
}

#[get("/api/auth/callback/azure-ad")]
async fn oauth_callback(
    data: web::Data<AppState>,
    session: Session,
    params: web::Query<CallbackParams>,
) -> impl Responder {
    crate::handlers::oauth_handler::oauth_callback(data, session, params).await
}

#[get("/api/auth/session")]
async fn current_session(session: Session) -> impl Responder {
    crate::handlers::oauth_handler::current_session(session).await
}

#[route("/api/auth/signout", method = "GET", method = "POST")]
async fn sign_out(session: Session) -> impl Responder {
    crate::handlers::oauth_handler::sign_out(session).await
}
