use actix_session::Session;
use actix_web::{get, post, web, Responder};

use crate::handlers::outlook_handler::InsertRequest;
use crate::models::user_session::SessionUser;
use crate::routes::app_state::AppState;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(insert_into_outlook).service(latest_email);
}

#[post("/api/outlook/insert")]
async fn insert_into_outlook(
    data: web::Data<AppState>,
    user: SessionUser,
    session: Session,
    req_body: web::Json<InsertRequest>,
) -> impl Responder {
    crate::handlers::outlook_handler::insert_into_outlook(data, user, session, req_body).await
}

#[get("/api/outlook/latest")]
async fn latest_email(data: web::Data<AppState>, user: SessionUser, session: Session) -> impl Responder {
    crate::handlers::outlook_handler::latest_email(data, user, session).await
}
