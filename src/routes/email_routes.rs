use actix_web::{get, post, web, Responder};

use crate::models::email::NewEmail;
use crate::models::user_session::SessionUser;
use crate::routes::app_state::AppState;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list_emails).service(create_email);
}

#[get("/api/emails")]
async fn list_emails(data: web::Data<AppState>, user: SessionUser) -> impl Responder {
    crate::handlers::email_handler::list_emails(data, user).await
}

#[post("/api/emails")]
async fn create_email(
    data: web::Data<AppState>,
    user: SessionUser,
    req_body: web::Json<NewEmail>,
) -> impl Responder {
    crate::handlers::email_handler::create_email(data, user, req_body).await
}
