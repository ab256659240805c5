use actix_web::{post, web, Responder};

use crate::models::ai_exchange::AiRequest;
use crate::models::user_session::SessionUser;
use crate::routes::app_state::AppState;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(ai_request);
}

#[post("/api/ai")]
async fn ai_request(
    data: web::Data<AppState>,
    user: SessionUser,
    req_body: web::Json<AiRequest>,
) -> impl Responder {
    crate::handlers::chat_handler::handle_ai_request(data, user, req_body).await
}
