use actix_web::{web, HttpResponse};
use log::info;

use crate::error::ApiError;
use crate::models::ai_exchange::{AiRequest, AiResponse};
use crate::models::user_session::SessionUser;
use crate::routes::app_state::AppState;
use crate::services::chat_service;

pub async fn handle_ai_request(
    data: web::Data<AppState>,
    user: SessionUser,
    req_body: web::Json<AiRequest>,
) -> Result<HttpResponse, ApiError> {
    info!("AI request from user {} in mode '{}'", user.id, req_body.mode);
    let response = chat_service::process_ai_request(data.completion.as_ref(), &req_body).await?;
    Ok(HttpResponse::Ok().json(AiResponse { response }))
}
