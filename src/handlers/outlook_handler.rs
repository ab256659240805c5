use actix_session::Session;
use actix_web::{web, HttpResponse};
use log::{info, warn};
use serde::Deserialize;

use crate::error::ApiError;
use crate::models::user_session::{self, SessionUser};
use crate::routes::app_state::AppState;
use crate::services::outlook_service::BridgeError;

#[derive(Debug, Deserialize)]
pub struct InsertRequest {
    pub content: String,
}

fn bridge_failure(user: &SessionUser, e: BridgeError, message: &str) -> ApiError {
    match e {
        BridgeError::MissingToken => {
            warn!("User {} has no mail access token", user.id);
            ApiError::Unauthorized
        }
        other => {
            warn!("Outlook call failed for user {}: {}", user.id, other);
            ApiError::UpstreamProcessing(message.to_string())
        }
    }
}

pub async fn insert_into_outlook(
    data: web::Data<AppState>,
    user: SessionUser,
    session: Session,
    req_body: web::Json<InsertRequest>,
) -> Result<HttpResponse, ApiError> {
    let token = user_session::access_token(&session);
    let created = data
        .outlook
        .insert(token.as_ref(), &req_body.content)
        .await
        .map_err(|e| bridge_failure(&user, e, "Failed to insert content into Outlook"))?;
    info!("Inserted reply into Outlook for user {}", user.id);
    Ok(HttpResponse::Ok().json(created))
}

pub async fn latest_email(
    data: web::Data<AppState>,
    user: SessionUser,
    session: Session,
) -> Result<HttpResponse, ApiError> {
    let token = user_session::access_token(&session);
    let message = data
        .outlook
        .latest(token.as_ref())
        .await
        .map_err(|e| bridge_failure(&user, e, "Failed to get current email"))?;
    Ok(HttpResponse::Ok().json(message))
}
