use actix_web::{web, HttpResponse};

use crate::error::ApiError;
use crate::models::email::NewEmail;
use crate::models::user_session::SessionUser;
use crate::routes::app_state::AppState;
use crate::services::email_service;

pub async fn list_emails(data: web::Data<AppState>, user: SessionUser) -> Result<HttpResponse, ApiError> {
    let emails = email_service::list_emails(data.emails.as_ref(), &user).await?;
    Ok(HttpResponse::Ok().json(emails))
}

pub async fn create_email(
    data: web::Data<AppState>,
    user: SessionUser,
    req_body: web::Json<NewEmail>,
) -> Result<HttpResponse, ApiError> {
    let email = email_service::create_email(data.emails.as_ref(), &user, req_body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(email))
}
