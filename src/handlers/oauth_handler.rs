use actix_session::Session;
use actix_web::{web, HttpResponse};
use log::{error, info, warn};
use serde::Deserialize;
use serde_json::json;

use crate::error::ApiError;
use crate::models::user_session;
use crate::routes::app_state::AppState;

const OAUTH_STATE_KEY: &str = "oauth_state";
const PKCE_VERIFIER_KEY: &str = "pkce_verifier";

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .append_header(("Location", location))
        .finish()
}

/// Starts the Azure AD flow and redirects the browser to the authorization endpoint.
pub async fn oauth_login(data: web::Data<AppState>, session: Session) -> Result<HttpResponse, ApiError> {
    let request = data.oauth.authorize();
    session
        .insert(OAUTH_STATE_KEY, &request.csrf_state)
        .and_then(|_| session.insert(PKCE_VERIFIER_KEY, &request.pkce_verifier))
        .map_err(|e| {
            error!("Failed to store OAuth state in session: {}", e);
            ApiError::Internal(e.to_string())
        })?;
    Ok(redirect(request.url.as_str()))
}

/// Handles the provider's redirect back: checks state, exchanges the code and signs the user in.
pub async fn oauth_callback(
    data: web::Data<AppState>,
    session: Session,
    params: web::Query<CallbackParams>,
) -> Result<HttpResponse, ApiError> {
    let params = params.into_inner();
    if let Some(err) = params.error {
        warn!(
            "Identity provider returned error {}: {}",
            err,
            params.error_description.unwrap_or_default()
        );
        return Err(ApiError::Unauthorized);
    }

    let expected_state = session.remove_as::<String>(OAUTH_STATE_KEY).and_then(Result::ok);
    let verifier = session.remove_as::<String>(PKCE_VERIFIER_KEY).and_then(Result::ok);

    let (code, verifier) = match (params.code, params.state, expected_state, verifier) {
        (Some(code), Some(state), Some(expected), Some(verifier)) if state == expected => (code, verifier),
        _ => {
            warn!("OAuth callback with missing code or mismatched state");
            return Err(ApiError::Unauthorized);
        }
    };

    let (user, token) = data.oauth.complete(code, verifier).await.map_err(|e| {
        error!("Sign-in failed: {}", e);
        ApiError::Unauthorized
    })?;
    user_session::sign_in(&session, &user, Some(&token))?;
    Ok(redirect("/"))
}

/// Reports the current session, `{}` when nobody is signed in.
pub async fn current_session(session: Session) -> HttpResponse {
    match user_session::authenticate(&session) {
        Ok(user) => HttpResponse::Ok().json(json!({
            "user": user,
            "expires": user_session::session_expiry(&session),
        })),
        Err(_) => HttpResponse::Ok().json(json!({})),
    }
}

pub async fn sign_out(session: Session) -> HttpResponse {
    if let Ok(user) = user_session::authenticate(&session) {
        info!("Signing out user {}", user.id);
    }
    user_session::sign_out(&session);
    redirect("/")
}
