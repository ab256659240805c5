use std::fmt;
use std::future::{ready, Ready};

use actix_session::{Session, SessionExt};
use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use chrono::{DateTime, Duration, Utc};
use log::{error, warn};
use serde::{Deserialize, Serialize};

use crate::config::SESSION_MAX_AGE_DAYS;
use crate::error::ApiError;

const USER_KEY: &str = "user";
const ISSUED_AT_KEY: &str = "issued_at";
const ACCESS_TOKEN_KEY: &str = "access_token";

/// The signed-in user, as carried in the session cookie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Delegated bearer token for the mail provider. Opaque to everything but the bridge.
#[derive(Clone, PartialEq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(secret: impl Into<String>) -> Self {
        AccessToken(secret.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// Records a fresh sign-in, replacing whatever the session held before.
pub fn sign_in(
    session: &Session,
    user: &SessionUser,
    token: Option<&AccessToken>,
) -> Result<(), ApiError> {
    session.renew();
    let insert = |key: &str, result: Result<(), actix_session::SessionInsertError>| {
        result.map_err(|e| {
            error!("Failed to store {} in session: {}", key, e);
            ApiError::Internal(e.to_string())
        })
    };
    insert(USER_KEY, session.insert(USER_KEY, user))?;
    insert(ISSUED_AT_KEY, session.insert(ISSUED_AT_KEY, Utc::now().timestamp()))?;
    if let Some(token) = token {
        insert(ACCESS_TOKEN_KEY, session.insert(ACCESS_TOKEN_KEY, token.secret()))?;
    }
    Ok(())
}

pub fn sign_out(session: &Session) {
    session.purge();
}

/// Resolves the session's user, rejecting missing, unreadable or expired sessions.
pub fn authenticate(session: &Session) -> Result<SessionUser, ApiError> {
    let user = match session.get::<SessionUser>(USER_KEY) {
        Ok(Some(user)) => user,
        Ok(None) => return Err(ApiError::Unauthorized),
        Err(e) => {
            warn!("Unreadable session user: {}", e);
            return Err(ApiError::Unauthorized);
        }
    };

    let issued_at = session
        .get::<i64>(ISSUED_AT_KEY)
        .ok()
        .flatten()
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0));
    match issued_at {
        Some(issued_at) if !is_expired(issued_at, Utc::now()) => Ok(user),
        _ => {
            warn!("Rejecting expired session for user {}", user.id);
            Err(ApiError::Unauthorized)
        }
    }
}

/// When the session issued at `issued_at` stops being accepted.
pub fn expires_at(issued_at: DateTime<Utc>) -> DateTime<Utc> {
    issued_at + Duration::days(SESSION_MAX_AGE_DAYS)
}

pub fn is_expired(issued_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now >= expires_at(issued_at) || issued_at > now + Duration::minutes(5)
}

pub fn session_expiry(session: &Session) -> Option<DateTime<Utc>> {
    session
        .get::<i64>(ISSUED_AT_KEY)
        .ok()
        .flatten()
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
        .map(expires_at)
}

pub fn access_token(session: &Session) -> Option<AccessToken> {
    session
        .get::<String>(ACCESS_TOKEN_KEY)
        .ok()
        .flatten()
        .filter(|t| !t.is_empty())
        .map(AccessToken)
}

impl FromRequest for SessionUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = authenticate(&req.get_session());
        if result.is_err() {
            warn!("Unauthenticated request to {}", req.path());
        }
        ready(result)
    }
}
