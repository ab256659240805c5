use log::{error, info};

use crate::error::ApiError;
use crate::models::email::{EmailRecord, NewEmail};
use crate::models::email_db::EmailStore;
use crate::models::user_session::SessionUser;

pub async fn list_emails(
    store: &dyn EmailStore,
    user: &SessionUser,
) -> Result<Vec<EmailRecord>, ApiError> {
    store.list(&user.id).await.map_err(|e| {
        error!("Error fetching emails for user {}: {}", user.id, e);
        ApiError::from(e)
    })
}

pub async fn create_email(
    store: &dyn EmailStore,
    user: &SessionUser,
    email: NewEmail,
) -> Result<EmailRecord, ApiError> {
    info!("Creating email '{}' for user {}", email.subject, user.id);
    store.create(&user.id, email).await.map_err(|e| {
        error!("Error creating email for user {}: {}", user.id, e);
        ApiError::from(e)
    })
}
