use std::sync::Arc;

use crate::config::Config;
use crate::models::email_db::{EmailDB, EmailStore};
use crate::services::llm_service::{self, CompletionProvider};
use crate::services::oauth_service::AzureOAuth;
use crate::services::outlook_service::OutlookBridge;

#[derive(Clone)]
pub struct AppState {
    pub completion: Arc<dyn CompletionProvider>,
    pub emails: Arc<dyn EmailStore>,
    pub outlook: OutlookBridge,
    pub oauth: AzureOAuth,
}

impl AppState {
    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        let emails = EmailDB::new(&config.database_url).await?;
        let oauth = AzureOAuth::new(&config.azure, &config.public_url, &config.graph_base_url)?;

        Ok(AppState {
            completion: Arc::from(llm_service::provider_from_config(&config.completion)),
            emails: Arc::new(emails),
            outlook: OutlookBridge::new(&config.graph_base_url),
            oauth,
        })
    }
}
