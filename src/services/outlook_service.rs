use log::{error, info};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::models::user_session::AccessToken;

#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("No access token available")]
    MissingToken,

    #[error("Mail provider rejected the request with status {0}")]
    Rejected(StatusCode),

    #[error("Mail provider request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ItemBody {
    pub content_type: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmailAddress {
    pub name: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Recipient {
    pub email_address: EmailAddress,
}

/// The subset of a Graph message the sidebar uses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OutlookMessage {
    pub id: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub body_preview: Option<String>,
    #[serde(default)]
    pub body: Option<ItemBody>,
    #[serde(default)]
    pub from: Option<Recipient>,
    #[serde(default)]
    pub received_date_time: Option<String>,
}

impl OutlookMessage {
    /// Plain-text rendering of the body, falling back to the preview.
    pub fn plain_text(&self) -> String {
        match &self.body {
            Some(body) if body.content_type.eq_ignore_ascii_case("html") => {
                html2text::from_read(body.content.as_bytes(), 80).trim().to_string()
            }
            Some(body) => body.content.trim().to_string(),
            None => self.body_preview.clone().unwrap_or_default(),
        }
    }
}

#[derive(Deserialize)]
struct MessageList {
    #[serde(default)]
    value: Vec<OutlookMessage>,
}

/// Writes to and reads from the signed-in user's Outlook mailbox via Microsoft Graph.
#[derive(Clone)]
pub struct OutlookBridge {
    client: reqwest::Client,
    base_url: String,
}

impl OutlookBridge {
    pub fn new(base_url: &str) -> Self {
        OutlookBridge {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Creates a new message whose HTML body is `content`. Returns Graph's created message.
    pub async fn insert(&self, token: Option<&AccessToken>, content: &str) -> Result<Value, BridgeError> {
        let token = token.ok_or(BridgeError::MissingToken)?;

        let response = self
            .client
            .post(format!("{}/me/messages", self.base_url))
            .bearer_auth(token.secret())
            .json(&json!({
                "body": {
                    "contentType": "HTML",
                    "content": content
                }
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            error!("Outlook rejected message insert: {}", response.status());
            return Err(BridgeError::Rejected(response.status()));
        }

        info!("Inserted {} chars into Outlook", content.len());
        Ok(response.json().await?)
    }

    /// Fetches the most recently received message, if the mailbox has any.
    pub async fn latest(&self, token: Option<&AccessToken>) -> Result<Option<OutlookMessage>, BridgeError> {
        let token = token.ok_or(BridgeError::MissingToken)?;

        let response = self
            .client
            .get(format!("{}/me/messages", self.base_url))
            .query(&[("$top", "1"), ("$orderby", "receivedDateTime desc")])
            .bearer_auth(token.secret())
            .send()
            .await?;

        if !response.status().is_success() {
            error!("Outlook rejected latest-message read: {}", response.status());
            return Err(BridgeError::Rejected(response.status()));
        }

        let list: MessageList = response.json().await?;
        Ok(list.value.into_iter().next())
    }
}
