use async_trait::async_trait;
use log::debug;
use reqwest::header::COOKIE;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde_json::json;

use crate::models::ai_exchange::{AiRequest, AiResponse, ErrorBody};
use crate::models::email::{EmailRecord, NewEmail};
use crate::services::outlook_service::OutlookMessage;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("server returned {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// What the sidebar needs from the MailPilot server.
#[async_trait]
pub trait AssistantApi: Send + Sync {
    async fn generate(&self, prompt: &str, mode: &str) -> Result<String, ClientError>;
    async fn insert_into_outlook(&self, content: &str) -> Result<(), ClientError>;
    async fn latest_email(&self) -> Result<Option<OutlookMessage>, ClientError>;
}

/// Talks to the server's `/api` routes, carrying the browser session cookie.
pub struct HttpAssistantClient {
    client: reqwest::Client,
    base_url: String,
    session_cookie: Option<String>,
}

impl HttpAssistantClient {
    pub fn new(base_url: &str, session_cookie: Option<String>) -> Self {
        HttpAssistantClient {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            session_cookie,
        }
    }

    fn request(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.session_cookie {
            Some(cookie) => builder.header(COOKIE, cookie),
            None => builder,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn check(response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response
            .json::<ErrorBody>()
            .await
            .map(|body| body.error)
            .unwrap_or_else(|_| status.to_string());
        Err(ClientError::Status { status, message })
    }

    pub async fn get_emails(&self) -> Result<Vec<EmailRecord>, ClientError> {
        let response = self.request(self.client.get(self.url("/api/emails"))).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn create_email(&self, email: &NewEmail) -> Result<EmailRecord, ClientError> {
        let response = self
            .request(self.client.post(self.url("/api/emails")))
            .json(email)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }
}

#[async_trait]
impl AssistantApi for HttpAssistantClient {
    async fn generate(&self, prompt: &str, mode: &str) -> Result<String, ClientError> {
        debug!("Requesting '{}' generation", mode);
        let body = AiRequest {
            prompt: prompt.to_string(),
            mode: mode.to_string(),
        };
        let response = self
            .request(self.client.post(self.url("/api/ai")))
            .json(&body)
            .send()
            .await?;
        let reply: AiResponse = Self::check(response).await?.json().await?;
        Ok(reply.response)
    }

    async fn insert_into_outlook(&self, content: &str) -> Result<(), ClientError> {
        let response = self
            .request(self.client.post(self.url("/api/outlook/insert")))
            .json(&json!({ "content": content }))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn latest_email(&self) -> Result<Option<OutlookMessage>, ClientError> {
        let response = self
            .request(self.client.get(self.url("/api/outlook/latest")))
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }
}
