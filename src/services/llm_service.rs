use async_trait::async_trait;
use log::{debug, error, info};
use ollama_rs::generation::chat::request::ChatMessageRequest;
use ollama_rs::generation::chat::ChatMessage;
use ollama_rs::generation::options::GenerationOptions;
use ollama_rs::Ollama;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::CompletionBackend;

/// One system instruction plus one user message, with fixed sampling settings.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// The small closed set of failures the dispatcher reasons about.
/// Adapters translate their vendor's error representation into one of these.
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("provider error: {0}")]
    Provider(String),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Returns the text of the first generated message.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError>;
}

pub fn provider_from_config(backend: &CompletionBackend) -> Box<dyn CompletionProvider> {
    match backend {
        CompletionBackend::OpenAi { api_key, base_url, model } => {
            info!("Using OpenAI-compatible completions at {} with model {}", base_url, model);
            Box::new(OpenAiProvider::new(base_url, api_key, model))
        }
        CompletionBackend::Ollama { host, port, model } => {
            info!("Using Ollama at {}:{} with model {}", host, port, model);
            Box::new(OllamaProvider::new(host, *port, model))
        }
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [RoleMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct RoleMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Chat-completions client for the OpenAI API and anything speaking its wire format.
pub struct OpenAiProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiProvider {
    pub fn new(base_url: &str, api_key: &str, model: &str) -> Self {
        OpenAiProvider {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }
}

/// Maps an OpenAI error payload onto a [`CompletionError`] kind.
pub fn classify_openai_error(status: StatusCode, body: &Value) -> CompletionError {
    let error = &body["error"];
    let code = error["code"]
        .as_str()
        .or_else(|| error["type"].as_str())
        .unwrap_or_default();
    let message = error["message"]
        .as_str()
        .map(str::to_string)
        .unwrap_or_else(|| format!("OpenAI returned {}", status));

    match code {
        "insufficient_quota" => CompletionError::QuotaExceeded(message),
        "invalid_api_key" => CompletionError::InvalidCredentials(message),
        _ => CompletionError::Provider(message),
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: [
                RoleMessage { role: "system", content: &request.system },
                RoleMessage { role: "user", content: &request.user },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        debug!("Sending chat completion request with model {}", self.model);
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| CompletionError::Provider(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let payload: Value = response.json().await.unwrap_or(Value::Null);
            let err = classify_openai_error(status, &payload);
            error!("OpenAI API error ({}): {}", status, err);
            return Err(err);
        }

        let completion: ChatCompletion = response
            .json()
            .await
            .map_err(|e| CompletionError::Provider(format!("Malformed completion: {}", e)))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| CompletionError::Provider("Completion contained no message".to_string()))
    }
}

/// Local models served by Ollama.
pub struct OllamaProvider {
    ollama: Ollama,
    model: String,
}

impl OllamaProvider {
    pub fn new(host: &str, port: u16, model: &str) -> Self {
        OllamaProvider {
            ollama: Ollama::new(host.to_string(), port),
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl CompletionProvider for OllamaProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        let conversation = vec![
            ChatMessage::system(request.system.clone()),
            ChatMessage::user(request.user.clone()),
        ];
        let options = GenerationOptions::default()
            .temperature(request.temperature)
            .num_predict(request.max_tokens as i32);
        let chat = ChatMessageRequest::new(self.model.clone(), conversation).options(options);

        let response = self.ollama.send_chat_messages(chat).await.map_err(|e| {
            error!("Ollama error: {}", e);
            CompletionError::Provider(e.to_string())
        })?;
        Ok(response.message.content)
    }
}
